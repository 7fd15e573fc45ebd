//! Drawing-challenge widget state and event handlers.
//!
//! # Responsibility
//! - Hold the transient UI copy of the idea list in an explicit state object.
//! - Turn every store failure into a transient notification.
//!
//! # Invariants
//! - At most one new-idea transition is pending at a time.
//! - Store calls never run while the initial load is outstanding.
//! - No handler panics or propagates an error to the caller.

use crate::model::idea::Idea;
use crate::picker::ChallengePicker;
use crate::store::idea_store::{IdeaStore, StoreError};
use crate::transition::{Transition, TRANSITION_DELAY};
use log::{info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// Transient, non-blocking notification surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    fn success(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: ToastVariant::Default,
        }
    }

    fn failure(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: ToastVariant::Destructive,
        }
    }
}

/// Everything the view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    /// Text of the challenge on screen.
    pub current: Option<String>,
    /// Local copy of the pool, newest submissions first.
    pub ideas: Vec<Idea>,
    /// Contents of the submission input.
    pub draft: String,
    pub dialog_open: bool,
    pub loading: bool,
    pub transition: Transition,
    pub notifications: VecDeque<Toast>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetState {
    /// Fresh state, waiting for the initial load.
    pub fn new() -> Self {
        Self {
            current: None,
            ideas: Vec::new(),
            draft: String::new(),
            dialog_open: false,
            loading: true,
            transition: Transition::Idle,
            notifications: VecDeque::new(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_animating()
    }

    pub fn open_dialog(&mut self) {
        self.dialog_open = true;
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    /// Closes the dialog and discards the unsent draft.
    pub fn cancel_dialog(&mut self) {
        self.close_dialog();
        self.draft.clear();
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Takes every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Toast> {
        self.notifications.drain(..).collect()
    }

    fn notify(&mut self, toast: Toast) {
        self.notifications.push_back(toast);
    }
}

/// Event handlers binding a [`WidgetState`] to one store backend.
pub struct Widget<S, R = ThreadRng> {
    store: S,
    picker: ChallengePicker<R>,
    delay: Duration,
}

impl<S: IdeaStore> Widget<S, ThreadRng> {
    pub fn new(store: S) -> Self {
        Self::with_picker(store, ChallengePicker::from_entropy())
    }
}

impl<S: IdeaStore, R: Rng> Widget<S, R> {
    pub fn with_picker(store: S, picker: ChallengePicker<R>) -> Self {
        Self {
            store,
            picker,
            delay: TRANSITION_DELAY,
        }
    }

    /// Overrides the transition delay; `Duration::ZERO` shows picks on the next tick.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Fetches the full list once and shows an initial random pick.
    pub fn load(&mut self, state: &mut WidgetState) {
        state.loading = true;
        match self.store.list_all() {
            Ok(ideas) => {
                state.current = self.picker.try_choose(&ideas).map(|idea| idea.text.clone());
                info!(
                    "event=widget_load module=widget status=ok ideas={}",
                    ideas.len()
                );
                state.ideas = ideas;
            }
            Err(err) => {
                warn!("event=widget_load module=widget status=error error={err}");
                state.notify(Toast::failure(
                    "Error",
                    "Failed to load drawing ideas. Please refresh the page.",
                ));
            }
        }
        state.loading = false;
    }

    /// Asks the store for a random idea and starts the transition towards it.
    ///
    /// Returns `false` when the request was ignored (still loading, already
    /// animating) or failed.
    pub fn request_new_idea(&mut self, state: &mut WidgetState, now: Instant) -> bool {
        if state.loading || state.is_animating() {
            return false;
        }

        match self.store.pick_random() {
            Ok(idea) => state.transition.begin(idea, now + self.delay),
            Err(err) => {
                warn!("event=widget_next module=widget status=error error={err}");
                state.notify(Toast::failure(
                    "Error",
                    "Failed to get new challenge. Please try again.",
                ));
                false
            }
        }
    }

    /// Applies a due transition. Returns `true` when `current` changed.
    pub fn tick(&self, state: &mut WidgetState, now: Instant) -> bool {
        match state.transition.poll(now) {
            Some(idea) => {
                state.current = Some(idea.text);
                true
            }
            None => false,
        }
    }

    /// Submits the draft to the store.
    ///
    /// On success the new idea is prepended to the local copy, the draft is
    /// cleared and the dialog closes. Returns the stored idea.
    pub fn submit(&mut self, state: &mut WidgetState) -> Option<Idea> {
        if state.draft.trim().is_empty() {
            state.notify(Toast::failure("Error", "Please enter a drawing idea"));
            return None;
        }

        match self.store.add(&state.draft) {
            Ok(idea) => {
                info!(
                    "event=widget_submit module=widget status=ok text_len={}",
                    idea.text.chars().count()
                );
                state.ideas.insert(0, idea.clone());
                state.draft.clear();
                state.close_dialog();
                state.notify(Toast::success(
                    "Success!",
                    "Your drawing idea has been added and shared with everyone!",
                ));
                Some(idea)
            }
            Err(StoreError::DuplicateIdea(_)) => {
                state.notify(Toast::failure(
                    "Already exists",
                    "This drawing idea already exists!",
                ));
                None
            }
            Err(err) => {
                warn!("event=widget_submit module=widget status=error error={err}");
                state.notify(Toast::failure(
                    "Error",
                    "Failed to add your idea. Please try again.",
                ));
                None
            }
        }
    }

    /// Cancels any pending transition so nothing is applied after teardown.
    pub fn teardown(&self, state: &mut WidgetState) {
        if state.transition.cancel().is_some() {
            info!("event=widget_teardown module=widget status=ok cancelled_transition=true");
        }
    }
}
