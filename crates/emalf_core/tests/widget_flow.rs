use emalf_core::{
    ChallengePicker, Idea, IdeaStore, IdeaValidationError, StoreError, StoreResult, ToastVariant,
    Widget, WidgetState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// In-memory store with switchable failure injection.
#[derive(Default)]
struct MemoryStore {
    texts: Vec<String>,
    unavailable: bool,
    add_calls: usize,
}

impl MemoryStore {
    fn with(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|text| (*text).to_string()).collect(),
            ..Self::default()
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable {
            return Err(StoreError::StorageUnavailable("offline".to_string()));
        }
        Ok(())
    }
}

impl IdeaStore for MemoryStore {
    fn list_all(&mut self) -> StoreResult<Vec<Idea>> {
        self.check()?;
        Ok(self
            .texts
            .iter()
            .map(|text| Idea::local(text.clone(), true))
            .collect())
    }

    fn pick_random(&mut self) -> StoreResult<Idea> {
        self.check()?;
        self.texts
            .last()
            .map(|text| Idea::local(text.clone(), true))
            .ok_or(StoreError::EmptyStore)
    }

    fn add(&mut self, text: &str) -> StoreResult<Idea> {
        self.add_calls += 1;
        self.check()?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(StoreError::Validation(IdeaValidationError::Blank));
        }
        if self.texts.contains(&text) {
            return Err(StoreError::DuplicateIdea(text));
        }
        self.texts.push(text.clone());
        Ok(Idea::local(text, true))
    }
}

fn widget(store: MemoryStore) -> Widget<MemoryStore, StdRng> {
    Widget::with_picker(store, ChallengePicker::new(StdRng::seed_from_u64(1)))
}

#[test]
fn load_sets_list_and_initial_pick() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat", "Draw a dog"]));
    let mut state = WidgetState::new();
    assert!(state.loading);

    widget.load(&mut state);

    assert!(!state.loading);
    assert_eq!(state.ideas.len(), 2);
    let current = state.current.clone().unwrap();
    assert!(current == "Draw a cat" || current == "Draw a dog");
    assert!(state.drain_notifications().is_empty());
}

#[test]
fn load_failure_notifies_and_clears_loading() {
    let mut store = MemoryStore::with(&["Draw a cat"]);
    store.unavailable = true;
    let mut widget = widget(store);
    let mut state = WidgetState::new();

    widget.load(&mut state);

    assert!(!state.loading);
    assert!(state.ideas.is_empty());
    let toasts = state.drain_notifications();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].variant, ToastVariant::Destructive);
    assert!(toasts[0].description.contains("Failed to load"));
}

#[test]
fn new_idea_becomes_visible_only_after_delay() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"]));
    let mut state = WidgetState::new();
    widget.load(&mut state);
    widget.store_mut().texts.push("Draw a dog".to_string());
    let start = Instant::now();

    assert!(widget.request_new_idea(&mut state, start));
    assert!(state.is_animating());
    assert!(!widget.tick(&mut state, start + Duration::from_millis(299)));
    assert_eq!(state.current.as_deref(), Some("Draw a cat"));

    assert!(widget.tick(&mut state, start + Duration::from_millis(300)));
    assert_eq!(state.current.as_deref(), Some("Draw a dog"));
    assert!(!state.is_animating());
}

#[test]
fn requests_are_ignored_while_loading_or_animating() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"]));
    let mut state = WidgetState::new();
    let now = Instant::now();

    assert!(!widget.request_new_idea(&mut state, now));

    widget.load(&mut state);
    assert!(widget.request_new_idea(&mut state, now));
    assert!(!widget.request_new_idea(&mut state, now));
}

#[test]
fn random_failure_notifies_and_stays_idle() {
    let mut widget = widget(MemoryStore::default());
    let mut state = WidgetState::new();
    widget.load(&mut state);

    assert!(!widget.request_new_idea(&mut state, Instant::now()));
    assert!(!state.is_animating());
    let toasts = state.drain_notifications();
    assert!(toasts[0].description.contains("Failed to get new challenge"));
}

#[test]
fn teardown_cancels_pending_transition() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"]));
    let mut state = WidgetState::new();
    widget.load(&mut state);
    widget.store_mut().texts.push("Draw a dog".to_string());
    let start = Instant::now();
    widget.request_new_idea(&mut state, start);

    widget.teardown(&mut state);

    assert!(!widget.tick(&mut state, start + Duration::from_secs(1)));
    assert_eq!(state.current.as_deref(), Some("Draw a cat"));
}

#[test]
fn zero_delay_applies_on_next_tick() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"])).with_delay(Duration::ZERO);
    let mut state = WidgetState::new();
    widget.load(&mut state);
    let now = Instant::now();

    widget.request_new_idea(&mut state, now);
    assert!(widget.tick(&mut state, now));
}

#[test]
fn blank_submit_notifies_without_calling_store() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"]));
    let mut state = WidgetState::new();
    widget.load(&mut state);
    state.open_dialog();
    state.set_draft("   ");

    assert!(widget.submit(&mut state).is_none());

    assert_eq!(widget.store_mut().add_calls, 0);
    assert!(state.dialog_open);
    let toasts = state.drain_notifications();
    assert_eq!(toasts[0].description, "Please enter a drawing idea");
}

#[test]
fn successful_submit_prepends_and_closes_dialog() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"]));
    let mut state = WidgetState::new();
    widget.load(&mut state);
    state.open_dialog();
    state.set_draft("  Draw a fish  ");

    let created = widget.submit(&mut state).unwrap();

    assert_eq!(created.text, "Draw a fish");
    assert_eq!(state.ideas[0].text, "Draw a fish");
    assert_eq!(state.ideas.len(), 2);
    assert!(state.draft.is_empty());
    assert!(!state.dialog_open);
    let toasts = state.drain_notifications();
    assert_eq!(toasts[0].title, "Success!");
    assert_eq!(toasts[0].variant, ToastVariant::Default);
}

#[test]
fn duplicate_submit_keeps_draft_and_reports_conflict() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"]));
    let mut state = WidgetState::new();
    widget.load(&mut state);
    state.open_dialog();
    state.set_draft("Draw a cat");

    assert!(widget.submit(&mut state).is_none());

    assert_eq!(state.ideas.len(), 1);
    assert_eq!(state.draft, "Draw a cat");
    assert!(state.dialog_open);
    let toasts = state.drain_notifications();
    assert_eq!(toasts[0].title, "Already exists");
}

#[test]
fn storage_failure_on_submit_reports_generic_error() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"]));
    let mut state = WidgetState::new();
    widget.load(&mut state);
    widget.store_mut().unavailable = true;
    state.set_draft("Draw a fish");

    assert!(widget.submit(&mut state).is_none());

    let toasts = state.drain_notifications();
    assert!(toasts[0].description.contains("Failed to add your idea"));
}

#[test]
fn cancel_discards_draft_without_touching_store() {
    let mut widget = widget(MemoryStore::with(&["Draw a cat"]));
    let mut state = WidgetState::new();
    widget.load(&mut state);

    state.open_dialog();
    state.set_draft("Draw a half-finished idea");
    state.cancel_dialog();
    assert!(!state.dialog_open);
    assert!(state.draft.is_empty());

    state.open_dialog();
    assert!(state.draft.is_empty());
    assert_eq!(widget.store_mut().add_calls, 0);
    assert!(state.drain_notifications().is_empty());
}

