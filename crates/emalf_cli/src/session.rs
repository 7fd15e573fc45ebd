//! Terminal rendering of the drawing-challenge widget.
//!
//! # Invariants
//! - Every handler result is rendered; notifications are flushed after each command.
//! - `finish` tears the widget down so no pending transition outlives the session.

use emalf_core::{IdeaStore, Toast, ToastVariant, Widget, WidgetState};
use rand::Rng;
use std::io::{self, BufRead, Write};
use std::time::Instant;

/// One running widget plus its state, writing to a terminal-like sink.
pub struct Session<S, R> {
    widget: Widget<S, R>,
    state: WidgetState,
}

impl<S: IdeaStore, R: Rng> Session<S, R> {
    /// Performs the initial load.
    pub fn start(mut widget: Widget<S, R>) -> Self {
        let mut state = WidgetState::new();
        widget.load(&mut state);
        Self { widget, state }
    }

    #[cfg(test)]
    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn show(&mut self, out: &mut impl Write) -> io::Result<()> {
        match &self.state.current {
            Some(text) => writeln!(out, "{text}")?,
            None => writeln!(out, "(no drawing ideas yet)")?,
        }
        self.flush_notifications(out)
    }

    /// Requests a new idea and blocks until its transition completes.
    pub fn next(&mut self, out: &mut impl Write) -> io::Result<()> {
        let started = self.widget.request_new_idea(&mut self.state, Instant::now());
        if started {
            if let Some(wait) = self.state.transition.remaining(Instant::now()) {
                std::thread::sleep(wait);
            }
            self.widget.tick(&mut self.state, Instant::now());
        }
        self.show(out)
    }

    pub fn add(&mut self, text: &str, out: &mut impl Write) -> io::Result<()> {
        self.state.open_dialog();
        self.state.set_draft(text);
        if let Some(idea) = self.widget.submit(&mut self.state) {
            writeln!(out, "added: {}", idea.text)?;
        }
        // A rejected draft is not carried into the next command.
        self.state.cancel_dialog();
        self.flush_notifications(out)
    }

    pub fn list(&mut self, out: &mut impl Write) -> io::Result<()> {
        for (index, idea) in self.state.ideas.iter().enumerate() {
            writeln!(out, "{:>3}. {}", index + 1, idea.text)?;
        }
        writeln!(out, "{} ideas", self.state.ideas.len())?;
        self.flush_notifications(out)
    }

    /// Line-oriented loop: `n`ext, `a`dd <text>, `l`ist, `s`how, `q`uit.
    pub fn run_interactive(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "commands: n(ext) | a(dd) <idea> | l(ist) | s(how) | q(uit)")?;
        self.show(out)?;

        for line in input.lines() {
            let line = line?;
            let (command, rest) = line
                .trim()
                .split_once(' ')
                .map_or((line.trim(), ""), |(command, rest)| (command, rest));
            match command {
                "n" | "next" => self.next(out)?,
                "a" | "add" => self.add(rest, out)?,
                "l" | "list" => self.list(out)?,
                "s" | "show" | "" => self.show(out)?,
                "q" | "quit" | "exit" => break,
                other => writeln!(out, "unknown command `{other}`")?,
            }
        }
        Ok(())
    }

    /// Cancels any pending transition.
    pub fn finish(mut self) -> WidgetState {
        self.widget.teardown(&mut self.state);
        self.state
    }

    fn flush_notifications(&mut self, out: &mut impl Write) -> io::Result<()> {
        for toast in self.state.drain_notifications() {
            writeln!(out, "{}", render_toast(&toast))?;
        }
        Ok(())
    }
}

fn render_toast(toast: &Toast) -> String {
    let marker = match toast.variant {
        ToastVariant::Default => "+",
        ToastVariant::Destructive => "!",
    };
    format!("[{marker}] {}: {}", toast.title, toast.description)
}
