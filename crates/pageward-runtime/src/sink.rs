#![forbid(unsafe_code)]

//! Command sinks: the one-way outbound channel to the host process.
//!
//! The page never inspects a response to a command; the host owns all
//! effects. A sink therefore has a single infallible operation. Three
//! implementations cover the common embeddings:
//!
//! - [`RecordingSink`] buffers commands in memory (tests, diagnostics).
//! - Any `FnMut(Command)` closure works as a sink directly.
//! - [`std::sync::mpsc::Sender`] delivers commands across a channel; a send
//!   after the host has disconnected is dropped, since nobody is left to act
//!   on it.

use pageward_core::command::Command;

/// A one-way outbound channel accepting commands.
pub trait CommandSink {
    /// Deliver a command to the host process. Fire-and-forget.
    fn send(&mut self, command: Command);
}

impl<F: FnMut(Command)> CommandSink for F {
    fn send(&mut self, command: Command) {
        self(command);
    }
}

impl CommandSink for std::sync::mpsc::Sender<Command> {
    fn send(&mut self, command: Command) {
        // A disconnected receiver means the host is gone; the command has
        // nowhere to go and is dropped.
        let _ = std::sync::mpsc::Sender::send(self, command);
    }
}

/// An in-memory sink that records every command in emission order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    sent: Vec<Command>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far, in emission order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.sent
    }

    /// Drain and return the recorded commands.
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.sent)
    }
}

impl CommandSink for RecordingSink {
    fn send(&mut self, command: Command) {
        self.sent.push(command);
    }
}
