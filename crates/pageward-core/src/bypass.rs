#![forbid(unsafe_code)]

//! Bypass sequence detection.
//!
//! This module implements the secret keystroke sequence that lets an operator
//! force past a warning page. The detector is a linear prefix matcher over
//! the page-wide key stream: typing the full secret in order, uninterrupted,
//! produces a match.
//!
//! # Key Concepts
//!
//! - **BypassDetector**: State machine tracking how much of the secret has
//!   been typed. One integer of state: the matched prefix length.
//!
//! - **BypassOutput**: Result of feeding one key event. `Matched` fires on
//!   the final key of the sequence; everything else is progress bookkeeping.
//!
//! # State Machine
//!
//! ```text
//!                 expected key                 expected key (last)
//!   ┌─────────┐ ───────────────▶ ┌─────────┐ ───────────────▶ Matched
//!   │ prefix n │                  │prefix n+1│                  (prefix 0)
//!   └─────────┘ ◀─────────────── └─────────┘
//!        ▲         any other key
//!        └───────── (prefix 0) ──────────────┘
//! ```
//!
//! A mismatched key resets progress to zero and is not re-tested against the
//! start of the sequence; with secret `"abc"`, the stream `a b x a b c`
//! matches only on the final `c`. The secret is fixed and short, and false
//! starts are tolerable, so the simple matcher is preferred over a
//! KMP-style one. There is no timeout between keystrokes and no case
//! folding.
//!
//! # Example
//!
//! ```
//! use pageward_core::bypass::{BypassDetector, BypassOutput};
//! use pageward_core::event::{KeyCode, KeyEvent};
//!
//! let mut detector = BypassDetector::new("ok");
//!
//! let output = detector.feed(&KeyEvent::new(KeyCode::Char('o')));
//! assert_eq!(output, BypassOutput::Pending);
//!
//! let output = detector.feed(&KeyEvent::new(KeyCode::Char('k')));
//! assert_eq!(output, BypassOutput::Matched);
//! assert_eq!(detector.progress(), 0);
//! ```

use crate::event::{KeyCode, KeyEvent, KeyEventKind};

/// The fixed operator bypass sequence.
pub const DEFAULT_BYPASS_SEQUENCE: &str = "badidea";

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Output from the detector after processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassOutput {
    /// The final key of the secret was typed; the sequence is complete.
    ///
    /// Progress has already been reset to zero: the detector is immediately
    /// reusable, and a repeated full sequence matches again.
    Matched,

    /// The key extended the matched prefix but the sequence is incomplete.
    Pending,

    /// The key did not match; progress was reset to zero.
    NoMatch,

    /// Repeat or release event; ignored, state untouched.
    Ignored,
}

impl BypassOutput {
    /// Whether this output completes the sequence.
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, BypassOutput::Matched)
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Stateful matcher for the operator bypass sequence.
///
/// Feed every key event from the page-wide stream; the detector does no
/// filtering by focus or target element itself. State lives for one page
/// session and is never persisted.
#[derive(Debug, Clone)]
pub struct BypassDetector {
    secret: Vec<char>,
    matched: usize,
}

impl BypassDetector {
    /// Create a detector for the given secret.
    ///
    /// An empty secret never matches.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.chars().collect(),
            matched: 0,
        }
    }

    /// Create a detector for the fixed operator sequence.
    #[must_use]
    pub fn with_default_sequence() -> Self {
        Self::new(DEFAULT_BYPASS_SEQUENCE)
    }

    /// Process a key event.
    ///
    /// Only key press events advance or reset the matcher; repeat and
    /// release events are ignored. Modifiers are not considered; matching is
    /// on the character alone.
    pub fn feed(&mut self, event: &KeyEvent) -> BypassOutput {
        if event.kind != KeyEventKind::Press {
            return BypassOutput::Ignored;
        }

        let Some(&expected) = self.secret.get(self.matched) else {
            return BypassOutput::NoMatch;
        };

        match event.code {
            KeyCode::Char(c) if c == expected => {
                self.matched += 1;
                if self.matched == self.secret.len() {
                    self.matched = 0;
                    BypassOutput::Matched
                } else {
                    BypassOutput::Pending
                }
            }
            _ => {
                // The mismatched key is not re-tested against the start of
                // the sequence; progress simply restarts from zero.
                self.matched = 0;
                BypassOutput::NoMatch
            }
        }
    }

    /// Length of the currently matched prefix.
    #[must_use]
    pub const fn progress(&self) -> usize {
        self.matched
    }

    /// Whether a partial prefix is currently matched.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.matched > 0
    }

    /// Length of the secret sequence.
    #[must_use]
    pub const fn sequence_len(&self) -> usize {
        self.secret.len()
    }

    /// Reset progress to zero, discarding any partial match.
    pub fn reset(&mut self) {
        self.matched = 0;
    }
}

impl Default for BypassDetector {
    fn default() -> Self {
        Self::with_default_sequence()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
