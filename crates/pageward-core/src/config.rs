#![forbid(unsafe_code)]

//! Page configuration: an immutable snapshot read once at startup.
//!
//! The host process hands the page an untyped key/value bag (the
//! [`ConfigSource`]). [`PageConfig::from_source`] reads it exactly once,
//! validates the warning kind against the closed [`WarningKind`] enumeration,
//! and normalizes the clock-skew flag so the invariant
//! `bad_clock ⇒ kind == Ssl` holds by construction. After that point the
//! configuration never changes; there are no live updates.
//!
//! An unrecognized warning kind is a programming error on the host side, not
//! a runtime condition to recover from. It fails loudly as
//! [`ConfigError::UnknownKind`] so the embedder never shows a warning page
//! with no way to proceed or escape.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration keys
// ---------------------------------------------------------------------------

/// Key names exposed by the host-provided configuration source.
pub mod keys {
    /// Warning kind: `"SSL"`, `"CAPTIVE_PORTAL"`, or `"SAFEBROWSING"`.
    pub const TYPE: &str = "type";
    /// Whether the warning UI permits proceeding.
    pub const OVERRIDABLE: &str = "overridable";
    /// Whether the clock-skew variant applies (SSL only).
    pub const BAD_CLOCK: &str = "bad_clock";
    /// Whether the primary action button is suppressed.
    pub const HIDE_PRIMARY_BUTTON: &str = "hide_primary_button";
    /// Whether a Safe Browsing warning is specifically a phishing warning.
    pub const PHISHING: &str = "phishing";
    /// Error code string displayed on SSL warnings.
    pub const ERROR_CODE: &str = "errorCode";
}

// ---------------------------------------------------------------------------
// Warning kind
// ---------------------------------------------------------------------------

/// The kind of warning the page presents.
///
/// This is a closed enumeration: every configuration that reaches the
/// controller carries one of these three kinds, so command dispatch can match
/// exhaustively with no defensive default branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// TLS/certificate error page.
    Ssl,

    /// Captive portal notice (a login page is intercepting traffic).
    CaptivePortal,

    /// Safe Browsing warning (malware, phishing, unwanted software).
    SafeBrowsing,
}

impl WarningKind {
    /// The host-side string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            WarningKind::Ssl => "SSL",
            WarningKind::CaptivePortal => "CAPTIVE_PORTAL",
            WarningKind::SafeBrowsing => "SAFEBROWSING",
        }
    }
}

impl FromStr for WarningKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SSL" => Ok(WarningKind::Ssl),
            "CAPTIVE_PORTAL" => Ok(WarningKind::CaptivePortal),
            "SAFEBROWSING" => Ok(WarningKind::SafeBrowsing),
            other => Err(ConfigError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Visual mode
// ---------------------------------------------------------------------------

/// The mutually exclusive visual treatment applied to the page body.
///
/// Exactly one mode is selected at setup, derived from the warning kind and
/// the clock-skew flag. What each mode looks like is the presentation
/// layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualMode {
    /// SSL warning caused by a wrong system clock.
    BadClock,

    /// Plain SSL warning.
    Ssl,

    /// Captive portal notice.
    CaptivePortal,

    /// Safe Browsing warning.
    SafeBrowsing,
}

impl VisualMode {
    /// Stable name for logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            VisualMode::BadClock => "bad-clock",
            VisualMode::Ssl => "ssl",
            VisualMode::CaptivePortal => "captive-portal",
            VisualMode::SafeBrowsing => "safe-browsing",
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal configuration errors.
///
/// These surface at setup, before any event is processed. No command is ever
/// emitted from a configuration that failed to validate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The `type` value is not one of the recognized warning kinds.
    #[error("unrecognized warning kind: {0:?}")]
    UnknownKind(String),

    /// A required key is absent from the configuration source.
    #[error("missing required page configuration field: {0}")]
    MissingField(&'static str),
}

// ---------------------------------------------------------------------------
// Configuration source
// ---------------------------------------------------------------------------

/// A read-only key/value provider populated by the host process.
///
/// Read exactly once by [`PageConfig::from_source`]; implementations do not
/// need to support live updates.
pub trait ConfigSource {
    /// Look up a boolean value by key.
    fn get_boolean(&self, name: &str) -> Option<bool>;

    /// Look up a string value by key.
    fn get_string(&self, name: &str) -> Option<&str>;
}

/// An in-memory [`ConfigSource`] for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    booleans: AHashMap<String, bool>,
    strings: AHashMap<String, String>,
}

impl StaticConfig {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a boolean value.
    #[must_use]
    pub fn with_boolean(mut self, name: impl Into<String>, value: bool) -> Self {
        self.booleans.insert(name.into(), value);
        self
    }

    /// Insert a string value.
    #[must_use]
    pub fn with_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(name.into(), value.into());
        self
    }
}

impl ConfigSource for StaticConfig {
    fn get_boolean(&self, name: &str) -> Option<bool> {
        self.booleans.get(name).copied()
    }

    fn get_string(&self, name: &str) -> Option<&str> {
        self.strings.get(name).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Page configuration
// ---------------------------------------------------------------------------

/// Immutable warning-page configuration.
///
/// Constructed once before any event is processed, either from a host
/// [`ConfigSource`] via [`from_source`](PageConfig::from_source) or directly
/// via [`new`](PageConfig::new) and the builder methods.
///
/// # Invariant
/// `bad_clock` implies `kind == WarningKind::Ssl`. Both constructors enforce
/// this: the clock-skew flag is only read (and only settable) for SSL pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// The kind of warning this page presents.
    pub kind: WarningKind,

    /// Whether the warning UI permits the user to proceed.
    pub overridable: bool,

    /// Whether the primary action button is suppressed.
    pub hide_primary_button: bool,

    /// Whether this SSL warning is attributed to a wrong system clock.
    pub bad_clock: bool,

    /// Whether a Safe Browsing warning is specifically a phishing warning.
    pub phishing: bool,

    /// Error code string displayed on SSL warnings; empty otherwise.
    pub error_code: String,
}

impl PageConfig {
    /// Create a configuration with all flags off.
    #[must_use]
    pub fn new(kind: WarningKind) -> Self {
        Self {
            kind,
            overridable: false,
            hide_primary_button: false,
            bad_clock: false,
            phishing: false,
            error_code: String::new(),
        }
    }

    /// Set whether the warning is overridable.
    #[must_use]
    pub fn with_overridable(mut self, overridable: bool) -> Self {
        self.overridable = overridable;
        self
    }

    /// Set whether the primary button is suppressed.
    #[must_use]
    pub fn with_hidden_primary_button(mut self, hidden: bool) -> Self {
        self.hide_primary_button = hidden;
        self
    }

    /// Set the clock-skew flag. Ignored for non-SSL kinds.
    #[must_use]
    pub fn with_bad_clock(mut self, bad_clock: bool) -> Self {
        self.bad_clock = bad_clock && self.kind == WarningKind::Ssl;
        self
    }

    /// Set the phishing flag.
    #[must_use]
    pub fn with_phishing(mut self, phishing: bool) -> Self {
        self.phishing = phishing;
        self
    }

    /// Set the error code string.
    #[must_use]
    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = error_code.into();
        self
    }

    /// Read and validate a configuration from a host source.
    ///
    /// Reads each key exactly once. Kind-specific keys are only consulted for
    /// the kinds they apply to: `bad_clock` and `errorCode` for SSL pages,
    /// `phishing` for Safe Browsing pages.
    pub fn from_source<C: ConfigSource>(source: &C) -> Result<Self, ConfigError> {
        let kind: WarningKind = source
            .get_string(keys::TYPE)
            .ok_or(ConfigError::MissingField(keys::TYPE))?
            .parse()?;

        let overridable = required_boolean(source, keys::OVERRIDABLE)?;
        let hide_primary_button = required_boolean(source, keys::HIDE_PRIMARY_BUTTON)?;

        let bad_clock = match kind {
            WarningKind::Ssl => required_boolean(source, keys::BAD_CLOCK)?,
            WarningKind::CaptivePortal | WarningKind::SafeBrowsing => false,
        };

        let phishing = match kind {
            WarningKind::SafeBrowsing => required_boolean(source, keys::PHISHING)?,
            WarningKind::Ssl | WarningKind::CaptivePortal => false,
        };

        let error_code = match kind {
            WarningKind::Ssl => source
                .get_string(keys::ERROR_CODE)
                .ok_or(ConfigError::MissingField(keys::ERROR_CODE))?
                .to_string(),
            WarningKind::CaptivePortal | WarningKind::SafeBrowsing => String::new(),
        };

        Ok(Self {
            kind,
            overridable,
            hide_primary_button,
            bad_clock,
            phishing,
            error_code,
        })
    }

    /// The mutually exclusive visual mode for this configuration.
    #[must_use]
    pub fn visual_mode(&self) -> VisualMode {
        match self.kind {
            WarningKind::Ssl if self.bad_clock => VisualMode::BadClock,
            WarningKind::Ssl => VisualMode::Ssl,
            WarningKind::CaptivePortal => VisualMode::CaptivePortal,
            WarningKind::SafeBrowsing => VisualMode::SafeBrowsing,
        }
    }
}

fn required_boolean<C: ConfigSource>(source: &C, name: &'static str) -> Result<bool, ConfigError> {
    source
        .get_boolean(name)
        .ok_or(ConfigError::MissingField(name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
