#![forbid(unsafe_code)]

//! Outbound commands sent to the host browser process.
//!
//! Commands are fire-and-forget: the page emits them in event order over a
//! one-way channel and never inspects a response. The host process owns all
//! effects (navigation, telemetry, opening settings panes) and is responsible
//! for deduplication, so repeated emission of the same command is harmless
//! from the sender's perspective.
//!
//! Each command has a stable numeric wire id because the host decodes
//! commands numerically. Ids must never be renumbered across releases.

/// An outbound command from the warning page to the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Leave the page via its safe action (back to safety, close).
    DontProceed,

    /// Proceed to the site despite the warning.
    Proceed,

    /// The details section was opened for the first time this session.
    ///
    /// Emitted exactly once per page lifetime; the host records it as a
    /// telemetry event.
    ShowMoreSection,

    /// Open the help center article for this warning.
    OpenHelpCenter,

    /// Open the connection diagnostic tool.
    OpenDiagnostic,

    /// Reload the page and re-evaluate the connection.
    Reload,

    /// Open the OS date and time settings (clock-skew warnings).
    OpenDateSettings,

    /// Open the captive portal login page.
    OpenLogin,

    /// Report that a site was incorrectly flagged as phishing.
    ReportPhishingError,
}

impl Command {
    /// All commands, in wire-id order.
    pub const ALL: [Command; 9] = [
        Command::DontProceed,
        Command::Proceed,
        Command::ShowMoreSection,
        Command::OpenHelpCenter,
        Command::OpenDiagnostic,
        Command::Reload,
        Command::OpenDateSettings,
        Command::OpenLogin,
        Command::ReportPhishingError,
    ];

    /// Stable numeric id used on the wire to the host process.
    #[must_use]
    pub const fn wire_id(self) -> u8 {
        match self {
            Command::DontProceed => 0,
            Command::Proceed => 1,
            Command::ShowMoreSection => 2,
            Command::OpenHelpCenter => 3,
            Command::OpenDiagnostic => 4,
            Command::Reload => 5,
            Command::OpenDateSettings => 6,
            Command::OpenLogin => 7,
            Command::ReportPhishingError => 8,
        }
    }

    /// Stable name for logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Command::DontProceed => "dont-proceed",
            Command::Proceed => "proceed",
            Command::ShowMoreSection => "show-more-section",
            Command::OpenHelpCenter => "open-help-center",
            Command::OpenDiagnostic => "open-diagnostic",
            Command::Reload => "reload",
            Command::OpenDateSettings => "open-date-settings",
            Command::OpenLogin => "open-login",
            Command::ReportPhishingError => "report-phishing-error",
        }
    }
}
