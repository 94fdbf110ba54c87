#![forbid(unsafe_code)]

//! Named controls of a warning page.
//!
//! A warning page exposes a small fixed set of interactive elements. Which of
//! them exist varies by warning kind and by platform, so element presence is
//! an explicit typed contract: the embedder passes a [`Controls`] set listing
//! the elements that actually exist in the page, and the controller wires
//! handlers only for those. The keyboard stream is not a control; it is
//! always present and always wired.
//!
//! Required vs. optional is a presentation-layer contract: the primary button
//! (when not hidden) and the details button (outside captive-portal pages)
//! are expected to exist, while the diagnostic and learn-more links may be
//! legitimately absent.

use bitflags::bitflags;

/// An interactive element of the warning page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// The primary action button ("Back to safety", "Connect", ...).
    PrimaryButton,

    /// The proceed-anyway link shown on overridable warnings.
    ProceedLink,

    /// The details disclosure toggle.
    DetailsButton,

    /// Optional link to the connection diagnostic tool.
    DiagnosticLink,

    /// Optional link to the help center article for this warning.
    LearnMoreLink,

    /// Link to report an incorrectly flagged site (phishing warnings only).
    ReportErrorLink,
}

impl Control {
    /// All controls, in a stable order.
    pub const ALL: [Control; 6] = [
        Control::PrimaryButton,
        Control::ProceedLink,
        Control::DetailsButton,
        Control::DiagnosticLink,
        Control::LearnMoreLink,
        Control::ReportErrorLink,
    ];

    /// The presence flag for this control.
    #[must_use]
    pub const fn flag(self) -> Controls {
        match self {
            Control::PrimaryButton => Controls::PRIMARY_BUTTON,
            Control::ProceedLink => Controls::PROCEED_LINK,
            Control::DetailsButton => Controls::DETAILS_BUTTON,
            Control::DiagnosticLink => Controls::DIAGNOSTIC_LINK,
            Control::LearnMoreLink => Controls::LEARN_MORE_LINK,
            Control::ReportErrorLink => Controls::REPORT_ERROR_LINK,
        }
    }

    /// Stable name for logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Control::PrimaryButton => "primary-button",
            Control::ProceedLink => "proceed-link",
            Control::DetailsButton => "details-button",
            Control::DiagnosticLink => "diagnostic-link",
            Control::LearnMoreLink => "learn-more-link",
            Control::ReportErrorLink => "report-error-link",
        }
    }
}

bitflags! {
    /// A set of controls, used both for element presence and handler wiring.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Controls: u8 {
        /// The primary action button exists.
        const PRIMARY_BUTTON    = 0b0000_0001;
        /// The proceed-anyway link exists.
        const PROCEED_LINK      = 0b0000_0010;
        /// The details toggle exists.
        const DETAILS_BUTTON    = 0b0000_0100;
        /// The diagnostic link exists.
        const DIAGNOSTIC_LINK   = 0b0000_1000;
        /// The learn-more link exists.
        const LEARN_MORE_LINK   = 0b0001_0000;
        /// The report-error link exists.
        const REPORT_ERROR_LINK = 0b0010_0000;
    }
}

impl Controls {
    /// Whether a specific control is in the set.
    #[must_use]
    pub const fn has(self, control: Control) -> bool {
        self.contains(control.flag())
    }
}
