#![forbid(unsafe_code)]

//! Interstitial controller: wiring and command dispatch.
//!
//! The controller is built once per page session from an immutable
//! [`PageConfig`] and a [`Controls`] set describing which elements exist in
//! the page. Setup computes a [`Wiring`]: which controls get handlers and
//! which presentation flags apply. After setup, [`handle`] dispatches each
//! page event synchronously, emitting zero or one [`Command`] into the sink
//! per event, in event order.
//!
//! # Primary-action dispatch
//!
//! | kind           | bad_clock | overridable | command          |
//! |----------------|-----------|-------------|------------------|
//! | CaptivePortal  | -         | -           | OpenLogin        |
//! | Ssl            | true      | -           | OpenDateSettings |
//! | Ssl            | false     | true        | DontProceed      |
//! | Ssl            | false     | false       | Reload           |
//! | SafeBrowsing   | -         | -           | DontProceed      |
//!
//! The match is exhaustive over the closed [`WarningKind`] enumeration; an
//! unrecognized kind cannot reach dispatch because configuration parsing
//! rejects it up front.
//!
//! # Bypass
//!
//! The page-wide key stream always feeds the bypass detector. A completed
//! secret sequence emits [`Command::Proceed`] even on non-overridable pages:
//! the sequence is an operator override and deliberately skips the
//! overridability gate.

use pageward_core::bypass::BypassDetector;
use pageward_core::command::Command;
use pageward_core::config::{ConfigError, ConfigSource, PageConfig, VisualMode, WarningKind};
use pageward_core::control::{Control, Controls};
use pageward_core::event::PageEvent;

use crate::details::DetailsPanel;
use crate::sink::CommandSink;

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Handler wiring and presentation flags, computed once at setup.
///
/// `wired` controls receive handlers; activating anything else is a silent
/// no-op. The presentation flags are declarative: the presentation layer
/// reads them and applies classes/visibility however it likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wiring {
    /// The mutually exclusive visual treatment for the page body.
    pub visual_mode: VisualMode,

    /// Show the error code element (SSL pages, including bad-clock).
    pub show_error_code: bool,

    /// Hide the final explanatory paragraph (non-overridable, non-SSL).
    pub hide_final_paragraph: bool,

    /// Render the proceed link in its small variant (overridable SSL).
    pub small_proceed_link: bool,

    wired: Controls,
}

impl Wiring {
    fn for_page(config: &PageConfig, present: Controls) -> Self {
        let mut wired = Controls::empty();

        if config.hide_primary_button {
            // Primary action unavailable; nothing to attach.
        } else if present.has(Control::PrimaryButton) {
            wired |= Controls::PRIMARY_BUTTON;
        } else {
            missing_required(Control::PrimaryButton);
        }

        if config.overridable && present.has(Control::ProceedLink) {
            wired |= Controls::PROCEED_LINK;
        }

        if config.kind == WarningKind::CaptivePortal {
            // Captive portal pages have no details section.
        } else if present.has(Control::DetailsButton) {
            wired |= Controls::DETAILS_BUTTON;
        } else {
            missing_required(Control::DetailsButton);
        }

        if present.has(Control::DiagnosticLink) {
            wired |= Controls::DIAGNOSTIC_LINK;
        }

        if present.has(Control::LearnMoreLink) {
            wired |= Controls::LEARN_MORE_LINK;
        }

        if config.kind == WarningKind::SafeBrowsing
            && config.phishing
            && present.has(Control::ReportErrorLink)
        {
            wired |= Controls::REPORT_ERROR_LINK;
        }

        Self {
            visual_mode: config.visual_mode(),
            show_error_code: config.kind == WarningKind::Ssl,
            hide_final_paragraph: !config.overridable && config.kind != WarningKind::Ssl,
            small_proceed_link: config.kind == WarningKind::Ssl && config.overridable,
            wired,
        }
    }

    /// Whether a handler is attached to the given control.
    #[must_use]
    pub const fn is_wired(&self, control: Control) -> bool {
        self.wired.has(control)
    }

    /// The full set of wired controls.
    #[must_use]
    pub const fn wired(&self) -> Controls {
        self.wired
    }
}

fn missing_required(control: Control) {
    tracing::warn!(
        target: "pageward.setup",
        control = control.name(),
        "required control missing from page; handler not attached"
    );
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The interaction state machine of a warning page.
///
/// Owns the bypass detector and the details-panel state; both live for one
/// page session on a single logical thread. Handlers are synchronous and run
/// to completion, so command order always equals event order.
#[derive(Debug)]
pub struct InterstitialController<S> {
    config: PageConfig,
    wiring: Wiring,
    detector: BypassDetector,
    details: DetailsPanel,
    sink: S,
}

impl<S: CommandSink> InterstitialController<S> {
    /// Wire a page from an already-validated configuration.
    pub fn new(config: PageConfig, present: Controls, sink: S) -> Self {
        let wiring = Wiring::for_page(&config, present);
        tracing::debug!(
            target: "pageward.setup",
            mode = wiring.visual_mode.name(),
            wired = ?wiring.wired(),
            "interstitial wired"
        );
        Self {
            config,
            wiring,
            detector: BypassDetector::with_default_sequence(),
            details: DetailsPanel::new(),
            sink,
        }
    }

    /// Read, validate, and wire in one step.
    ///
    /// Fails before any handler is attached if the configuration is invalid;
    /// no command can be emitted from a rejected configuration.
    pub fn from_source<C: ConfigSource>(
        source: &C,
        present: Controls,
        sink: S,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(PageConfig::from_source(source)?, present, sink))
    }

    /// Dispatch one page event.
    ///
    /// Returns the command that was emitted into the sink, if any. Key
    /// events always reach the bypass detector; activation of an unwired
    /// control is a silent no-op.
    pub fn handle(&mut self, event: &PageEvent) -> Option<Command> {
        match event {
            PageEvent::Key(key) => {
                if self.detector.feed(key).is_match() {
                    // Operator override: skips the overridability gate.
                    self.emit(Command::Proceed)
                } else {
                    None
                }
            }
            PageEvent::Activate(control) => self.activate(*control),
        }
    }

    fn activate(&mut self, control: Control) -> Option<Command> {
        if !self.wiring.is_wired(control) {
            return None;
        }
        match control {
            Control::PrimaryButton => {
                let command = self.primary_command();
                self.emit(command)
            }
            Control::ProceedLink => self.emit(Command::Proceed),
            Control::DetailsButton => {
                let toggle = self.details.toggle();
                if toggle.first_open {
                    self.emit(Command::ShowMoreSection)
                } else {
                    None
                }
            }
            Control::DiagnosticLink => self.emit(Command::OpenDiagnostic),
            Control::LearnMoreLink => self.emit(Command::OpenHelpCenter),
            Control::ReportErrorLink => self.emit(Command::ReportPhishingError),
        }
    }

    fn primary_command(&self) -> Command {
        match self.config.kind {
            WarningKind::CaptivePortal => Command::OpenLogin,
            WarningKind::Ssl if self.config.bad_clock => Command::OpenDateSettings,
            WarningKind::Ssl if self.config.overridable => Command::DontProceed,
            WarningKind::Ssl => Command::Reload,
            WarningKind::SafeBrowsing => Command::DontProceed,
        }
    }

    fn emit(&mut self, command: Command) -> Option<Command> {
        tracing::debug!(
            target: "pageward.command",
            command = command.name(),
            wire_id = command.wire_id(),
            "command emitted"
        );
        self.sink.send(command);
        Some(command)
    }

    /// The page configuration this controller was built from.
    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    /// The wiring computed at setup.
    #[must_use]
    pub const fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    /// Current details-panel state.
    #[must_use]
    pub const fn details(&self) -> &DetailsPanel {
        &self.details
    }

    /// Matched prefix length of the bypass detector.
    #[must_use]
    pub const fn bypass_progress(&self) -> usize {
        self.detector.progress()
    }

    /// Consume the controller and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use pageward_core::bypass::DEFAULT_BYPASS_SEQUENCE;
    use pageward_core::event::{KeyCode, KeyEvent};

    fn all_controls() -> Controls {
        Controls::all()
    }

    fn controller(config: PageConfig) -> InterstitialController<RecordingSink> {
        InterstitialController::new(config, all_controls(), RecordingSink::new())
    }

    fn click(
        controller: &mut InterstitialController<RecordingSink>,
        control: Control,
    ) -> Option<Command> {
        controller.handle(&PageEvent::Activate(control))
    }

    fn type_str(controller: &mut InterstitialController<RecordingSink>, s: &str) {
        for c in s.chars() {
            controller.handle(&PageEvent::Key(KeyEvent::new(KeyCode::Char(c))));
        }
    }

    // --- Primary-action decision table ---

    #[test]
    fn primary_captive_portal_opens_login() {
        let mut c = controller(PageConfig::new(WarningKind::CaptivePortal));
        assert_eq!(click(&mut c, Control::PrimaryButton), Some(Command::OpenLogin));
    }

    #[test]
    fn primary_ssl_bad_clock_opens_date_settings() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl).with_bad_clock(true));
        assert_eq!(
            click(&mut c, Control::PrimaryButton),
            Some(Command::OpenDateSettings)
        );
    }

    #[test]
    fn primary_ssl_overridable_dont_proceed() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl).with_overridable(true));
        assert_eq!(
            click(&mut c, Control::PrimaryButton),
            Some(Command::DontProceed)
        );
    }

    #[test]
    fn primary_ssl_non_overridable_reloads() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl));
        assert_eq!(click(&mut c, Control::PrimaryButton), Some(Command::Reload));
    }

    #[test]
    fn primary_safe_browsing_dont_proceed() {
        let mut c = controller(PageConfig::new(WarningKind::SafeBrowsing));
        assert_eq!(
            click(&mut c, Control::PrimaryButton),
            Some(Command::DontProceed)
        );
    }

    #[test]
    fn decision_table_emits_exactly_one_command_per_row() {
        let rows = [
            PageConfig::new(WarningKind::CaptivePortal),
            PageConfig::new(WarningKind::Ssl).with_bad_clock(true),
            PageConfig::new(WarningKind::Ssl).with_overridable(true),
            PageConfig::new(WarningKind::Ssl),
            PageConfig::new(WarningKind::SafeBrowsing),
        ];
        for config in rows {
            let mut c = controller(config);
            let emitted = click(&mut c, Control::PrimaryButton);
            let sent = c.into_sink().take();
            assert_eq!(sent.len(), 1);
            assert_eq!(emitted, Some(sent[0]));
        }
    }

    #[test]
    fn hidden_primary_button_is_not_wired() {
        let mut c = controller(
            PageConfig::new(WarningKind::Ssl).with_hidden_primary_button(true),
        );
        assert!(!c.wiring().is_wired(Control::PrimaryButton));
        assert_eq!(click(&mut c, Control::PrimaryButton), None);
        assert!(c.into_sink().commands().is_empty());
    }

    // --- Proceed link ---

    #[test]
    fn proceed_link_wired_only_when_overridable() {
        let c = controller(PageConfig::new(WarningKind::Ssl).with_overridable(true));
        assert!(c.wiring().is_wired(Control::ProceedLink));

        let c = controller(PageConfig::new(WarningKind::Ssl));
        assert!(!c.wiring().is_wired(Control::ProceedLink));
    }

    #[test]
    fn proceed_link_emits_proceed_unconditionally() {
        let mut c = controller(
            PageConfig::new(WarningKind::SafeBrowsing).with_overridable(true),
        );
        assert_eq!(click(&mut c, Control::ProceedLink), Some(Command::Proceed));
    }

    #[test]
    fn proceed_link_noop_when_not_overridable() {
        let mut c = controller(PageConfig::new(WarningKind::SafeBrowsing));
        assert_eq!(click(&mut c, Control::ProceedLink), None);
    }

    // --- Details toggle ---

    #[test]
    fn details_toggle_telemetry_is_one_shot() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl));

        assert_eq!(
            click(&mut c, Control::DetailsButton),
            Some(Command::ShowMoreSection)
        );
        assert_eq!(click(&mut c, Control::DetailsButton), None);
        assert_eq!(click(&mut c, Control::DetailsButton), None);
        assert_eq!(click(&mut c, Control::DetailsButton), None);

        let sent = c.into_sink().take();
        assert_eq!(sent, vec![Command::ShowMoreSection]);
    }

    #[test]
    fn details_not_wired_for_captive_portal() {
        let mut c = controller(PageConfig::new(WarningKind::CaptivePortal));
        assert!(!c.wiring().is_wired(Control::DetailsButton));
        assert_eq!(click(&mut c, Control::DetailsButton), None);
        assert!(!c.details().expanded());
    }

    #[test]
    fn details_state_tracks_toggles() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl));
        click(&mut c, Control::DetailsButton);
        assert!(c.details().expanded());
        click(&mut c, Control::DetailsButton);
        assert!(!c.details().expanded());
        assert!(c.details().ever_opened());
    }

    // --- Optional links ---

    #[test]
    fn diagnostic_and_learn_more_map_directly() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl));
        assert_eq!(
            click(&mut c, Control::DiagnosticLink),
            Some(Command::OpenDiagnostic)
        );
        assert_eq!(
            click(&mut c, Control::LearnMoreLink),
            Some(Command::OpenHelpCenter)
        );
    }

    #[test]
    fn absent_optional_links_are_silently_unwired() {
        let present = Controls::PRIMARY_BUTTON | Controls::DETAILS_BUTTON;
        let mut c = InterstitialController::new(
            PageConfig::new(WarningKind::Ssl),
            present,
            RecordingSink::new(),
        );
        assert!(!c.wiring().is_wired(Control::DiagnosticLink));
        assert!(!c.wiring().is_wired(Control::LearnMoreLink));
        assert_eq!(click(&mut c, Control::DiagnosticLink), None);
        assert_eq!(click(&mut c, Control::LearnMoreLink), None);
        assert!(c.into_sink().commands().is_empty());
    }

    // --- Report-error link ---

    #[test]
    fn report_error_requires_phishing_safe_browsing() {
        let c = controller(PageConfig::new(WarningKind::SafeBrowsing).with_phishing(true));
        assert!(c.wiring().is_wired(Control::ReportErrorLink));

        let c = controller(PageConfig::new(WarningKind::SafeBrowsing));
        assert!(!c.wiring().is_wired(Control::ReportErrorLink));

        let c = controller(PageConfig::new(WarningKind::Ssl).with_phishing(true));
        assert!(!c.wiring().is_wired(Control::ReportErrorLink));
    }

    #[test]
    fn report_error_emits_report_phishing_error() {
        let mut c = controller(PageConfig::new(WarningKind::SafeBrowsing).with_phishing(true));
        assert_eq!(
            click(&mut c, Control::ReportErrorLink),
            Some(Command::ReportPhishingError)
        );
    }

    // --- Bypass sequence ---

    #[test]
    fn bypass_sequence_emits_proceed() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl).with_overridable(true));
        type_str(&mut c, DEFAULT_BYPASS_SEQUENCE);
        assert_eq!(c.into_sink().take(), vec![Command::Proceed]);
    }

    #[test]
    fn bypass_overrides_non_overridable_page() {
        let mut c = controller(PageConfig::new(WarningKind::SafeBrowsing));
        assert!(!c.config().overridable);
        type_str(&mut c, DEFAULT_BYPASS_SEQUENCE);
        assert_eq!(c.into_sink().take(), vec![Command::Proceed]);
    }

    #[test]
    fn interrupted_bypass_does_not_proceed() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl));
        type_str(&mut c, "badidXa");
        assert_eq!(c.bypass_progress(), 1);
        assert!(c.into_sink().commands().is_empty());
    }

    #[test]
    fn bypass_works_twice_in_one_session() {
        let mut c = controller(PageConfig::new(WarningKind::Ssl));
        type_str(&mut c, DEFAULT_BYPASS_SEQUENCE);
        type_str(&mut c, DEFAULT_BYPASS_SEQUENCE);
        assert_eq!(
            c.into_sink().take(),
            vec![Command::Proceed, Command::Proceed]
        );
    }

    // --- Wiring presentation flags ---

    #[test]
    fn visual_mode_is_selected_from_config() {
        let c = controller(PageConfig::new(WarningKind::Ssl).with_bad_clock(true));
        assert_eq!(c.wiring().visual_mode, VisualMode::BadClock);

        let c = controller(PageConfig::new(WarningKind::CaptivePortal));
        assert_eq!(c.wiring().visual_mode, VisualMode::CaptivePortal);
    }

    #[test]
    fn error_code_shown_for_ssl_only() {
        assert!(controller(PageConfig::new(WarningKind::Ssl)).wiring().show_error_code);
        assert!(
            controller(PageConfig::new(WarningKind::Ssl).with_bad_clock(true))
                .wiring()
                .show_error_code
        );
        assert!(
            !controller(PageConfig::new(WarningKind::SafeBrowsing))
                .wiring()
                .show_error_code
        );
    }

    #[test]
    fn final_paragraph_hidden_for_non_overridable_non_ssl() {
        assert!(
            controller(PageConfig::new(WarningKind::SafeBrowsing))
                .wiring()
                .hide_final_paragraph
        );
        assert!(
            !controller(PageConfig::new(WarningKind::Ssl))
                .wiring()
                .hide_final_paragraph
        );
        assert!(
            !controller(PageConfig::new(WarningKind::SafeBrowsing).with_overridable(true))
                .wiring()
                .hide_final_paragraph
        );
    }

    #[test]
    fn small_proceed_link_for_overridable_ssl() {
        assert!(
            controller(PageConfig::new(WarningKind::Ssl).with_overridable(true))
                .wiring()
                .small_proceed_link
        );
        assert!(
            !controller(PageConfig::new(WarningKind::CaptivePortal).with_overridable(true))
                .wiring()
                .small_proceed_link
        );
    }

    // --- Configuration boundary ---

    #[test]
    fn from_source_rejects_unknown_kind() {
        use pageward_core::config::{keys, ConfigError, StaticConfig};

        let source = StaticConfig::new()
            .with_string(keys::TYPE, "MYSTERY")
            .with_boolean(keys::OVERRIDABLE, true)
            .with_boolean(keys::HIDE_PRIMARY_BUTTON, false);
        let result = InterstitialController::from_source(
            &source,
            Controls::all(),
            RecordingSink::new(),
        );
        assert!(matches!(result, Err(ConfigError::UnknownKind(k)) if k == "MYSTERY"));
    }

    // --- Ordering ---

    #[test]
    fn commands_are_emitted_in_event_order() {
        let mut c = controller(
            PageConfig::new(WarningKind::Ssl)
                .with_overridable(true)
                .with_error_code("ERR_CERT_DATE_INVALID"),
        );

        click(&mut c, Control::LearnMoreLink);
        click(&mut c, Control::DetailsButton);
        type_str(&mut c, DEFAULT_BYPASS_SEQUENCE);
        click(&mut c, Control::PrimaryButton);

        assert_eq!(
            c.into_sink().take(),
            vec![
                Command::OpenHelpCenter,
                Command::ShowMoreSection,
                Command::Proceed,
                Command::DontProceed,
            ]
        );
    }
}
