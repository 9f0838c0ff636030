//! The once-per-second display session.
//!
//! Owns exactly the Secret/Code/Countdown triple the `/2fa` pages render.
//! The session schedules nothing itself: the presentation layer drives it
//! with one `tick` per second and stops calling when the view is torn
//! down — that is the whole cancellation contract. Between ticks the last
//! snapshot is readable through `state`/`current_code`/`seconds_remaining`.
//!
//! A bad secret never escapes as an error: it becomes the `Invalid`
//! sentinel state and the session keeps ticking, so a user still typing
//! gets a live code the moment the input becomes decodable.

use serde::Serialize;

use crate::totp::clock::Clock;
use crate::totp::core;
use crate::totp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Display state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What the code slot should show.
///
/// The engine never bakes in placeholder text — mapping `Empty` and
/// `Invalid` to strings is a presentation choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    /// No secret provided yet (or no tick has happened yet).
    Empty,
    /// The provided secret is not decodable Base32.
    Invalid,
    /// A live code for the current time step.
    Code(CurrentCode),
}

/// Snapshot returned by each tick.
#[derive(Debug, Clone, Serialize)]
pub struct Tick {
    pub state: DisplayState,
    /// Seconds until the next step boundary, `[1, period]`.
    pub seconds_remaining: u32,
    /// Elapsed fraction of the current window, `[0, 1)`.
    pub progress: f64,
    /// Time-step counter at this tick.
    pub step: u64,
    /// True when this tick crossed a step boundary since the previous one.
    pub rolled_over: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Tick-driven TOTP display session.
pub struct CodeSession {
    config: TotpConfig,
    raw_secret: String,
    key: Result<Vec<u8>, TotpError>,
    last_step: Option<u64>,
    current: Option<CurrentCode>,
    last_remaining: u32,
}

impl CodeSession {
    /// Create a session with no secret yet.
    pub fn new(config: TotpConfig) -> Self {
        Self {
            config,
            raw_secret: String::new(),
            key: Err(TotpError::new(TotpErrorKind::EmptySecret, "No secret provided")),
            last_step: None,
            current: None,
            last_remaining: config.period,
        }
    }

    pub fn config(&self) -> &TotpConfig {
        &self.config
    }

    /// The raw secret as last supplied (for echoing back under the ring).
    pub fn raw_secret(&self) -> &str {
        &self.raw_secret
    }

    /// Replace the secret input. Decodes immediately; a failure only moves
    /// the session into a sentinel state. The cached code is dropped so the
    /// next tick derives against the new key.
    pub fn set_secret(&mut self, raw: &str) {
        self.raw_secret = raw.to_string();
        self.key = core::decode_secret(raw);
        if let Err(e) = &self.key {
            if e.kind == TotpErrorKind::InvalidSecret {
                log::warn!("2fa: rejected secret input: {}", e);
            }
        }
        self.last_step = None;
        self.current = None;
    }

    /// Evaluate one tick at an explicit instant.
    ///
    /// Countdown and step come straight from `unix_seconds`; the code is
    /// re-derived only when the step differs from the previous tick (the
    /// displayed code is a pure function of secret and step, so reusing it
    /// within a window is exact, not approximate).
    pub fn tick_at(&mut self, unix_seconds: u64) -> Tick {
        let step = core::time_step_at(unix_seconds, self.config.period);
        let remaining = core::seconds_remaining_at(unix_seconds, self.config.period);
        let progress = core::progress_fraction_at(unix_seconds, self.config.period);
        let rolled_over = self.last_step.is_some_and(|prev| step != prev);

        if self.last_step != Some(step) {
            self.current = self.key.as_ref().ok().map(|key| CurrentCode {
                code: core::generate_code(key, step, self.config.digits, self.config.algorithm),
                step,
            });
            self.last_step = Some(step);
            if rolled_over {
                log::debug!("2fa: time step advanced to {}", step);
            }
        }
        self.last_remaining = remaining;

        Tick {
            state: self.state(),
            seconds_remaining: remaining,
            progress,
            step,
            rolled_over,
        }
    }

    /// Evaluate one tick, reading the instant once from the injected clock.
    pub fn tick(&mut self, clock: &impl Clock) -> Tick {
        self.tick_at(clock.unix_seconds())
    }

    /// Current display state (as of the last tick).
    pub fn state(&self) -> DisplayState {
        match (&self.key, &self.current) {
            (Err(e), _) if e.kind == TotpErrorKind::EmptySecret => DisplayState::Empty,
            (Err(_), _) => DisplayState::Invalid,
            (Ok(_), Some(code)) => DisplayState::Code(code.clone()),
            // Decodable secret but no tick yet: nothing to show.
            (Ok(_), None) => DisplayState::Empty,
        }
    }

    /// The live code string, if any.
    pub fn current_code(&self) -> Option<&str> {
        match (&self.key, &self.current) {
            (Ok(_), Some(code)) => Some(&code.code),
            _ => None,
        }
    }

    /// The live code split for display ("123 456").
    pub fn display_code(&self) -> Option<String> {
        self.current_code().map(core::format_code_display)
    }

    /// Seconds remaining as of the last tick, `[1, period]`.
    pub fn seconds_remaining(&self) -> u32 {
        self.last_remaining
    }

    /// Clipboard payload: the unspaced code, or `None` while a sentinel
    /// state is showing (the pages refuse to copy placeholder text).
    pub fn copy_value(&self) -> Option<String> {
        self.current_code().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totp::clock::FixedClock;

    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn session() -> CodeSession {
        CodeSession::new(TotpConfig::default())
    }

    // ── Sentinel states ──────────────────────────────────────────

    #[test]
    fn starts_empty() {
        let mut s = session();
        assert_eq!(s.state(), DisplayState::Empty);
        let tick = s.tick_at(59);
        assert_eq!(tick.state, DisplayState::Empty);
        assert!(s.copy_value().is_none());
    }

    #[test]
    fn invalid_secret_keeps_ticking() {
        let mut s = session();
        s.set_secret("!!!not-base32!!!");
        for t in [0u64, 1, 29, 30, 31] {
            let tick = s.tick_at(t);
            assert_eq!(tick.state, DisplayState::Invalid);
            assert!((1..=30).contains(&tick.seconds_remaining));
        }
        assert!(s.copy_value().is_none());
        assert!(s.display_code().is_none());
    }

    #[test]
    fn correction_is_picked_up() {
        let mut s = session();
        s.set_secret("JBSWY3DPEHPK3PX1"); // mistyped: '1' is outside the alphabet
        assert_eq!(s.tick_at(10).state, DisplayState::Invalid);
        s.set_secret("JBSWY3DPEHPK3PXP");
        let tick = s.tick_at(11);
        assert!(matches!(tick.state, DisplayState::Code(_)));
    }

    #[test]
    fn clearing_returns_to_empty() {
        let mut s = session();
        s.set_secret("JBSWY3DPEHPK3PXP");
        s.tick_at(10);
        assert!(s.current_code().is_some());
        s.set_secret("");
        assert_eq!(s.state(), DisplayState::Empty);
        assert!(s.current_code().is_none());
    }

    // ── Step boundary behaviour (spec scenario at unix 59 / 60) ──

    #[test]
    fn boundary_scenario() {
        let mut s = session();
        s.set_secret(RFC_SECRET);

        let before = s.tick_at(59);
        assert_eq!(before.step, 1);
        assert_eq!(before.seconds_remaining, 1);
        assert_eq!(s.current_code(), Some("287082"));

        let after = s.tick_at(60);
        assert_eq!(after.step, 2);
        assert_eq!(after.seconds_remaining, 30);
        assert!(after.rolled_over);
        assert_eq!(s.current_code(), Some("359152"));
    }

    #[test]
    fn boundary_scenario_spec_secret() {
        // Same scenario with the spec's example secret: only the step and
        // countdown are asserted exactly, the code just has to change.
        let mut s = session();
        s.set_secret("JBSWY3DPEHPK3PXP");
        let before = s.tick_at(59);
        let code_before = s.current_code().unwrap().to_string();
        let after = s.tick_at(60);
        let code_after = s.current_code().unwrap().to_string();
        assert_eq!((before.step, before.seconds_remaining), (1, 1));
        assert_eq!((after.step, after.seconds_remaining), (2, 30));
        assert_ne!(code_before, code_after);
    }

    #[test]
    fn code_cached_within_a_window() {
        let mut s = session();
        s.set_secret(RFC_SECRET);
        let t1 = s.tick_at(30);
        let t2 = s.tick_at(45);
        assert_eq!(t1.step, t2.step);
        assert!(!t2.rolled_over);
        assert_eq!(t1.state, t2.state);
        // Step 1 of the RFC secret is the Appendix D counter-1 vector.
        assert_eq!(s.current_code(), Some("287082"));
    }

    #[test]
    fn first_tick_is_not_a_rollover() {
        let mut s = session();
        s.set_secret(RFC_SECRET);
        let tick = s.tick_at(60);
        assert!(!tick.rolled_over);
        assert_eq!(tick.step, 2);
    }

    // ── Clock injection ──────────────────────────────────────────

    #[test]
    fn ticks_through_injected_clock() {
        let clock = FixedClock::new(59);
        let mut s = session();
        s.set_secret(RFC_SECRET);

        let before = s.tick(&clock);
        assert_eq!(before.seconds_remaining, 1);
        assert_eq!(s.current_code(), Some("287082"));

        clock.advance(1);
        let after = s.tick(&clock);
        assert!(after.rolled_over);
        assert_eq!(after.seconds_remaining, 30);
        assert_eq!(s.current_code(), Some("359152"));
    }

    // ── Read surface & formatting ────────────────────────────────

    #[test]
    fn read_surface_between_ticks() {
        let mut s = session();
        s.set_secret(RFC_SECRET);
        s.tick_at(42);
        assert_eq!(s.seconds_remaining(), 18);
        assert_eq!(s.current_code(), Some("287082"));
        assert_eq!(s.display_code().as_deref(), Some("287 082"));
        assert_eq!(s.copy_value().as_deref(), Some("287082"));
    }

    #[test]
    fn copy_value_has_no_spaces() {
        let mut s = session();
        s.set_secret(RFC_SECRET);
        s.tick_at(59);
        let copied = s.copy_value().unwrap();
        assert!(!copied.contains(' '));
        assert_eq!(copied.len(), 6);
    }

    #[test]
    fn eight_digit_config() {
        let cfg = TotpConfig::new(8, 30, Algorithm::Sha1).unwrap();
        let mut s = CodeSession::new(cfg);
        s.set_secret(RFC_SECRET);
        s.tick_at(59);
        // RFC 6238 Appendix B, T=59, SHA-1, 8 digits.
        assert_eq!(s.current_code(), Some("94287082"));
        assert_eq!(s.display_code().as_deref(), Some("9428 7082"));
    }

    // ── Serialization for the frontend ───────────────────────────

    #[test]
    fn tick_serializes() {
        let mut s = session();
        s.set_secret(RFC_SECRET);
        let tick = s.tick_at(59);
        let json = serde_json::to_string(&tick).unwrap();
        assert!(json.contains("\"seconds_remaining\":1"));
        assert!(json.contains("287082"));
    }
}
