// Console session - Login, unit selection and dashboard screens
use crate::application::metric_source::MetricSource;
use crate::application::telemetry_engine::{EngineState, LiveTelemetryEngine};
use crate::domain::credentials::{self, AuthError};
use crate::domain::telemetry::{OverrideField, OverrideInputs};
use crate::domain::unit_selection::{SelectionError, UnitCountSelector};
use crate::infrastructure::config::TelemetrySettings;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Login,
    SelectCount,
    Dashboard,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScreenKind::Login => "login",
            ScreenKind::SelectCount => "unit selection",
            ScreenKind::Dashboard => "dashboard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{operation} is not available on the {current} screen")]
    WrongScreen {
        operation: &'static str,
        current: ScreenKind,
    },
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

enum Screen {
    Login { error: Option<String> },
    SelectCount {
        selector: UnitCountSelector,
        error: Option<String>,
    },
    Dashboard { engine: LiveTelemetryEngine },
}

impl Screen {
    fn kind(&self) -> ScreenKind {
        match self {
            Screen::Login { .. } => ScreenKind::Login,
            Screen::SelectCount { .. } => ScreenKind::SelectCount,
            Screen::Dashboard { .. } => ScreenKind::Dashboard,
        }
    }
}

/// What the rendering layer needs to draw the current screen
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub screen: ScreenKind,
    pub dark_mode: bool,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_state: Option<EngineState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<OverrideInputs>,
}

/// One console session: `Login -> SelectCount -> Dashboard`, no way back
/// except `reset`, which tears the dashboard down.
pub struct ConsoleSession {
    screen: Screen,
    dark_mode: bool,
    settings: TelemetrySettings,
    source: Arc<dyn MetricSource>,
}

impl ConsoleSession {
    pub fn new(settings: TelemetrySettings, source: Arc<dyn MetricSource>) -> Self {
        Self {
            screen: Screen::Login { error: None },
            dark_mode: false,
            settings,
            source,
        }
    }

    #[cfg(test)]
    pub fn screen(&self) -> ScreenKind {
        self.screen.kind()
    }

    #[cfg(test)]
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    pub fn engine(&self) -> Option<&LiveTelemetryEngine> {
        match &self.screen {
            Screen::Dashboard { engine } => Some(engine),
            _ => None,
        }
    }

    fn wrong_screen(&self, operation: &'static str) -> SessionError {
        SessionError::WrongScreen {
            operation,
            current: self.screen.kind(),
        }
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let Screen::Login { error } = &mut self.screen else {
            return Err(self.wrong_screen("login"));
        };

        if let Err(e) = credentials::authenticate(username, password) {
            *error = Some(e.to_string());
            return Err(e.into());
        }

        tracing::info!("Login accepted, moving to unit selection");
        self.screen = Screen::SelectCount {
            selector: UnitCountSelector::new(self.settings.max_units),
            error: None,
        };
        Ok(())
    }

    /// Keystroke in the unit-count field
    pub fn input_unit_count(&mut self, raw: &str) -> Result<(), SessionError> {
        let Screen::SelectCount { selector, error } = &mut self.screen else {
            return Err(self.wrong_screen("unit count input"));
        };

        let result = selector.input(raw);
        record_selection(error, result)
    }

    /// Submits the pending count and, on success, starts the dashboard.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_unit_count(&mut self) -> Result<NonZeroUsize, SessionError> {
        let Screen::SelectCount { selector, error } = &mut self.screen else {
            return Err(self.wrong_screen("unit count submit"));
        };

        let result = selector.submit();
        let unit_count = record_selection(error, result)?;
        self.open_dashboard(unit_count);
        Ok(unit_count)
    }

    /// Types `raw` into the count field and submits it in one step
    pub fn select_unit_count(&mut self, raw: &str) -> Result<NonZeroUsize, SessionError> {
        let Screen::SelectCount { selector, error } = &mut self.screen else {
            return Err(self.wrong_screen("unit count submit"));
        };

        let result = selector.select_count(raw);
        let unit_count = record_selection(error, result)?;
        self.open_dashboard(unit_count);
        Ok(unit_count)
    }

    fn open_dashboard(&mut self, unit_count: NonZeroUsize) {
        let mut engine = LiveTelemetryEngine::new(
            unit_count,
            self.settings.tick_interval(),
            Arc::clone(&self.source),
        );
        engine.start();

        tracing::info!(units = unit_count.get(), "Dashboard opened");
        self.screen = Screen::Dashboard { engine };
    }

    pub fn set_override(&self, field: OverrideField, value: &str) -> Result<(), SessionError> {
        let engine = self
            .engine()
            .ok_or_else(|| self.wrong_screen("override"))?;
        engine.set_override(field, value);
        Ok(())
    }

    /// Discards everything and returns to the login screen, stopping the
    /// dashboard engine if one is running.
    pub fn reset(&mut self) {
        if let Screen::Dashboard { engine } = &mut self.screen {
            engine.stop();
        }

        tracing::info!(from = %self.screen.kind(), "Session reset");
        self.screen = Screen::Login { error: None };
        self.dark_mode = false;
    }

    pub fn view(&self) -> SessionView {
        let mut view = SessionView {
            screen: self.screen.kind(),
            dark_mode: self.dark_mode,
            error: None,
            pending_count: None,
            unit_count: None,
            engine_state: None,
            overrides: None,
        };

        match &self.screen {
            Screen::Login { error } => view.error = error.clone(),
            Screen::SelectCount { selector, error } => {
                view.error = error.clone();
                view.pending_count = Some(selector.pending().to_string());
            }
            Screen::Dashboard { engine } => {
                view.unit_count = Some(engine.unit_count().get());
                view.engine_state = Some(engine.state());
                view.overrides = Some(engine.overrides());
            }
        }

        view
    }
}

/// Keeps the selection form's shown error in step with the last result
fn record_selection<T>(
    error: &mut Option<String>,
    result: Result<T, SelectionError>,
) -> Result<T, SessionError> {
    match result {
        Ok(value) => {
            *error = None;
            Ok(value)
        }
        Err(e) => {
            *error = Some(e.to_string());
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::random_source::ThreadRngSource;
    use std::time::Duration;

    fn session() -> ConsoleSession {
        ConsoleSession::new(TelemetrySettings::default(), Arc::new(ThreadRngSource))
    }

    fn dashboard_session(count: &str) -> ConsoleSession {
        let mut session = session();
        session.login("admin", "password").unwrap();
        session.input_unit_count(count).unwrap();
        session.submit_unit_count().unwrap();
        session
    }

    #[test]
    fn test_starts_on_login_with_defaults() {
        let session = session();
        assert_eq!(session.screen(), ScreenKind::Login);
        assert!(!session.dark_mode());
        assert!(session.engine().is_none());
        assert!(session.view().error.is_none());
    }

    #[test]
    fn test_failed_login_stays_on_login_with_message() {
        let mut session = session();

        let err = session.login("admin1", "password").unwrap_err();
        assert!(matches!(err, SessionError::Auth(AuthError::InvalidUsernameFormat)));
        assert_eq!(session.screen(), ScreenKind::Login);
        assert_eq!(
            session.view().error.as_deref(),
            Some("Username should not contain numbers")
        );

        session.login("admin", "wrong").unwrap_err();
        assert_eq!(
            session.view().error.as_deref(),
            Some("Invalid username or password")
        );
    }

    #[test]
    fn test_login_moves_to_unit_selection() {
        let mut session = session();
        session.login("admin", "password").unwrap();
        assert_eq!(session.screen(), ScreenKind::SelectCount);
        assert_eq!(session.view().pending_count.as_deref(), Some(""));
    }

    #[test]
    fn test_operations_on_wrong_screen_are_rejected() {
        let mut session = session();

        assert!(matches!(
            session.input_unit_count("3"),
            Err(SessionError::WrongScreen { current: ScreenKind::Login, .. })
        ));
        assert!(session.submit_unit_count().is_err());
        assert!(session.set_override(OverrideField::SoakingSetTime, "1").is_err());
        assert_eq!(session.screen(), ScreenKind::Login);

        session.login("admin", "password").unwrap();
        let err = session.login("admin", "password").unwrap_err();
        assert_eq!(err.to_string(), "login is not available on the unit selection screen");
    }

    #[test]
    fn test_selection_errors_are_shown_and_cleared() {
        let mut session = session();
        session.login("admin", "password").unwrap();

        session.input_unit_count("4x").unwrap_err();
        assert_eq!(
            session.view().error.as_deref(),
            Some("Please enter a valid number.")
        );

        session.input_unit_count("").unwrap();
        assert!(session.view().error.is_none());

        let err = session.submit_unit_count().unwrap_err();
        assert!(matches!(err, SessionError::Selection(SelectionError::NonPositive)));
        assert_eq!(session.screen(), ScreenKind::SelectCount);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_starts_dashboard_engine() {
        let session = dashboard_session("3");
        assert_eq!(session.screen(), ScreenKind::Dashboard);

        let view = session.view();
        assert_eq!(view.unit_count, Some(3));
        assert_eq!(view.engine_state, Some(EngineState::Running));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let frame = session.engine().unwrap().frame();
        assert_eq!(frame.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_override_reaches_next_frame() {
        let session = dashboard_session("2");
        session
            .set_override(OverrideField::CirculationSetTime, "45")
            .unwrap();
        assert_eq!(
            session.view().overrides.unwrap().circulation_set_time,
            "45"
        );

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let frame = session.engine().unwrap().frame();
        assert!(frame.units.iter().all(|u| u.circulation_set_time == "45"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_engine_and_returns_to_login() {
        let mut session = dashboard_session("2");
        session.toggle_dark_mode();
        let mut subscription = session.engine().unwrap().subscribe();

        session.reset();

        assert_eq!(session.screen(), ScreenKind::Login);
        assert!(!session.dark_mode());
        assert!(session.engine().is_none());
        assert!(subscription.next().await.is_none());
    }

    #[tokio::test]
    async fn test_select_in_one_step() {
        let mut session = session();
        session.login("admin", "password").unwrap();

        assert!(session.select_unit_count("0").is_err());
        assert_eq!(
            session.view().error.as_deref(),
            Some("Please enter a number greater than 0.")
        );

        let count = session.select_unit_count("5").unwrap();
        assert_eq!(count.get(), 5);
        assert_eq!(session.screen(), ScreenKind::Dashboard);
    }

    #[tokio::test]
    async fn test_default_settings_accept_large_counts() {
        let mut session = session();
        session.login("admin", "password").unwrap();

        let count = session.select_unit_count("100").unwrap();
        assert_eq!(count.get(), 100);
        assert_eq!(session.view().unit_count, Some(100));
    }

    #[tokio::test]
    async fn test_configured_cap_limits_selection() {
        let settings = TelemetrySettings {
            max_units: Some(4),
            ..TelemetrySettings::default()
        };
        let mut session = ConsoleSession::new(settings, Arc::new(ThreadRngSource));
        session.login("admin", "password").unwrap();

        let err = session.select_unit_count("5").unwrap_err();
        assert!(matches!(err, SessionError::Selection(SelectionError::TooMany { max: 4 })));
        assert_eq!(session.screen(), ScreenKind::SelectCount);
    }

    #[test]
    fn test_toggle_dark_mode() {
        let mut session = session();
        assert!(session.toggle_dark_mode());
        assert!(session.view().dark_mode);
        assert!(!session.toggle_dark_mode());
    }
}
