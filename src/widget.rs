//! The lookup widget: one trigger, one request, one render.

use crate::config::{Credential, WidgetConfig};
use crate::error::LookupError;
use crate::lookups::joke::JokeFetcher;
use crate::lookups::phone::PhoneFetcher;
use crate::lookups::verse::VerseFetcher;
use crate::lookups::weather::WeatherFetcher;
use crate::lookups::{LookupFetcher, LookupKind, Query};
use crate::surface::{DisplayState, DisplaySurface, InputSurface, Tone};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Requesting,
    Rendering,
    ErrorDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Rendered,
    /// Another trigger on the same widget was still in flight.
    Ignored,
}

pub struct LookupWidget {
    fetcher: Box<dyn LookupFetcher>,
    input: Arc<dyn InputSurface>,
    display: Arc<dyn DisplaySurface>,
    phase: Mutex<Phase>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the trigger finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LookupWidget {
    pub fn new(
        fetcher: Box<dyn LookupFetcher>,
        input: Arc<dyn InputSurface>,
        display: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self {
            fetcher,
            input,
            display,
            phase: Mutex::new(Phase::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn kind(&self) -> LookupKind {
        self.fetcher.kind()
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn set_phase(&self, phase: Phase) {
        *self.phase.lock().unwrap_or_else(|p| p.into_inner()) = phase;
    }

    fn show_error(&self, message: &str) {
        self.display.show(DisplayState::failure(message));
        self.set_phase(Phase::ErrorDisplay);
    }

    /// Run one validate, request, render cycle.
    ///
    /// Errors are shown on the display surface and then returned so the
    /// caller can log them. A trigger that arrives while another one is still
    /// waiting on the network is ignored.
    pub async fn handle_trigger(&self) -> Result<TriggerOutcome, LookupError> {
        let kind = self.kind();
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!(widget = kind.label(), "trigger ignored, request in flight");
            return Ok(TriggerOutcome::Ignored);
        };

        self.set_phase(Phase::Validating);
        let mut raw_input = None;
        let query = match kind.validation_message() {
            Some(message) => {
                let raw = self.input.value();
                match Query::parse(&raw) {
                    Some(query) => {
                        raw_input = Some(raw);
                        query
                    }
                    None => {
                        self.show_error(message);
                        return Err(LookupError::EmptyInput);
                    }
                }
            }
            None => Query::blank(),
        };

        self.set_phase(Phase::Requesting);
        info!(widget = kind.label(), query = query.as_str(), "lookup requested");

        match self.fetcher.fetch(&query).await {
            Ok(data) => {
                self.set_phase(Phase::Rendering);
                self.display.show(data.to_display(&query));
                if let Some(raw) = raw_input {
                    self.input.clear_if_unchanged(&raw);
                }
                self.set_phase(Phase::Idle);
                Ok(TriggerOutcome::Rendered)
            }
            Err(e) => {
                warn!(widget = kind.label(), error = %e, "lookup failed");
                self.show_error(kind.failure_message());
                Err(e)
            }
        }
    }

    /// Build a widget from its config entry, resolving credentials from the
    /// environment.
    pub fn from_config(
        config: &WidgetConfig,
        input: Arc<dyn InputSurface>,
        display: Arc<dyn DisplaySurface>,
    ) -> anyhow::Result<Self> {
        Ok(Self::new(create_fetcher(config)?, input, display))
    }
}

pub fn create_fetcher(config: &WidgetConfig) -> anyhow::Result<Box<dyn LookupFetcher>> {
    let fetcher: Box<dyn LookupFetcher> = match config {
        WidgetConfig::Verse(c) => Box::new(VerseFetcher::new(c.base_url.clone())),
        WidgetConfig::Phone(c) => Box::new(PhoneFetcher::new(
            c.base_url.clone(),
            Credential::from_env(&c.access_key_env)?,
        )),
        WidgetConfig::Weather(c) => Box::new(WeatherFetcher::new(
            c.base_url.clone(),
            Credential::from_env(&c.api_key_env)?,
        )),
        WidgetConfig::Joke(c) => Box::new(JokeFetcher::new(c.base_url.clone())),
    };
    Ok(fetcher)
}

/// Placeholder shown before the first trigger.
pub fn initial_display(kind: LookupKind) -> DisplayState {
    let hint = match kind {
        LookupKind::Verse => "Type a verse or passage and press Enter",
        LookupKind::Phone => "Type a phone number and press Enter",
        LookupKind::Weather => "Type a city and press Enter",
        LookupKind::Joke => "Press Enter for a joke",
    };
    DisplayState::message(hint, Tone::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JokeConfig, PhoneConfig, Position, VerseConfig};
    use crate::lookups::{LookupData, Verse};
    use crate::surface::{DisplayCell, TextInput};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::AtomicUsize;

    /// Fetcher that records what it was asked and replays a canned answer.
    struct StubFetcher {
        kind: LookupKind,
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<String>>>,
        status: Option<StatusCode>,
        typed_during_fetch: Option<(TextInput, String)>,
    }

    impl StubFetcher {
        fn ok(kind: LookupKind) -> Self {
            Self {
                kind,
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
                status: None,
                typed_during_fetch: None,
            }
        }

        fn failing(kind: LookupKind, status: StatusCode) -> Self {
            Self {
                status: Some(status),
                ..Self::ok(kind)
            }
        }
    }

    #[async_trait]
    impl LookupFetcher for StubFetcher {
        fn kind(&self) -> LookupKind {
            self.kind
        }

        async fn fetch(&self, query: &Query) -> Result<LookupData, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(query.as_str().to_string());
            if let Some((input, text)) = &self.typed_during_fetch {
                input.set(text);
            }
            if let Some(status) = self.status {
                return Err(LookupError::RequestFailed { status });
            }
            Ok(LookupData::Verse(Verse {
                text: format!("text for {}", query.as_str()),
                reference: None,
            }))
        }
    }

    fn wire(fetcher: StubFetcher) -> (LookupWidget, TextInput, DisplayCell) {
        let input = TextInput::new();
        let display = DisplayCell::new();
        let widget = LookupWidget::new(
            Box::new(fetcher),
            Arc::new(input.clone()),
            Arc::new(display.clone()),
        );
        (widget, input, display)
    }

    #[tokio::test]
    async fn test_blank_input_skips_network() {
        for raw in ["", "   ", "\t \n"] {
            let fetcher = StubFetcher::ok(LookupKind::Weather);
            let calls = fetcher.calls.clone();
            let (widget, input, display) = wire(fetcher);
            input.set(raw);

            let result: std::result::Result<TriggerOutcome, LookupError> =
                widget.handle_trigger().await;

            assert!(matches!(result, Err(LookupError::EmptyInput)));
            assert_eq!(calls.load(Ordering::SeqCst), 0);
            let state = display.snapshot();
            assert_eq!(state.headline, "Please enter a valid city");
            assert!(state.is_error());
            assert_eq!(widget.phase(), Phase::ErrorDisplay);
        }
    }

    #[tokio::test]
    async fn test_success_renders_and_clears_input() {
        let fetcher = StubFetcher::ok(LookupKind::Verse);
        let seen = fetcher.seen.clone();
        let (widget, input, display) = wire(fetcher);
        input.set("  john 3:16  ");

        let outcome = widget.handle_trigger().await.unwrap();

        assert_eq!(outcome, TriggerOutcome::Rendered);
        assert_eq!(seen.lock().unwrap().as_slice(), ["john 3:16"]);
        assert_eq!(display.snapshot().headline, "text for john 3:16");
        assert!(!display.snapshot().is_error());
        assert_eq!(input.value(), "");
        assert_eq!(widget.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_failure_shows_fixed_message_and_propagates() {
        let fetcher = StubFetcher::failing(LookupKind::Phone, StatusCode::INTERNAL_SERVER_ERROR);
        let (widget, input, display) = wire(fetcher);
        display.show(DisplayState {
            headline: "true".to_string(),
            detail: Some("United States".to_string()),
            icon_url: None,
            tone: Tone::Normal,
        });
        input.set("12345");

        let result = widget.handle_trigger().await;

        assert!(matches!(result, Err(LookupError::RequestFailed { .. })));
        let state = display.snapshot();
        assert_eq!(state.headline, "Not a valid phone number");
        assert!(state.detail.is_none());
        assert!(state.is_error());
        // input is left alone so the user can correct it
        assert_eq!(input.value(), "12345");
    }

    #[tokio::test]
    async fn test_text_typed_during_fetch_survives() {
        let input = TextInput::new();
        let display = DisplayCell::new();
        let fetcher = StubFetcher {
            typed_during_fetch: Some((input.clone(), "romans 8".to_string())),
            ..StubFetcher::ok(LookupKind::Verse)
        };
        let widget = LookupWidget::new(
            Box::new(fetcher),
            Arc::new(input.clone()),
            Arc::new(display.clone()),
        );
        input.set("john 3:16");

        widget.handle_trigger().await.unwrap();

        assert_eq!(display.snapshot().headline, "text for john 3:16");
        assert_eq!(input.value(), "romans 8");
    }

    #[tokio::test]
    async fn test_joke_needs_no_input() {
        let fetcher = StubFetcher::ok(LookupKind::Joke);
        let calls = fetcher.calls.clone();
        let (widget, _input, _display) = wire(fetcher);

        assert_eq!(widget.handle_trigger().await.unwrap(), TriggerOutcome::Rendered);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_repeat_trigger_is_idempotent() {
        let fetcher = StubFetcher::ok(LookupKind::Verse);
        let (widget, input, display) = wire(fetcher);

        input.set("psalm 23");
        widget.handle_trigger().await.unwrap();
        let first = display.snapshot();

        input.set("psalm 23");
        widget.handle_trigger().await.unwrap();
        assert_eq!(display.snapshot(), first);
    }

    #[tokio::test]
    async fn test_guard_released_after_error() {
        let fetcher = StubFetcher::ok(LookupKind::Verse);
        let calls = fetcher.calls.clone();
        let (widget, input, _display) = wire(fetcher);

        assert!(widget.handle_trigger().await.is_err());
        input.set("genesis 1:1");
        assert_eq!(widget.handle_trigger().await.unwrap(), TriggerOutcome::Rendered);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_in_flight_guard() {
        let flag = AtomicBool::new(false);
        let first = InFlight::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlight::acquire(&flag).is_none());
        drop(first);
        assert!(InFlight::acquire(&flag).is_some());
    }

    #[test]
    fn test_create_fetcher_without_credentials() {
        let verse = WidgetConfig::Verse(VerseConfig {
            title: "V".to_string(),
            position: Position { row: 0, col: 0 },
            base_url: None,
        });
        assert_eq!(create_fetcher(&verse).unwrap().kind(), LookupKind::Verse);

        let joke = WidgetConfig::Joke(JokeConfig {
            title: "J".to_string(),
            position: Position { row: 0, col: 1 },
            base_url: None,
        });
        assert_eq!(create_fetcher(&joke).unwrap().kind(), LookupKind::Joke);
    }

    #[test]
    fn test_create_fetcher_missing_credential() {
        let phone = WidgetConfig::Phone(PhoneConfig {
            title: "P".to_string(),
            position: Position { row: 0, col: 0 },
            base_url: None,
            access_key_env: "LOOKUPTUI_TEST_NO_SUCH_KEY".to_string(),
        });
        let err = create_fetcher(&phone).err().unwrap();
        assert!(err.to_string().contains("LOOKUPTUI_TEST_NO_SUCH_KEY"));
    }

    #[test]
    fn test_initial_display_is_not_error() {
        assert!(!initial_display(LookupKind::Joke).is_error());
    }
}
