pub mod joke;
pub mod phone;
pub mod verse;
pub mod weather;

use crate::error::LookupError;
use crate::surface::{DisplayState, Tone};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Trimmed user input driving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Placeholder for lookups that take no input.
    pub fn blank() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The query percent-encoded for interpolation into a URL.
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Verse,
    Phone,
    Weather,
    Joke,
}

impl LookupKind {
    pub fn takes_input(self) -> bool {
        self.validation_message().is_some()
    }

    pub fn label(self) -> &'static str {
        match self {
            LookupKind::Verse => "verse",
            LookupKind::Phone => "phone",
            LookupKind::Weather => "weather",
            LookupKind::Joke => "joke",
        }
    }

    /// Shown for blank input; `None` for lookups that take no input.
    pub fn validation_message(self) -> Option<&'static str> {
        match self {
            LookupKind::Verse => Some("Please enter valid verse or passage!"),
            LookupKind::Phone => Some("Please enter a valid phone number!"),
            LookupKind::Weather => Some("Please enter a valid city"),
            LookupKind::Joke => None,
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            LookupKind::Verse => "Please enter valid verse or passage!",
            LookupKind::Phone => "Not a valid phone number",
            LookupKind::Weather => "Invalid city, please try again!",
            LookupKind::Joke => "Failed to fetch the joke",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verse {
    pub text: String,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhoneCheck {
    pub valid: bool,
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weather {
    pub temp_c: f64,
    pub condition_text: Option<String>,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joke {
    pub setup: String,
    pub punchline: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupData {
    Verse(Verse),
    Phone(PhoneCheck),
    Weather(Weather),
    Joke(Joke),
}

impl LookupData {
    pub fn to_display(&self, query: &Query) -> DisplayState {
        match self {
            LookupData::Verse(verse) => DisplayState {
                headline: verse.text.clone(),
                detail: verse.reference.clone(),
                icon_url: None,
                tone: Tone::Normal,
            },
            LookupData::Phone(check) => DisplayState {
                headline: check.valid.to_string(),
                detail: Some(check.country_name.clone()),
                icon_url: None,
                tone: Tone::Normal,
            },
            LookupData::Weather(weather) => DisplayState {
                headline: format!("{}: {}°C", query.as_str(), weather.temp_c),
                detail: weather.condition_text.clone(),
                icon_url: Some(absolute_icon_url(&weather.icon_url)),
                tone: Tone::Normal,
            },
            LookupData::Joke(joke) => DisplayState {
                headline: joke.setup.clone(),
                detail: Some(joke.punchline.clone()),
                icon_url: None,
                tone: Tone::Normal,
            },
        }
    }
}

/// Weather icons come back protocol-relative (`//cdn...`).
fn absolute_icon_url(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{}", icon)
    } else {
        icon.to_string()
    }
}

#[async_trait]
pub trait LookupFetcher: Send + Sync {
    fn kind(&self) -> LookupKind;
    async fn fetch(&self, query: &Query) -> Result<LookupData, LookupError>;
}

/// One GET, status check, then parse the body as `T`.
///
/// The body is read as text first so a shape mismatch surfaces as
/// `MalformedResponse` rather than a transport error.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, LookupError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::RequestFailed { status });
    }

    let body = response.text().await?;
    debug!(bytes = body.len(), "lookup response received");
    Ok(serde_json::from_str(&body)?)
}

pub(crate) fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims() {
        let query = Query::parse("  john 3:16 \n").unwrap();
        assert_eq!(query.as_str(), "john 3:16");
    }

    #[test]
    fn test_query_rejects_blank() {
        assert!(Query::parse("").is_none());
        assert!(Query::parse("   ").is_none());
        assert!(Query::parse("\t\n").is_none());
    }

    #[test]
    fn test_query_encoding() {
        let query = Query::parse("john 3:16&x=1").unwrap();
        assert_eq!(query.encoded(), "john%203%3A16%26x%3D1");
    }

    #[test]
    fn test_verse_display_is_verbatim() {
        let data = LookupData::Verse(Verse {
            text: "For God so loved the world...".to_string(),
            reference: None,
        });
        let state = data.to_display(&Query::parse("john 3:16").unwrap());
        assert_eq!(state.headline, "For God so loved the world...");
        assert_eq!(state.tone, Tone::Normal);
    }

    #[test]
    fn test_phone_display() {
        let data = LookupData::Phone(PhoneCheck {
            valid: false,
            country_name: String::new(),
        });
        let state = data.to_display(&Query::parse("123").unwrap());
        assert_eq!(state.headline, "false");
        assert_eq!(state.detail.as_deref(), Some(""));
    }

    #[test]
    fn test_weather_display() {
        let data = LookupData::Weather(Weather {
            temp_c: 21.0,
            condition_text: Some("Sunny".to_string()),
            icon_url: "//cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
        });
        let state = data.to_display(&Query::parse(" London ").unwrap());
        assert_eq!(state.headline, "London: 21°C");
        assert_eq!(
            state.icon_url.as_deref(),
            Some("https://cdn.weatherapi.com/weather/64x64/day/113.png")
        );
    }

    #[test]
    fn test_weather_display_fractional_temp() {
        let data = LookupData::Weather(Weather {
            temp_c: -3.5,
            condition_text: None,
            icon_url: "https://example.com/icon.png".to_string(),
        });
        let state = data.to_display(&Query::parse("Oslo").unwrap());
        assert_eq!(state.headline, "Oslo: -3.5°C");
        assert_eq!(state.icon_url.as_deref(), Some("https://example.com/icon.png"));
    }

    #[test]
    fn test_joke_display() {
        let data = LookupData::Joke(Joke {
            setup: "Why?".to_string(),
            punchline: "Because.".to_string(),
        });
        let state = data.to_display(&Query::blank());
        assert_eq!(state.headline, "Why?");
        assert_eq!(state.detail.as_deref(), Some("Because."));
    }

    #[test]
    fn test_kind_messages() {
        assert!(LookupKind::Weather.takes_input());
        assert!(!LookupKind::Joke.takes_input());
        assert_eq!(
            LookupKind::Weather.validation_message(),
            Some("Please enter a valid city")
        );
        assert_eq!(LookupKind::Joke.validation_message(), None);
        assert_eq!(
            LookupKind::Phone.failure_message(),
            "Not a valid phone number"
        );
    }

    #[test]
    fn test_trim_base() {
        assert_eq!(trim_base("https://bible-api.com/"), "https://bible-api.com");
        assert_eq!(trim_base("https://bible-api.com"), "https://bible-api.com");
    }
}
