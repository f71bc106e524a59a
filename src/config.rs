use crate::lookups::LookupKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default = "default_widgets")]
    pub widgets: Vec<WidgetConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

fn default_tick_rate() -> u64 {
    100
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WidgetConfig {
    Verse(VerseConfig),
    Phone(PhoneConfig),
    Weather(WeatherConfig),
    Joke(JokeConfig),
}

impl WidgetConfig {
    pub fn kind(&self) -> LookupKind {
        match self {
            WidgetConfig::Verse(_) => LookupKind::Verse,
            WidgetConfig::Phone(_) => LookupKind::Phone,
            WidgetConfig::Weather(_) => LookupKind::Weather,
            WidgetConfig::Joke(_) => LookupKind::Joke,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            WidgetConfig::Verse(c) => &c.title,
            WidgetConfig::Phone(c) => &c.title,
            WidgetConfig::Weather(c) => &c.title,
            WidgetConfig::Joke(c) => &c.title,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            WidgetConfig::Verse(c) => c.position,
            WidgetConfig::Phone(c) => c.position,
            WidgetConfig::Weather(c) => c.position,
            WidgetConfig::Joke(c) => c.position,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerseConfig {
    #[serde(default = "default_verse_title")]
    pub title: String,
    pub position: Position,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_verse_title() -> String {
    "Bible Verse".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhoneConfig {
    #[serde(default = "default_phone_title")]
    pub title: String,
    pub position: Position,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_phone_key_env")]
    pub access_key_env: String,
}

fn default_phone_title() -> String {
    "Phone Validator".to_string()
}

fn default_phone_key_env() -> String {
    "NUMVERIFY_ACCESS_KEY".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_title")]
    pub title: String,
    pub position: Position,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_weather_key_env")]
    pub api_key_env: String,
}

fn default_weather_title() -> String {
    "Weather".to_string()
}

fn default_weather_key_env() -> String {
    "WEATHERAPI_KEY".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JokeConfig {
    #[serde(default = "default_joke_title")]
    pub title: String,
    pub position: Position,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_joke_title() -> String {
    "Random Joke".to_string()
}

fn default_widget(kind: LookupKind, position: Position) -> WidgetConfig {
    match kind {
        LookupKind::Verse => WidgetConfig::Verse(VerseConfig {
            title: default_verse_title(),
            position,
            base_url: None,
        }),
        LookupKind::Phone => WidgetConfig::Phone(PhoneConfig {
            title: default_phone_title(),
            position,
            base_url: None,
            access_key_env: default_phone_key_env(),
        }),
        LookupKind::Weather => WidgetConfig::Weather(WeatherConfig {
            title: default_weather_title(),
            position,
            base_url: None,
            api_key_env: default_weather_key_env(),
        }),
        LookupKind::Joke => WidgetConfig::Joke(JokeConfig {
            title: default_joke_title(),
            position,
            base_url: None,
        }),
    }
}

fn default_widgets() -> Vec<WidgetConfig> {
    vec![
        default_widget(LookupKind::Verse, Position { row: 0, col: 0 }),
        default_widget(LookupKind::Phone, Position { row: 0, col: 1 }),
        default_widget(LookupKind::Weather, Position { row: 1, col: 0 }),
        default_widget(LookupKind::Joke, Position { row: 1, col: 1 }),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            widgets: default_widgets(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lookuptui").join("config.toml"))
    }

    /// Load from `path`, falling back to the built-in layout when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// First configured widget of the given kind.
    pub fn find(&self, kind: LookupKind) -> Option<&WidgetConfig> {
        self.widgets.iter().find(|w| w.kind() == kind)
    }

    /// The configured widget of `kind`, or its built-in default.
    pub fn widget_for(&self, kind: LookupKind) -> WidgetConfig {
        self.find(kind)
            .cloned()
            .unwrap_or_else(|| default_widget(kind, Position { row: 0, col: 0 }))
    }
}

/// An API key supplied by the environment. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read the credential from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        let value = std::env::var(var)
            .with_context(|| format!("Environment variable {} is not set", var))?;
        let value = value.trim();
        if value.is_empty() {
            anyhow::bail!("Environment variable {} is empty", var);
        }
        Ok(Self(value.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
