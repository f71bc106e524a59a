use super::{get_json, trim_base, LookupData, LookupFetcher, LookupKind, Query, Weather};
use crate::config::Credential;
use crate::error::LookupError;
use async_trait::async_trait;
use serde::Deserialize;

pub const WEATHER_API_BASE: &str = "http://api.weatherapi.com";

pub struct WeatherFetcher {
    base_url: String,
    api_key: Credential,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    icon: String,
    #[serde(default)]
    text: Option<String>,
}

impl WeatherFetcher {
    pub fn new(base_url: Option<String>, api_key: Credential) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| WEATHER_API_BASE.to_string()),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn request_target(&self, query: &Query) -> String {
        format!(
            "{}/v1/current.json?key={}&q={}",
            trim_base(&self.base_url),
            urlencoding::encode(self.api_key.expose()),
            query.encoded()
        )
    }
}

#[async_trait]
impl LookupFetcher for WeatherFetcher {
    fn kind(&self) -> LookupKind {
        LookupKind::Weather
    }

    async fn fetch(&self, query: &Query) -> Result<LookupData, LookupError> {
        let url = self.request_target(query);
        let response: CurrentResponse = get_json(&self.client, &url).await?;

        Ok(LookupData::Weather(Weather {
            temp_c: response.current.temp_c,
            condition_text: response.current.condition.text,
            icon_url: response.current.condition.icon,
        }))
    }
}
