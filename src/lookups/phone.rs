use super::{get_json, trim_base, LookupData, LookupFetcher, LookupKind, PhoneCheck, Query};
use crate::config::Credential;
use crate::error::LookupError;
use async_trait::async_trait;
use serde::Deserialize;

pub const NUMVERIFY_API_BASE: &str = "http://apilayer.net";

pub struct PhoneFetcher {
    base_url: String,
    access_key: Credential,
    client: reqwest::Client,
}

/// numverify answers HTTP 200 with `{"success": false, "error": ...}` on a bad
/// key; that body has no `valid` field and fails to parse as this.
#[derive(Debug, Deserialize)]
struct NumverifyResponse {
    valid: bool,
    #[serde(default)]
    country_name: Option<String>,
}

impl PhoneFetcher {
    pub fn new(base_url: Option<String>, access_key: Credential) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| NUMVERIFY_API_BASE.to_string()),
            access_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn request_target(&self, query: &Query) -> String {
        format!(
            "{}/api/validate?access_key={}&number={}",
            trim_base(&self.base_url),
            urlencoding::encode(self.access_key.expose()),
            query.encoded()
        )
    }
}

#[async_trait]
impl LookupFetcher for PhoneFetcher {
    fn kind(&self) -> LookupKind {
        LookupKind::Phone
    }

    async fn fetch(&self, query: &Query) -> Result<LookupData, LookupError> {
        let url = self.request_target(query);
        let response: NumverifyResponse = get_json(&self.client, &url).await?;

        Ok(LookupData::Phone(PhoneCheck {
            valid: response.valid,
            country_name: response.country_name.unwrap_or_default(),
        }))
    }
}
