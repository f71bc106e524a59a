use super::{get_json, trim_base, LookupData, LookupFetcher, LookupKind, Query, Verse};
use crate::error::LookupError;
use async_trait::async_trait;
use serde::Deserialize;

pub const BIBLE_API_BASE: &str = "https://bible-api.com";

pub struct VerseFetcher {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct BibleApiPassage {
    text: String,
    #[serde(default)]
    reference: Option<String>,
}

impl VerseFetcher {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| BIBLE_API_BASE.to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn request_target(&self, query: &Query) -> String {
        format!("{}/{}", trim_base(&self.base_url), query.encoded())
    }
}

#[async_trait]
impl LookupFetcher for VerseFetcher {
    fn kind(&self) -> LookupKind {
        LookupKind::Verse
    }

    async fn fetch(&self, query: &Query) -> Result<LookupData, LookupError> {
        let url = self.request_target(query);
        let passage: BibleApiPassage = get_json(&self.client, &url).await?;

        Ok(LookupData::Verse(Verse {
            text: passage.text,
            reference: passage.reference,
        }))
    }
}
