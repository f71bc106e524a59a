use super::{get_json, trim_base, Joke, LookupData, LookupFetcher, LookupKind, Query};
use crate::error::LookupError;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;

pub const JOKE_API_BASE: &str = "https://official-joke-api.appspot.com";

pub struct JokeFetcher {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RandomJoke {
    setup: String,
    punchline: String,
}

impl JokeFetcher {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| JOKE_API_BASE.to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn request_target(&self) -> String {
        format!("{}/random_joke", trim_base(&self.base_url))
    }

    pub async fn fetch_joke(&self) -> Result<Joke, LookupError> {
        let joke: RandomJoke = get_json(&self.client, &self.request_target()).await?;
        Ok(Joke {
            setup: joke.setup,
            punchline: joke.punchline,
        })
    }
}

/// Fetch `count` jokes one after another and hand each to `on_joke` as soon
/// as it arrives, with its position in the run.
///
/// The first failure stops the run; jokes delivered before it stay delivered.
/// Returns how many jokes were delivered.
pub async fn fetch_jokes_in_order<F>(
    fetcher: &JokeFetcher,
    count: usize,
    mut on_joke: F,
) -> Result<usize, LookupError>
where
    F: FnMut(usize, &Joke),
{
    let jokes = stream::iter(0..count).then(move |_| fetcher.fetch_joke());
    futures::pin_mut!(jokes);

    let mut delivered = 0;
    while let Some(joke) = jokes.try_next().await? {
        on_joke(delivered, &joke);
        delivered += 1;
    }
    Ok(delivered)
}

/// Console rendering used by `lookuptui joke`.
pub fn format_numbered(index: usize, joke: &Joke) -> String {
    format!("{}: {}\n{}\n===========", index + 1, joke.setup, joke.punchline)
}

#[async_trait]
impl LookupFetcher for JokeFetcher {
    fn kind(&self) -> LookupKind {
        LookupKind::Joke
    }

    async fn fetch(&self, _query: &Query) -> Result<LookupData, LookupError> {
        Ok(LookupData::Joke(self.fetch_joke().await?))
    }
}
