//! Yandex.Speller spell-check provider.
//!
//! The service takes a form-POST and returns correction records with
//! character offsets into the submitted text.

use super::{SpellChecker, SpellCorrection, SpellerError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const SPELLER_URL: &str = "https://speller.yandex.net/services/spellservice.json/checkText";

/// Skip words that look like URLs and file names.
const OPT_IGNORE_URLS: u32 = 4;

/// Default timeout for spell-check requests
const DEFAULT_SPELLER_TIMEOUT: Duration = Duration::from_secs(10);

/// Yandex.Speller provider using the `checkText` JSON endpoint.
pub struct YandexSpeller {
    client: Client,
    url: String,
    timeout: Option<Duration>,
}

impl YandexSpeller {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            url: SPELLER_URL.to_string(),
            timeout: Some(DEFAULT_SPELLER_TIMEOUT),
        }
    }

    /// Create a provider against a custom endpoint URL.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_url(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
            timeout: Some(DEFAULT_SPELLER_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for YandexSpeller {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpellChecker for YandexSpeller {
    async fn check(
        &self,
        text: &str,
        languages: &[String],
    ) -> Result<Vec<SpellCorrection>, SpellerError> {
        let lang = languages.join(",");
        let options = OPT_IGNORE_URLS.to_string();
        let form = [
            ("text", text),
            ("lang", lang.as_str()),
            ("options", options.as_str()),
            ("format", "plain"),
        ];

        let mut req = self.client.post(&self.url).form(&form);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                match self.timeout {
                    Some(timeout) => SpellerError::Timeout(timeout),
                    None => SpellerError::Network(e),
                }
            } else {
                SpellerError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpellerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let corrections: Vec<SpellCorrection> = response
            .json()
            .await
            .map_err(|e| SpellerError::Malformed(format!("Failed to parse response: {}", e)))?;

        Ok(corrections)
    }

    fn label(&self) -> &str {
        "Yandex.Speller"
    }
}
