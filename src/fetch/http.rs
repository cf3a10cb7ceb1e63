//! Blocking HTTP fetcher.

use super::{Fetcher, RawImage};
use crate::core::config::FetchSettings;
use crate::core::error::FetchError;
use crate::core::types::UrlTemplate;
use log::debug;
use std::io::{self, Read};

/// Upper bound on a response body. Larger bodies are rejected.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Fetches images over HTTP(S) with a fixed `User-Agent` and timeout.
///
/// Only a `200` response counts as success. Redirects are followed by the
/// underlying agent; every other status is reported as
/// [`FetchError::BadStatus`].
pub struct HttpFetcher {
    agent: ureq::Agent,
    settings: FetchSettings,
}

impl HttpFetcher {
    /// Build a fetcher from settings.
    pub fn new(settings: FetchSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(settings.timeout)
            .user_agent(&settings.user_agent)
            .build();
        Self { agent, settings }
    }

    /// The settings this fetcher was built with.
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(FetchError::BadStatus {
                    url: url.to_string(),
                    status,
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(classify_transport(url, &transport))
            }
        };

        // 2xx other than 200 and unfollowed 3xx land here
        if response.status() != 200 {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_BODY_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| {
                if is_timeout(&e) {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Body {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        if bytes.len() as u64 > MAX_BODY_BYTES {
            return Err(FetchError::Body {
                url: url.to_string(),
                reason: format!("response exceeds {} bytes", MAX_BODY_BYTES),
            });
        }

        Ok(bytes)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(FetchSettings::default())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, template: &UrlTemplate, identifier: &str) -> Result<RawImage, FetchError> {
        let url = template.render(identifier)?;
        debug!("Fetching {} from {}", identifier, url);
        let bytes = self.get(&url)?;
        debug!("Fetched {} bytes for {}", bytes.len(), identifier);
        Ok(RawImage::new(url, bytes))
    }
}

fn classify_transport(url: &str, transport: &ureq::Transport) -> FetchError {
    let timed_out = std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .map(is_timeout)
        .unwrap_or(false)
        || transport.to_string().contains("timed out");

    if timed_out {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Connection {
            url: url.to_string(),
            reason: transport.to_string(),
        }
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
