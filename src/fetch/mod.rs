//! Retrieval of raw image bytes.
//!
//! The [`Fetcher`] trait is the network capability the batch runner depends
//! on. [`HttpFetcher`] is the production implementation; tests and embedders
//! can supply their own.

mod http;

pub use http::{HttpFetcher, MAX_BODY_BYTES};

use crate::core::error::FetchError;
use crate::core::types::UrlTemplate;

/// Undecoded bytes of a fetched image.
///
/// The format is not declared; the decoder infers it from the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    /// URL the bytes were retrieved from.
    pub url: String,
    /// Response body.
    pub bytes: Vec<u8>,
}

impl RawImage {
    /// Wrap fetched bytes.
    pub fn new(url: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            bytes,
        }
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Capability to retrieve the bytes for one identifier.
///
/// Implementations issue a single attempt per call: no retries, no caching,
/// and no writes to storage.
pub trait Fetcher: Send + Sync {
    /// Render `template` with `identifier` and fetch the result.
    fn fetch(&self, template: &UrlTemplate, identifier: &str) -> Result<RawImage, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, template: &UrlTemplate, identifier: &str) -> Result<RawImage, FetchError> {
        (**self).fetch(template, identifier)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, template: &UrlTemplate, identifier: &str) -> Result<RawImage, FetchError> {
        (**self).fetch(template, identifier)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    fn fetch(&self, template: &UrlTemplate, identifier: &str) -> Result<RawImage, FetchError> {
        (**self).fetch(template, identifier)
    }
}
