//! Response header profiles
//!
//! A deployment picks one or more profiles plus optional custom headers.
//! They are flattened once at startup into a [`HeaderSet`] that is appended
//! to every response after the file-serving logic has set its own headers.

use crate::error::StartupError;
use hyper::header::{HeaderName, HeaderValue};
use hyper::Response;
use serde::{Deserialize, Serialize};

const NO_CACHE: &[(&str, &str)] = &[
    ("Cache-Control", "no-store, no-cache, must-revalidate"),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
    ("Access-Control-Allow-Origin", "*"),
];

const NO_CACHE_MAX_AGE: &[(&str, &str)] = &[
    ("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
    ("Access-Control-Allow-Origin", "*"),
];

const EMBEDDABLE: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    ("X-Frame-Options", "ALLOWALL"),
    ("Content-Security-Policy", "frame-ancestors *"),
];

/// Named, ordered group of response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HeaderProfile {
    /// Disable browser caching and allow any origin
    NoCache,
    /// Same as `NoCache` with an explicit `max-age=0`
    NoCacheMaxAge,
    /// Allow the assets to be framed and fetched from any origin
    Embeddable,
}

impl HeaderProfile {
    pub const fn headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::NoCache => NO_CACHE,
            Self::NoCacheMaxAge => NO_CACHE_MAX_AGE,
            Self::Embeddable => EMBEDDABLE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NoCache => "no_cache",
            Self::NoCacheMaxAge => "no_cache_max_age",
            Self::Embeddable => "embeddable",
        }
    }
}

/// Extra header configured verbatim by the deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomHeader {
    pub name: String,
    pub value: String,
}

/// Validated, flattened list of headers appended to every response
#[derive(Debug, Clone, Default)]
pub struct HeaderSet {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderSet {
    /// Flatten profiles (in order) followed by custom headers.
    ///
    /// Identical name/value pairs contributed by several profiles are kept
    /// once, at their first position.
    pub fn build(profiles: &[HeaderProfile], custom: &[CustomHeader]) -> Result<Self, StartupError> {
        let mut set = Self::default();

        let profile_pairs = profiles.iter().flat_map(|p| p.headers().iter().copied());
        let custom_pairs = custom.iter().map(|h| (h.name.as_str(), h.value.as_str()));

        for (name, value) in profile_pairs.chain(custom_pairs) {
            set.push(name, value)?;
        }

        Ok(set)
    }

    fn push(&mut self, name: &str, value: &str) -> Result<(), StartupError> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| StartupError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| StartupError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let duplicate = self
            .entries
            .iter()
            .any(|(n, v)| *n == header_name && *v == header_value);
        if !duplicate {
            self.entries.push((header_name, header_value));
        }
        Ok(())
    }

    /// Append every header to the response.
    ///
    /// Uses append semantics: headers already present on the response are
    /// left in place and keep their position.
    pub fn apply<B>(&self, response: &mut Response<B>) {
        let headers = response.headers_mut();
        for (name, value) in &self.entries {
            headers.append(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
