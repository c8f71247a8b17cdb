//! Oracle query descriptors.
//!
//! A market's oracle query is a free-form descriptor whose data source URL
//! sits in a parenthesized segment, e.g.
//! `json(https://api.kraken.com/0/public/Ticker?pair=ETHUSD).result.XETHZUSD.c.0`.
//! The segment is the text between the last `(` that has a `)` after it
//! and the first such `)`. A trailing unclosed `(` is ignored.

use std::fmt;

use reqwest::Url;
use serde::Serialize;

use super::error::MarketError;

/// Raw oracle query descriptor as stored on-chain.
///
/// Construction only checks that a parenthesized segment exists. Whether
/// that segment is a usable URL is left to [`OracleQuery::url`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OracleQuery(String);

impl OracleQuery {
    /// Wrap a descriptor string.
    ///
    /// # Errors
    /// Returns [`MarketError::MalformedOracleQuery`] if the descriptor has no
    /// `(` followed by a `)`.
    pub fn new(descriptor: impl Into<String>) -> Result<Self, MarketError> {
        let descriptor = descriptor.into();
        if segment_bounds(&descriptor).is_none() {
            return Err(MarketError::MalformedOracleQuery(descriptor));
        }
        Ok(Self(descriptor))
    }

    /// The full descriptor.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text between the last closed `(` and the following `)`.
    pub fn url_segment(&self) -> &str {
        // Checked in `new`.
        let (open, close) = segment_bounds(&self.0).unwrap_or((0, 0));
        &self.0[open..close]
    }

    /// Parse the parenthesized segment as an absolute http(s) URL.
    ///
    /// # Errors
    /// Returns [`MarketError::MalformedOracleQuery`] if the segment is not a
    /// valid URL with a host.
    pub fn url(&self) -> Result<Url, MarketError> {
        let malformed = || MarketError::MalformedOracleQuery(self.0.clone());

        let url = Url::parse(self.url_segment().trim()).map_err(|_| malformed())?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(malformed());
        }
        Ok(url)
    }

    /// Consume the query, returning the descriptor.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OracleQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OracleQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Byte range of the segment inside the last closed `(` and its following `)`.
fn segment_bounds(s: &str) -> Option<(usize, usize)> {
    // Any `(` after the last `)` is unclosed.
    let last_close = s.rfind(')')?;
    let open = s[..last_close].rfind('(')? + 1;
    let close = open + s[open..].find(')')?;
    Some((open, close))
}
