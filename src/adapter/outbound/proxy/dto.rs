//! Price proxy response body.

use serde::Deserialize;

use crate::core::domain::Price;
use crate::error::SourceError;

/// `GET /api/prices/{name}/{set}` response. Prices are display strings
/// (`"$2.30"` or `"N/A"`).
#[derive(Debug, Deserialize)]
pub struct ProxyPrices {
    #[serde(default)]
    pub tcg: Option<String>,
    #[serde(default, alias = "cardkingdom")]
    pub ck: Option<String>,
}

impl ProxyPrices {
    /// The vendor price. A missing field is unknown; an unparseable one is a
    /// malformed response.
    pub fn secondary(&self) -> Result<Price, SourceError> {
        match self.ck.as_deref() {
            None => Ok(Price::Unknown),
            Some(raw) => Price::parse_display(raw).ok_or(SourceError::MalformedResponse),
        }
    }
}
