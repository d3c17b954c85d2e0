//! Backend price proxy client.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use url::Url;

use super::dto::ProxyPrices;
use crate::adapter::outbound::http::{build_client, get_json, parse_base_url, HttpPolicy};
use crate::core::domain::Price;
use crate::error::{ConfigError, SourceError};
use crate::port::SecondarySource;

const SOURCE: &str = "price-proxy";
const USER_AGENT: &str = concat!("bigdeck/", env!("CARGO_PKG_VERSION"));

/// Secondary source backed by the price proxy's `/api/prices` route.
pub struct PriceProxyClient {
    http: HttpClient,
    base_url: Url,
    policy: HttpPolicy,
}

impl PriceProxyClient {
    /// Create a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, policy: HttpPolicy) -> Result<Self, ConfigError> {
        let base_url = parse_base_url("secondary.base_url", base_url)?;
        Ok(Self {
            http: build_client(&policy, USER_AGENT),
            base_url,
            policy,
        })
    }

    fn prices_url(&self, name: &str, set: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "prices", name, set]);
        }
        url
    }
}

#[async_trait]
impl SecondarySource for PriceProxyClient {
    async fn get_secondary(&self, name: &str, set: &str) -> Result<Price, SourceError> {
        // The proxy prices one printing; it has no wildcard route.
        if set.is_empty() {
            return Err(SourceError::NotFound);
        }
        let url = self.prices_url(name, set);
        let body: ProxyPrices = get_json(&self.http, url.as_str(), &self.policy, SOURCE).await?;
        body.secondary()
    }

    fn source_name(&self) -> &'static str {
        SOURCE
    }
}
