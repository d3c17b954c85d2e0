//! Scryfall REST client.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;
use url::Url;

use super::dto::{ScryfallCard, ScryfallList};
use crate::adapter::outbound::http::{build_client, get_json, parse_base_url, HttpPolicy};
use crate::core::domain::PrintRecord;
use crate::error::{ConfigError, SourceError};
use crate::port::CatalogSource;

const SOURCE: &str = "scryfall";
const USER_AGENT: &str = concat!("bigdeck/", env!("CARGO_PKG_VERSION"));

/// Catalog adapter backed by the Scryfall API.
///
/// Only the first page of a print search is read; Scryfall pages hold 175
/// cards, which covers every reprinted card.
pub struct ScryfallClient {
    http: HttpClient,
    base_url: Url,
    policy: HttpPolicy,
}

impl ScryfallClient {
    /// Create a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, policy: HttpPolicy) -> Result<Self, ConfigError> {
        let base_url = parse_base_url("catalog.base_url", base_url)?;
        Ok(Self {
            http: build_client(&policy, USER_AGENT),
            base_url,
            policy,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn search_url(&self, name: &str) -> Url {
        let mut url = self.endpoint(&["cards", "search"]);
        url.query_pairs_mut()
            .append_pair("q", &format!("!\"{name}\""))
            .append_pair("unique", "prints")
            .append_pair("order", "released")
            .append_pair("dir", "desc");
        url
    }

    fn named_url(&self, name: &str, set: &str) -> Url {
        let mut url = self.endpoint(&["cards", "named"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("exact", name);
            if !set.is_empty() {
                query.append_pair("set", &set.to_lowercase());
            }
        }
        url
    }
}

#[async_trait]
impl CatalogSource for ScryfallClient {
    async fn get_prints(&self, name: &str) -> Result<Vec<PrintRecord>, SourceError> {
        let url = self.search_url(name);
        let list = match get_json::<ScryfallList>(&self.http, url.as_str(), &self.policy, SOURCE).await
        {
            Ok(list) => list,
            Err(SourceError::NotFound) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        if list.has_more {
            debug!(name, "Print search has more pages, using the first");
        }
        Ok(list.data.into_iter().map(PrintRecord::from).collect())
    }

    async fn get_print(&self, name: &str, set: &str) -> Result<PrintRecord, SourceError> {
        let url = self.named_url(name, set);
        let card: ScryfallCard = get_json(&self.http, url.as_str(), &self.policy, SOURCE).await?;
        Ok(card.into())
    }

    fn source_name(&self) -> &'static str {
        SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(base: &str) -> ScryfallClient {
        let policy = HttpPolicy {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(1),
            retry_max_attempts: 1,
            retry_backoff: Duration::ZERO,
        };
        ScryfallClient::new(base, policy).unwrap()
    }

    #[test]
    fn search_url_quotes_exact_name() {
        let url = client("https://api.scryfall.com").search_url("jace, the mind sculptor");
        assert_eq!(url.path(), "/cards/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "!\"jace, the mind sculptor\"".into())));
        assert!(pairs.contains(&("unique".into(), "prints".into())));
        assert!(pairs.contains(&("order".into(), "released".into())));
    }

    #[test]
    fn named_url_lowercases_set_and_omits_wildcard() {
        let client = client("http://localhost:8080/scryfall/");
        let url = client.named_url("sol ring", "C21");
        assert_eq!(url.path(), "/scryfall/cards/named");
        assert_eq!(url.query(), Some("exact=sol+ring&set=c21"));

        let url = client.named_url("sol ring", "");
        assert_eq!(url.query(), Some("exact=sol+ring"));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let policy = HttpPolicy {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(1),
            retry_max_attempts: 1,
            retry_backoff: Duration::ZERO,
        };
        assert!(ScryfallClient::new("not a url", policy).is_err());
    }
}
