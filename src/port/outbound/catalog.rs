//! Catalog source port.

use async_trait::async_trait;

use crate::core::domain::PrintRecord;
use crate::error::SourceError;

/// Source of print metadata and primary prices.
///
/// Implementations must bound every request with a timeout and report
/// failures as [`SourceError`] kinds rather than transport errors.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All prints of a card, newest first.
    ///
    /// A card the catalog does not know yields an empty list, not an error.
    async fn get_prints(&self, name: &str) -> Result<Vec<PrintRecord>, SourceError>;

    /// One specific print.
    async fn get_print(&self, name: &str, set: &str) -> Result<PrintRecord, SourceError>;

    /// Source name for logging.
    fn source_name(&self) -> &'static str;
}
