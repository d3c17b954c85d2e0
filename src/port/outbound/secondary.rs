//! Secondary price source port.

use async_trait::async_trait;

use crate::core::domain::Price;
use crate::error::SourceError;

/// Source of the secondary vendor price for one print.
#[async_trait]
pub trait SecondarySource: Send + Sync {
    /// Secondary price for `(name, set)`; [`Price::Unknown`] when the vendor
    /// has no listing.
    async fn get_secondary(&self, name: &str, set: &str) -> Result<Price, SourceError>;

    /// Source name for logging.
    fn source_name(&self) -> &'static str;
}
