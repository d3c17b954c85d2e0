#![allow(dead_code)]

pub mod http;

use std::sync::Arc;

use bigdeck::application::pricing::{PriceService, PricingConfig};
use bigdeck::port::NoInventory;
use bigdeck::testkit::source::{ScriptedCatalog, ScriptedSecondary};

/// Price service over scripted sources with the default pricing config.
pub fn service(catalog: ScriptedCatalog, secondary: ScriptedSecondary) -> PriceService {
    service_with(catalog, secondary, PricingConfig::default())
}

pub fn service_with(
    catalog: ScriptedCatalog,
    secondary: ScriptedSecondary,
    config: PricingConfig,
) -> PriceService {
    PriceService::new(
        Arc::new(catalog),
        Arc::new(secondary),
        Arc::new(NoInventory),
        config,
    )
}
