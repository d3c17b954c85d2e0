//! Single-card price lookup.

use serde_json::json;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::output;
use super::PriceArgs;
use crate::core::domain::{Price, PricePair, UNKNOWN_PLACEHOLDER};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::pricing::build_price_service;

/// Resolve one card and print its price pair. Ctrl-C cancels the lookup.
pub async fn execute(config: &Config, args: &PriceArgs) -> Result<()> {
    let service = build_price_service(config, None)?;

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let result = service
        .resolve_with_cancel(&args.name, &args.set, &cancel)
        .await;
    watcher.abort();
    let pair = result?;

    info!(name = %args.name, set = %args.set, "Price lookup finished");

    if output::is_json() {
        output::json_output(json!({
            "command": "price",
            "name": args.name,
            "set": args.set,
            "price": pair_json(&pair),
        }));
        return Ok(());
    }

    let title = if args.set.trim().is_empty() {
        args.name.clone()
    } else {
        format!("{} ({})", args.name, args.set.trim().to_uppercase())
    };
    output::section(&title);
    output::field("TCGplayer", format!("{} ({})", pair.tcg(), pair.source().tcg));
    output::field("Card Kingdom", format!("{} ({})", pair.ck(), pair.source().ck));
    output::field("Fetched", pair.fetched_at().format("%Y-%m-%d %H:%M:%S UTC"));
    if !pair.has_any_price() {
        output::warning("No price found for this card");
    }
    Ok(())
}

/// JSON rendering of one pair. Amounts are cent-rounded strings, unknown
/// prices render as `"N/A"` like the text output.
pub(crate) fn pair_json(pair: &PricePair) -> serde_json::Value {
    json!({
        "tcg": price_json(pair.tcg()),
        "ck": price_json(pair.ck()),
        "tcg_source": pair.source().tcg,
        "ck_source": pair.source().ck,
        "fetched_at": pair.fetched_at().to_rfc3339(),
    })
}

fn price_json(price: Price) -> serde_json::Value {
    match price {
        Price::Money(money) => json!(format!("{:.2}", money.round2())),
        Price::Unknown => json!(UNKNOWN_PLACEHOLDER),
    }
}
