//! Decklist pricing.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};
use tokio::signal;

use super::output;
use super::price::pair_json;
use crate::core::domain::{parse_decklist, PriceReport, PricedLine};
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::pricing::build_price_service;

#[derive(Tabled)]
struct PricedRow {
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Card")]
    name: String,
    #[tabled(rename = "Set")]
    set: String,
    #[tabled(rename = "TCG")]
    tcg: String,
    #[tabled(rename = "CK")]
    ck: String,
    #[tabled(rename = "CK Source")]
    ck_source: String,
}

impl From<&PricedLine> for PricedRow {
    fn from(priced: &PricedLine) -> Self {
        Self {
            quantity: priced.line.quantity.get(),
            name: priced.line.name.clone(),
            set: if priced.key.is_wildcard() {
                "*".into()
            } else {
                priced.key.set().to_string()
            },
            tcg: priced.pair.tcg().to_string(),
            ck: priced.pair.ck().to_string(),
            ck_source: priced.pair.source().ck.to_string(),
        }
    }
}

/// Parse and price a decklist file. Ctrl-C abandons the outstanding lookups.
pub async fn execute(config: &Config, file: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(file).await?;
    let lines = parse_decklist(&text);
    if lines.is_empty() {
        output::warning("Decklist has no card lines");
        return Ok(());
    }

    let service = build_price_service(config, None)?;
    let report = tokio::select! {
        report = service.price_decklist(lines) => report,
        _ = signal::ctrl_c() => return Err(Error::Cancelled),
    };

    if output::is_json() {
        output::json_output(report_json(&report));
        return Ok(());
    }

    output::section(&format!("{} ({} lines)", file.display(), report.lines.len()));
    let rows: Vec<PricedRow> = report.lines.iter().map(PricedRow::from).collect();
    output::lines(&Table::new(rows).to_string());

    output::section("Totals");
    output::field("TCGplayer", report.totals.tcg_total);
    output::field("Card Kingdom", report.totals.ck_total);
    if report.totals.unpriced > 0 {
        output::warning(&format!(
            "{} line(s) missing at least one price",
            report.totals.unpriced
        ));
    } else {
        output::success("Every line priced");
    }
    Ok(())
}

fn report_json(report: &PriceReport) -> serde_json::Value {
    let lines: Vec<serde_json::Value> = report
        .lines
        .iter()
        .map(|priced| {
            json!({
                "name": priced.line.name,
                "set": priced.key.set(),
                "quantity": priced.line.quantity.get(),
                "price": pair_json(&priced.pair),
            })
        })
        .collect();

    json!({
        "command": "deck",
        "totals": {
            "tcg_total": format!("{:.2}", report.totals.tcg_total.round2()),
            "ck_total": format!("{:.2}", report.totals.ck_total.round2()),
            "unpriced": report.totals.unpriced,
        },
        "lines": lines,
    })
}
