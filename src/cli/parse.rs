//! Offline decklist parsing.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use super::output;
use crate::core::domain::{parse_decklist, LineItem};
use crate::error::Result;

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Card")]
    name: String,
    #[tabled(rename = "Set")]
    set: String,
}

impl From<&LineItem> for LineRow {
    fn from(line: &LineItem) -> Self {
        Self {
            quantity: line.quantity.get(),
            name: line.name.clone(),
            set: line.set.clone().unwrap_or_else(|| "*".into()),
        }
    }
}

/// Parse a decklist file and show the recognized lines. Makes no requests.
pub fn execute(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    let lines = parse_decklist(&text);

    if output::is_json() {
        let items: Vec<serde_json::Value> = lines
            .iter()
            .map(|line| {
                json!({
                    "name": line.name,
                    "set": line.set,
                    "quantity": line.quantity.get(),
                })
            })
            .collect();
        output::json_output(json!({
            "command": "parse",
            "cards": lines.iter().map(|l| u64::from(l.quantity.get())).sum::<u64>(),
            "lines": items,
        }));
        return Ok(());
    }

    if lines.is_empty() {
        output::warning("Decklist has no card lines");
        return Ok(());
    }

    let cards: u64 = lines.iter().map(|l| u64::from(l.quantity.get())).sum();
    output::section(&format!("{} ({} lines, {} cards)", file.display(), lines.len(), cards));
    let rows: Vec<LineRow> = lines.iter().map(LineRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
