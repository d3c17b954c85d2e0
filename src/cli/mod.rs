//! Command-line interface definitions.
//!
//! Defines the `bigdeck` CLI using `clap`: single-card lookups, decklist
//! pricing, offline decklist parsing, and configuration checks.

pub mod check;
pub mod deck;
pub mod output;
pub mod parse;
pub mod price;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Magic: The Gathering card pricing from the catalog and secondary vendor
#[derive(Parser, Debug)]
#[command(name = "bigdeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up the price pair for one card
    Price(PriceArgs),

    /// Price every line of a decklist file
    Deck(DeckArgs),

    /// Parse a decklist file without pricing it
    Parse(ParseArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `bigdeck check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file
    Config,
}

/// Arguments for the `price` subcommand.
#[derive(Parser, Debug)]
pub struct PriceArgs {
    /// Card name
    pub name: String,

    /// Set code; omit for any printing
    #[arg(short, long, default_value = "")]
    pub set: String,
}

/// Arguments for the `deck` subcommand.
#[derive(Parser, Debug)]
pub struct DeckArgs {
    /// Decklist file, one `<qty> <name> [(SET)]` per line
    pub file: PathBuf,
}

/// Arguments for the `parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Decklist file
    pub file: PathBuf,
}
