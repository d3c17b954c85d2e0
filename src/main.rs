use bigdeck::cli::output::{self, OutputConfig};
use bigdeck::cli::{check, deck, parse, price, CheckCommand, Cli, Commands};
use bigdeck::infrastructure::config::settings::Config;
use clap::Parser;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    config.init_logging();
    debug!(config = %cli.config.display(), "bigdeck starting");

    let result = match &cli.command {
        Commands::Price(args) => price::execute(&config, args).await,
        Commands::Deck(args) => deck::execute(&config, &args.file).await,
        Commands::Parse(args) => parse::execute(&args.file),
        Commands::Check(CheckCommand::Config) => check::execute_config(&cli.config, &config),
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
