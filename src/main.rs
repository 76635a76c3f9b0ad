use clap::Parser;
use env_logger::Env;
use geoadmin_autocomplete::cli::commands::{cmd_bridge, cmd_egid, cmd_fill, cmd_lookup};
use geoadmin_autocomplete::cli::config::{Cli, Commands, load_config, log_filter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Default level from -v, overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or(log_filter(cli.verbose))).init();

    let config = load_config(cli.config.as_deref());
    let endpoint = cli.endpoint.as_deref();

    match cli.command {
        Commands::Lookup { query } => cmd_lookup(&query, endpoint, &config)?,
        Commands::Fill { query, pick } => cmd_fill(&query, pick, endpoint, &config)?,
        Commands::Egid {
            street,
            postal_code,
            locality,
        } => cmd_egid(&street, &postal_code, &locality, endpoint, &config)?,
        Commands::Bridge => cmd_bridge(endpoint, &config)?,
    }

    Ok(())
}
