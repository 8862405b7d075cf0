use clap::{Arg, Command};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = Command::new("Taxi Star Schema")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds the taxi trip star schema and loads it into the warehouse")
        .subcommand(
            Command::new("build")
                .about("Run the raw trips to star schema pipeline")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("Sets a custom config file"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("build", build_matches)) => {
            let config_path = build_matches
                .get_one::<String>("config")
                .map(|s| s.as_str())
                .unwrap_or("config/warehouse.toml");
            info!(config = config_path, "Starting star schema pipeline");

            match warehouse::run_pipeline(config_path).await {
                Ok(writes) => {
                    for write in &writes {
                        info!(
                            table = %write.table,
                            rows = write.rows,
                            location = %write.location,
                            "Table loaded"
                        );
                    }
                }
                Err(e) => {
                    error!("Star schema pipeline error: {}", e);
                    process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("No subcommand specified. Use --help for usage information.");
            process::exit(1);
        }
    }
}
