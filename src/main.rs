use std::sync::Arc;

use bytes::Bytes;
use clap::Parser;
use tracing::info;

use form_parse::config::{Cli, Command, Config};
use form_parse::pool::ParsePool;
use form_parse::{bench, form, logging, samples};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let command = Cli::parse().command;

    let config = Config::from_env()?;
    logging::init(&config.logging)?;

    info!("form_parse {}", form_parse::VERSION);
    config.log_summary();

    // Parsing is CPU-bound on pool threads; the runtime only coordinates
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(command, config))
}

async fn async_main(
    command: Command,
    config: Config,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let options = config.parser.parse_options();

    match command {
        Command::Parse { input } => {
            let body = std::fs::read(&input)
                .map_err(|e| format!("failed to read '{}': {}", input.display(), e))?;

            let buffers = config.parser.buffer_pool();
            let map = form::parse_in(&body, options, &buffers);
            info!(path = %input.display(), bytes = body.len(), pairs = map.len(), "parsed");

            println!("{}", serde_json::to_string(&map)?);
        }

        Command::Build { csv } => {
            let body = samples::load_country_body(&csv)?;
            println!("{}", body);
        }

        Command::Bench { csv } => {
            let body = Bytes::from(samples::load_country_body(&csv)?);
            let buffers = Arc::new(config.parser.buffer_pool());
            let pool = ParsePool::new(&config.pool, buffers)?;

            tokio::select! {
                result = bench::run(body, options, &config.bench, &pool) => {
                    let reports = result?;
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down...");
                }
            }

            info!(buffers = ?pool.buffers().stats(), jobs = ?pool.stats(), "final pool stats");
            pool.shutdown();
        }
    }

    Ok(())
}
