mod adapters;
mod app;
mod cli;
mod core;
mod global_constants;


use anyhow::Result;
use clap::Parser;

use crate::app::MedLabelApp;
use crate::cli::Cli;
use crate::core::models::PipelineSettings;
use crate::core::orchestrators::cancellation_pair;

#[tokio::main]
async fn main() {
    env_logger::init();

    log::info!("[MAIN] Starting med-label-reader");

    if let Err(error) = run().await {
        log::error!("[MAIN] {:#}", error);
        eprintln!("error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut cli = Cli::parse();

    let mut settings = PipelineSettings::load(cli.config.as_deref()).unwrap_or_else(|e| {
        log::warn!("[MAIN] Failed to load settings: {}, using defaults", e);
        PipelineSettings::default()
    });
    cli.apply_overrides(&mut settings);

    let credentials = cli.take_credentials();
    let app = MedLabelApp::build(settings, credentials, cli.run_options())?;

    let (cancellation_handle, cancellation) = cancellation_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("[MAIN] Interrupt received, cancelling batch");
            cancellation_handle.cancel();
        }
    });

    let report = app.run(&cli.images, &cancellation).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", app::render_text_report(&report));
    }

    Ok(())
}
