mod cli;
mod report;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upload_flow::{SelectedFile, UploadConfig, UploadController, UploadError};

use crate::cli::Cli;

/// Initialize tracing on stderr, `LOG_FORMAT=json` for machine-readable output
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "paper_summarizer=info,upload_flow=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.apply(UploadConfig::from_env()?);
    info!(
        "Paper summarizer client using {} (schema: {})",
        config.endpoint, config.schema
    );

    let controller = UploadController::http(config);
    controller.attach().await;

    let selected = match &cli.file {
        Some(path) => Some(
            SelectedFile::from_path(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    {
        let page = controller.page();
        let mut page = page.lock().await;
        if let Some(file) = selected {
            page.select_file(file);
        }
        for (name, value) in &cli.fields {
            page.set_field(name.clone(), value.clone());
        }
    }

    let outcome = match controller.upload_file().await {
        Ok(outcome) => outcome,
        Err(UploadError::MissingInput) => {
            for alert in controller.page().lock().await.take_alerts() {
                eprintln!("{}", alert);
            }
            bail!("no file selected");
        }
        Err(e) => {
            error!("Upload did not complete: {}", e);
            return Err(e.into());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.response)?);
    }

    let shown = outcome.settle().await;
    info!("Panels shown: {:?}", shown);

    let page = controller.snapshot().await;
    if !cli.json {
        print!("{}", report::render_text(&page));
    }

    if let Some(path) = &cli.html {
        tokio::fs::write(path, page.to_html())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("HTML snapshot written to {}", path.display());
    }

    Ok(())
}
