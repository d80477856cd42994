use std::path::PathBuf;

use clap::Parser;
use upload_flow::{ResponseSchema, UploadConfig};

#[derive(Debug, Parser)]
#[command(
    name = "paper-summarizer",
    version,
    about = "Upload a paper to the summarization backend and show the summary and figures"
)]
pub struct Cli {
    /// Paper to upload (usually a PDF)
    pub file: Option<PathBuf>,

    /// Extra form field sent with the file, as NAME=VALUE (repeatable)
    #[arg(short = 'F', long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Upload endpoint, overrides SUMMARIZER_ENDPOINT
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Expected reply shape: auto, single or multi. Overrides SUMMARIZER_SCHEMA
    #[arg(long)]
    pub schema: Option<ResponseSchema>,

    /// Write an HTML snapshot of the rendered panels to this path
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Print the validated reply as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Layer command-line overrides on top of the environment configuration.
    pub fn apply(&self, mut config: UploadConfig) -> UploadConfig {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(schema) = self.schema {
            config.schema = schema;
        }
        config
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("field name cannot be empty".to_string());
    }
    Ok((name.to_string(), value.to_string()))
}
