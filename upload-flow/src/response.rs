use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, UploadError};

/// Summary text the backend returns when no chunk could be summarized
pub const NO_SUMMARY_SENTINEL: &str = "Error: No summary generated.";

/// Which reply shape to expect from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSchema {
    /// Detect the shape from the fields present
    #[default]
    Auto,
    /// `{summary, pdf_url, figures: [..]}`
    Single,
    /// `{summaries: {..}, download_links: {..}, figures: {..}}`
    Multi,
}

impl FromStr for ResponseSchema {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            other => Err(UploadError::Config(format!(
                "unknown response schema `{}` (expected auto, single or multi)",
                other
            ))),
        }
    }
}

impl fmt::Display for ResponseSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Single => "single",
            Self::Multi => "multi",
        };
        f.write_str(name)
    }
}

/// One summarized paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleDocument {
    pub summary: Option<String>,
    pub pdf_url: Option<String>,
    pub figures: Vec<String>,
}

impl SingleDocument {
    /// The summary, unless it is missing, blank or the backend's failure sentinel.
    pub fn usable_summary(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != NO_SUMMARY_SENTINEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub summary: String,
    pub download_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFigures {
    pub name: String,
    pub figures: Vec<String>,
}

/// Several summarized papers keyed by document name, in reply order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiDocument {
    pub summaries: Vec<DocumentSummary>,
    pub figures: Vec<DocumentFigures>,
}

/// Decoded and validated backend reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum UploadResponse {
    Single(SingleDocument),
    Multi(MultiDocument),
}

impl UploadResponse {
    /// Validate a decoded JSON body against `schema`.
    pub fn from_json(body: &Value, schema: ResponseSchema) -> Result<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| UploadError::malformed("<body>"))?;

        let schema = match schema {
            ResponseSchema::Auto => detect_schema(object),
            explicit => explicit,
        };

        match schema {
            ResponseSchema::Multi => parse_multi(object).map(Self::Multi),
            _ => parse_single(object).map(Self::Single),
        }
    }
}

fn detect_schema(object: &Map<String, Value>) -> ResponseSchema {
    let keyed_figures = object.get("figures").is_some_and(Value::is_object);
    if object.contains_key("summaries") || object.contains_key("download_links") || keyed_figures {
        ResponseSchema::Multi
    } else {
        ResponseSchema::Single
    }
}

fn parse_single(object: &Map<String, Value>) -> Result<SingleDocument> {
    let figures = object
        .get("figures")
        .and_then(Value::as_array)
        .ok_or_else(|| UploadError::malformed("figures"))?
        .iter()
        .map(|fig| {
            fig.as_str()
                .map(str::to_string)
                .ok_or_else(|| UploadError::malformed("figures[]"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SingleDocument {
        summary: object
            .get("summary")
            .and_then(Value::as_str)
            .map(str::to_string),
        pdf_url: object
            .get("pdf_url")
            .and_then(Value::as_str)
            .map(str::to_string),
        figures,
    })
}

fn parse_multi(object: &Map<String, Value>) -> Result<MultiDocument> {
    let summaries = object
        .get("summaries")
        .and_then(Value::as_object)
        .ok_or_else(|| UploadError::malformed("summaries"))?;

    let figures = object
        .get("figures")
        .and_then(Value::as_object)
        .ok_or_else(|| UploadError::malformed("figures"))?;

    let empty = Map::new();
    let links = object
        .get("download_links")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let summaries = summaries
        .iter()
        .map(|(name, text)| {
            let summary = text
                .as_str()
                .ok_or_else(|| UploadError::malformed(format!("summaries.{}", name)))?;
            Ok(DocumentSummary {
                name: name.clone(),
                summary: summary.to_string(),
                download_link: links.get(name).and_then(Value::as_str).map(str::to_string),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let figures = figures
        .iter()
        .map(|(name, refs)| {
            let refs = refs
                .as_array()
                .ok_or_else(|| UploadError::malformed(format!("figures.{}", name)))?;
            let figures = refs
                .iter()
                .map(|fig| {
                    fig.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| UploadError::malformed(format!("figures.{}[]", name)))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(DocumentFigures {
                name: name.clone(),
                figures,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MultiDocument { summaries, figures })
}
