use std::path::Path;

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::Result;

/// Multipart field the backend reads the uploaded document from
pub const FILE_FIELD: &str = "file";

/// A file picked through the upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = guess_mime_type(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read a file from disk, keeping only its final path component as the name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_mime_type(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// Submission payload: the file plus the other fields of the upload form
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: SelectedFile,
    pub fields: Vec<(String, String)>,
}

impl UploadRequest {
    pub fn new(file: SelectedFile) -> Self {
        Self {
            file,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Encode as multipart form data, file part first.
    pub fn into_form(self) -> Result<Form> {
        let part = Part::bytes(self.file.bytes)
            .file_name(self.file.file_name)
            .mime_str(&self.file.mime_type)?;

        let form = self
            .fields
            .into_iter()
            .fold(Form::new().part(FILE_FIELD, part), |form, (name, value)| {
                form.text(name, value)
            });

        Ok(form)
    }
}
