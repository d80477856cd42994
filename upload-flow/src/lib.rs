pub mod config;
pub mod controller;
pub mod error;
pub mod html;
pub mod page;
pub mod panel;
pub mod render;
pub mod request;
pub mod response;
pub mod transport;

// Re-export commonly used types
pub use config::UploadConfig;
pub use controller::{ScheduledSwitch, UploadController, UploadOutcome};
pub use error::{Result, UploadError};
pub use html::html_escape;
pub use page::{Display, Element, Node, Page, UploadForm};
pub use panel::Panel;
pub use render::{RenderReport, resolve_figure};
pub use request::{SelectedFile, UploadRequest};
pub use response::{
    DocumentFigures, DocumentSummary, MultiDocument, ResponseSchema, SingleDocument,
    UploadResponse,
};
pub use transport::{HttpTransport, UploadTransport};
