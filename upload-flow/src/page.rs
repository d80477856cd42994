//! In-memory page tree the controller renders into.
//!
//! Elements are addressed by id, the same way the browser script looked them up
//! with `getElementById`. The tree is the only application state: panel
//! visibility, progress, rendered summaries and figures all live here.

use std::collections::BTreeMap;
use tracing::{debug, error, info};

use crate::panel::Panel;
use crate::request::{SelectedFile, UploadRequest};

/// Element ids the controller relies on
pub mod ids {
    pub const UPLOAD_FORM: &str = "upload-form";
    pub const UPLOAD_TAB: &str = "upload-tab";
    pub const SUMMARY_TAB: &str = "summary-tab";
    pub const FIGURES_TAB: &str = "figures-tab";
    pub const PROGRESS_CONTAINER: &str = "progress-container";
    pub const PROGRESS_BAR: &str = "progress-bar";
    pub const SUMMARY_TEXT: &str = "summary-text";
    pub const FIGURES_CONTAINER: &str = "figures-container";
    pub const DOWNLOAD_BUTTON: &str = "download-button";
    pub const FIGURES_TAB_BUTTON: &str = "figures-tab-btn";
    pub const UPLOAD_BUTTON: &str = "uploadButton";
    pub const FILE_INPUT: &str = "fileInput";

    pub const CONTRACT: [&str; 12] = [
        UPLOAD_FORM,
        UPLOAD_TAB,
        SUMMARY_TAB,
        FIGURES_TAB,
        PROGRESS_CONTAINER,
        PROGRESS_BAR,
        SUMMARY_TEXT,
        FIGURES_CONTAINER,
        DOWNLOAD_BUTTON,
        FIGURES_TAB_BUTTON,
        UPLOAD_BUTTON,
        FILE_INPUT,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
    InlineBlock,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
            Display::InlineBlock => "inline-block",
        }
    }
}

/// Content inserted under an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Image { src: String, alt: String, max_width: Option<String> },
    DownloadLink { href: String, label: String },
    Section { children: Vec<Node> },
}

impl Node {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Node::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Paragraph { text: text.into() }
    }

    /// Visit this node and every descendant, depth first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        if let Node::Section { children } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: String,
    pub display: Display,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(id: impl Into<String>, display: Display) -> Self {
        Self {
            id: id.into(),
            display,
            text: String::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.display != Display::None
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Drop text and inserted children, keeping attributes and visibility.
    pub fn clear(&mut self) {
        self.text.clear();
        self.children.clear();
    }

    /// Every image below this element, in document order.
    pub fn images(&self) -> Vec<&Node> {
        let mut images = Vec::new();
        for child in &self.children {
            child.walk(&mut |node| {
                if matches!(node, Node::Image { .. }) {
                    images.push(node);
                }
            });
        }
        images
    }
}

/// State of the upload form inputs
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub file: Option<SelectedFile>,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: BTreeMap<String, Element>,
    form: UploadForm,
    alerts: Vec<String>,
}

impl Page {
    /// Empty page with no elements at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Default layout: every contract element present, upload panel showing.
    pub fn standard() -> Self {
        let mut page = Self::empty();
        for id in ids::CONTRACT {
            let display = match id {
                ids::UPLOAD_TAB => Display::Block,
                ids::SUMMARY_TAB
                | ids::FIGURES_TAB
                | ids::PROGRESS_CONTAINER
                | ids::DOWNLOAD_BUTTON
                | ids::FIGURES_TAB_BUTTON => Display::None,
                _ => Display::Block,
            };
            page.insert(Element::new(id, display));
        }
        if let Some(bar) = page.element_mut(ids::PROGRESS_BAR) {
            bar.set_attribute("width", "0%");
        }
        if let Some(button) = page.element_mut(ids::DOWNLOAD_BUTTON) {
            button.text = "Download Summary".to_string();
        }
        page
    }

    pub fn insert(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Contract ids that are absent from this page.
    pub fn check_contract(&self) -> Vec<&'static str> {
        ids::CONTRACT
            .into_iter()
            .filter(|id| !self.elements.contains_key(*id))
            .collect()
    }

    pub fn set_display(&mut self, id: &str, display: Display) {
        match self.elements.get_mut(id) {
            Some(element) => element.display = display,
            None => error!("Element not found: {}", id),
        }
    }

    /// Hide every panel, then reveal `panel`.
    pub fn show_panel(&mut self, panel: Panel) {
        for other in Panel::ALL {
            self.set_display(other.element_id(), Display::None);
        }
        self.set_display(panel.element_id(), Display::Block);
        info!("Switching to tab: {}", panel);
    }

    /// Switch by raw tab id. Unknown ids are logged and leave the page untouched.
    pub fn show_tab(&mut self, tab_id: &str) -> bool {
        match tab_id.parse::<Panel>() {
            Ok(panel) => {
                self.show_panel(panel);
                true
            }
            Err(e) => {
                error!("Cannot switch tabs: {}", e);
                false
            }
        }
    }

    pub fn visible_panels(&self) -> Vec<Panel> {
        Panel::ALL
            .into_iter()
            .filter(|panel| {
                self.element(panel.element_id())
                    .is_some_and(Element::is_visible)
            })
            .collect()
    }

    /// The visible panel, if exactly one is showing.
    pub fn active_panel(&self) -> Option<Panel> {
        match self.visible_panels().as_slice() {
            [panel] => Some(*panel),
            _ => None,
        }
    }

    pub fn set_progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        match self.elements.get_mut(ids::PROGRESS_BAR) {
            Some(bar) => bar.set_attribute("width", format!("{}%", percent)),
            None => error!("Element not found: {}", ids::PROGRESS_BAR),
        }
    }

    pub fn progress(&self) -> Option<&str> {
        self.element(ids::PROGRESS_BAR)
            .and_then(|bar| bar.attribute("width"))
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        debug!("File selected: {}", file.file_name);
        self.form.file = Some(file);
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.form.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.form.fields.push((name, value)),
        }
    }

    /// Snapshot the form as a submission payload, if a file is selected.
    pub fn form_data(&self) -> Option<UploadRequest> {
        let file = self.form.file.clone()?;
        Some(UploadRequest {
            file,
            fields: self.form.fields.clone(),
        })
    }

    /// Record a blocking alert shown to the user.
    pub fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("Alert: {}", message);
        self.alerts.push(message);
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_page_satisfies_contract() {
        let page = Page::standard();
        assert!(page.check_contract().is_empty());
        assert_eq!(page.active_panel(), Some(Panel::Upload));
        assert_eq!(page.progress(), Some("0%"));
    }

    #[test]
    fn show_tab_leaves_exactly_one_panel_visible() {
        let mut page = Page::standard();
        for panel in Panel::ALL {
            assert!(page.show_tab(panel.element_id()));
            assert_eq!(page.visible_panels(), vec![panel]);
        }
    }

    #[test]
    fn unknown_tab_is_ignored() {
        let mut page = Page::standard();
        page.show_panel(Panel::Summary);

        assert!(!page.show_tab("history-tab"));
        assert_eq!(page.visible_panels(), vec![Panel::Summary]);
    }

    #[test]
    fn missing_contract_ids_are_reported() {
        let mut page = Page::standard();
        page.remove(ids::UPLOAD_BUTTON);
        page.remove(ids::FIGURES_CONTAINER);

        let missing = page.check_contract();
        assert_eq!(missing, vec![ids::FIGURES_CONTAINER, ids::UPLOAD_BUTTON]);
    }

    #[test]
    fn form_data_requires_a_file() {
        let mut page = Page::standard();
        page.set_field("language", "en");
        assert!(page.form_data().is_none());

        page.select_file(SelectedFile::new("paper.pdf", vec![0u8; 4]));
        page.set_field("language", "de");
        let request = page.form_data().unwrap();
        assert_eq!(request.file.file_name, "paper.pdf");
        assert_eq!(request.fields, vec![("language".to_string(), "de".to_string())]);
    }

    #[test]
    fn images_are_found_inside_sections() {
        let mut element = Element::new("figures-container", Display::Block);
        element.children.push(Node::Section {
            children: vec![
                Node::heading(3, "doc Figures"),
                Node::Image {
                    src: "/static/figures/a.png".to_string(),
                    alt: "Extracted figure".to_string(),
                    max_width: None,
                },
            ],
        });

        assert_eq!(element.images().len(), 1);
    }
}
