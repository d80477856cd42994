use tracing::{debug, info};

use crate::page::{Display, Node, Page, ids};
use crate::response::{MultiDocument, SingleDocument, UploadResponse};

pub const FIGURE_ALT: &str = "Extracted figure";
pub const NO_FIGURES_TEXT: &str = "No figures found.";
pub const NO_SUMMARY_TEXT: &str = "Summary not available.";
pub const DOWNLOAD_LABEL: &str = "Download Summary";

/// What a render pass put on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub documents: usize,
    pub figures: usize,
}

/// Resolve a figure reference to an image source.
///
/// Absolute URLs and root-relative paths pass through; bare file names are
/// joined onto `static_figures_path`.
pub fn resolve_figure(reference: &str, static_figures_path: &str) -> String {
    let reference = reference.trim();
    if reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with('/')
    {
        return reference.to_string();
    }

    let base = static_figures_path.trim_end_matches('/');
    format!("{}/{}", base, reference)
}

/// Reset summary and figure content left over from an earlier upload.
pub fn clear_results(page: &mut Page) {
    for id in [ids::SUMMARY_TEXT, ids::FIGURES_CONTAINER] {
        if let Some(element) = page.element_mut(id) {
            element.clear();
        }
    }
    if let Some(button) = page.element_mut(ids::DOWNLOAD_BUTTON) {
        button.attributes.remove("href");
        button.display = Display::None;
    }
    page.set_display(ids::FIGURES_TAB_BUTTON, Display::None);
}

pub fn render_response(
    page: &mut Page,
    response: &UploadResponse,
    static_figures_path: &str,
) -> RenderReport {
    let report = match response {
        UploadResponse::Single(doc) => render_single(page, doc, static_figures_path),
        UploadResponse::Multi(docs) => render_multi(page, docs, static_figures_path),
    };

    info!(
        "Rendered {} document(s) with {} figure(s)",
        report.documents, report.figures
    );
    report
}

fn figure_image(src: String) -> Node {
    Node::Image {
        src,
        alt: FIGURE_ALT.to_string(),
        max_width: Some("100%".to_string()),
    }
}

fn render_single(page: &mut Page, doc: &SingleDocument, static_figures_path: &str) -> RenderReport {
    if let Some(summary_text) = page.element_mut(ids::SUMMARY_TEXT) {
        summary_text.text = doc.usable_summary().unwrap_or(NO_SUMMARY_TEXT).to_string();
    }

    if let Some(url) = &doc.pdf_url {
        if let Some(button) = page.element_mut(ids::DOWNLOAD_BUTTON) {
            button.display = Display::Block;
            button.set_attribute("href", url.clone());
        }
    }

    if doc.figures.is_empty() {
        info!("No figures found in response");
        if let Some(container) = page.element_mut(ids::FIGURES_CONTAINER) {
            container.text = NO_FIGURES_TEXT.to_string();
        }
    } else {
        debug!("Figures found, updating figures panel");
        page.set_display(ids::FIGURES_TAB_BUTTON, Display::InlineBlock);
        if let Some(container) = page.element_mut(ids::FIGURES_CONTAINER) {
            container.children.extend(
                doc.figures
                    .iter()
                    .map(|fig| figure_image(resolve_figure(fig, static_figures_path))),
            );
        }
    }

    RenderReport {
        documents: 1,
        figures: doc.figures.len(),
    }
}

fn render_multi(page: &mut Page, docs: &MultiDocument, static_figures_path: &str) -> RenderReport {
    if let Some(summary_text) = page.element_mut(ids::SUMMARY_TEXT) {
        summary_text.children.push(Node::heading(2, "Summaries"));
        for doc in &docs.summaries {
            let mut children = vec![
                Node::heading(3, format!("{} Summary", doc.name)),
                Node::paragraph(doc.summary.clone()),
            ];
            if let Some(href) = &doc.download_link {
                children.push(Node::DownloadLink {
                    href: href.clone(),
                    label: DOWNLOAD_LABEL.to_string(),
                });
            }
            summary_text.children.push(Node::Section { children });
        }
    }

    let figures: usize = docs.figures.iter().map(|d| d.figures.len()).sum();

    if let Some(container) = page.element_mut(ids::FIGURES_CONTAINER) {
        container.children.push(Node::heading(2, "Figures"));
        for doc in &docs.figures {
            let mut children = vec![Node::heading(3, format!("{} Figures", doc.name))];
            children.extend(
                doc.figures
                    .iter()
                    .map(|fig| figure_image(resolve_figure(fig, static_figures_path))),
            );
            container.children.push(Node::Section { children });
        }
        if figures == 0 {
            container.text = NO_FIGURES_TEXT.to_string();
        }
    }

    if figures > 0 {
        page.set_display(ids::FIGURES_TAB_BUTTON, Display::InlineBlock);
    }

    RenderReport {
        documents: docs.summaries.len(),
        figures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{DocumentFigures, DocumentSummary};

    const STATIC: &str = "/static/figures/";

    #[test]
    fn resolves_figure_references() {
        assert_eq!(resolve_figure("fig1.png", STATIC), "/static/figures/fig1.png");
        assert_eq!(
            resolve_figure("https://cdn.example.org/f.png", STATIC),
            "https://cdn.example.org/f.png"
        );
        assert_eq!(
            resolve_figure("/static/figures/figure_1_1.png", STATIC),
            "/static/figures/figure_1_1.png"
        );
        assert_eq!(resolve_figure("a.png", "/assets"), "/assets/a.png");
    }

    #[test]
    fn single_document_without_figures() {
        let mut page = Page::standard();
        let response = UploadResponse::Single(SingleDocument {
            summary: Some("S".to_string()),
            pdf_url: Some("u".to_string()),
            figures: vec![],
        });

        let report = render_response(&mut page, &response, STATIC);

        assert_eq!(report, RenderReport { documents: 1, figures: 0 });
        assert_eq!(page.element(ids::SUMMARY_TEXT).unwrap().text, "S");
        let button = page.element(ids::DOWNLOAD_BUTTON).unwrap();
        assert_eq!(button.attribute("href"), Some("u"));
        assert!(button.is_visible());
        assert_eq!(page.element(ids::FIGURES_CONTAINER).unwrap().text, NO_FIGURES_TEXT);
        assert!(!page.element(ids::FIGURES_TAB_BUTTON).unwrap().is_visible());
    }

    #[test]
    fn single_document_bare_figure_names_use_static_path() {
        let mut page = Page::standard();
        let response = UploadResponse::Single(SingleDocument {
            summary: Some("S".to_string()),
            pdf_url: Some("u".to_string()),
            figures: vec![
                "fig1.png".to_string(),
                "/static/figures/figure_1_1.png".to_string(),
                "http://127.0.0.1:5000/static/figures/f.png".to_string(),
            ],
        });

        render_response(&mut page, &response, STATIC);

        let sources: Vec<&str> = page
            .element(ids::FIGURES_CONTAINER)
            .unwrap()
            .images()
            .into_iter()
            .filter_map(|node| match node {
                Node::Image { src, .. } => Some(src.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            sources,
            vec![
                "/static/figures/fig1.png",
                "/static/figures/figure_1_1.png",
                "http://127.0.0.1:5000/static/figures/f.png",
            ]
        );
    }

    #[test]
    fn sentinel_summary_shows_placeholder() {
        let mut page = Page::standard();
        let response = UploadResponse::Single(SingleDocument {
            summary: Some("Error: No summary generated.".to_string()),
            pdf_url: None,
            figures: vec![],
        });

        render_response(&mut page, &response, STATIC);

        assert_eq!(page.element(ids::SUMMARY_TEXT).unwrap().text, NO_SUMMARY_TEXT);
        assert!(!page.element(ids::DOWNLOAD_BUTTON).unwrap().is_visible());
    }

    #[test]
    fn multi_document_sections() {
        let mut page = Page::standard();
        let response = UploadResponse::Multi(MultiDocument {
            summaries: vec![DocumentSummary {
                name: "doc1".to_string(),
                summary: "text".to_string(),
                download_link: Some("link".to_string()),
            }],
            figures: vec![DocumentFigures {
                name: "doc1".to_string(),
                figures: vec!["fig1.png".to_string()],
            }],
        });

        let report = render_response(&mut page, &response, STATIC);
        assert_eq!(report, RenderReport { documents: 1, figures: 1 });

        let summary = page.element(ids::SUMMARY_TEXT).unwrap();
        assert_eq!(summary.children[0], Node::heading(2, "Summaries"));
        assert_eq!(
            summary.children[1],
            Node::Section {
                children: vec![
                    Node::heading(3, "doc1 Summary"),
                    Node::paragraph("text"),
                    Node::DownloadLink {
                        href: "link".to_string(),
                        label: DOWNLOAD_LABEL.to_string(),
                    },
                ],
            }
        );

        let images = page.element(ids::FIGURES_CONTAINER).unwrap().images();
        assert_eq!(images.len(), 1);
        assert!(matches!(images[0], Node::Image { src, .. } if src == "/static/figures/fig1.png"));
        assert!(page.element(ids::FIGURES_TAB_BUTTON).unwrap().is_visible());
    }

    #[test]
    fn clear_results_drops_previous_render() {
        let mut page = Page::standard();
        let response = UploadResponse::Single(SingleDocument {
            summary: Some("old".to_string()),
            pdf_url: Some("/download_summary".to_string()),
            figures: vec!["/static/figures/a.png".to_string()],
        });
        render_response(&mut page, &response, STATIC);

        clear_results(&mut page);

        assert!(page.element(ids::SUMMARY_TEXT).unwrap().text.is_empty());
        assert!(page.element(ids::FIGURES_CONTAINER).unwrap().children.is_empty());
        assert_eq!(page.element(ids::DOWNLOAD_BUTTON).unwrap().attribute("href"), None);
        assert!(!page.element(ids::FIGURES_TAB_BUTTON).unwrap().is_visible());
    }
}
