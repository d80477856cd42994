//! HTML snapshot of the page tree.
//!
//! Backend strings are always escaped; summaries and document names are
//! rendered as text, never as markup.

use crate::page::{Element, Node, Page, ids};
use crate::panel::Panel;

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Page {
    /// Serialize the panels and progress bar as an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        if let Some(progress) = self.element(ids::PROGRESS_CONTAINER) {
            let width = self.progress().unwrap_or("0%");
            html.push_str(&format!(
                r#"<div id="{}" style="display: {}"><div id="progress-bar" style="width: {}"></div></div>"#,
                html_escape(&progress.id),
                progress.display.as_css(),
                html_escape(width)
            ));
            html.push('\n');
        }

        for panel in Panel::ALL {
            if let Some(element) = self.element(panel.element_id()) {
                html.push_str(&panel_html(self, element, panel));
                html.push('\n');
            }
        }

        html
    }
}

fn panel_html(page: &Page, panel_element: &Element, panel: Panel) -> String {
    let inner: Vec<&str> = match panel {
        Panel::Upload => vec![],
        Panel::Summary => vec![ids::SUMMARY_TEXT, ids::DOWNLOAD_BUTTON],
        Panel::Figures => vec![ids::FIGURES_CONTAINER],
    };

    let mut html = format!(
        r#"<div id="{}" class="tab" style="display: {}">"#,
        html_escape(&panel_element.id),
        panel_element.display.as_css()
    );
    html.push_str(&html_escape(&panel_element.text));
    for node in &panel_element.children {
        html.push_str(&node_html(node));
    }

    for id in inner {
        if let Some(element) = page.element(id) {
            html.push_str(&element_html(element));
        }
    }

    html.push_str("</div>");
    html
}

fn element_html(element: &Element) -> String {
    let (tag, attrs) = match element.attribute("href") {
        Some(href) => ("a", format!(r#" href="{}" download"#, html_escape(href))),
        None => ("div", String::new()),
    };

    let mut html = format!(
        r#"<{tag} id="{}" style="display: {}"{attrs}>"#,
        html_escape(&element.id),
        element.display.as_css()
    );
    html.push_str(&html_escape(&element.text));
    for node in &element.children {
        html.push_str(&node_html(node));
    }
    html.push_str(&format!("</{tag}>"));
    html
}

fn node_html(node: &Node) -> String {
    match node {
        Node::Heading { level, text } => {
            let level = (*level).clamp(1, 6);
            format!("<h{level}>{}</h{level}>", html_escape(text))
        }
        Node::Paragraph { text } => format!("<p>{}</p>", html_escape(text)),
        Node::Image {
            src,
            alt,
            max_width,
        } => {
            let style = max_width
                .as_deref()
                .map(|w| format!(r#" style="max-width: {}""#, html_escape(w)))
                .unwrap_or_default();
            format!(
                r#"<img src="{}" alt="{}"{}>"#,
                html_escape(src),
                html_escape(alt),
                style
            )
        }
        Node::DownloadLink { href, label } => format!(
            r#"<a href="{}" download><button>{}</button></a>"#,
            html_escape(href),
            html_escape(label)
        ),
        Node::Section { children } => {
            let inner: String = children.iter().map(node_html).collect();
            format!("<div>{}</div>", inner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Display;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn backend_text_is_not_injected() {
        let mut page = Page::standard();
        page.element_mut(ids::SUMMARY_TEXT)
            .unwrap()
            .children
            .push(Node::heading(3, "<img src=x onerror=alert(1)> Summary"));

        let html = page.to_html();
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt; Summary"));
        assert!(!html.contains("<img src=x"));
    }

    #[test]
    fn element_ids_are_escaped() {
        let mut page = Page::standard();
        page.element_mut(ids::SUMMARY_TEXT).unwrap().id = r#"x" onclick="alert(1)"#.to_string();
        page.element_mut(ids::SUMMARY_TAB).unwrap().id = "<summary>".to_string();

        let html = page.to_html();
        assert!(html.contains(r#"<div id="x&quot; onclick=&quot;alert(1)" style="display: block">"#));
        assert!(html.contains(r#"<div id="&lt;summary&gt;" class="tab""#));
        assert!(!html.contains(r#"onclick="alert"#));
    }

    #[test]
    fn renders_visibility_and_download_target() {
        let mut page = Page::standard();
        page.show_panel(Panel::Summary);
        let button = page.element_mut(ids::DOWNLOAD_BUTTON).unwrap();
        button.set_attribute("href", "/download_summary");
        button.display = Display::Block;

        let html = page.to_html();
        assert!(html.contains(r#"<div id="summary-tab" class="tab" style="display: block">"#));
        assert!(html.contains(r#"<div id="upload-tab" class="tab" style="display: none">"#));
        assert!(html.contains(r#"<a id="download-button" style="display: block" href="/download_summary" download>"#));
    }
}
