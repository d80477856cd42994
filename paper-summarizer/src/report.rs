use upload_flow::{Node, Page, page::ids};

/// Plain-text view of the summary and figures panels for the terminal.
pub fn render_text(page: &Page) -> String {
    let mut out = String::new();

    if let Some(panel) = page.active_panel() {
        out.push_str(&format!("[{}]\n", panel));
    }

    if let Some(summary) = page.element(ids::SUMMARY_TEXT) {
        out.push_str("== Summary ==\n");
        if !summary.text.is_empty() {
            out.push_str(&format!("{}\n", summary.text));
        }
        for node in &summary.children {
            write_node(&mut out, node);
        }
    }

    let download = page
        .element(ids::DOWNLOAD_BUTTON)
        .filter(|button| button.is_visible())
        .and_then(|button| button.attribute("href"));
    if let Some(href) = download {
        out.push_str(&format!("Download: {}\n", href));
    }

    if let Some(figures) = page.element(ids::FIGURES_CONTAINER) {
        out.push_str("== Figures ==\n");
        if !figures.text.is_empty() {
            out.push_str(&format!("{}\n", figures.text));
        }
        for node in &figures.children {
            write_node(&mut out, node);
        }
    }

    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        // The panel headings duplicate the section banners above
        Node::Heading { level: 2, .. } => {}
        Node::Heading { text, .. } => {
            out.push_str(&format!("-- {}\n", text));
        }
        Node::Paragraph { text } => {
            out.push_str(&format!("{}\n", text));
        }
        Node::Image { src, .. } => {
            out.push_str(&format!("  * {}\n", src));
        }
        Node::DownloadLink { href, label } => {
            out.push_str(&format!("{}: {}\n", label, href));
        }
        Node::Section { children } => {
            for child in children {
                write_node(out, child);
            }
        }
    }
}
