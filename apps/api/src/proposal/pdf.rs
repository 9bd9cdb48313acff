//! Proposal PDF export.
//!
//! Layout and rendering are split: `layout_document` is a pure greedy
//! word-wrap into positioned lines and pages, `render_pdf` only draws what the
//! layout decided. Text is measured in characters, not glyph widths.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::errors::AppError;
use crate::proposal::email::EmailTemplate;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub line_height_mm: f32,
    pub font_size_pt: f32,
    pub max_chars_per_line: usize,
}

impl Default for PdfLayout {
    /// A4 portrait, 20 mm margins, 11 pt Helvetica.
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
            line_height_mm: 6.0,
            font_size_pt: 11.0,
            max_chars_per_line: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Baseline, measured from the bottom of the page as PDF does.
    pub y_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word-wrap of one input line. Words longer than `max_chars` are split
/// across lines; a blank input line yields one empty line.
pub fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        // Only reachable on an empty line: a word that fits was kept above.
        while word.len() > max_chars {
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Places every wrapped line top-down, starting a new page when the next
/// baseline would fall below the bottom margin.
pub fn layout_document(text: &str, layout: &PdfLayout) -> Vec<PageLayout> {
    let top = layout.page_height_mm - layout.margin_mm;
    let mut pages = vec![PageLayout::default()];
    let mut y = top;

    for source_line in text.lines() {
        for line in wrap_line(source_line, layout.max_chars_per_line) {
            if y < layout.margin_mm {
                pages.push(PageLayout::default());
                y = top;
            }
            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine { text: line, y_mm: y });
            }
            y -= layout.line_height_mm;
        }
    }
    pages
}

/// The printable text of a proposal email.
pub fn email_document(template: &EmailTemplate) -> String {
    let mut doc = format!("To: {}\n", template.to);
    if let Some(cc) = template.cc.as_deref().filter(|c| !c.trim().is_empty()) {
        doc.push_str(&format!("Cc: {cc}\n"));
    }
    doc.push_str(&format!("Subject: {}\n\n", template.subject));
    doc.push_str(&template.body);
    doc
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Draws the laid-out pages with the builtin Helvetica font.
pub fn render_pdf(title: &str, pages: &[PageLayout], layout: &PdfLayout) -> Result<Vec<u8>, AppError> {
    let (width, height) = (Mm(layout.page_width_mm), Mm(layout.page_height_mm));
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Pdf(format!("load font: {e}")))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
            layer.use_text(
                line.text.as_str(),
                layout.font_size_pt,
                Mm(layout.margin_mm),
                Mm(line.y_mm),
                &font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::Pdf(format!("write document: {e}")))
}

/// Lays out and renders an email on the blocking pool.
pub async fn render_email_pdf(template: EmailTemplate) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || {
        let layout = PdfLayout::default();
        let pages = layout_document(&email_document(&template), &layout);
        render_pdf(&template.subject, &pages, &layout)
    })
    .await
    .map_err(|e| AppError::Pdf(format!("render task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_max_chars() {
        let text = "Please confirm availability, delivery lead time and warranty terms at your earliest convenience.";
        let lines = wrap_line(text, 30);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 30));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_long_word_is_hard_split() {
        let url = "https://procurement.example/rfqs/0b6f7a52-1b7e-4c43-a55e-9f5a8a2d7c11/proposals";
        let lines = wrap_line(&format!("See {url}"), 20);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.concat().replace(' ', ""), format!("See{url}"));
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let pages = layout_document("Dear team,\n\nThanks.", &PdfLayout::default());
        let texts: Vec<&str> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["Dear team,", "", "Thanks."]);
    }

    #[test]
    fn test_lines_step_down_from_top_margin() {
        let layout = PdfLayout::default();
        let pages = layout_document("one\ntwo", &layout);
        assert_eq!(pages[0].lines[0].y_mm, 277.0);
        assert_eq!(pages[0].lines[1].y_mm, 271.0);
    }

    #[test]
    fn test_page_break_past_bottom_margin() {
        let layout = PdfLayout::default();
        // (277 - 20) / 6 rounds down to 42 steps, so 43 lines fit per page.
        let text = vec!["line"; 50].join("\n");
        let pages = layout_document(&text, &layout);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), 43);
        assert_eq!(pages[1].lines.len(), 7);
        assert!(pages
            .iter()
            .flat_map(|p| &p.lines)
            .all(|l| l.y_mm >= layout.margin_mm));
    }

    #[test]
    fn test_email_document_headers() {
        let doc = email_document(&EmailTemplate {
            to: "sales@lg.example".to_string(),
            cc: Some("buyer@school.example".to_string()),
            subject: "Request for Quotation".to_string(),
            body: "Body".to_string(),
        });
        assert!(doc.starts_with("To: sales@lg.example\nCc: buyer@school.example\nSubject: Request for Quotation\n\nBody"));
    }

    #[tokio::test]
    async fn test_render_produces_pdf_bytes() {
        let bytes = render_email_pdf(EmailTemplate {
            to: "sales@lg.example".to_string(),
            cc: None,
            subject: "Request for Quotation".to_string(),
            body: "Dear LG team,\n\nWe would like a quotation.".to_string(),
        })
        .await
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
