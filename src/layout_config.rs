//! Layout config – the intermediate representation between layout
//! computation and PDF rendering. This is the "frozen" structure that encodes
//! exactly what goes on each page.

use serde::{Deserialize, Serialize};

use crate::error::InvoiceError;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub boxes: Vec<LayoutBox>,
}

/// A positioned rectangle with optional content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Position relative to page top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    pub background_color: Option<[f32; 3]>,
    pub border: Option<BorderStyle>,

    pub text: Option<TextContent>,

    /// Children (nested boxes), also in page coordinates.
    pub children: Vec<LayoutBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub width: f32,
    pub color: [f32; 3],
}

/// Pre-wrapped, pre-aligned text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Baseline offset from the top of the owning box.
    pub baseline: f32,
    pub spans: Vec<TextSpan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    /// X offset within the owning box.
    pub x_offset: f32,
    pub font_size: f32,
    pub bold: bool,
}

impl LayoutConfig {
    /// Create an A4 layout config.
    pub fn a4() -> Self {
        Self {
            title: Self::default_title(),
            // A4: 210mm × 297mm = 595.28 × 841.89 points
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "Invoice".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String, InvoiceError> {
        serde_json::to_string_pretty(self).map_err(|e| InvoiceError::Render(e.to_string()))
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, InvoiceError> {
        serde_json::from_str(json).map_err(|e| InvoiceError::Render(e.to_string()))
    }

    /// All text on every page, in drawing order, one entry per line.
    pub fn text_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for page in &self.pages {
            for lbox in &page.boxes {
                lbox.collect_text_lines(&mut out);
            }
        }
        out
    }
}

impl LayoutBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            background_color: None,
            border: None,
            text: None,
            children: Vec::new(),
        }
    }

    /// Move this box and all of its children down by `dy`.
    pub fn translate_y(&mut self, dy: f32) {
        self.y += dy;
        for child in &mut self.children {
            child.translate_y(dy);
        }
    }

    pub fn collect_text_lines(&self, out: &mut Vec<String>) {
        if let Some(text) = &self.text {
            for line in &text.lines {
                out.push(line.spans.iter().map(|s| s.text.as_str()).collect());
            }
        }
        for child in &self.children {
            child.collect_text_lines(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip_keeps_pages() {
        let mut config = LayoutConfig::a4();
        let mut lbox = LayoutBox::new(36.0, 36.0, 100.0, 20.0);
        lbox.text = Some(TextContent {
            lines: vec![TextLine {
                baseline: 12.0,
                spans: vec![TextSpan {
                    text: "Subtotal".to_string(),
                    x_offset: 0.0,
                    font_size: 12.0,
                    bold: true,
                }],
            }],
        });
        config.pages.push(PageLayout {
            page_index: 0,
            boxes: vec![lbox],
        });

        let parsed = LayoutConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.text_lines(), vec!["Subtotal"]);
    }

    #[test]
    fn missing_title_defaults() {
        let json = r#"{"page_width_pt": 100.0, "page_height_pt": 100.0, "pages": []}"#;
        let config = LayoutConfig::from_json(json).unwrap();
        assert_eq!(config.title, "Invoice");
    }

    #[test]
    fn translate_moves_children() {
        let mut parent = LayoutBox::new(0.0, 10.0, 50.0, 50.0);
        parent.children.push(LayoutBox::new(0.0, 15.0, 10.0, 10.0));
        parent.translate_y(100.0);
        assert_eq!(parent.y, 110.0);
        assert_eq!(parent.children[0].y, 115.0);
    }
}
