//! Delivery metadata for transport layers.
//!
//! Preview and download produce the same bytes; only the suggested filename
//! and disposition differ.

/// MIME type of every generated document.
pub const CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentIntent {
    /// Shown inline, e.g. in a browser preview pane.
    #[default]
    Preview,
    /// Saved by the user.
    Download,
}

impl DocumentIntent {
    pub fn file_name(self) -> &'static str {
        match self {
            DocumentIntent::Preview => "invoice.pdf",
            DocumentIntent::Download => "Invoice.pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        CONTENT_TYPE
    }

    /// Value for a `Content-Disposition` header.
    pub fn content_disposition(self) -> String {
        let kind = match self {
            DocumentIntent::Preview => "inline",
            DocumentIntent::Download => "attachment",
        };
        format!("{kind}; filename=\"{}\"", self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_differ_by_intent() {
        assert_eq!(DocumentIntent::Preview.file_name(), "invoice.pdf");
        assert_eq!(DocumentIntent::Download.file_name(), "Invoice.pdf");
        assert_eq!(DocumentIntent::Download.content_type(), "application/pdf");
    }

    #[test]
    fn disposition_header() {
        assert_eq!(
            DocumentIntent::Download.content_disposition(),
            "attachment; filename=\"Invoice.pdf\""
        );
        assert!(DocumentIntent::Preview.content_disposition().starts_with("inline"));
    }
}
