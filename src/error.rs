//! Error taxonomy for the invoice pipeline.

use thiserror::Error;

/// Everything that can stop an invoice from becoming a PDF.
///
/// Either a complete buffer is produced or one of these is returned; there
/// is no partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// The invoice was rejected before any composition work started.
    #[error("invalid invoice: {0}")]
    InvalidInvoice(String),
    /// Layout or serialisation of the composed blocks failed.
    #[error("render failure: {0}")]
    Render(String),
}

impl InvoiceError {
    /// True when the caller supplied bad input (a transport layer should
    /// answer with a 4xx-class response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, InvoiceError::InvalidInvoice(_))
    }
}
