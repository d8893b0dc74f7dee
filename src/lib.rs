//! # invoice-forge – invoice → PDF pipeline
//!
//! This crate turns a validated [`Invoice`] into a single-template PDF. The
//! pipeline stages are:
//!
//! 1. **Compose** – invoice → ordered layout blocks ([`composer`], [`block`])
//! 2. **Layout** – measure text and tables into bands ([`layout`], [`fonts`])
//! 3. **Paginate** – stack bands onto A4 pages ([`pagination`])
//! 4. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! Money is exact decimal arithmetic throughout ([`money`]); the date on the
//! document comes from an injected [`Clock`].

pub mod block;
pub mod clock;
pub mod composer;
pub mod delivery;
pub mod error;
pub mod fonts;
pub mod invoice;
pub mod layout;
pub mod layout_config;
pub mod money;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod samples;

// Re-exports for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use delivery::DocumentIntent;
pub use error::InvoiceError;
pub use invoice::{Invoice, InvoiceItem};
pub use pipeline::{generate_invoice_pdf, generate_pdf_from_invoice, PipelineConfig, RenderedInvoice};
