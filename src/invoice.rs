//! Invoice data model.
//!
//! Totals are never stored: [`InvoiceItem::total`] and
//! [`Invoice::total_amount`] recompute from quantities and unit prices every
//! time, so a caller-supplied `total` / `totalAmount` in the JSON input is
//! simply ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::InvoiceError;
use crate::money;

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    /// Read from the literal JSON digits, so no binary float rounding.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// `quantity × unit_price`; `None` only if the product overflows.
    pub fn total(&self) -> Option<Decimal> {
        money::line_total(self.quantity, self.unit_price)
    }
}

/// A client plus an ordered list of items. Item order is presentation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn new(
        client_name: impl Into<String>,
        client_email: impl Into<String>,
        client_address: impl Into<String>,
        items: Vec<InvoiceItem>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            client_email: client_email.into(),
            client_address: client_address.into(),
            items,
        }
    }

    /// Parse an invoice from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, InvoiceError> {
        serde_json::from_str(json).map_err(|e| InvoiceError::InvalidInvoice(e.to_string()))
    }

    /// Exact sum of all item totals.
    pub fn total_amount(&self) -> Result<Decimal, InvoiceError> {
        money::sum_line_totals(self.items.iter().map(|i| (i.quantity, i.unit_price))).ok_or_else(
            || InvoiceError::InvalidInvoice("invoice amounts exceed decimal range".to_string()),
        )
    }

    /// Precondition for composition: at least one item, and totals that fit.
    ///
    /// Client fields are not checked; empty strings are valid.
    pub fn validate(&self) -> Result<Decimal, InvoiceError> {
        if self.items.is_empty() {
            return Err(InvoiceError::InvalidInvoice(
                "invoice has no items".to_string(),
            ));
        }
        self.total_amount()
    }
}

/// `"items": null` behaves the same as a missing list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
