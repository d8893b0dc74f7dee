//! Sample invoices for testing and demonstration.

use rust_decimal::Decimal;

use crate::invoice::{Invoice, InvoiceItem};

/// One item, the canonical example.
pub fn acme_invoice() -> Invoice {
    Invoice::new(
        "Acme",
        "a@acme.com",
        "1 Main St",
        vec![InvoiceItem::new("Widget", 2, Decimal::new(999, 2))],
    )
}

/// Two items in a fixed order.
pub fn two_item_invoice() -> Invoice {
    Invoice::new(
        "Globex",
        "billing@globex.example",
        "42 Industrial Way",
        vec![
            InvoiceItem::new("Consulting hour", 1, Decimal::new(1000, 2)),
            InvoiceItem::new("Cable", 3, Decimal::new(550, 2)),
        ],
    )
}

/// All client fields empty.
pub fn blank_client_invoice() -> Invoice {
    Invoice::new(
        "",
        "",
        "",
        vec![InvoiceItem::new("Widget", 1, Decimal::new(500, 2))],
    )
}

/// Enough items to overflow onto further pages.
pub fn long_invoice(items: u32) -> Invoice {
    let items = (1..=items)
        .map(|i| InvoiceItem::new(format!("Line item {i}"), i % 5 + 1, Decimal::new(i64::from(i) * 125, 2)))
        .collect();
    Invoice::new("Initech", "ap@initech.example", "4120 Freidrich Ln", items)
}

/// The canonical example in its JSON wire form.
pub fn acme_invoice_json() -> &'static str {
    r#"{
    "clientName": "Acme",
    "clientEmail": "a@acme.com",
    "clientAddress": "1 Main St",
    "items": [
        { "description": "Widget", "quantity": 2, "unitPrice": 9.99 }
    ]
}"#
}
