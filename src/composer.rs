//! Document composer – maps one [`Invoice`] onto the fixed invoice template
//! as an ordered list of [`LayoutBlock`]s:
//!
//! 1. header (brand + document type)
//! 2. title
//! 3. customer information and date
//! 4. items table
//! 5. summary table

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::block::{Border, Cell, CellContent, Color, LayoutBlock, Table, TextAlign, TextRun};
use crate::clock::Clock;
use crate::error::InvoiceError;
use crate::invoice::{Invoice, InvoiceItem};
use crate::money::format_currency;

/// Brand shown in the header.
pub const BRAND_LABEL: &str = "TechTools";

/// Document type shown after the brand.
pub const DOCUMENT_LABEL: &str = "Invoice";

/// Space left below every top-level block.
const BLOCK_MARGIN: f32 = 20.0;

/// Padding of the header and customer information cells.
const INFO_PADDING: f32 = 5.0;

const HEADER_BRAND_SIZE: f32 = 24.0;
const HEADER_LABEL_SIZE: f32 = 18.0;
const TITLE_SIZE: f32 = 24.0;

/// Zero-padded `MM/DD/YYYY`.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Compose the invoice template.
///
/// Rejects an invoice without items before building anything. The date is
/// taken from `clock`, never from ambient time.
pub fn compose(invoice: &Invoice, clock: &dyn Clock) -> Result<Vec<LayoutBlock>, InvoiceError> {
    let total = invoice.validate()?;

    Ok(vec![
        header_block(),
        title_block(),
        party_block(invoice, clock.today()),
        items_block(&invoice.items),
        summary_block(total),
    ])
}

fn header_block() -> LayoutBlock {
    let label = TextRun::new()
        .span(BRAND_LABEL, HEADER_BRAND_SIZE, true)
        .span(format!("  |  {DOCUMENT_LABEL}"), HEADER_LABEL_SIZE, true)
        .and_alignment(TextAlign::Left);

    LayoutBlock::Table(
        Table::new(&[1.0])
            .row(vec![Cell::text(label).and_padding(INFO_PADDING)])
            .and_margin_bottom(BLOCK_MARGIN),
    )
}

/// Centered bold heading. The template carries no title text; the block
/// still reserves its line.
fn title_block() -> LayoutBlock {
    LayoutBlock::Text(
        TextRun::new()
            .span("", TITLE_SIZE, true)
            .and_alignment(TextAlign::Center)
            .and_margin_bottom(BLOCK_MARGIN),
    )
}

fn party_block(invoice: &Invoice, today: NaiveDate) -> LayoutBlock {
    // Every field gets its own line, empty or not.
    let customer = Cell::new()
        .and_padding(INFO_PADDING)
        .with(CellContent::Text(TextRun::bold("Customer Information")))
        .with(CellContent::Text(TextRun::plain(invoice.client_name.as_str())))
        .with(CellContent::Text(TextRun::plain(invoice.client_email.as_str())))
        .with(CellContent::Text(TextRun::plain(invoice.client_address.as_str())));

    let date_table = Table::new(&[1.0]).row(vec![Cell::new()
        .and_padding_bottom(INFO_PADDING)
        .with(CellContent::Text(TextRun::bold("Date:")))
        .with(CellContent::Text(TextRun::plain(format_date(today))))]);

    let date = Cell::new()
        .and_padding(INFO_PADDING)
        .with(CellContent::Table(date_table));

    LayoutBlock::Table(
        Table::new(&[1.0, 1.0])
            .row(vec![customer, date])
            .and_margin_bottom(BLOCK_MARGIN),
    )
}

/// Description, quantity and unit price per item, in input order. There is
/// deliberately no line-total column.
fn items_block(items: &[InvoiceItem]) -> LayoutBlock {
    let header = ["Description", "Quantity", "Unit Price"]
        .into_iter()
        .map(|label| {
            Cell::text(TextRun::bold(label))
                .and_background(Color::LIGHT_GRAY)
                .and_border(Border::THIN)
        })
        .collect();

    let mut table = Table::new(&[3.0, 1.0, 1.0])
        .header_row(header)
        .and_margin_bottom(BLOCK_MARGIN);

    for item in items {
        table = table.row(vec![
            bordered(TextRun::plain(item.description.as_str())),
            bordered(TextRun::plain(item.quantity.to_string())),
            bordered(TextRun::plain(format_currency(item.unit_price))),
        ]);
    }

    LayoutBlock::Table(table)
}

/// Subtotal, tax (always zero) and total due.
fn summary_block(total: Decimal) -> LayoutBlock {
    let rows = [
        ("Subtotal", format_currency(total)),
        ("Tax", format_currency(Decimal::ZERO)),
        ("Total Due", format_currency(total)),
    ];

    let table = rows
        .into_iter()
        .fold(Table::new(&[2.0, 1.0]), |table, (label, value)| {
            table.row(vec![bordered(TextRun::bold(label)), bordered(TextRun::plain(value))])
        })
        .and_margin_bottom(BLOCK_MARGIN);

    LayoutBlock::Table(table)
}

fn bordered(run: TextRun) -> Cell {
    Cell::text(run).and_border(Border::THIN)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Padding, Row, DEFAULT_CELL_PADDING};
    use crate::clock::FixedClock;
    use rust_decimal_macros::dec;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
    }

    fn acme() -> Invoice {
        Invoice::new(
            "Acme",
            "a@acme.com",
            "1 Main St",
            vec![InvoiceItem::new("Widget", 2, dec!(9.99))],
        )
    }

    fn table(block: &LayoutBlock) -> &Table {
        match block {
            LayoutBlock::Table(t) => t,
            other => panic!("expected table, got {other:?}"),
        }
    }

    fn row_texts(row: &Row) -> Vec<String> {
        row.cells.iter().flat_map(|c| c.texts()).collect()
    }

    #[test]
    fn blocks_follow_template_order() {
        let blocks = compose(&acme(), &clock()).unwrap();
        assert_eq!(blocks.len(), 5);
        assert!(matches!(blocks[0], LayoutBlock::Table(_)));
        assert!(matches!(blocks[1], LayoutBlock::Text(_)));
        assert_eq!(table(&blocks[2]).column_weights, vec![1.0, 1.0]);
        assert_eq!(table(&blocks[3]).column_weights, vec![3.0, 1.0, 1.0]);
        assert_eq!(table(&blocks[4]).rows.len(), 3);
    }

    #[test]
    fn header_shows_brand_and_document_type() {
        let blocks = compose(&acme(), &clock()).unwrap();
        let header = table(&blocks[0]);
        assert_eq!(header.column_weights, vec![1.0]);
        assert_eq!(row_texts(&header.rows[0]), vec!["TechTools  |  Invoice"]);
        assert!(header.rows[0].cells[0].border.is_none());
    }

    #[test]
    fn title_is_centered_bold_and_empty() {
        let blocks = compose(&acme(), &clock()).unwrap();
        let LayoutBlock::Text(title) = &blocks[1] else {
            panic!("title should be text");
        };
        assert_eq!(title.align, TextAlign::Center);
        assert_eq!(title.text(), "");
        assert!(title.spans.iter().all(|s| s.bold && s.font_size == TITLE_SIZE));
    }

    #[test]
    fn party_block_lists_client_then_date() {
        let blocks = compose(&acme(), &clock()).unwrap();
        let party = table(&blocks[2]);
        assert_eq!(
            party.rows[0].cells[0].texts(),
            vec!["Customer Information", "Acme", "a@acme.com", "1 Main St"]
        );
        assert_eq!(party.rows[0].cells[1].texts(), vec!["Date:", "03/07/2024"]);
    }

    #[test]
    fn date_cell_pads_only_its_bottom() {
        let blocks = compose(&acme(), &clock()).unwrap();
        let party = table(&blocks[2]);
        let outer = &party.rows[0].cells[1];
        assert_eq!(outer.padding, Padding::uniform(INFO_PADDING));

        let CellContent::Table(date_table) = &outer.content[0] else {
            panic!("date cell should hold a table");
        };
        let padding = date_table.rows[0].cells[0].padding;
        assert_eq!(padding.bottom, INFO_PADDING);
        assert_eq!(padding.top, DEFAULT_CELL_PADDING);
        assert_eq!(padding.left, DEFAULT_CELL_PADDING);
    }

    #[test]
    fn empty_client_fields_keep_their_lines() {
        let invoice = Invoice::new("", "", "", vec![InvoiceItem::new("Widget", 1, dec!(1))]);
        let blocks = compose(&invoice, &clock()).unwrap();
        let party = table(&blocks[2]);
        assert_eq!(
            party.rows[0].cells[0].texts(),
            vec!["Customer Information", "", "", ""]
        );
    }

    #[test]
    fn items_table_rows() {
        let blocks = compose(&acme(), &clock()).unwrap();
        let items = table(&blocks[3]);
        assert_eq!(items.header_rows, 1);
        assert_eq!(
            row_texts(&items.rows[0]),
            vec!["Description", "Quantity", "Unit Price"]
        );
        assert!(items.rows[0]
            .cells
            .iter()
            .all(|c| c.background == Some(Color::LIGHT_GRAY)));
        assert_eq!(row_texts(&items.rows[1]), vec!["Widget", "2", "$9.99"]);
        assert_eq!(items.rows[1].cells.len(), 3, "no line-total column");
    }

    #[test]
    fn items_keep_input_order() {
        let invoice = Invoice::new(
            "Acme",
            "",
            "",
            vec![
                InvoiceItem::new("First", 1, dec!(10.00)),
                InvoiceItem::new("Second", 3, dec!(5.50)),
            ],
        );
        let blocks = compose(&invoice, &clock()).unwrap();
        let items = table(&blocks[3]);
        let names: Vec<String> = items
            .body_rows()
            .iter()
            .map(|r| r.cells[0].texts().remove(0))
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(
            row_texts(&table(&blocks[4]).rows[2]),
            vec!["Total Due", "$26.50"]
        );
    }

    #[test]
    fn summary_shows_subtotal_zero_tax_and_total() {
        let blocks = compose(&acme(), &clock()).unwrap();
        let summary = table(&blocks[4]);
        let rows: Vec<Vec<String>> = summary.rows.iter().map(row_texts).collect();
        assert_eq!(
            rows,
            vec![
                vec!["Subtotal", "$19.98"],
                vec!["Tax", "$0.00"],
                vec!["Total Due", "$19.98"],
            ]
        );
    }

    #[test]
    fn unit_price_is_rounded_for_display_only() {
        let invoice = Invoice::new("", "", "", vec![InvoiceItem::new("Odd", 1, dec!(19.999))]);
        let blocks = compose(&invoice, &clock()).unwrap();
        assert_eq!(row_texts(&table(&blocks[3]).rows[1])[2], "$20.00");
        assert_eq!(invoice.total_amount().unwrap(), dec!(19.999));
    }

    #[test]
    fn empty_items_are_rejected() {
        let invoice = Invoice::new("Acme", "a@acme.com", "1 Main St", Vec::new());
        let err = compose(&invoice, &clock()).unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidInvoice(_)));
    }

    #[test]
    fn composition_is_repeatable() {
        let first = compose(&acme(), &clock()).unwrap();
        let second = compose(&acme(), &clock()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn date_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(date), "01/05/2025");
    }
}
