//! Layout engine – measures [`LayoutBlock`]s and turns them into a flat list
//! of page-independent [`Band`]s.
//!
//! A band is the unit the paginator moves between pages: one text block, or
//! one table row (with everything nested inside it). Box x coordinates are
//! final; y coordinates are relative to the top of the band.

use std::rc::Rc;

use crate::block::{Cell, CellContent, LayoutBlock, Table, TextAlign, TextRun};
use crate::error::InvoiceError;
use crate::fonts::{wrap_spans, FontMetrics};
use crate::layout_config::{BorderStyle, LayoutBox, TextContent, TextLine, TextSpan};

/// A horizontal slice of the document. The paginator only splits one when
/// it is taller than a page.
#[derive(Debug, Clone)]
pub struct Band {
    pub height: f32,
    pub boxes: Vec<LayoutBox>,
    /// Vertical gap before the next band.
    pub space_after: f32,
    /// Header rows stay on the same page as the band that follows them.
    pub keep_with_next: bool,
    /// Header rows of the owning table, drawn again when this band starts a
    /// new page.
    pub repeat_header: Option<Rc<Vec<Band>>>,
}

impl Band {
    fn new(height: f32, boxes: Vec<LayoutBox>) -> Self {
        Self {
            height,
            boxes,
            space_after: 0.0,
            keep_with_next: false,
            repeat_header: None,
        }
    }
}

/// Lay out every block at `x`, `width` points wide.
pub fn layout_blocks(
    blocks: &[LayoutBlock],
    x: f32,
    width: f32,
    fonts: &FontMetrics,
) -> Result<Vec<Band>, InvoiceError> {
    let mut bands = Vec::new();

    for block in blocks {
        match block {
            LayoutBlock::Text(run) => {
                let lbox = layout_text(run, x, width, fonts);
                let mut band = Band::new(lbox.height, vec![lbox]);
                band.space_after = run.margin_bottom;
                bands.push(band);
            }
            LayoutBlock::Table(table) => bands.extend(table_bands(table, x, width, fonts)?),
        }
    }

    Ok(bands)
}

fn table_bands(
    table: &Table,
    x: f32,
    width: f32,
    fonts: &FontMetrics,
) -> Result<Vec<Band>, InvoiceError> {
    let rows = layout_rows(table, x, width, fonts)?;
    let header_count = table.header_rows.min(rows.len());

    let mut bands: Vec<Band> = rows
        .into_iter()
        .map(|(height, boxes)| Band::new(height, boxes))
        .collect();

    for band in &mut bands[..header_count] {
        band.keep_with_next = true;
    }
    if header_count > 0 {
        let header = Rc::new(bands[..header_count].to_vec());
        for band in &mut bands[header_count..] {
            band.repeat_header = Some(Rc::clone(&header));
        }
    }

    match bands.last_mut() {
        Some(last) => last.space_after = table.margin_bottom,
        None => {
            let mut spacer = Band::new(0.0, Vec::new());
            spacer.space_after = table.margin_bottom;
            bands.push(spacer);
        }
    }

    Ok(bands)
}

/// Split `width` between columns in proportion to their weights.
pub fn column_widths(weights: &[f32], width: f32) -> Result<Vec<f32>, InvoiceError> {
    if weights.is_empty() {
        return Err(InvoiceError::Render("table has no columns".to_string()));
    }
    if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
        return Err(InvoiceError::Render(format!(
            "column weights must be positive, got {weights:?}"
        )));
    }
    let total: f32 = weights.iter().sum();
    Ok(weights.iter().map(|w| width * w / total).collect())
}

/// Lay out each row of `table`; returns `(row_height, cell_boxes)` per row
/// with y relative to the row top.
fn layout_rows(
    table: &Table,
    x: f32,
    width: f32,
    fonts: &FontMetrics,
) -> Result<Vec<(f32, Vec<LayoutBox>)>, InvoiceError> {
    let widths = column_widths(&table.column_weights, width)?;
    let mut rows = Vec::with_capacity(table.rows.len());

    for (index, row) in table.rows.iter().enumerate() {
        if row.cells.len() != widths.len() {
            return Err(InvoiceError::Render(format!(
                "row {index} has {} cells, table has {} columns",
                row.cells.len(),
                widths.len()
            )));
        }

        let mut cell_x = x;
        let mut boxes = Vec::with_capacity(widths.len());
        for (cell, cell_width) in row.cells.iter().zip(&widths) {
            boxes.push(layout_cell(cell, cell_x, *cell_width, fonts)?);
            cell_x += cell_width;
        }

        // Cells stretch to the tallest one so backgrounds and borders line up.
        let height = boxes.iter().map(|b| b.height).fold(0.0, f32::max);
        for lbox in &mut boxes {
            lbox.height = height;
        }
        rows.push((height, boxes));
    }

    Ok(rows)
}

fn layout_cell(
    cell: &Cell,
    x: f32,
    width: f32,
    fonts: &FontMetrics,
) -> Result<LayoutBox, InvoiceError> {
    let padding = cell.padding;
    let inner_x = x + padding.left;
    let inner_width = (width - padding.left - padding.right).max(0.0);

    let mut lbox = LayoutBox::new(x, 0.0, width, 0.0);
    lbox.background_color = cell.background.map(|c| c.to_array());
    lbox.border = cell.border.map(|b| BorderStyle {
        width: b.width,
        color: b.color.to_array(),
    });

    let mut cursor = padding.top;
    for content in &cell.content {
        match content {
            CellContent::Text(run) => {
                let mut text_box = layout_text(run, inner_x, inner_width, fonts);
                text_box.translate_y(cursor);
                cursor += text_box.height + run.margin_bottom;
                lbox.children.push(text_box);
            }
            CellContent::Table(table) => {
                for (row_height, boxes) in layout_rows(table, inner_x, inner_width, fonts)? {
                    for mut row_box in boxes {
                        row_box.translate_y(cursor);
                        lbox.children.push(row_box);
                    }
                    cursor += row_height;
                }
                cursor += table.margin_bottom;
            }
        }
    }

    lbox.height = cursor + padding.bottom;
    Ok(lbox)
}

/// Wrap and align one run inside a box of the given width. The box height
/// is the sum of its line heights.
fn layout_text(run: &TextRun, x: f32, width: f32, fonts: &FontMetrics) -> LayoutBox {
    let wrapped = wrap_spans(&run.spans, width, fonts);
    let mut lbox = LayoutBox::new(x, 0.0, width, 0.0);
    if wrapped.is_empty() {
        return lbox;
    }

    let mut lines = Vec::with_capacity(wrapped.len());
    let mut cursor = 0.0;
    for line in &wrapped {
        let free = (width - line.width()).max(0.0);
        let mut span_x = match run.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => free / 2.0,
            TextAlign::Right => free,
        };

        let spans = line
            .fragments
            .iter()
            .map(|fragment| {
                let span = TextSpan {
                    text: fragment.text.clone(),
                    x_offset: span_x,
                    font_size: fragment.font_size,
                    bold: fragment.bold,
                };
                span_x += fragment.width;
                span
            })
            .collect();

        lines.push(TextLine {
            baseline: cursor + fonts.baseline_offset(line.font_size),
            spans,
        });
        cursor += fonts.line_height(line.font_size);
    }

    lbox.height = cursor;
    lbox.text = Some(TextContent { lines });
    lbox
}
