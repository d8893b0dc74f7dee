//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API) and the builtin Helvetica faces.

use printpdf::*;

use crate::error::InvoiceError;
use crate::layout_config::{LayoutBox, LayoutConfig};

/// Points to millimetres.
const PT_TO_MM: f32 = 0.352778;

/// Render a LayoutConfig into PDF bytes.
///
/// The page list is written in order in one pass; the returned buffer is a
/// complete document or an error, never a partial file.
pub fn render_pdf(config: &LayoutConfig) -> Result<Vec<u8>, InvoiceError> {
    if !(config.page_width_pt > 0.0 && config.page_height_pt > 0.0) {
        return Err(InvoiceError::Render(format!(
            "invalid page size {}x{}pt",
            config.page_width_pt, config.page_height_pt
        )));
    }

    let page_w = Mm(config.page_width_pt * PT_TO_MM);
    let page_h = Mm(config.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&config.title);

    let mut pages = Vec::with_capacity(config.pages.len().max(1));
    for page_layout in &config.pages {
        let mut ops = Vec::new();
        for lbox in &page_layout.boxes {
            render_box(&mut ops, lbox, config.page_height_pt);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }
    let page_count = pages.len();

    doc.with_pages(pages);
    // Raw `Tj` operators are only written when unknown ops are kept.
    let options = PdfSaveOptions {
        secure: false,
        ..PdfSaveOptions::default()
    };
    let mut warnings = Vec::new();
    let bytes = doc.save(&options, &mut warnings);
    if !warnings.is_empty() {
        log::warn!("printpdf reported {} warning(s) while saving", warnings.len());
    }
    if bytes.is_empty() {
        return Err(InvoiceError::Render("PDF serialisation produced no output".to_string()));
    }

    log::debug!("rendered {page_count} page(s), {} bytes", bytes.len());
    Ok(bytes)
}

/// Encode text as Windows-1252 for the builtin fonts' WinAnsiEncoding.
/// Characters outside the code page become `?`.
fn to_winansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97,
            '\u{00A0}' => 0x20,
            c => u8::try_from(u32::from(c)).unwrap_or(b'?'),
        })
        .collect()
}

/// Show-text operator carrying already encoded bytes.
///
/// printpdf writes builtin-font strings as UTF-8, which WinAnsiEncoding
/// misreads for anything past ASCII, so the string goes out as a raw `Tj`.
fn show_winansi_text(text: &str) -> Op {
    Op::Unknown {
        key: "Tj".to_string(),
        value: vec![DictItem::String {
            data: to_winansi(text),
            literal: true,
        }],
    }
}

fn rgb(color: [f32; 3]) -> Color {
    Color::Rgb(Rgb {
        r: color[0],
        g: color[1],
        b: color[2],
        icc_profile: None,
    })
}

/// Corners of a box in PDF space, clockwise from top-left.
fn corners(lbox: &LayoutBox, page_height: f32) -> Vec<LinePoint> {
    // PDF coordinate system: origin at bottom-left; layout origin is top-left.
    let top = page_height - lbox.y;
    let bottom = top - lbox.height;
    let (left, right) = (lbox.x, lbox.x + lbox.width);

    [(left, top), (right, top), (right, bottom), (left, bottom)]
        .into_iter()
        .map(|(x, y)| LinePoint {
            p: Point { x: Pt(x), y: Pt(y) },
            bezier: false,
        })
        .collect()
}

/// Recursively render a LayoutBox and its children into PDF ops.
fn render_box(ops: &mut Vec<Op>, lbox: &LayoutBox, page_height: f32) {
    if let Some(bg) = lbox.background_color {
        ops.push(Op::SetFillColor { col: rgb(bg) });
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: corners(lbox, page_height),
                }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    if let Some(border) = &lbox.border {
        ops.push(Op::SetOutlineColor {
            col: rgb(border.color),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(border.width),
        });
        ops.push(Op::DrawLine {
            line: Line {
                points: corners(lbox, page_height),
                is_closed: true,
            },
        });
    }

    if let Some(text) = &lbox.text {
        for line in &text.lines {
            let baseline_y = page_height - lbox.y - line.baseline;
            for span in &line.spans {
                if span.text.trim().is_empty() {
                    continue;
                }
                let font = if span.bold {
                    BuiltinFont::HelveticaBold
                } else {
                    BuiltinFont::Helvetica
                };

                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(lbox.x + span.x_offset),
                        y: Pt(baseline_y),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(span.font_size),
                    font,
                });
                ops.push(Op::SetFillColor {
                    col: rgb([0.0, 0.0, 0.0]),
                });
                // An empty write registers the font resource on the page.
                ops.push(Op::WriteTextBuiltinFont {
                    items: Vec::new(),
                    font,
                });
                ops.push(show_winansi_text(&span.text));
                ops.push(Op::EndTextSection);
            }
        }
    }

    for child in &lbox.children {
        render_box(ops, child, page_height);
    }
}
