//! Pagination – stacks bands onto pages.
//!
//! Handles:
//! - page boundaries (a band that does not fit starts a new page)
//! - table header rows repeated on continuation pages
//! - header rows kept together with the first row after them
//! - bands taller than a page split between text lines

use crate::fonts::FontMetrics;
use crate::layout::Band;
use crate::layout_config::*;

/// Default page margins in points.
pub const PAGE_MARGIN_PT: f32 = 36.0;

/// Slack for float comparisons against line edges.
const EPSILON: f32 = 0.01;

struct PageCursor {
    pages: Vec<PageLayout>,
    current: PageLayout,
    /// Offset from the top of the content area.
    y: f32,
    page_margin: f32,
    /// Leading boxes of the current page that are repeated header rows.
    header_boxes: usize,
}

impl PageCursor {
    fn new(page_margin: f32) -> Self {
        Self {
            pages: Vec::new(),
            current: PageLayout {
                page_index: 0,
                boxes: Vec::new(),
            },
            y: 0.0,
            page_margin,
            header_boxes: 0,
        }
    }

    /// Whether the page holds anything besides repeated headers.
    fn has_body(&self) -> bool {
        self.current.boxes.len() > self.header_boxes
    }

    fn break_page(&mut self) {
        let next = PageLayout {
            page_index: self.pages.len() + 1,
            boxes: Vec::new(),
        };
        self.pages.push(std::mem::replace(&mut self.current, next));
        self.y = 0.0;
        self.header_boxes = 0;
    }

    /// Start a new page and draw the header rows `band` sits under.
    fn continue_on_new_page(&mut self, band: &Band) {
        self.break_page();
        if let Some(header) = &band.repeat_header {
            for header_band in header.iter() {
                self.place(header_band);
            }
        }
        self.header_boxes = self.current.boxes.len();
    }

    fn place(&mut self, band: &Band) {
        for lbox in &band.boxes {
            let mut lbox = lbox.clone();
            lbox.translate_y(self.page_margin + self.y);
            self.current.boxes.push(lbox);
        }
        self.y += band.height + band.space_after;
    }

    /// Place a band that cannot fit on a page of its own: fill the rest of
    /// the current page, then carry on below the repeated header.
    fn place_split(&mut self, band: &Band, content_height: f32, fonts: &FontMetrics) {
        let mut pending = band.clone();
        loop {
            let room = content_height - self.y;
            if pending.height <= room {
                self.place(&pending);
                return;
            }
            match split_band(&pending, room, fonts) {
                Some((head, tail)) => {
                    self.place(&head);
                    self.continue_on_new_page(band);
                    pending = tail;
                }
                None if !self.has_body() => {
                    log::warn!(
                        "band of {:.1}pt has no line break within {:.1}pt; it will overflow",
                        pending.height,
                        room
                    );
                    self.place(&pending);
                    return;
                }
                None => self.continue_on_new_page(band),
            }
        }
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.current.boxes.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Height that must fit on the current page for `bands[index]` to be placed:
/// the band itself plus, for header rows, the rows chained to it. A chained
/// row that can never share a page with its header only asks for its first
/// line.
fn required_height(bands: &[Band], index: usize, content_height: f32, fonts: &FontMetrics) -> f32 {
    let mut height = 0.0;
    for band in &bands[index..] {
        if height > 0.0 && height + band.height > content_height {
            return height + first_line_bottom(band, fonts).unwrap_or(0.0);
        }
        height += band.height;
        if !band.keep_with_next {
            break;
        }
    }
    height
}

fn repeated_header_height(band: &Band) -> f32 {
    band.repeat_header
        .as_ref()
        .map_or(0.0, |header| header.iter().map(|b| b.height).sum())
}

/// Vertical extent `(top, bottom)` of one text line of `lbox`, in band
/// coordinates. `None` for a blank line.
fn line_extent(lbox: &LayoutBox, line: &TextLine, fonts: &FontMetrics) -> Option<(f32, f32)> {
    let size = line.spans.iter().map(|s| s.font_size).fold(0.0, f32::max);
    if size <= 0.0 {
        return None;
    }
    let top = lbox.y + line.baseline - fonts.baseline_offset(size);
    Some((top, top + fonts.line_height(size)))
}

fn collect_line_extents(lbox: &LayoutBox, fonts: &FontMetrics, out: &mut Vec<(f32, f32)>) {
    if let Some(text) = &lbox.text {
        out.extend(text.lines.iter().filter_map(|line| line_extent(lbox, line, fonts)));
    }
    for child in &lbox.children {
        collect_line_extents(child, fonts, out);
    }
}

fn band_line_extents(band: &Band, fonts: &FontMetrics) -> Vec<(f32, f32)> {
    let mut extents = Vec::new();
    for lbox in &band.boxes {
        collect_line_extents(lbox, fonts, &mut extents);
    }
    extents
}

fn first_line_bottom(band: &Band, fonts: &FontMetrics) -> Option<f32> {
    band_line_extents(band, fonts)
        .into_iter()
        .map(|(_, bottom)| bottom)
        .reduce(f32::min)
}

/// Cut a box at `cut` (band coordinates). The lower part is moved up so
/// that `cut` becomes its origin. Both parts keep fill and border.
fn split_box(lbox: &LayoutBox, cut: f32, fonts: &FontMetrics) -> (Option<LayoutBox>, Option<LayoutBox>) {
    if lbox.y + lbox.height <= cut + EPSILON {
        return (Some(lbox.clone()), None);
    }
    if lbox.y >= cut - EPSILON {
        let mut below = lbox.clone();
        below.translate_y(-cut);
        return (None, Some(below));
    }

    let mut above = LayoutBox {
        height: cut - lbox.y,
        text: None,
        children: Vec::new(),
        ..lbox.clone()
    };
    let mut below = LayoutBox {
        y: 0.0,
        height: lbox.y + lbox.height - cut,
        text: None,
        children: Vec::new(),
        ..lbox.clone()
    };

    if let Some(text) = &lbox.text {
        let (upper, lower): (Vec<TextLine>, Vec<TextLine>) = text
            .lines
            .iter()
            .cloned()
            .partition(|line| {
                // Blank lines follow their baseline.
                let bottom = line_extent(lbox, line, fonts)
                    .map_or(lbox.y + line.baseline, |(_, bottom)| bottom);
                bottom <= cut + EPSILON
            });
        let shift = cut - lbox.y;
        let lower: Vec<TextLine> = lower
            .into_iter()
            .map(|mut line| {
                line.baseline -= shift;
                line
            })
            .collect();
        if !upper.is_empty() {
            above.text = Some(TextContent { lines: upper });
        }
        if !lower.is_empty() {
            below.text = Some(TextContent { lines: lower });
        }
    }

    for child in &lbox.children {
        let (child_above, child_below) = split_box(child, cut, fonts);
        above.children.extend(child_above);
        below.children.extend(child_below);
    }

    (Some(above), Some(below))
}

/// Split `band` so the first part is at most `room` tall and ends between
/// text lines in every column. `None` when not even one line fits, or when
/// every line fits and only padding would spill over.
fn split_band(band: &Band, room: f32, fonts: &FontMetrics) -> Option<(Band, Band)> {
    let extents = band_line_extents(band, fonts);
    let first_line = extents.iter().map(|(_, bottom)| *bottom).reduce(f32::min)?;
    let last_line = extents.iter().map(|(_, bottom)| *bottom).fold(first_line, f32::max);

    // Move the cut up to the top of any line it would slice through.
    let mut cut = room.min(band.height);
    while let Some(top) = extents
        .iter()
        .filter(|(top, bottom)| *top < cut - EPSILON && *bottom > cut + EPSILON)
        .map(|(top, _)| *top)
        .reduce(f32::min)
    {
        cut = top;
    }
    // The lower part must carry at least one line, not just padding.
    if cut < first_line - EPSILON || cut >= last_line - EPSILON {
        return None;
    }

    let mut head = Band {
        height: cut,
        boxes: Vec::new(),
        space_after: 0.0,
        keep_with_next: false,
        repeat_header: None,
    };
    let mut tail = Band {
        height: band.height - cut,
        boxes: Vec::new(),
        ..band.clone()
    };
    for lbox in &band.boxes {
        let (above, below) = split_box(lbox, cut, fonts);
        head.boxes.extend(above);
        tail.boxes.extend(below);
    }
    Some((head, tail))
}

/// Convert bands into a paginated LayoutConfig.
pub fn paginate(
    bands: &[Band],
    page_width: f32,
    page_height: f32,
    page_margin: f32,
    fonts: &FontMetrics,
) -> LayoutConfig {
    let content_height = page_height - 2.0 * page_margin;
    let mut cursor = PageCursor::new(page_margin);

    for (index, band) in bands.iter().enumerate() {
        let needed = required_height(bands, index, content_height, fonts);
        if needed + repeated_header_height(band) > content_height {
            cursor.place_split(band, content_height, fonts);
            continue;
        }
        if cursor.has_body() && cursor.y + needed > content_height {
            cursor.continue_on_new_page(band);
        }
        cursor.place(band);
    }

    let pages = cursor.finish();
    log::debug!("paginated {} bands onto {} page(s)", bands.len(), pages.len());

    LayoutConfig {
        title: "Invoice".to_string(),
        page_width_pt: page_width,
        page_height_pt: page_height,
        pages,
    }
}
