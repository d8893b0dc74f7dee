//! Text measurement for the builtin Helvetica faces.
//!
//! The document only uses the PDF standard fonts Helvetica and
//! Helvetica-Bold, so advances come from their AFM width tables instead of a
//! parsed font file.

use crate::block::Span;

/// Advance widths (1/1000 em) of Helvetica for ASCII 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths (1/1000 em) of Helvetica-Bold for ASCII 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside the ASCII table.
const FALLBACK_WIDTH: u16 = 556;

const ASCENDER: f32 = 718.0;
const DESCENDER: f32 = -207.0;

/// Metrics shared by both Helvetica weights.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Line height as a multiple of the font size.
    pub line_height_factor: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            line_height_factor: 1.2,
        }
    }
}

impl FontMetrics {
    /// Width of `text` in points.
    pub fn measure_text_width(&self, text: &str, font_size: f32, bold: bool) -> f32 {
        let table = if bold {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        let units: u32 = text
            .chars()
            .map(|c| {
                let width = match c as u32 {
                    code @ 0x20..=0x7E => table[(code - 0x20) as usize],
                    _ => FALLBACK_WIDTH,
                };
                u32::from(width)
            })
            .sum();
        units as f32 * font_size / 1000.0
    }

    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_factor
    }

    pub fn ascender(&self, font_size: f32) -> f32 {
        ASCENDER * font_size / 1000.0
    }

    pub fn descender(&self, font_size: f32) -> f32 {
        DESCENDER * font_size / 1000.0
    }

    /// Offset from the top of a line box to the text baseline; the extra
    /// leading is split evenly above and below the glyphs.
    pub fn baseline_offset(&self, font_size: f32) -> f32 {
        let glyph_height = self.ascender(font_size) - self.descender(font_size);
        (self.line_height(font_size) - glyph_height) / 2.0 + self.ascender(font_size)
    }
}

/// A piece of one wrapped line sharing a single style.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFragment {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    pub width: f32,
}

/// One output line of [`wrap_spans`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrappedLine {
    pub fragments: Vec<LineFragment>,
    /// Largest font size on the line; sets its height.
    pub font_size: f32,
    width: f32,
    trailing_space: f32,
}

impl WrappedLine {
    fn starting(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    fn is_blank(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Visible width, trailing spaces excluded.
    pub fn width(&self) -> f32 {
        self.width - self.trailing_space
    }

    fn push(&mut self, piece: &str, span: &Span, fonts: &FontMetrics) {
        let width = fonts.measure_text_width(piece, span.font_size, span.bold);
        let word = piece.trim_end_matches(' ');
        let space = width - fonts.measure_text_width(word, span.font_size, span.bold);

        self.trailing_space = if word.is_empty() {
            self.trailing_space + space
        } else {
            space
        };
        self.width += width;
        self.font_size = self.font_size.max(span.font_size);

        let same_style = |f: &&mut LineFragment| f.bold == span.bold && f.font_size == span.font_size;
        if let Some(last) = self.fragments.last_mut().filter(same_style) {
            last.text.push_str(piece);
            last.width += width;
            return;
        }
        self.fragments.push(LineFragment {
            text: piece.to_string(),
            font_size: span.font_size,
            bold: span.bold,
            width,
        });
    }
}

/// Greedy word-wrap of styled spans to `max_width` points.
///
/// Spaces inside a line are kept as written. `\n` forces a break. An empty
/// span list yields no lines; spans with only empty text yield one blank
/// line. A single word wider than `max_width` is broken between characters.
pub fn wrap_spans(spans: &[Span], max_width: f32, fonts: &FontMetrics) -> Vec<WrappedLine> {
    if spans.is_empty() {
        return Vec::new();
    }
    let max_width = if max_width > 0.0 { max_width } else { f32::INFINITY };

    let mut lines = Vec::new();
    let mut current = WrappedLine::starting(spans[0].font_size);

    for span in spans {
        current.font_size = current.font_size.max(span.font_size);
        for (i, paragraph) in span.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(std::mem::replace(
                    &mut current,
                    WrappedLine::starting(span.font_size),
                ));
            }
            for piece in paragraph.split_inclusive(' ') {
                let word = piece.trim_end_matches(' ');
                let word_width = fonts.measure_text_width(word, span.font_size, span.bold);
                if !current.is_blank() && current.width + word_width > max_width {
                    lines.push(std::mem::replace(
                        &mut current,
                        WrappedLine::starting(span.font_size),
                    ));
                    if word.is_empty() {
                        continue;
                    }
                }
                if word_width > max_width {
                    break_long_word(piece, span, max_width, fonts, &mut current, &mut lines);
                    continue;
                }
                current.push(piece, span, fonts);
            }
        }
    }
    lines.push(current);
    lines
}

/// Lay out a word wider than the whole line one character at a time,
/// starting a new line whenever the next glyph would overflow.
fn break_long_word(
    piece: &str,
    span: &Span,
    max_width: f32,
    fonts: &FontMetrics,
    current: &mut WrappedLine,
    lines: &mut Vec<WrappedLine>,
) {
    let mut buf = [0u8; 4];
    for ch in piece.chars() {
        let glyph = ch.encode_utf8(&mut buf);
        let glyph_width = fonts.measure_text_width(glyph, span.font_size, span.bold);
        if ch != ' ' && !current.is_blank() && current.width + glyph_width > max_width {
            lines.push(std::mem::replace(current, WrappedLine::starting(span.font_size)));
        }
        current.push(glyph, span, fonts);
    }
}
