//! Layout blocks – a format-agnostic description of what goes on the page.
//!
//! The composer builds a `Vec<LayoutBlock>` once; the layout stage reads it
//! once. Nothing here knows about page geometry or PDF.

/// Default body text size in points.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Default inner padding of a table cell in points.
pub const DEFAULT_CELL_PADDING: f32 = 2.0;

/// RGB colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    /// RGB (192, 192, 192).
    pub const LIGHT_GRAY: Self = Self {
        r: 192.0 / 255.0,
        g: 192.0 / 255.0,
        b: 192.0 / 255.0,
    };

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Solid cell border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    /// Half-point black rule.
    pub const THIN: Self = Self {
        width: 0.5,
        color: Color::BLACK,
    };
}

/// A stretch of text sharing one size and weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
}

/// A paragraph: one or more spans flowed together, wrapped to the available
/// width.
///
/// A run with no spans takes no vertical space. A run whose spans are all
/// empty still occupies one blank line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    pub spans: Vec<Span>,
    pub align: TextAlign,
    pub margin_bottom: f32,
}

impl TextRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single span at the default size.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new().span(text, DEFAULT_FONT_SIZE, false)
    }

    /// Single bold span at the default size.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new().span(text, DEFAULT_FONT_SIZE, true)
    }

    /// builder function appending a span
    pub fn span(mut self, text: impl Into<String>, font_size: f32, bold: bool) -> Self {
        self.spans.push(Span {
            text: text.into(),
            font_size,
            bold,
        });
        self
    }

    /// builder function setting alignment
    pub fn and_alignment(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// builder function setting the space left below the run
    pub fn and_margin_bottom(mut self, margin: f32) -> Self {
        self.margin_bottom = margin;
        self
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// What a cell holds, stacked top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(TextRun),
    Table(Table),
}

/// Inner spacing of a cell, per side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const fn uniform(padding: f32) -> Self {
        Self {
            top: padding,
            right: padding,
            bottom: padding,
            left: padding,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(DEFAULT_CELL_PADDING)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: Vec<CellContent>,
    pub background: Option<Color>,
    /// `None` means no border is drawn.
    pub border: Option<Border>,
    pub padding: Padding,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            background: None,
            border: None,
            padding: Padding::default(),
        }
    }
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell holding one run of text.
    pub fn text(run: TextRun) -> Self {
        Self::new().with(CellContent::Text(run))
    }

    pub fn with(mut self, content: CellContent) -> Self {
        self.content.push(content);
        self
    }

    pub fn and_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn and_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn and_padding(mut self, padding: f32) -> Self {
        self.padding = Padding::uniform(padding);
        self
    }

    /// Override the bottom padding only.
    pub fn and_padding_bottom(mut self, padding: f32) -> Self {
        self.padding.bottom = padding;
        self
    }

    /// Text of every run in this cell, nested tables included, in reading
    /// order.
    pub fn texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        for content in &self.content {
            match content {
                CellContent::Text(run) => out.push(run.text()),
                CellContent::Table(table) => {
                    for row in &table.rows {
                        for cell in &row.cells {
                            out.extend(cell.texts());
                        }
                    }
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// Full-width table with proportional columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Relative column widths; normalised against their sum at layout time.
    pub column_weights: Vec<f32>,
    /// Leading rows repeated at the top of each continuation page.
    pub header_rows: usize,
    pub rows: Vec<Row>,
    pub margin_bottom: f32,
}

impl Table {
    pub fn new(column_weights: &[f32]) -> Self {
        Self {
            column_weights: column_weights.to_vec(),
            ..Self::default()
        }
    }

    pub fn header_row(mut self, cells: Vec<Cell>) -> Self {
        self.rows.insert(self.header_rows, Row { cells });
        self.header_rows += 1;
        self
    }

    pub fn row(mut self, cells: Vec<Cell>) -> Self {
        self.rows.push(Row { cells });
        self
    }

    pub fn and_margin_bottom(mut self, margin: f32) -> Self {
        self.margin_bottom = margin;
        self
    }

    /// Rows after the header rows.
    pub fn body_rows(&self) -> &[Row] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }
}

/// One top-level unit of the document, laid out in sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutBlock {
    Text(TextRun),
    Table(Table),
}
