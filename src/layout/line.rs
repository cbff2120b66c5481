//! Positioned text lines and pages.
//!
//! A [`Line`] is the unit every stage works on: text plus a bounding box in
//! page coordinates (origin bottom-left) and the font metadata the layout
//! extractor could recover. Coordinates that are missing or non-finite make
//! the line's geometry *malformed*; such lines are kept and treated as plain
//! body text by the later stages.

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::{median, safe_float_cmp};

/// Font weight classification on the usual 100-900 scale.
///
/// Values: 100-900 where 400 = normal, 700 = bold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u16)]
pub enum FontWeight {
    /// Thin (100)
    Thin = 100,
    /// Extra Light (200)
    ExtraLight = 200,
    /// Light (300)
    Light = 300,
    /// Normal (400) - default weight
    #[default]
    Normal = 400,
    /// Medium (500)
    Medium = 500,
    /// Semi Bold (600)
    SemiBold = 600,
    /// Bold (700) - standard bold weight
    Bold = 700,
    /// Extra Bold (800)
    ExtraBold = 800,
    /// Black (900) - heaviest weight
    Black = 900,
}

impl FontWeight {
    /// Check if this weight is considered bold (>= 600).
    pub fn is_bold(&self) -> bool {
        *self as u16 >= 600
    }

    /// Create FontWeight from a numeric weight, rounding to the nearest step.
    pub fn from_value(value: i32) -> Self {
        match value {
            ..=150 => FontWeight::Thin,
            151..=250 => FontWeight::ExtraLight,
            251..=350 => FontWeight::Light,
            351..=450 => FontWeight::Normal,
            451..=550 => FontWeight::Medium,
            551..=650 => FontWeight::SemiBold,
            651..=750 => FontWeight::Bold,
            751..=850 => FontWeight::ExtraBold,
            851.. => FontWeight::Black,
        }
    }

    /// Guess the weight from a font name such as "Arial-BoldMT".
    ///
    /// # Examples
    ///
    /// ```
    /// use docstruct::layout::FontWeight;
    ///
    /// assert_eq!(FontWeight::from_font_name("TimesNewRoman-Bold"), FontWeight::Bold);
    /// assert_eq!(FontWeight::from_font_name("Inter-SemiBold"), FontWeight::SemiBold);
    /// assert_eq!(FontWeight::from_font_name("PTSerif-Regular"), FontWeight::Normal);
    /// ```
    pub fn from_font_name(name: &str) -> Self {
        let name_lower = name.to_lowercase();

        // Strongest keyword first
        if name_lower.contains("black") || name_lower.contains("heavy") {
            return FontWeight::Black;
        }
        if name_lower.contains("extrabold") || name_lower.contains("ultrabold") {
            return FontWeight::ExtraBold;
        }
        if name_lower.contains("bold") {
            if name_lower.contains("semibold") || name_lower.contains("demibold") {
                return FontWeight::SemiBold;
            }
            return FontWeight::Bold;
        }
        if name_lower.contains("medium") {
            return FontWeight::Medium;
        }
        if name_lower.contains("light") {
            if name_lower.contains("extralight") || name_lower.contains("ultralight") {
                return FontWeight::ExtraLight;
            }
            return FontWeight::Light;
        }
        if name_lower.contains("thin") {
            return FontWeight::Thin;
        }
        FontWeight::Normal
    }
}

/// A single glyph as reported by a layout extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// Font name (e.g. "Arial-BoldMT")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
}

impl Glyph {
    /// Create a glyph record.
    pub fn new(font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_name: font_name.into(),
            font_size,
        }
    }
}

/// Line-level font style aggregated from glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Median glyph size
    pub font_size: f32,
    /// At least a fifth of the glyphs use a bold-looking font
    pub is_bold: bool,
}

impl LineStyle {
    /// Share of bold glyphs that makes the whole line bold.
    pub const BOLD_GLYPH_RATIO: f32 = 0.2;

    /// Aggregate glyph styles. An empty slice gives size 0.0, not bold.
    pub fn from_glyphs(glyphs: &[Glyph]) -> Self {
        if glyphs.is_empty() {
            return Self {
                font_size: 0.0,
                is_bold: false,
            };
        }

        let sizes: Vec<f32> = glyphs
            .iter()
            .map(|g| g.font_size)
            .filter(|s| s.is_finite())
            .collect();
        let font_size = median(&sizes).unwrap_or(0.0);

        let bold = glyphs
            .iter()
            .filter(|g| FontWeight::from_font_name(&g.font_name).is_bold())
            .count();
        let is_bold = bold as f32 >= glyphs.len() as f32 * Self::BOLD_GLYPH_RATIO;

        Self { font_size, is_bold }
    }
}

fn lenient_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
}

fn nan() -> f32 {
    f32::NAN
}

/// One line of text with its bounding box and font metadata.
///
/// Missing or `null` coordinates deserialize to NaN, which marks the line's
/// geometry as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Line text
    pub text: String,
    /// Left edge
    #[serde(default = "nan", deserialize_with = "lenient_f32")]
    pub x0: f32,
    /// Bottom edge
    #[serde(default = "nan", deserialize_with = "lenient_f32")]
    pub y0: f32,
    /// Right edge
    #[serde(default = "nan", deserialize_with = "lenient_f32")]
    pub x1: f32,
    /// Top edge
    #[serde(default = "nan", deserialize_with = "lenient_f32")]
    pub y1: f32,
    /// Font size in points
    #[serde(default = "nan", deserialize_with = "lenient_f32")]
    pub font_size: f32,
    /// Bold font
    #[serde(default)]
    pub is_bold: bool,
}

impl Line {
    /// Create a line from its bounding box and font size (not bold).
    pub fn new(text: impl Into<String>, x0: f32, y0: f32, x1: f32, y1: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            y0,
            x1,
            y1,
            font_size,
            is_bold: false,
        }
    }

    /// Create a line with no geometry at all.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, f32::NAN, f32::NAN, f32::NAN, f32::NAN, f32::NAN)
    }

    /// Set the bold flag.
    pub fn with_bold(mut self, is_bold: bool) -> Self {
        self.is_bold = is_bold;
        self
    }

    /// Apply an aggregated glyph style.
    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.font_size = style.font_size;
        self.is_bold = style.is_bold;
        self
    }

    /// All four coordinates are finite.
    pub fn has_valid_geometry(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// `max(0, y1 - y0)`, or 0 for malformed geometry.
    pub fn height(&self) -> f32 {
        if !self.has_valid_geometry() {
            return 0.0;
        }
        (self.y1 - self.y0).max(0.0)
    }

    /// Font size, with missing or non-finite sizes read as 0.0.
    pub fn effective_font_size(&self) -> f32 {
        if self.font_size.is_finite() {
            self.font_size
        } else {
            0.0
        }
    }

    /// Text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Vertical extent of a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalBounds {
    /// Lowest y coordinate
    pub y_min: f32,
    /// Highest y coordinate
    pub y_max: f32,
}

impl VerticalBounds {
    /// Create bounds, forcing `y_max >= y_min + 1`.
    pub fn new(y_min: f32, y_max: f32) -> Self {
        Self {
            y_min,
            y_max: y_max.max(y_min + 1.0),
        }
    }

    /// Page height.
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

impl Default for VerticalBounds {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// An ordered sequence of lines, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Lines in reading order
    pub lines: Vec<Line>,
    /// Vertical extent, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<VerticalBounds>,
}

impl Page {
    /// Create a page from its lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            lines,
            bounds: None,
        }
    }

    /// Set explicit page bounds.
    pub fn with_bounds(mut self, bounds: VerticalBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Explicit bounds if set, otherwise computed from finite line coordinates.
    ///
    /// A page without usable coordinates gets `(0, 1)`.
    pub fn vertical_bounds(&self) -> VerticalBounds {
        if let Some(bounds) = self.bounds {
            return VerticalBounds::new(bounds.y_min, bounds.y_max);
        }

        let mut y_min = f32::INFINITY;
        let mut y_max = f32::NEG_INFINITY;
        for line in self.lines.iter().filter(|l| l.has_valid_geometry()) {
            y_min = y_min.min(line.y0.min(line.y1));
            y_max = y_max.max(line.y0.max(line.y1));
        }

        if y_min.is_finite() && y_max.is_finite() {
            VerticalBounds::new(y_min, y_max)
        } else {
            VerticalBounds::default()
        }
    }

    /// Sort lines top-to-bottom, then left-to-right.
    ///
    /// Lines with malformed geometry sink to the end, keeping their order.
    pub fn sort_reading_order(&mut self) {
        self.lines.sort_by(|a, b| {
            safe_float_cmp(neg_or_nan(a.y1), neg_or_nan(b.y1))
                .then_with(|| safe_float_cmp(a.x0, b.x0))
        });
    }
}

fn neg_or_nan(v: f32) -> f32 {
    if v.is_finite() {
        -v
    } else {
        f32::NAN
    }
}
