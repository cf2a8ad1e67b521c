//! Resolved, writer-ready drawing primitives.
//!
//! Everything here is already validated: geometry is in EMUs, colors are
//! 6-digit hex, and charts carry matched finite series. The rendering engine
//! produces these; the slide writer only serializes them.

use deck_core::{Align, RenderError};

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Largest offset or extent a package may carry, in EMUs.
pub const MAX_COORDINATE: i64 = 27_273_042_316_900;

/// Convert inches to EMUs.
pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

fn in_range(inches: f64) -> bool {
    inches.is_finite() && (inches * EMU_PER_INCH).abs() <= MAX_COORDINATE as f64
}

/// Position and size in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    /// Frame from trusted constants in inches.
    pub fn inches(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x: emu(x),
            y: emu(y),
            cx: emu(w),
            cy: emu(h),
        }
    }

    /// Frame from untrusted inches: every value finite and within the
    /// coordinate range, sizes non-negative.
    pub fn checked(element: &'static str, x: f64, y: f64, w: f64, h: f64) -> Result<Self, RenderError> {
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return Err(RenderError::InvalidGeometry {
                element,
                detail: format!("non-finite value in ({}, {}, {}, {})", x, y, w, h),
            });
        }
        if w < 0.0 || h < 0.0 {
            return Err(RenderError::InvalidGeometry {
                element,
                detail: format!("negative size {} x {}", w, h),
            });
        }
        if ![x, y, w, h].iter().all(|v| in_range(*v)) {
            return Err(RenderError::InvalidGeometry {
                element,
                detail: format!("out of range ({}, {}, {}, {})", x, y, w, h),
            });
        }
        Ok(Self::inches(x, y, w, h))
    }

    /// Best-effort frame for placeholders: unusable values come from `fallback`.
    pub fn sanitized(x: f64, y: f64, w: f64, h: f64, fallback: (f64, f64, f64, f64)) -> Self {
        let pick = |v: f64, d: f64| if in_range(v) { v } else { d };
        let size = |v: f64, d: f64| if in_range(v) && v > 0.0 { v } else { d };
        Self::inches(
            pick(x, fallback.0),
            pick(y, fallback.1),
            size(w, fallback.2),
            size(h, fallback.3),
        )
    }

    /// A band of height `cy` vertically centered in this frame.
    pub fn centered_band(&self, cy: i64) -> Self {
        Self {
            x: self.x,
            y: self.y.saturating_add(self.cy / 2).saturating_sub(cy / 2),
            cx: self.cx,
            cy,
        }
    }

    /// Shrink horizontally by `dx` on each side.
    pub fn inset_x(&self, dx: i64) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            cx: self.cx.saturating_sub(dx.saturating_mul(2)).max(0),
            ..*self
        }
    }
}

/// Preset geometries a shape may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Rect,
    Ellipse,
    Triangle,
    Line,
    Cloud,
    Hexagon,
    Cube,
    Star,
}

/// Accepted shape names. Anything else draws as a rectangle.
const SHAPE_CATALOG: &[(&str, Geometry)] = &[
    ("rect", Geometry::Rect),
    ("rectangle", Geometry::Rect),
    ("ellipse", Geometry::Ellipse),
    ("triangle", Geometry::Triangle),
    ("line", Geometry::Line),
    ("cloud", Geometry::Cloud),
    ("hexagon", Geometry::Hexagon),
    ("cube", Geometry::Cube),
    ("star", Geometry::Star),
];

impl Geometry {
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name.map(|n| n.trim().to_ascii_lowercase()) else {
            return Self::Rect;
        };
        SHAPE_CATALOG
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, geometry)| *geometry)
            .unwrap_or_else(|| {
                log::debug!("Unknown shape '{}', drawing a rectangle", name);
                Self::Rect
            })
    }

    /// DrawingML preset name.
    pub fn preset(&self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Line => "line",
            Self::Cloud => "cloud",
            Self::Hexagon => "hexagon",
            Self::Cube => "cube",
            Self::Star => "star5",
        }
    }
}

/// Solid fill with renderer transparency (0 opaque, 100 invisible).
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: String,
    pub transparency: f64,
}

impl Fill {
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            transparency: 0.0,
        }
    }

    /// Fill from an element opacity in [0, 1].
    pub fn with_opacity(color: impl Into<String>, opacity: f64) -> Self {
        Self {
            color: color.into(),
            transparency: ((1.0 - opacity) * 100.0).clamp(0.0, 100.0),
        }
    }

    pub fn transparent(color: impl Into<String>, transparency: f64) -> Self {
        Self {
            color: color.into(),
            transparency: transparency.clamp(0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    /// Points.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub geometry: Geometry,
    pub frame: Frame,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    /// Clockwise degrees.
    pub rotation: f64,
}

impl ShapeSpec {
    pub fn rect(frame: Frame, fill: Fill) -> Self {
        Self {
            geometry: Geometry::Rect,
            frame,
            fill: Some(fill),
            stroke: None,
            rotation: 0.0,
        }
    }

    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(Stroke {
            color: color.into(),
            width,
        });
        self
    }
}

/// Vertical anchoring of text in its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Top,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Points.
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: String,
    pub font: Option<String>,
    pub align: Align,
    pub anchor: Anchor,
    pub bullet: bool,
    /// Multiple of single spacing.
    pub line_spacing: Option<f64>,
}

impl TextStyle {
    pub fn new(size: f64, color: impl Into<String>) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
            color: color.into(),
            font: None,
            align: Align::Left,
            anchor: Anchor::Top,
            bullet: false,
            line_spacing: None,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self.anchor = Anchor::Middle;
        self
    }

    pub fn bullets(mut self, line_spacing: Option<f64>) -> Self {
        self.bullet = true;
        self.line_spacing = line_spacing;
        self
    }
}

/// What a text box holds.
#[derive(Debug, Clone, PartialEq)]
pub enum TextContent {
    /// One paragraph per entry.
    Paragraphs(Vec<String>),
    /// An auto-updating slide number field with its cached value.
    SlideNumber(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub frame: Frame,
    pub content: TextContent,
    pub style: TextStyle,
}

impl TextBox {
    pub fn new(frame: Frame, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            frame,
            content: TextContent::Paragraphs(vec![text.into()]),
            style,
        }
    }

    pub fn paragraphs(frame: Frame, paragraphs: Vec<String>, style: TextStyle) -> Self {
        Self {
            frame,
            content: TextContent::Paragraphs(paragraphs),
            style,
        }
    }

    pub fn slide_number(frame: Frame, cached: impl Into<String>, style: TextStyle) -> Self {
        Self {
            frame,
            content: TextContent::SlideNumber(cached.into()),
            style,
        }
    }
}

/// Chart families that can be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Area,
    Doughnut,
    Scatter,
}

const CHART_CATALOG: &[(&str, ChartKind)] = &[
    ("bar", ChartKind::Bar),
    ("line", ChartKind::Line),
    ("pie", ChartKind::Pie),
    ("area", ChartKind::Area),
    ("doughnut", ChartKind::Doughnut),
    ("scatter", ChartKind::Scatter),
];

impl ChartKind {
    /// Resolve a chart name; unknown or missing names are bar charts.
    pub fn from_name(name: Option<&str>) -> Self {
        let name = name.map(|n| n.trim().to_ascii_lowercase()).unwrap_or_default();
        CHART_CATALOG
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::Bar)
    }

    /// Pie-like charts have no axes.
    pub fn has_axes(&self) -> bool {
        !matches!(self, Self::Pie | Self::Doughnut)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub frame: Frame,
    pub kind: ChartKind,
    /// Also the series name.
    pub title: String,
    pub show_title: bool,
    pub show_legend: bool,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub fill: String,
    pub color: String,
    pub bold: bool,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub frame: Frame,
    pub col_widths: Vec<i64>,
    pub row_height: i64,
    pub rows: Vec<TableRow>,
    pub border: Stroke,
    pub font: Option<String>,
}

/// One writer-ready item on a slide or master, in z-order.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Shape(ShapeSpec),
    Text(TextBox),
    Chart(ChartSpec),
    Table(TableSpec),
}
