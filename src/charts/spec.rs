use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Declarative chart description
//
// Builders emit these; the rendering layer (crate::ui::plot) consumes them.
// Nothing here knows about egui_plot, so the spec of a chart can be built
// and asserted on without a UI.
// ---------------------------------------------------------------------------

/// Axis scale for scatter and time-series charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

impl AxisScale {
    pub fn label(self) -> &'static str {
        match self {
            AxisScale::Linear => "Linear",
            AxisScale::Log => "Log",
        }
    }
}

/// How grouped values are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggMode {
    Avg,
    Sum,
}

impl AggMode {
    pub fn label(self) -> &'static str {
        match self {
            AggMode::Avg => "Avg",
            AggMode::Sum => "Sum",
        }
    }
}

/// Whether point data is drawn as free markers or a connected line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Scatter,
    LineMarkers,
}

/// The data payload of one series.
#[derive(Debug, Clone)]
pub enum SeriesData {
    /// Region-keyed values: one entry per state abbreviation.
    Choropleth {
        locations: Vec<String>,
        values: Vec<f64>,
    },
    /// Plain x/y points.
    Points {
        kind: SeriesKind,
        x: Vec<f64>,
        y: Vec<f64>,
    },
}

/// Marker styling for point-like series.
#[derive(Debug, Clone)]
pub struct Marker {
    pub size: f32,
    pub opacity: f32,
    /// `None` lets the renderer pick its default series color.
    pub color: Option<Color32>,
}

impl Default for Marker {
    fn default() -> Self {
        Marker {
            size: 4.0,
            opacity: 1.0,
            color: None,
        }
    }
}

/// One plottable series: data plus per-point hover text.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub data: SeriesData,
    /// One entry per data point; empty when the series has no hover text.
    pub hover_text: Vec<String>,
    pub marker: Marker,
}

#[derive(Debug, Clone)]
pub struct Axis {
    pub title: String,
    pub scale: AxisScale,
}

impl Axis {
    pub fn linear(title: impl Into<String>) -> Self {
        Axis {
            title: title.into(),
            scale: AxisScale::Linear,
        }
    }
}

/// A vertical reference line, e.g. the highlight-year marker.
#[derive(Debug, Clone)]
pub struct VerticalLine {
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
    pub width: f32,
    pub color: Color32,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub height: f32,
    /// Free-floating text annotations (the time-series title card).
    pub annotations: Vec<String>,
    pub shapes: Vec<VerticalLine>,
}

impl Layout {
    pub fn new(title: impl Into<String>, x_axis: Axis, y_axis: Axis) -> Self {
        Layout {
            title: title.into(),
            x_axis,
            y_axis,
            height: 300.0,
            annotations: Vec::new(),
            shapes: Vec::new(),
        }
    }
}

/// A complete chart: series plus layout, ready for the renderer.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub series: Vec<Series>,
    pub layout: Layout,
}
