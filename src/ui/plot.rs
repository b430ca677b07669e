use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::charts::spec::{AxisScale, ChartSpec, SeriesData, SeriesKind};
use crate::color::ColorScale;

// ---------------------------------------------------------------------------
// ChartSpec renderer
//
// The builders in crate::charts stay renderer-agnostic; this module maps a
// spec onto egui_plot. Two renderer-level conventions:
// * egui_plot has no log axis, so Log scales plot log10(value) and the axis
//   label says so; non-positive values cannot appear on a log axis and are
//   skipped.
// * egui has no geographic projection, so a choropleth series is drawn as
//   one color-scaled bar per state.
// ---------------------------------------------------------------------------

/// Render a chart spec. Dispatches on the series kind.
pub fn chart(ui: &mut Ui, id: &str, spec: &ChartSpec) {
    for note in &spec.layout.annotations {
        ui.label(RichText::new(note).strong());
    }

    let is_choropleth = spec
        .series
        .iter()
        .any(|s| matches!(s.data, SeriesData::Choropleth { .. }));
    if is_choropleth {
        choropleth_chart(ui, id, spec);
    } else {
        xy_chart(ui, id, spec);
    }
}

fn axis_label(title: &str, scale: AxisScale) -> String {
    match scale {
        AxisScale::Linear => title.to_string(),
        AxisScale::Log => format!("{title} (log10)"),
    }
}

fn scaled(value: f64, scale: AxisScale) -> Option<f64> {
    match scale {
        AxisScale::Linear => Some(value),
        AxisScale::Log => (value > 0.0).then(|| value.log10()),
    }
}

// ---------------------------------------------------------------------------
// Scatter / time-series rendering
// ---------------------------------------------------------------------------

fn xy_chart(ui: &mut Ui, id: &str, spec: &ChartSpec) {
    let x_scale = spec.layout.x_axis.scale;
    let y_scale = spec.layout.y_axis.scale;

    // (x, y, hover text) in plot coordinates, for nearest-point lookup.
    let mut hover_points: Vec<(f64, f64, String)> = Vec::new();

    let response = Plot::new(id.to_string())
        .height(spec.layout.height)
        .legend(Legend::default())
        .x_axis_label(axis_label(&spec.layout.x_axis.title, x_scale))
        .y_axis_label(axis_label(&spec.layout.y_axis.title, y_scale))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &spec.series {
                let SeriesData::Points { kind, x, y } = &series.data else {
                    continue;
                };

                let color = series
                    .marker
                    .color
                    .unwrap_or(Color32::LIGHT_BLUE)
                    .gamma_multiply(series.marker.opacity);

                let mut points: Vec<[f64; 2]> = Vec::with_capacity(x.len());
                for (i, (&xi, &yi)) in x.iter().zip(y.iter()).enumerate() {
                    let (Some(px), Some(py)) = (scaled(xi, x_scale), scaled(yi, y_scale)) else {
                        continue;
                    };
                    points.push([px, py]);
                    if let Some(text) = series.hover_text.get(i) {
                        hover_points.push((px, py, text.clone()));
                    }
                }

                match kind {
                    SeriesKind::Scatter => {
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .name(&series.name)
                                .color(color)
                                .shape(MarkerShape::Circle)
                                .filled(true)
                                .radius(series.marker.size),
                        );
                    }
                    SeriesKind::LineMarkers => {
                        plot_ui.line(
                            Line::new(PlotPoints::from(points.clone()))
                                .name(&series.name)
                                .color(color)
                                .width(1.5),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .color(color)
                                .shape(MarkerShape::Circle)
                                .filled(true)
                                .radius(series.marker.size),
                        );
                    }
                }
            }

            // Vertical reference lines (the highlight-year marker).
            for shape in &spec.layout.shapes {
                let (Some(y0), Some(y1)) = (scaled(shape.y0, y_scale), scaled(shape.y1, y_scale))
                else {
                    continue;
                };
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[shape.x, y0], [shape.x, y1]]))
                        .color(shape.color)
                        .width(shape.width),
                );
            }

            nearest_hover_text(plot_ui, &hover_points)
        });

    if let Some(text) = response.inner {
        response.response.on_hover_text_at_pointer(text);
    }
}

/// Hover text of the point nearest the pointer, normalized by the visible
/// plot bounds so proximity is judged on screen, not in data units.
fn nearest_hover_text(
    plot_ui: &egui_plot::PlotUi,
    points: &[(f64, f64, String)],
) -> Option<String> {
    let pointer = plot_ui.pointer_coordinate()?;
    let bounds = plot_ui.plot_bounds();
    let width = (bounds.max()[0] - bounds.min()[0]).abs().max(f64::EPSILON);
    let height = (bounds.max()[1] - bounds.min()[1]).abs().max(f64::EPSILON);

    points
        .iter()
        .map(|(x, y, text)| {
            let dx = (x - pointer.x) / width;
            let dy = (y - pointer.y) / height;
            (dx * dx + dy * dy, text)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .filter(|(d2, _)| *d2 < 0.001)
        .map(|(_, text)| text.clone())
}

// ---------------------------------------------------------------------------
// Choropleth rendering (per-state color-scaled bars)
// ---------------------------------------------------------------------------

fn choropleth_chart(ui: &mut Ui, id: &str, spec: &ChartSpec) {
    ui.label(RichText::new(&spec.layout.title).strong());

    let Some(series) = spec.series.first() else {
        return;
    };
    let SeriesData::Choropleth { locations, values } = &series.data else {
        return;
    };

    let scale = ColorScale::from_values(values);
    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| Bar::new(i as f64, v).width(0.8).fill(scale.color_for(v)))
        .collect();

    let hover_text = series.hover_text.clone();
    let n = locations.len();

    let response = Plot::new(id.to_string())
        .height(spec.layout.height)
        .x_axis_label(spec.layout.x_axis.title.clone())
        .y_axis_label(spec.layout.y_axis.title.clone())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_grid(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));

            // Hover resolves to the bar under the pointer's x position.
            plot_ui.pointer_coordinate().and_then(|pointer| {
                let idx = pointer.x.round();
                if idx < 0.0 || idx >= n as f64 || (pointer.x - idx).abs() > 0.4 {
                    return None;
                }
                hover_text.get(idx as usize).cloned()
            })
        });

    if let Some(text) = response.inner {
        response.response.on_hover_text_at_pointer(text);
    }
}
