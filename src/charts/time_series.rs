use std::collections::BTreeMap;

use anyhow::Result;
use eframe::egui::Color32;

use crate::data::model::Table;

use super::spec::{
    AggMode, Axis, AxisScale, ChartSpec, Layout, Marker, Series, SeriesData, SeriesKind,
    VerticalLine,
};

/// Color of the highlight-year vertical line.
const MARKER_LINE_COLOR: Color32 = Color32::from_rgb(55, 128, 191);

// ---------------------------------------------------------------------------
// Time-series builder: one aggregated point per year
// ---------------------------------------------------------------------------

/// Build a line+markers spec of `value_column` aggregated per year.
///
/// Rows are grouped by `Year` (ascending) and reduced with the chosen
/// [`AggMode`]: `Sum` treats missing values as zero and always emits the
/// year; `Avg` takes the mean of the values present and skips a year with
/// none. A `highlight_year` adds a vertical line spanning from the smallest
/// strictly-positive aggregated value up to the series maximum; when no
/// strictly-positive value exists the lower bound falls back to 0.0, as does
/// the upper bound of an empty series.
pub fn build(
    table: &Table,
    value_column: &str,
    scale: AxisScale,
    agg: AggMode,
    highlight_year: Option<i64>,
    title: &str,
    color: Option<Color32>,
) -> Result<ChartSpec> {
    let year_idx = table
        .column_index("Year")
        .ok_or_else(|| anyhow::anyhow!("unknown column 'Year'"))?;
    let value_idx = table
        .column_index(value_column)
        .ok_or_else(|| anyhow::anyhow!("unknown column '{value_column}'"))?;

    // Year → values present that year (missing cells recorded as absent).
    let mut groups: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        let Some(year) = row[year_idx].as_i64() else {
            continue;
        };
        let entry = groups.entry(year).or_default();
        if let Some(v) = row[value_idx].as_f64() {
            if v.is_finite() {
                entry.push(v);
            }
        }
    }

    let mut x = Vec::with_capacity(groups.len());
    let mut y = Vec::with_capacity(groups.len());
    for (year, values) in &groups {
        let point = match agg {
            AggMode::Sum => values.iter().sum::<f64>(),
            AggMode::Avg => {
                if values.is_empty() {
                    continue;
                }
                values.iter().sum::<f64>() / values.len() as f64
            }
        };
        x.push(*year as f64);
        y.push(point);
    }

    let mut layout = Layout::new(
        title,
        Axis::linear("Year"),
        Axis {
            title: value_column.to_string(),
            scale,
        },
    );
    layout.height = 225.0;
    layout.annotations.push(title.to_string());

    if let Some(year) = highlight_year {
        let y0 = y
            .iter()
            .copied()
            .filter(|v| *v > 0.0)
            .fold(f64::INFINITY, f64::min);
        let y0 = if y0.is_finite() { y0 } else { 0.0 };
        let y1 = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let y1 = if y1.is_finite() { y1 } else { 0.0 };

        layout.shapes.push(VerticalLine {
            x: year as f64,
            y0,
            y1,
            width: 3.0,
            color: MARKER_LINE_COLOR,
        });
    }

    Ok(ChartSpec {
        series: vec![Series {
            name: value_column.to_string(),
            data: SeriesData::Points {
                kind: SeriesKind::LineMarkers,
                x,
                y,
            },
            hover_text: Vec::new(),
            marker: Marker {
                size: 4.0,
                opacity: 1.0,
                color,
            },
        }],
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn table(rows: &[(i64, Option<f64>)]) -> Table {
        let mut t = Table::new(vec!["Year".into(), "total_crimes".into()]);
        for &(year, value) in rows {
            t.push_row(vec![
                Value::Integer(year),
                value.map(Value::Float).unwrap_or(Value::Null),
            ])
            .unwrap();
        }
        t
    }

    fn points(spec: &ChartSpec) -> (Vec<f64>, Vec<f64>) {
        match &spec.series[0].data {
            SeriesData::Points { x, y, .. } => (x.clone(), y.clone()),
            other => panic!("expected points, got {other:?}"),
        }
    }

    #[test]
    fn sum_groups_by_year() {
        let t = table(&[(2010, Some(4.0)), (2010, Some(6.0)), (2011, Some(10.0))]);
        let spec = build(
            &t,
            "total_crimes",
            AxisScale::Linear,
            AggMode::Sum,
            None,
            "Total Crimes",
            None,
        )
        .unwrap();
        let (x, y) = points(&spec);
        assert_eq!(x, vec![2010.0, 2011.0]);
        assert_eq!(y, vec![10.0, 10.0]);
    }

    #[test]
    fn sum_scales_linearly() {
        let base = table(&[(2010, Some(4.0)), (2010, Some(6.0)), (2011, Some(10.0))]);
        let doubled = table(&[(2010, Some(8.0)), (2010, Some(12.0)), (2011, Some(20.0))]);
        let build_sum = |t: &Table| {
            build(
                t,
                "total_crimes",
                AxisScale::Linear,
                AggMode::Sum,
                None,
                "t",
                None,
            )
            .unwrap()
        };
        let (_, y1) = points(&build_sum(&base));
        let (_, y2) = points(&build_sum(&doubled));
        for (a, b) in y1.iter().zip(&y2) {
            assert_eq!(*b, 2.0 * a);
        }
    }

    #[test]
    fn avg_takes_mean_of_present_values() {
        let t = table(&[(2010, Some(4.0)), (2010, Some(6.0)), (2011, None)]);
        let spec = build(
            &t,
            "total_crimes",
            AxisScale::Linear,
            AggMode::Avg,
            None,
            "t",
            None,
        )
        .unwrap();
        let (x, y) = points(&spec);
        // 2011 has no present values and is skipped.
        assert_eq!(x, vec![2010.0]);
        assert_eq!(y, vec![5.0]);
    }

    #[test]
    fn sum_treats_missing_as_zero() {
        let t = table(&[(2011, None)]);
        let spec = build(
            &t,
            "total_crimes",
            AxisScale::Linear,
            AggMode::Sum,
            None,
            "t",
            None,
        )
        .unwrap();
        let (x, y) = points(&spec);
        assert_eq!(x, vec![2011.0]);
        assert_eq!(y, vec![0.0]);
    }

    #[test]
    fn highlight_year_spans_positive_min_to_max() {
        let t = table(&[(2010, Some(0.0)), (2011, Some(3.0)), (2012, Some(9.0))]);
        let spec = build(
            &t,
            "total_crimes",
            AxisScale::Linear,
            AggMode::Sum,
            Some(2011),
            "t",
            None,
        )
        .unwrap();
        let line = &spec.layout.shapes[0];
        assert_eq!(line.x, 2011.0);
        // Zero point is ignored for the lower bound.
        assert_eq!(line.y0, 3.0);
        assert_eq!(line.y1, 9.0);
    }

    #[test]
    fn highlight_year_sentinel_when_no_positive_values() {
        let t = table(&[(2010, Some(0.0)), (2011, Some(0.0))]);
        let spec = build(
            &t,
            "total_crimes",
            AxisScale::Linear,
            AggMode::Sum,
            Some(2010),
            "t",
            None,
        )
        .unwrap();
        let line = &spec.layout.shapes[0];
        assert_eq!(line.y0, 0.0);
        assert_eq!(line.y1, 0.0);
    }

    #[test]
    fn no_highlight_year_no_shapes() {
        let t = table(&[(2010, Some(1.0))]);
        let spec = build(
            &t,
            "total_crimes",
            AxisScale::Linear,
            AggMode::Sum,
            None,
            "t",
            None,
        )
        .unwrap();
        assert!(spec.layout.shapes.is_empty());
    }

    #[test]
    fn idempotent_for_same_inputs() {
        let t = table(&[(2010, Some(4.0)), (2011, Some(6.0))]);
        let make = || {
            build(
                &t,
                "total_crimes",
                AxisScale::Log,
                AggMode::Avg,
                Some(2010),
                "t",
                None,
            )
            .unwrap()
        };
        let (a, b) = (make(), make());
        assert_eq!(points(&a), points(&b));
        assert_eq!(a.layout.shapes[0].y0, b.layout.shapes[0].y0);
    }
}
