use anyhow::Result;
use eframe::egui::Color32;

use crate::data::filter::drop_zero_rows;
use crate::data::model::{Table, Value};
use crate::data::schema::TOTAL_CRIMES;

use super::spec::{Axis, AxisScale, ChartSpec, Layout, Marker, Series, SeriesData, SeriesKind};

// ---------------------------------------------------------------------------
// Scatter builder: total crimes vs. one chosen variable
// ---------------------------------------------------------------------------

/// Build a scatter spec of `total_crimes` (x) against `variable` (y) from the
/// filtered table.
///
/// Rows where any of (State, Year, total_crimes, variable) is zero or missing
/// are dropped wholesale before plotting (see
/// [`crate::data::filter::drop_zero_rows`]). Numeric hover values are shown
/// with two decimals. `scale` applies to both axes, matching the original
/// dashboard.
pub fn build(
    filtered: &Table,
    variable: &str,
    scale: AxisScale,
    color: Option<Color32>,
) -> Result<ChartSpec> {
    let columns = vec![
        "State".to_string(),
        "Year".to_string(),
        TOTAL_CRIMES.to_string(),
        variable.to_string(),
    ];
    let projected = filtered.project(&columns)?;
    let plotted = drop_zero_rows(&projected, &columns)?;

    let totals = plotted.numeric_column(TOTAL_CRIMES)?;
    let variables = plotted.numeric_column(variable)?;

    let hover_text = plotted
        .rows()
        .iter()
        .map(|row| {
            format!(
                "State: {}\nYear: {}\n{variable}: {}\nTotal Crimes: {}",
                fmt_cell(&row[0]),
                fmt_cell(&row[1]),
                fmt_cell(&row[3]),
                fmt_cell(&row[2]),
            )
        })
        .collect();

    Ok(ChartSpec {
        series: vec![Series {
            name: variable.to_string(),
            data: SeriesData::Points {
                kind: SeriesKind::Scatter,
                x: totals,
                y: variables,
            },
            hover_text,
            marker: Marker {
                size: 6.0,
                opacity: 0.5,
                color,
            },
        }],
        layout: Layout::new(
            format!("Total Crimes vs {variable}"),
            Axis {
                title: "Total Crimes".to_string(),
                scale,
            },
            Axis {
                title: variable.to_string(),
                scale,
            },
        ),
    })
}

/// Display form of a cell for hover text: floats get two decimals, integers
/// and text stay as-is.
fn fmt_cell(value: &Value) -> String {
    match value {
        Value::Float(v) => format!("{v:.2}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered() -> Table {
        let mut t = Table::new(vec![
            "State".into(),
            "Year".into(),
            TOTAL_CRIMES.into(),
            "TAVG".into(),
        ]);
        t.push_row(vec![
            Value::Text("Texas".into()),
            Value::Integer(2010),
            Value::Float(8.0),
            Value::Float(21.456),
        ])
        .unwrap();
        // Zero total: dropped even though TAVG is non-zero.
        t.push_row(vec![
            Value::Text("California".into()),
            Value::Integer(2010),
            Value::Float(0.0),
            Value::Float(15.0),
        ])
        .unwrap();
        t
    }

    #[test]
    fn zero_total_row_is_dropped() {
        let spec = build(&filtered(), "TAVG", AxisScale::Linear, None).unwrap();
        match &spec.series[0].data {
            SeriesData::Points { x, y, .. } => {
                assert_eq!(x, &[8.0]);
                assert_eq!(y, &[21.456]);
            }
            other => panic!("expected points, got {other:?}"),
        }
    }

    #[test]
    fn hover_text_rounds_to_two_decimals() {
        let spec = build(&filtered(), "TAVG", AxisScale::Linear, None).unwrap();
        let text = &spec.series[0].hover_text[0];
        assert!(text.contains("State: Texas"));
        assert!(text.contains("Year: 2010"));
        assert!(text.contains("TAVG: 21.46"));
        assert!(text.contains("Total Crimes: 8.00"));
    }

    #[test]
    fn axis_scale_carried_through() {
        let spec = build(&filtered(), "TAVG", AxisScale::Log, None).unwrap();
        assert_eq!(spec.layout.x_axis.scale, AxisScale::Log);
        assert_eq!(spec.layout.y_axis.scale, AxisScale::Log);
    }

    #[test]
    fn unknown_variable_fails() {
        assert!(build(&filtered(), "Median_Income", AxisScale::Linear, None).is_err());
    }
}
