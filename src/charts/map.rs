use anyhow::Result;

use crate::data::model::Table;
use crate::data::schema::TOTAL_CRIMES;

use super::spec::{Axis, ChartSpec, Layout, Marker, Series, SeriesData};

// ---------------------------------------------------------------------------
// Map builder: per-state choropleth of total crimes
// ---------------------------------------------------------------------------

/// Build the choropleth spec from the state-grouped table.
///
/// One series keyed by `State_Abbrev`, valued by `total_crimes`, with hover
/// text listing the state name, the total, and a per-crime-type breakdown.
/// Counts are formatted as integers for display.
pub fn build(grouped: &Table, active_crime_types: &[String]) -> Result<ChartSpec> {
    let abbrev_idx = grouped
        .column_index("State_Abbrev")
        .ok_or_else(|| anyhow::anyhow!("unknown column 'State_Abbrev'"))?;
    let state_idx = grouped
        .column_index("State")
        .ok_or_else(|| anyhow::anyhow!("unknown column 'State'"))?;
    let totals = grouped.numeric_column(TOTAL_CRIMES)?;

    let crime_indices: Vec<(usize, &String)> = active_crime_types
        .iter()
        .map(|name| {
            grouped
                .column_index(name)
                .map(|i| (i, name))
                .ok_or_else(|| anyhow::anyhow!("unknown column '{name}'"))
        })
        .collect::<Result<_>>()?;

    let mut locations = Vec::with_capacity(grouped.len());
    let mut values = Vec::with_capacity(grouped.len());
    let mut hover_text = Vec::with_capacity(grouped.len());

    for (row, &total) in grouped.rows().iter().zip(&totals) {
        let total = if total.is_finite() { total } else { 0.0 };
        locations.push(row[abbrev_idx].to_string());
        values.push(total);

        let mut text = format!(
            "{}\n\nTotal Crimes: {}\n",
            row[state_idx],
            total.round() as i64
        );
        for &(idx, name) in &crime_indices {
            let count = row[idx].as_f64().unwrap_or(0.0).round() as i64;
            text.push_str(&format!("\n{name}: {count}"));
        }
        hover_text.push(text);
    }

    Ok(ChartSpec {
        series: vec![Series {
            name: TOTAL_CRIMES.to_string(),
            data: SeriesData::Choropleth { locations, values },
            hover_text,
            marker: Marker::default(),
        }],
        layout: Layout::new(
            "Crimes per State",
            Axis::linear("State"),
            Axis::linear("Total Crimes"),
        ),
    })
}
