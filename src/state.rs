use std::collections::BTreeSet;

use crate::charts::{AggMode, AxisScale};
use crate::data::filter::{active_states, compute_totals, filter_rows};
use crate::data::model::Table;
use crate::data::schema::{VARIABLES, crime_type_labels};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One variable picker: which column, which axis scale, which aggregation.
#[derive(Debug, Clone)]
pub struct VariableSelection {
    pub column: String,
    pub scale: AxisScale,
    pub agg: AggMode,
}

impl VariableSelection {
    fn new(column: &str) -> Self {
        VariableSelection {
            column: column.to_string(),
            scale: AxisScale::Linear,
            agg: AggMode::Avg,
        }
    }
}

/// The full UI state, independent of rendering.
///
/// The loaded table is read-only after load; `derived` and `filtered` are the
/// materialized intermediates of the pipeline, recomputed eagerly on every
/// selection change so every chart always reflects the current selection.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub table: Option<Table>,

    /// Checked crime-type display names (defaults to all).
    pub crime_checks: BTreeSet<String>,

    /// Chosen state abbreviations (defaults to all present).
    pub state_checks: BTreeSet<String>,

    /// Every state abbreviation in the dataset, for the state picker.
    pub all_states: BTreeSet<String>,

    /// (min, max) year present in the dataset, for the slider range.
    pub year_bounds: (i64, i64),

    /// Upper year bound of the filter (slider value).
    pub max_year: i64,

    /// Optional year at which the total-crimes series draws a vertical line.
    pub marker_year: Option<i64>,

    /// The two independent variable pickers.
    pub var1: VariableSelection,
    pub var2: VariableSelection,

    /// Aggregation for the total-crimes time series.
    pub crime_agg: AggMode,

    /// Table with the `total_crimes` column (follows `crime_checks`).
    pub derived: Option<Table>,

    /// `derived` restricted by year and states; basis for every chart.
    pub filtered: Option<Table>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            crime_checks: BTreeSet::new(),
            state_checks: BTreeSet::new(),
            all_states: BTreeSet::new(),
            year_bounds: (0, 0),
            max_year: 0,
            marker_year: None,
            var1: VariableSelection::new(VARIABLES[0]),
            var2: VariableSelection::new(VARIABLES[1]),
            crime_agg: AggMode::Avg,
            derived: None,
            filtered: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and initialise every selection to its
    /// default: all crime types, all states, the dataset's maximum year.
    pub fn set_table(&mut self, table: Table) {
        self.crime_checks = crime_type_labels().into_iter().collect();
        self.all_states = active_states(&table);
        self.state_checks = self.all_states.clone();

        let years: Vec<i64> = table
            .numeric_column("Year")
            .unwrap_or_default()
            .into_iter()
            .filter(|y| y.is_finite())
            .map(|y| y as i64)
            .collect();
        let min = years.iter().copied().min().unwrap_or(0);
        let max = years.iter().copied().max().unwrap_or(0);
        self.year_bounds = (min, max);
        self.max_year = max;
        self.marker_year = None;

        self.table = Some(table);
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    /// Checked crime types in schema order (the order the map breakdown and
    /// the checkbox column use), not set order.
    pub fn active_crime_types(&self) -> Vec<String> {
        crime_type_labels()
            .into_iter()
            .filter(|label| self.crime_checks.contains(label))
            .collect()
    }

    /// Recompute the derived and filtered tables from the current selection.
    pub fn recompute(&mut self) {
        let Some(table) = &self.table else {
            self.derived = None;
            self.filtered = None;
            return;
        };

        match compute_totals(table, &self.active_crime_types()) {
            Ok(derived) => {
                match filter_rows(&derived, self.max_year, &self.state_checks) {
                    Ok(filtered) => self.filtered = Some(filtered),
                    Err(e) => {
                        log::error!("row filter failed: {e:#}");
                        self.status_message = Some(format!("Error: {e:#}"));
                        self.filtered = None;
                    }
                }
                self.derived = Some(derived);
            }
            Err(e) => {
                log::error!("total computation failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.derived = None;
                self.filtered = None;
            }
        }
    }

    /// Toggle a single crime-type checkbox.
    pub fn toggle_crime_type(&mut self, label: &str) {
        if !self.crime_checks.remove(label) {
            self.crime_checks.insert(label.to_string());
        }
        self.recompute();
    }

    pub fn select_all_crime_types(&mut self) {
        self.crime_checks = crime_type_labels().into_iter().collect();
        self.recompute();
    }

    pub fn select_no_crime_types(&mut self) {
        self.crime_checks.clear();
        self.recompute();
    }

    /// Toggle a single state in the state picker.
    pub fn toggle_state(&mut self, abbrev: &str) {
        if !self.state_checks.remove(abbrev) {
            self.state_checks.insert(abbrev.to_string());
        }
        self.recompute();
    }

    pub fn select_all_states(&mut self) {
        self.state_checks = self.all_states.clone();
        self.recompute();
    }

    pub fn select_no_states(&mut self) {
        self.state_checks.clear();
        self.recompute();
    }

    pub fn set_max_year(&mut self, year: i64) {
        if self.max_year != year {
            self.max_year = year;
            self.recompute();
        }
    }
}
