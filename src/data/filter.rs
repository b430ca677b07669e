use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

use super::model::{Table, Value};
use super::schema::{BASE_COLUMNS, TOTAL_CRIMES, VARIABLES};

// ---------------------------------------------------------------------------
// Filter / aggregate stage
//
// Every function here is a pure table-in / table-out transformation; the
// UI layer calls them in sequence after each selection change:
//
//   loaded ──compute_totals──▶ derived ──filter_rows──▶ filtered
//                                              │
//                              group_by_state ◀┘ (map only)
// ---------------------------------------------------------------------------

/// Project the loaded table onto identifier + variable + active crime
/// columns and append a `total_crimes` column with the row-wise sum of the
/// active crime counts. Missing counts are treated as zero, so an all-null
/// row totals 0 rather than NaN; an empty active set yields all-zero totals.
pub fn compute_totals(table: &Table, active_crime_types: &[String]) -> Result<Table> {
    let mut columns: Vec<String> = BASE_COLUMNS
        .iter()
        .chain(VARIABLES.iter())
        .map(|c| (*c).to_string())
        .collect();
    columns.extend(active_crime_types.iter().cloned());

    let projected = table.project(&columns)?;

    let crime_indices: Vec<usize> = active_crime_types
        .iter()
        .filter_map(|c| projected.column_index(c))
        .collect();

    let totals: Vec<Value> = projected
        .rows()
        .iter()
        .map(|row| {
            let total: f64 = crime_indices
                .iter()
                .filter_map(|&i| row[i].as_f64())
                .filter(|v| v.is_finite())
                .sum();
            Value::Float(total)
        })
        .collect();

    projected.with_column(TOTAL_CRIMES, totals)
}

/// Keep rows with `Year <= max_year` and `State_Abbrev` in the active set,
/// preserving input order. An empty state set gives an empty table. Rows
/// without a numeric year satisfy no year bound and are dropped.
pub fn filter_rows(table: &Table, max_year: i64, active_states: &BTreeSet<String>) -> Result<Table> {
    let year_idx = table
        .column_index("Year")
        .ok_or_else(|| anyhow::anyhow!("unknown column 'Year'"))?;
    let state_idx = table
        .column_index("State_Abbrev")
        .ok_or_else(|| anyhow::anyhow!("unknown column 'State_Abbrev'"))?;

    Ok(table.retain_rows(|row| {
        let year_ok = row[year_idx].as_i64().is_some_and(|y| y <= max_year);
        let state_ok = match &row[state_idx] {
            Value::Text(s) => active_states.contains(s),
            _ => false,
        };
        year_ok && state_ok
    }))
}

/// Sum all numeric columns grouped by (`State_Abbrev`, `State`).
/// Non-numeric columns other than the two keys are dropped. Output rows are
/// ordered by group key, so the map is deterministic for a given input.
pub fn group_by_state(table: &Table) -> Result<Table> {
    let abbrev_idx = table
        .column_index("State_Abbrev")
        .ok_or_else(|| anyhow::anyhow!("unknown column 'State_Abbrev'"))?;
    let state_idx = table
        .column_index("State")
        .ok_or_else(|| anyhow::anyhow!("unknown column 'State'"))?;

    // A column is numeric when every non-null cell coerces to f64.
    let numeric_indices: Vec<usize> = (0..table.columns().len())
        .filter(|&i| i != abbrev_idx && i != state_idx)
        .filter(|&i| {
            table
                .rows()
                .iter()
                .all(|row| row[i].is_null() || row[i].as_f64().is_some())
        })
        .collect();

    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        let key = (row[abbrev_idx].to_string(), row[state_idx].to_string());
        let sums = groups
            .entry(key)
            .or_insert_with(|| vec![0.0; numeric_indices.len()]);
        for (slot, &i) in sums.iter_mut().zip(&numeric_indices) {
            if let Some(v) = row[i].as_f64() {
                if v.is_finite() {
                    *slot += v;
                }
            }
        }
    }

    let mut columns = vec!["State_Abbrev".to_string(), "State".to_string()];
    columns.extend(numeric_indices.iter().map(|&i| table.columns()[i].clone()));

    let mut out = Table::new(columns);
    for ((abbrev, state), sums) in groups {
        let mut row = vec![Value::Text(abbrev), Value::Text(state)];
        row.extend(sums.into_iter().map(Value::Float));
        out.push_row(row)?;
    }
    Ok(out)
}

/// Remove every row where ANY of the named columns is zero, NaN, or missing.
///
/// This is deliberately all-or-nothing: a row with a zero `total_crimes` is
/// dropped even when the paired variable is non-zero. Callers plotting
/// scatter views rely on this to avoid degenerate points on log axes.
pub fn drop_zero_rows(table: &Table, columns: &[String]) -> Result<Table> {
    let indices: Vec<usize> = columns
        .iter()
        .map(|name| {
            table
                .column_index(name)
                .ok_or_else(|| anyhow::anyhow!("unknown column '{name}'"))
        })
        .collect::<Result<_>>()?;

    Ok(table.retain_rows(|row| {
        indices.iter().all(|&i| match &row[i] {
            Value::Null => false,
            v => match v.as_f64() {
                Some(f) => f != 0.0 && !f.is_nan(),
                None => true, // text cells never count as zero
            },
        })
    }))
}

/// The set of state abbreviations present in the table. A table without a
/// `State_Abbrev` column recovers to the sentinel national set `{"USA"}`.
pub fn active_states(table: &Table) -> BTreeSet<String> {
    match table.column_index("State_Abbrev") {
        Some(idx) => table
            .rows()
            .iter()
            .filter_map(|row| match &row[idx] {
                Value::Text(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        None => BTreeSet::from(["USA".to_string()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{CRIME_TYPES_ORIGINAL, display_name};

    /// Two states, three rows, full schema:
    /// TX 2010 {Robbery 5, Burglary 3}, TX 2011 {5, 3}, CA 2010 {2, 1}.
    fn sample() -> Table {
        let mut columns: Vec<String> = BASE_COLUMNS
            .iter()
            .chain(VARIABLES.iter())
            .map(|c| (*c).to_string())
            .collect();
        columns.extend(CRIME_TYPES_ORIGINAL.iter().map(|c| display_name(c)));

        let mut table = Table::new(columns);
        for (year, state, abbrev, robbery, burglary) in [
            (2010, "Texas", "TX", 5.0, 3.0),
            (2011, "Texas", "TX", 5.0, 3.0),
            (2010, "California", "CA", 2.0, 1.0),
        ] {
            let mut row = vec![
                Value::Integer(year),
                Value::Text(format!("{year}-01-01")),
                Value::Text(state.into()),
                Value::Text(abbrev.into()),
            ];
            row.extend(VARIABLES.iter().map(|_| Value::Float(1.0)));
            for crime in CRIME_TYPES_ORIGINAL {
                let v = match crime {
                    "robbery" => Value::Float(robbery),
                    "burglary" => Value::Float(burglary),
                    _ => Value::Float(0.0),
                };
                row.push(v);
            }
            table.push_row(row).unwrap();
        }
        table
    }

    fn states(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn totals_sum_active_columns() {
        let active = vec!["Robbery".to_string(), "Burglary".to_string()];
        let derived = compute_totals(&sample(), &active).unwrap();

        assert_eq!(derived.cell(0, TOTAL_CRIMES), Some(&Value::Float(8.0)));
        assert_eq!(derived.cell(1, TOTAL_CRIMES), Some(&Value::Float(8.0)));
        assert_eq!(derived.cell(2, TOTAL_CRIMES), Some(&Value::Float(3.0)));
        // Inactive crime columns are projected away.
        assert!(derived.column_index("Homicide").is_none());
    }

    #[test]
    fn totals_treat_null_as_zero() {
        let mut table = sample();
        // Null out one robbery cell: 8 → 3 for that row, never NaN.
        let mut rows: Vec<Vec<Value>> = table.rows().to_vec();
        let idx = table.column_index("Robbery").unwrap();
        rows[0][idx] = Value::Null;
        let mut rebuilt = Table::new(table.columns().to_vec());
        for row in rows {
            rebuilt.push_row(row).unwrap();
        }
        table = rebuilt;

        let active = vec!["Robbery".to_string(), "Burglary".to_string()];
        let derived = compute_totals(&table, &active).unwrap();
        assert_eq!(derived.cell(0, TOTAL_CRIMES), Some(&Value::Float(3.0)));
    }

    #[test]
    fn empty_active_set_gives_zero_totals() {
        let derived = compute_totals(&sample(), &[]).unwrap();
        for i in 0..derived.len() {
            assert_eq!(derived.cell(i, TOTAL_CRIMES), Some(&Value::Float(0.0)));
        }
    }

    #[test]
    fn filter_rows_bounds_year_and_states() {
        let filtered = filter_rows(&sample(), 2010, &states(&["TX"])).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.cell(0, "Year"), Some(&Value::Integer(2010)));
        assert_eq!(filtered.cell(0, "State_Abbrev"), Some(&Value::Text("TX".into())));
    }

    #[test]
    fn filter_rows_result_satisfies_predicate() {
        let table = sample();
        let filtered = filter_rows(&table, 2010, &states(&["TX", "CA"])).unwrap();
        assert!(filtered.len() <= table.len());
        for i in 0..filtered.len() {
            assert!(filtered.cell(i, "Year").unwrap().as_i64().unwrap() <= 2010);
        }
    }

    #[test]
    fn filter_rows_empty_states_gives_empty_table() {
        let filtered = filter_rows(&sample(), 2011, &BTreeSet::new()).unwrap();
        assert!(filtered.is_empty());
        assert_eq!(filtered.columns().len(), sample().columns().len());
    }

    #[test]
    fn filter_rows_is_idempotent() {
        let s = states(&["TX"]);
        let once = filter_rows(&sample(), 2011, &s).unwrap();
        let twice = filter_rows(&once, 2011, &s).unwrap();
        assert_eq!(once.rows(), twice.rows());
    }

    #[test]
    fn group_by_state_sums_and_sorts() {
        let active = vec!["Robbery".to_string(), "Burglary".to_string()];
        let derived = compute_totals(&sample(), &active).unwrap();
        let grouped = group_by_state(&derived).unwrap();

        // BTreeMap ordering: CA before TX.
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.cell(0, "State_Abbrev"), Some(&Value::Text("CA".into())));
        assert_eq!(grouped.cell(1, "State_Abbrev"), Some(&Value::Text("TX".into())));
        // TX totals 8 + 8 across its two years.
        assert_eq!(grouped.cell(1, TOTAL_CRIMES), Some(&Value::Float(16.0)));
        assert_eq!(grouped.cell(1, "Robbery"), Some(&Value::Float(10.0)));
        // The text Date column does not survive grouping.
        assert!(grouped.column_index("Date").is_none());
    }

    #[test]
    fn drop_zero_rows_is_all_or_nothing() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table
            .push_row(vec![Value::Float(1.0), Value::Float(2.0)])
            .unwrap();
        table
            .push_row(vec![Value::Float(0.0), Value::Float(2.0)])
            .unwrap();
        table.push_row(vec![Value::Null, Value::Float(2.0)]).unwrap();
        table
            .push_row(vec![Value::Float(1.0), Value::Float(f64::NAN)])
            .unwrap();

        let cols = vec!["a".to_string(), "b".to_string()];
        let kept = drop_zero_rows(&table, &cols).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.cell(0, "a"), Some(&Value::Float(1.0)));
        assert_eq!(kept.columns(), table.columns());
    }

    #[test]
    fn drop_zero_rows_ignores_text_cells() {
        let mut table = Table::new(vec!["State".into(), "n".into()]);
        table
            .push_row(vec![Value::Text("Texas".into()), Value::Float(4.0)])
            .unwrap();
        let cols = vec!["State".to_string(), "n".to_string()];
        assert_eq!(drop_zero_rows(&table, &cols).unwrap().len(), 1);
    }

    #[test]
    fn active_states_unique_values() {
        assert_eq!(active_states(&sample()), states(&["CA", "TX"]));
    }

    #[test]
    fn active_states_falls_back_to_usa() {
        let table = Table::new(vec!["Year".into()]);
        assert_eq!(active_states(&table), states(&["USA"]));
    }
}
