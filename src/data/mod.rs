/// Data layer: core table types, loading, and the filter/aggregate stage.
///
/// Architecture:
/// ```text
///  data/year_df.csv (.json / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (fixed schema, crime cols renamed)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  compute_totals → filter_rows → group_by_state
///   └──────────┘
///        │
///        ▼
///    chart builders (crate::charts)
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
