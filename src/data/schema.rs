//! Fixed schema of the merged state-level dataset.
//!
//! The dataset is one row per (State, Year) with identifier columns, numeric
//! measurement columns (weather, economy, health), and one count column per
//! crime category. Crime columns arrive snake_cased on disk and are renamed
//! to Title Case for display at load time.

/// Identifier columns present in every dataset.
pub const BASE_COLUMNS: [&str; 4] = ["Year", "Date", "State", "State_Abbrev"];

/// Numeric measurement columns (weather, economic, health).
pub const VARIABLES: [&str; 15] = [
    "Gas_Per_Gallon",
    "MENTHLTH",
    "PHYSHLTH",
    "Median_Income",
    "TAVG",
    "TMIN",
    "TMAX",
    "INJURIES_DIRECT",
    "INJURIES_INDIRECT",
    "DEATHS_DIRECT",
    "DEATHS_INDIRECT",
    "DAMAGE_PROPERTY",
    "DAMAGE_CROPS",
    "SPI",
    "Population",
];

/// Crime count columns as they appear in the source file.
pub const CRIME_TYPES_ORIGINAL: [&str; 9] = [
    "violent_crime",
    "homicide",
    "rape_legacy",
    "robbery",
    "aggravated_assault",
    "property_crime",
    "burglary",
    "larceny",
    "motor_vehicle_theft",
];

/// Computed column holding the row-wise sum of the active crime columns.
pub const TOTAL_CRIMES: &str = "total_crimes";

/// Human-readable form of a snake_case crime column:
/// `motor_vehicle_theft` → `Motor Vehicle Theft`.
pub fn display_name(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display names of all crime columns, in schema order.
pub fn crime_type_labels() -> Vec<String> {
    CRIME_TYPES_ORIGINAL.iter().map(|c| display_name(c)).collect()
}
