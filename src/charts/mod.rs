/// Chart builders: pure `Table × options → ChartSpec` functions.
///
/// Each builder is stateless and idempotent; the UI rebuilds every affected
/// spec from the current filtered table after each selection change, and the
/// renderer (`crate::ui::plot`) draws whatever spec it is handed.

pub mod map;
pub mod scatter;
pub mod spec;
pub mod time_series;

pub use spec::{AggMode, AxisScale, ChartSpec};
