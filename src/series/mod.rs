pub mod builder;

pub use builder::{build_chart, ChartData, SeriesError};
