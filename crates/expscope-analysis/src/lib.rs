//! Analysis functions over experiment results tables.
//!
//! Every function is stateless: `(table, column names, options) ->
//! derived table or chart specification`. Chart specs are plain serde
//! structs; rendering them is a front-end concern.

pub mod aggregate;
pub mod chart;
pub mod compare;
pub mod correlation;
pub mod distribution;
pub mod error;
pub mod failure;
pub mod report;
pub mod stattest;
pub mod whisker;

pub use aggregate::{
    categorical_counts, config_mean_table, metric_percentiles, percentile_plot,
    CategoricalCount, PercentileRow, ValueCount,
};
pub use chart::{
    BarChart, BarSeries, BoxGroup, BoxPlot, Heatmap, LineChart, LineSeries, PieChart, ViolinPlot,
};
pub use compare::compare_experiments;
pub use correlation::{
    correlation_heatmap, pearson, target_correlation_heatmap, target_correlations,
    CorrelationEntry,
};
pub use distribution::{score_distributions, violin_plot};
pub use error::{Error, Result};
pub use failure::{failure_rate_by_config, status_by_config, status_distribution};
pub use report::{build_report, to_json_pretty, ExperimentReport, ReportOptions};
pub use stattest::{pairwise_tests, PairComparison, TestKind};
pub use whisker::whisker_plots;

/// Default significance threshold for pairwise tests.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default group count for top/bottom whisker partitioning.
pub const DEFAULT_TOP_N: usize = 5;
