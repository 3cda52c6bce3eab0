//! Bundled analysis report for one experiment.

use chrono::{DateTime, Utc};
use expscope_core::{ResultsTable, CONFIG_ID_COL};
use serde::{Deserialize, Serialize};

use crate::aggregate::{categorical_counts, metric_percentiles, CategoricalCount, PercentileRow};
use crate::chart::{BarChart, BoxPlot, Heatmap, PieChart};
use crate::correlation::{correlation_heatmap, target_correlations, CorrelationEntry};
use crate::failure::{failure_rate_by_config, status_by_config, status_distribution};
use crate::stattest::{pairwise_tests, PairComparison, TestKind};
use crate::whisker::whisker_plots;
use crate::{Result, DEFAULT_ALPHA, DEFAULT_TOP_N};

/// Knobs for [`build_report`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Result column the whisker plots, correlations and pairwise
    /// tests target.
    pub metric: String,
    pub group_col: String,
    pub top_n: usize,
    pub alpha: f64,
    pub test: TestKind,
}

impl ReportOptions {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            group_col: CONFIG_ID_COL.to_string(),
            top_n: DEFAULT_TOP_N,
            alpha: DEFAULT_ALPHA,
            test: TestKind::Welch,
        }
    }
}

/// Everything the explorer derives from one experiment's table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub experiment_id: String,
    pub generated_at: DateTime<Utc>,
    pub trial_count: usize,
    pub options: ReportOptions,
    pub whisker_top: BoxPlot,
    pub whisker_bottom: BoxPlot,
    pub correlation_heatmap: Heatmap,
    pub target_correlations: Vec<CorrelationEntry>,
    pub status_distribution: PieChart,
    pub status_by_config: BarChart,
    pub failure_rate_by_config: BarChart,
    pub pairwise_tests: Vec<PairComparison>,
    pub metric_percentiles: Vec<PercentileRow>,
    pub categorical_counts: Vec<CategoricalCount>,
}

pub fn build_report(
    experiment_id: &str,
    table: &ResultsTable,
    options: &ReportOptions,
) -> Result<ExperimentReport> {
    let (whisker_top, whisker_bottom) =
        whisker_plots(table, &options.group_col, &options.metric, options.top_n)?;

    Ok(ExperimentReport {
        experiment_id: experiment_id.to_string(),
        generated_at: Utc::now(),
        trial_count: table.row_count(),
        options: options.clone(),
        whisker_top,
        whisker_bottom,
        correlation_heatmap: correlation_heatmap(table)?,
        target_correlations: target_correlations(table, &options.metric)?,
        status_distribution: status_distribution(table)?,
        status_by_config: status_by_config(table, &options.group_col)?,
        failure_rate_by_config: failure_rate_by_config(table, &options.group_col)?,
        pairwise_tests: pairwise_tests(
            table,
            &options.metric,
            &options.group_col,
            options.test,
            options.alpha,
        )?,
        metric_percentiles: metric_percentiles(table, &options.group_col, &options.metric)?,
        categorical_counts: categorical_counts(table)?,
    })
}

/// Prettified JSON form of a report.
pub fn to_json_pretty(report: &ExperimentReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
