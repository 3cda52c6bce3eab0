//! Cross-experiment comparison of one target metric.

use expscope_core::{ResultsTable, TRIAL_ID_COL};

use crate::chart::{LineChart, LineSeries};
use crate::Result;

/// Plot `target_col` over trial id for several experiments, one
/// series per experiment. Every table must carry the target column;
/// trials where either side fails to coerce are dropped from that
/// experiment's series.
pub fn compare_experiments(
    experiments: &[(String, &ResultsTable)],
    target_col: &str,
) -> Result<LineChart> {
    let mut series = Vec::with_capacity(experiments.len());
    for (experiment_id, table) in experiments {
        let trial_ids = table.numeric_column(TRIAL_ID_COL)?;
        let values = table.numeric_column(target_col)?;

        let mut x = Vec::new();
        let mut y = Vec::new();
        for (trial, value) in trial_ids.iter().zip(values.iter()) {
            if let (Some(trial), Some(value)) = (trial, value) {
                if trial.is_finite() && value.is_finite() {
                    x.push(*trial);
                    y.push(*value);
                }
            }
        }

        series.push(LineSeries {
            name: format!("Experiment {}", experiment_id),
            x,
            y,
        });
    }

    Ok(LineChart {
        title: format!("Comparison of {} Across Experiments", target_col),
        x_title: "Trial ID".to_string(),
        y_title: target_col.to_string(),
        series,
    })
}
