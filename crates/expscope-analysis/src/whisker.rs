use expscope_core::ResultsTable;

use crate::chart::{BoxGroup, BoxPlot};
use crate::Result;

/// Partition configurations into the top-`n` and bottom-`n` by mean
/// of `metric_col` and produce one box plot for each partition.
///
/// Fewer than `n` groups is fine; the partitions then overlap or come
/// up short. Groups whose metric never coerces to a number are
/// dropped, as is an entirely empty table.
pub fn whisker_plots(
    table: &ResultsTable,
    group_col: &str,
    metric_col: &str,
    n: usize,
) -> Result<(BoxPlot, BoxPlot)> {
    let mut ranked: Vec<(String, f64, Vec<f64>)> = Vec::new();

    if !table.is_empty() {
        let metric = table.numeric_column(metric_col)?;
        for (label, rows) in table.group_rows(group_col)? {
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|&i| metric[i])
                .filter(|v| v.is_finite())
                .collect();
            if values.is_empty() {
                continue;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            ranked.push((label, mean, values));
        }
    }

    let mut by_desc = ranked.clone();
    by_desc.sort_by(|a, b| b.1.total_cmp(&a.1));
    let top_groups = by_desc
        .iter()
        .take(n)
        .map(|(label, _, values)| BoxGroup {
            label: label.clone(),
            values: values.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    let bottom_groups = ranked
        .iter()
        .take(n)
        .map(|(label, _, values)| BoxGroup {
            label: label.clone(),
            values: values.clone(),
        })
        .collect();

    let top = BoxPlot {
        title: format!("Whisker Plot for Top {} Configurations by {}", n, metric_col),
        x_title: "Configuration ID".to_string(),
        y_title: metric_col.to_string(),
        groups: top_groups,
    };
    let bottom = BoxPlot {
        title: format!(
            "Whisker Plot for Bottom {} Configurations by {}",
            n, metric_col
        ),
        x_title: "Configuration ID".to_string(),
        y_title: metric_col.to_string(),
        groups: bottom_groups,
    };

    Ok((top, bottom))
}
