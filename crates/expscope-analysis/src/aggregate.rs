use expscope_core::ResultsTable;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chart::{BoxGroup, BoxPlot};
use crate::Result;

/// Value counts for one non-numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalCount {
    pub column: String,
    pub counts: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Quartiles of one metric within one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileRow {
    pub group: String,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Per-configuration 25th/50th/75th percentiles of `metric_col`, in
/// first-seen group order. Groups whose metric never coerces to a
/// number are dropped.
pub fn metric_percentiles(
    table: &ResultsTable,
    group_col: &str,
    metric_col: &str,
) -> Result<Vec<PercentileRow>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let metric = table.numeric_column(metric_col)?;
    let mut out = Vec::new();
    for (label, rows) in table.group_rows(group_col)? {
        let mut samples: Vec<f64> = rows
            .iter()
            .filter_map(|&i| metric[i])
            .filter(|v| v.is_finite())
            .collect();
        if samples.is_empty() {
            continue;
        }
        samples.sort_by(f64::total_cmp);
        out.push(PercentileRow {
            group: label,
            p25: quantile(&samples, 0.25),
            p50: quantile(&samples, 0.5),
            p75: quantile(&samples, 0.75),
        });
    }

    Ok(out)
}

/// Box plot of `metric_col` over every configuration, the chart form
/// of [`metric_percentiles`].
pub fn percentile_plot(
    table: &ResultsTable,
    group_col: &str,
    metric_col: &str,
) -> Result<BoxPlot> {
    let mut chart = BoxPlot {
        title: format!("{} Percentiles by Configuration", metric_col),
        x_title: "Configuration ID".to_string(),
        y_title: metric_col.to_string(),
        groups: Vec::new(),
    };
    if table.is_empty() {
        return Ok(chart);
    }

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
        chart.groups.push(BoxGroup { label, values });
    }

    Ok(chart)
}

/// Linearly-interpolated quantile of an already-sorted, non-empty
/// sample.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Per-configuration mean of every numeric column, as a derived table
/// with one row per configuration.
pub fn config_mean_table(table: &ResultsTable, group_col: &str) -> Result<ResultsTable> {
    let numeric_cols: Vec<String> = table
        .numeric_columns()
        .into_iter()
        .filter(|c| c != group_col)
        .collect();

    let mut columns = vec![group_col.to_string()];
    columns.extend(numeric_cols.iter().cloned());
    let mut out = ResultsTable::new(columns);

    if table.is_empty() {
        return Ok(out);
    }

    let col_values: Vec<Vec<Option<f64>>> = numeric_cols
        .iter()
        .map(|c| table.numeric_column(c))
        .collect::<expscope_core::Result<Vec<_>>>()?;

    for (label, rows) in table.group_rows(group_col)? {
        let mut cells = vec![Value::from(label)];
        for values in &col_values {
            let samples: Vec<f64> = rows.iter().filter_map(|&i| values[i]).collect();
            if samples.is_empty() {
                cells.push(Value::Null);
            } else {
                let mean = samples.iter().sum::<f64>() / samples.len() as f64;
                cells.push(
                    serde_json::Number::from_f64(mean)
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                );
            }
        }
        out.push_row(cells)?;
    }

    Ok(out)
}

/// Value counts of every non-numeric column, each sorted by
/// descending count.
pub fn categorical_counts(table: &ResultsTable) -> Result<Vec<CategoricalCount>> {
    let numeric: Vec<String> = table.numeric_columns();
    let mut out = Vec::new();

    for column in table.columns().to_vec() {
        if numeric.contains(&column) {
            continue;
        }
        let mut counts: Vec<ValueCount> = table
            .group_rows(&column)?
            .into_iter()
            .map(|(value, rows)| ValueCount {
                value,
                count: rows.len(),
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        out.push(CategoricalCount { column, counts });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> ResultsTable {
        let mut t = ResultsTable::new(vec![
            "tunable_config_id".into(),
            "status".into(),
            "result.latency_ms".into(),
        ]);
        for (config, status, latency) in [
            (1, "SUCCEEDED", json!(10.0)),
            (1, "SUCCEEDED", json!(12.0)),
            (2, "FAILED", Value::Null),
            (2, "SUCCEEDED", json!(8.0)),
        ] {
            t.push_row(vec![json!(config), json!(status), latency]).unwrap();
        }
        t
    }

    #[test]
    fn means_per_config() {
        let means = config_mean_table(&table(), "tunable_config_id").unwrap();
        assert_eq!(means.row_count(), 2);
        assert_eq!(means.value(0, "result.latency_ms"), Some(&json!(11.0)));
        // Config 2 has one null latency; the mean uses the remaining row.
        assert_eq!(means.value(1, "result.latency_ms"), Some(&json!(8.0)));
    }

    #[test]
    fn categorical_counts_cover_non_numeric_columns() {
        let counts = categorical_counts(&table()).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].column, "status");
        assert_eq!(counts[0].counts[0].value, "SUCCEEDED");
        assert_eq!(counts[0].counts[0].count, 3);
        assert_eq!(counts[0].counts[1].count, 1);
    }

    #[test]
    fn percentiles_interpolate_linearly() {
        let mut t = ResultsTable::new(vec![
            "tunable_config_id".into(),
            "result.latency_ms".into(),
        ]);
        for v in [1.0, 2.0, 3.0, 4.0] {
            t.push_row(vec![json!(1), json!(v)]).unwrap();
        }
        let rows = metric_percentiles(&t, "tunable_config_id", "result.latency_ms").unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].p25 - 1.75).abs() < 1e-12);
        assert!((rows[0].p50 - 2.5).abs() < 1e-12);
        assert!((rows[0].p75 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn percentiles_skip_groups_without_numeric_data() {
        let rows = metric_percentiles(&table(), "tunable_config_id", "result.latency_ms").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group, "1");
        assert!((rows[0].p50 - 11.0).abs() < 1e-12);
        // Config 2's only numeric latency is 8.0; its null row is dropped.
        assert_eq!(rows[1].p25, 8.0);
        assert_eq!(rows[1].p75, 8.0);
    }

    #[test]
    fn percentile_plot_boxes_every_config() {
        let chart = percentile_plot(&table(), "tunable_config_id", "result.latency_ms").unwrap();
        assert_eq!(chart.title, "result.latency_ms Percentiles by Configuration");
        assert_eq!(chart.groups.len(), 2);
        assert_eq!(chart.groups[0].values, vec![10.0, 12.0]);
        assert_eq!(chart.groups[1].values, vec![8.0]);
    }

    #[test]
    fn empty_table_gives_empty_aggregates() {
        let t = ResultsTable::new(vec!["tunable_config_id".into(), "status".into()]);
        assert!(config_mean_table(&t, "tunable_config_id")
            .unwrap()
            .is_empty());
        assert!(
            metric_percentiles(&t, "tunable_config_id", "result.latency_ms")
                .unwrap()
                .is_empty()
        );
        // With no rows every column is non-numeric and has no values.
        let counts = categorical_counts(&t).unwrap();
        assert!(counts.iter().all(|c| c.counts.is_empty()));
    }
}
