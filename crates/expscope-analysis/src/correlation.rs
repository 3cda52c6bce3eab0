use expscope_core::{ResultsTable, CONFIG_PREFIX, RESULT_PREFIX};
use serde::{Deserialize, Serialize};

use crate::chart::Heatmap;
use crate::Result;

/// Correlation of one parameter column with a target metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub column: String,
    pub correlation: f64,
}

/// Pearson correlation over paired samples. `None` when fewer than
/// two pairs remain or either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    let r = cov / denom;
    r.is_finite().then_some(r)
}

/// Pairwise correlation of every numeric `config.*` column (rows)
/// against every numeric `result.*` column (columns).
pub fn correlation_heatmap(table: &ResultsTable) -> Result<Heatmap> {
    let config_cols = table.numeric_columns_with_prefix(CONFIG_PREFIX);
    let result_cols = table.numeric_columns_with_prefix(RESULT_PREFIX);

    let mut values = Vec::with_capacity(config_cols.len());
    for config_col in &config_cols {
        let config_values = table.numeric_column(config_col)?;
        let mut row = Vec::with_capacity(result_cols.len());
        for result_col in &result_cols {
            let result_values = table.numeric_column(result_col)?;
            let (xs, ys) = paired(&config_values, &result_values);
            row.push(pearson(&xs, &ys));
        }
        values.push(row);
    }

    Ok(Heatmap {
        title: "Heatmap of Configuration Parameters vs Performance Metrics".to_string(),
        x_title: "Performance Metrics".to_string(),
        y_title: "Configuration Parameters".to_string(),
        x_labels: result_cols,
        y_labels: config_cols,
        values,
    })
}

/// Correlation of every numeric `config.*` column with `target_col`,
/// sorted descending. Degenerate pairs are skipped.
pub fn target_correlations(table: &ResultsTable, target_col: &str) -> Result<Vec<CorrelationEntry>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let target = table.numeric_column(target_col)?;

    let mut entries = Vec::new();
    for config_col in table.numeric_columns_with_prefix(CONFIG_PREFIX) {
        let config_values = table.numeric_column(&config_col)?;
        let (xs, ys) = paired(&config_values, &target);
        if let Some(r) = pearson(&xs, &ys) {
            entries.push(CorrelationEntry {
                column: config_col,
                correlation: r,
            });
        }
    }
    entries.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
    Ok(entries)
}

/// Single-row heatmap form of [`target_correlations`].
pub fn target_correlation_heatmap(table: &ResultsTable, target_col: &str) -> Result<Heatmap> {
    let entries = target_correlations(table, target_col)?;
    Ok(Heatmap {
        title: format!("Correlation Heatmap with {}", target_col),
        x_title: "Config Columns".to_string(),
        y_title: "Correlation".to_string(),
        x_labels: entries.iter().map(|e| e.column.clone()).collect(),
        y_labels: vec![target_col.to_string()],
        values: vec![entries.iter().map(|e| Some(e.correlation)).collect()],
    })
}

/// Keep only rows where both sides are present.
fn paired(a: &[Option<f64>], b: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (x, y) in a.iter().zip(b.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            if x.is_finite() && y.is_finite() {
                xs.push(*x);
                ys.push(*y);
            }
        }
    }
    (xs, ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pearson_matches_reference() {
        // Reference value computed by hand for these five pairs:
        // x = [1,2,3,4,5], y = [2,1,4,3,7] -> r = 0.824163383692134
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 3.0, 7.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 0.824_163_383_692_134).abs() < 1e-12);
    }

    #[test]
    fn pearson_degenerate_inputs() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn single_param_single_target() {
        let mut t = ResultsTable::new(vec!["config.cache_mb".into(), "result.latency_ms".into()]);
        for (x, y) in [(1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 3.0), (5.0, 7.0)] {
            t.push_row(vec![json!(x), json!(y)]).unwrap();
        }
        let entries = target_correlations(&t, "result.latency_ms").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].column, "config.cache_mb");
        assert!((entries[0].correlation - 0.824_163_383_692_134).abs() < 1e-12);
    }

    #[test]
    fn heatmap_shape_follows_prefixed_columns() {
        let mut t = ResultsTable::new(vec![
            "config.a".into(),
            "config.b".into(),
            "result.m".into(),
            "status".into(),
        ]);
        for i in 0..4 {
            t.push_row(vec![
                json!(i),
                json!(10 - i),
                json!(i * 2),
                json!("SUCCEEDED"),
            ])
            .unwrap();
        }
        let hm = correlation_heatmap(&t).unwrap();
        assert_eq!(hm.y_labels, vec!["config.a", "config.b"]);
        assert_eq!(hm.x_labels, vec!["result.m"]);
        assert_eq!(hm.values.len(), 2);
        assert!((hm.values[0][0].unwrap() - 1.0).abs() < 1e-12);
        assert!((hm.values[1][0].unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn rows_with_missing_cells_are_paired_out() {
        let mut t = ResultsTable::new(vec!["config.a".into(), "result.m".into()]);
        t.push_row(vec![json!(1.0), json!(1.0)]).unwrap();
        t.push_row(vec![json!(2.0), serde_json::Value::Null]).unwrap();
        t.push_row(vec![json!(3.0), json!(3.0)]).unwrap();
        t.push_row(vec![json!(4.0), json!(4.0)]).unwrap();
        let entries = target_correlations(&t, "result.m").unwrap();
        assert_eq!(entries.len(), 1);
        assert!((entries[0].correlation - 1.0).abs() < 1e-12);
    }
}
