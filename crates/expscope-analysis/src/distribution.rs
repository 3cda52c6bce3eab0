use expscope_core::ResultsTable;

use crate::chart::{BoxGroup, LineChart, LineSeries, ViolinPlot};
use crate::{Error, Result};

const GRID_POINTS: usize = 500;

/// Compare the score distributions of two configurations as Gaussian
/// kernel density estimates over a shared grid. Unlike the charting
/// helpers this errors when a requested group is missing or has no
/// numeric data, since the caller named the groups explicitly.
pub fn score_distributions(
    table: &ResultsTable,
    target_col: &str,
    group_col: &str,
    group_a: &str,
    group_b: &str,
) -> Result<LineChart> {
    let samples_a = group_samples(table, target_col, group_col, group_a)?;
    let samples_b = group_samples(table, target_col, group_col, group_b)?;

    let min = samples_a
        .iter()
        .chain(samples_b.iter())
        .cloned()
        .fold(f64::INFINITY, f64::min);
    let max = samples_a
        .iter()
        .chain(samples_b.iter())
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    // Degenerate span still deserves a readable plot.
    let (min, max) = if min == max {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    };

    let xs: Vec<f64> = (0..GRID_POINTS)
        .map(|i| min + (max - min) * i as f64 / (GRID_POINTS - 1) as f64)
        .collect();

    let series = [(group_a, &samples_a), (group_b, &samples_b)]
        .into_iter()
        .map(|(label, samples)| LineSeries {
            name: format!("Config {}", label),
            x: xs.clone(),
            y: kde(samples, &xs),
        })
        .collect();

    Ok(LineChart {
        title: format!(
            "Score Distribution for Configurations {} and {}",
            group_a, group_b
        ),
        x_title: target_col.to_string(),
        y_title: "Density".to_string(),
        series,
    })
}

/// Violin plot of two configurations' raw samples, with inner box and
/// points requested. Same group rules as [`score_distributions`].
pub fn violin_plot(
    table: &ResultsTable,
    target_col: &str,
    group_col: &str,
    group_a: &str,
    group_b: &str,
) -> Result<ViolinPlot> {
    let samples_a = group_samples(table, target_col, group_col, group_a)?;
    let samples_b = group_samples(table, target_col, group_col, group_b)?;

    Ok(ViolinPlot {
        title: format!(
            "Violin Plot for Configurations {} and {} by {}",
            group_a, group_b, target_col
        ),
        x_title: "Configuration ID".to_string(),
        y_title: target_col.to_string(),
        groups: vec![
            BoxGroup {
                label: group_a.to_string(),
                values: samples_a,
            },
            BoxGroup {
                label: group_b.to_string(),
                values: samples_b,
            },
        ],
        show_box: true,
        show_points: true,
    })
}

fn group_samples(
    table: &ResultsTable,
    target_col: &str,
    group_col: &str,
    group: &str,
) -> Result<Vec<f64>> {
    let not_found = || Error::GroupNotFound {
        column: group_col.to_string(),
        group: group.to_string(),
    };
    if table.is_empty() {
        return Err(not_found());
    }

    let values = table.numeric_column(target_col)?;
    let groups = table.group_rows(group_col)?;
    let rows = groups
        .iter()
        .find(|(label, _)| label == group)
        .map(|(_, rows)| rows)
        .ok_or_else(not_found)?;

    let samples: Vec<f64> = rows
        .iter()
        .filter_map(|&i| values[i])
        .filter(|v| v.is_finite())
        .collect();
    if samples.is_empty() {
        return Err(not_found());
    }
    Ok(samples)
}

/// Gaussian KDE with Silverman's rule-of-thumb bandwidth.
fn kde(samples: &[f64], xs: &[f64]) -> Vec<f64> {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let std = (samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();

    let mut h = 1.06 * std * n.powf(-0.2);
    if h <= 0.0 || !h.is_finite() {
        h = 1e-3; // constant samples collapse to a spike
    }

    let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * n * h);
    xs.iter()
        .map(|&x| {
            samples
                .iter()
                .map(|&s| {
                    let z = (x - s) / h;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> ResultsTable {
        let mut t = ResultsTable::new(vec!["tunable_config_id".into(), "result.score".into()]);
        for (config, score) in [
            (1, 1.0),
            (1, 1.5),
            (1, 2.0),
            (2, 5.0),
            (2, 5.5),
            (2, 6.0),
        ] {
            t.push_row(vec![json!(config), json!(score)]).unwrap();
        }
        t
    }

    #[test]
    fn two_density_curves_over_shared_grid() {
        let chart = score_distributions(&table(), "result.score", "tunable_config_id", "1", "2")
            .unwrap();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].x.len(), GRID_POINTS);
        assert_eq!(chart.series[0].x, chart.series[1].x);

        // Each curve peaks near its own group's data.
        let peak_index = |s: &LineSeries| {
            s.y.iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap()
        };
        let peak_a = chart.series[0].x[peak_index(&chart.series[0])];
        let peak_b = chart.series[1].x[peak_index(&chart.series[1])];
        assert!(peak_a < 3.0);
        assert!(peak_b > 4.0);
    }

    #[test]
    fn missing_group_is_an_error() {
        let err = score_distributions(&table(), "result.score", "tunable_config_id", "1", "9")
            .unwrap_err();
        assert!(matches!(err, Error::GroupNotFound { group, .. } if group == "9"));
    }

    #[test]
    fn violin_carries_raw_samples_per_group() {
        let chart = violin_plot(&table(), "result.score", "tunable_config_id", "1", "2").unwrap();
        assert!(chart.show_box);
        assert!(chart.show_points);
        assert_eq!(chart.groups.len(), 2);
        assert_eq!(chart.groups[0].label, "1");
        assert_eq!(chart.groups[0].values, vec![1.0, 1.5, 2.0]);
        assert_eq!(chart.groups[1].values, vec![5.0, 5.5, 6.0]);
    }

    #[test]
    fn violin_missing_group_is_an_error() {
        let err =
            violin_plot(&table(), "result.score", "tunable_config_id", "9", "2").unwrap_err();
        assert!(matches!(err, Error::GroupNotFound { group, .. } if group == "9"));
    }

    #[test]
    fn kde_integrates_to_roughly_one() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let xs: Vec<f64> = (0..1000).map(|i| -5.0 + i as f64 * 0.016).collect();
        let ys = kde(&samples, &xs);
        let integral: f64 = ys.iter().sum::<f64>() * 0.016;
        assert!((integral - 1.0).abs() < 0.05);
    }
}
