use std::collections::BTreeSet;

use expscope_core::{ResultsTable, TrialStatus, STATUS_COL};

use crate::chart::{BarChart, BarSeries, PieChart};
use crate::Result;

/// Overall success/failure distribution as a pie of status counts.
pub fn status_distribution(table: &ResultsTable) -> Result<PieChart> {
    let mut chart = PieChart {
        title: "Overall Success/Failure Distribution".to_string(),
        labels: Vec::new(),
        values: Vec::new(),
    };
    if table.is_empty() {
        return Ok(chart);
    }

    // Status counts, largest first; ties keep first-seen order.
    let mut counts: Vec<(String, u64)> = table
        .group_rows(STATUS_COL)?
        .into_iter()
        .map(|(label, rows)| (label, rows.len() as u64))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    for (label, count) in counts {
        chart.labels.push(label);
        chart.values.push(count);
    }

    Ok(chart)
}

/// Stacked per-configuration status counts.
pub fn status_by_config(table: &ResultsTable, group_col: &str) -> Result<BarChart> {
    let mut chart = BarChart {
        title: "Success/Failure Count by Configuration".to_string(),
        x_title: "Configuration ID".to_string(),
        y_title: "Count".to_string(),
        x_labels: Vec::new(),
        series: Vec::new(),
        stacked: true,
    };
    if table.is_empty() {
        return Ok(chart);
    }

    let statuses = table.label_column(STATUS_COL)?;
    let status_set: BTreeSet<String> = statuses.iter().cloned().collect();
    let groups = table.group_rows(group_col)?;

    chart.x_labels = groups.iter().map(|(label, _)| label.clone()).collect();
    for status in status_set {
        let values = groups
            .iter()
            .map(|(_, rows)| rows.iter().filter(|&&i| statuses[i] == status).count() as f64)
            .collect();
        chart.series.push(BarSeries {
            name: status,
            values,
        });
    }

    Ok(chart)
}

/// Per-configuration fraction of failed trials (FAILED or TIMED_OUT).
pub fn failure_rate_by_config(table: &ResultsTable, group_col: &str) -> Result<BarChart> {
    let mut chart = BarChart {
        title: "Failure Rate by Configuration".to_string(),
        x_title: "Configuration ID".to_string(),
        y_title: "Failure Rate".to_string(),
        x_labels: Vec::new(),
        series: Vec::new(),
        stacked: false,
    };
    if table.is_empty() {
        return Ok(chart);
    }

    let statuses = table.label_column(STATUS_COL)?;
    let groups = table.group_rows(group_col)?;

    chart.x_labels = groups.iter().map(|(label, _)| label.clone()).collect();
    let rates = groups
        .iter()
        .map(|(_, rows)| {
            let failed = rows
                .iter()
                .filter(|&&i| TrialStatus::parse(&statuses[i]).is_failed())
                .count();
            failed as f64 / rows.len() as f64
        })
        .collect();
    chart.series.push(BarSeries {
        name: "failure_rate".to_string(),
        values: rates,
    });

    Ok(chart)
}
