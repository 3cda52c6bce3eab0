//! Pairwise significance tests between configurations.
//!
//! For every unordered pair of groups in a result column, computes a
//! test statistic and two-sided p-value, flagging pairs below the
//! significance threshold. Degenerate inputs (one group, no variance)
//! come back neutral rather than erroring, so report callers need no
//! special cases.

use expscope_core::ResultsTable;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Which two-sample test to run per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    /// Welch's two-sample t-test (unequal variances).
    Welch,
    /// Mann-Whitney U with tie-corrected normal approximation.
    MannWhitney,
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestKind::Welch => write!(f, "welch"),
            TestKind::MannWhitney => write!(f, "mann-whitney"),
        }
    }
}

impl std::str::FromStr for TestKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "welch" | "ttest" | "t-test" => Ok(TestKind::Welch),
            "mann-whitney" | "mannwhitney" | "u-test" => Ok(TestKind::MannWhitney),
            _ => Err(format!("Unknown test kind: {}", s)),
        }
    }
}

/// Outcome of one pairwise test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairComparison {
    pub group_a: String,
    pub group_b: String,
    pub n_a: usize,
    pub n_b: usize,
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Run `kind` over every unordered pair of groups of `result_col`,
/// grouped by `group_col`, in first-seen group order. Groups with no
/// usable numeric data are skipped; zero or one usable group yields
/// an empty result.
pub fn pairwise_tests(
    table: &ResultsTable,
    result_col: &str,
    group_col: &str,
    kind: TestKind,
    alpha: f64,
) -> Result<Vec<PairComparison>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let values = table.numeric_column(result_col)?;
    let groups: Vec<(String, Vec<f64>)> = table
        .group_rows(group_col)?
        .into_iter()
        .map(|(label, rows)| {
            let samples: Vec<f64> = rows
                .iter()
                .filter_map(|&i| values[i])
                .filter(|v| v.is_finite())
                .collect();
            (label, samples)
        })
        .filter(|(_, samples)| !samples.is_empty())
        .collect();

    let mut comparisons = Vec::new();
    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            let (label_a, samples_a) = &groups[i];
            let (label_b, samples_b) = &groups[j];

            let (statistic, p_value) = match kind {
                TestKind::Welch => welch_test(samples_a, samples_b),
                TestKind::MannWhitney => mann_whitney_test(samples_a, samples_b),
            };

            comparisons.push(PairComparison {
                group_a: label_a.clone(),
                group_b: label_b.clone(),
                n_a: samples_a.len(),
                n_b: samples_b.len(),
                statistic,
                p_value,
                significant: p_value < alpha,
            });
        }
    }

    Ok(comparisons)
}

/// Welch's t statistic and two-sided p-value. A pair with no variance
/// (or too few samples to estimate degrees of freedom) is neutral:
/// statistic 0, p-value 1.
fn welch_test(a: &[f64], b: &[f64]) -> (f64, f64) {
    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let mean_a = mean(a);
    let mean_b = mean(b);
    let var_a = sample_variance(a);
    let var_b = sample_variance(b);

    let se2 = var_a / n_a + var_b / n_b;
    if se2 <= 0.0 {
        return (0.0, 1.0);
    }

    let t = (mean_a - mean_b) / se2.sqrt();

    let term_a = if n_a > 1.0 {
        (var_a / n_a).powi(2) / (n_a - 1.0)
    } else {
        0.0
    };
    let term_b = if n_b > 1.0 {
        (var_b / n_b).powi(2) / (n_b - 1.0)
    } else {
        0.0
    };
    if term_a + term_b == 0.0 || !t.is_finite() {
        return (0.0, 1.0);
    }

    let df = se2 * se2 / (term_a + term_b);
    let p = student_t_two_sided_p(t, df);
    (t, p)
}

/// Mann-Whitney U statistic (for the first group) and two-sided
/// p-value from the tie-corrected normal approximation with
/// continuity correction. A pair with no variance (every value tied)
/// is neutral: statistic 0, p-value 1.
fn mann_whitney_test(a: &[f64], b: &[f64]) -> (f64, f64) {
    let n_a = a.len();
    let n_b = b.len();
    let n = n_a + n_b;

    let mut combined: Vec<(f64, bool)> = a
        .iter()
        .map(|&v| (v, true))
        .chain(b.iter().map(|&v| (v, false)))
        .collect();
    combined.sort_by(|x, y| x.0.total_cmp(&y.0));

    // Average ranks across ties, accumulating the tie correction.
    let mut rank_sum_a = 0.0;
    let mut tie_sum = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && combined[j + 1].0 == combined[i].0 {
            j += 1;
        }
        let count = (j - i + 1) as f64;
        let avg_rank = (i + j + 2) as f64 / 2.0; // ranks are 1-based
        for item in &combined[i..=j] {
            if item.1 {
                rank_sum_a += avg_rank;
            }
        }
        if count > 1.0 {
            tie_sum += count * count * count - count;
        }
        i = j + 1;
    }

    let u = rank_sum_a - (n_a * (n_a + 1)) as f64 / 2.0;
    let mu = (n_a * n_b) as f64 / 2.0;

    let n_f = n as f64;
    let tie_term = if n > 1 {
        tie_sum / (n_f * (n_f - 1.0))
    } else {
        0.0
    };
    let sigma2 = (n_a * n_b) as f64 / 12.0 * ((n_f + 1.0) - tie_term);
    if sigma2 <= 0.0 {
        return (0.0, 1.0);
    }

    let diff = u - mu;
    let z = if diff == 0.0 {
        0.0
    } else {
        (diff - 0.5 * diff.signum()) / sigma2.sqrt()
    };
    let p = (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0);
    (u, p)
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Unbiased sample variance; 0.0 below two samples.
fn sample_variance(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    samples.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (samples.len() - 1) as f64
}

/// Two-sided p-value of the Student t distribution:
/// `I_x(df/2, 1/2)` with `x = df / (df + t^2)`.
fn student_t_two_sided_p(t: f64, df: f64) -> f64 {
    if !df.is_finite() || df <= 0.0 {
        return 1.0;
    }
    let x = df / (df + t * t);
    incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

/// Regularized incomplete beta function I_x(a, b), continued-fraction
/// evaluation (Numerical Recipes 6.4).
fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b)
        + a * x.ln()
        + b * (1.0 - x).ln();
    let front = ln_front.exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_cf(a, b, x) / a
    } else {
        1.0 - front * beta_cf(b, a, 1.0 - x) / b
    }
}

fn beta_cf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 3e-12;
    const FPMIN: f64 = 1e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FPMIN {
        d = FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }

    h
}

/// Lanczos approximation (g = 7, n = 9).
fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// Standard normal CDF
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Error function approximation
fn erf(x: f64) -> f64 {
    // Abramowitz and Stegun approximation (7.1.26)
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(rows: &[(i64, f64)]) -> ResultsTable {
        let mut t = ResultsTable::new(vec![
            "tunable_config_id".into(),
            "result.latency_ms".into(),
        ]);
        for (config, value) in rows {
            t.push_row(vec![json!(config), json!(value)]).unwrap();
        }
        t
    }

    #[test]
    fn student_t_p_matches_reference() {
        // scipy.stats.t.sf(2.0, 10) * 2 = 0.07338803...
        let p = student_t_two_sided_p(2.0, 10.0);
        assert!((p - 0.073_388_03).abs() < 1e-6);
    }

    #[test]
    fn welch_p_matches_reference() {
        // scipy.stats.ttest_ind([10,11,12,13], [20,21,22,23], equal_var=False)
        // -> t = -10.9544, df = 6, p = 3.4364e-5
        let (t, p) = welch_test(&[10.0, 11.0, 12.0, 13.0], &[20.0, 21.0, 22.0, 23.0]);
        assert!((t + 10.954_451_15).abs() < 1e-6);
        assert!((p - 3.436_4e-5).abs() < 1e-7);
    }

    #[test]
    fn mann_whitney_p_matches_reference() {
        // U = 0 for fully separated groups of 3; normal approximation
        // with continuity correction gives p = 0.080856.
        let (u, p) = mann_whitney_test(&[1.0, 2.0, 3.0], &[10.0, 11.0, 12.0]);
        assert_eq!(u, 0.0);
        assert!((p - 0.080_855_6).abs() < 1e-4);
    }

    #[test]
    fn separated_groups_are_significant() {
        let t = table(&[
            (1, 10.0),
            (1, 11.0),
            (1, 12.0),
            (1, 13.0),
            (2, 20.0),
            (2, 21.0),
            (2, 22.0),
            (2, 23.0),
        ]);
        let pairs = pairwise_tests(
            &t,
            "result.latency_ms",
            "tunable_config_id",
            TestKind::Welch,
            0.05,
        )
        .unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].significant);
        assert!(pairs[0].p_value < 0.001);
        assert_eq!(pairs[0].n_a, 4);
        assert_eq!(pairs[0].n_b, 4);
    }

    #[test]
    fn single_group_yields_no_pairs() {
        let t = table(&[(1, 10.0), (1, 11.0), (1, 12.0)]);
        let pairs = pairwise_tests(
            &t,
            "result.latency_ms",
            "tunable_config_id",
            TestKind::Welch,
            0.05,
        )
        .unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn empty_table_yields_no_pairs() {
        let t = ResultsTable::new(vec![]);
        let pairs = pairwise_tests(
            &t,
            "result.latency_ms",
            "tunable_config_id",
            TestKind::MannWhitney,
            0.05,
        )
        .unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn zero_variance_column_is_neutral() {
        let t = table(&[(1, 5.0), (1, 5.0), (2, 5.0), (2, 5.0)]);
        for kind in [TestKind::Welch, TestKind::MannWhitney] {
            let pairs =
                pairwise_tests(&t, "result.latency_ms", "tunable_config_id", kind, 0.05).unwrap();
            assert_eq!(pairs.len(), 1);
            assert_eq!(pairs[0].statistic, 0.0);
            assert_eq!(pairs[0].p_value, 1.0);
            assert!(!pairs[0].significant);
        }
    }

    #[test]
    fn three_groups_give_three_pairs_in_order() {
        let t = table(&[(1, 1.0), (1, 2.0), (2, 3.0), (2, 4.0), (3, 5.0), (3, 6.0)]);
        let pairs = pairwise_tests(
            &t,
            "result.latency_ms",
            "tunable_config_id",
            TestKind::MannWhitney,
            0.05,
        )
        .unwrap();
        let labels: Vec<(String, String)> = pairs
            .iter()
            .map(|p| (p.group_a.clone(), p.group_b.clone()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("1".to_string(), "2".to_string()),
                ("1".to_string(), "3".to_string()),
                ("2".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("ttest".parse::<TestKind>().unwrap(), TestKind::Welch);
        assert_eq!(
            "mann-whitney".parse::<TestKind>().unwrap(),
            TestKind::MannWhitney
        );
        assert!("anova".parse::<TestKind>().is_err());
    }
}
