use abtest_core::{CoreError, LeveneCenter, Result, MIN_SAMPLE_SIZE};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};
use statrs::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalResult {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: Option<f64>,
}

impl StatisticalResult {
    fn new(statistic: f64, p_value: f64, degrees_of_freedom: Option<f64>) -> Self {
        Self {
            statistic,
            p_value,
            degrees_of_freedom,
        }
    }
}

// Royston (1992, 1995) polynomial coefficients for the Shapiro-Wilk test.
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

/// Largest per-group size for which Mann-Whitney uses the exact null distribution.
const MWU_EXACT_MAX: usize = 8;

pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Shapiro-Wilk test for normality.
    ///
    /// Coefficients and p-value follow Royston's approximation (AS R94);
    /// n = 3 uses the exact distribution of W.
    pub fn shapiro_wilk(values: &[f64]) -> Result<StatisticalResult> {
        let n = values.len();
        require_len(values, MIN_SAMPLE_SIZE)?;

        let mut x = values.to_vec();
        x.sort_by(f64::total_cmp);

        if x[n - 1] - x[0] <= 0.0 {
            return Err(CoreError::DegenerateSample(
                "all observations are identical; normality is undefined".to_string(),
            ));
        }

        let mean = x.iter().sum::<f64>() / n as f64;
        let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();

        if n == 3 {
            let numerator = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
            let w = (numerator * numerator / ss).clamp(0.75, 1.0);
            let p = 1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos();
            return Ok(StatisticalResult::new(w, p.clamp(0.0, 1.0), None));
        }

        let a = Self::shapiro_coefficients(n)?;
        let sa: f64 = a
            .iter()
            .enumerate()
            .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
            .sum();
        let w = (sa * sa / ss).min(1.0);

        let p = Self::shapiro_p_value(w, n)?;
        Ok(StatisticalResult::new(w, p.clamp(0.0, 1.0), None))
    }

    fn shapiro_coefficients(n: usize) -> Result<Vec<f64>> {
        let normal = standard_normal()?;
        let nn2 = n / 2;
        let an = n as f64;

        // Blom scores for the lower half; negative values.
        let m: Vec<f64> = (0..nn2)
            .map(|i| normal.inverse_cdf((i as f64 + 1.0 - 0.375) / (an + 0.25)))
            .collect();

        let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / an.sqrt();
        let a1 = poly(&SW_C1, rsn) - m[0] / ssumm2;

        let mut a = vec![0.0; nn2];
        let corrected = if n > 5 { 2 } else { 1 };
        let (fac_sq, denom) = if n > 5 {
            let a2 = -m[1] / ssumm2 + poly(&SW_C2, rsn);
            a[1] = a2;
            (
                summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
                1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2,
            )
        } else {
            (summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a1 * a1)
        };

        if fac_sq <= 0.0 || denom <= 0.0 {
            return Err(CoreError::DegenerateSample(format!(
                "Shapiro-Wilk coefficients undefined for n = {}",
                n
            )));
        }

        let fac = (fac_sq / denom).sqrt();
        a[0] = a1;
        for i in corrected..nn2 {
            a[i] = -m[i] / fac;
        }

        Ok(a)
    }

    fn shapiro_p_value(w: f64, n: usize) -> Result<f64> {
        let w1 = 1.0 - w;
        if w1 <= 0.0 {
            return Ok(1.0);
        }

        let an = n as f64;
        let y = w1.ln();

        let (y, m, s) = if n <= 11 {
            let gamma = poly(&SW_G, an);
            if y >= gamma {
                return Ok(0.0);
            }
            (-(gamma - y).ln(), poly(&SW_C3, an), poly(&SW_C4, an).exp())
        } else {
            let xx = an.ln();
            (y, poly(&SW_C5, xx), poly(&SW_C6, xx).exp())
        };

        Ok(standard_normal()?.sf((y - m) / s))
    }

    /// Levene's test for equal variances of two samples.
    ///
    /// Runs a one-way ANOVA on absolute deviations from each group's centre.
    pub fn levene(sample1: &[f64], sample2: &[f64], center: LeveneCenter) -> Result<StatisticalResult> {
        require_len(sample1, 2)?;
        require_len(sample2, 2)?;

        let deviations = |values: &[f64]| -> Vec<f64> {
            let c = match center {
                LeveneCenter::Median => median(values),
                LeveneCenter::Mean => values.mean(),
            };
            values.iter().map(|v| (v - c).abs()).collect()
        };

        let z1 = deviations(sample1);
        let z2 = deviations(sample2);
        let n1 = z1.len() as f64;
        let n2 = z2.len() as f64;
        let total = n1 + n2;

        let mean1 = z1.iter().sum::<f64>() / n1;
        let mean2 = z2.iter().sum::<f64>() / n2;
        let grand = (z1.iter().sum::<f64>() + z2.iter().sum::<f64>()) / total;

        let between = n1 * (mean1 - grand).powi(2) + n2 * (mean2 - grand).powi(2);
        let within: f64 = z1.iter().map(|z| (z - mean1).powi(2)).sum::<f64>()
            + z2.iter().map(|z| (z - mean2).powi(2)).sum::<f64>();

        let df_between = 1.0;
        let df_within = total - 2.0;

        if within <= 0.0 {
            // Spreads are constant within each group.
            return Ok(if between <= 0.0 {
                StatisticalResult::new(0.0, 1.0, Some(df_within))
            } else {
                StatisticalResult::new(f64::INFINITY, 0.0, Some(df_within))
            });
        }

        let f_stat = (between / df_between) / (within / df_within);
        let f_dist = FisherSnedecor::new(df_between, df_within)
            .map_err(|e| CoreError::DegenerateSample(format!("F distribution: {}", e)))?;
        let p_value = f_dist.sf(f_stat);

        Ok(StatisticalResult::new(f_stat, p_value, Some(df_within)))
    }

    /// Student's two-sample t-test with pooled variance.
    pub fn t_test(sample1: &[f64], sample2: &[f64]) -> Result<StatisticalResult> {
        require_len(sample1, 2)?;
        require_len(sample2, 2)?;

        let mean1 = sample1.mean();
        let mean2 = sample2.mean();
        let var1 = sample1.variance();
        let var2 = sample2.variance();
        let n1 = sample1.len() as f64;
        let n2 = sample2.len() as f64;

        let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
        if pooled_var <= 0.0 {
            return Err(CoreError::DegenerateSample(
                "pooled variance is zero; t statistic is undefined".to_string(),
            ));
        }

        let t_stat = (mean1 - mean2) / (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
        let df = n1 + n2 - 2.0;

        Ok(StatisticalResult::new(t_stat, two_sided_t(t_stat, df)?, Some(df)))
    }

    /// Welch's t-test; degrees of freedom from the Welch-Satterthwaite equation.
    pub fn welch_t_test(sample1: &[f64], sample2: &[f64]) -> Result<StatisticalResult> {
        require_len(sample1, 2)?;
        require_len(sample2, 2)?;

        let n1 = sample1.len() as f64;
        let n2 = sample2.len() as f64;
        let se1 = sample1.variance() / n1;
        let se2 = sample2.variance() / n2;
        let se_sq = se1 + se2;

        if se_sq <= 0.0 {
            return Err(CoreError::DegenerateSample(
                "both samples have zero variance; Welch statistic is undefined".to_string(),
            ));
        }

        let t_stat = (sample1.mean() - sample2.mean()) / se_sq.sqrt();
        let df = se_sq.powi(2) / (se1.powi(2) / (n1 - 1.0) + se2.powi(2) / (n2 - 1.0));

        Ok(StatisticalResult::new(t_stat, two_sided_t(t_stat, df)?, Some(df)))
    }

    /// Mann-Whitney U test (non-parametric alternative to t-test).
    ///
    /// The statistic is U for `sample1`. Small untied samples use the exact
    /// null distribution; otherwise a tie-corrected normal approximation with
    /// continuity correction.
    pub fn mann_whitney_u(sample1: &[f64], sample2: &[f64]) -> Result<StatisticalResult> {
        require_len(sample1, 1)?;
        require_len(sample2, 1)?;

        let n1 = sample1.len();
        let n2 = sample2.len();

        // Combine and rank all values
        let mut combined: Vec<(f64, usize)> = sample1
            .iter()
            .map(|&x| (x, 1))
            .chain(sample2.iter().map(|&x| (x, 2)))
            .collect();

        combined.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Assign ranks (handling ties)
        let mut rank_sum1 = 0.0;
        let mut tie_term = 0.0;
        let mut i = 0;
        while i < combined.len() {
            let mut j = i;
            while j < combined.len() && combined[j].0 == combined[i].0 {
                j += 1;
            }
            let rank = (i + j + 1) as f64 / 2.0;
            rank_sum1 += rank * combined[i..j].iter().filter(|(_, g)| *g == 1).count() as f64;
            let t = (j - i) as f64;
            tie_term += t * t * t - t;
            i = j;
        }

        let u1 = rank_sum1 - (n1 * (n1 + 1)) as f64 / 2.0;
        let u2 = (n1 * n2) as f64 - u1;
        let u_max = u1.max(u2);

        let p_value = if n1 <= MWU_EXACT_MAX && n2 <= MWU_EXACT_MAX && tie_term == 0.0 {
            let dist = exact_u_distribution(n1, n2);
            let start = u_max.round() as usize;
            2.0 * dist[start.min(dist.len())..].iter().sum::<f64>()
        } else {
            let n = (n1 + n2) as f64;
            let mean_u = (n1 * n2) as f64 / 2.0;
            let var_u = (n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
            if var_u <= 0.0 {
                return Err(CoreError::DegenerateSample(
                    "all observations are tied; rank test is undefined".to_string(),
                ));
            }
            let z = (u_max - mean_u - 0.5) / var_u.sqrt();
            2.0 * standard_normal()?.sf(z)
        };

        Ok(StatisticalResult::new(u1, p_value.min(1.0), None))
    }

    /// Calculate effect size (Cohen's d)
    pub fn cohens_d(sample1: &[f64], sample2: &[f64]) -> f64 {
        if sample1.len() < 2 || sample2.len() < 2 {
            return 0.0;
        }

        let mean1 = sample1.mean();
        let mean2 = sample2.mean();
        let var1 = sample1.variance();
        let var2 = sample2.variance();
        let n1 = sample1.len() as f64;
        let n2 = sample2.len() as f64;

        let pooled_std = (((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0)).sqrt();

        if pooled_std == 0.0 {
            return 0.0;
        }

        (mean1 - mean2) / pooled_std
    }

    /// Calculate confidence interval for mean at given confidence level
    pub fn confidence_interval(values: &[f64], confidence: f64) -> Option<(f64, f64)> {
        if values.len() < 2 || !(confidence > 0.0 && confidence < 1.0) {
            return None;
        }

        let mean = values.mean();
        let std_dev = values.std_dev();
        let n = values.len() as f64;

        let t_dist = StudentsT::new(0.0, 1.0, n - 1.0).ok()?;
        let t_value = t_dist.inverse_cdf((1.0 + confidence) / 2.0);

        let margin = t_value * (std_dev / n.sqrt());
        Some((mean - margin, mean + margin))
    }
}

fn require_len(values: &[f64], required: usize) -> Result<()> {
    if values.len() < required {
        return Err(CoreError::InsufficientData {
            label: "sample".to_string(),
            actual: values.len(),
            required,
        });
    }
    Ok(())
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| CoreError::DegenerateSample(format!("normal distribution: {}", e)))
}

fn two_sided_t(t_stat: f64, df: f64) -> Result<f64> {
    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| CoreError::DegenerateSample(format!("t distribution with {} df: {}", df, e)))?;
    Ok((2.0 * t_dist.sf(t_stat.abs())).min(1.0))
}

/// Evaluate `c[0] + c[1]*x + c[2]*x^2 + ...` (Horner's method).
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Null distribution of U for sample sizes `m` and `n`, as probabilities indexed by U.
fn exact_u_distribution(m: usize, n: usize) -> Vec<f64> {
    // counts[i][j][u]: arrangements of i and j observations giving U = u
    let mut counts: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); n + 1]; m + 1];
    for i in 0..=m {
        for j in 0..=n {
            let mut dist = vec![0.0; i * j + 1];
            if i == 0 || j == 0 {
                dist[0] = 1.0;
            } else {
                // Largest observation from sample 1 beats all j of sample 2.
                for (u, c) in counts[i - 1][j].iter().enumerate() {
                    dist[u + j] += c;
                }
                for (u, c) in counts[i][j - 1].iter().enumerate() {
                    dist[u] += c;
                }
            }
            counts[i][j] = dist;
        }
    }

    let total: f64 = counts[m][n].iter().sum();
    counts[m][n].iter().map(|c| c / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_poly_horner() {
        assert_relative_eq!(poly(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_relative_eq!(poly(&SW_G, 10.0), 2.317, epsilon = 1e-12);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_exact_u_distribution_small() {
        // m = n = 2: U in {0,1,2,3,4} with counts 1,1,2,1,1 over C(4,2) = 6
        let dist = exact_u_distribution(2, 2);
        let expected = [1.0, 1.0, 2.0, 1.0, 1.0].map(|c| c / 6.0);
        for (got, want) in dist.iter().zip(expected.iter()) {
            assert_relative_eq!(got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_exact_u_distribution_symmetric() {
        let dist = exact_u_distribution(5, 7);
        assert_eq!(dist.len(), 36);
        assert_relative_eq!(dist.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for u in 0..dist.len() {
            assert_relative_eq!(dist[u], dist[dist.len() - 1 - u], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_shapiro_coefficients_match_table() {
        // Published Shapiro-Wilk coefficient a_n for n = 20 is 0.4734.
        let a = StatisticalAnalyzer::shapiro_coefficients(20).unwrap();
        assert_relative_eq!(a[0], 0.4734, epsilon = 1e-3);
        let norm: f64 = 2.0 * a.iter().map(|v| v * v).sum::<f64>();
        assert_relative_eq!(norm, 1.0, epsilon = 1e-6);
    }
}
