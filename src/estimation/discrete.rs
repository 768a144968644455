//! Histogram entropy estimators (natural log).
//!
//! All estimators work on symbol counts only; symbol identities and
//! sample order do not matter.

use super::oracle::OracleError;
use statrs::function::gamma::{digamma, ln_gamma};
use std::collections::BTreeMap;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Symbol counts of a discrete sample.
#[derive(Debug, Clone)]
pub(crate) struct Histogram {
    counts: Vec<usize>,
    n: usize,
}

impl Histogram {
    /// Counts symbols. Ordered map keeps summation order deterministic.
    pub(crate) fn from_samples<T: Ord + Copy>(samples: &[T]) -> Self {
        let mut map: BTreeMap<T, usize> = BTreeMap::new();
        for &s in samples {
            *map.entry(s).or_insert(0) += 1;
        }
        Self {
            counts: map.into_values().collect(),
            n: samples.len(),
        }
    }

    /// Number of distinct observed symbols.
    pub(crate) fn k(&self) -> usize {
        self.counts.len()
    }

    fn with_count(&self, c: usize) -> usize {
        self.counts.iter().filter(|&&cnt| cnt == c).count()
    }
}

/// Maximum-likelihood plug-in, `-Σ p ln p`.
pub(crate) fn plugin(h: &Histogram) -> f64 {
    let n = h.n as f64;
    let sum: f64 = h
        .counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p.ln()
        })
        .sum();
    0.0 - sum
}

/// Plug-in plus the `(K-1)/(2N)` bias correction.
pub(crate) fn miller_madow(h: &Histogram) -> f64 {
    plugin(h) + h.k().saturating_sub(1) as f64 / (2.0 * h.n as f64)
}

/// Grassberger (1988): mean of `ln N - ψ(n_i) - (-1)^{n_i}/(n_i+1)`
/// over samples.
pub(crate) fn grassberger(h: &Histogram) -> f64 {
    let n = h.n as f64;
    let ln_n = n.ln();
    h.counts
        .iter()
        .map(|&c| {
            let cf = c as f64;
            let sign = if c % 2 == 0 { 1.0 } else { -1.0 };
            cf * (ln_n - digamma(cf) - sign / (cf + 1.0))
        })
        .sum::<f64>()
        / n
}

/// Chao-Shen coverage-adjusted estimator.
pub(crate) fn chao_shen(h: &Histogram) -> f64 {
    let n = h.n as f64;
    let mut f1 = h.with_count(1);
    if f1 == h.n && f1 > 0 {
        // Coverage would be zero.
        f1 -= 1;
    }
    let coverage = 1.0 - f1 as f64 / n;

    let mut acc = 0.0_f64;
    for &c in &h.counts {
        let pa = coverage * c as f64 / n;
        if pa <= 0.0 {
            continue;
        }
        let la = 1.0 - (1.0 - pa).powf(n);
        if la <= 0.0 {
            continue;
        }
        acc -= pa * pa.ln() / la;
    }
    acc
}

/// Chao-Wang-Jost estimator using singleton and doubleton counts.
pub(crate) fn chao_wang_jost(h: &Histogram) -> f64 {
    let n = h.n;
    let nf = n as f64;
    let f1 = h.with_count(1);
    let f2 = h.with_count(2);

    let a = if f2 > 0 {
        2.0 * f2 as f64 / ((nf - 1.0) * f1 as f64 + 2.0 * f2 as f64)
    } else if f1 > 0 {
        2.0 / ((nf - 1.0) * (f1 - 1) as f64 + 2.0)
    } else {
        1.0
    };

    let dg_n = digamma(nf);
    let mut cwj: f64 = h
        .counts
        .iter()
        .filter(|&&c| c < n)
        .map(|&c| c as f64 * (dg_n - digamma(c as f64)))
        .sum::<f64>()
        / nf;

    if a != 1.0 && f1 > 0 {
        let one_minus_a = 1.0 - a;
        let tail: f64 = (1..n)
            .map(|r| one_minus_a.powi(r as i32) / r as f64)
            .sum();
        cwj += f1 as f64 / nf * one_minus_a.powi(1 - n as i32) * (-a.ln() - tail);
    }

    cwj
}

/// Bonachela et al. (2008):
/// `Σ (n_i + 1) Σ_{j=n_i+2}^{N+2} 1/j / (N + 2)`.
pub(crate) fn bonachela(h: &Histogram) -> f64 {
    let n = h.n;
    // harmonic[m] = Σ_{j=1}^{m} 1/j
    let mut harmonic = vec![0.0_f64; n + 3];
    for j in 1..harmonic.len() {
        harmonic[j] = harmonic[j - 1] + 1.0 / j as f64;
    }

    h.counts
        .iter()
        .map(|&c| (c + 1) as f64 * (harmonic[n + 2] - harmonic[c + 1]))
        .sum::<f64>()
        / (n + 2) as f64
}

/// James-Stein shrinkage of the empirical distribution towards uniform.
pub(crate) fn shrink(h: &Histogram) -> f64 {
    let n = h.n as f64;
    let target = 1.0 / h.k() as f64;

    let mut var_sum = 0.0_f64;
    let mut msp = 0.0_f64;
    for &c in &h.counts {
        let u = c as f64 / n;
        if h.n > 1 {
            var_sum += u * (1.0 - u) / (n - 1.0);
        }
        msp += (u - target) * (u - target);
    }

    let lambda = if h.n <= 1 || msp == 0.0 {
        1.0
    } else {
        (var_sum / msp).clamp(0.0, 1.0)
    };

    let sum: f64 = h
        .counts
        .iter()
        .map(|&c| lambda * target + (1.0 - lambda) * c as f64 / n)
        .filter(|&p| p > 0.0)
        .map(|p| p * p.ln())
        .sum();
    0.0 - sum
}

/// Asymptotic NSB, `(γ - ln 2) + 2 ln N - ψ(N - K)`.
pub(crate) fn ansb(h: &Histogram, k_support: Option<usize>) -> Result<f64, OracleError> {
    let k = k_support.unwrap_or(h.k());
    let coincidences = h.n as i64 - k as i64;
    if coincidences <= 0 {
        return Err(OracleError::Undefined {
            approach: "ansb",
            reason: format!("no coincidences (N = {}, K = {k})", h.n),
        });
    }
    Ok((EULER_GAMMA - std::f64::consts::LN_2) + 2.0 * (h.n as f64).ln()
        - digamma(coincidences as f64))
}

/// Nemenman-Shafee-Bialek estimator.
///
/// Averages the Dirichlet posterior mean entropy over concentration
/// `β ∈ (0, ln K)` with the NSB prior, integrated by adaptive Simpson.
pub(crate) fn nsb(h: &Histogram, k_support: Option<usize>) -> Result<f64, OracleError> {
    let k = k_support.unwrap_or(h.k());
    if k < h.k() {
        return Err(OracleError::InvalidParameter {
            name: "k_support",
            reason: format!("{k} is smaller than the {} observed symbols", h.k()),
        });
    }
    if h.n == k {
        return Err(OracleError::Undefined {
            approach: "nsb",
            reason: format!("no coincidences (N = K = {k})"),
        });
    }
    let upper = (k as f64).ln();
    if upper <= 0.0 {
        return Err(OracleError::Undefined {
            approach: "nsb",
            reason: "alphabet has a single symbol".to_string(),
        });
    }

    let model = NsbModel {
        counts: &h.counts,
        n: h.n,
        k,
    };
    let l0 = model.neg_log_rho(model.extremum_beta());

    let weight = |beta: f64| (l0 - model.neg_log_rho(beta)).exp() * model.dxi(beta);
    let numerator = |beta: f64| weight(beta) * model.posterior_mean(beta);

    const LOWER: f64 = 1e-8;
    const TOL: f64 = 1e-6;
    const DEPTH: usize = 12;
    let num = adaptive_simpson(&numerator, LOWER, upper, TOL, DEPTH);
    let den = adaptive_simpson(&weight, LOWER, upper, TOL, DEPTH);

    if den == 0.0 || !den.is_finite() {
        return Err(OracleError::Undefined {
            approach: "nsb",
            reason: "prior normalisation vanished".to_string(),
        });
    }
    Ok(num / den)
}

struct NsbModel<'a> {
    counts: &'a [usize],
    n: usize,
    k: usize,
}

impl NsbModel<'_> {
    fn unseen(&self) -> f64 {
        (self.k - self.counts.len()) as f64
    }

    /// Negative log evidence of concentration `beta`.
    fn neg_log_rho(&self, beta: f64) -> f64 {
        let kappa = self.k as f64 * beta;
        let ln_g_beta = ln_gamma(beta);
        let terms: f64 = self
            .counts
            .iter()
            .map(|&c| ln_gamma(c as f64 + beta) - ln_g_beta)
            .sum();
        -(ln_gamma(kappa) - ln_gamma(self.n as f64 + kappa)) - terms
    }

    /// `dξ/dβ = K ψ₁(1 + Kβ) - ψ₁(1 + β)`.
    fn dxi(&self, beta: f64) -> f64 {
        let k = self.k as f64;
        k * trigamma(1.0 + k * beta) - trigamma(1.0 + beta)
    }

    /// Posterior mean entropy under a symmetric Dirichlet(β) prior.
    fn posterior_mean(&self, beta: f64) -> f64 {
        let total = self.n as f64 + self.k as f64 * beta;
        let observed: f64 = self
            .counts
            .iter()
            .map(|&c| {
                let a = c as f64 + beta;
                a * digamma(a + 1.0)
            })
            .sum();
        let unseen = self.unseen() * beta * digamma(beta + 1.0);
        digamma(total + 1.0) - (observed + unseen) / total
    }

    /// Grid search for the evidence maximum, returned as `β = K₀ / K`.
    fn extremum_beta(&self) -> f64 {
        let k = self.k as f64;
        let n = self.n as f64;
        let f = |k0: f64| (k / k0 - digamma(k0 + n) + digamma(k0)).abs();

        const STEPS: usize = 200;
        let step = (k - 0.1) / STEPS as f64;
        let mut best = (0.1_f64, f64::INFINITY);
        for i in 0..STEPS {
            let k0 = 0.1 + step * i as f64;
            let v = f(k0);
            if v < best.1 {
                best = (k0, v);
            }
        }
        best.0 / k
    }
}

fn adaptive_simpson<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, tol: f64, depth: usize) -> f64 {
    fn simpson<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> f64 {
        let c = 0.5 * (a + b);
        (b - a) / 6.0 * (f(a) + 4.0 * f(c) + f(b))
    }

    let c = 0.5 * (a + b);
    let whole = simpson(f, a, b);
    let left = simpson(f, a, c);
    let right = simpson(f, c, b);
    let delta = left + right - whole;
    if depth == 0 || delta.abs() < 15.0 * tol {
        return left + right + delta / 15.0;
    }
    adaptive_simpson(f, a, c, tol / 2.0, depth - 1)
        + adaptive_simpson(f, c, b, tol / 2.0, depth - 1)
}

/// Trigamma via recurrence up to `x >= 8`, then the asymptotic series.
fn trigamma(mut x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    let mut acc = 0.0_f64;
    while x < 8.0 {
        acc += 1.0 / (x * x);
        x += 1.0;
    }
    let z = 1.0 / x;
    let z2 = z * z;
    let z5 = z2 * z2 * z;
    let z7 = z5 * z2;
    let z9 = z7 * z2;
    let z11 = z9 * z2;
    acc + z + 0.5 * z2 + z2 * z / 6.0 - z5 / 30.0 + z7 / 42.0 - z9 / 30.0 + 5.0 * z11 / 66.0
}
