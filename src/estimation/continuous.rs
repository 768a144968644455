//! One-dimensional density and nearest-neighbour estimators (natural log).

use super::oracle::OracleError;
use super::params::KernelKind;
use statrs::function::gamma::digamma;
use std::f64::consts::PI;

/// Kernel density estimate of differential entropy, `-mean ln f̂(x_i)`.
///
/// The box kernel counts neighbours within `bandwidth / 2` (self
/// included) and uses `f̂ = count / (N · bandwidth)`. The gaussian
/// kernel scales the bandwidth by the sample standard deviation.
pub(crate) fn kernel_entropy(xs: &[f64], bandwidth: f64, kernel: KernelKind) -> f64 {
    match kernel {
        KernelKind::Box => box_kernel_entropy(xs, bandwidth),
        KernelKind::Gaussian => gaussian_kernel_entropy(xs, bandwidth),
    }
}

fn box_kernel_entropy(xs: &[f64], bandwidth: f64) -> f64 {
    let sorted = sorted_copy(xs);
    let n = sorted.len() as f64;
    let half = bandwidth / 2.0;
    let n_volume = n * bandwidth;

    sorted
        .iter()
        .map(|&x| {
            let lo = sorted.partition_point(|&v| v < x - half);
            let hi = sorted.partition_point(|&v| v <= x + half);
            (n_volume / (hi - lo) as f64).ln()
        })
        .sum::<f64>()
        / n
}

fn gaussian_kernel_entropy(xs: &[f64], bandwidth: f64) -> f64 {
    let n = xs.len() as f64;
    let sigma = sample_std(xs);
    let h = if sigma > 0.0 { bandwidth * sigma } else { bandwidth };
    let norm = n * h * (2.0 * PI).sqrt();

    xs.iter()
        .map(|&xi| {
            let mass: f64 = xs
                .iter()
                .map(|&xj| {
                    let z = (xi - xj) / h;
                    (-0.5 * z * z).exp()
                })
                .sum();
            -(mass / norm).ln()
        })
        .sum::<f64>()
        / n
}

/// Kozachenko-Leonenko estimate, `ψ(N) - ψ(k) + ln 2 + mean ln r_k`.
///
/// Points whose k-th neighbour sits at distance zero (ties) are left out
/// of the radius average. Requires `N > k`.
pub(crate) fn kozachenko_leonenko(xs: &[f64], k: usize) -> Result<f64, OracleError> {
    let sorted = sorted_copy(xs);
    let radii = kth_neighbour_distances(&sorted, k);

    let (sum_ln_r, positive) = radii
        .iter()
        .filter(|&&r| r > 0.0)
        .fold((0.0_f64, 0usize), |(s, c), &r| (s + r.ln(), c + 1));
    if positive == 0 {
        return Err(OracleError::Undefined {
            approach: "metric",
            reason: format!("every {k}-th neighbour distance is zero"),
        });
    }

    let n = sorted.len() as f64;
    // ln of the 1-D unit ball volume (length 2)
    let ln_volume = std::f64::consts::LN_2;
    Ok(digamma(n) - digamma(k as f64) + ln_volume + sum_ln_r / positive as f64)
}

/// Kraskov-Stoegbauer-Grassberger mutual information (algorithm 1).
///
/// Joint distances use the max-norm. `ψ(k) + ψ(N) - mean[ψ(n_x+1) + ψ(n_y+1)]`
/// where `n_x`, `n_y` count marginal neighbours strictly inside the
/// joint k-th neighbour distance. Requires `N > k`.
pub(crate) fn ksg_mutual_information(x: &[f64], y: &[f64], k: usize) -> f64 {
    let n = x.len();
    let mut joint = Vec::with_capacity(n.saturating_sub(1));
    let mut marginal_sum = 0.0_f64;

    for i in 0..n {
        joint.clear();
        joint.extend(
            (0..n)
                .filter(|&j| j != i)
                .map(|j| (x[i] - x[j]).abs().max((y[i] - y[j]).abs())),
        );
        let (_, eps, _) = joint.select_nth_unstable_by(k - 1, |a, b| a.total_cmp(b));
        let eps = *eps;

        let nx = (0..n)
            .filter(|&j| j != i && (x[i] - x[j]).abs() < eps)
            .count();
        let ny = (0..n)
            .filter(|&j| j != i && (y[i] - y[j]).abs() < eps)
            .count();
        marginal_sum += digamma((nx + 1) as f64) + digamma((ny + 1) as f64);
    }

    digamma(k as f64) + digamma(n as f64) - marginal_sum / n as f64
}

/// Distance from each point of `sorted` to its k-th nearest other point.
fn kth_neighbour_distances(sorted: &[f64], k: usize) -> Vec<f64> {
    let n = sorted.len();
    (0..n)
        .map(|i| {
            let (mut lo, mut hi) = (i, i);
            let mut dist = 0.0;
            for _ in 0..k {
                let left = (lo > 0).then(|| sorted[i] - sorted[lo - 1]);
                let right = (hi + 1 < n).then(|| sorted[hi + 1] - sorted[i]);
                match (left, right) {
                    (Some(l), Some(r)) if l <= r => {
                        lo -= 1;
                        dist = l;
                    }
                    (Some(l), None) => {
                        lo -= 1;
                        dist = l;
                    }
                    (_, Some(r)) => {
                        hi += 1;
                        dist = r;
                    }
                    (None, None) => break,
                }
            }
            dist
        })
        .collect()
}

fn sorted_copy(xs: &[f64]) -> Vec<f64> {
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

fn sample_std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let ss: f64 = xs.iter().map(|&x| (x - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}
