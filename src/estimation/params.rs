//! Estimator names, logarithm bases and estimator-specific parameters.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Logarithm base for reported entropies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogBase {
    /// Bits.
    #[default]
    Two,
    /// Nats.
    E,
}

impl LogBase {
    /// Logarithm of `x` in this base.
    #[inline]
    pub fn log(self, x: f64) -> f64 {
        match self {
            LogBase::Two => x.log2(),
            LogBase::E => x.ln(),
        }
    }

    /// Converts a value measured in nats into this base.
    #[inline]
    pub fn from_nats(self, nats: f64) -> f64 {
        match self {
            LogBase::Two => nats / std::f64::consts::LN_2,
            LogBase::E => nats,
        }
    }

    /// Canonical name, `"2"` or `"e"`.
    pub fn as_str(self) -> &'static str {
        match self {
            LogBase::Two => "2",
            LogBase::E => "e",
        }
    }
}

impl fmt::Display for LogBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2" | "bits" => Ok(LogBase::Two),
            "e" | "nats" => Ok(LogBase::E),
            other => Err(format!("unsupported logarithm base '{other}', expected '2' or 'e'")),
        }
    }
}

impl Serialize for LogBase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogBase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) if n == 2.0 => Ok(LogBase::Two),
            Raw::Number(n) => Err(serde::de::Error::custom(format!(
                "unsupported logarithm base {n}, expected 2 or \"e\""
            ))),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Kernel shape for the kernel density estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    /// Uniform kernel of width `bandwidth`.
    #[default]
    Box,
    /// Gaussian kernel, bandwidth scaled by the sample standard deviation.
    Gaussian,
}

/// Which family an entropy approach belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorFamily {
    /// Histogram estimators of Shannon entropy.
    Discrete,
    /// Density estimators of differential entropy.
    Continuous,
}

/// Supported entropy estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyApproach {
    /// Maximum-likelihood plug-in.
    Discrete,
    /// Plug-in plus `(K-1)/(2N)`.
    MillerMadow,
    /// Grassberger digamma correction.
    Grassberger,
    /// Chao-Shen coverage adjustment.
    ChaoShen,
    /// Chao-Wang-Jost.
    ChaoWangJost,
    /// Bonachela harmonic-sum estimator.
    Bonachela,
    /// James-Stein shrinkage towards uniform.
    Shrink,
    /// Nemenman-Shafee-Bialek.
    Nsb,
    /// Asymptotic NSB.
    Ansb,
    /// Kozachenko-Leonenko k-nearest-neighbour.
    Metric,
    /// Kernel density.
    Kernel,
}

impl EntropyApproach {
    /// Histogram estimators, reported as Shannon entropy.
    pub const DISCRETE: [EntropyApproach; 9] = [
        EntropyApproach::Discrete,
        EntropyApproach::MillerMadow,
        EntropyApproach::Grassberger,
        EntropyApproach::ChaoShen,
        EntropyApproach::ChaoWangJost,
        EntropyApproach::Bonachela,
        EntropyApproach::Shrink,
        EntropyApproach::Nsb,
        EntropyApproach::Ansb,
    ];

    /// Density estimators, reported as differential entropy.
    pub const CONTINUOUS: [EntropyApproach; 2] = [EntropyApproach::Metric, EntropyApproach::Kernel];

    /// Wire name of the approach.
    pub fn as_str(self) -> &'static str {
        match self {
            EntropyApproach::Discrete => "discrete",
            EntropyApproach::MillerMadow => "miller_madow",
            EntropyApproach::Grassberger => "grassberger",
            EntropyApproach::ChaoShen => "chao_shen",
            EntropyApproach::ChaoWangJost => "chao_wang_jost",
            EntropyApproach::Bonachela => "bonachela",
            EntropyApproach::Shrink => "shrink",
            EntropyApproach::Nsb => "nsb",
            EntropyApproach::Ansb => "ansb",
            EntropyApproach::Metric => "metric",
            EntropyApproach::Kernel => "kernel",
        }
    }

    /// Looks an approach up by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::DISCRETE
            .iter()
            .chain(Self::CONTINUOUS.iter())
            .copied()
            .find(|a| a.as_str() == name)
    }

    /// Family of the approach.
    pub fn family(self) -> EstimatorFamily {
        match self {
            EntropyApproach::Metric | EntropyApproach::Kernel => EstimatorFamily::Continuous,
            _ => EstimatorFamily::Discrete,
        }
    }

    /// All supported wire names, discrete family first.
    pub fn names() -> Vec<&'static str> {
        Self::DISCRETE
            .iter()
            .chain(Self::CONTINUOUS.iter())
            .map(|a| a.as_str())
            .collect()
    }
}

impl fmt::Display for EntropyApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported mutual information estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiApproach {
    /// Plug-in `H(X) + H(Y) - H(X,Y)`.
    Discrete,
    /// Kraskov-Stoegbauer-Grassberger k-nearest-neighbour.
    Metric,
}

impl MiApproach {
    /// Every supported approach.
    pub const ALL: [MiApproach; 2] = [MiApproach::Discrete, MiApproach::Metric];

    /// Wire name of the approach.
    pub fn as_str(self) -> &'static str {
        match self {
            MiApproach::Discrete => "discrete",
            MiApproach::Metric => "metric",
        }
    }

    /// Looks an approach up by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == name)
    }

    /// All supported wire names.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.as_str()).collect()
    }
}

impl fmt::Display for MiApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimator-specific parameters. Unset fields use estimator defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorParams {
    /// Logarithm base of the result.
    pub base: LogBase,
    /// Kernel bandwidth (kernel estimator).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    /// Kernel shape (kernel estimator).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel: Option<KernelKind>,
    /// Neighbour rank (metric estimators).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
    /// Known alphabet size, overriding the observed one (NSB, ANSB).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_support: Option<usize>,
}

impl EstimatorParams {
    /// Default kernel bandwidth.
    pub const DEFAULT_BANDWIDTH: f64 = 1.0;
    /// Default neighbour rank for metric estimators.
    pub const DEFAULT_K: usize = 4;

    /// Parameters with only the base set.
    pub fn with_base(base: LogBase) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    /// Bandwidth, or the default.
    pub fn bandwidth_or_default(&self) -> f64 {
        self.bandwidth.unwrap_or(Self::DEFAULT_BANDWIDTH)
    }

    /// Kernel, or the default.
    pub fn kernel_or_default(&self) -> KernelKind {
        self.kernel.unwrap_or_default()
    }

    /// Neighbour rank, or the default.
    pub fn k_or_default(&self) -> usize {
        self.k.unwrap_or(Self::DEFAULT_K)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_names_round_trip() {
        for name in EntropyApproach::names() {
            let approach = EntropyApproach::from_name(name).unwrap();
            assert_eq!(approach.as_str(), name);
        }
        assert!(EntropyApproach::from_name("zhang").is_none());
    }

    #[test]
    fn test_families_are_disjoint() {
        assert!(EntropyApproach::DISCRETE
            .iter()
            .all(|a| a.family() == EstimatorFamily::Discrete));
        assert!(EntropyApproach::CONTINUOUS
            .iter()
            .all(|a| a.family() == EstimatorFamily::Continuous));
    }

    #[test]
    fn test_mi_whitelist() {
        assert_eq!(MiApproach::names(), vec!["discrete", "metric"]);
        assert!(MiApproach::from_name("kernel").is_none());
    }

    #[test]
    fn test_log_base_parsing() {
        assert_eq!("2".parse::<LogBase>().unwrap(), LogBase::Two);
        assert_eq!("nats".parse::<LogBase>().unwrap(), LogBase::E);
        assert!("10".parse::<LogBase>().is_err());

        let base: LogBase = serde_json::from_str("2").unwrap();
        assert_eq!(base, LogBase::Two);
        let base: LogBase = serde_json::from_str("\"e\"").unwrap();
        assert_eq!(base, LogBase::E);
        assert!(serde_json::from_str::<LogBase>("10").is_err());
    }

    #[test]
    fn test_from_nats() {
        let nats = 4.0f64.ln();
        assert!((LogBase::Two.from_nats(nats) - 2.0).abs() < 1e-12);
        assert_eq!(LogBase::E.from_nats(nats), nats);
    }

    #[test]
    fn test_params_serialization_skips_unset() {
        let params = EstimatorParams::default();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({ "base": "2" }));

        let parsed: EstimatorParams =
            serde_json::from_str(r#"{"base": "e", "bandwidth": 2.5, "kernel": "gaussian"}"#)
                .unwrap();
        assert_eq!(parsed.base, LogBase::E);
        assert_eq!(parsed.bandwidth_or_default(), 2.5);
        assert_eq!(parsed.kernel_or_default(), KernelKind::Gaussian);
        assert_eq!(parsed.k_or_default(), EstimatorParams::DEFAULT_K);
    }

    #[test]
    fn test_params_reject_unknown_fields() {
        assert!(serde_json::from_str::<EstimatorParams>(r#"{"alpha": 1}"#).is_err());
    }
}
