//! Entropy and mutual information estimation.
//!
//! Dispatchers ([`EntropyDispatcher`], [`compute_mutual_information`])
//! validate requests and resolve approach names; an [`EstimationOracle`]
//! does the numeric work. [`NativeOracle`] is the in-crate oracle:
//!
//! - histogram estimators for discrete samples (plug-in, Miller-Madow,
//!   Grassberger, Chao-Shen, Chao-Wang-Jost, Bonachela, shrinkage, NSB, ANSB)
//! - kernel and Kozachenko-Leonenko estimators of differential entropy
//! - plug-in and KSG mutual information

mod continuous;
mod discrete;
mod entropy;
mod error;
mod mutual_info;
mod native;
mod oracle;
mod params;

pub use entropy::{
    shannon_entropy, AlphabetEntropy, EntropyDispatcher, EntropyEstimate, EntropyRequest,
    EntropyType,
};
pub use error::EstimationError;
pub use mutual_info::{compute_mutual_information, MutualInformationEstimate};
pub use native::NativeOracle;
pub use oracle::{EstimationOracle, OracleError};
pub use params::{
    EntropyApproach, EstimatorFamily, EstimatorParams, KernelKind, LogBase, MiApproach,
};

#[cfg(test)]
pub(crate) use oracle::testing;
