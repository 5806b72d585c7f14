use std::fmt;

/// Errors raised when a usage distribution cannot be constructed from its
/// numeric parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    InvalidParameters {
        distribution: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionError::InvalidParameters {
                distribution,
                reason,
            } => {
                write!(f, "invalid {distribution} parameters: {reason}")
            }
        }
    }
}

impl std::error::Error for DistributionError {}

/// Top-level error taxonomy for simulation, sensitivity, and search calls.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Malformed `ParameterSet` (non-normalizable weight/share triples,
    /// negative dispersion parameters, and the like).
    InvalidParameter(String),
    /// Malformed `OfferSpec` (validity below one day, negative allowances).
    InvalidOffer(String),
    /// An unexpected fault inside a replicate. Aborts the whole aggregation.
    SimulationFault(String),
    /// The minimizer failed inside one search tier. Recovered per-tier.
    OptimizerFault(String),
    /// Every search tier failed; no result can be returned.
    SearchExhausted,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            SimError::InvalidOffer(msg) => write!(f, "invalid offer: {msg}"),
            SimError::SimulationFault(msg) => write!(f, "simulation fault: {msg}"),
            SimError::OptimizerFault(msg) => write!(f, "optimizer fault: {msg}"),
            SimError::SearchExhausted => write!(f, "all search tiers failed"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<DistributionError> for SimError {
    fn from(e: DistributionError) -> Self {
        SimError::InvalidParameter(e.to_string())
    }
}

pub type SimResult<T> = std::result::Result<T, SimError>;
