use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Diffusion semantics. The weighted-cascade scheme is IC with WC edge
/// probabilities, so it does not get its own variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationModel {
    Ic,
    Lt,
}

/// Which per-edge probability vector a query reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbabilityModel {
    /// 1 / inDeg(target), 0 for sourceless targets.
    Wc,
    /// One draw per edge from {0.1, 0.01, 0.001}, fixed at load time.
    Tr,
    /// Constant 0.1.
    Co,
}

/// How seed nodes are obtained when the caller does not list them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedMode {
    Imm,
    Random,
    Degree,
    Manual,
}

impl PropagationModel {
    pub fn as_str(self) -> &'static str {
        match self {
            PropagationModel::Ic => "IC",
            PropagationModel::Lt => "LT",
        }
    }
}

impl ProbabilityModel {
    pub fn as_str(self) -> &'static str {
        match self {
            ProbabilityModel::Wc => "WC",
            ProbabilityModel::Tr => "TR",
            ProbabilityModel::Co => "CO",
        }
    }
}

impl FromStr for PropagationModel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IC" => Ok(PropagationModel::Ic),
            "LT" => Ok(PropagationModel::Lt),
            other => Err(EngineError::ConfigInvalid(format!(
                "unsupported propagation model: {other}"
            ))),
        }
    }
}

impl FromStr for ProbabilityModel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WC" => Ok(ProbabilityModel::Wc),
            "TR" => Ok(ProbabilityModel::Tr),
            "CO" => Ok(ProbabilityModel::Co),
            other => Err(EngineError::ConfigInvalid(format!(
                "unknown probability model: {other}"
            ))),
        }
    }
}

impl FromStr for SeedMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IMM" => Ok(SeedMode::Imm),
            "RANDOM" => Ok(SeedMode::Random),
            "DEGREE" => Ok(SeedMode::Degree),
            "MANUAL" => Ok(SeedMode::Manual),
            other => Err(EngineError::ConfigInvalid(format!(
                "unknown seed generation mode: {other}"
            ))),
        }
    }
}

impl fmt::Display for PropagationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProbabilityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("IC".parse::<PropagationModel>().unwrap(), PropagationModel::Ic);
        assert_eq!("LT".parse::<PropagationModel>().unwrap(), PropagationModel::Lt);
        assert_eq!("TR".parse::<ProbabilityModel>().unwrap(), ProbabilityModel::Tr);
        assert_eq!("RANDOM".parse::<SeedMode>().unwrap(), SeedMode::Random);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("SI".parse::<PropagationModel>().is_err());
        assert!("wc".parse::<ProbabilityModel>().is_err());
        assert!("".parse::<SeedMode>().is_err());
    }
}
