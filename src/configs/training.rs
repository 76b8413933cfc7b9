use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::Serialize;

/// Seed forwarded with every train request so reruns are reproducible.
pub const RANDOM_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Tanh,
    Logistic,
}

impl Activation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::Tanh => "tanh",
            Self::Logistic => "logistic",
        }
    }
}

impl FromStr for Activation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(Self::Relu),
            "tanh" => Ok(Self::Tanh),
            "logistic" => Ok(Self::Logistic),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerAlgorithm {
    Adam,
    Sgd,
    Lbfgs,
}

impl OptimizerAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adam => "adam",
            Self::Sgd => "sgd",
            Self::Lbfgs => "lbfgs",
        }
    }
}

impl FromStr for OptimizerAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adam" => Ok(Self::Adam),
            "sgd" => Ok(Self::Sgd),
            "lbfgs" => Ok(Self::Lbfgs),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for OptimizerAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration payload for one train request. Built per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub dataset_id: String,
    pub hidden_layer_sizes: Vec<u32>,
    pub activation: Activation,
    pub optimizer: OptimizerAlgorithm,
    pub max_iterations: NonZeroU32,
    pub random_seed: u64,
}

impl TrainingConfig {
    /// Creates a new `TrainingConfig` seeded with [`RANDOM_SEED`].
    ///
    /// # Args
    /// * `dataset_id` - Identifier returned by the upload step.
    /// * `hidden_layer_sizes` - Width of each hidden layer, in order.
    /// * `activation` - Hidden layer activation function.
    /// * `optimizer` - Weight optimization algorithm.
    /// * `max_iterations` - Upper bound on training iterations.
    ///
    /// # Returns
    /// A new `TrainingConfig` instance.
    pub fn new(
        dataset_id: impl Into<String>,
        hidden_layer_sizes: Vec<u32>,
        activation: Activation,
        optimizer: OptimizerAlgorithm,
        max_iterations: NonZeroU32,
    ) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            hidden_layer_sizes,
            activation,
            optimizer,
            max_iterations,
            random_seed: RANDOM_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(" ReLU ".parse::<Activation>(), Ok(Activation::Relu));
        assert_eq!("logistic".parse::<Activation>(), Ok(Activation::Logistic));
        assert_eq!(
            "LBFGS".parse::<OptimizerAlgorithm>(),
            Ok(OptimizerAlgorithm::Lbfgs)
        );
        assert!("sigmoid".parse::<Activation>().is_err());
        assert!("rmsprop".parse::<OptimizerAlgorithm>().is_err());
    }

    #[test]
    fn new_uses_fixed_seed() {
        let config = TrainingConfig::new(
            "abc123",
            vec![100, 50],
            Activation::Tanh,
            OptimizerAlgorithm::Sgd,
            NonZeroU32::new(200).unwrap(),
        );
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.dataset_id, "abc123");
    }
}
