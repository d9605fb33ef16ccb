//! Probability distributions for background inter-arrival gaps.
//!
//! These distributions control how far the departure clock advances between
//! two background vehicles.

use rand::RngCore;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScenarioError};

/// Trait for sampling inter-arrival gaps (in seconds).
pub trait InterArrival: Send + Sync + std::fmt::Debug {
    /// Sample the next gap in seconds. Implementations never return a
    /// non-positive value.
    fn sample_secs(&self, rng: &mut dyn RngCore) -> f64;
}

/// Constant inter-arrival gap.
#[derive(Debug, Clone)]
pub struct UniformInterArrival {
    pub interval_secs: f64,
}

impl UniformInterArrival {
    pub fn new(interval_secs: f64) -> Self {
        Self { interval_secs }
    }
}

impl InterArrival for UniformInterArrival {
    fn sample_secs(&self, _rng: &mut dyn RngCore) -> f64 {
        self.interval_secs
    }
}

/// Normally distributed gap, floored so headways stay plausible.
#[derive(Debug, Clone)]
pub struct NormalInterArrival {
    normal: Normal<f64>,
    floor_secs: f64,
}

impl NormalInterArrival {
    pub fn new(mean_secs: f64, std_dev_secs: f64, floor_secs: f64) -> Result<Self> {
        if floor_secs.is_nan() || floor_secs <= 0.0 {
            return Err(ScenarioError::invalid(format!(
                "inter-arrival floor must be positive (got {floor_secs})"
            )));
        }
        let normal = Normal::new(mean_secs, std_dev_secs).map_err(|e| {
            ScenarioError::invalid(format!(
                "inter-arrival Normal({mean_secs}, {std_dev_secs}): {e}"
            ))
        })?;
        Ok(Self { normal, floor_secs })
    }
}

impl InterArrival for NormalInterArrival {
    fn sample_secs(&self, rng: &mut dyn RngCore) -> f64 {
        self.normal.sample(rng).max(self.floor_secs)
    }
}

/// Serializable choice of inter-arrival distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterArrivalKind {
    Normal {
        mean_secs: f64,
        std_dev_secs: f64,
        floor_secs: f64,
    },
    Constant {
        interval_secs: f64,
    },
}

impl Default for InterArrivalKind {
    fn default() -> Self {
        Self::Normal {
            mean_secs: 1.0,
            std_dev_secs: 0.25,
            floor_secs: 0.1,
        }
    }
}

impl InterArrivalKind {
    pub fn build(&self) -> Result<Box<dyn InterArrival>> {
        match *self {
            Self::Normal {
                mean_secs,
                std_dev_secs,
                floor_secs,
            } => Ok(Box::new(NormalInterArrival::new(
                mean_secs,
                std_dev_secs,
                floor_secs,
            )?)),
            Self::Constant { interval_secs } => {
                if interval_secs.is_nan() || interval_secs <= 0.0 {
                    return Err(ScenarioError::invalid(format!(
                        "constant inter-arrival gap must be positive (got {interval_secs})"
                    )));
                }
                Ok(Box::new(UniformInterArrival::new(interval_secs)))
            }
        }
    }
}
