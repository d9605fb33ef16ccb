//! Demand sampler: the background (non-scheduled) arrival stream.
//!
//! Each draw picks a route by weighted sampling, a color by rejection sampling
//! and an inter-arrival gap from the configured distribution.

use rand::{Rng, RngCore};
use tracing::warn;

use crate::color::{Color, ColorPolicy};
use crate::distributions::InterArrival;
use crate::error::{Result, ScenarioError};
use crate::routes::RouteTable;

/// Allowed deviation of the weight total from 1 before renormalizing.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-4;

/// Route probabilities with a cumulative table for binary-search sampling.
#[derive(Debug, Clone)]
pub struct RouteWeights {
    route_ids: Vec<String>,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
    renormalized: bool,
}

impl RouteWeights {
    /// Build from `(route_id, weight)` pairs, checking every id against the table.
    ///
    /// A total outside `1 ± WEIGHT_SUM_TOLERANCE` is renormalized and reported.
    pub fn new(entries: &[(String, f64)], routes: &RouteTable) -> Result<Self> {
        if entries.is_empty() {
            return Err(ScenarioError::invalid("route weight table is empty"));
        }
        for (route_id, weight) in entries {
            if !routes.contains(route_id) {
                return Err(ScenarioError::WeightForUnknownRoute(route_id.clone()));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ScenarioError::invalid(format!(
                    "weight for route `{route_id}` must be finite and non-negative (got {weight})"
                )));
            }
        }

        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if !total.is_finite() {
            return Err(ScenarioError::invalid(format!(
                "route weights overflow when summed (got {total}); scale them down"
            )));
        }
        if total <= 0.0 {
            return Err(ScenarioError::NonPositiveWeights { total });
        }

        let renormalized = (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE;
        if renormalized {
            warn!(total, "route weights do not sum to 1.0; renormalizing");
        }
        let scale = if renormalized { total } else { 1.0 };

        let route_ids = entries.iter().map(|(id, _)| id.clone()).collect();
        let weights: Vec<f64> = entries.iter().map(|(_, w)| w / scale).collect();
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut running = 0.0;
        for w in &weights {
            running += w;
            cumulative.push(running);
        }

        Ok(Self {
            route_ids,
            weights,
            cumulative,
            renormalized,
        })
    }

    /// Whether the configured weights had to be rescaled.
    pub fn was_renormalized(&self) -> bool {
        self.renormalized
    }

    pub fn weight(&self, route_id: &str) -> Option<f64> {
        self.route_ids
            .iter()
            .position(|id| id == route_id)
            .map(|i| self.weights[i])
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r: f64 = rng.gen_range(0.0..total);
        let idx = self
            .cumulative
            .partition_point(|&w| w <= r)
            .min(self.route_ids.len() - 1);
        &self.route_ids[idx]
    }
}

/// One background arrival proposed by the sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundDraw {
    pub route_id: String,
    pub color: Color,
    pub gap_secs: f64,
}

/// Background demand generator.
#[derive(Debug)]
pub struct DemandSampler {
    weights: RouteWeights,
    colors: ColorPolicy,
    inter_arrival: Box<dyn InterArrival>,
}

impl DemandSampler {
    pub fn new(
        weights: RouteWeights,
        colors: ColorPolicy,
        inter_arrival: Box<dyn InterArrival>,
    ) -> Self {
        Self {
            weights,
            colors,
            inter_arrival,
        }
    }

    /// Draw one candidate background vehicle.
    pub fn draw(&self, rng: &mut dyn RngCore) -> BackgroundDraw {
        let route_id = self.weights.sample(rng).to_string();
        let color = self.colors.sample(rng);
        let gap_secs = self.inter_arrival.sample_secs(rng);
        BackgroundDraw {
            route_id,
            color,
            gap_secs,
        }
    }
}
