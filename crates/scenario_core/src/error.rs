//! Error types for scenario generation.

use thiserror::Error;

use crate::catalog::VehicleClass;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Errors raised while validating a configuration or writing documents.
///
/// Generation itself never fails once a configuration validates; recoverable
/// inconsistencies (weight renormalization, unresolved disruption routes) are
/// logged and carried in the generated [`crate::Scenario`] instead.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("route table is empty")]
    EmptyRouteTable,

    #[error("route weights must sum to a positive value (got {total})")]
    NonPositiveWeights { total: f64 },

    #[error("route weight given for unknown route `{0}`")]
    WeightForUnknownRoute(String),

    #[error("unknown entity type `{type_id}` referenced by {context}")]
    UnknownEntityType { type_id: String, context: String },

    #[error("entity type `{type_id}` is {found:?} but {context} needs a {expected:?} type")]
    EntityClassMismatch {
        type_id: String,
        context: String,
        expected: VehicleClass,
        found: VehicleClass,
    },

    #[error("disruption window [{start}, {end}] of event at t={spawn_time} is empty")]
    InvalidDisruptionWindow {
        spawn_time: f64,
        start: f64,
        end: f64,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScenarioError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
