use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{EntityCatalog, VehicleClass};
use crate::color::ColorPolicy;
use crate::disruption::DisruptionSettings;
use crate::distributions::InterArrivalKind;
use crate::error::{Result, ScenarioError};
use crate::routes::RouteTable;
use crate::schedule::{DisruptionEvent, PriorityEvent};
use crate::timeline::{DEFAULT_REPEL_OFFSET_SECS, DEFAULT_REPEL_WINDOW_SECS};

/// Default number of background vehicles.
const DEFAULT_BACKGROUND_COUNT: usize = 100;

fn default_route_weights() -> Vec<(String, f64)> {
    [
        ("ntos", 0.1),
        ("ntow", 0.1),
        ("ntoe", 0.1),
        ("ston", 0.1),
        ("stow", 0.1),
        ("stoe", 0.1),
        ("wtoe", 0.1),
        ("wton", 0.1),
        ("etow", 0.1),
        ("eton", 0.05),
        ("etos", 0.05),
    ]
    .into_iter()
    .map(|(id, w)| (id.to_string(), w))
    .collect()
}

fn default_priority_events() -> Vec<PriorityEvent> {
    vec![
        PriorityEvent::new(30.0, "ntos", "emergency"),
        PriorityEvent::new(60.0, "ston", "emergency"),
        PriorityEvent::new(90.0, "wtoe", "emergency"),
    ]
}

fn default_disruption_events() -> Vec<DisruptionEvent> {
    vec![DisruptionEvent::new(40.0, "ston", "accident", 45.0, 75.0)]
}

/// Everything needed for one generation pass.
///
/// Loaded from JSON; any field left out takes the default crossroads scenario
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// RNG seed. If None, the run is seeded from entropy.
    pub seed: Option<u64>,
    /// Target number of background vehicles (N).
    pub background_count: usize,
    /// Entity type assigned to background vehicles.
    pub background_type: String,
    pub entity_types: EntityCatalog,
    pub routes: RouteTable,
    /// `(route_id, weight)` pairs; renormalized when they do not sum to 1.
    pub route_weights: Vec<(String, f64)>,
    pub inter_arrival: InterArrivalKind,
    pub colors: ColorPolicy,
    pub repel_window_secs: f64,
    pub repel_offset_secs: f64,
    pub priority_events: Vec<PriorityEvent>,
    pub disruption_events: Vec<DisruptionEvent>,
    pub disruption: DisruptionSettings,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: None,
            background_count: DEFAULT_BACKGROUND_COUNT,
            background_type: "car".to_string(),
            entity_types: EntityCatalog::default(),
            routes: RouteTable::default(),
            route_weights: default_route_weights(),
            inter_arrival: InterArrivalKind::default(),
            colors: ColorPolicy::default(),
            repel_window_secs: DEFAULT_REPEL_WINDOW_SECS,
            repel_offset_secs: DEFAULT_REPEL_OFFSET_SECS,
            priority_events: default_priority_events(),
            disruption_events: default_disruption_events(),
            disruption: DisruptionSettings::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_background_count(mut self, count: usize) -> Self {
        self.background_count = count;
        self
    }

    pub fn with_priority_events(mut self, events: Vec<PriorityEvent>) -> Self {
        self.priority_events = events;
        self
    }

    pub fn with_disruption_events(mut self, events: Vec<DisruptionEvent>) -> Self {
        self.disruption_events = events;
        self
    }

    pub fn with_route_weights(mut self, weights: Vec<(String, f64)>) -> Self {
        self.route_weights = weights;
        self
    }

    pub fn with_inter_arrival(mut self, inter_arrival: InterArrivalKind) -> Self {
        self.inter_arrival = inter_arrival;
        self
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Reject structurally broken input before generation.
    ///
    /// Events on routes missing from the table are only warned about: the
    /// vehicle is still emitted and its control artifacts are skipped.
    pub fn validate(&self) -> Result<()> {
        if self.routes.is_empty() {
            return Err(ScenarioError::EmptyRouteTable);
        }
        self.require_type(&self.background_type, VehicleClass::Ordinary, "background traffic")?;

        let window_ok = self.repel_window_secs.is_finite() && self.repel_window_secs >= 0.0;
        let offset_ok = self.repel_offset_secs.is_finite() && self.repel_offset_secs > 0.0;
        if !window_ok || !offset_ok {
            return Err(ScenarioError::invalid(format!(
                "repel window ({}) must be non-negative and repel offset ({}) positive",
                self.repel_window_secs, self.repel_offset_secs
            )));
        }

        for event in &self.priority_events {
            check_time(event.spawn_time, "priority spawn time")?;
            self.require_type(&event.entity_type, VehicleClass::Priority, "priority event")?;
            self.warn_unknown_route(&event.route_id, event.spawn_time);
        }

        for event in &self.disruption_events {
            check_time(event.spawn_time, "disruption spawn time")?;
            check_time(event.disruption_start, "disruption start")?;
            check_time(event.disruption_end, "disruption end")?;
            if event.disruption_start >= event.disruption_end {
                return Err(ScenarioError::InvalidDisruptionWindow {
                    spawn_time: event.spawn_time,
                    start: event.disruption_start,
                    end: event.disruption_end,
                });
            }
            if event.spawn_time > event.disruption_start {
                warn!(
                    spawn_time = event.spawn_time,
                    start = event.disruption_start,
                    route = %event.route_id,
                    "disruption starts before its vehicle departs"
                );
            }
            self.require_type(&event.entity_type, VehicleClass::Disruption, "disruption event")?;
            self.warn_unknown_route(&event.route_id, event.spawn_time);
        }

        Ok(())
    }

    /// The type must exist and carry the role its event kind expects.
    fn require_type(&self, type_id: &str, expected: VehicleClass, context: &str) -> Result<()> {
        match self.entity_types.class_of(type_id) {
            None => Err(ScenarioError::UnknownEntityType {
                type_id: type_id.to_string(),
                context: context.to_string(),
            }),
            Some(found) if found != expected => Err(ScenarioError::EntityClassMismatch {
                type_id: type_id.to_string(),
                context: context.to_string(),
                expected,
                found,
            }),
            Some(_) => Ok(()),
        }
    }

    fn warn_unknown_route(&self, route_id: &str, spawn_time: f64) {
        if !self.routes.contains(route_id) {
            warn!(route = %route_id, spawn_time, "scheduled event references unknown route");
        }
    }
}

fn check_time(t: f64, what: &str) -> Result<()> {
    if t.is_finite() && t >= 0.0 {
        Ok(())
    } else {
        Err(ScenarioError::invalid(format!(
            "{what} must be finite and non-negative (got {t})"
        )))
    }
}
