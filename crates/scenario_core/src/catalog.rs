//! Entity-type catalog: vehicle classes and their default physical/behavioral attributes.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Role a vehicle type plays in the generated timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    /// Background traffic drawn by the demand sampler.
    Ordinary,
    /// Scheduled vehicle with aggressive lane-change defaults.
    Priority,
    /// Scheduled vehicle that stops on its first segment and closes it.
    Disruption,
}

/// Lane-change model modifiers (`lcStrategic`, `lcCooperative`, `lcSpeedGain`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneChangeProfile {
    pub strategic: f64,
    pub cooperative: f64,
    pub speed_gain: f64,
}

/// A named vehicle type written as one `vType` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    pub id: String,
    pub class: VehicleClass,
    pub accel: f64,
    pub decel: f64,
    pub length: f64,
    pub max_speed: f64,
    pub color: Color,
    #[serde(default)]
    pub sigma: Option<f64>,
    /// Access class (`vClass`), e.g. `emergency` or `truck`.
    #[serde(default)]
    pub access_class: Option<String>,
    #[serde(default)]
    pub gui_shape: Option<String>,
    #[serde(default)]
    pub min_gap: Option<f64>,
    #[serde(default)]
    pub emergency_decel: Option<f64>,
    #[serde(default)]
    pub lane_change: Option<LaneChangeProfile>,
    #[serde(default)]
    pub bluelight: bool,
}

impl EntityType {
    /// Ordinary passenger car.
    pub fn car() -> Self {
        Self {
            id: "car".to_string(),
            class: VehicleClass::Ordinary,
            accel: 2.5,
            decel: 4.5,
            length: 4.0,
            max_speed: 33.33,
            color: Color::ORDINARY_YELLOW,
            sigma: Some(0.5),
            access_class: None,
            gui_shape: None,
            min_gap: None,
            emergency_decel: None,
            lane_change: None,
            bluelight: false,
        }
    }

    /// Emergency vehicle with a blue-light device and eager lane changes.
    pub fn emergency() -> Self {
        Self {
            id: "emergency".to_string(),
            class: VehicleClass::Priority,
            accel: 5.0,
            decel: 8.0,
            length: 5.0,
            max_speed: 50.0,
            color: Color::PRIORITY_RED,
            sigma: Some(0.0),
            access_class: Some("emergency".to_string()),
            gui_shape: Some("emergency".to_string()),
            min_gap: Some(1.0),
            emergency_decel: None,
            lane_change: Some(LaneChangeProfile {
                strategic: 2.0,
                cooperative: 1.0,
                speed_gain: 3.0,
            }),
            bluelight: true,
        }
    }

    /// Stalled vehicle shown as a truck; stops for the disruption window.
    pub fn accident() -> Self {
        Self {
            id: "accident".to_string(),
            class: VehicleClass::Disruption,
            accel: 2.5,
            decel: 4.5,
            length: 4.0,
            max_speed: 33.33,
            color: Color::DISRUPTION_ORANGE,
            sigma: Some(0.0),
            access_class: Some("truck".to_string()),
            gui_shape: Some("truck".to_string()),
            min_gap: Some(0.0),
            emergency_decel: Some(9.0),
            lane_change: None,
            bluelight: false,
        }
    }
}

/// Ordered set of vehicle types. Order is preserved in the demand document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCatalog {
    types: Vec<EntityType>,
}

impl Default for EntityCatalog {
    fn default() -> Self {
        Self::new(vec![
            EntityType::car(),
            EntityType::emergency(),
            EntityType::accident(),
        ])
    }
}

impl EntityCatalog {
    pub fn new(types: Vec<EntityType>) -> Self {
        Self { types }
    }

    pub fn get(&self, id: &str) -> Option<&EntityType> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn class_of(&self, id: &str) -> Option<VehicleClass> {
        self.get(id).map(|t| t.class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
