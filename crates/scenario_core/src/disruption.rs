//! Disruption side effects: speed-control zones and closure rules.
//!
//! Both the stop descriptor on a disruption vehicle and the control artifacts
//! in the additional document are derived through [`DisruptionSettings::resolve_site`],
//! so they always name the same segment and lane.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::routes::{RouteError, RouteTable};
use crate::schedule::DisruptionEvent;

/// Where a disruption takes effect: the first segment of its route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisruptionSite {
    pub segment_id: String,
    pub lane_id: String,
}

/// Stop positions (meters along the lane) for a stalled vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopGeometry {
    pub pos: f64,
    pub start_pos: f64,
    pub end_pos: f64,
}

impl Default for StopGeometry {
    fn default() -> Self {
        Self {
            pos: 50.0,
            start_pos: 45.0,
            end_pos: 55.0,
        }
    }
}

/// Stop sub-record attached to a disruption vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopDescriptor {
    pub lane_id: String,
    pub geometry: StopGeometry,
    pub duration: f64,
    pub until: f64,
    pub triggered: bool,
    pub parking: bool,
}

/// Shared parameters for disruption artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisruptionSettings {
    /// Lane index on the first segment where the vehicle stalls.
    pub lane_index: u32,
    /// Speed restored outside the disruption window (m/s).
    pub baseline_speed: f64,
    pub stop: StopGeometry,
    /// Vehicle classes still allowed on the closed lane. Must leave at least
    /// one class able to use the segment, or rerouting fails in the simulator.
    pub closure_allow: Vec<String>,
}

impl Default for DisruptionSettings {
    fn default() -> Self {
        Self {
            lane_index: 1,
            baseline_speed: 13.89,
            stop: StopGeometry::default(),
            closure_allow: vec!["truck".to_string()],
        }
    }
}

impl DisruptionSettings {
    pub fn resolve_site(
        &self,
        routes: &RouteTable,
        route_id: &str,
    ) -> Result<DisruptionSite, RouteError> {
        let segment = routes.first_segment(route_id)?;
        Ok(DisruptionSite {
            segment_id: segment.to_string(),
            lane_id: format!("{segment}_{}", self.lane_index),
        })
    }

    pub fn stop_for(&self, site: &DisruptionSite, event: &DisruptionEvent) -> StopDescriptor {
        StopDescriptor {
            lane_id: site.lane_id.clone(),
            geometry: self.stop,
            duration: event.duration(),
            until: event.disruption_end,
            triggered: false,
            parking: false,
        }
    }
}

/// One `(time, speed)` step of a variable speed sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedStep {
    pub time: f64,
    pub speed: f64,
}

/// Variable speed sign on the disrupted lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedControlZone {
    pub id: String,
    pub segment_id: String,
    pub lane_id: String,
    pub steps: [SpeedStep; 3],
}

/// Rerouter that closes the disrupted lane for the disruption window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosureRule {
    pub id: String,
    pub segment_id: String,
    pub lane_id: String,
    pub begin: f64,
    pub end: f64,
    pub allow: Vec<String>,
}

/// A disruption whose route could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDisruption {
    pub index: usize,
    pub route_id: String,
    pub reason: RouteError,
}

/// Everything written to the disruption control document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideEffects {
    pub zones: Vec<SpeedControlZone>,
    pub closures: Vec<ClosureRule>,
    pub skipped: Vec<SkippedDisruption>,
}

/// Derive zones and closures for every disruption, in authoring order.
///
/// Unresolvable routes are skipped with a warning; the remaining disruptions
/// are still processed.
pub fn generate_side_effects(
    events: &[DisruptionEvent],
    routes: &RouteTable,
    settings: &DisruptionSettings,
) -> SideEffects {
    let mut out = SideEffects::default();

    for (index, event) in events.iter().enumerate() {
        let site = match settings.resolve_site(routes, &event.route_id) {
            Ok(site) => site,
            Err(reason) => {
                warn!(
                    index,
                    route = %event.route_id,
                    %reason,
                    "skipping disruption control artifacts"
                );
                out.skipped.push(SkippedDisruption {
                    index,
                    route_id: event.route_id.clone(),
                    reason,
                });
                continue;
            }
        };

        out.zones.push(SpeedControlZone {
            id: format!("disruption_vss_{index}"),
            segment_id: site.segment_id.clone(),
            lane_id: site.lane_id.clone(),
            steps: [
                SpeedStep {
                    time: 0.0,
                    speed: settings.baseline_speed,
                },
                SpeedStep {
                    time: event.disruption_start,
                    speed: 0.0,
                },
                SpeedStep {
                    time: event.disruption_end,
                    speed: settings.baseline_speed,
                },
            ],
        });

        out.closures.push(ClosureRule {
            id: format!("disruption_rerouter_{index}"),
            segment_id: site.segment_id,
            lane_id: site.lane_id,
            begin: event.disruption_start,
            end: event.disruption_end,
            allow: settings.closure_allow.clone(),
        });
    }

    out
}
