//! Scenario generation for a microscopic road-traffic simulator.
//!
//! Produces two documents from one pass:
//!
//! - a vehicle demand document: vehicle types, routes and a time-ordered list
//!   of departures merging background traffic with scheduled priority and
//!   disruption vehicles;
//! - a disruption control document: one variable speed sign and one lane
//!   closure per disruption, bound to the same lane as the stalled vehicle's stop.
//!
//! ```no_run
//! use scenario_core::{generate, ScenarioConfig};
//!
//! let scenario = generate(&ScenarioConfig::default().with_seed(7)).unwrap();
//! scenario
//!     .write_documents("generated_vehicles.rou.xml", "accident_config.add.xml")
//!     .unwrap();
//! ```

pub mod catalog;
pub mod color;
pub mod disruption;
pub mod distributions;
pub mod document;
pub mod error;
pub mod routes;
pub mod sampler;
pub mod scenario;
pub mod schedule;
pub mod summary;
pub mod timeline;

pub use error::{Result, ScenarioError};
pub use scenario::{generate, Scenario, ScenarioConfig};
