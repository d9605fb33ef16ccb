//! Scenario setup: configuration and the single generation pass that turns it
//! into a departure timeline plus disruption side effects.

mod build;
mod config;

pub use build::{generate, Scenario};
pub use config::ScenarioConfig;
