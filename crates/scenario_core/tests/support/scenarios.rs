use scenario_core::schedule::{DisruptionEvent, PriorityEvent};
use scenario_core::ScenarioConfig;

/// 100 background vehicles, one emergency at t=30 on `ntos` and one accident at
/// t=40 on `ston` blocking `[45, 75]`.
pub fn single_incident_config(seed: u64) -> ScenarioConfig {
    ScenarioConfig::default()
        .with_seed(seed)
        .with_background_count(100)
        .with_priority_events(vec![PriorityEvent::new(30.0, "ntos", "emergency")])
        .with_disruption_events(vec![DisruptionEvent::new(
            40.0, "ston", "accident", 45.0, 75.0,
        )])
}

/// Several scheduled events, including two sharing a spawn time and one beyond
/// the natural end of background demand.
pub fn busy_config(seed: u64, background_count: usize) -> ScenarioConfig {
    ScenarioConfig::default()
        .with_seed(seed)
        .with_background_count(background_count)
        .with_priority_events(vec![
            PriorityEvent::new(90.0, "wtoe", "emergency"),
            PriorityEvent::new(30.0, "ntos", "emergency"),
            PriorityEvent::new(60.0, "ston", "emergency"),
            PriorityEvent::new(60.0, "etow", "emergency"),
            PriorityEvent::new(10_000.0, "eton", "emergency"),
        ])
        .with_disruption_events(vec![
            DisruptionEvent::new(80.0, "wtoe", "accident", 85.0, 115.0),
            DisruptionEvent::new(40.0, "ston", "accident", 45.0, 75.0),
            DisruptionEvent::new(60.0, "ntoe", "accident", 62.0, 70.0),
        ])
}
