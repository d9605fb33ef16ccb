mod support;

use std::iter::once;

use scenario_core::generate;
use scenario_core::routes::{Route, RouteError, RouteTable};
use scenario_core::schedule::DisruptionEvent;
use scenario_core::timeline::DepartureKind;
use support::scenarios::{busy_config, single_incident_config};
use support::xml::{attribute_values, count_elements, single_time};

#[test]
fn every_stop_has_a_zone_and_closure_on_the_same_lane() {
    let config = busy_config(21, 150);
    let scenario = generate(&config).expect("generate");
    let effects = &scenario.side_effects;

    assert_eq!(effects.zones.len(), config.disruption_events.len());
    assert_eq!(effects.closures.len(), config.disruption_events.len());

    for record in scenario.timeline.of_kind(DepartureKind::Disruption) {
        let index = record.source_index.expect("source index");
        let event = &config.disruption_events[index];
        let stop = record.stop.as_ref().expect("resolved disruption has a stop");

        let zone = &effects.zones[index];
        let closure = &effects.closures[index];
        assert_eq!(zone.id, format!("disruption_vss_{index}"));
        assert_eq!(zone.lane_id, stop.lane_id);
        assert_eq!(closure.lane_id, stop.lane_id);
        assert_eq!(zone.steps[1].time, event.disruption_start);
        assert_eq!(zone.steps[2].time, event.disruption_end);
        assert_eq!((closure.begin, closure.end), (event.disruption_start, event.disruption_end));
        assert_eq!(stop.until, event.disruption_end);
        assert_eq!(stop.duration, event.disruption_end - event.disruption_start);
    }
}

#[test]
fn unknown_route_keeps_vehicle_but_drops_its_controls() {
    let config = single_incident_config(4).with_disruption_events(vec![
        DisruptionEvent::new(40.0, "ston", "accident", 45.0, 75.0),
        DisruptionEvent::new(50.0, "wtos", "accident", 55.0, 65.0),
    ]);
    let scenario = generate(&config).expect("generate");

    assert_eq!(scenario.timeline.len(), 103);
    let orphan = scenario
        .timeline
        .of_kind(DepartureKind::Disruption)
        .find(|r| r.route_id == "wtos")
        .expect("vehicle for unresolved disruption");
    assert!(orphan.stop.is_none());

    let effects = &scenario.side_effects;
    assert_eq!(effects.zones.len(), 1);
    assert_eq!(effects.closures.len(), 1);
    assert_eq!(effects.skipped.len(), 1);
    assert_eq!(effects.skipped[0].index, 1);
    assert_eq!(effects.skipped[0].reason, RouteError::UnknownRoute("wtos".into()));
    assert_eq!(scenario.summary.skipped_disruptions, 1);

    let control = scenario.control_xml().expect("render control document");
    assert_eq!(count_elements(&control, "variableSpeedSign"), 1);
    let demand = scenario.demand_xml().expect("render demand document");
    assert_eq!(count_elements(&demand, "stop"), 1);
}

#[test]
fn empty_route_is_skipped_like_an_unknown_one() {
    let routes = RouteTable::new(
        RouteTable::default()
            .iter()
            .cloned()
            .chain(once(Route::new("stub", &[])))
            .collect(),
    );
    let config = single_incident_config(9)
        .with_routes(routes)
        .with_disruption_events(vec![DisruptionEvent::new(40.0, "stub", "accident", 45.0, 75.0)]);
    let scenario = generate(&config).expect("generate");

    assert!(scenario.side_effects.zones.is_empty());
    assert_eq!(
        scenario.side_effects.skipped[0].reason,
        RouteError::EmptyRoute("stub".into())
    );
    assert_eq!(scenario.timeline.of_kind(DepartureKind::Disruption).count(), 1);
}

#[test]
fn side_effects_follow_authoring_order() {
    let config = busy_config(2, 50);
    let scenario = generate(&config).expect("generate");
    let segments: Vec<&str> = scenario
        .side_effects
        .zones
        .iter()
        .map(|z| z.segment_id.as_str())
        .collect();
    // wtoe, ston, ntoe as authored, not sorted by spawn time.
    assert_eq!(segments, vec!["-E2", "-E1", "-E3"]);
}

#[test]
fn both_documents_name_the_same_window() {
    let config = single_incident_config(5).with_disruption_events(vec![DisruptionEvent::new(
        4.0, "ston", "accident", 45.004, 75.004,
    )]);
    let scenario = generate(&config).expect("generate");
    let demand = scenario.demand_xml().expect("render demand document");
    let control = scenario.control_xml().expect("render control document");

    let until = single_time(&demand, "stop", "until");
    let begin = single_time(&control, "interval", "begin");
    let end = single_time(&control, "interval", "end");
    let steps: Vec<f64> = attribute_values(&control, "step", "time")
        .iter()
        .map(|v| v.parse().expect("numeric step time"))
        .collect();

    assert_eq!(until, 75.004);
    assert_eq!(end, until);
    assert_eq!(begin, 45.004);
    assert_eq!(steps, vec![0.0, begin, end]);
    assert_eq!(single_time(&demand, "stop", "duration"), 30.0);

    let stop_lane = attribute_values(&demand, "stop", "lane");
    assert_eq!(stop_lane, vec!["-E1_1"]);
    assert_eq!(attribute_values(&control, "variableSpeedSign", "lanes"), stop_lane);
    assert_eq!(attribute_values(&control, "closingLaneReroute", "id"), stop_lane);
    assert_eq!(attribute_values(&control, "rerouter", "edges"), vec!["-E1"]);
}
