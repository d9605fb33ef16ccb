mod support;

use scenario_core::color::Color;
use scenario_core::generate;
use scenario_core::timeline::DepartureKind;
use support::scenarios::single_incident_config;
use support::xml::{attribute_values, count_elements};

#[test]
fn single_incident_yields_one_record_per_vehicle() {
    let scenario = generate(&single_incident_config(42)).expect("generate");
    let timeline = &scenario.timeline;

    assert_eq!(timeline.len(), 103);
    assert_eq!(timeline.background_count(), 100);
    assert_eq!(timeline.of_kind(DepartureKind::Priority).count(), 1);
    assert_eq!(timeline.of_kind(DepartureKind::Disruption).count(), 1);
}

#[test]
fn scheduled_vehicles_keep_their_spawn_time_route_and_color() {
    let scenario = generate(&single_incident_config(42)).expect("generate");

    let emergency = scenario
        .timeline
        .of_kind(DepartureKind::Priority)
        .next()
        .expect("emergency record");
    assert_eq!(emergency.route_id, "ntos");
    assert_eq!(emergency.entity_type, "emergency");
    assert_eq!(emergency.depart_time, 30.0);
    assert_eq!(emergency.color, Color::PRIORITY_RED);
    assert!(emergency.stop.is_none());

    let accident = scenario
        .timeline
        .of_kind(DepartureKind::Disruption)
        .next()
        .expect("accident record");
    assert_eq!(accident.route_id, "ston");
    assert_eq!(accident.depart_time, 40.0);
    assert_eq!(accident.color, Color::DISRUPTION_ORANGE);
    let stop = accident.stop.as_ref().expect("accident stop");
    assert_eq!(stop.duration, 30.0);
    assert_eq!(stop.until, 75.0);
    assert_eq!(stop.lane_id, "-E1_1");
}

#[test]
fn control_artifacts_match_the_accident_stop() {
    let scenario = generate(&single_incident_config(42)).expect("generate");
    let effects = &scenario.side_effects;

    assert_eq!(effects.zones.len(), 1);
    assert_eq!(effects.closures.len(), 1);
    assert!(effects.skipped.is_empty());

    let zone = &effects.zones[0];
    let times: Vec<f64> = zone.steps.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![0.0, 45.0, 75.0]);
    assert_eq!(zone.steps[1].speed, 0.0);

    let closure = &effects.closures[0];
    assert_eq!((closure.begin, closure.end), (45.0, 75.0));

    let accident = scenario
        .timeline
        .of_kind(DepartureKind::Disruption)
        .next()
        .expect("accident record");
    let stop = accident.stop.as_ref().expect("accident stop");
    assert_eq!(zone.lane_id, stop.lane_id);
    assert_eq!(closure.lane_id, stop.lane_id);
    assert_eq!(zone.segment_id, closure.segment_id);
    assert_eq!(closure.segment_id, "-E1");
}

#[test]
fn demand_document_lists_vehicles_in_departure_order() {
    let scenario = generate(&single_incident_config(7)).expect("generate");
    let xml = scenario.demand_xml().expect("render demand document");

    assert_eq!(count_elements(&xml, "vType"), 3);
    assert_eq!(count_elements(&xml, "route"), 11);
    assert_eq!(count_elements(&xml, "vehicle"), 103);
    assert_eq!(count_elements(&xml, "stop"), 1);
    assert!(xml.contains(r#"<vehicle id="0" "#));
    assert!(xml.contains(r#"<vehicle id="102" "#));

    let departs: Vec<f64> = attribute_values(&xml, "vehicle", "depart")
        .into_iter()
        .map(|v| v.parse().expect("numeric depart"))
        .collect();
    assert_eq!(departs.len(), 103);
    assert!(departs.windows(2).all(|w| w[0] <= w[1]));

    assert_eq!(attribute_values(&xml, "stop", "until"), vec!["75"]);
    assert_eq!(attribute_values(&xml, "stop", "duration"), vec!["30"]);
}

#[test]
fn control_document_has_one_sign_and_one_rerouter() {
    let scenario = generate(&single_incident_config(7)).expect("generate");
    let xml = scenario.control_xml().expect("render control document");

    assert_eq!(count_elements(&xml, "variableSpeedSign"), 1);
    assert_eq!(count_elements(&xml, "step"), 3);
    assert_eq!(count_elements(&xml, "rerouter"), 1);
    assert_eq!(count_elements(&xml, "interval"), 1);
    assert_eq!(count_elements(&xml, "closingLaneReroute"), 1);
    assert_eq!(attribute_values(&xml, "step", "time"), vec!["0", "45", "75"]);
    assert_eq!(attribute_values(&xml, "interval", "begin"), vec!["45"]);
    assert_eq!(attribute_values(&xml, "interval", "end"), vec!["75"]);
}
