mod support;

use scenario_core::generate;
use scenario_core::timeline::{DepartureKind, DepartureRecord};
use support::scenarios::busy_config;

const SEEDS: std::ops::Range<u64> = 0..25;

fn indices(records: &[DepartureRecord], kind: DepartureKind) -> Vec<usize> {
    let mut out: Vec<usize> = records
        .iter()
        .filter(|r| r.kind == kind)
        .map(|r| r.source_index.expect("scheduled record has a source index"))
        .collect();
    out.sort_unstable();
    out
}

#[test]
fn timeline_is_sorted_and_ids_are_ranks() {
    for seed in SEEDS {
        let scenario = generate(&busy_config(seed, 200)).expect("generate");
        let records = scenario.timeline.records();
        for (rank, record) in records.iter().enumerate() {
            assert_eq!(record.sequence_id, rank, "seed {seed}");
        }
        assert!(
            records.windows(2).all(|w| w[0].depart_time <= w[1].depart_time),
            "seed {seed}: timeline not sorted"
        );
    }
}

#[test]
fn every_scheduled_event_appears_exactly_once() {
    for background_count in [0, 5, 200] {
        for seed in SEEDS {
            let config = busy_config(seed, background_count);
            let scenario = generate(&config).expect("generate");
            let records = scenario.timeline.records();

            assert_eq!(
                indices(records, DepartureKind::Priority),
                (0..config.priority_events.len()).collect::<Vec<_>>()
            );
            assert_eq!(
                indices(records, DepartureKind::Disruption),
                (0..config.disruption_events.len()).collect::<Vec<_>>()
            );
            assert_eq!(
                records.len(),
                background_count + config.priority_events.len() + config.disruption_events.len()
            );
        }
    }
}

#[test]
fn background_count_matches_target() {
    for background_count in [0, 1, 37, 500] {
        let scenario = generate(&busy_config(3, background_count)).expect("generate");
        assert_eq!(
            scenario.timeline.of_kind(DepartureKind::Background).count(),
            background_count
        );
        assert_eq!(scenario.summary.totals.background, background_count);
    }
}

#[test]
fn scheduled_records_depart_at_their_spawn_time() {
    let config = busy_config(11, 200);
    let scenario = generate(&config).expect("generate");
    for record in scenario.timeline.of_kind(DepartureKind::Priority) {
        let event = &config.priority_events[record.source_index.unwrap()];
        assert_eq!(record.depart_time, event.spawn_time);
        assert_eq!(record.route_id, event.route_id);
    }
    for record in scenario.timeline.of_kind(DepartureKind::Disruption) {
        let event = &config.disruption_events[record.source_index.unwrap()];
        assert_eq!(record.depart_time, event.spawn_time);
        assert_eq!(record.route_id, event.route_id);
    }
}

#[test]
fn background_departures_keep_clear_of_scheduled_ones() {
    for seed in SEEDS {
        let scenario = generate(&busy_config(seed, 200)).expect("generate");
        let records = scenario.timeline.records();
        let scheduled: Vec<f64> = records
            .iter()
            .filter(|r| r.kind != DepartureKind::Background)
            .map(|r| r.depart_time)
            .collect();
        for record in records.iter().filter(|r| r.kind == DepartureKind::Background) {
            for t in &scheduled {
                assert!(
                    (record.depart_time - t).abs() >= 0.1 - 1e-9,
                    "seed {seed}: background at {} too close to scheduled at {t}",
                    record.depart_time
                );
            }
        }
    }
}

#[test]
fn scheduled_events_may_share_a_timestamp() {
    let scenario = generate(&busy_config(5, 200)).expect("generate");
    let at_sixty = scenario
        .timeline
        .records()
        .iter()
        .filter(|r| r.kind != DepartureKind::Background && r.depart_time == 60.0)
        .count();
    // Two emergencies and one accident are all authored at t=60.
    assert_eq!(at_sixty, 3);
}

#[test]
fn background_colors_avoid_reserved_bands() {
    for seed in SEEDS {
        let scenario = generate(&busy_config(seed, 400)).expect("generate");
        for record in scenario.timeline.of_kind(DepartureKind::Background) {
            assert!(!record.color.is_reserved(), "seed {seed}: {}", record.color);
        }
    }
}

#[test]
fn background_gaps_respect_floor() {
    let config = busy_config(8, 300)
        .with_priority_events(Vec::new())
        .with_disruption_events(Vec::new());
    let scenario = generate(&config).expect("generate");
    let times: Vec<f64> = scenario
        .timeline
        .records()
        .iter()
        .map(|r| r.depart_time)
        .collect();
    assert!(times[0] >= 0.1);
    assert!(times.windows(2).all(|w| w[1] - w[0] >= 0.1 - 1e-9));
}
