//! Run summary and tabular exports of a generated timeline.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::document::create_output_file;
use crate::error::Result;
use crate::timeline::{DepartureKind, Timeline};

/// Vehicle counts split by departure source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub background: usize,
    pub priority: usize,
    pub disruption: usize,
}

impl KindCounts {
    fn add(&mut self, kind: DepartureKind) {
        match kind {
            DepartureKind::Background => self.background += 1,
            DepartureKind::Priority => self.priority += 1,
            DepartureKind::Disruption => self.disruption += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.background + self.priority + self.disruption
    }
}

/// Aggregated view of one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub totals: KindCounts,
    pub per_route: BTreeMap<String, KindCounts>,
    pub earliest_departure: Option<f64>,
    pub latest_departure: Option<f64>,
    pub zones: usize,
    pub closures: usize,
    pub skipped_disruptions: usize,
    pub weights_renormalized: bool,
}

impl GenerationSummary {
    pub fn from_timeline(timeline: &Timeline) -> Self {
        let mut totals = KindCounts::default();
        let mut per_route: BTreeMap<String, KindCounts> = BTreeMap::new();
        for record in timeline.records() {
            totals.add(record.kind);
            per_route
                .entry(record.route_id.clone())
                .or_default()
                .add(record.kind);
        }

        Self {
            totals,
            per_route,
            earliest_departure: timeline.first_departure(),
            latest_departure: timeline.last_departure(),
            zones: 0,
            closures: 0,
            skipped_disruptions: 0,
            weights_renormalized: false,
        }
    }

    /// Time between the first and the last departure.
    pub fn span(&self) -> Option<f64> {
        Some(self.latest_departure? - self.earliest_departure?)
    }

    /// Share of background vehicles that took `route_id`.
    pub fn background_share(&self, route_id: &str) -> f64 {
        if self.totals.background == 0 {
            return 0.0;
        }
        let count = self.per_route.get(route_id).map_or(0, |c| c.background);
        count as f64 / self.totals.background as f64
    }

    pub fn log(&self) {
        for (route, counts) in &self.per_route {
            info!(
                route = %route,
                background = counts.background,
                share = %format!("{:.1}%", self.background_share(route) * 100.0),
                priority = counts.priority,
                disruption = counts.disruption,
                "route distribution"
            );
        }
        info!(
            total = self.totals.total(),
            background = self.totals.background,
            priority = self.totals.priority,
            disruption = self.totals.disruption,
            earliest = ?self.earliest_departure,
            latest = ?self.latest_departure,
            span = ?self.span(),
            zones = self.zones,
            closures = self.closures,
            skipped_disruptions = self.skipped_disruptions,
            "scenario generated"
        );
    }

    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = create_output_file(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct TimelineRow<'a> {
    sequence_id: usize,
    kind: DepartureKind,
    entity_type: &'a str,
    route_id: &'a str,
    depart_time: f64,
    color: String,
    stop_lane: Option<&'a str>,
    stop_until: Option<f64>,
}

/// Write one CSV row per departure, in sequence order.
pub fn export_timeline_csv(timeline: &Timeline, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(create_output_file(path)?);
    for record in timeline.records() {
        writer.serialize(TimelineRow {
            sequence_id: record.sequence_id,
            kind: record.kind,
            entity_type: &record.entity_type,
            route_id: &record.route_id,
            depart_time: record.depart_time,
            color: record.color.to_string(),
            stop_lane: record.stop.as_ref().map(|s| s.lane_id.as_str()),
            stop_until: record.stop.as_ref().map(|s| s.until),
        })?;
    }
    writer.flush()?;
    Ok(())
}
