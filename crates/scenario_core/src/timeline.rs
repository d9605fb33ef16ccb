//! Timeline merger: interleaves background demand with scheduled priority and
//! disruption spawns into one chronologically ordered departure list.
//!
//! The merger is an explicit state machine. Each [`MergerState::step`] fires
//! exactly one of, in strict priority order:
//!
//! 1. the head of the priority queue, if due (`clock >= spawn_time`);
//! 2. the head of the disruption queue, if due;
//! 3. one background draw, advancing the clock by the sampled gap.
//!
//! Once the background target is reached, all scheduled events that are still
//! pending are flushed without the due check. A final stable sort by departure
//! time assigns the sequence ids.

use rand::RngCore;
use serde::Serialize;
use tracing::{debug, warn};

use crate::color::Color;
use crate::disruption::{DisruptionSettings, StopDescriptor};
use crate::routes::RouteTable;
use crate::sampler::DemandSampler;
use crate::schedule::{DisruptionEvent, EventQueue, PriorityEvent};

/// Background departures closer than this to a pending scheduled spawn are pushed back.
pub const DEFAULT_REPEL_WINDOW_SECS: f64 = 0.1;
/// Amount added per repel iteration.
pub const DEFAULT_REPEL_OFFSET_SECS: f64 = 0.2;

/// Which source produced a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureKind {
    Background,
    Priority,
    Disruption,
}

/// One vehicle departure in the demand document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureRecord {
    /// Zero-based rank by departure time; only final after [`MergerState::finish`].
    pub sequence_id: usize,
    pub kind: DepartureKind,
    /// Authoring index of the scheduled event this record came from.
    pub source_index: Option<usize>,
    pub entity_type: String,
    pub route_id: String,
    pub depart_time: f64,
    pub color: Color,
    pub stop: Option<StopDescriptor>,
}

/// Tuning for the merge loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeParams {
    /// Target number of background vehicles (N).
    pub background_count: usize,
    pub repel_window_secs: f64,
    pub repel_offset_secs: f64,
}

impl MergeParams {
    pub fn new(background_count: usize) -> Self {
        Self {
            background_count,
            repel_window_secs: DEFAULT_REPEL_WINDOW_SECS,
            repel_offset_secs: DEFAULT_REPEL_OFFSET_SECS,
        }
    }
}

/// Read-only inputs shared by every merge step.
#[derive(Debug)]
pub struct MergeContext<'a> {
    pub params: MergeParams,
    pub sampler: &'a DemandSampler,
    pub routes: &'a RouteTable,
    pub disruption: &'a DisruptionSettings,
    /// Entity type assigned to background vehicles.
    pub background_type: &'a str,
}

/// Outcome of a single merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Scheduled(DepartureKind),
    Background,
    Finished,
}

/// Mutable state of one merge run.
#[derive(Debug)]
pub struct MergerState {
    clock: f64,
    priority: EventQueue<PriorityEvent>,
    disruption: EventQueue<DisruptionEvent>,
    background_emitted: usize,
    records: Vec<DepartureRecord>,
    finished: bool,
}

impl MergerState {
    pub fn new(priority: &[PriorityEvent], disruption: &[DisruptionEvent]) -> Self {
        let capacity = priority.len() + disruption.len();
        Self {
            clock: 0.0,
            priority: EventQueue::new(priority),
            disruption: EventQueue::new(disruption),
            background_emitted: 0,
            records: Vec::with_capacity(capacity),
            finished: false,
        }
    }

    pub fn emitted(&self) -> usize {
        self.records.len()
    }

    pub fn step(&mut self, ctx: &MergeContext<'_>, rng: &mut dyn RngCore) -> Step {
        if self.finished {
            return Step::Finished;
        }

        if self.background_emitted >= ctx.params.background_count {
            self.flush_scheduled(ctx);
            self.finished = true;
            return Step::Finished;
        }

        if let Some((index, event)) = self.priority.peek_due(self.clock).cloned() {
            self.priority.advance();
            self.fire_priority(index, event);
            return Step::Scheduled(DepartureKind::Priority);
        }

        if let Some((index, event)) = self.disruption.peek_due(self.clock).cloned() {
            self.disruption.advance();
            self.fire_disruption(ctx, index, event);
            return Step::Scheduled(DepartureKind::Disruption);
        }

        self.fire_background(ctx, rng);
        Step::Background
    }

    /// Stable sort by departure time and assign sequence ids.
    pub fn finish(self) -> Timeline {
        let mut records = self.records;
        records.sort_by(|a, b| a.depart_time.total_cmp(&b.depart_time));
        for (rank, record) in records.iter_mut().enumerate() {
            record.sequence_id = rank;
        }
        Timeline {
            records,
            background_count: self.background_emitted,
        }
    }

    fn fire_priority(&mut self, index: usize, event: PriorityEvent) {
        debug!(
            index,
            spawn_time = event.spawn_time,
            route = %event.route_id,
            "priority vehicle scheduled"
        );
        self.clock = self.clock.max(event.spawn_time);
        self.records.push(DepartureRecord {
            sequence_id: self.records.len(),
            kind: DepartureKind::Priority,
            source_index: Some(index),
            entity_type: event.entity_type,
            route_id: event.route_id,
            depart_time: event.spawn_time,
            color: Color::PRIORITY_RED,
            stop: None,
        });
    }

    fn fire_disruption(&mut self, ctx: &MergeContext<'_>, index: usize, event: DisruptionEvent) {
        let stop = match ctx.disruption.resolve_site(ctx.routes, &event.route_id) {
            Ok(site) => Some(ctx.disruption.stop_for(&site, &event)),
            Err(reason) => {
                warn!(
                    index,
                    route = %event.route_id,
                    %reason,
                    "disruption vehicle emitted without stop"
                );
                None
            }
        };
        debug!(
            index,
            spawn_time = event.spawn_time,
            route = %event.route_id,
            start = event.disruption_start,
            end = event.disruption_end,
            "disruption vehicle scheduled"
        );
        self.clock = self.clock.max(event.spawn_time);
        self.records.push(DepartureRecord {
            sequence_id: self.records.len(),
            kind: DepartureKind::Disruption,
            source_index: Some(index),
            entity_type: event.entity_type,
            route_id: event.route_id,
            depart_time: event.spawn_time,
            color: Color::DISRUPTION_ORANGE,
            stop,
        });
    }

    fn fire_background(&mut self, ctx: &MergeContext<'_>, rng: &mut dyn RngCore) {
        let draw = ctx.sampler.draw(rng);
        self.clock += draw.gap_secs;
        self.repel(&ctx.params);

        self.records.push(DepartureRecord {
            sequence_id: self.records.len(),
            kind: DepartureKind::Background,
            source_index: None,
            entity_type: ctx.background_type.to_string(),
            route_id: draw.route_id,
            depart_time: self.clock,
            color: draw.color,
            stop: None,
        });
        self.background_emitted += 1;
    }

    /// Push the clock away from every pending scheduled spawn within the window.
    fn repel(&mut self, params: &MergeParams) {
        let window = params.repel_window_secs;
        while self.priority.has_pending_near(self.clock, window)
            || self.disruption.has_pending_near(self.clock, window)
        {
            self.clock += params.repel_offset_secs;
        }
    }

    fn flush_scheduled(&mut self, ctx: &MergeContext<'_>) {
        for (index, event) in self.priority.drain_remaining() {
            self.fire_priority(index, event);
        }
        for (index, event) in self.disruption.drain_remaining() {
            self.fire_disruption(ctx, index, event);
        }
    }
}

/// Final, time-sorted departure list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    records: Vec<DepartureRecord>,
    background_count: usize,
}

impl Timeline {
    pub fn records(&self) -> &[DepartureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn background_count(&self) -> usize {
        self.background_count
    }

    pub fn of_kind(&self, kind: DepartureKind) -> impl Iterator<Item = &DepartureRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn first_departure(&self) -> Option<f64> {
        self.records.first().map(|r| r.depart_time)
    }

    pub fn last_departure(&self) -> Option<f64> {
        self.records.last().map(|r| r.depart_time)
    }
}

/// Run the merge loop to completion.
pub fn merge_timeline(
    ctx: &MergeContext<'_>,
    priority: &[PriorityEvent],
    disruption: &[DisruptionEvent],
    rng: &mut dyn RngCore,
) -> Timeline {
    let mut state = MergerState::new(priority, disruption);
    let max_steps = ctx.params.background_count + priority.len() + disruption.len() + 1;
    let mut steps = 0;
    while state.step(ctx, rng) != Step::Finished {
        steps += 1;
        debug_assert!(steps <= max_steps, "merge loop exceeded {max_steps} steps");
    }
    state.finish()
}
