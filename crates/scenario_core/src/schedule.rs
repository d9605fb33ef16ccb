//! Scheduled-event queues: pre-authored priority and disruption spawns.
//!
//! Each queue is sorted once by spawn time and consumed front to back through
//! a monotonic cursor; nothing is removed or reordered after construction.

use serde::{Deserialize, Serialize};

/// Anything with a fixed spawn time that the merger can fire.
pub trait ScheduledEvent {
    fn spawn_time(&self) -> f64;
    fn route_id(&self) -> &str;
    fn entity_type(&self) -> &str;
}

/// One-off priority vehicle departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityEvent {
    pub spawn_time: f64,
    pub route_id: String,
    pub entity_type: String,
}

impl PriorityEvent {
    pub fn new(
        spawn_time: f64,
        route_id: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            spawn_time,
            route_id: route_id.into(),
            entity_type: entity_type.into(),
        }
    }
}

impl ScheduledEvent for PriorityEvent {
    fn spawn_time(&self) -> f64 {
        self.spawn_time
    }
    fn route_id(&self) -> &str {
        &self.route_id
    }
    fn entity_type(&self) -> &str {
        &self.entity_type
    }
}

/// Disruption vehicle that stalls on its first segment during `[disruption_start, disruption_end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisruptionEvent {
    pub spawn_time: f64,
    pub route_id: String,
    pub entity_type: String,
    pub disruption_start: f64,
    pub disruption_end: f64,
}

impl DisruptionEvent {
    pub fn new(
        spawn_time: f64,
        route_id: impl Into<String>,
        entity_type: impl Into<String>,
        disruption_start: f64,
        disruption_end: f64,
    ) -> Self {
        Self {
            spawn_time,
            route_id: route_id.into(),
            entity_type: entity_type.into(),
            disruption_start,
            disruption_end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.disruption_end - self.disruption_start
    }
}

impl ScheduledEvent for DisruptionEvent {
    fn spawn_time(&self) -> f64 {
        self.spawn_time
    }
    fn route_id(&self) -> &str {
        &self.route_id
    }
    fn entity_type(&self) -> &str {
        &self.entity_type
    }
}

/// Time-ordered queue with a read cursor.
///
/// Each entry keeps its authoring index so downstream artifacts can be named
/// consistently regardless of firing order.
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    events: Vec<(usize, E)>,
    cursor: usize,
}

impl<E: ScheduledEvent + Clone> EventQueue<E> {
    /// Stable sort by spawn time; equal times keep authoring order.
    pub fn new(authored: &[E]) -> Self {
        let mut events: Vec<(usize, E)> = authored.iter().cloned().enumerate().collect();
        events.sort_by(|a, b| a.1.spawn_time().total_cmp(&b.1.spawn_time()));
        Self { events, cursor: 0 }
    }

    /// Head of the queue if its spawn time has been reached by `now`.
    pub fn peek_due(&self, now: f64) -> Option<&(usize, E)> {
        self.peek().filter(|(_, e)| now >= e.spawn_time())
    }

    pub fn peek(&self) -> Option<&(usize, E)> {
        self.events.get(self.cursor)
    }

    /// Consume the head. Returns `None` when the queue is exhausted.
    pub fn advance(&mut self) -> Option<(usize, E)> {
        let entry = self.events.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(entry)
    }

    /// Whether any pending event spawns within `window` seconds of `t`.
    pub fn has_pending_near(&self, t: f64, window: f64) -> bool {
        let pending = &self.events[self.cursor..];
        // Candidates are bracketed with a doubled window, then checked exactly.
        let start = pending.partition_point(|(_, e)| e.spawn_time() <= t - 2.0 * window);
        pending[start..]
            .iter()
            .take_while(|(_, e)| e.spawn_time() < t + 2.0 * window)
            .any(|(_, e)| (t - e.spawn_time()).abs() < window)
    }

    /// Consume every remaining event regardless of spawn time.
    pub fn drain_remaining(&mut self) -> Vec<(usize, E)> {
        let rest = self.events[self.cursor..].to_vec();
        self.cursor = self.events.len();
        rest
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }
}
