//! Analytics sinks.
//!
//! RULE: Every analytics destination implements AnalyticsSink.
//! A session hands each event to its sink once; a failed delivery is
//! logged and dropped, never retried and never surfaced to the spin.

use std::any::Any;

use crate::{error::WheelResult, event::WheelEvent};

pub trait AnalyticsSink: Send {
    /// Stable name for log lines.
    fn name(&self) -> &'static str;

    /// Deliver one event.
    ///
    /// - `session_id`: the emitting session
    /// - `spin`:       spins taken in that session when the event fired
    fn record(&mut self, session_id: &str, spin: u64, event: &WheelEvent) -> WheelResult<()>;

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}

/// Writes each event to the `log` facade at info level.
#[derive(Debug, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn name(&self) -> &'static str { "log" }

    fn record(&mut self, session_id: &str, spin: u64, event: &WheelEvent) -> WheelResult<()> {
        let payload = serde_json::to_string(event)?;
        log::info!("[analytics] session={session_id} spin={spin} event: {} {payload}", event.type_name());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any { self }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<WheelEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[WheelEvent] {
        &self.events
    }

    pub fn count(&self, type_name: &str) -> usize {
        self.events.iter().filter(|e| e.type_name() == type_name).count()
    }
}

impl AnalyticsSink for MemorySink {
    fn name(&self) -> &'static str { "memory" }

    fn record(&mut self, _session_id: &str, _spin: u64, event: &WheelEvent) -> WheelResult<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any { self }
}
