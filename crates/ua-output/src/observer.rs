//! `TraceObserver<W>`: bridges `AgentObserver` to a `TraceWriter`.

use ua_agent::{AgentObserver, DecisionResult};
use ua_behavior::Decision;
use ua_core::AgentId;

use crate::row::{DecisionRow, EventKind, EventRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// An [`AgentObserver`] that writes every decision cycle and lifecycle event
/// to any [`TraceWriter`] backend.
///
/// Errors from the writer are stored internally because `AgentObserver`
/// methods have no return value.  After stepping, check for errors with
/// [`take_error`][Self::take_error] or call [`finish`][Self::finish].
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    /// Timestamp of the current world step.
    time:       f64,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, time: 0.0, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer, reporting the first stored error if any.
    pub fn finish(&mut self) -> OutputResult<()> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.finish()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn event(&mut self, agent: AgentId, kind: EventKind, decision: Option<&Decision>) {
        let row = EventRow::new(self.time, agent, kind, decision);
        let result = self.writer.write_event(&row);
        self.store_err(result);
    }
}

impl<W: TraceWriter> AgentObserver for TraceObserver<W> {
    fn on_step_start(&mut self, time: f64) {
        self.time = time;
    }

    fn on_decisions(&mut self, agent: AgentId, results: &[DecisionResult]) {
        let rows: Vec<DecisionRow> = results
            .iter()
            .map(|r| DecisionRow::from_result(self.time, agent, r))
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_decisions(&rows);
            self.store_err(result);
        }
    }

    fn on_enact(&mut self, agent: AgentId, decision: &Decision) {
        self.event(agent, EventKind::Enact, Some(decision));
    }

    fn on_no_decision(&mut self, agent: AgentId) {
        self.event(agent, EventKind::NoDecision, None);
    }

    fn on_interrupt(&mut self, agent: AgentId, decision: &Decision) {
        self.event(agent, EventKind::Interrupt, Some(decision));
    }

    fn on_action_concluded(&mut self, agent: AgentId, decision: &Decision) {
        self.event(agent, EventKind::Concluded, Some(decision));
    }
}
