use crate::debugger::breakpoint::{Breakpoint, BreakpointActor, BreakpointManager};
use crate::debugger::execution::{Debuggee, ExecutionTrace};
use crate::debugger::pause::{Location, PauseEvent, PauseReason, ThreadEvent};
use crate::logging;
use crate::source::{classify, LineTable, Source, SourceActor, SourceRegistry};
use crate::{DebugResult, DebuggerError};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{debug, info};

/// Where the debuggee thread is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThreadState {
    /// Attached, nothing executed yet.
    Attached,
    Paused,
    Exited,
}

/// Result of a `resume` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Paused(PauseEvent),
    Exited,
}

/// Core debugging engine for one session.
///
/// Owns the sources, the breakpoint tables and the debuggee. Notifications go
/// out on a single channel whose receiver can be taken exactly once.
pub struct DebuggerEngine {
    sources: SourceRegistry,
    breakpoints: BreakpointManager,
    debuggee: Box<dyn Debuggee + Send>,
    state: ThreadState,
    current: Option<Location>,
    pause_on_debugger: bool,
    pause_count: u64,
    events_tx: Sender<ThreadEvent>,
    events_rx: Option<Receiver<ThreadEvent>>,
}

impl DebuggerEngine {
    /// Create an engine with an empty trace; scripts append to it as they load.
    pub fn new() -> Self {
        Self::with_debuggee(Box::new(ExecutionTrace::default()))
    }

    pub fn with_debuggee(debuggee: Box<dyn Debuggee + Send>) -> Self {
        let (events_tx, events_rx) = channel();
        Self {
            sources: SourceRegistry::new(),
            breakpoints: BreakpointManager::new(),
            debuggee,
            state: ThreadState::Attached,
            current: None,
            pause_on_debugger: true,
            pause_count: 0,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Hand out the receiving end of the notification channel.
    pub fn take_events(&mut self) -> DebugResult<Receiver<ThreadEvent>> {
        self.events_rx.take().ok_or_else(|| {
            DebuggerError::InvalidState("event subscriber already attached".to_string())
        })
    }

    /// Whether `debugger` statements pause the thread.
    pub fn set_pause_on_debugger(&mut self, enabled: bool) {
        self.pause_on_debugger = enabled;
    }

    /// Replace the debuggee. Only allowed before the first resume.
    pub fn set_debuggee(&mut self, debuggee: Box<dyn Debuggee + Send>) -> DebugResult<()> {
        if self.state != ThreadState::Attached {
            return Err(DebuggerError::InvalidState(
                "debuggee can only be replaced before execution starts".to_string(),
            ));
        }
        self.debuggee = debuggee;
        Ok(())
    }

    /// Register a source and announce it to the subscriber.
    pub fn add_source(&mut self, url: &str, lines: LineTable) -> SourceActor {
        let actor = self.sources.register(url, lines);
        logging::log_new_source(&actor.to_string(), url);
        self.emit(ThreadEvent::NewSource {
            actor,
            url: url.to_string(),
        });
        actor
    }

    /// Register script text and queue a top-to-bottom run of it after any
    /// steps the debuggee still has pending.
    pub fn load_script(&mut self, url: &str, text: &str) -> SourceActor {
        let debugger_lines = classify::debugger_statement_lines(text);
        self.load_script_with_debugger_lines(url, text, &debugger_lines)
    }

    /// Like [`load_script`](Self::load_script), with the `debugger`
    /// statement lines supplied by the caller instead of detected.
    pub fn load_script_with_debugger_lines(
        &mut self,
        url: &str,
        text: &str,
        debugger_lines: &[u32],
    ) -> SourceActor {
        let actor = self.add_source(url, LineTable::from_source_text(text));
        if let Ok(source) = self.sources.get(actor) {
            let trace = ExecutionTrace::linear(source, debugger_lines);
            self.queue_trace(trace);
        }
        actor
    }

    /// Append steps to the debuggee. New code reopens an exited thread.
    fn queue_trace(&mut self, trace: ExecutionTrace) {
        let mut pending = std::mem::replace(&mut self.debuggee, Box::new(ExecutionTrace::default()));
        let mut combined = ExecutionTrace::default();
        while let Some(step) = pending.next_step() {
            combined.push(step);
        }
        combined.extend(trace);
        debug!(steps = combined.remaining(), "Execution queued");

        if self.state == ThreadState::Exited && combined.remaining() > 0 {
            info!("Thread reattached for newly loaded code");
            self.state = ThreadState::Attached;
        }
        self.debuggee = Box::new(combined);
    }

    pub fn source(&self, actor: SourceActor) -> DebugResult<&Source> {
        self.sources.get(actor)
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    /// Tear down a source together with its breakpoints.
    pub fn remove_source(&mut self, actor: SourceActor) -> DebugResult<usize> {
        self.sources.remove(actor)?;
        let dropped = self.breakpoints.remove_source(actor);
        info!(source = %actor, breakpoints = dropped, "Source removed");
        Ok(dropped)
    }

    /// Place a breakpoint, resolving the line against the source's table.
    pub fn set_breakpoint(&mut self, source: SourceActor, line: u32) -> DebugResult<Breakpoint> {
        let source = self.sources.get(source)?;
        self.breakpoints.place(source, line)
    }

    /// Remove a breakpoint. Idempotent; returns whether it was still live.
    pub fn remove_breakpoint(&mut self, actor: BreakpointActor) -> bool {
        self.breakpoints.remove(actor)
    }

    pub fn breakpoints(&self) -> &BreakpointManager {
        &self.breakpoints
    }

    /// Run until the next pause or the end of the program.
    ///
    /// The step a previous pause stopped at has already been consumed, so
    /// resuming never reports the same location twice in a row.
    pub fn resume(&mut self) -> DebugResult<RunOutcome> {
        if self.state == ThreadState::Exited {
            return Err(DebuggerError::InvalidState(
                "thread has already exited".to_string(),
            ));
        }
        debug!(from = ?self.current, "Resuming execution");

        while let Some(step) = self.debuggee.next_step() {
            let location = step.location;
            if self.sources.get(location.source).is_err() {
                continue;
            }
            self.current = Some(location);

            let actors = self.breakpoints.breakpoints_at(location.source, location.line);
            let reason = if !actors.is_empty() {
                for actor in &actors {
                    self.breakpoints.record_hit(*actor);
                }
                PauseReason::Breakpoint { actors }
            } else if step.debugger_statement && self.pause_on_debugger {
                PauseReason::DebuggerStatement
            } else {
                continue;
            };

            let event = PauseEvent { reason, location };
            self.state = ThreadState::Paused;
            self.pause_count += 1;
            logging::log_pause(
                event.reason.kind(),
                &location.source.to_string(),
                location.line,
            );
            self.emit(ThreadEvent::Paused(event.clone()));
            return Ok(RunOutcome::Paused(event));
        }

        self.state = ThreadState::Exited;
        self.current = None;
        info!(pauses = self.pause_count, "Debuggee exited");
        self.emit(ThreadEvent::Exited);
        Ok(RunOutcome::Exited)
    }

    fn emit(&self, event: ThreadEvent) {
        if self.events_tx.send(event).is_err() {
            debug!("Event subscriber has gone away");
        }
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == ThreadState::Paused
    }

    pub fn current_location(&self) -> Option<Location> {
        self.current
    }

    pub fn pause_count(&self) -> u64 {
        self.pause_count
    }
}

impl Default for DebuggerEngine {
    fn default() -> Self {
        Self::new()
    }
}
