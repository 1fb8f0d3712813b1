pub mod breakpoint;
pub mod engine;
pub mod execution;
pub mod pause;

pub use breakpoint::{Breakpoint, BreakpointActor, BreakpointManager, BreakpointState};
pub use engine::{DebuggerEngine, RunOutcome, ThreadState};
pub use execution::{Debuggee, ExecutionStep, ExecutionTrace};
pub use pause::{Location, PauseEvent, PauseReason, ThreadEvent};
