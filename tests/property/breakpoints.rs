use line_debugger::debugger::{BreakpointState, DebuggerEngine, ExecutionTrace, RunOutcome};
use line_debugger::source::LineTable;
use proptest::prelude::*;

use crate::utils::line_set;

proptest! {
    #[test]
    fn test_breakpoint_pauses_at_resolved_line(lines in line_set(), requested in 0u32..600) {
        let mut engine = DebuggerEngine::new();
        let table = LineTable::new(lines.clone()).unwrap();
        let expected = table.resolve(requested);
        let actor = engine.add_source("gen.js", table);
        engine
            .set_debuggee(Box::new(ExecutionTrace::from_lines(actor, &lines, &[])))
            .unwrap();

        match (engine.set_breakpoint(actor, requested), expected) {
            (Ok(bp), Some(line)) => {
                prop_assert_eq!(bp.resolved_line, line);
                match engine.resume().unwrap() {
                    RunOutcome::Paused(event) => {
                        prop_assert_eq!(event.location.line, line);
                        prop_assert_eq!(event.reason.actors(), &[bp.actor][..]);
                    }
                    RunOutcome::Exited => prop_assert!(false, "breakpoint never hit"),
                }
                prop_assert_eq!(engine.resume().unwrap(), RunOutcome::Exited);
            }
            (Err(_), None) => prop_assert!(engine.breakpoints().is_empty()),
            (result, expected) => {
                prop_assert!(false, "placement {:?} disagrees with resolution {:?}", result, expected)
            }
        }
    }

    #[test]
    fn test_removal_is_idempotent(lines in line_set(), removals in 1usize..5) {
        let mut engine = DebuggerEngine::new();
        let actor = engine.add_source("gen.js", LineTable::new(lines.clone()).unwrap());
        let bp = engine.set_breakpoint(actor, lines[0]).unwrap();

        prop_assert!(engine.remove_breakpoint(bp.actor));
        for _ in 0..removals {
            prop_assert!(!engine.remove_breakpoint(bp.actor));
        }
        prop_assert_eq!(engine.breakpoints().state(bp.actor), BreakpointState::Removed);

        engine
            .set_debuggee(Box::new(ExecutionTrace::from_lines(actor, &lines, &[])))
            .unwrap();
        prop_assert_eq!(engine.resume().unwrap(), RunOutcome::Exited);
    }
}
