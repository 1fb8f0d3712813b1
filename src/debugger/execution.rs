use crate::debugger::pause::Location;
use crate::source::{Source, SourceActor};
use std::collections::VecDeque;

/// One executed statement as reported by the debuggee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionStep {
    pub location: Location,
    pub debugger_statement: bool,
}

impl ExecutionStep {
    pub fn at(source: SourceActor, line: u32) -> Self {
        Self {
            location: Location::new(source, line),
            debugger_statement: false,
        }
    }

    pub fn debugger(source: SourceActor, line: u32) -> Self {
        Self {
            location: Location::new(source, line),
            debugger_statement: true,
        }
    }
}

/// The runtime side of a session: yields executed locations in program order.
pub trait Debuggee {
    /// The next statement about to execute, or `None` once the program ends.
    fn next_step(&mut self) -> Option<ExecutionStep>;
}

/// A recorded program run, replayed one step at a time.
#[derive(Debug, Clone, Default)]
pub struct ExecutionTrace {
    steps: VecDeque<ExecutionStep>,
}

impl ExecutionTrace {
    pub fn new(steps: impl IntoIterator<Item = ExecutionStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Visit the given lines of one source in order. Lines listed in
    /// `debugger_lines` carry a `debugger` statement.
    pub fn from_lines(source: SourceActor, lines: &[u32], debugger_lines: &[u32]) -> Self {
        Self::new(lines.iter().map(|&line| ExecutionStep {
            location: Location::new(source, line),
            debugger_statement: debugger_lines.contains(&line),
        }))
    }

    /// Run every executable line of `source` once, top to bottom.
    pub fn linear(source: &Source, debugger_lines: &[u32]) -> Self {
        Self::from_lines(source.actor(), source.line_table().lines(), debugger_lines)
    }

    pub fn push(&mut self, step: ExecutionStep) {
        self.steps.push_back(step);
    }

    pub fn extend(&mut self, other: ExecutionTrace) {
        self.steps.extend(other.steps);
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl Debuggee for ExecutionTrace {
    fn next_step(&mut self) -> Option<ExecutionStep> {
        self.steps.pop_front()
    }
}
