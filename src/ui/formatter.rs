use crate::debugger::{Breakpoint, BreakpointState, PauseEvent, PauseReason};
use crate::source::Source;
use crossterm::style::Stylize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pretty printing utilities for debugger output
pub struct Formatter;

impl Formatter {
    /// Format the executable-line table of a source, marking lines in `marks`.
    pub fn format_line_table(source: &Source, marks: &[u32]) -> String {
        let mut out = format!(
            "{} ({}): {} executable line(s)",
            source.url(),
            source.actor(),
            source.line_table().len()
        );
        for line in source.line_table().lines() {
            let prefix = if marks.contains(line) { "●" } else { " " };
            out.push_str(&format!("\n  {} {:>5}", prefix, line));
        }
        out
    }

    /// Format a placed breakpoint, noting when the resolver moved it.
    pub fn format_breakpoint(bp: &Breakpoint) -> String {
        let state = match bp.state {
            BreakpointState::Pending => "pending",
            BreakpointState::Hit => "hit",
            BreakpointState::Removed => "removed",
        };
        if bp.was_moved() {
            format!(
                "{} at {}:{} (requested line {}, {}, hits: {})",
                bp.actor, bp.source, bp.resolved_line, bp.requested_line, state, bp.hit_count
            )
        } else {
            format!(
                "{} at {}:{} ({}, hits: {})",
                bp.actor, bp.source, bp.resolved_line, state, bp.hit_count
            )
        }
    }

    /// Format a pause with its reason and triggering breakpoints.
    pub fn format_pause(event: &PauseEvent, source_line: Option<&str>) -> String {
        let why = match &event.reason {
            PauseReason::Breakpoint { actors } => {
                let names: Vec<String> = actors.iter().map(ToString::to_string).collect();
                format!("breakpoint {}", names.join(", "))
            }
            PauseReason::DebuggerStatement => "debugger statement".to_string(),
        };
        match source_line {
            Some(text) => format!("Paused at {} ({})\n  {}", event.location, why, text.trim()),
            None => format!("Paused at {} ({})", event.location, why),
        }
    }

    /// Format an informational message in blue.
    pub fn info(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Info)
    }

    /// Format a success message in green.
    pub fn success(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Success)
    }

    /// Format a warning message in yellow.
    pub fn warning(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Warning)
    }

    /// Format an error message in red.
    pub fn error(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Error)
    }

    /// Configure whether ANSI colors are enabled.
    pub fn configure_colors(enable: bool) {
        COLOR_ENABLED.store(enable, Ordering::Relaxed);
    }

    /// Auto-configure color output based on environment.
    pub fn configure_colors_from_env() {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        Self::configure_colors(!no_color);
    }

    fn apply_color(message: &str, kind: ColorKind) -> String {
        if !COLOR_ENABLED.load(Ordering::Relaxed) {
            return message.to_string();
        }

        match kind {
            ColorKind::Info => format!("{}", message.blue()),
            ColorKind::Success => format!("{}", message.green()),
            ColorKind::Warning => format!("{}", message.yellow()),
            ColorKind::Error => format!("{}", message.red()),
        }
    }
}

#[derive(Copy, Clone)]
enum ColorKind {
    Info,
    Success,
    Warning,
    Error,
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);
