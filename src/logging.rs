//! Structured logging utilities for the line debugger.
//!
//! This module provides helper functions for consistent, structured logging
//! across the application using the `tracing` crate.

use std::fmt;

/// Helper function to format and log multi-line output without structured fields.
/// Used for formatted displays like tables and summaries.
pub fn log_display<D: fmt::Display>(message: D, level: LogLevel) {
    let msg = message.to_string();
    match level {
        LogLevel::Info => tracing::info!("{}", msg),
        LogLevel::Warn => tracing::warn!("{}", msg),
        LogLevel::Error => tracing::error!("{}", msg),
        LogLevel::Debug => tracing::debug!("{}", msg),
    }
}

/// Log levels matching tracing crate levels.
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

/// Log source loading event.
pub fn log_loading_source(path: &str) {
    tracing::info!(source = path, "Loading source");
}

/// Log a newly registered source.
pub fn log_new_source(actor: &str, url: &str) {
    tracing::debug!(actor, url, "New source");
}

/// Log breakpoint placement, including where the resolver moved it.
pub fn log_breakpoint_set(actor: &str, source: &str, requested: u32, resolved: u32) {
    if requested == resolved {
        tracing::debug!(actor, source, line = resolved, "Breakpoint set");
    } else {
        tracing::debug!(
            actor,
            source,
            requested,
            resolved,
            "Breakpoint set on next executable line"
        );
    }
}

pub fn log_breakpoint_cleared(actor: &str) {
    tracing::debug!(actor, "Breakpoint cleared");
}

/// Log a pause delivered to the subscriber.
pub fn log_pause(reason: &str, source: &str, line: u32) {
    tracing::debug!(reason, source, line, "Execution paused");
}

/// Log a client connecting to the debug server.
pub fn log_client_connected(peer: &str) {
    tracing::info!(peer, "New client connected");
}

pub fn log_client_disconnected(peer: &str) {
    tracing::info!(peer, "Client disconnected");
}
