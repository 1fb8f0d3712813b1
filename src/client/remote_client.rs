use crate::debugger::Breakpoint;
use crate::server::protocol::{
    ActualLocation, DebugEvent, DebugMessage, DebugRequest, DebugResponse, SourceForm,
};
use crate::{DebuggerError, Result};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use tracing::{debug, info};

/// Remote client for connecting to a debug server
pub struct RemoteClient {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    message_id: u64,
    authenticated: bool,
    pending_events: VecDeque<DebugEvent>,
}

impl RemoteClient {
    /// Connect to a remote debug server
    pub fn connect(addr: &str, token: Option<String>) -> Result<Self> {
        info!("Connecting to debug server at {}", addr);
        let stream = TcpStream::connect(addr).map_err(|e| {
            DebuggerError::FileError(format!("Failed to connect to {}: {}", addr, e))
        })?;
        let reader = BufReader::new(
            stream
                .try_clone()
                .map_err(|e| DebuggerError::FileError(format!("Failed to clone stream: {}", e)))?,
        );

        let mut client = Self {
            reader,
            writer: stream,
            message_id: 0,
            authenticated: token.is_none(),
            pending_events: VecDeque::new(),
        };

        // Authenticate if token is provided
        if let Some(token) = token {
            client.authenticate(&token)?;
        }

        Ok(client)
    }

    /// Authenticate with the server
    pub fn authenticate(&mut self, token: &str) -> Result<()> {
        let response = self.send_request(DebugRequest::Authenticate {
            token: token.to_string(),
        })?;

        match response {
            DebugResponse::Authenticated { success, message } => {
                if success {
                    self.authenticated = true;
                    info!("Authentication successful");
                    Ok(())
                } else {
                    Err(DebuggerError::Protocol(format!(
                        "Authentication failed: {}",
                        message
                    ))
                    .into())
                }
            }
            other => Err(unexpected("Authenticate", other)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Register script text on the server
    pub fn load_source(&mut self, url: &str, text: &str) -> Result<SourceForm> {
        let response = self.send_request(DebugRequest::LoadSource {
            url: url.to_string(),
            text: text.to_string(),
            debugger_lines: None,
        })?;

        match response {
            DebugResponse::SourceLoaded { source } => {
                info!(actor = %source.actor, url, "Source loaded");
                Ok(source)
            }
            other => Err(unexpected("LoadSource", other)),
        }
    }

    /// List sources registered on the server
    pub fn list_sources(&mut self) -> Result<Vec<SourceForm>> {
        match self.send_request(DebugRequest::ListSources)? {
            DebugResponse::SourcesList { sources } => Ok(sources),
            other => Err(unexpected("ListSources", other)),
        }
    }

    /// Set a breakpoint; returns the handle and the line it actually landed on
    pub fn set_breakpoint(&mut self, source: &str, line: u32) -> Result<(String, ActualLocation)> {
        let response = self.send_request(DebugRequest::SetBreakpoint {
            source: source.to_string(),
            line,
        })?;

        match response {
            DebugResponse::BreakpointSet {
                actor,
                actual_location,
            } => Ok((actor.to_string(), actual_location)),
            other => Err(unexpected("SetBreakpoint", other)),
        }
    }

    /// Remove a breakpoint. Removing an unknown handle succeeds.
    pub fn remove_breakpoint(&mut self, actor: &str) -> Result<()> {
        match self.send_request(DebugRequest::RemoveBreakpoint {
            actor: actor.to_string(),
        })? {
            DebugResponse::BreakpointRemoved { .. } => Ok(()),
            other => Err(unexpected("RemoveBreakpoint", other)),
        }
    }

    /// List breakpoints on the server
    pub fn list_breakpoints(&mut self) -> Result<Vec<Breakpoint>> {
        match self.send_request(DebugRequest::ListBreakpoints)? {
            DebugResponse::BreakpointsList { breakpoints } => Ok(breakpoints),
            other => Err(unexpected("ListBreakpoints", other)),
        }
    }

    /// Resume and wait for the resulting `paused` or `exited` event
    pub fn resume(&mut self) -> Result<DebugEvent> {
        match self.send_request(DebugRequest::Resume)? {
            DebugResponse::Resumed => loop {
                let event = self.next_event()?;
                if matches!(event, DebugEvent::Paused { .. } | DebugEvent::Exited) {
                    return Ok(event);
                }
            },
            other => Err(unexpected("Resume", other)),
        }
    }

    /// Ping the server
    pub fn ping(&mut self) -> Result<()> {
        match self.send_request(DebugRequest::Ping)? {
            DebugResponse::Pong => Ok(()),
            other => Err(unexpected("Ping", other)),
        }
    }

    /// Disconnect from the server
    pub fn disconnect(&mut self) -> Result<()> {
        match self.send_request(DebugRequest::Disconnect)? {
            DebugResponse::Disconnected => Ok(()),
            other => Err(unexpected("Disconnect", other)),
        }
    }

    /// Next event, either buffered while waiting for a response or read from
    /// the connection.
    pub fn next_event(&mut self) -> Result<DebugEvent> {
        if let Some(event) = self.pending_events.pop_front() {
            return Ok(event);
        }

        loop {
            let message = self.read_message()?;
            if let Some(event) = message.event {
                return Ok(event);
            }
        }
    }

    /// Send a request and wait for the response with the same id. Events that
    /// arrive first are buffered for `next_event`.
    fn send_request(&mut self, request: DebugRequest) -> Result<DebugResponse> {
        self.message_id += 1;
        let id = self.message_id;
        debug!(id, ?request, "Sending request");
        crate::server::debug_server::write_message(
            &mut self.writer,
            &DebugMessage::request(id, request),
        )?;

        loop {
            let message = self.read_message()?;
            if let Some(event) = message.event {
                self.pending_events.push_back(event);
                continue;
            }
            if message.id == id {
                if let Some(response) = message.response {
                    return Ok(response);
                }
            }
        }
    }

    fn read_message(&mut self) -> Result<DebugMessage> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| DebuggerError::FileError(format!("Failed to read response: {}", e)))?;
        if n == 0 {
            return Err(DebuggerError::Protocol("Connection closed by server".to_string()).into());
        }

        let message = serde_json::from_str(line.trim_end()).map_err(|e| {
            DebuggerError::Protocol(format!("Failed to parse message: {}: {}", line.trim_end(), e))
        })?;
        Ok(message)
    }
}

fn unexpected(request: &str, response: DebugResponse) -> miette::Report {
    match response {
        DebugResponse::Error { message } => DebuggerError::Protocol(message).into(),
        other => DebuggerError::Protocol(format!(
            "Unexpected response to {}: {:?}",
            request, other
        ))
        .into(),
    }
}
