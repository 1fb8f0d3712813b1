use crate::debugger::{DebuggerEngine, ThreadEvent};
use crate::logging;
use crate::server::protocol::{
    ActualLocation, DebugEvent, DebugMessage, DebugRequest, DebugResponse, SourceForm,
};
use crate::{DebuggerError, Result};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::Receiver;
use tracing::{error, info, warn};

/// Debug server that handles remote debugging connections
pub struct DebugServer {
    port: u16,
    token: Option<String>,
    pause_on_debugger: bool,
}

/// Session state for a connected client. Each connection debugs its own
/// program; nothing is shared between sessions.
pub struct Session {
    engine: DebuggerEngine,
    events: Receiver<ThreadEvent>,
    authenticated: bool,
}

impl Session {
    pub fn new(authenticated: bool, pause_on_debugger: bool) -> Result<Self> {
        let mut engine = DebuggerEngine::new();
        engine.set_pause_on_debugger(pause_on_debugger);
        let events = engine.take_events()?;
        Ok(Self {
            engine,
            events,
            authenticated,
        })
    }

    pub fn engine(&self) -> &DebuggerEngine {
        &self.engine
    }

    /// Handle one request, returning its response followed by every event
    /// the request produced, in emission order.
    pub fn handle(&mut self, message: DebugMessage, token: &Option<String>) -> Vec<DebugMessage> {
        let id = message.id;
        let response = match message.request {
            Some(request) => self.handle_request(request, token),
            None => DebugResponse::Error {
                message: "Message has no request".to_string(),
            },
        };

        let mut out = vec![DebugMessage::response(id, response)];
        out.extend(
            self.events
                .try_iter()
                .map(|event| DebugMessage::event(id, DebugEvent::from(&event))),
        );
        out
    }

    fn handle_request(
        &mut self,
        request: DebugRequest,
        expected_token: &Option<String>,
    ) -> DebugResponse {
        // Check authentication for all requests except Authenticate and Ping
        match &request {
            DebugRequest::Authenticate { .. } | DebugRequest::Ping => {}
            _ => {
                if !self.authenticated {
                    return DebugResponse::Error {
                        message: "Not authenticated. Send Authenticate request first.".to_string(),
                    };
                }
            }
        }

        match request {
            DebugRequest::Authenticate { token } => {
                if let Some(expected) = expected_token {
                    let success = token == *expected;
                    self.authenticated = success;
                    DebugResponse::Authenticated {
                        success,
                        message: if success {
                            "Authentication successful".to_string()
                        } else {
                            "Invalid token".to_string()
                        },
                    }
                } else {
                    self.authenticated = true;
                    DebugResponse::Authenticated {
                        success: true,
                        message: "No authentication required".to_string(),
                    }
                }
            }

            DebugRequest::Ping => DebugResponse::Pong,

            DebugRequest::LoadSource {
                url,
                text,
                debugger_lines,
            } => {
                logging::log_loading_source(&url);
                let actor = match debugger_lines {
                    Some(lines) => self
                        .engine
                        .load_script_with_debugger_lines(&url, &text, &lines),
                    None => self.engine.load_script(&url, &text),
                };
                match self.engine.source(actor) {
                    Ok(source) => DebugResponse::SourceLoaded {
                        source: SourceForm::from(source),
                    },
                    Err(e) => error_response(e),
                }
            }

            DebugRequest::ListSources => DebugResponse::SourcesList {
                sources: self.engine.sources().list().map(SourceForm::from).collect(),
            },

            DebugRequest::SetBreakpoint { source, line } => {
                let actor = self
                    .engine
                    .sources()
                    .resolve_actor(&source)
                    .map(|source| source.actor());
                let placed = actor.and_then(|actor| self.engine.set_breakpoint(actor, line));
                match placed {
                    Ok(bp) => DebugResponse::BreakpointSet {
                        actor: bp.actor,
                        actual_location: ActualLocation::from(&bp),
                    },
                    Err(e) => error_response(e),
                }
            }

            DebugRequest::RemoveBreakpoint { actor } => {
                // Unknown and malformed handles are acknowledged like removed ones.
                if let Ok(handle) = actor.parse() {
                    self.engine.remove_breakpoint(handle);
                }
                DebugResponse::BreakpointRemoved { actor }
            }

            DebugRequest::ListBreakpoints => DebugResponse::BreakpointsList {
                breakpoints: self.engine.breakpoints().list(),
            },

            DebugRequest::Resume => match self.engine.resume() {
                Ok(_) => DebugResponse::Resumed,
                Err(e) => error_response(e),
            },

            DebugRequest::GetState => DebugResponse::State {
                state: self.engine.state(),
                location: self.engine.current_location().map(Into::into),
                pause_count: self.engine.pause_count(),
            },

            DebugRequest::Disconnect => DebugResponse::Disconnected,
        }
    }
}

fn error_response(e: DebuggerError) -> DebugResponse {
    DebugResponse::Error {
        message: e.to_string(),
    }
}

impl DebugServer {
    /// Create a new debug server
    pub fn new(port: u16, token: Option<String>) -> Self {
        Self {
            port,
            token,
            pause_on_debugger: true,
        }
    }

    /// Whether `debugger` statements pause sessions started by this server
    pub fn with_pause_on_debugger(mut self, enabled: bool) -> Self {
        self.pause_on_debugger = enabled;
        self
    }

    /// Start the debug server and listen for connections
    pub fn start(&self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .map_err(|e| DebuggerError::FileError(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Debug server listening on {}", addr);
        self.serve(listener)
    }

    /// Accept connections on an already bound listener
    pub fn serve(&self, listener: TcpListener) -> Result<()> {
        if self.token.is_some() {
            info!("Token authentication enabled");
        }

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let token = self.token.clone();
                    let pause_on_debugger = self.pause_on_debugger;

                    // Handle each connection in a separate thread
                    std::thread::spawn(move || {
                        if let Err(e) = Self::handle_client(stream, token, pause_on_debugger) {
                            error!("Error handling client: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }

        Ok(())
    }

    fn handle_client(
        stream: TcpStream,
        token: Option<String>,
        pause_on_debugger: bool,
    ) -> Result<()> {
        let peer_addr = stream
            .peer_addr()
            .map_err(|e| DebuggerError::FileError(format!("Failed to get peer address: {}", e)))?;
        logging::log_client_connected(&peer_addr.to_string());

        // Auto-authenticate if no token required
        let mut session = Session::new(token.is_none(), pause_on_debugger)?;

        let reader = BufReader::new(
            stream
                .try_clone()
                .map_err(|e| DebuggerError::FileError(format!("Failed to clone stream: {}", e)))?,
        );
        let mut writer = stream;

        for line in reader.lines() {
            let line =
                line.map_err(|e| DebuggerError::FileError(format!("Failed to read line: {}", e)))?;
            if line.trim().is_empty() {
                continue;
            }

            let replies = match serde_json::from_str::<DebugMessage>(&line) {
                Ok(message) => session.handle(message, &token),
                Err(e) => {
                    warn!("Failed to parse message: {}", e);
                    vec![DebugMessage::response(
                        0,
                        DebugResponse::Error {
                            message: format!("Failed to parse message: {}", e),
                        },
                    )]
                }
            };

            let disconnect = replies
                .iter()
                .any(|m| m.response == Some(DebugResponse::Disconnected));

            for reply in replies {
                write_message(&mut writer, &reply)?;
            }

            if disconnect {
                break;
            }
        }

        logging::log_client_disconnected(&peer_addr.to_string());
        Ok(())
    }
}

pub(crate) fn write_message<W: Write>(writer: &mut W, message: &DebugMessage) -> Result<()> {
    let json = serde_json::to_string(message)
        .map_err(|e| DebuggerError::Protocol(format!("Failed to serialize message: {}", e)))?;
    writeln!(writer, "{}", json)
        .map_err(|e| DebuggerError::FileError(format!("Failed to write message: {}", e)))?;
    writer
        .flush()
        .map_err(|e| DebuggerError::FileError(format!("Failed to flush stream: {}", e)))?;
    Ok(())
}
