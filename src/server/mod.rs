pub mod debug_server;
pub mod protocol;

pub use debug_server::{DebugServer, Session};
pub use protocol::{DebugEvent, DebugMessage, DebugRequest, DebugResponse};
