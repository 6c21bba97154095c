//! In-memory transport for unit tests.

use crate::error::AdminError;
use crate::transport::{AdminRequest, AdminTransport, Payload};
use async_trait::async_trait;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&AdminRequest) -> Result<Payload, AdminError> + Send + Sync>;

/// Records every request and answers through a closure.
pub struct RecordingTransport {
    calls: Mutex<Vec<AdminRequest>>,
    responder: Responder,
}

impl RecordingTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&AdminRequest) -> Result<Payload, AdminError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Answers every request with an empty body.
    pub fn empty() -> Self {
        Self::new(|_| Ok(Payload::Text(String::new())))
    }

    pub fn calls(&self) -> Vec<AdminRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// `"METHOD path"` for each recorded call, in order.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| format!("{} {}", call.method, call.path))
            .collect()
    }
}

#[async_trait]
impl AdminTransport for RecordingTransport {
    async fn send(&self, request: AdminRequest) -> Result<Payload, AdminError> {
        let reply = (self.responder)(&request);
        self.calls.lock().unwrap().push(request);
        reply
    }
}
