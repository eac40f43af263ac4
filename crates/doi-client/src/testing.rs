//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::transport::{DoiRequest, ServiceResponse, Transport};

/// Replays scripted responses in order and records every request.
///
/// Once the script runs out, every request gets `200` with an empty body.
#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    script: Mutex<VecDeque<Result<ServiceResponse, TransportError>>>,
    requests: Mutex<Vec<DoiRequest>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(ServiceResponse::new(status, body)))
    }

    pub(crate) fn time_out(self) -> Self {
        self.push(Err(TransportError::Timeout {
            url: "scripted".to_string(),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "scripted timeout",
            )),
        }))
    }

    pub(crate) fn refuse_connection(self) -> Self {
        self.push(Err(TransportError::ConnectionFailed {
            url: "scripted".to_string(),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "scripted refusal",
            )),
        }))
    }

    pub(crate) fn requests(&self) -> Vec<DoiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(self, entry: Result<ServiceResponse, TransportError>) -> Self {
        self.script.lock().unwrap().push_back(entry);
        self
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: DoiRequest) -> Result<ServiceResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ServiceResponse::new(200, "")))
    }
}
