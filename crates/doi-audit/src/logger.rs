//! Audit logger implementation.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info, warn};

use crate::event::{AuditEvent, EventSeverity};

/// Backend trait for audit log storage.
pub trait LoggerBackend: Send + Sync + Debug {
    /// Logs a serialized audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be stored.
    fn log(&self, event_json: &str) -> Result<(), LoggerError>;

    /// Returns the backend name for identification.
    fn name(&self) -> &'static str;
}

/// Errors that can occur during audit logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Serialization error
    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Audit logger that fans events out to its backends.
#[derive(Debug)]
pub struct AuditLogger {
    backends: Vec<Arc<dyn LoggerBackend>>,
    enabled: bool,
    min_severity: EventSeverity,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AuditLogger {
    /// Creates a builder for configuring the logger.
    #[must_use]
    pub fn builder() -> AuditLoggerBuilder {
        AuditLoggerBuilder::new()
    }

    /// Creates a logger that writes to the tracing backend only.
    #[must_use]
    pub fn tracing() -> Self {
        Self::builder()
            .with_backend(Arc::new(TracingBackend::new()))
            .build()
    }

    /// Logs an audit event to all configured backends.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be serialized.
    /// Backend errors are logged but do not cause this method to fail.
    pub fn log<E: AuditEvent>(&self, event: &E) -> Result<(), LoggerError> {
        if !self.enabled {
            debug!("Audit logging disabled, skipping event");
            return Ok(());
        }

        if event.severity() < self.min_severity {
            debug!(
                event_type = event.event_type(),
                "Event severity {:?} below threshold {:?}, skipping",
                event.severity(),
                self.min_severity
            );
            return Ok(());
        }

        let json = serde_json::to_string(event)?;

        for backend in &self.backends {
            if let Err(e) = backend.log(&json) {
                error!(backend = backend.name(), error = %e, "Failed to write audit event");
            }
        }

        Ok(())
    }

    /// Logs an event, reporting serialization failures through tracing.
    pub fn record<E: AuditEvent>(&self, event: &E) {
        if let Err(e) = self.log(event) {
            error!(event_type = event.event_type(), error = %e, "Failed to record audit event");
        }
    }

    /// Returns the number of configured backends.
    #[must_use]
    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }
}

/// Builder for configuring an audit logger.
#[derive(Debug)]
pub struct AuditLoggerBuilder {
    backends: Vec<Arc<dyn LoggerBackend>>,
    enabled: bool,
    min_severity: EventSeverity,
}

impl Default for AuditLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLoggerBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            enabled: true,
            min_severity: EventSeverity::Info,
        }
    }

    /// Adds a backend to the logger.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn LoggerBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Enables or disables the logger.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the minimum severity level.
    #[must_use]
    pub const fn min_severity(mut self, severity: EventSeverity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Builds the audit logger.
    #[must_use]
    pub fn build(self) -> AuditLogger {
        AuditLogger {
            backends: self.backends,
            enabled: self.enabled,
            min_severity: self.min_severity,
        }
    }
}

/// Tracing-based backend that logs events via tracing macros.
#[derive(Debug, Default)]
pub struct TracingBackend;

impl TracingBackend {
    /// Creates a new tracing backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LoggerBackend for TracingBackend {
    fn log(&self, event_json: &str) -> Result<(), LoggerError> {
        let value: serde_json::Value = serde_json::from_str(event_json)?;

        let outcome = value
            .get("outcome")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");

        match outcome {
            "failure" | "rejected" => warn!(audit_event = %event_json, "DOI audit event"),
            _ => info!(audit_event = %event_json, "DOI audit event"),
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

/// In-memory backend for testing.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    events: Mutex<Vec<String>>,
}

impl InMemoryBackend {
    /// Creates a new in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all logged events.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears all logged events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LoggerBackend for InMemoryBackend {
    fn log(&self, event_json: &str) -> Result<(), LoggerError> {
        self.events
            .lock()
            .map_err(|_| LoggerError::Backend("in-memory event log poisoned".to_string()))?
            .push(event_json.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}
