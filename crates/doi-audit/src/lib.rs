//! Audit trail for DOI lifecycle actions.
//!
//! Every mint, metadata update, URL binding and deactivation performed by
//! the entity-bound actions produces a [`DoiEvent`]. Events are serialized
//! to JSON and handed to one or more [`LoggerBackend`]s.
//!
//! # Example
//!
//! ```rust
//! use doi_audit::{AuditLogger, DoiEvent, InMemoryBackend};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(InMemoryBackend::new());
//! let logger = AuditLogger::builder()
//!     .with_backend(backend.clone())
//!     .build();
//!
//! let event = DoiEvent::minted("10.5072/ABCD-1234").with_entity("node", "42");
//! logger.log(&event).unwrap();
//!
//! assert_eq!(backend.events().len(), 1);
//! ```

mod event;
mod logger;

pub use event::{AuditEvent, DoiEvent, DoiEventType, EventOutcome, EventSeverity};
pub use logger::{AuditLogger, AuditLoggerBuilder, InMemoryBackend, LoggerBackend, LoggerError, TracingBackend};
