//! Audit event definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::{Timestamp, Uuid};

/// Generates a new v7 UUID for audit events.
fn new_event_id() -> Uuid {
    let ts = Timestamp::now(uuid::NoContext);
    Uuid::new_v7(ts)
}

/// Severity level for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    /// Informational event
    #[default]
    Info,
    /// Warning event
    Warning,
    /// Error event
    Error,
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// The registry accepted the operation
    Success,
    /// The registry answered but refused the operation
    Rejected,
    /// The operation failed before the registry could answer
    Failure,
}

/// Base trait for all audit events.
pub trait AuditEvent: Serialize {
    /// Returns the event type identifier.
    fn event_type(&self) -> &'static str;

    /// Returns the event severity.
    fn severity(&self) -> EventSeverity;

    /// Returns the event timestamp.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Returns the correlation ID for request tracing.
    fn correlation_id(&self) -> Option<&str>;
}

/// DOI lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoiEvent {
    /// Unique event ID
    pub id: Uuid,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,

    /// Type of DOI event
    pub event_type: DoiEventType,

    /// The DOI, or the bare prefix when nothing was minted
    pub doi: String,

    /// Entity type of the owning repository object
    pub entity_type: Option<String>,

    /// Identifier of the owning repository object
    pub entity_id: Option<String>,

    /// Landing page URL, for URL registrations
    pub url: Option<String>,

    /// Event outcome
    pub outcome: EventOutcome,

    /// Registry response body or error message
    pub details: Option<String>,

    /// Correlation ID for tracing
    pub correlation_id: Option<String>,
}

/// Types of DOI events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoiEventType {
    /// A new DOI was assigned by the registry
    Minted,
    /// Metadata for an existing DOI was replaced
    Updated,
    /// A DOI was bound to its landing page
    UrlRegistered,
    /// A DOI was marked inactive
    Deactivated,
    /// The registry refused a metadata registration
    Rejected,
    /// An operation failed with a configuration or transport error
    Failed,
}

impl DoiEvent {
    fn new(event_type: DoiEventType, doi: &str, outcome: EventOutcome) -> Self {
        Self {
            id: new_event_id(),
            timestamp: Utc::now(),
            event_type,
            doi: doi.to_string(),
            entity_type: None,
            entity_id: None,
            url: None,
            outcome,
            details: None,
            correlation_id: None,
        }
    }

    /// Creates a DOI minted event.
    #[must_use]
    pub fn minted(doi: &str) -> Self {
        Self::new(DoiEventType::Minted, doi, EventOutcome::Success)
    }

    /// Creates a metadata updated event.
    #[must_use]
    pub fn updated(doi: &str) -> Self {
        Self::new(DoiEventType::Updated, doi, EventOutcome::Success)
    }

    /// Creates a URL registered event.
    #[must_use]
    pub fn url_registered(doi: &str, url: &str) -> Self {
        let mut event = Self::new(DoiEventType::UrlRegistered, doi, EventOutcome::Success);
        event.url = Some(url.to_string());
        event
    }

    /// Creates a DOI deactivated event.
    #[must_use]
    pub fn deactivated(doi: &str) -> Self {
        Self::new(DoiEventType::Deactivated, doi, EventOutcome::Success)
    }

    /// Creates a registry rejection event carrying the raw response body.
    #[must_use]
    pub fn rejected(slug: &str, body: &str) -> Self {
        Self::new(DoiEventType::Rejected, slug, EventOutcome::Rejected).with_details(body)
    }

    /// Creates a failure event for `operation`.
    #[must_use]
    pub fn failed(slug: &str, operation: &str, error: &str) -> Self {
        Self::new(DoiEventType::Failed, slug, EventOutcome::Failure)
            .with_details(&format!("{operation}: {error}"))
    }

    /// Sets the owning entity.
    #[must_use]
    pub fn with_entity(mut self, entity_type: &str, entity_id: &str) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self.entity_id = Some(entity_id.to_string());
        self
    }

    /// Sets the correlation ID.
    #[must_use]
    pub fn with_correlation_id(mut self, id: &str) -> Self {
        self.correlation_id = Some(id.to_string());
        self
    }

    /// Sets additional details.
    #[must_use]
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

impl AuditEvent for DoiEvent {
    fn event_type(&self) -> &'static str {
        match self.event_type {
            DoiEventType::Minted => "doi.minted",
            DoiEventType::Updated => "doi.updated",
            DoiEventType::UrlRegistered => "doi.url_registered",
            DoiEventType::Deactivated => "doi.deactivated",
            DoiEventType::Rejected => "doi.rejected",
            DoiEventType::Failed => "doi.failed",
        }
    }

    fn severity(&self) -> EventSeverity {
        match self.outcome {
            EventOutcome::Success => EventSeverity::Info,
            EventOutcome::Rejected => EventSeverity::Warning,
            EventOutcome::Failure => EventSeverity::Error,
        }
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
