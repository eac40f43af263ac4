//! Entity-bound DOI actions.
//!
//! These wrap [`DoiClient`] for callers that keep a repository object's DOI
//! in a named field. Minting reads the stored DOI (if any), registers
//! metadata, optionally binds the landing page, and only then writes the
//! DOI back. A failed or rejected mint leaves the field as it was.

use std::sync::Arc;

use doi_audit::{AuditLogger, DoiEvent};
use doi_core::EntityFields;
use tracing::{debug, error, info, warn};

use crate::client::DoiClient;
use crate::error::DoiError;
use crate::response::MetadataOutcome;

/// Result of a [`MintDoiAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintResult {
    /// A new DOI was assigned and stored.
    Minted {
        /// The new DOI.
        doi: String,
    },

    /// Metadata for the already-stored DOI was replaced.
    Updated {
        /// The DOI.
        doi: String,
    },

    /// The registry refused the metadata; nothing was stored.
    Rejected {
        /// Raw response body.
        body: String,
    },

    /// The entity type is not handled by this action.
    Skipped,
}

/// What to register for an entity.
#[derive(Debug, Clone, Copy)]
pub struct MintPayload<'a> {
    /// XML metadata document.
    pub xml: &'a str,
    /// Landing page to bind the DOI to, if any.
    pub landing_url: Option<&'a str>,
}

/// Mints or updates the DOI stored in an entity field.
#[derive(Debug, Clone)]
pub struct MintDoiAction {
    client: DoiClient,
    field: String,
    entity_types: Vec<String>,
    audit: Arc<AuditLogger>,
}

impl MintDoiAction {
    /// Creates an action storing DOIs in `field`.
    ///
    /// Audit events go to [`AuditLogger::tracing`] until
    /// [`with_audit`](Self::with_audit) replaces it.
    #[must_use]
    pub fn new(client: DoiClient, field: impl Into<String>) -> Self {
        Self {
            client,
            field: field.into(),
            entity_types: Vec::new(),
            audit: Arc::new(AuditLogger::tracing()),
        }
    }

    /// Restricts the action to the given entity types.
    ///
    /// With no restriction every entity is handled.
    #[must_use]
    pub fn for_entity_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the audit logger.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns true if this action handles `entity`.
    #[must_use]
    pub fn applies_to(&self, entity: &dyn EntityFields) -> bool {
        self.entity_types.is_empty()
            || self
                .entity_types
                .iter()
                .any(|t| t == entity.entity_type())
    }

    /// Mints (or updates) the DOI for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Configuration`] if the stored DOI is not under the
    /// configured prefix, or [`DoiError::Transport`] if either request fails.
    /// The entity field is unchanged on error.
    pub async fn execute(
        &self,
        entity: &mut dyn EntityFields,
        payload: MintPayload<'_>,
    ) -> Result<MintResult, DoiError> {
        if !self.applies_to(entity) {
            debug!(
                entity_type = entity.entity_type(),
                "Skipping DOI mint for unhandled entity type"
            );
            return Ok(MintResult::Skipped);
        }

        let entity_type = entity.entity_type().to_string();
        let entity_id = entity.entity_id();
        let existing = entity.non_empty_field(&self.field);
        let slug = existing.as_deref().unwrap_or(&self.client.config().prefix);

        match self.mint(entity, existing.as_deref(), payload).await {
            Ok(result) => {
                self.record_success(&result, slug, &entity_type, &entity_id, payload.landing_url);
                Ok(result)
            }
            Err(e) => {
                error!(
                    entity_type = %entity_type,
                    entity_id = %entity_id,
                    error = %e,
                    "Failed to mint DOI"
                );
                self.audit.record(
                    &DoiEvent::failed(slug, "mint", &e.to_string())
                        .with_entity(&entity_type, &entity_id),
                );
                Err(e)
            }
        }
    }

    async fn mint(
        &self,
        entity: &mut dyn EntityFields,
        existing: Option<&str>,
        payload: MintPayload<'_>,
    ) -> Result<MintResult, DoiError> {
        let mut identifier = self.client.identifier(existing)?;
        let was_minted = identifier.is_minted();

        if let MetadataOutcome::Rejected { body } = self
            .client
            .register_metadata(&mut identifier, payload.xml)
            .await?
        {
            return Ok(MintResult::Rejected { body });
        }

        if let Some(url) = payload.landing_url {
            self.client.register_url(&identifier, url).await?;
        }

        let doi = identifier.require_value("mint")?.to_string();
        entity.set_field(&self.field, &doi);

        Ok(if was_minted {
            MintResult::Updated { doi }
        } else {
            MintResult::Minted { doi }
        })
    }

    fn record_success(
        &self,
        result: &MintResult,
        slug: &str,
        entity_type: &str,
        entity_id: &str,
        landing_url: Option<&str>,
    ) {
        let event = match result {
            MintResult::Minted { doi } => {
                info!("DOI minted for {entity_type}/{entity_id}: {doi}");
                DoiEvent::minted(doi)
            }
            MintResult::Updated { doi } => {
                info!("DOI metadata updated for {entity_type}/{entity_id}: {doi}");
                DoiEvent::updated(doi)
            }
            MintResult::Rejected { body } => {
                warn!(
                    entity_type,
                    entity_id,
                    body = %body,
                    "Registry rejected DOI metadata"
                );
                DoiEvent::rejected(slug, body)
            }
            MintResult::Skipped => return,
        };
        self.audit.record(&event.with_entity(entity_type, entity_id));

        if let (Some(doi), Some(url)) = (minted_doi(result), landing_url) {
            self.audit
                .record(&DoiEvent::url_registered(doi, url).with_entity(entity_type, entity_id));
        }
    }
}

fn minted_doi(result: &MintResult) -> Option<&str> {
    match result {
        MintResult::Minted { doi } | MintResult::Updated { doi } => Some(doi),
        MintResult::Rejected { .. } | MintResult::Skipped => None,
    }
}

/// Marks the DOI stored in an entity field inactive.
///
/// The field keeps its value: the registry reactivates the DOI the next time
/// its metadata is registered.
#[derive(Debug, Clone)]
pub struct DeactivateDoiAction {
    client: DoiClient,
    field: String,
    audit: Arc<AuditLogger>,
}

impl DeactivateDoiAction {
    /// Creates an action reading DOIs from `field`.
    ///
    /// Audit events go to [`AuditLogger::tracing`] by default.
    #[must_use]
    pub fn new(client: DoiClient, field: impl Into<String>) -> Self {
        Self {
            client,
            field: field.into(),
            audit: Arc::new(AuditLogger::tracing()),
        }
    }

    /// Sets the audit logger.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Deactivates the entity's DOI and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Configuration`] if the entity has no DOI, or
    /// [`DoiError::Transport`] if the request fails.
    pub async fn execute(&self, entity: &dyn EntityFields) -> Result<String, DoiError> {
        let entity_type = entity.entity_type();
        let entity_id = entity.entity_id();
        let existing = entity.non_empty_field(&self.field);

        let result = match self.client.identifier(existing.as_deref()) {
            Ok(identifier) => self.client.deactivate(&identifier).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(body) => {
                let doi = existing.as_deref().unwrap_or_default();
                info!("DOI set to inactive for {entity_type}/{entity_id}: {body}");
                self.audit.record(
                    &DoiEvent::deactivated(doi)
                        .with_entity(entity_type, &entity_id)
                        .with_details(&body),
                );
                Ok(body)
            }
            Err(e) => {
                let slug = existing.as_deref().unwrap_or(&self.client.config().prefix);
                error!(
                    entity_type,
                    entity_id = %entity_id,
                    error = %e,
                    "Failed to deactivate DOI"
                );
                self.audit.record(
                    &DoiEvent::failed(slug, "deactivate", &e.to_string())
                        .with_entity(entity_type, &entity_id),
                );
                Err(e)
            }
        }
    }
}
