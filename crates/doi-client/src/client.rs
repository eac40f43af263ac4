//! DOI registry client.
//!
//! [`DoiClient`] validates its configuration once, then runs each operation
//! as exactly one request through its [`Transport`]. It keeps no state
//! between calls and never retries.

use std::sync::Arc;

use doi_core::{DoiIdentifier, ServiceConfig};
use tracing::{debug, info, warn};

use crate::error::{DoiError, TransportError};
use crate::operation::{Operation, OperationOutcome};
use crate::response::{interpret_metadata_response, MetadataOutcome};
use crate::transport::{HttpTransport, ServiceResponse, Transport};

/// Client for the DOI registry's metadata and DOI endpoints.
#[derive(Debug, Clone)]
pub struct DoiClient {
    config: ServiceConfig,
    transport: Arc<dyn Transport>,
}

impl DoiClient {
    /// Creates a client that talks HTTP using reqwest.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Configuration`] if the configuration is
    /// incomplete, or [`DoiError::Transport`] if the HTTP client cannot be
    /// built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use doi_client::DoiClient;
    /// use doi_core::ServiceConfig;
    ///
    /// let config = ServiceConfig::new("mds.example.org/metadata", "mds.example.org/doi", "10.5072")
    ///     .with_credentials("user", "secret");
    /// let client = DoiClient::new(config)?;
    /// # Ok::<(), doi_client::DoiError>(())
    /// ```
    pub fn new(config: ServiceConfig) -> Result<Self, DoiError> {
        config.ensure_valid()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    /// Creates a client with a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Configuration`] if the configuration is
    /// incomplete.
    pub fn with_transport(
        config: ServiceConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, DoiError> {
        config.ensure_valid()?;
        Ok(Self { config, transport })
    }

    /// Returns the service configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Builds an identifier under the configured prefix.
    ///
    /// `existing` is the DOI already stored for the object, if any; a blank
    /// value counts as none.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Configuration`] if `existing` is not under the
    /// configured prefix.
    pub fn identifier(&self, existing: Option<&str>) -> Result<DoiIdentifier, DoiError> {
        Ok(DoiIdentifier::existing(&self.config.prefix, existing)?)
    }

    /// Creates or replaces the metadata for `identifier`.
    ///
    /// An unminted identifier asks the registry to assign a suffix. On
    /// [`MetadataOutcome::Registered`] the identifier's value is set to the
    /// returned DOI. A 2xx response the registry did not confirm comes back
    /// as [`MetadataOutcome::Rejected`] and leaves the identifier untouched,
    /// as does a confirmation naming a DOI outside the identifier's prefix.
    ///
    /// Registering metadata for a deactivated DOI reactivates it.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Transport`] on network failure, timeout or a
    /// non-2xx status.
    pub async fn register_metadata(
        &self,
        identifier: &mut DoiIdentifier,
        xml: &str,
    ) -> Result<MetadataOutcome, DoiError> {
        let response = self
            .send(&Operation::register_metadata(identifier, xml))
            .await?;

        match interpret_metadata_response(&response.body) {
            MetadataOutcome::Registered { doi } => {
                if let Err(e) = identifier.assign(doi.clone()) {
                    warn!(doi = %doi, error = %e, "Registry confirmed an unusable DOI");
                    return Ok(MetadataOutcome::Rejected {
                        body: response.body,
                    });
                }
                info!(doi = %doi, "Registered DOI metadata");
                Ok(MetadataOutcome::Registered { doi })
            }
            rejected @ MetadataOutcome::Rejected { .. } => {
                warn!(
                    target_slug = identifier.registration_slug(),
                    body = %response.body,
                    "Registry did not confirm metadata registration"
                );
                Ok(rejected)
            }
        }
    }

    /// Binds a minted DOI to its landing page URL.
    ///
    /// Returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Configuration`] if `identifier` has no DOI (no
    /// request is sent), or [`DoiError::Transport`] on network failure,
    /// timeout or a non-2xx status.
    pub async fn register_url(
        &self,
        identifier: &DoiIdentifier,
        url: &str,
    ) -> Result<String, DoiError> {
        let op = Operation::register_url(identifier, url)?;
        let response = self.send(&op).await?;
        info!(doi = op.target(), url, "Registered DOI landing page");
        Ok(response.body)
    }

    /// Marks a minted DOI inactive.
    ///
    /// The DOI is not deleted: the registry reactivates it on the next
    /// successful metadata registration. The identifier keeps its value.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Configuration`] if `identifier` has no DOI (no
    /// request is sent), or [`DoiError::Transport`] on network failure,
    /// timeout or a non-2xx status.
    pub async fn deactivate(&self, identifier: &DoiIdentifier) -> Result<String, DoiError> {
        let op = Operation::deactivate(identifier)?;
        let response = self.send(&op).await?;
        info!(doi = op.target(), "Deactivated DOI");
        Ok(response.body)
    }

    /// Runs an arbitrary operation and interprets its response.
    ///
    /// Unlike [`register_metadata`](Self::register_metadata) this does not
    /// update any identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DoiError::Transport`] on network failure, timeout or a
    /// non-2xx status.
    pub async fn execute(&self, op: &Operation<'_>) -> Result<OperationOutcome, DoiError> {
        let response = self.send(op).await?;
        Ok(op.interpret(response.body))
    }

    /// Sends one request and turns non-2xx answers into errors.
    async fn send(&self, op: &Operation<'_>) -> Result<ServiceResponse, DoiError> {
        let request = op.to_request(&self.config);
        let url = request.url.clone();

        debug!(
            operation = op.name(),
            method = %request.method,
            url = %url,
            "Sending DOI service request"
        );

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(TransportError::HttpStatus {
                url,
                status: response.status,
                body: response.body,
            }
            .into());
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use reqwest::Method;

    fn config() -> ServiceConfig {
        ServiceConfig::new(
            "https://mds.example.org/metadata",
            "https://mds.example.org/doi/",
            "10.5072",
        )
        .with_credentials("user", "pass")
    }

    fn client(transport: &Arc<RecordingTransport>) -> DoiClient {
        DoiClient::with_transport(config(), transport.clone()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let transport = Arc::new(RecordingTransport::new());
        let config = ServiceConfig::new("https://mds.example.org/metadata", "", "10.5072");

        let err = DoiClient::with_transport(config.clone(), transport).unwrap_err();
        assert!(err.is_configuration());
        assert!(DoiClient::new(config).unwrap_err().is_configuration());
    }

    #[test]
    fn test_identifier_uses_configured_prefix() {
        let transport = Arc::new(RecordingTransport::new());
        let client = client(&transport);

        assert_eq!(client.identifier(None).unwrap().prefix(), "10.5072");
        assert!(client.identifier(Some("10.9999/X")).unwrap_err().is_configuration());
    }

    #[tokio::test]
    async fn test_register_metadata_assigns_doi() {
        let transport = Arc::new(RecordingTransport::new().respond(201, "OK (10.5072/ABCD-1234)"));
        let client = client(&transport);
        let mut id = client.identifier(None).unwrap();

        let outcome = client.register_metadata(&mut id, "<resource/>").await.unwrap();

        assert_eq!(outcome.doi(), Some("10.5072/ABCD-1234"));
        assert_eq!(id.value(), Some("10.5072/ABCD-1234"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].url, "https://mds.example.org/metadata/10.5072");
        assert_eq!(requests[0].content_type, "application/xml;charset=UTF-8");
        assert_eq!(requests[0].body.as_deref(), Some("<resource/>"));
        assert_eq!(requests[0].authorization(), "Basic dXNlcjpwYXNz");
    }

    #[tokio::test]
    async fn test_register_metadata_is_idempotent() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(201, "OK (10.5072/ABCD-1234)")
                .respond(201, "OK (10.5072/ABCD-1234)"),
        );
        let client = client(&transport);
        let mut id = client.identifier(None).unwrap();

        let first = client.register_metadata(&mut id, "<resource/>").await.unwrap();
        let second = client.register_metadata(&mut id, "<resource/>").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(id.value(), Some("10.5072/ABCD-1234"));

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://mds.example.org/metadata/10.5072");
        assert_eq!(
            requests[1].url,
            "https://mds.example.org/metadata/10.5072/ABCD-1234"
        );
        assert_eq!(requests[0].body, requests[1].body);
    }

    #[tokio::test]
    async fn test_registry_rejection_is_data() {
        let transport = Arc::new(RecordingTransport::new().respond(200, "error: duplicate DOI"));
        let client = client(&transport);
        let mut id = client.identifier(None).unwrap();

        let outcome = client.register_metadata(&mut id, "<resource/>").await.unwrap();

        assert_eq!(
            outcome,
            MetadataOutcome::Rejected {
                body: "error: duplicate DOI".to_string()
            }
        );
        assert!(!id.is_minted());
    }

    #[tokio::test]
    async fn test_empty_ok_body_does_not_crash_or_assign() {
        let transport = Arc::new(RecordingTransport::new().respond(201, "OK ()"));
        let client = client(&transport);
        let mut id = client.identifier(None).unwrap();

        let outcome = client.register_metadata(&mut id, "<resource/>").await.unwrap();

        assert_eq!(
            outcome,
            MetadataOutcome::Rejected {
                body: "OK ()".to_string()
            }
        );
        assert!(!id.is_minted());
    }

    #[tokio::test]
    async fn test_non_2xx_metadata_is_transport_error() {
        let transport = Arc::new(RecordingTransport::new().respond(401, "Bad credentials"));
        let client = client(&transport);
        let mut id = client.identifier(Some("10.5072/KEEP")).unwrap();

        let err = client.register_metadata(&mut id, "<resource/>").await.unwrap_err();

        assert!(matches!(
            err,
            DoiError::Transport(TransportError::HttpStatus { status: 401, ref body, .. }) if body == "Bad credentials"
        ));
        assert_eq!(id.value(), Some("10.5072/KEEP"));
    }

    #[tokio::test]
    async fn test_register_url() {
        let transport = Arc::new(RecordingTransport::new().respond(201, "OK"));
        let client = client(&transport);
        let id = client.identifier(Some("10.5072/X")).unwrap();

        let body = client
            .register_url(&id, "http://example.org/obj/1")
            .await
            .unwrap();

        assert_eq!(body, "OK");
        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].url, "https://mds.example.org/doi/10.5072/X");
        assert_eq!(requests[0].content_type, "text/plain;charset=UTF-8");
        assert_eq!(
            requests[0].body.as_deref(),
            Some("doi=10.5072/X\nurl=http://example.org/obj/1\n")
        );
    }

    #[tokio::test]
    async fn test_deactivate_keeps_identifier_value() {
        let transport = Arc::new(RecordingTransport::new().respond(200, "OK"));
        let client = client(&transport);
        let id = client.identifier(Some("10.5072/ABCD-1234")).unwrap();

        let body = client.deactivate(&id).await.unwrap();

        assert_eq!(body, "OK");
        assert_eq!(id.value(), Some("10.5072/ABCD-1234"));
        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(
            requests[0].url,
            "https://mds.example.org/metadata/10.5072/ABCD-1234"
        );
        assert_eq!(requests[0].content_type, "text/plain;charset=UTF-8");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_preconditions_fail_before_network() {
        let transport = Arc::new(RecordingTransport::new());
        let client = client(&transport);
        let id = client.identifier(Some("")).unwrap();

        let err = client.register_url(&id, "http://example.org").await.unwrap_err();
        assert!(err.is_configuration());

        let err = client.deactivate(&id).await.unwrap_err();
        assert!(err.is_configuration());

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_timeouts_surface_as_transport_errors() {
        let transport = Arc::new(
            RecordingTransport::new()
                .time_out()
                .time_out()
                .time_out(),
        );
        let client = client(&transport);
        let mut id = client.identifier(Some("10.5072/X")).unwrap();

        let metadata = client.register_metadata(&mut id, "<resource/>").await.unwrap_err();
        let url = client.register_url(&id, "http://example.org").await.unwrap_err();
        let deactivate = client.deactivate(&id).await.unwrap_err();

        for err in [metadata, url, deactivate] {
            assert!(err.is_transport());
            assert!(err.is_timeout());
        }
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_non_2xx_deactivate_is_transport_error() {
        let transport = Arc::new(RecordingTransport::new().respond(404, "DOI not found"));
        let client = client(&transport);
        let id = client.identifier(Some("10.5072/X")).unwrap();

        let err = client.deactivate(&id).await.unwrap_err();
        assert!(matches!(
            err,
            DoiError::Transport(TransportError::HttpStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_execute_does_not_touch_identifier() {
        let transport = Arc::new(RecordingTransport::new().respond(201, "OK (10.5072/NEW)"));
        let client = client(&transport);
        let id = client.identifier(None).unwrap();

        let outcome = client
            .execute(&Operation::register_metadata(&id, "<resource/>"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            OperationOutcome::Metadata(MetadataOutcome::Registered {
                doi: "10.5072/NEW".to_string()
            })
        );
        assert!(!id.is_minted());
    }
}
