//! Integration tests for the HTTP transport.
//!
//! A minimal HTTP/1.1 stub listens on a local port, records each request
//! verbatim and answers with a scripted status and body. This exercises the
//! real reqwest transport end to end: method, path, headers and body as they
//! appear on the wire.

use std::sync::Arc;
use std::time::Duration;

use doi_client::{DoiClient, MetadataOutcome};
use doi_core::ServiceConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// A request as received by the stub.
#[derive(Debug, Clone)]
struct CapturedRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Scripted registry stub.
struct RegistryStub {
    base: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl RegistryStub {
    /// Starts a stub answering each connection with the next scripted
    /// response.
    async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let base = format!("http://{}", listener.local_addr().unwrap());
        let captured = Arc::new(Mutex::new(Vec::new()));

        let sink = captured.clone();
        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                if let Some(request) = read_request(&mut stream).await {
                    sink.lock().await.push(request);
                }
                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: text/plain;charset=UTF-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { base, captured }
    }

    fn config(&self) -> ServiceConfig {
        ServiceConfig::new(
            format!("{}/metadata", self.base),
            format!("{}/doi", self.base),
            "10.5072",
        )
        .with_credentials("user", "pass")
    }

    async fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().await.clone()
    }
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    let mut raw = Vec::new();
    let mut chunk = [0_u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&chunk[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = raw[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

// =============================================================================
// Metadata Registration
// =============================================================================

#[tokio::test]
async fn test_mint_against_prefix_on_the_wire() {
    let stub = RegistryStub::start(vec![(201, "OK (10.5072/ABCD-1234)")]).await;
    let client = DoiClient::new(stub.config()).unwrap();
    let mut doi = client.identifier(None).unwrap();

    let outcome = client
        .register_metadata(&mut doi, "<resource>\u{e9}</resource>")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        MetadataOutcome::Registered {
            doi: "10.5072/ABCD-1234".to_string()
        }
    );
    assert_eq!(doi.value(), Some("10.5072/ABCD-1234"));

    let requests = stub.requests().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/metadata/10.5072");
    assert_eq!(
        request.header("content-type"),
        Some("application/xml;charset=UTF-8")
    );
    assert_eq!(request.header("authorization"), Some("Basic dXNlcjpwYXNz"));
    assert_eq!(request.body, "<resource>\u{e9}</resource>");
    assert!(request
        .header("user-agent")
        .is_some_and(|ua| ua.starts_with("doi-client/")));
}

#[tokio::test]
async fn test_rejection_on_the_wire_is_data() {
    let stub = RegistryStub::start(vec![(200, "error: duplicate DOI")]).await;
    let client = DoiClient::new(stub.config()).unwrap();
    let mut doi = client.identifier(None).unwrap();

    let outcome = client
        .register_metadata(&mut doi, "<resource/>")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        MetadataOutcome::Rejected {
            body: "error: duplicate DOI".to_string()
        }
    );
    assert!(!doi.is_minted());
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let stub = RegistryStub::start(vec![(500, "boom")]).await;
    let client = DoiClient::new(stub.config()).unwrap();
    let mut doi = client.identifier(None).unwrap();

    let err = client
        .register_metadata(&mut doi, "<resource/>")
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("500"));
}

// =============================================================================
// URL Registration and Deactivation
// =============================================================================

#[tokio::test]
async fn test_full_lifecycle_on_the_wire() {
    let stub = RegistryStub::start(vec![
        (201, "OK (10.5072/ABCD-1234)"),
        (201, "OK"),
        (200, "OK"),
    ])
    .await;
    let client = DoiClient::new(stub.config()).unwrap();
    let mut doi = client.identifier(None).unwrap();

    client
        .register_metadata(&mut doi, "<resource/>")
        .await
        .unwrap();
    let url_body = client
        .register_url(&doi, "http://example.org/node/1")
        .await
        .unwrap();
    let deactivate_body = client.deactivate(&doi).await.unwrap();

    assert_eq!(url_body, "OK");
    assert_eq!(deactivate_body, "OK");
    assert_eq!(doi.value(), Some("10.5072/ABCD-1234"));

    let requests = stub.requests().await;
    assert_eq!(requests.len(), 3);

    let url = &requests[1];
    assert_eq!(url.method, "PUT");
    assert_eq!(url.path, "/doi/10.5072/ABCD-1234");
    assert_eq!(url.header("content-type"), Some("text/plain;charset=UTF-8"));
    assert_eq!(url.header("authorization"), Some("Basic dXNlcjpwYXNz"));
    assert_eq!(
        url.body,
        "doi=10.5072/ABCD-1234\nurl=http://example.org/node/1\n"
    );

    let deactivate = &requests[2];
    assert_eq!(deactivate.method, "DELETE");
    assert_eq!(deactivate.path, "/metadata/10.5072/ABCD-1234");
    assert_eq!(
        deactivate.header("content-type"),
        Some("text/plain;charset=UTF-8")
    );
    assert_eq!(
        deactivate.header("authorization"),
        Some("Basic dXNlcjpwYXNz")
    );
    assert!(deactivate.body.is_empty());
}

#[tokio::test]
async fn test_deactivate_unknown_doi_is_transport_error() {
    let stub = RegistryStub::start(vec![(404, "DOI not found")]).await;
    let client = DoiClient::new(stub.config()).unwrap();
    let doi = client.identifier(Some("10.5072/MISSING")).unwrap();

    let err = client.deactivate(&doi).await.unwrap_err();
    assert!(err.is_transport());
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_reserved_characters_reach_the_registry_encoded() {
    let stub = RegistryStub::start(vec![(200, "OK"), (201, "OK")]).await;
    let client = DoiClient::new(stub.config()).unwrap();
    let doi = client.identifier(Some("10.5072/A#1")).unwrap();

    client.deactivate(&doi).await.unwrap();
    client
        .register_url(&doi, "http://example.org/node/1")
        .await
        .unwrap();

    let requests = stub.requests().await;
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/metadata/10.5072/A%231");
    assert_eq!(requests[1].path, "/doi/10.5072/A%231");
    assert_eq!(
        requests[1].body,
        "doi=10.5072/A#1\nurl=http://example.org/node/1\n"
    );
}

// =============================================================================
// Timeouts and Connection Failures
// =============================================================================

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    // Accept and hold the connection without ever answering.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let config = ServiceConfig::new(format!("{base}/metadata"), format!("{base}/doi"), "10.5072")
        .with_credentials("user", "pass")
        .with_timeout(Duration::from_millis(200));
    let client = DoiClient::new(config).unwrap();
    let mut doi = client.identifier(None).unwrap();

    let err = client
        .register_metadata(&mut doi, "<resource/>")
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err}");
    assert!(!doi.is_minted());
}

#[tokio::test]
async fn test_closed_port_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = ServiceConfig::new(format!("{base}/metadata"), format!("{base}/doi"), "10.5072")
        .with_credentials("user", "pass");
    let client = DoiClient::new(config).unwrap();
    let doi = client.identifier(Some("10.5072/X")).unwrap();

    let err = client.deactivate(&doi).await.unwrap_err();
    assert!(err.is_transport());
}
