//! Exo Philos server
//!
//! Philosophy essay subject analysis over HTTP, or one-shot from the CLI.
//!
//! Run with: cargo run -- --serve [--port=8000]

use anyhow::{Context, Result};
use exo_philos::{AnalysisError, KnowledgeBase, PhilosophyService, ServiceConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Larger bodies are rejected with 413
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Request line plus headers; larger heads are rejected with 431
const MAX_HEAD_BYTES: u64 = 8 * 1024;

/// Time allowed to receive a whole request
const READ_TIMEOUT: Duration = Duration::from_secs(10);

const USAGE: &str = "\
Usage:
  exo-philos analyze <subject>     Analyze one subject, print JSON
  exo-philos exercises <subject>   Print practice exercises for a subject
  exo-philos --random              Print a random subject
  exo-philos --concepts            Print the concept catalog as JSON
  exo-philos --health              Initialize and print component readiness
  exo-philos --train               Retrain and save the theme classifier
  exo-philos --serve [--port=N]    Run the HTTP API";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = ServiceConfig::from_env()?;

    if args.len() > 1 {
        match args[1].as_str() {
            "analyze" => {
                let subject = args[2..].join(" ");
                return run_analyze(config, &subject).await;
            }
            "exercises" => {
                let subject = args[2..].join(" ");
                let service = init_service(config).await?;
                println!("{}", serde_json::to_string_pretty(&service.exercises(&subject)?)?);
                return Ok(());
            }
            "--random" => {
                let subject = exo_philos::analyzer::random_subject(&mut rand::thread_rng());
                println!("{}", subject);
                return Ok(());
            }
            "--concepts" => {
                let kb = KnowledgeBase::builtin();
                println!("{}", serde_json::to_string_pretty(kb.all())?);
                return Ok(());
            }
            "--health" => {
                let service = init_service(config).await?;
                println!("{}", serde_json::to_string_pretty(&service.health())?);
                return Ok(());
            }
            "--train" => {
                let mut service = init_service(config).await?;
                tokio::task::spawn_blocking(move || service.retrain()).await??;
                println!("Theme classifier retrained");
                return Ok(());
            }
            "--serve" => {
                let port: Option<u16> = args
                    .iter()
                    .find_map(|a| a.strip_prefix("--port="))
                    .map(|p| p.parse().with_context(|| format!("Invalid port: {}", p)))
                    .transpose()?;
                let config = match port {
                    Some(port) => config.with_port(port),
                    None => config,
                };
                return run_http_server(config).await;
            }
            s if !s.starts_with("--") => {
                // Bare subject
                let subject = args[1..].join(" ");
                return run_analyze(config, &subject).await;
            }
            other => {
                eprintln!("Unknown option: {}\n\n{}", other, USAGE);
                std::process::exit(2);
            }
        }
    }

    println!("{}", USAGE);
    Ok(())
}

/// Build the service off the async workers; loading may train a model
async fn init_service(config: ServiceConfig) -> Result<PhilosophyService> {
    tokio::task::spawn_blocking(move || PhilosophyService::init(config)).await?
}

async fn run_analyze(config: ServiceConfig, subject: &str) -> Result<()> {
    let service = init_service(config).await?;
    let result = service.analyze(subject)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

// ============================================================================
// HTTP server
// ============================================================================

async fn run_http_server(config: ServiceConfig) -> Result<()> {
    let bind = config.bind;
    let service = Arc::new(init_service(config).await?);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!("Listening on http://{}", bind);

    loop {
        let (stream, peer) = listener.accept().await?;
        let service = Arc::clone(&service);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, service, READ_TIMEOUT).await {
                tracing::warn!("Request from {} failed: {:#}", peer, e);
            }
        });
    }
}

/// Read one request, answer it, close the connection
async fn handle_connection<S>(stream: S, service: Arc<PhilosophyService>, read_timeout: Duration) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let allowed_origin = service.config().allowed_origin.clone();

    let (label, response) = match tokio::time::timeout(read_timeout, read_request(&mut reader)).await {
        Err(_) => ("(incomplete request)".to_string(), Response::error(408, "Délai de requête dépassé")),
        Ok(read) => match read? {
            Ok(request) => {
                let label = format!("{} {}", request.method, request.target);
                let response =
                    tokio::task::spawn_blocking(move || route(&service, &request.method, &request.target, &request.body))
                        .await?;
                (label, response)
            }
            Err(rejection) => ("(rejected request)".to_string(), rejection),
        },
    };
    tracing::info!("{} -> {}", label, response.status);

    let bytes = response.to_http(&allowed_origin)?;
    write_half.write_all(&bytes).await?;
    write_half.flush().await?;
    write_half.shutdown().await?;
    Ok(())
}

struct Request {
    method: String,
    target: String,
    body: Vec<u8>,
}

/// Parse the request line, headers and body. The inner `Err` is a response
/// for a request that will not be routed.
async fn read_request<R>(reader: &mut R) -> Result<std::result::Result<Request, Response>>
where
    R: AsyncBufRead + Unpin,
{
    let mut head = (&mut *reader).take(MAX_HEAD_BYTES);

    let mut request_line = String::new();
    head.read_line(&mut request_line).await?;
    if !request_line.ends_with('\n') && head.limit() == 0 {
        return Ok(Err(Response::error(431, "En-têtes trop volumineux")));
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("/").to_string();

    let mut content_length: usize = 0;
    loop {
        let mut header = String::new();
        head.read_line(&mut header).await?;
        if !header.ends_with('\n') && head.limit() == 0 {
            return Ok(Err(Response::error(431, "En-têtes trop volumineux")));
        }
        if header.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = match value.trim().parse() {
                    Ok(len) => len,
                    Err(_) => return Ok(Err(Response::error(400, "En-tête Content-Length invalide"))),
                };
            }
        }
    }

    if content_length > MAX_BODY_BYTES {
        return Ok(Err(Response::error(413, "Requête trop volumineuse")));
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;

    Ok(Ok(Request { method, target, body }))
}

struct Response {
    status: u16,
    body: Option<Value>,
}

impl Response {
    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    fn error(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(json!({ "detail": detail.into() })),
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    fn to_http(&self, allowed_origin: &str) -> Result<Vec<u8>> {
        let body = match &self.body {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };

        let mut head = format!(
            "HTTP/1.1 {} {}\r\n\
             Access-Control-Allow-Origin: {}\r\n\
             Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
             Access-Control-Allow-Headers: Content-Type\r\n\
             Connection: close\r\n\
             Content-Length: {}\r\n",
            self.status,
            reason(self.status),
            allowed_origin,
            body.len()
        );
        if self.body.is_some() {
            head.push_str("Content-Type: application/json\r\n");
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(body.as_bytes());
        Ok(bytes)
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        _ => "Internal Server Error",
    }
}

#[derive(Deserialize)]
struct SubjectRequest {
    subject: String,
}

fn route(service: &PhilosophyService, method: &str, target: &str, body: &[u8]) -> Response {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let result = match (method, path) {
        ("OPTIONS", _) => return Response::no_content(),
        ("GET", "/") => Ok(json!({
            "message": "Exo Philos API - Backend d'analyse philosophique",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        ("GET", "/health") => serde_json::to_value(service.health()).map_err(anyhow::Error::from),
        ("POST", "/analyze") => return with_subject(body, |subject| service.analyze(subject)),
        ("POST", "/exercises") => return with_subject(body, |subject| service.exercises(subject)),
        ("GET", "/random-subject") => Ok(json!({ "subject": service.random_subject() })),
        ("GET", "/concepts") => Ok(json!({ "concepts": service.list_concepts() })),
        ("GET", "/concepts/search") => match query_param(query, "q") {
            Some(q) => Ok(json!({ "concepts": service.search_concepts(&q) })),
            None => return Response::error(400, "Paramètre 'q' manquant"),
        },
        ("GET", "/citations") => {
            let theme = query_param(query, "theme");
            Ok(json!({ "citations": service.citations(theme.as_deref()) }))
        }
        ("GET", "/citations/random") => {
            let theme = query_param(query, "theme");
            match service.random_citation(theme.as_deref()) {
                Some(citation) => Ok(json!(citation)),
                None => return Response::error(404, "Aucune citation pour ce thème"),
            }
        }
        (
            _,
            "/" | "/health" | "/analyze" | "/exercises" | "/random-subject" | "/concepts" | "/concepts/search"
            | "/citations" | "/citations/random",
        ) => return Response::error(405, "Méthode non autorisée"),
        _ => return Response::error(404, "Not Found"),
    };

    match result {
        Ok(value) => Response::ok(value),
        Err(e) => {
            tracing::error!("{} {} failed: {:#}", method, path, e);
            Response::error(500, "Erreur interne du serveur")
        }
    }
}

/// Decode a `{"subject": ...}` body and answer with the subject operation
fn with_subject<T, F>(body: &[u8], operation: F) -> Response
where
    T: Serialize,
    F: FnOnce(&str) -> std::result::Result<T, AnalysisError>,
{
    let request: SubjectRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => return Response::error(400, format!("Corps de requête invalide: {}", e)),
    };

    match operation(&request.subject) {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => Response::ok(value),
            Err(e) => {
                tracing::error!("Failed to serialize analysis: {}", e);
                Response::error(500, format!("Erreur d'analyse: {}", AnalysisError::Failed))
            }
        },
        Err(e) if e.is_validation() => Response::error(400, e.to_string()),
        Err(e) => Response::error(500, format!("Erreur d'analyse: {}", e)),
    }
}

/// First value of `key` in a URL query string, percent-decoded
fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exo_philos::RANDOM_SUBJECTS;
    use tempfile::TempDir;

    fn service() -> (TempDir, Arc<PhilosophyService>) {
        let dir = TempDir::new().unwrap();
        let service = PhilosophyService::init(ServiceConfig::rooted_at(dir.path())).unwrap();
        (dir, Arc::new(service))
    }

    fn exchange(service: &Arc<PhilosophyService>, request: &str) -> String {
        exchange_within(service, request, READ_TIMEOUT)
    }

    fn exchange_within(service: &Arc<PhilosophyService>, request: &str, timeout: Duration) -> String {
        tokio_test::block_on(async {
            let (mut client, server) = tokio::io::duplex(256 * 1024);
            client.write_all(request.as_bytes()).await.unwrap();
            handle_connection(server, Arc::clone(service), timeout).await.unwrap();
            let mut response = String::new();
            client.read_to_string(&mut response).await.unwrap();
            response
        })
    }

    fn json_body(response: &str) -> Value {
        let (_, body) = response.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn post(path: &str, body: &str) -> String {
        format!(
            "POST {} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            path,
            body.len(),
            body
        )
    }

    #[test]
    fn test_health_endpoint() {
        let (_dir, service) = service();
        let response = exchange(&service, "GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("Access-Control-Allow-Origin: http://localhost:3000"));
        let body = json_body(&response);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["classifierReady"], true);
    }

    #[test]
    fn test_analyze_endpoint() {
        let (_dir, service) = service();
        let response = exchange(&service, &post("/analyze", r#"{"subject":"Le temps nous appartient-il ?"}"#));
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        let body = json_body(&response);
        assert_eq!(body["dialecticalPlan"].as_array().unwrap().len(), 3);
        assert!(body["philosophers"].as_array().unwrap().len() <= 5);
    }

    #[test]
    fn test_analyze_validation_is_400() {
        let (_dir, service) = service();
        let response = exchange(&service, &post("/analyze", r#"{"subject":"   "}"#));
        assert!(response.starts_with("HTTP/1.1 400"));
        assert_eq!(json_body(&response)["detail"], "subject is empty");

        let response = exchange(&service, &post("/analyze", "not json"));
        assert!(response.starts_with("HTTP/1.1 400"));
    }

    #[test]
    fn test_random_subject_and_concepts() {
        let (_dir, service) = service();
        let body = json_body(&exchange(&service, "GET /random-subject HTTP/1.1\r\n\r\n"));
        assert!(RANDOM_SUBJECTS.contains(&body["subject"].as_str().unwrap()));

        let body = json_body(&exchange(&service, "GET /concepts HTTP/1.1\r\n\r\n"));
        assert_eq!(body["concepts"].as_array().unwrap().len(), 10);
        assert_eq!(body["concepts"][0]["relatedThinkers"][0], "Sartre");
    }

    #[test]
    fn test_search_decodes_query() {
        let (_dir, service) = service();
        let body = json_body(&exchange(&service, "GET /concepts/search?q=dur%C3%A9e HTTP/1.1\r\n\r\n"));
        assert_eq!(body["concepts"][0]["name"], "Temps");

        let response = exchange(&service, "GET /concepts/search HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 400"));
    }

    #[test]
    fn test_citations_by_theme() {
        let (_dir, service) = service();
        let body = json_body(&exchange(&service, "GET /citations?theme=Libert%C3%A9 HTTP/1.1\r\n\r\n"));
        let citations = body["citations"].as_array().unwrap();
        assert!(!citations.is_empty());
        assert!(citations.iter().all(|c| c["theme"] == "Liberté"));

        let response = exchange(&service, "GET /citations/random?theme=Cuisine HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 404"));
    }

    #[test]
    fn test_preflight_and_unknown_routes() {
        let (_dir, service) = service();
        let response = exchange(&service, "OPTIONS /analyze HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 204 No Content"));
        assert!(response.contains("Access-Control-Allow-Methods: GET, POST, OPTIONS"));

        assert!(exchange(&service, "GET /nowhere HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 404"));
        assert!(exchange(&service, "GET /analyze HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 405"));
    }

    #[test]
    fn test_exercises_endpoint() {
        let (_dir, service) = service();
        let response = exchange(&service, &post("/exercises", r#"{"subject":"La liberté est-elle une illusion ?"}"#));
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        let body = json_body(&response);
        assert!(!body["quiz"].as_array().unwrap().is_empty());
        assert_eq!(body["planBuilder"]["correctPlan"].as_array().unwrap().len(), 3);
        assert_eq!(body["problematization"].as_array().unwrap().len(), 3);

        let response = exchange(&service, &post("/exercises", r#"{"subject":""}"#));
        assert!(response.starts_with("HTTP/1.1 400"));
        assert!(exchange(&service, "GET /exercises HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 405"));
    }

    #[test]
    fn test_oversized_body_rejected() {
        let (_dir, service) = service();
        let request = format!("POST /analyze HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_BODY_BYTES + 1);
        assert!(exchange(&service, &request).starts_with("HTTP/1.1 413"));
    }

    #[test]
    fn test_oversized_request_line_rejected() {
        let (_dir, service) = service();
        let path = "a".repeat(MAX_HEAD_BYTES as usize);
        let request = format!("GET /{} HTTP/1.1\r\n\r\n", path);
        assert!(exchange(&service, &request).starts_with("HTTP/1.1 431"));
    }

    #[test]
    fn test_oversized_headers_rejected() {
        let (_dir, service) = service();
        let padding = "b".repeat(MAX_HEAD_BYTES as usize);
        let request = format!("GET /health HTTP/1.1\r\nX-Padding: {}\r\n\r\n", padding);
        assert!(exchange(&service, &request).starts_with("HTTP/1.1 431"));
    }

    #[test]
    fn test_invalid_content_length_is_400() {
        let (_dir, service) = service();
        let request = "POST /analyze HTTP/1.1\r\nContent-Length: douze\r\n\r\n{}";
        let response = exchange(&service, request);
        assert!(response.starts_with("HTTP/1.1 400"));
        assert_eq!(json_body(&response)["detail"], "En-tête Content-Length invalide");
    }

    #[test]
    fn test_stalled_request_times_out() {
        let (_dir, service) = service();
        // Headers never terminated
        let response = exchange_within(&service, "GET /health HTTP/1.1\r\nHost: x\r\n", Duration::from_millis(50));
        assert!(response.starts_with("HTTP/1.1 408 Request Timeout"));
    }
}
