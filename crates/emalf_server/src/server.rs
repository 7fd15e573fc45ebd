//! Blocking HTTP accept loop over `tiny_http`.
//!
//! # Invariants
//! - Requests are handled one at a time on the calling thread.
//! - The shutdown flag is observed at least every [`POLL_INTERVAL`].
//! - A failed response write never stops the loop.

use crate::cors::CorsPolicy;
use crate::router::{self, ApiResponse, Method};
use emalf_core::IdeaStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tiny_http::{Header, Request, Response, Server};

/// How long one `recv` waits before re-checking the shutdown flag.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);
const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug)]
pub enum ServerError {
    Bind { addr: String, message: String },
    Accept(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bind { addr, message } => write!(f, "failed to bind `{addr}`: {message}"),
            Self::Accept(err) => write!(f, "failed to accept request: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bind { .. } => None,
            Self::Accept(err) => Some(err),
        }
    }
}

/// Bound listener serving the idea API.
pub struct ApiServer {
    http: Server,
    cors: CorsPolicy,
}

impl ApiServer {
    /// Binds to `addr` (`127.0.0.1:0` picks a free port).
    pub fn bind(addr: &str, cors: CorsPolicy) -> Result<Self, ServerError> {
        let http = Server::http(addr).map_err(|err| ServerError::Bind {
            addr: addr.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self { http, cors })
    }

    /// Actual listening address, resolved after binding.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serves requests against `store` until `shutdown` becomes `true`.
    pub fn serve<S: IdeaStore>(&self, store: &mut S, shutdown: &AtomicBool) -> Result<(), ServerError> {
        info!(
            "event=server_start module=server status=ok addr={}",
            self.local_addr()
                .map_or_else(|| "unknown".to_string(), |addr| addr.to_string())
        );

        while !shutdown.load(Ordering::Relaxed) {
            match self.http.recv_timeout(POLL_INTERVAL) {
                Ok(Some(request)) => self.respond(store, request),
                Ok(None) => {}
                Err(err) => return Err(ServerError::Accept(err)),
            }
        }

        info!("event=server_stop module=server status=ok");
        Ok(())
    }

    fn respond<S: IdeaStore>(&self, store: &mut S, mut request: Request) {
        let started_at = Instant::now();
        let method = map_method(request.method());
        let url = request.url().to_string();
        let origin = header_value(&request, "Origin");

        let mut body = Vec::new();
        let response = match request
            .as_reader()
            .take(MAX_BODY_BYTES + 1)
            .read_to_end(&mut body)
        {
            Ok(_) if body.len() as u64 > MAX_BODY_BYTES => ApiResponse {
                status: 413,
                body: Some(r#"{"detail":"Request body too large"}"#.to_string()),
            },
            Ok(_) => router::handle(store, method, &url, &body),
            Err(err) => {
                warn!("event=read_body module=server status=error error={err}");
                ApiResponse {
                    status: 400,
                    body: Some(r#"{"detail":"Unreadable request body"}"#.to_string()),
                }
            }
        };

        let status = response.status;
        let http_response = self.to_http_response(response, origin.as_deref());
        let path = url.split('?').next().unwrap_or_default();
        match request.respond(http_response) {
            Ok(()) => info!(
                "event=http_request module=server status={status} method={method:?} path={path} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=http_request module=server status=write_error method={method:?} path={path} error={err}"
            ),
        }
    }

    fn to_http_response(
        &self,
        response: ApiResponse,
        origin: Option<&str>,
    ) -> Response<std::io::Cursor<Vec<u8>>> {
        let has_body = response.body.is_some();
        let mut http_response = Response::from_string(response.body.unwrap_or_default())
            .with_status_code(response.status);

        let mut headers = Vec::new();
        if has_body {
            headers.push(("Content-Type", "application/json".to_string()));
        }
        if let Some(allowed) = self.cors.allow_origin(origin) {
            headers.push(("Access-Control-Allow-Origin", allowed));
            headers.push((
                "Access-Control-Allow-Methods",
                "GET, POST, OPTIONS".to_string(),
            ));
            headers.push(("Access-Control-Allow-Headers", "Content-Type".to_string()));
        }

        for (name, value) in headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => http_response.add_header(header),
                Err(()) => warn!("event=build_header module=server status=error header={name}"),
            }
        }
        http_response
    }
}

fn map_method(method: &tiny_http::Method) -> Method {
    match method {
        tiny_http::Method::Get => Method::Get,
        tiny_http::Method::Post => Method::Post,
        tiny_http::Method::Options => Method::Options,
        _ => Method::Other,
    }
}

fn header_value(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_string())
}
