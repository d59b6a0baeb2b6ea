//! Blocking HTTP front on `tiny_http` with a fixed worker pool.

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use hp_common::{Error, RequestId, Result};
use tiny_http::{Header, Request, Response, Server};
use tracing::{info, info_span, warn};

use crate::http::{self, Reply, ServiceError, CONTENT_TYPE_JSON};
use crate::service::PredictionService;

/// Largest request body accepted.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// A bound listener plus the service it dispatches to.
pub struct HttpServer {
    server: Arc<Server>,
    service: Arc<PredictionService>,
    workers: usize,
}

impl HttpServer {
    /// Bind `addr` (`host:port`; port 0 picks an ephemeral one).
    pub fn bind(addr: &str, service: Arc<PredictionService>, workers: usize) -> Result<Self> {
        let server = Server::http(addr).map_err(|e| Error::Server(format!("bind {addr}: {e}")))?;
        Ok(Self {
            server: Arc::new(server),
            service,
            workers: workers.max(1),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Start the worker threads and return immediately.
    pub fn spawn(self) -> Result<ServerHandle> {
        let addr = self.local_addr();
        let mut workers = Vec::with_capacity(self.workers);
        for index in 0..self.workers {
            let server = Arc::clone(&self.server);
            let service = Arc::clone(&self.service);
            let handle = thread::Builder::new()
                .name(format!("hp-http-{index}"))
                .spawn(move || {
                    for request in server.incoming_requests() {
                        serve_one(&service, request);
                    }
                })?;
            workers.push(handle);
        }
        if let Some(addr) = addr {
            info!(%addr, workers = workers.len(), "listening");
        }
        Ok(ServerHandle {
            server: self.server,
            workers,
            addr,
        })
    }

    /// Serve until every worker exits.
    pub fn run(self) -> Result<()> {
        self.spawn()?.join();
        Ok(())
    }
}

/// Running server. Dropping it leaves the workers running.
pub struct ServerHandle {
    server: Arc<Server>,
    workers: Vec<JoinHandle<()>>,
    addr: Option<SocketAddr>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    /// Wake every worker, let in-flight requests finish, and join.
    pub fn shutdown(self) {
        for _ in &self.workers {
            self.server.unblock();
        }
        self.join();
    }

    fn join(self) {
        for worker in self.workers {
            if worker.join().is_err() {
                warn!("http worker panicked");
            }
        }
    }
}

fn serve_one(service: &PredictionService, mut request: Request) {
    let request_id = RequestId::new();
    let method = request.method().clone();
    let url = request.url().to_string();
    let span = info_span!("request", request_id = %request_id, method = %method, path = %url);
    let _guard = span.enter();
    let started = Instant::now();

    let reply = match read_body(&mut request) {
        Ok(body) => http::handle(service, &method, &url, &body),
        Err(reply) => reply,
    };
    let status = reply.status;

    let mut response = Response::from_string(reply.body).with_status_code(status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], CONTENT_TYPE_JSON.as_bytes()) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        warn!(error = %e, "failed to write response");
    }

    info!(
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );
}

fn read_body(request: &mut Request) -> std::result::Result<Vec<u8>, Reply> {
    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| Reply::error(&ServiceError::InvalidBody(format!("unreadable body: {e}"))))?;
    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(Reply::error(&ServiceError::PayloadTooLarge));
    }
    Ok(body)
}
