//! Disposable HTTP server for a single preview document
//!
//! Not a daemon: it binds a random local port, serves one document under the
//! sandbox policy, and shuts down when dropped.

use crate::{Result, SandboxError};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Response, Server};

pub struct DocumentServer {
    server: Arc<Server>,
    port: u16,
    handle: Option<thread::JoinHandle<()>>,
}

impl DocumentServer {
    /// Start serving `html` at `/` with `csp` as its Content-Security-Policy
    pub fn start(html: String, csp: &str) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();

        let server = Server::from_listener(listener, None)
            .map_err(|e| SandboxError::Server(e.to_string()))?;
        let server = Arc::new(server);

        let content_type = header("Content-Type", "text/html; charset=UTF-8")?;
        let policy = header("Content-Security-Policy", csp)?;

        let worker = Arc::clone(&server);
        let handle = thread::spawn(move || {
            for request in worker.incoming_requests() {
                let response = if request.url() == "/" {
                    Response::from_string(html.as_str())
                        .with_header(content_type.clone())
                        .with_header(policy.clone())
                } else {
                    Response::from_string("").with_status_code(404)
                };

                if let Err(e) = request.respond(response) {
                    tracing::warn!("failed to serve preview document: {}", e);
                }
            }
        });

        tracing::debug!(port, "document server started");

        Ok(Self {
            server,
            port,
            handle: Some(handle),
        })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }
}

impl Drop for DocumentServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        tracing::debug!(port = self.port, "document server stopped");
    }
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| SandboxError::Server(format!("invalid header value for {}", name)))
}
