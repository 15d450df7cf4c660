//! HTTP/1 server loop.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::handlers::{json_error, Handlers, HttpResponse, MSG_BODY_TOO_LARGE, MSG_INVALID_JSON};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// A bound listener ready to serve the device API.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Bind to `addr`. Port 0 picks a free port; see [`local_addr`](Self::local_addr).
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until `shutdown` completes.
    ///
    /// Each connection runs on its own task. Connections already accepted
    /// when `shutdown` fires are left to finish on their own.
    pub async fn serve<F>(self, handlers: Arc<Handlers>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                },
                _ = &mut shutdown => {
                    info!("shutdown requested, no longer accepting connections");
                    break;
                }
            };

            let io = TokioIo::new(stream);
            let handlers = handlers.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let handlers = handlers.clone();
                    async move { Ok::<_, Infallible>(handle_request(&handlers, req).await) }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(peer = %peer, error = %e, "connection error");
                }
            });
        }

        Ok(())
    }
}

async fn handle_request(handlers: &Handlers, req: Request<Incoming>) -> HttpResponse {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match Limited::new(req.into_body(), MAX_BODY_BYTES).collect().await {
        Ok(body) => handlers.dispatch(&method, &path, &body.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            warn!(method = %method, path = %path, "request body too large");
            json_error(StatusCode::PAYLOAD_TOO_LARGE, MSG_BODY_TOO_LARGE)
        }
        Err(e) => {
            warn!(method = %method, path = %path, error = %e, "failed to read request body");
            json_error(StatusCode::BAD_REQUEST, MSG_INVALID_JSON)
        }
    };

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}
