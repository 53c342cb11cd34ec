//! Ephemeral host - one minimal HTTP listener per materialized site
//!
//! The root route serves the site's single document; every other path gets
//! a friendly fallback body instead of an error page. Each host runs on
//! its own tokio task supervised by the controller, with an explicit
//! oneshot shutdown signal, so the session's continue prompt stays
//! reachable while sites are live.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::site::Site;

/// Body returned for any path that has no generated content behind it
const FALLBACK_BODY: &str = "Website not generated yet.";

/// Errors from binding the listener
#[derive(Debug, Error)]
pub enum HostError {
    #[error("port {port} is already in use")]
    PortInUse { port: u16 },

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
}

/// A live listener serving one site
///
/// Dropping the handle without calling [`stop`](HostHandle::stop) aborts
/// the serving task when the process exits; explicit stop drains it
/// gracefully.
#[derive(Debug)]
pub struct HostHandle {
    port: u16,
    url: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl HostHandle {
    /// Port the listener is bound to
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Browsable URL for the served document
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Signal shutdown and wait for the serving task to drain
    pub async fn stop(mut self) {
        debug!(port = self.port, "HostHandle::stop: called");
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(port = self.port, error = %e, "host task did not shut down cleanly");
        }
    }
}

/// Bind a listener on `addr:port` and serve the site's document
pub async fn host(site: &Site, addr: IpAddr, port: u16) -> Result<HostHandle, HostError> {
    let bind_addr = SocketAddr::new(addr, port);
    debug!(%bind_addr, iteration = site.iteration, "host: called");

    let listener = TcpListener::bind(bind_addr).await.map_err(|e| {
        if e.kind() == io::ErrorKind::AddrInUse {
            HostError::PortInUse { port }
        } else {
            HostError::Bind {
                addr: bind_addr,
                source: e,
            }
        }
    })?;

    let document = Arc::new(site.document.clone());
    let app = Router::new()
        .route("/", get(serve_document))
        .fallback(fallback)
        .with_state(document);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        if let Err(e) = server.await {
            warn!(error = %e, "host serving loop failed");
        }
    });

    let url = format!("http://{bind_addr}/");
    info!(%url, iteration = site.iteration, "site hosted");

    Ok(HostHandle {
        port,
        url,
        shutdown: Some(shutdown_tx),
        task,
    })
}

/// GET / - the one real route: the materialized document
async fn serve_document(State(document): State<Arc<PathBuf>>) -> Html<String> {
    match tokio::fs::read_to_string(document.as_ref()).await {
        Ok(body) => Html(body),
        Err(e) => {
            // Degrade to the fallback body rather than a server error
            debug!(document = %document.display(), error = %e, "serve_document: document unreadable");
            Html(FALLBACK_BODY.to_string())
        }
    }
}

/// Any other path: fixed friendly body, never an error page
async fn fallback() -> Html<String> {
    Html(FALLBACK_BODY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;
    use crate::site::materialize;
    use std::net::Ipv4Addr;
    use tempfile::tempdir;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    /// Grab a currently free port from the OS
    fn free_port() -> u16 {
        std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    fn sample_site(root: &std::path::Path, iteration: u32) -> Site {
        let artifact = Artifact::Fused {
            document: format!("<html><body>site {iteration}</body></html>"),
        };
        materialize(&artifact, iteration, root).unwrap()
    }

    #[tokio::test]
    async fn test_root_serves_document_other_paths_fall_back() {
        let tmp = tempdir().unwrap();
        let site = sample_site(tmp.path(), 1);
        let port = free_port();

        let handle = host(&site, LOCALHOST, port).await.unwrap();

        let root = reqwest::get(handle.url()).await.unwrap().text().await.unwrap();
        assert!(root.contains("site 1"));

        let other = reqwest::get(format!("http://127.0.0.1:{port}/does-not-exist"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(other, FALLBACK_BODY);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_unreadable_document_degrades_to_fallback() {
        let tmp = tempdir().unwrap();
        let mut site = sample_site(tmp.path(), 1);
        site.document = tmp.path().join("gone.html");
        let port = free_port();

        let handle = host(&site, LOCALHOST, port).await.unwrap();
        let body = reqwest::get(handle.url()).await.unwrap().text().await.unwrap();
        assert_eq!(body, FALLBACK_BODY);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_second_bind_on_same_port_is_port_in_use() {
        let tmp = tempdir().unwrap();
        let site = sample_site(tmp.path(), 1);
        let port = free_port();

        let first = host(&site, LOCALHOST, port).await.unwrap();
        let second = host(&site, LOCALHOST, port).await;

        match second {
            Err(HostError::PortInUse { port: p }) => assert_eq!(p, port),
            other => panic!("expected PortInUse, got {other:?}"),
        }

        first.stop().await;
    }

    #[tokio::test]
    async fn test_stop_releases_the_port() {
        let tmp = tempdir().unwrap();
        let site = sample_site(tmp.path(), 1);
        let port = free_port();

        let handle = host(&site, LOCALHOST, port).await.unwrap();
        handle.stop().await;

        // Port is free again after a graceful stop
        let again = host(&site, LOCALHOST, port).await.unwrap();
        again.stop().await;
    }
}
