//! Web server for NetLink.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::{NetlinkError, Result};

use super::handlers::AppState;
use super::middleware::RateLimitState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Rate limiter for the credential endpoints.
    rate_limit: Arc<RateLimitState>,
    /// Full configuration.
    config: Config,
    /// Directory served under `/images`.
    images_dir: PathBuf,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, app_state: AppState, images_dir: impl Into<PathBuf>) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| NetlinkError::Config(format!("invalid server address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            rate_limit: Arc::new(
                RateLimitState::new(config.web.auth_rate_limit)
                    .with_trust_proxy(config.web.trust_proxy),
            ),
            config: config.clone(),
            images_dir: images_dir.into(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn router(&self) -> Router {
        create_router(
            self.app_state.clone(),
            self.rate_limit.clone(),
            &self.config,
            &self.images_dir,
        )
    }

    async fn bind(&self) -> Result<(TcpListener, Router)> {
        let listener = TcpListener::bind(self.addr).await?;
        let router = self.router();

        self.rate_limit.clone().start_cleanup_task();
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);
        Ok((listener, router))
    }

    /// Run the web server until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::mail::SmtpMailer;
    use crate::media::LocalImageStore;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn create_server(dir: &TempDir) -> WebServer {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.auth.jwt_secret = "test-secret-key".to_string();

        let db = Database::open_in_memory().await.unwrap();
        let images = LocalImageStore::new(dir.path(), "http://localhost/images", 1).unwrap();
        let mailer = SmtpMailer::new(&config.mail).unwrap();
        let state = AppState::new(&config, db, Arc::new(images), Arc::new(mailer)).unwrap();
        WebServer::new(&config, state, dir.path()).unwrap()
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let dir = TempDir::new().unwrap();
        let server = create_server(&dir).await;
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let mut config = Config::default();
        config.server.host = "not an address".to_string();
        config.auth.jwt_secret = "s".to_string();
        let dir = TempDir::new().unwrap();
        let db = Database::open_in_memory().await.unwrap();
        let images = LocalImageStore::new(dir.path(), "http://localhost/images", 1).unwrap();
        let mailer = SmtpMailer::new(&config.mail).unwrap();
        let state = AppState::new(&config, db, Arc::new(images), Arc::new(mailer)).unwrap();

        assert!(matches!(
            WebServer::new(&config, state, dir.path()),
            Err(NetlinkError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_health() {
        let dir = TempDir::new().unwrap();
        let addr = create_server(&dir).await.run_with_addr().await.unwrap();

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("OK"));
    }
}
