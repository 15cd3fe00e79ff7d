//! Registry server
//!
//! One tokio accept loop serving HTTP/1.1 connections, a startup scan of
//! the serve directory, and the directory watcher on its own thread.
//! Only failing to bind the listener ends `serve` with an error; scan and
//! watcher problems are logged and the server keeps running.

use std::convert::Infallible;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::RegistryConfig;
use crate::domain::ports::{IndexTool, Signer};
use crate::error::{BridgeError, BridgeResult};
use crate::infrastructure::fs::expand_home;

use super::{router, watcher, Indexer, RegistryState};

pub struct RegistryServer {
    listen: String,
    state: Arc<RegistryState>,
}

impl RegistryServer {
    pub fn new(config: &RegistryConfig, signer: Arc<dyn Signer>, tool: Arc<dyn IndexTool>) -> Self {
        let dir = expand_home(&config.serve_dir);
        let indexer = Arc::new(Indexer::new(
            &dir,
            &config.repo_name,
            config.prevent_downgrade,
            tool,
        ));
        Self {
            listen: config.listen.clone(),
            state: Arc::new(RegistryState::new(dir, signer, indexer)),
        }
    }

    /// Run until Ctrl-C on a multi-threaded runtime
    pub fn serve(&self) -> BridgeResult<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(async {
            let listener = TcpListener::bind(self.listen.as_str()).await.map_err(|e| {
                BridgeError::Io(std::io::Error::new(
                    e.kind(),
                    format!("unable to listen on {}: {}", self.listen, e),
                ))
            })?;
            self.serve_on(listener, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("unable to wait for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            })
            .await
        })
    }

    /// Prepare the serve directory, then accept connections on `listener`
    /// until `shutdown` resolves.
    pub async fn serve_on<F>(&self, listener: TcpListener, shutdown: F) -> BridgeResult<()>
    where
        F: Future<Output = ()>,
    {
        let dir = self.state.dir.clone();
        tokio::fs::create_dir_all(&dir).await?;

        let indexer = Arc::clone(&self.state.indexer);
        match tokio::task::spawn_blocking(move || indexer.scan()).await {
            Ok(Ok(changed)) => debug!("startup scan indexed {} packages", changed),
            Ok(Err(e)) => warn!("startup scan of {} failed: {}", dir.display(), e),
            Err(e) => warn!("startup scan of {} failed: {}", dir.display(), e),
        }

        let stop = Arc::new(AtomicBool::new(false));
        let watcher = match watcher::spawn(Arc::clone(&self.state.indexer), Arc::clone(&stop)) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("{}; new files will only be indexed on push", e);
                None
            }
        };

        if let Ok(addr) = listener.local_addr() {
            info!(
                "serving repository {} from {} on {}",
                self.state.indexer.repo(),
                dir.display(),
                addr
            );
        }
        accept_loop(listener, Arc::clone(&self.state), shutdown).await;

        stop.store(true, Ordering::SeqCst);
        if let Some(handle) = watcher {
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
        }
        info!("registry stopped");
        Ok(())
    }
}

async fn accept_loop<F>(listener: TcpListener, state: Arc<RegistryState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
            },
        };
        let io = TokioIo::new(stream);
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(router::route(state, req).await) }
            });
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("connection from {} ended: {}", peer, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ToolError, ToolResult};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    struct RejectAll;

    impl Signer for RejectAll {
        fn identity(&self) -> ToolResult {
            Err(ToolError::new("gpg", Some(2), "no key"))
        }
        fn verify(&self, _: &Path, _: &Path) -> ToolResult {
            Err(ToolError::new("gpg", Some(1), "BAD signature"))
        }
        fn export_public_key(&self, _: &str) -> ToolResult {
            Err(ToolError::new("gpg", Some(2), "no key"))
        }
    }

    struct NoopTool;

    impl IndexTool for NoopTool {
        fn add(&self, _: &Path, _: &Path, _: bool) -> ToolResult {
            Ok(String::new())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn serves_scanned_directory_over_tcp_until_shutdown() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a-1.0-1-any.pkg.tar.zst"), b"artifact").unwrap();
        let config = RegistryConfig {
            listen: "127.0.0.1:0".to_string(),
            serve_dir: dir.path().to_path_buf(),
            repo_name: "main".to_string(),
            prevent_downgrade: true,
        };
        let server = Arc::new(RegistryServer::new(&config, Arc::new(RejectAll), Arc::new(NoopTool)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let running = {
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                server
                    .serve_on(listener, async {
                        let _ = stopped.await;
                    })
                    .await
            })
        };

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /repo/a-1.0-1-any.pkg.tar.zst HTTP/1.1\r\nhost: x\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.ends_with("artifact"));

        // The startup scan indexed the pre-existing artifact.
        assert!(dir.path().join("main.index.toml").exists());

        stop.send(()).unwrap();
        running.await.unwrap().unwrap();
    }
}
