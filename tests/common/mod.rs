//! Common test utilities

use bannerwheel::feed::{FeedServer, FeedServerConfig};
use bannerwheel::models::Ad;
use bannerwheel::pool::AdPool;
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Create a test ad with placeholder text fields
pub fn ad(title: &str) -> Ad {
    Ad::new(
        title,
        format!("{title} subtitle"),
        format!("{title} description"),
        "Sign up",
        "#4ECDC4",
    )
}

/// Pool of four ads titled A, B, C and D
pub fn abcd_pool() -> AdPool {
    AdPool::new(["A", "B", "C", "D"].into_iter().map(ad).collect())
}

/// Feed server config suitable for tests
#[allow(dead_code)]
pub fn test_config() -> FeedServerConfig {
    FeedServerConfig::builder()
        .bind_address_str("127.0.0.1:0")
        .expect("valid address")
        .enable_request_logging(false)
        .build()
        .expect("valid config")
}

/// Running feed server bound to an ephemeral port
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    /// Bind and serve `pool` on 127.0.0.1
    pub async fn start(pool: AdPool) -> Self {
        let server = FeedServer::with_pool(test_config(), pool).expect("server");
        let listener = server.bind().await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
                .expect("serve");
        });

        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    /// Absolute URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger graceful shutdown and wait for the server task
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.handle).await;
    }
}
