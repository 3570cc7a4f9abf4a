//! Doc server tests against an ephemeral port

use infomark_tools::serve::{self, endpoint_url, DEFAULT_PORT};
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
    _dir: TempDir,
}

async fn start() -> TestServer {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("swagger")).unwrap();
    std::fs::write(
        dir.path().join("swagger").join("index.html"),
        "<html>swagger</html>",
    )
    .unwrap();
    std::fs::write(dir.path().join("api.yaml"), "openapi: 3.0.0\n").unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve::serve(listener, dir.path().to_path_buf(), async move {
        let _ = rx.await;
    }));

    TestServer {
        addr,
        shutdown,
        handle,
        _dir: dir,
    }
}

impl TestServer {
    async fn stop(self) {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap().unwrap();
    }
}

#[test]
fn test_endpoint_url() {
    assert_eq!(
        endpoint_url(DEFAULT_PORT),
        "http://localhost:8000/swagger/index.html"
    );
}

#[tokio::test]
async fn test_serves_swagger_index_with_cors() {
    let server = start().await;

    let resp = reqwest::get(format!("http://{}/swagger/index.html", server.addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert_eq!(resp.text().await.unwrap(), "<html>swagger</html>");

    server.stop().await;
}

#[tokio::test]
async fn test_serves_plain_files() {
    let server = start().await;

    let resp = reqwest::get(format!("http://{}/api.yaml", server.addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "openapi: 3.0.0\n");

    server.stop().await;
}

#[tokio::test]
async fn test_missing_file_still_has_cors() {
    let server = start().await;

    let resp = reqwest::get(format!("http://{}/nope.html", server.addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    server.stop().await;
}
