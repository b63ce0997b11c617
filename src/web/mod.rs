//! Network consumer: the status page served over HTTP
//!
//! Every request gets its own store snapshot. Parsing, connection handling
//! and per-request isolation are left to actix-web; a failed request only
//! affects its own connection.

mod page;

pub use page::{StatusPage, REFRESH_SECS};

use actix_web::dev::Server;
use actix_web::http::{header, Method};
use actix_web::{error, web, App, HttpRequest, HttpResponse, HttpServer};
use log::{debug, error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use wx_station_core::{ReadingStore, Shutdown};

/// HTTP worker threads; the page is tiny, a couple is plenty
const WORKERS: usize = 2;

/// Seconds in-flight requests get to finish on shutdown
const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// What every request handler needs
#[derive(Clone)]
pub struct WebState {
    store: ReadingStore,
    page: Arc<StatusPage>,
}

impl WebState {
    pub fn new(store: ReadingStore, page: StatusPage) -> Self {
        Self {
            store,
            page: Arc::new(page),
        }
    }
}

/// Every path serves the same page
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::route().to(status));
}

async fn status(req: HttpRequest, state: web::Data<WebState>) -> actix_web::Result<HttpResponse> {
    if *req.method() != Method::GET && *req.method() != Method::HEAD {
        debug!("{} {} not supported", req.method(), req.path());
        return Ok(HttpResponse::NotImplemented().finish());
    }

    let body = state
        .page
        .render(state.store.read().as_ref())
        .map_err(|e| {
            error!("Failed to render status page: {}", e);
            error::ErrorInternalServerError(e)
        })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(body))
}

/// A bound, not yet serving, web server
pub struct WebServer {
    server: Server,
    local_addr: SocketAddr,
}

/// Bind the listener on all interfaces. Failure here is fatal to startup.
pub fn bind(port: u16, state: WebState) -> io::Result<WebServer> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes)
    })
    .workers(WORKERS)
    .disable_signals()
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
    .bind(("0.0.0.0", port))?;

    let local_addr = server
        .addrs()
        .first()
        .copied()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no address bound"))?;
    info!("Web server listening on {}", local_addr);

    Ok(WebServer {
        server: server.run(),
        local_addr,
    })
}

impl WebServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until shutdown, then let in-flight requests finish
    pub async fn serve(self, shutdown: Shutdown) {
        let handle = self.server.handle();
        let server = self.server;
        tokio::pin!(server);

        let finished_early = tokio::select! {
            result = &mut server => Some(result),
            _ = shutdown.triggered() => None,
        };
        let result = match finished_early {
            Some(result) => result,
            None => {
                handle.stop(true).await;
                server.await
            }
        };

        match result {
            Ok(()) => debug!("Web server stopped"),
            Err(e) => error!("Web server failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use wx_station_core::Reading;

    fn page() -> StatusPage {
        StatusPage::new("Weather Station", "Chapra, Bihar")
    }

    async fn call(store: &ReadingStore, req: test::TestRequest) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(WebState::new(store.clone(), page())))
                .configure(routes),
        )
        .await;
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[actix_web::test]
    async fn test_any_path_serves_the_status_page() {
        let store = ReadingStore::new();
        store.write(Reading::new(25.2, 61.0));

        for path in ["/", "/index.html", "/favicon.ico", "/a/b?c=d"] {
            let (status, body) = call(&store, test::TestRequest::get().uri(path)).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("25.2"));
            assert!(body.contains("61.0"));
        }
    }

    #[actix_web::test]
    async fn test_empty_store_renders_placeholders() {
        let (status, body) = call(&ReadingStore::new(), test::TestRequest::get()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("...&deg;C"));
        assert!(!body.contains("0.0"));
    }

    #[actix_web::test]
    async fn test_other_methods_not_implemented() {
        let store = ReadingStore::new();
        let (status, _) = call(&store, test::TestRequest::post()).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        let (status, _) = call(&store, test::TestRequest::delete().uri("/x")).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    /// Send raw bytes and collect the reply until the server closes
    async fn fetch(addr: SocketAddr, request: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request).await.unwrap();
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            match tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buf)).await {
                Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
                Ok(Ok(n)) => out.extend_from_slice(&buf[..n]),
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Pull the number in front of `marker` out of the page body
    fn value_before(body: &str, marker: &str) -> f64 {
        let end = body.find(marker).unwrap();
        let start = body[..end].rfind('>').unwrap() + 1;
        body[start..end].parse().unwrap()
    }

    fn loopback(server: &WebServer) -> SocketAddr {
        ([127, 0, 0, 1], server.local_addr().port()).into()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_during_writes_never_tear() {
        let store = ReadingStore::new();
        store.write(Reading::new(0.0, 50.0));
        let shutdown = Shutdown::new();

        let server = bind(0, WebState::new(store.clone(), page())).unwrap();
        let addr = loopback(&server);
        let serving = tokio::spawn(server.serve(shutdown.clone()));

        // Writer keeps humidity = temperature + 50
        let writer_store = store.clone();
        let writer = tokio::spawn(async move {
            for i in 0..400 {
                let t = (i % 40) as f64;
                writer_store.write(Reading::new(t, t + 50.0));
                tokio::task::yield_now().await;
            }
        });

        let clients: Vec<_> = (0..16)
            .map(|_| {
                tokio::spawn(async move {
                    let raw = fetch(addr, b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await;
                    assert!(raw.starts_with("HTTP/1.1 200 OK"));
                    let t = value_before(&raw, "&deg;C");
                    let h = value_before(&raw, "%</div>");
                    assert_eq!(h, t + 50.0);
                })
            })
            .collect();

        for client in clients {
            client.await.unwrap();
        }
        writer.await.unwrap();

        shutdown.trigger();
        serving.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_raw_requests_get_proper_status_lines() {
        let store = ReadingStore::new();
        let shutdown = Shutdown::new();
        let server = bind(0, WebState::new(store, page())).unwrap();
        let addr = loopback(&server);
        let serving = tokio::spawn(server.serve(shutdown.clone()));

        // Bare LF line endings are accepted
        let raw = fetch(addr, b"GET /status HTTP/1.1\nConnection: close\n\n").await;
        assert!(raw.starts_with("HTTP/1.1 200 OK"));

        let raw = fetch(addr, b"PUT / HTTP/1.1\r\nConnection: close\r\n\r\n").await;
        assert!(raw.starts_with("HTTP/1.1 501 Not Implemented"));

        let raw = fetch(addr, b"\x01\x02 garbage\r\n\r\n").await;
        assert!(raw.starts_with("HTTP/1.1 400 Bad Request"));

        // One broken client does not take the server down
        let raw = fetch(addr, b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await;
        assert!(raw.starts_with("HTTP/1.1 200 OK"));

        shutdown.trigger();
        serving.await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_an_error() {
        let taken = std::net::TcpListener::bind(("0.0.0.0", 0)).unwrap();
        let port = taken.local_addr().unwrap().port();
        assert!(bind(port, WebState::new(ReadingStore::new(), page())).is_err());
    }
}
