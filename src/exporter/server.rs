//! HTTP listener
// (c) 2024 Ross Younger

use std::net::SocketAddr;

use anyhow::Context as _;
use axum::{extract::State, response::Html, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

const LANDING_PAGE: &str = "<html>
<head><title>IPsec Exporter</title></head>
<body>
<h1>IPsec Exporter</h1>
<p><a href='/metrics'>Metrics</a></p>
</body>
</html>";

async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn render_metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

pub(crate) fn router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/metrics", get(render_metrics))
        .with_state(handle)
}

/// Serves the landing page and metrics until interrupted
pub(crate) async fn run(address: SocketAddr, handle: PrometheusHandle) -> anyhow::Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;
    info!("Listening on {address}");
    axum::serve(listener, router(handle))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("unable to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                let _ = s.recv().await;
            }
            Err(e) => {
                error!("unable to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received terminate signal, shutting down"),
    }
}

#[cfg(test)]
mod test {
    use assertables::assert_contains;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt as _;

    use super::router;
    use crate::exporter::gauges::publish;
    use crate::ipsec::{Loader, Root};

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn landing_page_links_metrics() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let (status, body) = get(router(handle), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_contains!(body, "<a href='/metrics'>");
    }

    #[tokio::test]
    async fn metrics_are_rendered() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let configuration = Loader::new(Root::Merged {
            name: "test".into(),
            content: "conn office\n".into(),
        })
        .load()
        .unwrap();
        metrics::with_local_recorder(&recorder, || publish(&configuration));

        let (status, body) = get(router(handle), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_contains!(body, "ipsec_configured_connections 1");
        assert_contains!(body, "ipsec_connection_configured{tunnel=\"office\"} 1");
    }

    #[tokio::test]
    async fn unknown_path() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let (status, _) = get(router(handle), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
