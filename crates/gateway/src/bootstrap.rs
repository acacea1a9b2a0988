use std::sync::Arc;

use anyhow::Context;
use configs::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::clients::HttpClients;
use crate::config::GatewayConfig;
use crate::routes::build_router;
use crate::service::GatewayService;

/// Wire the reqwest clients into a [`GatewayService`].
pub fn http_gateway(cfg: &GatewayConfig) -> anyhow::Result<GatewayService> {
    let clients = Arc::new(HttpClients::new(cfg)?);
    Ok(GatewayService::new(clients.clone(), clients.clone(), clients))
}

/// Bind the gateway listener. `host` may be an IP literal or a name.
async fn bind(cfg: &GatewayConfig) -> anyhow::Result<TcpListener> {
    TcpListener::bind((cfg.host.as_str(), cfg.port))
        .await
        .with_context(|| format!("cannot bind gateway on {}:{}", cfg.host, cfg.port))
}

/// Public entry: serve the gateway until the task is dropped.
pub async fn run(app: AppConfig) -> anyhow::Result<()> {
    let cfg = GatewayConfig::from(&app);
    let gw = http_gateway(&cfg)?;
    let router = build_router(gw, &cfg.path_prefix);

    let listener = bind(&cfg).await?;
    let addr = listener.local_addr()?;
    info!(
        service = "gateway",
        event = "listening",
        %addr,
        prefix = %cfg.path_prefix,
        students = %cfg.student_url,
        courses = %cfg.course_url,
        enrollments = %cfg.enrollment_url,
    );
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hostname_binds() {
        let mut app = AppConfig::default();
        app.server.host = "localhost".into();
        app.normalize_and_validate().unwrap();
        let mut cfg = GatewayConfig::from(&app);
        cfg.port = 0;
        let listener = bind(&cfg).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
