use axum::Router;
use configs::{AppConfig, ServiceEndpoint};
use models::db::{self, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

/// Which of the three record services a process hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Student,
    Course,
    Enrollment,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Student => "student-service",
            ServiceKind::Course => "course-service",
            ServiceKind::Enrollment => "enrollment-service",
        }
    }

    pub fn endpoint(self, cfg: &AppConfig) -> &ServiceEndpoint {
        match self {
            ServiceKind::Student => &cfg.services.student,
            ServiceKind::Course => &cfg.services.course,
            ServiceKind::Enrollment => &cfg.services.enrollment,
        }
    }
}

/// Bind the endpoint's listener. `host` may be an IP literal or a name.
async fn bind(endpoint: &ServiceEndpoint) -> Result<TcpListener, StartupError> {
    TcpListener::bind((endpoint.host.as_str(), endpoint.port))
        .await
        .map_err(|source| StartupError::Bind { host: endpoint.host.clone(), port: endpoint.port, source })
}

/// Router with state for `kind` over an already connected database.
pub fn app(kind: ServiceKind, db: sea_orm::DatabaseConnection) -> Router {
    routes::build_router(kind, AppState::new(db))
}

/// Public entry: connect, migrate and serve one service.
pub async fn run(kind: ServiceKind, cfg: AppConfig) -> anyhow::Result<()> {
    cfg.database.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let db = db::connect_with_config(&DatabaseConfig::from(&cfg.database)).await?;
    db::test_connection(&db).await?;
    if cfg.database.run_migrations {
        db::migrate(&db).await?;
    }

    let listener = bind(kind.endpoint(&cfg)).await?;
    let addr = listener.local_addr()?;
    info!(service = kind.name(), event = "listening", %addr);
    axum::serve(listener, app(kind, db)).await?;
    Ok(())
}
