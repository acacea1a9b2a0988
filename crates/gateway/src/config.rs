use std::time::Duration;

use configs::AppConfig;

/// Everything the gateway process needs, resolved from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub path_prefix: String,
    pub student_url: String,
    pub course_url: String,
    pub enrollment_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl From<&AppConfig> for GatewayConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            host: cfg.server.host.clone(),
            port: cfg.server.port,
            path_prefix: cfg.server.path_prefix.clone(),
            student_url: cfg.services.student.url.clone(),
            course_url: cfg.services.course.url.clone(),
            enrollment_url: cfg.services.enrollment.url.clone(),
            connect_timeout_secs: cfg.services.connect_timeout_secs,
            request_timeout_secs: cfg.services.request_timeout_secs,
        }
    }
}

impl GatewayConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
