//! Upstream clients.
//!
//! Student and course payloads are passed through as JSON values; the gateway
//! only looks inside enrollments, to learn which records to fetch next.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use crate::observability::{UPSTREAM_ERRORS_TOTAL, UPSTREAM_REQUESTS_TOTAL};

/// The part of an enrollment the aggregation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentKey {
    pub student_id: i32,
    pub course_id: i32,
}

#[async_trait]
pub trait StudentClient: Send + Sync {
    async fn list(&self) -> Result<Value, GatewayError>;
    async fn get(&self, id: i32) -> Result<Value, GatewayError>;
    async fn create(&self, body: Value) -> Result<Value, GatewayError>;
    async fn update(&self, id: i32, body: Value) -> Result<Value, GatewayError>;
    async fn delete(&self, id: i32) -> Result<Value, GatewayError>;
}

#[async_trait]
pub trait CourseClient: Send + Sync {
    async fn list(&self) -> Result<Value, GatewayError>;
    async fn get(&self, id: i32) -> Result<Value, GatewayError>;
    async fn create(&self, body: Value) -> Result<Value, GatewayError>;
    async fn update(&self, id: i32, body: Value) -> Result<Value, GatewayError>;
    async fn update_capacity(&self, id: i32, capacity: i32) -> Result<Value, GatewayError>;
    async fn delete(&self, id: i32) -> Result<Value, GatewayError>;
}

#[async_trait]
pub trait EnrollmentClient: Send + Sync {
    async fn list(&self) -> Result<Value, GatewayError>;
    async fn by_student(&self, student_id: i32) -> Result<Value, GatewayError>;
    async fn by_course(&self, course_id: i32) -> Result<Value, GatewayError>;
    async fn create(&self, body: Value) -> Result<Value, GatewayError>;
    async fn remove(&self, student_id: i32, course_id: i32) -> Result<Value, GatewayError>;
    /// Push a course's seat limit into the enrollment counter.
    async fn mirror_capacity(&self, course_id: i32, capacity: i32) -> Result<Value, GatewayError>;
    async fn purge_student(&self, student_id: i32) -> Result<Value, GatewayError>;
    async fn purge_course(&self, course_id: i32) -> Result<Value, GatewayError>;
}

/// reqwest-backed implementation of all three client traits.
#[derive(Clone)]
pub struct HttpClients {
    http: Client,
    student_url: String,
    course_url: String,
    enrollment_url: String,
}

const STUDENT: &str = "student";
const COURSE: &str = "course";
const ENROLLMENT: &str = "enrollment";

impl HttpClients {
    pub fn new(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.request_timeout())
            .build()?;
        Ok(Self {
            http,
            student_url: cfg.student_url.clone(),
            course_url: cfg.course_url.clone(),
            enrollment_url: cfg.enrollment_url.clone(),
        })
    }

    async fn send(&self, upstream: &'static str, req: RequestBuilder) -> Result<Value, GatewayError> {
        UPSTREAM_REQUESTS_TOTAL.with_label_values(&[upstream]).inc();
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                UPSTREAM_ERRORS_TOTAL.with_label_values(&[upstream, "transport"]).inc();
                warn!(upstream, error = %e, timeout = e.is_timeout(), "upstream unreachable");
                return Err(GatewayError::Unavailable(upstream));
            }
        };

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| {
            UPSTREAM_ERRORS_TOTAL.with_label_values(&[upstream, "transport"]).inc();
            warn!(upstream, error = %e, "upstream body read failed");
            GatewayError::Unavailable(upstream)
        })?;

        if !status.is_success() {
            UPSTREAM_ERRORS_TOTAL.with_label_values(&[upstream, "status"]).inc();
            return Err(GatewayError::from_reply(upstream, status, &bytes));
        }
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode { upstream, detail: e.to_string() })
    }
}

#[async_trait]
impl StudentClient for HttpClients {
    async fn list(&self) -> Result<Value, GatewayError> {
        self.send(STUDENT, self.http.get(format!("{}/students", self.student_url))).await
    }

    async fn get(&self, id: i32) -> Result<Value, GatewayError> {
        self.send(STUDENT, self.http.get(format!("{}/students/{id}", self.student_url))).await
    }

    async fn create(&self, body: Value) -> Result<Value, GatewayError> {
        self.send(STUDENT, self.http.post(format!("{}/students", self.student_url)).json(&body)).await
    }

    async fn update(&self, id: i32, body: Value) -> Result<Value, GatewayError> {
        self.send(STUDENT, self.http.put(format!("{}/students/{id}", self.student_url)).json(&body)).await
    }

    async fn delete(&self, id: i32) -> Result<Value, GatewayError> {
        self.send(STUDENT, self.http.delete(format!("{}/students/{id}", self.student_url))).await
    }
}

#[async_trait]
impl CourseClient for HttpClients {
    async fn list(&self) -> Result<Value, GatewayError> {
        self.send(COURSE, self.http.get(format!("{}/courses", self.course_url))).await
    }

    async fn get(&self, id: i32) -> Result<Value, GatewayError> {
        self.send(COURSE, self.http.get(format!("{}/courses/{id}", self.course_url))).await
    }

    async fn create(&self, body: Value) -> Result<Value, GatewayError> {
        self.send(COURSE, self.http.post(format!("{}/courses", self.course_url)).json(&body)).await
    }

    async fn update(&self, id: i32, body: Value) -> Result<Value, GatewayError> {
        self.send(COURSE, self.http.put(format!("{}/courses/{id}", self.course_url)).json(&body)).await
    }

    async fn update_capacity(&self, id: i32, capacity: i32) -> Result<Value, GatewayError> {
        let req = self
            .http
            .put(format!("{}/courses/{id}/capacity", self.course_url))
            .json(&json!({ "capacity": capacity }));
        self.send(COURSE, req).await
    }

    async fn delete(&self, id: i32) -> Result<Value, GatewayError> {
        self.send(COURSE, self.http.delete(format!("{}/courses/{id}", self.course_url))).await
    }
}

#[async_trait]
impl EnrollmentClient for HttpClients {
    async fn list(&self) -> Result<Value, GatewayError> {
        self.send(ENROLLMENT, self.http.get(format!("{}/enrollments", self.enrollment_url))).await
    }

    async fn by_student(&self, student_id: i32) -> Result<Value, GatewayError> {
        let url = format!("{}/enrollments/student/{student_id}", self.enrollment_url);
        self.send(ENROLLMENT, self.http.get(url)).await
    }

    async fn by_course(&self, course_id: i32) -> Result<Value, GatewayError> {
        let url = format!("{}/enrollments/course/{course_id}", self.enrollment_url);
        self.send(ENROLLMENT, self.http.get(url)).await
    }

    async fn create(&self, body: Value) -> Result<Value, GatewayError> {
        self.send(ENROLLMENT, self.http.post(format!("{}/enrollments", self.enrollment_url)).json(&body)).await
    }

    async fn remove(&self, student_id: i32, course_id: i32) -> Result<Value, GatewayError> {
        let url = format!("{}/enrollments/{student_id}/{course_id}", self.enrollment_url);
        self.send(ENROLLMENT, self.http.delete(url)).await
    }

    async fn mirror_capacity(&self, course_id: i32, capacity: i32) -> Result<Value, GatewayError> {
        let req = self
            .http
            .put(format!("{}/enrollments/course/{course_id}", self.enrollment_url))
            .json(&json!({ "capacity": capacity }));
        self.send(ENROLLMENT, req).await
    }

    async fn purge_student(&self, student_id: i32) -> Result<Value, GatewayError> {
        let url = format!("{}/enrollments/student/{student_id}", self.enrollment_url);
        self.send(ENROLLMENT, self.http.delete(url)).await
    }

    async fn purge_course(&self, course_id: i32) -> Result<Value, GatewayError> {
        let url = format!("{}/enrollments/course/{course_id}", self.enrollment_url);
        self.send(ENROLLMENT, self.http.delete(url)).await
    }
}
