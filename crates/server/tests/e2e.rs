use std::net::SocketAddr;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use server::{startup::app, ServiceKind};

struct TestApp {
    base_url: String,
}

async fn start_service(kind: ServiceKind) -> anyhow::Result<TestApp> {
    let db = models::db::connect_in_memory().await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let router = app(kind, db);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health_names_the_service() -> anyhow::Result<()> {
    let app = start_service(ServiceKind::Course).await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"status": "ok", "service": "course-service"}));
    Ok(())
}

#[tokio::test]
async fn e2e_student_crud() -> anyhow::Result<()> {
    let app = start_service(ServiceKind::Student).await?;
    let c = client();

    let res = c
        .post(format!("{}/students", app.base_url))
        .json(&json!({"firstName": "Grace", "lastName": "Hopper", "email": "grace@example.org", "status": "Active"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["firstName"], "Grace");
    assert!(created["createdAt"].is_string());

    let res = c
        .post(format!("{}/students", app.base_url))
        .json(&json!({"firstName": "G", "lastName": "H", "email": "grace@example.org"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let err: Value = res.json().await?;
    assert_eq!(err["code"], "DUPLICATE");

    let res = c
        .put(format!("{}/students/{id}", app.base_url))
        .json(&json!({"phone": "555-0100"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["phone"], "555-0100");
    assert_eq!(updated["lastName"], "Hopper");

    let res = c.delete(format!("{}/students/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = c.get(format!("{}/students/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: Value = res.json().await?;
    assert_eq!(err["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_input_is_validation() -> anyhow::Result<()> {
    let app = start_service(ServiceKind::Course).await?;
    let c = client();

    let res = c
        .post(format!("{}/courses", app.base_url))
        .header("content-type", "application/json")
        .body(r#"{"name": 12}"#)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert_eq!(err["code"], "VALIDATION");

    let res = c.get(format!("{}/courses/abc", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_course_capacity_update() -> anyhow::Result<()> {
    let app = start_service(ServiceKind::Course).await?;
    let c = client();

    let created: Value = c
        .post(format!("{}/courses", app.base_url))
        .json(&json!({"name": "Compilers"}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(created["capacity"], 30);
    let id = created["id"].as_i64().unwrap();

    let res = c
        .put(format!("{}/courses/{id}/capacity", app.base_url))
        .json(&json!({"capacity": 2}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["capacity"], 2);

    let res = c
        .put(format!("{}/courses/{id}/capacity", app.base_url))
        .json(&json!({"capacity": 0}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_enrollment_capacity_protocol() -> anyhow::Result<()> {
    let app = start_service(ServiceKind::Enrollment).await?;
    let c = client();
    let base = &app.base_url;

    let res = c.post(format!("{base}/enrollments")).json(&json!({"studentId": 1, "courseId": 7, "capacity": 1})).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["studentId"], 1);

    let res = c.post(format!("{base}/enrollments")).json(&json!({"studentId": 2, "courseId": 7, "capacity": 1})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert_eq!(err["code"], "CAPACITY_EXCEEDED");

    let res = c.put(format!("{base}/enrollments/course/7")).json(&json!({"capacity": 2})).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let counter: Value = res.json().await?;
    assert_eq!(counter, json!({"courseId": 7, "count": 1, "capacity": 2, "updatedAt": counter["updatedAt"]}));

    let res = c.post(format!("{base}/enrollments")).json(&json!({"studentId": 2, "courseId": 7, "capacity": 1})).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let rows: Vec<Value> = c.get(format!("{base}/enrollments/course/7")).send().await?.json().await?;
    assert_eq!(rows.len(), 2);

    let res = c.delete(format!("{base}/enrollments/3/7")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = c.delete(format!("{base}/enrollments/1/7")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let counter: Value = c.get(format!("{base}/enrollments/course/7/count")).send().await?.json().await?;
    assert_eq!(counter["count"], 1);

    let reconciled: Value = c.post(format!("{base}/enrollments/course/7/reconcile")).send().await?.json().await?;
    assert_eq!(reconciled["count"], 1);

    let removed: Value = c.delete(format!("{base}/enrollments/student/2")).send().await?.json().await?;
    assert_eq!(removed, json!({"removed": 1}));
    let removed: Value = c.delete(format!("{base}/enrollments/course/7")).send().await?.json().await?;
    assert_eq!(removed, json!({"removed": 0}));
    let res = c.get(format!("{base}/enrollments/course/7/count")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
