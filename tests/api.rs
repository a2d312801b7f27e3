use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use myapp::config::{AppConfig, DatabaseConfig, HttpServerConfig, LoggingConfig};
use myapp::db;
use myapp::routes::create_router;
use myapp::state::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;

fn test_config(db_url: &str) -> AppConfig {
    AppConfig {
        http: HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: db_url.to_string(),
            max_connections: 1,
        },
        logging: LoggingConfig::default(),
    }
}

async fn start_server(db_url: &str) -> (String, SqlitePool, JoinHandle<()>) {
    // One connection so every statement sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect memory sqlite");
    db::run_migrations(&pool).await.expect("migrate");

    let state = AppState::new(test_config(db_url), pool.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    (format!("http://{}", addr), pool, handle)
}

#[tokio::test]
async fn home_returns_welcome_and_audits_request() {
    let (base, pool, _srv) = start_server("sqlite::memory:").await;

    let res = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("cache-control").unwrap(),
        "no-store"
    );

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Welcome to Django Backend with Azure PostgreSQL!"
    );
    assert_eq!(body["status"], "success");
    assert_eq!(body["app"], "myapp");
    assert_eq!(body["database"], "SQLite");
    assert!(body.get("note").is_none());

    let logs = db::recent_api_logs(&pool, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].endpoint, "/");
    assert_eq!(logs[0].method, "GET");
    assert_eq!(logs[0].ip_address.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn home_reports_hosted_database_label() {
    let (base, _pool, _srv) =
        start_server("postgres://myapp.postgres.database.azure.com/myapp").await;

    let res = reqwest::get(format!("{}/", base)).await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["database"], "Azure PostgreSQL");
}

#[tokio::test]
async fn home_records_method_of_any_request() {
    let (base, pool, _srv) = start_server("sqlite::memory:").await;

    let client = reqwest::Client::new();
    let res = client.post(format!("{}/", base)).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let logs = db::recent_api_logs(&pool, 10).await.unwrap();
    assert_eq!(logs[0].method, "POST");
}

#[tokio::test]
async fn home_prefers_forwarded_for_header() {
    let (base, pool, _srv) = start_server("sqlite::memory:").await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/", base))
        .header("x-forwarded-for", "1.2.3.4, 5.6.7.8")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let logs = db::recent_api_logs(&pool, 10).await.unwrap();
    assert_eq!(logs[0].ip_address.as_deref(), Some("1.2.3.4"));
}

#[tokio::test]
async fn home_degrades_to_200_when_audit_write_fails() {
    let (base, pool, _srv) = start_server("sqlite::memory:").await;

    // Make the insert fail while keeping the pool usable for assertions.
    sqlx::query("DROP TABLE api_logs")
        .execute(&pool)
        .await
        .unwrap();

    let res = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Welcome to Django Backend!");
    assert_eq!(body["status"], "success");
    assert_eq!(body["app"], "myapp");
    assert_eq!(body["note"], "Database logging unavailable");
    assert!(body.get("database").is_none());

    // The failed call wrote nothing: a fresh table stays empty.
    db::run_migrations(&pool).await.unwrap();
    let logs = db::recent_api_logs(&pool, 10).await.unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn health_check_reports_healthy_and_writes_both_records() {
    let (base, pool, _srv) = start_server("sqlite::memory:").await;

    let res = reqwest::get(format!("{}/health/", base)).await.unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["message"], "Application is running properly");
    assert_eq!(body["database"], "connected");

    // The reported timestamp is valid RFC 3339 and matches the stored record.
    let reported = DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc);
    let statuses = db::recent_health_statuses(&pool, 10).await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].timestamp, reported);
    assert_eq!(statuses[0].status, "healthy");
    assert_eq!(statuses[0].message, "All systems operational");

    let logs = db::recent_api_logs(&pool, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].endpoint, "/health/");
}

#[tokio::test]
async fn health_check_increments_both_counts_per_call() {
    let (base, pool, _srv) = start_server("sqlite::memory:").await;

    for _ in 0..3 {
        let res = reqwest::get(format!("{}/health/", base)).await.unwrap();
        assert_eq!(res.status(), 200);
    }

    let statuses = db::recent_health_statuses(&pool, 10).await.unwrap();
    let logs = db::recent_api_logs(&pool, 10).await.unwrap();
    assert_eq!(statuses.len(), 3);
    assert_eq!(logs.len(), 3);

    // Most recent first.
    assert!(statuses.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert!(statuses[0].id > statuses[2].id);
}

#[tokio::test]
async fn health_check_reports_unhealthy_when_database_unreachable() {
    let (base, pool, _srv) = start_server("sqlite::memory:").await;
    pool.close().await;

    let res = reqwest::get(format!("{}/health/", base)).await.unwrap();
    assert_eq!(res.status(), 500);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "disconnected");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Database connection failed: "));
    assert!(body.get("timestamp").is_none());
}

#[tokio::test]
async fn home_stays_200_when_database_unreachable() {
    let (base, pool, _srv) = start_server("sqlite::memory:").await;
    pool.close().await;

    let res = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["note"], "Database logging unavailable");
}
