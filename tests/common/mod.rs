/// Shared helpers for the HTTP tests: an app on in-memory stores and a
/// small request/response wrapper around `oneshot`.
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Days, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use todo_service::{
    create_router,
    task::MemoryTaskStore,
    user::MemoryUserStore,
    AppState, Config,
};
use tower::ServiceExt;

pub struct TestContext {
    pub app: Router,
    now: NaiveDateTime,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|_| {
            panic!(
                "expected JSON, got {}: {}",
                self.status,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    /// `name=value` part of the Set-Cookie header
    pub fn cookie(&self) -> String {
        self.set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .expect("response sets a cookie")
            .to_string()
    }
}

impl TestContext {
    /// App pinned to Wednesday 2024-06-12, noon.
    pub fn new() -> Self {
        Self::at(datetime("2024-06-12 12:00"))
    }

    pub fn at(now: NaiveDateTime) -> Self {
        let config = Config {
            database_url: None,
            database_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            session_hours: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let state = AppState::new(
            &config,
            Arc::new(MemoryTaskStore::new()),
            Arc::new(MemoryUserStore::new()),
        )
        .with_clock(Arc::new(move || now));

        Self {
            app: create_router(state),
            now,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn days_from_today(&self, days: u64) -> NaiveDate {
        self.today().checked_add_days(Days::new(days)).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .map(|v| v.to_str().unwrap().to_string())
        };
        let location = header_value(header::LOCATION);
        let set_cookie = header_value(header::SET_COOKIE);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            location,
            set_cookie,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        self.post_form_with_cookie(uri, form, None).await
    }

    pub async fn post_form_with_cookie(
        &self,
        uri: &str,
        form: &str,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(form.to_string())).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Ids of the tasks shown by a list view
    pub async fn list_ids(&self, filter: &str) -> Vec<i64> {
        let view = self.get(&format!("/tasks/?filter={}", filter)).await.json();
        view["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|task| task["id"].as_i64().unwrap())
            .collect()
    }
}

pub fn datetime(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
}
