//! In-memory test harness driving the full axum router.
//!
//! Stores and the OTP verifier are the in-memory implementations from
//! `kernel::test_dependencies`, so no database or provider is needed.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use langbridge_core::kernel::{MockOtpVerifier, TestDependencies};
use langbridge_core::server::build_app;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub deps: TestDependencies,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_verifier(MockOtpVerifier::new())
    }

    pub fn with_verifier(otp: MockOtpVerifier) -> Self {
        Self::build(otp, &["*".to_string()])
    }

    /// App whose CORS layer allows only `origins`
    pub fn with_origins(origins: &[&str]) -> Self {
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        Self::build(MockOtpVerifier::new(), &origins)
    }

    fn build(otp: MockOtpVerifier, origins: &[String]) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = TestDependencies::with_verifier(otp);
        let router = build_app(deps.server_deps(), origins);
        Self { router, deps }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    pub async fn post_authed(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn get_authed(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    /// Run the app OTP flow for `phone` and return the issued token
    pub async fn login(&self, phone: &str) -> String {
        let sent = self
            .post("/otp/send", serde_json::json!({ "phoneNumber": phone }))
            .await;
        assert_eq!(sent.status, StatusCode::OK);

        let verified = self
            .post(
                "/otp/verify",
                serde_json::json!({ "phoneNumber": phone, "otp": "123456" }),
            )
            .await;
        assert_eq!(verified.status, StatusCode::OK, "{:?}", verified.body);
        verified.body["token"].as_str().unwrap().to_string()
    }
}
