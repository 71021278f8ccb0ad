//! Integration tests for the uniform error body and request ids

mod common;

#[cfg(test)]
mod tests {
    use actix_web::{http::header::CONTENT_TYPE, http::StatusCode, test};
    use serde_json::Value;

    use acct_api::create_app;
    use acct_api::middleware::REQUEST_ID_HEADER;

    use crate::common::TestContext;

    #[actix_web::test]
    async fn test_health_check() {
        let ctx = TestContext::new();
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_unknown_route_uses_uniform_body() {
        let ctx = TestContext::new();
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get().uri("/api/v1/nothing-here").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Resource not found");
        assert!(body["error"].get("details").is_none());
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_request_id_is_echoed() {
        let ctx = TestContext::new();
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/nothing-here")
            .insert_header((REQUEST_ID_HEADER, "req-42"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
            "req-42"
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["request_id"], "req-42");
    }

    #[actix_web::test]
    async fn test_request_id_generated_on_success() {
        let ctx = TestContext::new();
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        let id = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let ctx = TestContext::new();
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "BAD_REQUEST");
        assert!(body["request_id"].is_string());
    }

    #[actix_web::test]
    async fn test_invalid_bearer_token() {
        let ctx = TestContext::new();
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .insert_header((REQUEST_ID_HEADER, "req-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-jwt");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "UNAUTHORIZED");
        assert_eq!(body["error"]["message"], "Invalid or expired token");
        assert_eq!(body["request_id"], "req-jwt");
        assert!(body["timestamp"].is_string());
    }
}
