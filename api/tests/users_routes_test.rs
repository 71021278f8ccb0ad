//! Integration tests for the user endpoints

mod common;

#[cfg(test)]
mod tests {
    use actix_web::{http::header::AUTHORIZATION, http::StatusCode, test};
    use serde_json::{json, Value};

    use acct_api::create_app;

    use crate::common::{TestContext, PASSWORD};

    fn new_user_body(email: &str) -> Value {
        json!({
            "name": "Bob",
            "email": email,
            "password": PASSWORD,
            "role": "guard"
        })
    }

    #[actix_web::test]
    async fn test_create_user_requires_token() {
        let ctx = TestContext::new();
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(new_user_body("bob@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "UNAUTHORIZED");
        assert_eq!(body["error"]["message"], "Missing or invalid Authorization header");
        assert!(body["request_id"].is_string());
        assert!(ctx.repo.users().await.is_empty());
    }

    #[actix_web::test]
    async fn test_create_then_verify_then_login() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        // Create
        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .set_json(new_user_body("bob@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 201);
        assert_eq!(body["data"]["email"], "bob@x.com");
        assert_eq!(body["data"]["role"], "guard");
        assert_eq!(body["data"]["is_active"], false);
        assert!(body["data"].get("password").is_none());

        let published = ctx.publisher.published_on("user.created");
        assert_eq!(published.len(), 1);
        let token = published[0].json()["payload"]["token"]
            .as_str()
            .unwrap()
            .to_string();

        // Inactive accounts cannot log in yet
        let login = json!({"email": "bob@x.com", "password": PASSWORD});
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&login)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        // Verify, no bearer token needed
        let req = test::TestRequest::post()
            .uri("/api/v1/users/verify-account")
            .set_json(json!({ "token": token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"], "success");

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&login)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_create_duplicate_email_is_conflict() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .set_json(new_user_body("ann@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "CONFLICT");
        assert_eq!(body["error"]["message"], "User with this email already exists");
    }

    #[actix_web::test]
    async fn test_create_invalid_fields_lists_details() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .set_json(json!({
                "name": "B",
                "email": "bob@x.com",
                "password": "123",
                "role": "janitor"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "VALIDATION_ERROR");
        let details = body["error"]["details"].as_array().unwrap();
        let fields: Vec<&str> = details.iter().map(|d| d["field"].as_str().unwrap()).collect();
        assert_eq!(fields, vec!["name", "password", "role"]);

        // Submitted passwords are never echoed
        let password = details.iter().find(|d| d["field"] == "password").unwrap();
        assert!(password.get("value").is_none());
    }

    #[actix_web::test]
    async fn test_create_password_over_72_bytes_rejected() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let mut body = new_user_body("bob@x.com");
        body["password"] = json!("ü".repeat(37));
        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"][0]["field"], "password");
        assert_eq!(ctx.repo.users().await.len(), 1);
    }

    #[actix_web::test]
    async fn test_create_malformed_premise_is_bad_request() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let mut body = new_user_body("bob@x.com");
        body["premise_id"] = json!("not-a-uuid");
        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ctx.repo.users().await.len(), 1);
    }

    #[actix_web::test]
    async fn test_list_users_paginates() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        ctx.seed_user("bob@x.com", true).await;
        ctx.seed_user("cid@x.com", false).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users?page=2&limit=2")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["pagination"]["total_pages"], 2);
        assert_eq!(body["data"]["pagination"]["page"], 2);
        assert_eq!(body["data"]["pagination"]["limit"], 2);
        assert!(body["data"]["data"][0].get("password").is_none());
    }

    #[actix_web::test]
    async fn test_list_users_defaults() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["pagination"]["page"], 1);
        assert_eq!(body["data"]["pagination"]["limit"], 10);
    }

    #[actix_web::test]
    async fn test_list_users_rejects_bad_limit() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users?page=1&limit=1000")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/v1/users?page=abc")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "BAD_REQUEST");
    }

    #[actix_web::test]
    async fn test_get_current_user() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["id"], admin.id.to_string());

        // Token for an account that does not exist
        let req = test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header((AUTHORIZATION, ctx.bearer(uuid::Uuid::new_v4())))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_get_user_by_id() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("ann@x.com", true).await;
        let bob = ctx.seed_user("bob@x.com", true).await;
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}", bob.id))
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["email"], "bob@x.com");

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}", uuid::Uuid::new_v4()))
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/v1/users/not-a-uuid")
            .insert_header((AUTHORIZATION, ctx.bearer(admin.id)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Invalid user id");
    }

    #[actix_web::test]
    async fn test_verify_account_rejects_garbage_token() {
        let ctx = TestContext::new();
        let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/users/verify-account")
            .set_json(json!({ "token": "garbage" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Invalid token");
    }
}
