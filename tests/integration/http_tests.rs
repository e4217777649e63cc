//! HTTP surface tests through the full application

#[cfg(test)]
mod tests {
    use crate::common::TestApp;
    use crate::common::fixtures::bearer;
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use gatekeeper::auth::NewUser;
    use gatekeeper::server::HttpServer;
    use serde_json::{Value, json};

    /// Call the service and decode the JSON body
    macro_rules! send {
        ($app:expr, $req:expr) => {{
            let res = test::call_service(&$app, $req.to_request()).await;
            let status = res.status();
            let body: Value = test::read_body_json(res).await;
            (status, body)
        }};
    }

    async fn create_account(app: &TestApp, username: &str, roles: Option<Vec<String>>) -> (String, String) {
        let user = app
            .auth()
            .create_user(NewUser {
                email: format!("{}@example.com", username),
                username: username.to_string(),
                password: "password123".to_string(),
                roles,
                ..NewUser::default()
            })
            .await
            .unwrap();
        let login = app.auth().login(username, "password123").await.unwrap();
        (user.id.to_string(), login.tokens.access_token)
    }

    #[actix_web::test]
    async fn test_health_and_request_id() {
        let app = TestApp::new().await;
        let service = test::init_service(HttpServer::create_app(web::Data::new(app.state.clone()))).await;

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("x-request-id", "health-1"))
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("x-request-id").unwrap(), "health-1");

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_login_and_me() {
        let app = TestApp::new().await;
        let service = test::init_service(HttpServer::create_app(web::Data::new(app.state.clone()))).await;

        let (status, body) = send!(
            service,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"email": "admin@example.com", "password": "admin123"}))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["username"], "admin");
        assert!(body["data"]["user"].get("passwordHash").is_none());
        assert_eq!(body["data"]["tokenType"], "Bearer");
        let access = body["data"]["accessToken"].as_str().unwrap().to_string();
        let refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();

        let (status, body) = send!(
            service,
            test::TestRequest::get().uri("/auth/me").insert_header(bearer(&access))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["username"], "admin");

        let (status, body) = send!(
            service,
            test::TestRequest::post()
                .uri("/auth/refresh-token")
                .set_json(json!({"refreshToken": refresh}))
        );
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["accessToken"].is_string());

        let (status, _) = send!(
            service,
            test::TestRequest::post()
                .uri("/auth/refresh-token")
                .set_json(json!({"refreshToken": access}))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_authentication_failures_use_error_envelope() {
        let app = TestApp::new().await;
        let service = test::init_service(HttpServer::create_app(web::Data::new(app.state.clone()))).await;

        let (status, body) = send!(
            service,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"username": "admin", "password": "wrong-password"}))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["message"], "Invalid credentials");
        assert_eq!(body["path"], "/auth/login");
        assert_eq!(body["method"], "POST");
        assert!(body["requestId"].is_string());
        assert!(body["timestamp"].is_string());

        let (status, body) = send!(service, test::TestRequest::get().uri("/auth/me"));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Authentication required");

        let (status, body) = send!(
            service,
            test::TestRequest::get()
                .uri("/roles")
                .insert_header(bearer("garbage"))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[actix_web::test]
    async fn test_reports_permission_end_to_end() {
        let app = TestApp::new().await;
        let admin = app.admin_token().await;
        let service = test::init_service(HttpServer::create_app(web::Data::new(app.state.clone()))).await;

        let (status, body) = send!(
            service,
            test::TestRequest::post()
                .uri("/permissions")
                .insert_header(bearer(&admin))
                .set_json(json!({"resource": "audits", "action": "read"}))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["name"], "audits:read");
        let permission_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send!(
            service,
            test::TestRequest::post()
                .uri("/roles")
                .insert_header(bearer(&admin))
                .set_json(json!({"name": "auditor", "permissionIds": [permission_id]}))
        );
        assert_eq!(status, StatusCode::CREATED);
        let role_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send!(
            service,
            test::TestRequest::post()
                .uri("/users")
                .insert_header(bearer(&admin))
                .set_json(json!({
                    "email": "carol@example.com",
                    "username": "carol",
                    "password": "password123"
                }))
        );
        assert_eq!(status, StatusCode::CREATED);
        let user_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send!(
            service,
            test::TestRequest::post()
                .uri("/roles/assign")
                .insert_header(bearer(&admin))
                .set_json(json!({"userId": user_id, "roleId": role_id}))
        );
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send!(
            service,
            test::TestRequest::post()
                .uri("/roles/assign")
                .insert_header(bearer(&admin))
                .set_json(json!({"userId": user_id, "roleId": role_id}))
        );
        assert_eq!(status, StatusCode::CONFLICT);

        let check_uri = format!("/users/{}/check-permission/audits/read", user_id);
        let (status, body) = send!(
            service,
            test::TestRequest::post()
                .uri(&check_uri)
                .insert_header(bearer(&admin))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["granted"], true);

        let (status, _) = send!(
            service,
            test::TestRequest::delete()
                .uri(&format!("/roles/{}/permissions", role_id))
                .insert_header(bearer(&admin))
                .set_json(json!({"permissionIds": [permission_id]}))
        );
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send!(
            service,
            test::TestRequest::post()
                .uri(&check_uri)
                .insert_header(bearer(&admin))
        );
        assert_eq!(body["data"]["granted"], false);

        let (status, body) = send!(
            service,
            test::TestRequest::get()
                .uri(&format!("/users/{}/permissions", user_id))
                .insert_header(bearer(&admin))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!(["posts:read", "users:read"]));
    }

    #[actix_web::test]
    async fn test_route_requirements_are_enforced() {
        let app = TestApp::new().await;
        let admin = app.admin_token().await;
        let (_, user_token) = create_account(&app, "dave", None).await;
        let service = test::init_service(HttpServer::create_app(web::Data::new(app.state.clone()))).await;

        let (status, body) = send!(
            service,
            test::TestRequest::post()
                .uri("/roles")
                .insert_header(bearer(&user_token))
                .set_json(json!({"name": "sneaky"}))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["message"].as_str().unwrap().starts_with("Access denied"));

        let (status, _) = send!(
            service,
            test::TestRequest::get()
                .uri("/roles")
                .insert_header(bearer(&user_token))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send!(
            service,
            test::TestRequest::get().uri("/users").insert_header(bearer(&user_token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 2);

        let admin_role = app.role_id("admin").await;
        let (status, _) = send!(
            service,
            test::TestRequest::delete()
                .uri(&format!("/roles/{}", admin_role))
                .insert_header(bearer(&admin))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send!(
            service,
            test::TestRequest::get()
                .uri("/users/stats")
                .insert_header(bearer(&admin))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 2);
    }

    #[actix_web::test]
    async fn test_password_change_is_owner_or_admin() {
        let app = TestApp::new().await;
        let admin = app.admin_token().await;
        let (carol_id, carol_token) = create_account(&app, "carol", None).await;
        let (_, dave_token) = create_account(&app, "dave", None).await;
        let service = test::init_service(HttpServer::create_app(web::Data::new(app.state.clone()))).await;
        let uri = format!("/users/{}/password", carol_id);

        let (status, _) = send!(
            service,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&dave_token))
                .set_json(json!({"currentPassword": "password123", "newPassword": "hijacked123"}))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send!(
            service,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&carol_token))
                .set_json(json!({"currentPassword": "password123", "newPassword": "newpassword456"}))
        );
        assert_eq!(status, StatusCode::OK);
        assert!(app.auth().login("carol", "newpassword456").await.is_ok());

        let (status, _) = send!(
            service,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header(bearer(&admin))
                .set_json(json!({"newPassword": "reset-by-admin"}))
        );
        assert_eq!(status, StatusCode::OK);
        assert!(app.auth().login("carol", "reset-by-admin").await.is_ok());
    }

    #[actix_web::test]
    async fn test_ban_and_unban() {
        let app = TestApp::new().await;
        let admin = app.admin_token().await;
        let (carol_id, carol_token) = create_account(&app, "carol", None).await;
        let service = test::init_service(HttpServer::create_app(web::Data::new(app.state.clone()))).await;

        let (status, body) = send!(
            service,
            test::TestRequest::patch()
                .uri(&format!("/users/{}/ban", carol_id))
                .insert_header(bearer(&admin))
                .set_json(json!({"reason": "spam"}))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "banned");
        assert_eq!(body["data"]["bannedReason"], "spam");

        let (status, _) = send!(
            service,
            test::TestRequest::get().uri("/auth/me").insert_header(bearer(&carol_token))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send!(
            service,
            test::TestRequest::patch()
                .uri(&format!("/users/{}/unban", carol_id))
                .insert_header(bearer(&admin))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "active");
        assert!(body["data"]["bannedReason"].is_null());

        let (status, _) = send!(
            service,
            test::TestRequest::get().uri("/auth/me").insert_header(bearer(&carol_token))
        );
        assert_eq!(status, StatusCode::OK);
    }
}
