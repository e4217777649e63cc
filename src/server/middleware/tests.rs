//! Middleware tests

#[cfg(test)]
mod tests {
    use super::super::helpers::envelope_message;
    use super::super::request_id::is_valid_request_id;
    use super::super::{
        ErrorEnvelopeMiddleware, REQUEST_ID_HEADER, RequestIdMiddleware, RequireAccess,
        bearer_header,
    };
    use crate::auth::seeder::SeedDataset;
    use crate::auth::{AuthSystem, Identity};
    use crate::config::Config;
    use crate::server::state::AppState;
    use crate::storage::StorageLayer;
    use crate::storage::database::Database;
    use crate::utils::error::{ErrorEnvelope, GatekeeperError};
    use actix_web::body::{BoxBody, to_bytes};
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, web};
    use std::sync::Arc;

    async fn test_state() -> web::Data<AppState> {
        let config = Config::default();
        let database = Arc::new(Database::in_memory().await);
        let storage = Arc::new(StorageLayer::from_database(database));
        let auth = AuthSystem::new(config.auth(), storage.clone()).unwrap();
        auth.seeder().run(&SeedDataset::builtin()).await.unwrap();
        web::Data::new(AppState::new(config, auth, storage))
    }

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().body(identity.username)
    }

    #[test]
    fn test_request_id_validation() {
        assert!(is_valid_request_id("abc-123_x.y"));
        assert!(is_valid_request_id(&"a".repeat(128)));

        assert!(!is_valid_request_id(""));
        assert!(!is_valid_request_id(&"a".repeat(129)));
        assert!(!is_valid_request_id("has space"));
        assert!(!is_valid_request_id("line\nbreak"));
    }

    #[test]
    fn test_bearer_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_header(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_header(&headers), Some("Bearer abc"));
    }

    #[test]
    fn test_envelope_message() {
        let forbidden: actix_web::Error = GatekeeperError::forbidden("No access").into();
        assert_eq!(
            envelope_message(StatusCode::FORBIDDEN, Some(&forbidden)),
            "No access"
        );

        let internal: actix_web::Error = GatekeeperError::internal("pool exhausted").into();
        assert_eq!(
            envelope_message(StatusCode::INTERNAL_SERVER_ERROR, Some(&internal)),
            "Internal server error"
        );

        assert_eq!(envelope_message(StatusCode::NOT_FOUND, None), "Not Found");
    }

    #[actix_web::test]
    async fn test_request_id_is_generated_and_echoed() {
        let app = actix_test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/").to_request();
        let res = actix_test::call_service(&app, req).await;
        let generated = res.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());

        let req = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "trace-42"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.headers().get(REQUEST_ID_HEADER).unwrap(), "trace-42");

        let req = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "not valid!"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_ne!(res.headers().get(REQUEST_ID_HEADER).unwrap(), "not valid!");
    }

    #[actix_web::test]
    async fn test_error_envelope_wraps_failures() {
        let app = actix_test::init_service(
            App::new()
                .wrap(ErrorEnvelopeMiddleware)
                .wrap(RequestIdMiddleware)
                .route(
                    "/conflict",
                    web::get().to(|| async {
                        Err::<HttpResponse, _>(GatekeeperError::conflict("Role already exists"))
                    }),
                ),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/conflict")
            .insert_header((REQUEST_ID_HEADER, "req-1"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert!(!envelope.success);
        assert_eq!(envelope.status_code, 409);
        assert_eq!(envelope.message, "Role already exists");
        assert_eq!(envelope.path, "/conflict");
        assert_eq!(envelope.method, "GET");
        assert_eq!(envelope.request_id.as_deref(), Some("req-1"));

        let req = actix_test::TestRequest::post().uri("/missing").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert_eq!(envelope.message, "Not Found");
        assert_eq!(envelope.method, "POST");
    }

    #[actix_web::test]
    async fn test_error_envelope_passes_successful_responses() {
        let app = actix_test::init_service(
            App::new()
                .wrap(ErrorEnvelopeMiddleware)
                .wrap(RequestIdMiddleware)
                .route("/ok", web::get().to(HttpResponse::Ok))
                .route(
                    "/roles/{id}",
                    web::get().to(|path: web::Path<String>| async move {
                        HttpResponse::Ok().body(path.into_inner())
                    }),
                ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/ok").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(REQUEST_ID_HEADER));

        let req = actix_test::TestRequest::get().uri("/roles/editor").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "editor");
    }

    #[actix_web::test]
    async fn test_error_envelope_wraps_service_errors() {
        let app = actix_test::init_service(
            App::new()
                .wrap_fn(|_req, _srv| {
                    futures::future::ready(Err::<ServiceResponse<BoxBody>, _>(
                        actix_web::Error::from(GatekeeperError::forbidden("Blocked upstream")),
                    ))
                })
                .wrap(ErrorEnvelopeMiddleware)
                .route("/blocked", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = actix_test::TestRequest::delete().uri("/blocked").to_request();
        let err = match actix_test::try_call_service(&app, req).await {
            Ok(res) => panic!("expected a service error, got {}", res.status()),
            Err(err) => err,
        };

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = to_bytes(response.into_body()).await.unwrap();
        let envelope: ErrorEnvelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.status_code, 403);
        assert_eq!(envelope.message, "Blocked upstream");
        assert_eq!(envelope.path, "/blocked");
        assert_eq!(envelope.method, "DELETE");
    }

    #[actix_web::test]
    async fn test_require_access_resolves_identity() {
        let state = test_state().await;
        let login = state.auth.login("admin", "admin123").await.unwrap();

        let app = actix_test::init_service(
            App::new().app_data(state.clone()).service(
                web::resource("/me")
                    .route(web::get().to(whoami))
                    .wrap(RequireAccess::any_role(["admin"])),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/me").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = actix_test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, "Bearer not-a-token"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = actix_test::TestRequest::get()
            .uri("/me")
            .insert_header((
                AUTHORIZATION,
                format!("Bearer {}", login.tokens.access_token),
            ))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "admin");
    }

    #[actix_web::test]
    async fn test_require_access_denies_missing_role() {
        let state = test_state().await;
        let user = state
            .auth
            .create_user(crate::auth::NewUser {
                email: "viewer@example.com".to_string(),
                username: "viewer1".to_string(),
                password: "password123".to_string(),
                roles: Some(vec!["viewer".to_string()]),
                ..Default::default()
            })
            .await
            .unwrap();
        let tokens = state.auth.jwt().create_token_pair(user.id).unwrap();

        let app = actix_test::init_service(
            App::new().app_data(state.clone()).service(
                web::resource("/admin")
                    .route(web::get().to(HttpResponse::Ok))
                    .wrap(RequireAccess::any_role(["admin", "manager"])),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/admin")
            .insert_header((AUTHORIZATION, format!("Bearer {}", tokens.access_token)))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
