//! Permission management

use crate::auth::rbac::{NewPermission, PermissionPatch};
use crate::core::models::ADMIN_ROLE;
use crate::server::middleware::RequireAccess;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, guard, web};
use uuid::Uuid;

/// Configure permission routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/permissions")
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .route(web::post().to(create_permission))
                    .wrap(RequireAccess::any_role([ADMIN_ROLE])),
            )
            .service(
                web::resource("")
                    .guard(guard::Get())
                    .route(web::get().to(list_permissions))
                    .wrap(RequireAccess::all_permissions(["permissions:read"])),
            )
            .service(
                web::resource("/{id}")
                    .guard(guard::Get())
                    .route(web::get().to(get_permission))
                    .wrap(RequireAccess::all_permissions(["permissions:read"])),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_permission))
                    .route(web::delete().to(delete_permission))
                    .wrap(RequireAccess::any_role([ADMIN_ROLE])),
            ),
    );
}

async fn create_permission(
    state: web::Data<AppState>,
    request: web::Json<NewPermission>,
) -> ActixResult<HttpResponse> {
    let permission = state
        .auth
        .rbac()
        .create_permission(request.into_inner())
        .await?;
    Ok(ApiResponse::created("Permission created successfully", permission).to_http_response())
}

async fn list_permissions(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let permissions = state.auth.rbac().get_all_permissions().await?;
    Ok(ApiResponse::ok("Permissions retrieved successfully", permissions).to_http_response())
}

async fn get_permission(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let permission = state
        .auth
        .rbac()
        .get_permission_by_id(path.into_inner())
        .await?;
    Ok(ApiResponse::ok("Permission retrieved successfully", permission).to_http_response())
}

async fn update_permission(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    request: web::Json<PermissionPatch>,
) -> ActixResult<HttpResponse> {
    let permission = state
        .auth
        .rbac()
        .update_permission(path.into_inner(), request.into_inner())
        .await?;
    Ok(ApiResponse::ok("Permission updated successfully", permission).to_http_response())
}

async fn delete_permission(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    state
        .auth
        .rbac()
        .delete_permission(path.into_inner())
        .await?;
    Ok(ApiResponse::message("Permission deleted successfully").to_http_response())
}
