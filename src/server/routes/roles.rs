//! Role management and user role assignment

use crate::auth::rbac::{NewRole, RolePatch};
use crate::core::models::ADMIN_ROLE;
use crate::server::middleware::RequireAccess;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, guard, web};
use serde::Deserialize;
use uuid::Uuid;

/// Configure role routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/roles")
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .route(web::post().to(create_role))
                    .wrap(RequireAccess::any_role([ADMIN_ROLE])),
            )
            .service(
                web::resource("")
                    .guard(guard::Get())
                    .route(web::get().to(list_roles))
                    .wrap(RequireAccess::all_permissions(["roles:read"])),
            )
            .service(
                web::resource("/assign")
                    .route(web::post().to(assign_role))
                    .wrap(RequireAccess::any_role([ADMIN_ROLE])),
            )
            .service(
                web::resource("/{roleId}/users/{userId}")
                    .route(web::delete().to(remove_role))
                    .route(web::patch().to(set_assignment_active))
                    .wrap(RequireAccess::any_role([ADMIN_ROLE])),
            )
            .service(
                web::resource("/{id}/permissions")
                    .route(web::post().to(add_permissions))
                    .route(web::delete().to(remove_permissions))
                    .wrap(RequireAccess::any_role([ADMIN_ROLE])),
            )
            .service(
                web::resource("/{id}")
                    .guard(guard::Get())
                    .route(web::get().to(get_role))
                    .wrap(RequireAccess::all_permissions(["roles:read"])),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_role))
                    .route(web::delete().to(delete_role))
                    .wrap(RequireAccess::any_role([ADMIN_ROLE])),
            ),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStateRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionsRequest {
    pub permission_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPath {
    pub role_id: Uuid,
    pub user_id: Uuid,
}

async fn create_role(
    state: web::Data<AppState>,
    request: web::Json<NewRole>,
) -> ActixResult<HttpResponse> {
    let role = state.auth.rbac().create_role(request.into_inner()).await?;
    Ok(ApiResponse::created("Role created successfully", role).to_http_response())
}

async fn list_roles(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let roles = state.auth.rbac().get_all_roles().await?;
    Ok(ApiResponse::ok("Roles retrieved successfully", roles).to_http_response())
}

async fn get_role(state: web::Data<AppState>, path: web::Path<Uuid>) -> ActixResult<HttpResponse> {
    let role = state.auth.rbac().get_role_by_id(path.into_inner()).await?;
    Ok(ApiResponse::ok("Role retrieved successfully", role).to_http_response())
}

async fn update_role(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    request: web::Json<RolePatch>,
) -> ActixResult<HttpResponse> {
    let role = state
        .auth
        .rbac()
        .update_role(path.into_inner(), request.into_inner())
        .await?;
    Ok(ApiResponse::ok("Role updated successfully", role).to_http_response())
}

async fn delete_role(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    state.auth.rbac().delete_role(path.into_inner()).await?;
    Ok(ApiResponse::message("Role deleted successfully").to_http_response())
}

async fn assign_role(
    state: web::Data<AppState>,
    request: web::Json<AssignRoleRequest>,
) -> ActixResult<HttpResponse> {
    let binding = state
        .auth
        .rbac()
        .assign_role_to_user(request.user_id, request.role_id)
        .await?;
    Ok(ApiResponse::created("Role assigned successfully", binding).to_http_response())
}

async fn remove_role(
    state: web::Data<AppState>,
    path: web::Path<AssignmentPath>,
) -> ActixResult<HttpResponse> {
    state
        .auth
        .rbac()
        .remove_role_from_user(path.user_id, path.role_id)
        .await?;
    Ok(ApiResponse::message("Role removed successfully").to_http_response())
}

async fn set_assignment_active(
    state: web::Data<AppState>,
    path: web::Path<AssignmentPath>,
    request: web::Json<AssignmentStateRequest>,
) -> ActixResult<HttpResponse> {
    let binding = state
        .auth
        .rbac()
        .set_user_role_active(path.user_id, path.role_id, request.is_active)
        .await?;
    Ok(ApiResponse::ok("Role assignment updated successfully", binding).to_http_response())
}

async fn add_permissions(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    request: web::Json<RolePermissionsRequest>,
) -> ActixResult<HttpResponse> {
    let role = state
        .auth
        .rbac()
        .add_permissions_to_role(path.into_inner(), &request.permission_ids)
        .await?;
    Ok(ApiResponse::ok("Permissions added successfully", role).to_http_response())
}

async fn remove_permissions(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    request: web::Json<RolePermissionsRequest>,
) -> ActixResult<HttpResponse> {
    let role = state
        .auth
        .rbac()
        .remove_permissions_from_role(path.into_inner(), &request.permission_ids)
        .await?;
    Ok(ApiResponse::ok("Permissions removed successfully", role).to_http_response())
}
