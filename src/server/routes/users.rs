//! Accounts and per-user RBAC queries

use crate::auth::{Identity, NewUser, PasswordChange, StatusChange};
use crate::core::models::{ADMIN_ROLE, UserFilter};
use crate::server::middleware::RequireAccess;
use crate::server::routes::{ApiResponse, PaginationMeta};
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, guard, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Configure user routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .route(web::post().to(create_user))
                    .wrap(RequireAccess::all_permissions(["users:create"])),
            )
            .service(
                web::resource("")
                    .guard(guard::Get())
                    .route(web::get().to(list_users))
                    .wrap(RequireAccess::all_permissions(["users:read"])),
            )
            .service(
                web::resource("/stats")
                    .route(web::get().to(user_stats))
                    .wrap(RequireAccess::all_permissions(["users:read"])),
            )
            .service(
                web::resource("/{id}/roles")
                    .route(web::get().to(user_roles))
                    .wrap(RequireAccess::all_permissions(["users:read"])),
            )
            .service(
                web::resource("/{id}/permissions")
                    .route(web::get().to(user_permissions))
                    .wrap(RequireAccess::all_permissions(["users:read"])),
            )
            .service(
                web::resource("/{id}/check-permission/{resource}/{action}")
                    .route(web::post().to(check_permission))
                    .wrap(RequireAccess::all_permissions(["users:read"])),
            )
            .service(
                web::resource("/{id}/check-role/{roleName}")
                    .route(web::post().to(check_role))
                    .wrap(RequireAccess::all_permissions(["users:read"])),
            )
            .service(
                web::resource("/{id}/status")
                    .route(web::patch().to(update_status))
                    .wrap(RequireAccess::all_permissions(["users:update"])),
            )
            .service(
                web::resource("/{id}/{transition}")
                    .guard(guard::Patch())
                    .route(web::patch().to(transition_status))
                    .wrap(RequireAccess::all_permissions(["users:update"])),
            )
            .service(
                web::resource("/{id}/password")
                    .route(web::put().to(change_password))
                    .wrap(RequireAccess::owner_or_admin("id")),
            )
            .service(
                web::resource("/{id}")
                    .guard(guard::Get())
                    .route(web::get().to(get_user))
                    .wrap(RequireAccess::all_permissions(["users:read"])),
            )
            .service(
                web::resource("/{id}")
                    .guard(guard::Delete())
                    .route(web::delete().to(delete_user))
                    .wrap(RequireAccess::any_role([ADMIN_ROLE])),
            ),
    );
}

#[derive(Debug, Default, Deserialize)]
pub struct BanRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckPath {
    pub id: Uuid,
    pub resource: String,
    pub action: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCheckPath {
    pub id: Uuid,
    pub role_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub user_id: Uuid,
    pub subject: String,
    pub granted: bool,
}

async fn create_user(
    state: web::Data<AppState>,
    request: web::Json<NewUser>,
) -> ActixResult<HttpResponse> {
    let user = state.auth.create_user(request.into_inner()).await?;
    Ok(ApiResponse::created("User created successfully", user).to_http_response())
}

async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UserFilter>,
) -> ActixResult<HttpResponse> {
    let filter = query.into_inner();
    let (users, total) = state.auth.list_users(&filter).await?;
    let meta = PaginationMeta::new(filter.page, filter.limit, total);
    Ok(ApiResponse::paginated("Users retrieved successfully", users, meta).to_http_response())
}

async fn user_stats(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let stats = state.auth.user_stats().await?;
    Ok(ApiResponse::ok("User statistics retrieved successfully", stats).to_http_response())
}

async fn get_user(state: web::Data<AppState>, path: web::Path<Uuid>) -> ActixResult<HttpResponse> {
    let user = state.auth.get_user(path.into_inner()).await?;
    Ok(ApiResponse::ok("User retrieved successfully", user).to_http_response())
}

async fn update_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    request: web::Json<StatusChange>,
) -> ActixResult<HttpResponse> {
    let user = state
        .auth
        .update_user_status(path.into_inner(), request.into_inner(), Some(identity.id))
        .await?;
    Ok(ApiResponse::ok("User status updated successfully", user).to_http_response())
}

/// `disable`, `enable`, `ban` and `unban`
async fn transition_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, String)>,
    request: Option<web::Json<BanRequest>>,
) -> ActixResult<HttpResponse> {
    let (user_id, transition) = path.into_inner();
    let actor = Some(identity.id);

    let (user, message) = match transition.as_str() {
        "disable" => (state.auth.disable_user(user_id, actor).await?, "User disabled successfully"),
        "enable" => (state.auth.enable_user(user_id, actor).await?, "User enabled successfully"),
        "ban" => {
            let reason = request.and_then(|body| body.into_inner().reason);
            (state.auth.ban_user(user_id, reason, actor).await?, "User banned successfully")
        }
        "unban" => (state.auth.unban_user(user_id, actor).await?, "User unbanned successfully"),
        _ => return Ok(HttpResponse::NotFound().finish()),
    };
    Ok(ApiResponse::ok(message, user).to_http_response())
}

async fn delete_user(state: web::Data<AppState>, path: web::Path<Uuid>) -> ActixResult<HttpResponse> {
    state.auth.delete_user(path.into_inner()).await?;
    Ok(ApiResponse::message("User deleted successfully").to_http_response())
}

async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    request: web::Json<PasswordChange>,
) -> ActixResult<HttpResponse> {
    state
        .auth
        .change_password(path.into_inner(), &identity, request.into_inner())
        .await?;
    Ok(ApiResponse::message("Password changed successfully").to_http_response())
}

async fn user_roles(state: web::Data<AppState>, path: web::Path<Uuid>) -> ActixResult<HttpResponse> {
    let bindings = state.auth.rbac().get_user_roles(path.into_inner()).await?;
    Ok(ApiResponse::ok("User roles retrieved successfully", bindings).to_http_response())
}

async fn user_permissions(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let permissions = state
        .auth
        .rbac()
        .get_user_permissions(path.into_inner())
        .await?;
    Ok(ApiResponse::ok("User permissions retrieved successfully", permissions).to_http_response())
}

async fn check_permission(
    state: web::Data<AppState>,
    path: web::Path<PermissionCheckPath>,
) -> ActixResult<HttpResponse> {
    let granted = state
        .auth
        .rbac()
        .has_permission(path.id, &path.resource, &path.action)
        .await?;
    let result = CheckResult {
        user_id: path.id,
        subject: format!("{}:{}", path.resource, path.action),
        granted,
    };
    Ok(ApiResponse::ok("Permission checked", result).to_http_response())
}

async fn check_role(
    state: web::Data<AppState>,
    path: web::Path<RoleCheckPath>,
) -> ActixResult<HttpResponse> {
    let granted = state
        .auth
        .rbac()
        .has_role(path.id, &path.role_name)
        .await?;
    let result = CheckResult {
        user_id: path.id,
        subject: path.role_name.clone(),
        granted,
    };
    Ok(ApiResponse::ok("Role checked", result).to_http_response())
}
