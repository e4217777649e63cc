//! Per-route access requirement middleware

use super::helpers::bearer_header;
use crate::auth::{AccessRequirement, Identity};
use crate::server::state::AppState;
use crate::utils::error::GatekeeperError;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use uuid::Uuid;

/// Attaches an [`AccessRequirement`] to a resource
///
/// Resolves the bearer token (when one is sent), evaluates the requirement
/// and stores the [`Identity`] in request extensions for the handler.
#[derive(Clone)]
pub struct RequireAccess {
    requirement: Rc<AccessRequirement>,
}

impl RequireAccess {
    pub fn new(requirement: AccessRequirement) -> Self {
        Self {
            requirement: Rc::new(requirement),
        }
    }

    /// Identity is resolved if sent, but nothing is required
    pub fn identity() -> Self {
        Self::new(AccessRequirement::none())
    }

    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(AccessRequirement::any_role(roles))
    }

    pub fn all_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(AccessRequirement::all_permissions(permissions))
    }

    pub fn owner_or_admin(param: impl Into<String>) -> Self {
        Self::new(AccessRequirement::owner_or_admin(param))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireAccessService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAccessService {
            service: Rc::new(service),
            requirement: self.requirement.clone(),
        }))
    }
}

/// Service implementation for access requirement middleware
pub struct RequireAccessService<S> {
    service: Rc<S>,
    requirement: Rc<AccessRequirement>,
}

impl<S, B> Service<ServiceRequest> for RequireAccessService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let requirement = self.requirement.clone();

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = GatekeeperError::internal("Application state is not configured");
                return Ok(req.error_response(err).map_into_right_body());
            };

            let identity = match bearer_header(req.headers()).map(str::to_owned) {
                Some(header) => match state.auth.identity().resolve_header(&header).await {
                    Ok(identity) => Some(identity),
                    Err(err) => return Ok(req.error_response(err).map_into_right_body()),
                },
                None => None,
            };

            let owner_id = requirement
                .owner_param
                .as_deref()
                .and_then(|param| req.match_info().get(param))
                .and_then(|value| Uuid::parse_str(value).ok());

            if let Err(err) = state
                .auth
                .guard()
                .check(&requirement, identity.as_ref(), owner_id)
                .await
            {
                return Ok(req.error_response(err).map_into_right_body());
            }

            if let Some(identity) = identity {
                req.extensions_mut().insert(identity);
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// The caller resolved by [`RequireAccess`]; `Unauthenticated` when absent
impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or_else(|| GatekeeperError::unauthenticated("Authentication required").into()),
        )
    }
}
