//! Error envelope middleware

use super::helpers::{envelope_message, request_id};
use crate::utils::error::ErrorEnvelope;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use actix_web::error::InternalError;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;

/// Rewrites every 4xx/5xx response into the standard error envelope
pub struct ErrorEnvelopeMiddleware;

impl<S, B> Transform<S, ServiceRequest> for ErrorEnvelopeMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = ErrorEnvelopeMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorEnvelopeMiddlewareService { service }))
    }
}

/// Service implementation for error envelope middleware
pub struct ErrorEnvelopeMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorEnvelopeMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();
        let method = req.method().to_string();
        let fallback_id = request_id(req.request());
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) if is_failure(res.status()) => {
                    let status = res.status();
                    let message = envelope_message(status, res.response().error());
                    let (http_req, _) = res.into_parts();
                    let id = request_id(&http_req).or(fallback_id);
                    let response = render(&path, &method, id, status, message);
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                Ok(res) => Ok(res.map_into_left_body()),
                Err(err) => {
                    let status = err.as_response_error().status_code();
                    let message = envelope_message(status, Some(&err));
                    let response = render(&path, &method, fallback_id, status, message.clone());
                    Err(InternalError::from_response(message, response).into())
                }
            }
        })
    }
}

fn is_failure(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

fn render(
    path: &str,
    method: &str,
    request_id: Option<String>,
    status: StatusCode,
    message: String,
) -> HttpResponse {
    let envelope = ErrorEnvelope::new(status, message).for_request(path, method, request_id);
    HttpResponse::build(status).json(envelope)
}
