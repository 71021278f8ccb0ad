//! Request id propagation and error normalization.
//!
//! Every request gets an id, read from `X-Request-ID` or generated. The id
//! is stored in the request extensions, echoed as a response header and
//! written into every error body. Errors that leave the inner services in
//! any other shape are rendered through the Error Normalizer here.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

use acct_core::context::RequestContext;

use crate::errors::{normalize_actix, ApiError};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for RequestId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(request_id_of(req)))
    }
}

/// Deadline applied to each workflow call, registered as app data
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

/// Extractor producing the workflow context for the current request
pub struct RequestCtx(pub RequestContext);

impl FromRequest for RequestCtx {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let ctx = RequestContext::new(request_id_of(req).0);
        let ctx = match req.app_data::<web::Data<RequestTimeout>>() {
            Some(timeout) => ctx.with_timeout(timeout.0),
            None => ctx,
        };
        ready(Ok(RequestCtx(ctx)))
    }
}

/// Request id from the extensions, falling back to the header
pub fn request_id_of(req: &HttpRequest) -> RequestId {
    if let Some(id) = req.extensions().get::<RequestId>() {
        return id.clone();
    }
    RequestId(header_request_id(req).unwrap_or_else(|| Uuid::new_v4().to_string()))
}

fn header_request_id(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(String::from)
}

/// Middleware assigning request ids and normalizing error responses
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let request_id = header_request_id(req.request()).unwrap_or_else(|| Uuid::new_v4().to_string());
        req.extensions_mut().insert(RequestId(request_id.clone()));
        let path = req.path().to_string();

        Box::pin(async move {
            // No response to rebuild; hand the normalized error back to actix
            let res = match service.call(req).await {
                Ok(res) => res,
                Err(err) => {
                    let api_err = normalize_actix(&err).with_request_id(request_id.as_str());
                    log_failure(&api_err, &path);
                    return Err(api_err.into());
                }
            };

            let normalized = res.response().error().map(normalize_actix);
            let mut res = match normalized {
                Some(api_err) => {
                    let api_err = api_err.with_request_id(request_id.as_str());
                    log_failure(&api_err, &path);
                    let (http_req, _) = res.into_parts();
                    ServiceResponse::new(http_req, api_err.error_response()).map_into_right_body()
                }
                None => res.map_into_left_body(),
            };

            if let Ok(value) = HeaderValue::from_str(&request_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}

/// Log the cause server side; 5xx as errors, the rest as warnings
fn log_failure(api_err: &ApiError, path: &str) {
    let status = api_err.status_code();
    let request_id = api_err.request_id().unwrap_or("-");
    if status.is_server_error() {
        tracing::error!(
            request_id,
            path,
            status = status.as_u16(),
            error = %api_err,
            cause = api_err.cause().unwrap_or("-"),
            "Request failed"
        );
    } else {
        tracing::warn!(
            request_id,
            path,
            status = status.as_u16(),
            error = %api_err,
            "Request rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Service as _;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};
    use serde_json::Value;

    use acct_core::errors::ErrorKind;

    #[test]
    fn test_request_id_from_header() {
        let req = actix_test::TestRequest::default()
            .insert_header((REQUEST_ID_HEADER, "abc-123"))
            .to_http_request();
        assert_eq!(request_id_of(&req).as_str(), "abc-123");
    }

    #[test]
    fn test_request_id_generated_when_missing() {
        let req = actix_test::TestRequest::default().to_http_request();
        assert!(Uuid::parse_str(request_id_of(&req).as_str()).is_ok());
    }

    #[actix_web::test]
    async fn test_handler_error_is_rendered_with_request_id() {
        let app = actix_test::init_service(App::new().wrap(RequestIdMiddleware).route(
            "/conflict",
            web::get().to(|| async {
                Err::<HttpResponse, ApiError>(ApiError::new(ErrorKind::Conflict, "taken"))
            }),
        ))
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/conflict")
            .insert_header((REQUEST_ID_HEADER, "req-7"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-7");

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "CONFLICT");
        assert_eq!(body["request_id"], "req-7");
    }

    #[actix_web::test]
    async fn test_inner_service_error_is_normalized() {
        let app = actix_test::init_service(
            App::new()
                .wrap_fn(|_req, _srv| async {
                    Err::<ServiceResponse, Error>(ApiError::unauthorized("Denied").into())
                })
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "req-8"))
            .to_request();
        let err = match app.call(req).await {
            Ok(_) => panic!("expected the inner error to propagate"),
            Err(err) => err,
        };
        let api_err = err.as_error::<ApiError>().unwrap();
        assert_eq!(api_err.kind(), ErrorKind::Unauthorized);
        assert_eq!(api_err.request_id(), Some("req-8"));
    }
}
