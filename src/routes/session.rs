use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use crate::error::ApiError;
use crate::models::SessionContext;
use crate::routes::AppState;
use std::future::{ready, Ready};

/// Extract the caller's identity from the `Authorization` header.
///
/// Handlers that take `SessionContext` reject unauthenticated requests with
/// 401; handlers that take `Option<SessionContext>` see `None` instead.
impl FromRequest for SessionContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<SessionContext, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state is not configured".to_string()))?;

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let session = state.auth.verify_header(header)?;
    tracing::trace!("Authenticated request from {}", session.user_id);
    Ok(session)
}
