use axum::{extract::FromRequestParts, http::request::Parts};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::services::{AccessPolicy, Caller, Principal};

/// Reads the principal the upstream authentication layer attached to the request.
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = &state.env.auth;
        let name = header_value(parts, &auth.user_header)?;
        let role = header_value(parts, &auth.role_header)?;
        Principal::from_claims(name, role)
    }
}

/// Principal plus its directory record, resolved once per request.
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        AccessPolicy::resolve_caller(principal, state.students.as_ref()).await
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::Authentication(format!("missing {name} header")))?
        .to_str()
        .map_err(|_| AppError::Authentication(format!("{name} header is not valid text")))
}
