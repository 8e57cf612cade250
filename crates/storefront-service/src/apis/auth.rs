//! Bearer token extraction.

use super::api_error;
use crate::server::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use storefront_auth::bearer_token;
use storefront_types::{APIError, Principal};

/// The caller of a request, resolved from its `Authorization: Bearer` header.
///
/// Handlers that take this extractor reject unauthenticated requests with 401
/// before any other input is looked at.
pub struct Authenticated(pub Principal);

impl FromRequestParts<AppState> for Authenticated {
	type Rejection = APIError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let token = parts
			.headers
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(bearer_token)
			.ok_or_else(|| APIError::unauthorized("UNAUTHENTICATED", "Not authorized, no token"))?;

		state
			.engine
			.authenticate(token)
			.await
			.map(Authenticated)
			.map_err(api_error)
	}
}
