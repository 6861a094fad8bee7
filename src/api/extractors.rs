//! Request extractors shared by the handlers.

use axum::{
    Json,
    extract::{ConnectInfo, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use validator::Validate;

use crate::application::services::ClientInfo;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{client_ip, header_str};

/// JSON body that is deserialized and then validated.
///
/// Malformed JSON and failed validation both become `400` responses in the
/// standard error format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

impl FromRequestParts<AppState> for ClientInfo {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientInfo {
            ip_address: client_ip(&parts.headers, peer, state.behind_proxy),
            referrer: header_str(&parts.headers, header::REFERER.as_str())
                .unwrap_or_default()
                .to_string(),
            user_agent: header_str(&parts.headers, header::USER_AGENT.as_str())
                .unwrap_or_default()
                .to_string(),
        })
    }
}
