//! Axum extractors for channel and actor identity
//!
//! Channel resolution and authentication happen upstream; their results arrive
//! as headers and are trusted once received.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::HeaderMap, request::Parts},
};
use itsm_domain::{ChannelId, DomainError, ExternalUserId};

use crate::error::ApiError;

pub const CHANNEL_HEADER: &str = "X-Channel-ID";
pub const USER_HEADER: &str = "X-User-ID";

/// Channel (tenant) the request is scoped to
///
/// A missing or malformed channel is rejected with 403.
#[derive(Debug, Clone, Copy)]
pub struct Channel(pub ChannelId);

#[async_trait]
impl<S> FromRequestParts<S> for Channel
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_channel(&parts.headers)
    }
}

fn extract_channel(headers: &HeaderMap) -> Result<Channel, ApiError> {
    let value = headers
        .get(CHANNEL_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            DomainError::Unauthorized(format!("missing {} header", CHANNEL_HEADER))
        })?;

    let channel_id = value
        .parse::<ChannelId>()
        .map_err(|_| DomainError::Unauthorized(format!("invalid {} header", CHANNEL_HEADER)))?;

    Ok(Channel(channel_id))
}

/// Authenticated user performing the request
///
/// A missing or blank user is rejected with 401.
#[derive(Debug, Clone)]
pub struct Actor(pub ExternalUserId);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_actor(&parts.headers)
    }
}

fn extract_actor(headers: &HeaderMap) -> Result<Actor, ApiError> {
    let user_id = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| ExternalUserId::new(v.trim()))
        .filter(|id| !id.is_blank())
        .ok_or_else(|| DomainError::Unauthenticated("no authenticated user".to_string()))?;

    Ok(Actor(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_channel() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            extract_channel(&headers),
            Err(ApiError::Domain(DomainError::Unauthorized(_)))
        ));

        headers.insert(CHANNEL_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(
            extract_channel(&headers),
            Err(ApiError::Domain(DomainError::Unauthorized(_)))
        ));

        headers.insert(
            CHANNEL_HEADER,
            HeaderValue::from_static("e27ddcd0-0e1f-4bc5-93df-f6f04155beec"),
        );
        let Channel(id) = extract_channel(&headers).unwrap();
        assert_eq!(id.to_string(), "e27ddcd0-0e1f-4bc5-93df-f6f04155beec");
    }

    #[test]
    fn test_extract_actor() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            extract_actor(&headers),
            Err(ApiError::Domain(DomainError::Unauthenticated(_)))
        ));

        headers.insert(USER_HEADER, HeaderValue::from_static("   "));
        assert!(extract_actor(&headers).is_err());

        headers.insert(USER_HEADER, HeaderValue::from_static("f49d5fd5"));
        let Actor(user) = extract_actor(&headers).unwrap();
        assert_eq!(user.as_str(), "f49d5fd5");
    }
}
