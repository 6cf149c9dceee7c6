//! Identity extractors.
//!
//! Authentication happens upstream: the fronting gateway verifies the
//! caller's token and forwards `x-user-id` and `x-user-role` headers. These
//! extractors only read those headers; the service must not be exposed
//! without the gateway in front of it.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use mesa_core::UserId;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";
const ADMIN_ROLE: &str = "admin";

/// The authenticated caller, as asserted by the gateway.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(identity: Identity) -> impl IntoResponse {
///     format!("user {}", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    /// The authenticated user.
    pub user_id: UserId,
    /// Whether the caller has the admin role.
    pub is_admin: bool,
}

/// Extractor that additionally requires the admin role, rejecting with 403
/// for ordinary users.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub Identity);

/// Error returned when identity headers are missing or malformed.
#[derive(Debug)]
pub enum AuthRejection {
    /// No usable `x-user-id` header.
    Unauthorized,
    /// Authenticated but not an admin.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({ "message": "Not authorized" })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                axum::Json(
                    serde_json::json!({ "message": "Access denied, admin privileges required" }),
                ),
            )
                .into_response(),
        }
    }
}

fn identity_from_parts(parts: &Parts) -> Result<Identity, AuthRejection> {
    let user_id = parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i32>().ok())
        .map(UserId::new)
        .ok_or(AuthRejection::Unauthorized)?;

    let is_admin = parts
        .headers
        .get(USER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|role| role == ADMIN_ROLE);

    Ok(Identity { user_id, is_admin })
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts)
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = identity_from_parts(parts)?;
        if !identity.is_admin {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/cart");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).expect("valid request").into_parts();
        parts
    }

    #[test]
    fn test_identity_from_headers() {
        let parts = parts_with_headers(&[("x-user-id", "42"), ("x-user-role", "customer")]);
        let identity = identity_from_parts(&parts).expect("valid identity");
        assert_eq!(identity.user_id, UserId::new(42));
        assert!(!identity.is_admin);
    }

    #[test]
    fn test_admin_role() {
        let parts = parts_with_headers(&[("x-user-id", "1"), ("x-user-role", "admin")]);
        let identity = identity_from_parts(&parts).expect("valid identity");
        assert!(identity.is_admin);
    }

    #[test]
    fn test_missing_user_id_rejected() {
        let parts = parts_with_headers(&[("x-user-role", "admin")]);
        assert!(matches!(
            identity_from_parts(&parts),
            Err(AuthRejection::Unauthorized)
        ));
    }

    #[test]
    fn test_malformed_user_id_rejected() {
        let parts = parts_with_headers(&[("x-user-id", "not-a-number")]);
        assert!(matches!(
            identity_from_parts(&parts),
            Err(AuthRejection::Unauthorized)
        ));
    }
}
