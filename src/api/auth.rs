use crate::api::models::{AppError, AppState};
use crate::config::AuthConfig;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use tracing::debug;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity resolved from request headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub is_admin: bool,
}

/// Checks the static API key and resolves the caller identity
#[derive(Debug, Clone)]
pub struct AuthGuard {
    api_key: Option<String>,
    admin_ids: Vec<String>,
}

impl AuthGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            admin_ids: config.admin_ids.clone(),
        }
    }

    /// Validate headers. The API key is checked before the user id.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AppError> {
        let provided = header_str(headers, API_KEY_HEADER);
        match (provided, self.api_key.as_deref()) {
            (Some(given), Some(expected)) if given == expected => {}
            _ => return Err(AppError::Unauthorized),
        }

        let user_id = header_str(headers, USER_ID_HEADER).ok_or(AppError::MissingUserId)?;

        Ok(Identity {
            id: user_id.to_string(),
            is_admin: self.admin_ids.iter().any(|a| a == user_id),
        })
    }
}

// Absent, empty, and non-UTF-8 values are all treated as missing.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = state.auth.authenticate(&parts.headers)?;
        debug!(user_id = %identity.id, is_admin = identity.is_admin, "Authenticated request");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn guard() -> AuthGuard {
        AuthGuard::new(&AuthConfig {
            api_key: Some("secret".to_string()),
            admin_ids: vec!["root".to_string()],
        })
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn resolves_regular_user() {
        let identity = guard()
            .authenticate(&headers(&[(API_KEY_HEADER, "secret"), (USER_ID_HEADER, "alice")]))
            .unwrap();
        assert_eq!(
            identity,
            Identity {
                id: "alice".to_string(),
                is_admin: false
            }
        );
    }

    #[test]
    fn resolves_admin() {
        let identity = guard()
            .authenticate(&headers(&[(API_KEY_HEADER, "secret"), (USER_ID_HEADER, "root")]))
            .unwrap();
        assert!(identity.is_admin);
    }

    #[test]
    fn wrong_or_missing_key_is_unauthorized_even_with_user_id() {
        let g = guard();
        assert!(matches!(
            g.authenticate(&headers(&[(API_KEY_HEADER, "nope"), (USER_ID_HEADER, "alice")])),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            g.authenticate(&headers(&[(USER_ID_HEADER, "alice")])),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn missing_or_empty_user_id_is_rejected() {
        let g = guard();
        assert!(matches!(
            g.authenticate(&headers(&[(API_KEY_HEADER, "secret")])),
            Err(AppError::MissingUserId)
        ));
        assert!(matches!(
            g.authenticate(&headers(&[(API_KEY_HEADER, "secret"), (USER_ID_HEADER, "")])),
            Err(AppError::MissingUserId)
        ));
    }

    #[test]
    fn unset_api_key_rejects_everyone() {
        let g = AuthGuard::new(&AuthConfig::default());
        assert!(matches!(
            g.authenticate(&headers(&[(API_KEY_HEADER, ""), (USER_ID_HEADER, "alice")])),
            Err(AppError::Unauthorized)
        ));
    }
}
