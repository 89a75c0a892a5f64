//! Bearer-token authorization for order placement.

use crate::config::AuthConfig;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid authorization format. Expected 'Bearer <token>'")]
    InvalidFormat,

    #[error("Invalid token")]
    InvalidToken,
}

/// Decides whether a bearer token may place orders.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, token: &str) -> Result<(), AuthError>;
}

/// Accepts a fixed set of tokens.
#[derive(Debug, Clone)]
pub struct StaticTokenAuthorizer {
    tokens: HashSet<String>,
}

impl StaticTokenAuthorizer {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Authorizer for StaticTokenAuthorizer {
    async fn authorize(&self, token: &str) -> Result<(), AuthError> {
        if self.tokens.contains(token) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Accepts any well-formed bearer token.
#[derive(Debug, Clone, Default)]
pub struct AllowAll;

#[async_trait]
impl Authorizer for AllowAll {
    async fn authorize(&self, _token: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

/// `StaticTokenAuthorizer` over the configured tokens, or `AllowAll` when
/// none are configured.
pub fn authorizer_from_config(config: &AuthConfig) -> Arc<dyn Authorizer> {
    if config.tokens.is_empty() {
        Arc::new(AllowAll)
    } else {
        Arc::new(StaticTokenAuthorizer::new(config.tokens.iter().cloned()))
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(None), Err(AuthError::MissingHeader));
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::InvalidFormat));
        assert_eq!(bearer_token(Some("Bearer   ")), Err(AuthError::InvalidFormat));
    }

    #[tokio::test]
    async fn test_static_tokens() {
        let auth = authorizer_from_config(&AuthConfig {
            tokens: vec!["good".to_string()],
        });
        assert!(auth.authorize("good").await.is_ok());
        assert_eq!(auth.authorize("bad").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_no_tokens_allows_everyone() {
        let auth = authorizer_from_config(&AuthConfig::default());
        assert!(auth.authorize("anything").await.is_ok());
    }
}
