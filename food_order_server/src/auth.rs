//! Request authentication.
//!
//! Every route except `/health` takes a [`Caller`] argument. Extracting it reads the bearer token from the
//! `Authorization` header and asks the configured [`TokenVerifier`] who the token belongs to. The verifier is
//! registered as app data (`web::Data<dyn TokenVerifier>`), so tests can swap the auth service out for a
//! [`StaticTokenVerifier`].
use std::{collections::HashMap, fmt::Display, sync::Arc};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use fos_common::Secret;
use futures::{future::LocalBoxFuture, FutureExt};
use log::*;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{AuthError, ServerError};

/// The identity behind an access token, as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

impl Caller {
    pub fn new<S: Display>(id: S) -> Self {
        Self { id: id.to_string() }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected a string or number for id, got {other}"))),
    }
}

pub trait TokenVerifier {
    fn verify<'a>(&'a self, token: &'a Secret<String>) -> LocalBoxFuture<'a, Result<Caller, AuthError>>;
}

//--------------------------------------   HttpTokenVerifier   ---------------------------------------------------------
/// Validates tokens against the auth service's `GET /auth/me` endpoint.
#[derive(Clone)]
pub struct HttpTokenVerifier {
    url: String,
    client: Arc<Client>,
}

impl HttpTokenVerifier {
    pub fn new(auth_service_url: &str) -> Result<Self, ServerError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServerError::InitializeError(format!("Could not create the auth service client. {e}")))?;
        let url = format!("{}/auth/me", auth_service_url.trim_end_matches('/'));
        Ok(Self { url, client: Arc::new(client) })
    }

    async fn fetch_caller(&self, token: &Secret<String>) -> Result<Caller, AuthError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(token.reveal())
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;
        let status = response.status();
        match status {
            s if s.is_success() => response.json::<Caller>().await.map_err(|e| {
                AuthError::ServiceUnavailable(format!("The auth service sent an unexpected response. {e}"))
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::InvalidToken(format!("The auth service rejected the token ({status})")))
            },
            s => Err(AuthError::ServiceUnavailable(format!("The auth service responded with {s}"))),
        }
    }
}

impl TokenVerifier for HttpTokenVerifier {
    fn verify<'a>(&'a self, token: &'a Secret<String>) -> LocalBoxFuture<'a, Result<Caller, AuthError>> {
        self.fetch_caller(token).boxed_local()
    }
}

//--------------------------------------  StaticTokenVerifier  ---------------------------------------------------------
/// A fixed table of tokens. Useful for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Caller>,
}

impl StaticTokenVerifier {
    pub fn with_token<S: Into<String>>(mut self, token: S, caller: Caller) -> Self {
        self.tokens.insert(token.into(), caller);
        self
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify<'a>(&'a self, token: &'a Secret<String>) -> LocalBoxFuture<'a, Result<Caller, AuthError>> {
        let result =
            self.tokens.get(token.reveal()).cloned().ok_or_else(|| AuthError::InvalidToken("Unknown token".into()));
        futures::future::ready(result).boxed_local()
    }
}

//--------------------------------------      Extraction       ---------------------------------------------------------
/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Result<Secret<String>, AuthError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected 'Bearer <token>'".into()))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::PoorlyFormattedToken("Expected 'Bearer <token>'".into()));
    }
    Ok(Secret::new(token.to_string()))
}

impl FromRequest for Caller {
    type Error = ServerError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let verifier = req.app_data::<web::Data<dyn TokenVerifier>>().cloned();
        let path = req.path().to_string();
        async move {
            let token = token.map_err(|e| {
                debug!("💻️ Rejecting request to {path}. {e}");
                e
            })?;
            let verifier = verifier
                .ok_or_else(|| ServerError::ConfigurationError("No token verifier has been registered".into()))?;
            let caller = verifier.verify(&token).await.map_err(|e| {
                debug!("💻️ Token for request to {path} could not be verified. {e}");
                e
            })?;
            trace!("💻️ Request to {path} made by caller {}", caller.id);
            Ok(caller)
        }
        .boxed_local()
    }
}
