//! HMAC-SHA256 verification of proxied requests.
//!
//! The platform signs every request it forwards with the app's shared secret.
//! Two conventions are in use and a request carries exactly one of them:
//!
//! - **Path-scoped** (`signature` parameter): HMAC over
//!   `<path>?<form-encoded remaining params sorted by key>`, hex digest.
//! - **Sorted-query** (`hmac` parameter): HMAC over the raw
//!   `key=value` pairs sorted by key and joined with `&`, hex or base64 digest.
//!
//! In both cases `signature` and `hmac` themselves are excluded from the signed
//! message, and list values are joined with a comma.

use std::borrow::Cow;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use url::form_urlencoded;

use crate::config::SharedSecret;
use crate::error::AuthError;
use crate::models::proxy_request::{ProxyRequest, QueryParams};

type HmacSha256 = Hmac<Sha256>;

/// Query parameter of the path-scoped convention.
pub const SIGNATURE_PARAM: &str = "signature";

/// Query parameter of the sorted-query convention.
pub const HMAC_PARAM: &str = "hmac";

/// Signing convention, without the supplied digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    PathScoped,
    SortedQuery,
}

impl Convention {
    /// Query parameter that carries the digest for this convention.
    pub fn param(self) -> &'static str {
        match self {
            Convention::PathScoped => SIGNATURE_PARAM,
            Convention::SortedQuery => HMAC_PARAM,
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

/// Digest supplied by the client, tagged with the convention it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppliedSignature {
    PathScoped(String),
    SortedQuery(String),
}

impl SuppliedSignature {
    /// Pick the convention from the query. A non-empty `signature` wins over a
    /// non-empty `hmac`.
    pub fn select(query: &QueryParams) -> Result<Self, AuthError> {
        let supplied = |key: &str| {
            query
                .get(key)
                .filter(|value| !value.is_empty())
                .map(|value| value.joined().into_owned())
        };

        if let Some(signature) = supplied(SIGNATURE_PARAM) {
            return Ok(SuppliedSignature::PathScoped(signature));
        }
        if let Some(hmac) = supplied(HMAC_PARAM) {
            return Ok(SuppliedSignature::SortedQuery(hmac));
        }
        Err(AuthError::MissingSignature)
    }

    pub fn convention(&self) -> Convention {
        match self {
            SuppliedSignature::PathScoped(_) => Convention::PathScoped,
            SuppliedSignature::SortedQuery(_) => Convention::SortedQuery,
        }
    }

    /// Recompute the digest for `request` and compare it in constant time.
    pub fn check(&self, request: &ProxyRequest, secret: &SharedSecret) -> Result<(), AuthError> {
        let matches = match self {
            SuppliedSignature::PathScoped(supplied) => {
                let message = path_scoped_message(request.path(), request.query());
                let expected = sign_hex(secret, &message)?;
                constant_time_eq(expected.as_bytes(), supplied.as_bytes())
            }
            SuppliedSignature::SortedQuery(supplied) => {
                let message = sorted_query_message(request.query());
                let digest = compute_mac(secret, &message)?;
                let hex_match = constant_time_eq(hex::encode(&digest).as_bytes(), supplied.as_bytes());
                let b64_match = constant_time_eq(BASE64.encode(&digest).as_bytes(), supplied.as_bytes());
                hex_match | b64_match
            }
        };

        if matches {
            Ok(())
        } else {
            Err(AuthError::BadSignature(self.convention()))
        }
    }
}

/// Verify the signature of a proxied request.
///
/// Returns the convention that authenticated the request.
///
/// # Errors
///
/// - [`AuthError::MissingSignature`] when neither parameter is present
/// - [`AuthError::BadSignature`] when the digest does not match
/// - [`AuthError::UnexpectedFailure`] if the MAC cannot be computed
pub fn verify(request: &ProxyRequest, secret: &SharedSecret) -> Result<Convention, AuthError> {
    let supplied = SuppliedSignature::select(request.query())?;
    supplied.check(request, secret)?;
    Ok(supplied.convention())
}

/// Parameters that take part in a signing message, sorted by key.
///
/// The sort is stable, so a key's values keep their relative order.
fn signed_params(query: &QueryParams) -> Vec<(&str, Cow<'_, str>)> {
    let mut params: Vec<_> = query
        .iter()
        .filter(|(key, _)| *key != SIGNATURE_PARAM && *key != HMAC_PARAM)
        .map(|(key, value)| (key, value.joined()))
        .collect();
    params.sort_by(|a, b| a.0.cmp(b.0));
    params
}

/// Message signed under the path-scoped convention.
pub fn path_scoped_message(path: &str, query: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in signed_params(query) {
        serializer.append_pair(key, &value);
    }
    let serialized = serializer.finish();

    if path.starts_with('/') {
        format!("{path}?{serialized}")
    } else {
        format!("/{path}?{serialized}")
    }
}

/// Message signed under the sorted-query convention.
pub fn sorted_query_message(query: &QueryParams) -> String {
    signed_params(query)
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// HMAC-SHA256 of `message` under `secret`.
pub fn compute_mac(secret: &SharedSecret, message: &str) -> Result<Vec<u8>, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.reveal().as_bytes())
        .map_err(|e| AuthError::UnexpectedFailure(format!("Invalid HMAC key: {e}")))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Hex HMAC-SHA256 of `message` under `secret`.
pub fn sign_hex(secret: &SharedSecret, message: &str) -> Result<String, AuthError> {
    compute_mac(secret, message).map(hex::encode)
}

/// Constant-time byte comparison. Slices of different length are unequal.
pub fn constant_time_eq(expected: &[u8], supplied: &[u8]) -> bool {
    if expected.len() != supplied.len() {
        return false;
    }
    expected.ct_eq(supplied).into()
}
