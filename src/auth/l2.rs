//! Level-2 headers: an HMAC-SHA256 over the request using the derived API secret.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use hmac::{Hmac, Mac as _};
use reqwest::Request;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret as _;
use sha2::Sha256;

use crate::auth::Credentials;
use crate::auth::l1::{POLY_ADDRESS, POLY_SIGNATURE, POLY_TIMESTAMP};
use crate::error::Error;
use crate::types::Address;
use crate::{Result, Timestamp};

pub(crate) const POLY_API_KEY: &str = "POLY_API_KEY";
pub(crate) const POLY_PASSPHRASE: &str = "POLY_PASSPHRASE";

pub(crate) fn create_headers(
    address: Address,
    credentials: &Credentials,
    request: &Request,
    timestamp: Timestamp,
) -> Result<HeaderMap> {
    let body = request
        .body()
        .and_then(reqwest::Body::as_bytes)
        .map(String::from_utf8_lossy)
        .unwrap_or_default();
    let message = format!(
        "{timestamp}{}{}{body}",
        request.method(),
        request.url().path()
    );
    let signature = hmac(&credentials.secret, &message)?;

    let mut map = HeaderMap::new();
    map.insert(POLY_ADDRESS, HeaderValue::from_str(&address.to_checksum(None))?);
    map.insert(POLY_API_KEY, HeaderValue::from_str(&credentials.key.to_string())?);
    map.insert(
        POLY_PASSPHRASE,
        HeaderValue::from_str(credentials.passphrase.expose_secret())?,
    );
    map.insert(POLY_SIGNATURE, HeaderValue::from_str(&signature)?);
    map.insert(POLY_TIMESTAMP, HeaderValue::from(timestamp));

    Ok(map)
}

/// Url-safe base64 HMAC-SHA256 of `message`, keyed by the url-safe base64 `secret`.
pub(crate) fn hmac(secret: &secrecy::SecretString, message: &str) -> Result<String> {
    let key = URL_SAFE.decode(secret.expose_secret())?;
    let mut mac = Hmac::<Sha256>::new_from_slice(&key)
        .map_err(|e| Error::internal(format!("invalid HMAC key: {e}")))?;
    mac.update(message.as_bytes());

    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}
