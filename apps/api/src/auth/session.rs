//! Signed session cookies.
//!
//! Cookie value: `<uid>.<expiry unix secs>.<hex HMAC-SHA256 of "uid.expiry">`.
//! Nothing is stored server-side; the signature is the session.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// One week.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session secret is empty")]
    EmptySecret,

    #[error("Malformed session value")]
    Malformed,

    #[error("Session signature mismatch")]
    BadSignature,

    #[error("Session expired")]
    Expired,
}

#[derive(Clone)]
pub struct SessionSigner {
    key: Vec<u8>,
    cookie_name: String,
    secure: bool,
}

impl SessionSigner {
    pub fn new(secret: &str, cookie_name: String, secure: bool) -> Result<Self, SessionError> {
        if secret.is_empty() {
            return Err(SessionError::EmptySecret);
        }
        Ok(Self {
            key: secret.as_bytes().to_vec(),
            cookie_name,
            secure,
        })
    }

    pub fn issue(&self, uid: &str) -> Result<String, SessionError> {
        self.issue_at(uid, Utc::now().timestamp())
    }

    pub fn issue_at(&self, uid: &str, now: i64) -> Result<String, SessionError> {
        if uid.is_empty() || uid.contains('.') {
            return Err(SessionError::Malformed);
        }
        let payload = format!("{uid}.{}", now + SESSION_TTL_SECS);
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Returns the uid of a valid, unexpired session value.
    pub fn verify(&self, value: &str) -> Result<String, SessionError> {
        self.verify_at(value, Utc::now().timestamp())
    }

    pub fn verify_at(&self, value: &str, now: i64) -> Result<String, SessionError> {
        let (payload, signature) = value.rsplit_once('.').ok_or(SessionError::Malformed)?;
        let (uid, expiry) = payload.split_once('.').ok_or(SessionError::Malformed)?;
        if uid.is_empty() {
            return Err(SessionError::Malformed);
        }
        let expiry: i64 = expiry.parse().map_err(|_| SessionError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| SessionError::Malformed)?;

        // verify_slice compares in constant time
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;

        if expiry <= now {
            return Err(SessionError::Expired);
        }
        Ok(uid.to_string())
    }

    /// `Set-Cookie` value. `None` clears the cookie.
    pub fn cookie_header(&self, value: Option<&str>) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        match value {
            Some(value) => format!(
                "{}={value}; Path=/; Max-Age={SESSION_TTL_SECS}; HttpOnly; SameSite=Strict{secure}",
                self.cookie_name
            ),
            None => format!(
                "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Strict{secure}",
                self.cookie_name
            ),
        }
    }

    /// Picks this session's cookie out of a `Cookie` request header.
    pub fn read_cookie<'a>(&self, header: &'a str) -> Option<&'a str> {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, SessionError> {
        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|_| SessionError::EmptySecret)?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}
