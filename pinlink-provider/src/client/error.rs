//! Pinning service error normalization
//!
//! The service reports authentication failures inconsistently: some endpoints answer
//! HTTP 401, some answer 200 with an envelope code, and some only say so in the message
//! text (in English, Chinese or Japanese depending on the gateway). Everything funnels
//! through [`normalize`] so callers only ever see [`RemoteError::CredentialExpired`] or a
//! generic [`RemoteError::Api`].

use crate::error::RemoteError;
use crate::traits::RawApiError;

use super::PinningClient;

/// Envelope codes the service uses for an invalid or expired session.
const EXPIRED_SERVICE_CODES: &[&str] = &["401", "40101", "40102", "10401"];

/// Lower-case substrings that indicate an expired or invalid session.
const EXPIRY_MARKERS: &[&str] = &[
    "token expired",
    "token has expired",
    "token is expired",
    "token invalid",
    "invalid token",
    "jwt expired",
    "session expired",
    "login expired",
    "not logged in",
    "please login",
    "please log in",
    "unauthorized",
    "登录已过期",
    "登录过期",
    "登录失效",
    "令牌已过期",
    "令牌无效",
    "token已过期",
    "token 已过期",
    "未登录",
    "请重新登录",
    "认证失败",
    "ログインの有効期限",
    "トークンの有効期限",
];

/// Whether free text reports an expired session.
pub(crate) fn message_indicates_expiry(message: &str) -> bool {
    let lower = message.to_lowercase();
    EXPIRY_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Collapse a raw failure into the closed error taxonomy.
pub(crate) fn normalize(raw: RawApiError) -> RemoteError {
    let expired = raw.status == Some(401)
        || raw
            .code
            .as_deref()
            .is_some_and(|code| EXPIRED_SERVICE_CODES.contains(&code))
        || message_indicates_expiry(&raw.message);

    if expired {
        RemoteError::CredentialExpired {
            raw_message: Some(raw.message).filter(|m| !m.is_empty()),
        }
    } else {
        RemoteError::Api {
            status: raw.status,
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

impl PinningClient {
    /// Normalize a failed response; on expiry, show the remediation hint.
    pub(crate) fn fail(&self, raw: RawApiError) -> RemoteError {
        let error = normalize(raw);
        if error.is_credential_expired() {
            log::debug!("Credential rejected by pinning service: {error}");
            self.emit_expiry_hint(&error);
        } else {
            log::error!("API error: {error}");
        }
        error
    }

    pub(crate) fn parse_error(detail: impl ToString) -> RemoteError {
        RemoteError::ParseError {
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: Option<u16>, code: Option<&str>, message: &str) -> RawApiError {
        RawApiError::new(status, code.map(str::to_string), message)
    }

    #[test]
    fn http_401_is_expiry() {
        let err = normalize(raw(Some(401), None, ""));
        assert!(matches!(
            err,
            RemoteError::CredentialExpired { raw_message: None }
        ));
    }

    #[test]
    fn service_codes_are_expiry() {
        for code in EXPIRED_SERVICE_CODES {
            let err = normalize(raw(Some(200), Some(code), "whatever"));
            assert!(err.is_credential_expired(), "code {code} should be expiry");
        }
    }

    #[test]
    fn english_message_is_expiry_case_insensitive() {
        let err = normalize(raw(Some(400), Some("1"), "JWT Expired at 2024-01-01"));
        assert!(err.is_credential_expired());
    }

    #[test]
    fn chinese_message_is_expiry() {
        let err = normalize(raw(Some(200), Some("500"), "登录已过期，请重新登录"));
        assert!(err.is_credential_expired());
    }

    #[test]
    fn japanese_message_is_expiry() {
        let err = normalize(raw(None, None, "ログインの有効期限が切れました"));
        assert!(err.is_credential_expired());
    }

    #[test]
    fn forbidden_without_marker_is_api_error() {
        let err = normalize(raw(Some(403), Some("403"), "VIP required"));
        assert!(matches!(
            err,
            RemoteError::Api { status: Some(403), .. }
        ));
    }

    #[test]
    fn other_failures_keep_code_and_message() {
        let err = normalize(raw(Some(200), Some("5001"), "domain already bound"));
        match err {
            RemoteError::Api {
                raw_code,
                raw_message,
                ..
            } => {
                assert_eq!(raw_code.as_deref(), Some("5001"));
                assert_eq!(raw_message, "domain already bound");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
