use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Secret used when none is configured. Tokens signed with it carry no
/// security guarantee.
pub const DEV_SESSION_SECRET: &str = "dev-insecure-session-secret-change-me";

/// Lifetime of a session when the identity does not carry its own expiry.
pub const SESSION_TTL_DAYS: i64 = 30;

const SEPARATOR: char = '.';

/// The identity a session token vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub discord_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(
        rename = "exp",
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session identity is empty")]
    EmptyIdentity,
    #[error("malformed session token")]
    Malformed,
    #[error("session token signature mismatch")]
    BadSignature,
    #[error("session token expired")]
    Expired,
}

/// Signs and verifies self-contained session tokens.
///
/// A token is `base64url(json(identity)) + "." + hex(hmac_sha256(payload))`.
/// There is no server-side session store: a token stays valid until the
/// expiry embedded in it.
#[derive(Clone)]
pub struct SessionCodec {
    secret: Vec<u8>,
}

impl SessionCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        let secret = secret.into();
        let secret = if secret.is_empty() {
            DEV_SESSION_SECRET.as_bytes().to_vec()
        } else {
            secret
        };
        Self { secret }
    }

    /// True when tokens are signed with the built-in development secret.
    #[must_use]
    pub fn is_insecure(&self) -> bool {
        self.secret == DEV_SESSION_SECRET.as_bytes()
    }

    pub fn encode(&self, identity: &SessionIdentity) -> Result<String, SessionError> {
        self.encode_at(identity, Utc::now())
    }

    pub fn encode_at(
        &self,
        identity: &SessionIdentity,
        now: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        if identity.discord_id.is_empty() {
            return Err(SessionError::EmptyIdentity);
        }

        let mut identity = identity.clone();
        if identity.expires_at.is_none() {
            identity.expires_at = Some(now + Duration::days(SESSION_TTL_DAYS));
        }

        let json = serde_json::to_vec(&identity).map_err(|_| SessionError::Malformed)?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let sig = hex::encode(self.mac(&payload).finalize().into_bytes());

        Ok(format!("{payload}{SEPARATOR}{sig}"))
    }

    pub fn decode(&self, token: &str) -> Result<SessionIdentity, SessionError> {
        self.decode_at(token, Utc::now())
    }

    pub fn decode_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionIdentity, SessionError> {
        let mut parts = token.split(SEPARATOR);
        let (Some(payload), Some(sig), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SessionError::Malformed);
        };

        let sig = hex::decode(sig).map_err(|_| SessionError::Malformed)?;

        // verify_slice compares in constant time
        self.mac(payload)
            .verify_slice(&sig)
            .map_err(|_| SessionError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionError::Malformed)?;
        let identity: SessionIdentity =
            serde_json::from_slice(&json).map_err(|_| SessionError::Malformed)?;

        if let Some(expires_at) = identity.expires_at {
            if expires_at < now {
                return Err(SessionError::Expired);
            }
        }

        if identity.discord_id.is_empty() {
            return Err(SessionError::EmptyIdentity);
        }

        Ok(identity)
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SessionIdentity {
        SessionIdentity {
            discord_id: "123456789".to_string(),
            username: "Bar".to_string(),
            avatar_url: Some("https://cdn.discordapp.com/avatars/123456789/abc.png".to_string()),
            expires_at: None,
        }
    }

    #[test]
    fn test_round_trip() {
        let codec = SessionCodec::new("secret");
        let now = Utc::now();
        let token = codec.encode_at(&identity(), now).unwrap();

        let decoded = codec.decode_at(&token, now).unwrap();
        assert_eq!(decoded.discord_id, "123456789");
        assert_eq!(decoded.username, "Bar");
        assert_eq!(decoded.avatar_url, identity().avatar_url);
        assert_eq!(
            decoded.expires_at.unwrap().timestamp(),
            (now + Duration::days(SESSION_TTL_DAYS)).timestamp()
        );
    }

    #[test]
    fn test_token_format() {
        let codec = SessionCodec::new("secret");
        let token = codec.encode(&identity()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 2);
        assert!(!parts[0].contains('='));
        assert_eq!(parts[1].len(), 64);
        assert!(parts[1].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_explicit_expiry_is_kept() {
        let codec = SessionCodec::new("secret");
        let now = Utc::now();
        let mut id = identity();
        id.expires_at = Some(now + Duration::hours(1));

        let token = codec.encode_at(&id, now).unwrap();
        let decoded = codec.decode_at(&token, now).unwrap();
        assert_eq!(
            decoded.expires_at.unwrap().timestamp(),
            (now + Duration::hours(1)).timestamp()
        );
    }

    #[test]
    fn test_empty_identity_rejected() {
        let codec = SessionCodec::new("secret");
        let mut id = identity();
        id.discord_id.clear();
        assert_eq!(codec.encode(&id), Err(SessionError::EmptyIdentity));
    }

    #[test]
    fn test_tampered_signature() {
        let codec = SessionCodec::new("secret");
        let token = codec.encode(&identity()).unwrap();
        let (payload, sig) = token.split_once('.').unwrap();

        for i in 0..sig.len() {
            let mut bytes = sig.as_bytes().to_vec();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let tampered = format!("{payload}.{}", String::from_utf8(bytes).unwrap());
            assert_eq!(codec.decode(&tampered), Err(SessionError::BadSignature));
        }
    }

    #[test]
    fn test_tampered_payload() {
        let codec = SessionCodec::new("secret");
        let token = codec.encode(&identity()).unwrap();
        let (payload, sig) = token.split_once('.').unwrap();

        let mut forged = identity();
        forged.discord_id = "999".to_string();
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        assert_ne!(forged_payload, payload);

        assert_eq!(
            codec.decode(&format!("{forged_payload}.{sig}")),
            Err(SessionError::BadSignature)
        );
    }

    #[test]
    fn test_wrong_secret() {
        let token = SessionCodec::new("secret").encode(&identity()).unwrap();
        assert_eq!(
            SessionCodec::new("other").decode(&token),
            Err(SessionError::BadSignature)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = SessionCodec::new("secret");
        let token = codec.encode(&identity()).unwrap();

        assert_eq!(codec.decode(""), Err(SessionError::Malformed));
        assert_eq!(codec.decode("no-separator"), Err(SessionError::Malformed));
        assert_eq!(codec.decode(&format!("{token}.extra")), Err(SessionError::Malformed));
        assert_eq!(codec.decode("payload.not-hex"), Err(SessionError::Malformed));
    }

    #[test]
    fn test_signed_garbage_payload_is_malformed() {
        let codec = SessionCodec::new("secret");
        let payload = URL_SAFE_NO_PAD.encode(b"not json");
        let sig = hex::encode(codec.mac(&payload).finalize().into_bytes());

        assert_eq!(
            codec.decode(&format!("{payload}.{sig}")),
            Err(SessionError::Malformed)
        );
    }

    #[test]
    fn test_expired_token() {
        let codec = SessionCodec::new("secret");
        let now = Utc::now();
        let mut id = identity();
        id.expires_at = Some(now - Duration::seconds(1));

        let token = codec.encode_at(&id, now).unwrap();
        assert_eq!(codec.decode_at(&token, now), Err(SessionError::Expired));

        let fresh = codec.encode_at(&identity(), now).unwrap();
        let later = now + Duration::days(SESSION_TTL_DAYS + 1);
        assert_eq!(codec.decode_at(&fresh, later), Err(SessionError::Expired));
    }

    #[test]
    fn test_signed_empty_identity_rejected_on_decode() {
        let codec = SessionCodec::new("secret");
        let payload = URL_SAFE_NO_PAD.encode(br#"{"discord_id":"","username":"x"}"#);
        let sig = hex::encode(codec.mac(&payload).finalize().into_bytes());

        assert_eq!(
            codec.decode(&format!("{payload}.{sig}")),
            Err(SessionError::EmptyIdentity)
        );
    }

    #[test]
    fn test_insecure_default_secret() {
        assert!(SessionCodec::new("").is_insecure());
        assert!(SessionCodec::new(DEV_SESSION_SECRET).is_insecure());
        assert!(!SessionCodec::new("a real secret").is_insecure());
    }
}
