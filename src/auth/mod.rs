use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::SessionError;
use crate::types::UserId;

/// Payload fields the client cares about. The signature is the server's
/// business; the client only reads the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub name: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
}

/// Keys checked, in order, for the user identifier
const ID_FIELDS: &[&str] = &["id", "userId", "user_id", "_id", "sub"];

impl Claims {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, SessionError> {
        let user_id = find_user_id(payload)
            .ok_or_else(|| SessionError::invalid("token payload has no user identifier"))?;

        let name = payload
            .get("name")
            .or_else(|| payload.get("username"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            user_id,
            name,
            exp: payload.get("exp").and_then(Value::as_i64),
            iat: payload.get("iat").and_then(Value::as_i64),
        })
    }

    pub fn is_expired(&self) -> bool {
        self.exp.is_some_and(|exp| exp <= Utc::now().timestamp())
    }
}

fn find_user_id(payload: &Map<String, Value>) -> Option<UserId> {
    let direct = ID_FIELDS.iter().find_map(|key| id_from_value(payload.get(*key)?));
    // Some issuers nest the identity as { user: { id } }
    direct.or_else(|| {
        let nested = payload.get("user")?.as_object()?;
        ID_FIELDS.iter().find_map(|key| id_from_value(nested.get(*key)?))
    })
}

fn id_from_value(value: &Value) -> Option<UserId> {
    let id: UserId = serde_json::from_value(value.clone()).ok()?;
    (!id.is_empty()).then_some(id)
}

/// Read a session credential without verifying its signature.
///
/// Blank input is `NoCredential`; anything that is not a readable token with
/// a user identifier is `InvalidCredential`. Expiry is only enforced when
/// `validate_expiry` is set.
pub fn decode_credential(token: &str, validate_expiry: bool) -> Result<Claims, SessionError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SessionError::NoCredential);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Map<String, Value>>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| SessionError::invalid(format!("unreadable token: {}", e)))?;

    let claims = Claims::from_payload(&data.claims)?;

    if validate_expiry && claims.is_expired() {
        return Err(SessionError::invalid("token has expired"));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mint_token;
    use serde_json::json;

    #[test]
    fn reads_numeric_id_as_string() {
        let token = mint_token(json!({ "id": 12, "name": "ada" }));
        let claims = decode_credential(&token, false).unwrap();
        assert_eq!(claims.user_id, UserId::new("12"));
        assert_eq!(claims.name.as_deref(), Some("ada"));
    }

    #[test]
    fn falls_back_through_alias_fields() {
        let token = mint_token(json!({ "sub": "abc" }));
        assert_eq!(decode_credential(&token, false).unwrap().user_id, UserId::new("abc"));

        let token = mint_token(json!({ "user": { "id": "nested" } }));
        assert_eq!(decode_credential(&token, false).unwrap().user_id, UserId::new("nested"));
    }

    #[test]
    fn blank_is_no_credential() {
        assert_eq!(decode_credential("", false), Err(SessionError::NoCredential));
        assert_eq!(decode_credential("   ", false), Err(SessionError::NoCredential));
    }

    #[test]
    fn garbage_is_invalid_credential() {
        let err = decode_credential("not-a-token", false).unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredential(_)));
    }

    #[test]
    fn payload_without_identifier_is_invalid() {
        let token = mint_token(json!({ "name": "ghost" }));
        let err = decode_credential(&token, false).unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredential(_)));
    }

    #[test]
    fn expiry_only_checked_when_asked() {
        let token = mint_token(json!({ "id": "1", "exp": 1_000 }));
        assert!(decode_credential(&token, false).is_ok());
        assert!(matches!(
            decode_credential(&token, true),
            Err(SessionError::InvalidCredential(_))
        ));
    }
}
