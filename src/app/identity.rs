use anyhow::Result;
use pasetors::claims::{Claims, ClaimsValidationRules};
use pasetors::keys::SymmetricKey;
use pasetors::token::UntrustedToken;
use pasetors::{local, version4::V4, Local};

use crate::domain::id::ObjectId;

pub const TOKEN_ISSUER: &str = "murmur";
pub const TOKEN_AUDIENCE: &str = "murmur";

#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: ObjectId,
}

/// Resolves callers from access tokens minted by the account service.
#[derive(Clone)]
pub struct IdentityService {
    access_key: [u8; 32],
}

impl IdentityService {
    pub fn new(access_key: [u8; 32]) -> Self {
        Self { access_key }
    }

    /// `Ok(None)` for any token that does not verify; `Err` only when the
    /// configured key itself is unusable.
    pub fn authenticate_access_token(&self, token: &str) -> Result<Option<Caller>> {
        let claims = match self.decrypt_claims(token)? {
            Some(claims) => claims,
            None => return Ok(None),
        };
        if !has_token_type(&claims, "access") {
            return Ok(None);
        }

        let user_id = claims
            .get_claim("sub")
            .and_then(|value| value.as_str())
            .and_then(ObjectId::parse);
        Ok(user_id.map(|user_id| Caller { user_id }))
    }

    fn decrypt_claims(&self, token: &str) -> Result<Option<Claims>> {
        let key = SymmetricKey::<V4>::from(&self.access_key)?;
        let mut rules = ClaimsValidationRules::new();
        rules.validate_issuer_with(TOKEN_ISSUER);
        rules.validate_audience_with(TOKEN_AUDIENCE);

        let untrusted = match UntrustedToken::<Local, V4>::try_from(token) {
            Ok(token) => token,
            Err(_) => return Ok(None),
        };
        let trusted = match local::decrypt(&key, &untrusted, &rules, None, None) {
            Ok(token) => token,
            Err(_) => return Ok(None),
        };
        Ok(trusted.payload_claims().cloned())
    }
}

fn has_token_type(claims: &Claims, expected: &str) -> bool {
    claims
        .get_claim("typ")
        .and_then(|value| value.as_str())
        .map(|value| value == expected)
        .unwrap_or(false)
}
