use crate::app::error::{ServiceError, ServiceResult};
use crate::domain::id::ObjectId;
use crate::domain::like::TargetKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Only the owner may mutate a record. An unknown caller never matches.
pub fn authorize(owner: &ObjectId, caller: Option<&ObjectId>) -> Access {
    match caller {
        Some(caller) if caller == owner => Access::Allow,
        _ => Access::Deny,
    }
}

/// Call only once the record is known to exist.
pub fn ensure_owner(owner: &ObjectId, caller: Option<&ObjectId>, denied: &str) -> ServiceResult<()> {
    match authorize(owner, caller) {
        Access::Allow => Ok(()),
        Access::Deny => Err(ServiceError::forbidden(denied)),
    }
}

pub fn parse_id(raw: &str, label: &str) -> ServiceResult<ObjectId> {
    ObjectId::parse(raw.trim())
        .ok_or_else(|| ServiceError::validation(format!("invalid or missing {} ID", label)))
}

pub fn parse_target_kind(raw: &str) -> ServiceResult<TargetKind> {
    TargetKind::from_name(raw).ok_or_else(|| {
        ServiceError::validation("like target must be one of video, comment or tweet")
    })
}

/// Rejects content that is blank once trimmed. Accepted content is kept as
/// submitted.
pub fn require_content(raw: &str, label: &str) -> ServiceResult<String> {
    if raw.trim().is_empty() {
        return Err(ServiceError::validation(format!("{} content is required", label)));
    }
    Ok(raw.to_owned())
}
