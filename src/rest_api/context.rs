//! Caller context
//!
//! The caller is identified by the `x-user-id` header; requests without it
//! act as the anonymous user. Editing is allowed for configured editor ids.

use std::collections::HashSet;

use axum::http::HeaderMap;

use super::errors::{RestError, RestResult};
use crate::data::ANONYMOUS_USER_ID;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: i64,
    pub can_edit: bool,
}

impl UserContext {
    pub fn anonymous() -> Self {
        Self {
            user_id: ANONYMOUS_USER_ID,
            can_edit: false,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id == ANONYMOUS_USER_ID
    }

    /// Fails with `Forbidden` unless the caller may edit
    pub fn require_edit(&self) -> RestResult<()> {
        if self.can_edit {
            Ok(())
        } else {
            Err(RestError::Forbidden)
        }
    }
}

/// Build the caller context from request headers
pub fn extract_context(headers: &HeaderMap, editors: &HashSet<i64>) -> RestResult<UserContext> {
    let raw = match headers.get(USER_ID_HEADER) {
        Some(v) => v
            .to_str()
            .map_err(|_| RestError::InvalidUserId("not valid text".to_string()))?,
        None => return Ok(UserContext::anonymous()),
    };

    let user_id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| RestError::InvalidUserId(raw.to_string()))?;

    if user_id == ANONYMOUS_USER_ID {
        return Ok(UserContext::anonymous());
    }

    Ok(UserContext {
        user_id,
        can_edit: editors.contains(&user_id),
    })
}
