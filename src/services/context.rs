// ABOUTME: Per-call request context carrying the correlation id and the acting user
// ABOUTME: Replaces any notion of a shared current user; every service call receives one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use recipe_hub_core::models::UserId;
use uuid::Uuid;

/// Identity and correlation data for one service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Correlation id for logs and error context
    pub request_id: Uuid,
    /// Authenticated user, if any
    pub user_id: Option<UserId>,
}

impl RequestContext {
    /// Context for an authenticated user
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            user_id: Some(user_id),
        }
    }

    /// Context with no user (public reads, admin tooling)
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            user_id: None,
        }
    }

    /// The acting user, or a validation error when there is none
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for anonymous contexts
    pub fn require_user(&self) -> AppResult<&UserId> {
        self.user_id.as_ref().ok_or_else(|| {
            AppError::missing_field("user_id").with_request_id(self.request_id.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_require_user() {
        let user = UserId::new("cook").unwrap();
        assert_eq!(
            RequestContext::for_user(user.clone()).require_user().unwrap(),
            &user
        );

        let ctx = RequestContext::anonymous();
        let err = ctx.require_user().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert_eq!(
            err.context.request_id,
            Some(ctx.request_id.to_string())
        );
    }
}
