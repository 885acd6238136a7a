/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Append-only lifecycle audit trail.
//!
//! Every moderation-relevant action appends one immutable [`LoggingInfo`]
//! entry to the owning bundle. Ordering by date determines the "latest"
//! derivations and the derived audit state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Caller;
use crate::error::CatalogueError;

/// Category of a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoggingInfoType {
    /// Submission and moderation decisions
    Onboard,
    /// Content changes and activation toggles
    Update,
    /// Periodic compliance review
    Audit,
    /// Draft workspace actions
    Draft,
    /// Ownership changes
    Move,
}

impl LoggingInfoType {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggingInfoType::Onboard => "onboard",
            LoggingInfoType::Update => "update",
            LoggingInfoType::Audit => "audit",
            LoggingInfoType::Draft => "draft",
            LoggingInfoType::Move => "move",
        }
    }

    /// Parses the persisted string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "onboard" => Some(LoggingInfoType::Onboard),
            "update" => Some(LoggingInfoType::Update),
            "audit" => Some(LoggingInfoType::Audit),
            "draft" => Some(LoggingInfoType::Draft),
            "move" => Some(LoggingInfoType::Move),
            _ => None,
        }
    }

    /// The action types legal under this event category.
    pub fn allows(&self, action: ActionType) -> bool {
        match self {
            LoggingInfoType::Onboard => matches!(
                action,
                ActionType::Registered | ActionType::Approved | ActionType::Rejected
            ),
            LoggingInfoType::Update => matches!(
                action,
                ActionType::Updated
                    | ActionType::Activated
                    | ActionType::Deactivated
                    | ActionType::Suspended
                    | ActionType::Unsuspended
            ),
            LoggingInfoType::Audit => matches!(action, ActionType::Valid | ActionType::Invalid),
            LoggingInfoType::Draft => matches!(action, ActionType::Drafted),
            LoggingInfoType::Move => matches!(action, ActionType::Moved),
        }
    }
}

/// The concrete action recorded by a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// First submission
    Registered,
    /// Moderator approval
    Approved,
    /// Moderator rejection
    Rejected,
    /// Payload update
    Updated,
    /// Visibility switched on
    Activated,
    /// Visibility switched off
    Deactivated,
    /// Suspension imposed
    Suspended,
    /// Suspension lifted
    Unsuspended,
    /// Audit passed
    Valid,
    /// Audit failed
    Invalid,
    /// Draft created
    Drafted,
    /// Moved to another provider
    Moved,
}

impl ActionType {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Registered => "registered",
            ActionType::Approved => "approved",
            ActionType::Rejected => "rejected",
            ActionType::Updated => "updated",
            ActionType::Activated => "activated",
            ActionType::Deactivated => "deactivated",
            ActionType::Suspended => "suspended",
            ActionType::Unsuspended => "unsuspended",
            ActionType::Valid => "valid",
            ActionType::Invalid => "invalid",
            ActionType::Drafted => "drafted",
            ActionType::Moved => "moved",
        }
    }

    /// Parses the persisted string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "registered" => Some(ActionType::Registered),
            "approved" => Some(ActionType::Approved),
            "rejected" => Some(ActionType::Rejected),
            "updated" => Some(ActionType::Updated),
            "activated" => Some(ActionType::Activated),
            "deactivated" => Some(ActionType::Deactivated),
            "suspended" => Some(ActionType::Suspended),
            "unsuspended" => Some(ActionType::Unsuspended),
            "valid" => Some(ActionType::Valid),
            "invalid" => Some(ActionType::Invalid),
            "drafted" => Some(ActionType::Drafted),
            "moved" => Some(ActionType::Moved),
            _ => None,
        }
    }
}

/// One immutable audit-trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingInfo {
    /// When the action happened
    pub date: DateTime<Utc>,
    /// Email of the acting user
    pub user_email: String,
    /// Display name of the acting user
    pub user_full_name: String,
    /// Role the user acted under
    pub user_role: String,
    /// Event category
    pub info_type: LoggingInfoType,
    /// Concrete action
    pub action_type: ActionType,
    /// Optional free-text comment
    pub comment: Option<String>,
}

impl LoggingInfo {
    /// Creates an entry for `caller`, rejecting illegal type/action pairs.
    pub fn entry(
        caller: &Caller,
        info_type: LoggingInfoType,
        action_type: ActionType,
    ) -> Result<Self, CatalogueError> {
        Self::entry_with_comment(caller, info_type, action_type, None)
    }

    /// Creates an entry with an optional comment.
    pub fn entry_with_comment(
        caller: &Caller,
        info_type: LoggingInfoType,
        action_type: ActionType,
        comment: Option<String>,
    ) -> Result<Self, CatalogueError> {
        if !info_type.allows(action_type) {
            return Err(CatalogueError::validation(format!(
                "logging-info action '{}' is not legal under type '{}'",
                action_type.as_str(),
                info_type.as_str()
            )));
        }
        Ok(LoggingInfo {
            date: Utc::now(),
            user_email: caller.email.clone(),
            user_full_name: caller.full_name.clone(),
            user_role: caller.role_label().to_string(),
            info_type,
            action_type,
            comment,
        })
    }

    /// Creates an update entry attributed to the system itself, used by
    /// synchronization hooks.
    pub fn system_update(action_type: ActionType) -> Result<Self, CatalogueError> {
        let mut entry = Self::entry(&Caller::system(), LoggingInfoType::Update, action_type)?;
        entry.user_role = "system".to_string();
        entry.user_full_name = "system".to_string();
        Ok(entry)
    }
}

/// Derived compliance state over the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditState {
    /// No audit entry exists
    NotAudited,
    /// Last audit passed and nothing changed since
    ValidAndNotUpdated,
    /// Last audit passed but the resource changed afterwards
    ValidAndUpdated,
    /// Last audit failed and nothing changed since
    InvalidAndNotUpdated,
    /// Last audit failed but the resource changed afterwards
    InvalidAndUpdated,
}

impl AuditState {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditState::NotAudited => "Not Audited",
            AuditState::ValidAndNotUpdated => "Valid and not updated",
            AuditState::ValidAndUpdated => "Valid and updated",
            AuditState::InvalidAndNotUpdated => "Invalid and not updated",
            AuditState::InvalidAndUpdated => "Invalid and updated",
        }
    }
}

/// Computes the audit state from an audit trail: find the most recent
/// `Audit` entry, then check whether any `Update` entry postdates it.
pub fn determine_audit_state(entries: &[LoggingInfo]) -> AuditState {
    let mut sorted: Vec<&LoggingInfo> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let audit_index = sorted
        .iter()
        .position(|entry| entry.info_type == LoggingInfoType::Audit);
    let Some(audit_index) = audit_index else {
        return AuditState::NotAudited;
    };
    let audited_valid = sorted[audit_index].action_type == ActionType::Valid;
    let updated_after = sorted[..audit_index]
        .iter()
        .any(|entry| entry.info_type == LoggingInfoType::Update);

    match (audited_valid, updated_after) {
        (true, false) => AuditState::ValidAndNotUpdated,
        (true, true) => AuditState::ValidAndUpdated,
        (false, false) => AuditState::InvalidAndNotUpdated,
        (false, true) => AuditState::InvalidAndUpdated,
    }
}

/// Returns the most recent entry of the given category, if any.
pub fn latest_of_type(entries: &[LoggingInfo], info_type: LoggingInfoType) -> Option<LoggingInfo> {
    entries
        .iter()
        .filter(|entry| entry.info_type == info_type)
        .max_by_key(|entry| entry.date)
        .cloned()
}
