//! Permission levels and effective-access resolution types.

use serde::{Deserialize, Serialize};

use scribehub_core::AppError;
use scribehub_core::types::id::UserId;

/// A grant level binding one user to one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    /// The user may read the document but not modify it.
    #[serde(rename = "read-only")]
    ReadOnly,
    /// The user may read and modify the document.
    #[serde(rename = "read-write")]
    ReadWrite,
}

impl AccessLevel {
    /// Return the level as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-only" => Ok(Self::ReadOnly),
            "read-write" => Ok(Self::ReadWrite),
            _ => Err(AppError::validation(format!(
                "Invalid permission type: '{s}'"
            ))),
        }
    }
}

/// One entry in a document's permission list.
///
/// The document invariant guarantees at most one entry per user, and the
/// owner never appears here (ownership resolves read-write on its own).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// The user holding the grant.
    pub user_id: UserId,
    /// The granted level.
    pub permission: AccessLevel,
}

/// The resolved access outcome for a (user, document) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectiveAccess {
    /// No access.
    None,
    /// Read access only.
    ReadOnly,
    /// Full read-write access.
    ReadWrite,
}

impl EffectiveAccess {
    /// Whether this outcome permits reading.
    pub fn can_read(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether this outcome permits writing.
    pub fn can_write(&self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

impl From<AccessLevel> for EffectiveAccess {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::ReadOnly => Self::ReadOnly,
            AccessLevel::ReadWrite => Self::ReadWrite,
        }
    }
}
