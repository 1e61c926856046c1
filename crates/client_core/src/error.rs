//! Error types for the data-access layer and the screen orchestrators.

use std::fmt;

use shared::error::ApiError;
use thiserror::Error;

/// Entity kind named in a `NotFound` failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Group,
    Artefact,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::User => "user",
            EntityKind::Group => "group",
            EntityKind::Artefact => "artefact",
        })
    }
}

#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: String },
    #[error("request rejected with status {status}: {error}")]
    Rejected { status: u16, error: ApiError },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl DataAccessError {
    pub fn not_found(entity: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type DataResult<T> = std::result::Result<T, DataAccessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Passwords must be at least {min} characters long")]
    PasswordTooShort { min: usize },
}

/// Remote step that failed inside an orchestrated chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStep {
    FetchUser,
    FetchGroup,
    AddMember,
    RemoveInvite,
    RefreshNotifications,
    RefreshGroups,
    EditUser,
    FetchArtefacts,
    LogOut,
}

impl fmt::Display for ChainStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChainStep::FetchUser => "fetch user",
            ChainStep::FetchGroup => "fetch group",
            ChainStep::AddMember => "add group member",
            ChainStep::RemoveInvite => "remove group invite",
            ChainStep::RefreshNotifications => "refresh notifications",
            ChainStep::RefreshGroups => "refresh groups",
            ChainStep::EditUser => "edit user",
            ChainStep::FetchArtefacts => "fetch artefacts",
            ChainStep::LogOut => "log out",
        })
    }
}

/// Failure as seen by a screen. Every variant ends up as a visible state
/// change on the orchestrator; none of them is returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("{entity} {id} no longer exists")]
    NotFound { entity: EntityKind, id: String },
    #[error("notification {notification_id} names no inviting user")]
    MissingInviter { notification_id: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{step} failed: {message}")]
    RemoteFailure { step: ChainStep, message: String },
}

impl ScreenError {
    pub fn remote(step: ChainStep, err: &DataAccessError) -> Self {
        match err {
            DataAccessError::NotFound { entity, id } => Self::NotFound {
                entity: *entity,
                id: id.clone(),
            },
            other => Self::RemoteFailure {
                step,
                message: other.to_string(),
            },
        }
    }
}
