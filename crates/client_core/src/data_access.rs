use async_trait::async_trait;
use shared::{
    domain::{Artefact, Group, GroupId, Notification, User, UserId},
    protocol::ProfileEdit,
};

use crate::error::DataResult;

/// Networking/storage collaborator used by every screen orchestrator.
///
/// Mutations are not guaranteed idempotent by the orchestrators: re-running
/// a chain after a partial failure repeats whatever steps already succeeded.
/// Implementations decide whether a repeated `add_group_member` or
/// `remove_group_invite` is a no-op or an error.
#[async_trait]
pub trait DataAccess: Send + Sync {
    async fn fetch_user(&self, user_id: &UserId) -> DataResult<User>;
    async fn fetch_group(&self, group_id: &GroupId) -> DataResult<Group>;
    async fn add_group_member(&self, group_id: &GroupId, user_id: &UserId) -> DataResult<()>;
    async fn remove_group_invite(&self, group_id: &GroupId, user_id: &UserId) -> DataResult<()>;
    async fn fetch_user_notifications(&self, user_id: &UserId) -> DataResult<Vec<Notification>>;
    async fn fetch_user_groups(&self, user_id: &UserId) -> DataResult<Vec<Group>>;
    async fn edit_user(&self, user_id: &UserId, edit: &ProfileEdit) -> DataResult<()>;
    async fn fetch_user_artefacts(&self, user_id: &UserId) -> DataResult<Vec<Artefact>>;
    async fn log_out(&self) -> DataResult<()>;
}
