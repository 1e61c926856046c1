//! Invitation screen: resolves a group-invite notification and runs the
//! accept/decline chains.

use futures::future::join;
use shared::domain::{Group, GroupId, Notification, User, UserId};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::{
    error::{ChainStep, EntityKind, ScreenError},
    navigation::{Origin, Route},
    screen::{run_step, Alert, Phase, ScreenEvent, ScreenKind, ScreenState},
    session::ScreenContext,
};

pub const GROUP_DELETED_ALERT: &str = "Group has been deleted";
pub const LOAD_FAILED_ALERT: &str = "Error loading invitation data";
pub const ACCEPT_FAILED_ALERT: &str = "Error accepting invitation";
pub const DECLINE_FAILED_ALERT: &str = "Error declining invitation";

#[derive(Debug, Clone, PartialEq)]
pub struct InvitationDetails {
    pub inviter: User,
    pub group: Group,
    pub thumbnail_url: Option<String>,
}

impl InvitationDetails {
    pub fn headline(&self) -> String {
        format!(
            "@{} has invited you to join the group:",
            self.inviter.username
        )
    }
}

pub struct InvitationScreen {
    ctx: ScreenContext,
    notification: Notification,
    state: ScreenState,
    details: Option<InvitationDetails>,
}

impl InvitationScreen {
    pub fn new(ctx: ScreenContext, notification: Notification) -> Self {
        Self {
            ctx,
            notification,
            state: ScreenState::new(ScreenKind::Invitation),
            details: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        self.state.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state.phase().is_loading()
    }

    /// Only populated once both the inviter and the group have been fetched.
    pub fn details(&self) -> Option<&InvitationDetails> {
        self.details.as_ref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.state.alert()
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.state.dismiss_alert()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ScreenEvent> {
        self.state.subscribe()
    }

    /// Fetches the inviting user and the group concurrently. Both must succeed
    /// before details are exposed; a failure of either is final for this screen.
    pub async fn load(&mut self) {
        let group_id = GroupId::new(self.notification.ref_id.clone());
        let Some(inviter_id) = self.notification.data.other_user.clone() else {
            warn!(notification_id = %self.notification.id, "invitation: notification has no inviter");
            self.state.fail(ScreenError::MissingInviter {
                notification_id: self.notification.id.to_string(),
            });
            self.state.raise(Alert::message(LOAD_FAILED_ALERT));
            return;
        };

        self.state.transition(Phase::Loading);
        let data = &self.ctx.data;
        let (inviter, group) = join(
            run_step(ChainStep::FetchUser, data.fetch_user(&inviter_id)),
            run_step(ChainStep::FetchGroup, data.fetch_group(&group_id)),
        )
        .await;

        let (inviter, group) = match (inviter, group) {
            (Ok(inviter), Ok(group)) => (inviter, group),
            // The group error wins: a deleted group is the case users can act on.
            (_, Err(err)) | (Err(err), Ok(_)) => {
                error!(%group_id, error = %err, "invitation: failed to load");
                let message = match &err {
                    ScreenError::NotFound {
                        entity: EntityKind::Group,
                        ..
                    } => GROUP_DELETED_ALERT,
                    _ => LOAD_FAILED_ALERT,
                };
                self.state.fail(err);
                self.state.raise(Alert::message(message));
                return;
            }
        };

        info!(%group_id, inviter = %inviter.id, "invitation: loaded");
        self.details = Some(InvitationDetails {
            inviter,
            group,
            thumbnail_url: self.notification.thumbnail_url.clone(),
        });
        self.state.transition(Phase::Ready);
    }

    /// Joins the group: add member, remove invite, refresh notifications,
    /// refresh groups. Each step gates the next. On success the invitation
    /// screen is replaced by the group screen.
    pub async fn accept_invite(&mut self) {
        let Some(group_id) = self.loaded_group_id() else {
            return;
        };
        let user_id = self.ctx.user_id().clone();
        info!(%group_id, %user_id, "invitation: accepting");

        self.state.transition(Phase::Loading);
        match self.run_accept_chain(&group_id, &user_id).await {
            Ok(()) => {
                self.state.transition(Phase::Ready);
                self.ctx.navigator.replace(Route::SelectedGroup {
                    origin: Origin::Notification,
                    group_id,
                });
            }
            Err(err) => {
                // Steps that already succeeded are not compensated.
                error!(%group_id, error = %err, "invitation: accept aborted");
                self.state.fail(err);
                self.state.raise(Alert::message(ACCEPT_FAILED_ALERT));
            }
        }
    }

    /// Removes the invite, refreshes notifications and goes back to the list.
    pub async fn decline_invite(&mut self) {
        let Some(group_id) = self.loaded_group_id() else {
            return;
        };
        let user_id = self.ctx.user_id().clone();
        info!(%group_id, %user_id, "invitation: declining");

        self.state.transition(Phase::Loading);
        match self.run_decline_chain(&group_id, &user_id).await {
            Ok(()) => {
                self.state.transition(Phase::Ready);
                self.ctx.navigator.navigate(Route::Notification);
            }
            Err(err) => {
                error!(%group_id, error = %err, "invitation: decline aborted");
                self.state.fail(err);
                self.state.raise(Alert::message(DECLINE_FAILED_ALERT));
            }
        }
    }

    fn loaded_group_id(&self) -> Option<GroupId> {
        let group_id = self.details.as_ref().map(|d| d.group.id.clone());
        if group_id.is_none() {
            warn!(
                notification_id = %self.notification.id,
                "invitation: ignoring action before details are loaded"
            );
        }
        group_id
    }

    async fn run_accept_chain(&self, group_id: &GroupId, user_id: &UserId) -> Result<(), ScreenError> {
        let data = &self.ctx.data;
        run_step(ChainStep::AddMember, data.add_group_member(group_id, user_id)).await?;
        run_step(ChainStep::RemoveInvite, data.remove_group_invite(group_id, user_id)).await?;
        run_step(
            ChainStep::RefreshNotifications,
            data.fetch_user_notifications(user_id),
        )
        .await?;
        run_step(ChainStep::RefreshGroups, data.fetch_user_groups(user_id)).await?;
        Ok(())
    }

    async fn run_decline_chain(&self, group_id: &GroupId, user_id: &UserId) -> Result<(), ScreenError> {
        let data = &self.ctx.data;
        run_step(ChainStep::RemoveInvite, data.remove_group_invite(group_id, user_id)).await?;
        run_step(
            ChainStep::RefreshNotifications,
            data.fetch_user_notifications(user_id),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/invitation_tests.rs"]
mod tests;
