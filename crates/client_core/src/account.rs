//! Account settings: staged profile edits, local validation, submission.

use shared::protocol::ProfileEdit;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::{
    error::{ChainStep, ValidationError},
    navigation::Route,
    screen::{run_step, Alert, Phase, ScreenEvent, ScreenKind, ScreenState},
    session::ScreenContext,
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const INVALID_PASSWORD_TITLE: &str = "Invalid Password";

/// Empty means unchanged. Anything shorter than `MIN_PASSWORD_LEN` characters is rejected.
pub fn validate_password(password: &str) -> Result<Option<String>, ValidationError> {
    if password.is_empty() {
        return Ok(None);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(Some(password.to_string()))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub image_ref: String,
    pub password: String,
}

impl ProfileDraft {
    pub fn can_submit(&self) -> bool {
        !self.name.is_empty() || !self.image_ref.is_empty() || !self.password.is_empty()
    }

    /// Converts the draft into the request body, leaving unchanged fields out.
    pub fn to_edit(&self) -> Result<ProfileEdit, ValidationError> {
        Ok(ProfileEdit {
            name: non_empty(&self.name),
            image_ref: non_empty(&self.image_ref),
            password: validate_password(&self.password)?,
        })
    }
}

pub struct AccountSettingsScreen {
    ctx: ScreenContext,
    state: ScreenState,
    draft: ProfileDraft,
    return_to: Route,
}

impl AccountSettingsScreen {
    pub fn new(ctx: ScreenContext, return_to: Route) -> Self {
        Self {
            ctx,
            state: ScreenState::new(ScreenKind::AccountSettings),
            draft: ProfileDraft::default(),
            return_to,
        }
    }

    pub fn phase(&self) -> &Phase {
        self.state.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state.phase().is_loading()
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn can_submit(&self) -> bool {
        self.draft.can_submit()
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

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_image(&mut self, image_ref: impl Into<String>) {
        self.draft.image_ref = image_ref.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.draft.password = password.into();
    }

    pub async fn submit_edit(&mut self) {
        if !self.draft.can_submit() {
            debug!("account: nothing staged, submit ignored");
            return;
        }

        let edit = match self.draft.to_edit() {
            Ok(edit) => edit,
            Err(err) => {
                info!(error = %err, "account: rejected staged edit");
                self.draft.password.clear();
                self.state.raise(Alert::titled(INVALID_PASSWORD_TITLE, err.to_string()));
                self.state.fail(err.into());
                return;
            }
        };

        let user_id = self.ctx.user_id().clone();
        self.state.transition(Phase::Loading);
        match run_step(ChainStep::EditUser, self.ctx.data.edit_user(&user_id, &edit)).await {
            Ok(()) => {
                info!(%user_id, "account: profile updated");
                self.state.transition(Phase::Ready);
                self.draft = ProfileDraft::default();
                self.ctx.navigator.navigate(self.return_to.clone());
            }
            Err(err) => {
                error!(%user_id, error = %err, "account: profile update failed");
                self.state.fail(err);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/account_tests.rs"]
mod tests;
