use chrono::{DateTime, Datelike, Utc};
use shared::domain::User;
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::{
    error::ChainStep,
    navigation::Route,
    screen::{run_step, Alert, Phase, ScreenEvent, ScreenKind, ScreenState},
    session::ScreenContext,
};

pub const LOAD_FAILED_ALERT: &str = "Error loading profile";
pub const LOGOUT_FAILED_ALERT: &str = "Error logging out";

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// `"joined since 3rd March 2020"`
pub fn format_joined_since(joined: DateTime<Utc>) -> String {
    let day = joined.day();
    format!(
        "joined since {day}{} {}",
        ordinal_suffix(day),
        joined.format("%B %Y")
    )
}

pub struct ProfileScreen {
    ctx: ScreenContext,
    state: ScreenState,
    profile: Option<User>,
}

impl ProfileScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            state: ScreenState::new(ScreenKind::Profile),
            profile: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        self.state.phase()
    }

    pub fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    pub fn joined_since(&self) -> Option<String> {
        self.profile
            .as_ref()
            .and_then(|user| user.date_joined)
            .map(format_joined_since)
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

    pub async fn load(&mut self) {
        let user_id = self.ctx.user_id().clone();
        self.state.transition(Phase::Loading);
        match run_step(ChainStep::FetchUser, self.ctx.data.fetch_user(&user_id)).await {
            Ok(user) => {
                self.profile = Some(user);
                self.state.transition(Phase::Ready);
            }
            Err(err) => {
                error!(%user_id, error = %err, "profile: load failed");
                self.state.fail(err);
                self.state.raise(Alert::message(LOAD_FAILED_ALERT));
            }
        }
    }

    pub async fn log_out(&mut self) {
        let user_id = self.ctx.user_id().clone();
        self.state.transition(Phase::Loading);
        match run_step(ChainStep::LogOut, self.ctx.data.log_out()).await {
            Ok(()) => {
                info!(%user_id, "profile: logged out");
                self.profile = None;
                self.state.transition(Phase::Idle);
                self.ctx.navigator.navigate(Route::Auth);
            }
            Err(err) => {
                error!(%user_id, error = %err, "profile: logout failed");
                self.state.fail(err);
                self.state.raise(Alert::message(LOGOUT_FAILED_ALERT));
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/profile_tests.rs"]
mod tests;
