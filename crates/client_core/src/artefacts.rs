//! Artefacts screen and the privacy-tab projection.

use shared::domain::{Artefact, ArtefactId, Privacy};
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::{
    error::ChainStep,
    navigation::{Origin, Route},
    screen::{run_step, Alert, Phase, ScreenEvent, ScreenKind, ScreenState},
    session::ScreenContext,
};

pub const REFRESH_FAILED_ALERT: &str = "Error loading artefacts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivacyTab {
    #[default]
    Public,
    Private,
}

impl PrivacyTab {
    pub fn from_public_selected(public_selected: bool) -> Self {
        if public_selected {
            PrivacyTab::Public
        } else {
            PrivacyTab::Private
        }
    }

    pub fn privacy(self) -> Privacy {
        match self {
            PrivacyTab::Public => Privacy::Public,
            PrivacyTab::Private => Privacy::Private,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PrivacyTab::Public => PrivacyTab::Private,
            PrivacyTab::Private => PrivacyTab::Public,
        }
    }
}

/// Stable filter: keeps the artefacts whose privacy matches `tab`, in input order.
pub fn filter_by_privacy(artefacts: &[Artefact], tab: PrivacyTab) -> Vec<&Artefact> {
    let privacy = tab.privacy();
    artefacts.iter().filter(|a| a.privacy == privacy).collect()
}

/// Text shown in place of the feed when a tab has no artefacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyFeedMessage {
    pub headline: String,
    pub hint: &'static str,
    pub detail: &'static str,
}

impl EmptyFeedMessage {
    pub fn for_tab(tab: PrivacyTab) -> Self {
        let detail = match tab {
            PrivacyTab::Public => "Public artefacts can be viewed by everyone",
            PrivacyTab::Private => "Private artefacts can only be seen by yourself",
        };
        Self {
            headline: format!(
                "Looks like you haven't posted any {} artefacts",
                tab.privacy().label()
            ),
            hint: "Click the \"+\" button to add some",
            detail,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ArtefactFeed<'a> {
    Items(Vec<&'a Artefact>),
    Empty(EmptyFeedMessage),
}

impl<'a> ArtefactFeed<'a> {
    pub fn project(artefacts: &'a [Artefact], tab: PrivacyTab) -> Self {
        let visible = filter_by_privacy(artefacts, tab);
        if visible.is_empty() {
            ArtefactFeed::Empty(EmptyFeedMessage::for_tab(tab))
        } else {
            ArtefactFeed::Items(visible)
        }
    }
}

pub struct ArtefactsScreen {
    ctx: ScreenContext,
    state: ScreenState,
    artefacts: Vec<Artefact>,
    tab: PrivacyTab,
    search_input: String,
}

impl ArtefactsScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            state: ScreenState::new(ScreenKind::Artefacts),
            artefacts: Vec::new(),
            tab: PrivacyTab::default(),
            search_input: String::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        self.state.phase()
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.phase().is_loading()
    }

    pub fn tab(&self) -> PrivacyTab {
        self.tab
    }

    pub fn artefacts(&self) -> &[Artefact] {
        &self.artefacts
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
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

    pub fn change_tab(&mut self) {
        self.tab = self.tab.toggled();
    }

    /// Recomputed on every call from the raw collection.
    pub fn feed(&self) -> ArtefactFeed<'_> {
        ArtefactFeed::project(&self.artefacts, self.tab)
    }

    pub async fn refresh(&mut self) {
        let user_id = self.ctx.user_id().clone();
        self.state.transition(Phase::Loading);
        match run_step(
            ChainStep::FetchArtefacts,
            self.ctx.data.fetch_user_artefacts(&user_id),
        )
        .await
        {
            Ok(artefacts) => {
                info!(%user_id, count = artefacts.len(), "artefacts: refreshed");
                self.artefacts = artefacts;
                self.state.transition(Phase::Ready);
            }
            Err(err) => {
                error!(%user_id, error = %err, "artefacts: refresh failed");
                self.state.fail(err);
                self.state.raise(Alert::message(REFRESH_FAILED_ALERT));
            }
        }
    }

    pub fn set_search_input(&mut self, input: impl Into<String>) {
        self.search_input = input.into();
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
    }

    pub fn submit_search(&self) {
        self.ctx.navigator.navigate(Route::GeneralSearch {
            terms: self.search_input.clone(),
        });
    }

    pub fn create_artefact(&self) {
        self.ctx.navigator.navigate(Route::ArtefactsForm {
            origin: Origin::Artefacts,
        });
    }

    pub fn open_artefact(&self, artefact_id: ArtefactId) {
        self.ctx.navigator.navigate(Route::SelectedArtefact {
            origin: Origin::Artefacts,
            artefact_id,
        });
    }
}

#[cfg(test)]
#[path = "tests/artefacts_tests.rs"]
mod tests;
