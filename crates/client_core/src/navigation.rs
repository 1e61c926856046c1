//! Screen routes and the navigation collaborator.

use std::fmt;

use shared::domain::{ArtefactId, GroupId};

/// Screen a navigation request originates from, forwarded so the target can
/// offer a way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Notification,
    Artefacts,
    Profile,
    Groups,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Notification,
    Artefacts,
    Profile,
    Auth,
    SelectedGroup { origin: Origin, group_id: GroupId },
    SelectedArtefact { origin: Origin, artefact_id: ArtefactId },
    ArtefactsForm { origin: Origin },
    GeneralSearch { terms: String },
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Notification => f.write_str("Notification"),
            Route::Artefacts => f.write_str("Artefacts"),
            Route::Profile => f.write_str("Profile"),
            Route::Auth => f.write_str("Auth"),
            Route::SelectedGroup { group_id, .. } => write!(f, "SelectedGroup({group_id})"),
            Route::SelectedArtefact { artefact_id, .. } => {
                write!(f, "SelectedArtefact({artefact_id})")
            }
            Route::ArtefactsForm { .. } => f.write_str("ArtefactsForm"),
            Route::GeneralSearch { terms } => write!(f, "GeneralSearch({terms:?})"),
        }
    }
}

pub trait Navigator: Send + Sync {
    /// Pushes `route` on top of the current screen.
    fn navigate(&self, route: Route);
    /// Replaces the current screen so it is not reachable with "back".
    fn replace(&self, route: Route);
}

/// Navigator for headless front ends: records requests through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(%route, "navigation: push");
    }

    fn replace(&self, route: Route) {
        tracing::info!(%route, "navigation: replace");
    }
}
