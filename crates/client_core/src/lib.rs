//! Screen orchestration for the artefact sharing client.
//!
//! Each screen owns its transient state and talks to the backend only
//! through [`DataAccess`]. Collaborators arrive through [`ScreenContext`]
//! at construction; nothing is looked up globally.

pub mod account;
pub mod artefacts;
pub mod data_access;
pub mod error;
pub mod http;
pub mod invitation;
pub mod navigation;
pub mod profile;
pub mod screen;
pub mod session;

pub use account::{AccountSettingsScreen, ProfileDraft};
pub use artefacts::{filter_by_privacy, ArtefactFeed, ArtefactsScreen, PrivacyTab};
pub use data_access::DataAccess;
pub use error::{DataAccessError, ScreenError, ValidationError};
pub use http::HttpDataAccess;
pub use invitation::{InvitationDetails, InvitationScreen};
pub use navigation::{LoggingNavigator, Navigator, Origin, Route};
pub use profile::ProfileScreen;
pub use screen::{Alert, Phase, ScreenEvent};
pub use session::{ScreenContext, Session};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
