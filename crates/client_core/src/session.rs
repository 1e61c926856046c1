use std::sync::Arc;

use shared::domain::{User, UserId};

use crate::{data_access::DataAccess, navigation::Navigator};

/// Identity of the acting user for the lifetime of a login. Credentials
/// belong to the `DataAccess` implementation, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}

/// Collaborators handed to each orchestrator at construction.
#[derive(Clone)]
pub struct ScreenContext {
    pub data: Arc<dyn DataAccess>,
    pub session: Arc<Session>,
    pub navigator: Arc<dyn Navigator>,
}

impl ScreenContext {
    pub fn new(
        data: Arc<dyn DataAccess>,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            data,
            session,
            navigator,
        }
    }

    pub fn user_id(&self) -> &UserId {
        self.session.user_id()
    }
}
