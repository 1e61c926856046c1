//! In-memory collaborators for orchestrator tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::{
    domain::{
        Artefact, ArtefactId, Group, GroupId, Notification, NotificationData, NotificationId,
        NotificationKind, Privacy, User, UserId,
    },
    error::{ApiError, ErrorCode},
    protocol::ProfileEdit,
};
use tokio::sync::Barrier;

use crate::{
    data_access::DataAccess,
    error::{DataAccessError, DataResult, EntityKind},
    navigation::{Navigator, Route},
    session::{ScreenContext, Session},
};

pub const SELF_ID: &str = "u-self";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchUser(UserId),
    FetchGroup(GroupId),
    AddGroupMember(GroupId, UserId),
    RemoveGroupInvite(GroupId, UserId),
    FetchUserNotifications(UserId),
    FetchUserGroups(UserId),
    EditUser(UserId, ProfileEdit),
    FetchUserArtefacts(UserId),
    LogOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchUser,
    FetchGroup,
    AddMember,
    RemoveInvite,
    Notifications,
    Groups,
    EditUser,
    Artefacts,
    LogOut,
}

#[derive(Default)]
pub struct FakeDataAccess {
    users: HashMap<UserId, User>,
    groups: Mutex<HashMap<GroupId, Group>>,
    artefacts: Vec<Artefact>,
    notifications: Vec<Notification>,
    failures: Mutex<HashMap<Op, u16>>,
    fetch_barrier: Option<Arc<Barrier>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeDataAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id.clone(), user);
        self
    }

    pub fn with_group(self, group: Group) -> Self {
        self.groups
            .lock()
            .expect("groups lock")
            .insert(group.id.clone(), group);
        self
    }

    pub fn with_artefacts(mut self, artefacts: Vec<Artefact>) -> Self {
        self.artefacts = artefacts;
        self
    }

    pub fn with_notifications(mut self, notifications: Vec<Notification>) -> Self {
        self.notifications = notifications;
        self
    }

    /// Makes `op` fail with the given HTTP status. 404 becomes `NotFound`.
    pub fn failing(self, op: Op, status: u16) -> Self {
        self.fail_now(op, status);
        self
    }

    pub fn fail_now(&self, op: Op, status: u16) {
        self.failures
            .lock()
            .expect("failures lock")
            .insert(op, status);
    }

    pub fn recover(&self, op: Op) {
        self.failures.lock().expect("failures lock").remove(&op);
    }

    /// Both entity fetches must reach the barrier before either returns.
    pub fn with_fetch_barrier(mut self) -> Self {
        self.fetch_barrier = Some(Arc::new(Barrier::new(2)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn group(&self, group_id: &GroupId) -> Option<Group> {
        self.groups
            .lock()
            .expect("groups lock")
            .get(group_id)
            .cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn check(&self, op: Op, entity: EntityKind, id: &str) -> DataResult<()> {
        let status = self.failures.lock().expect("failures lock").get(&op).copied();
        match status {
            None => Ok(()),
            Some(404) => Err(DataAccessError::not_found(entity, id)),
            Some(status) => Err(DataAccessError::Rejected {
                status,
                error: ApiError::new(ErrorCode::from_status(status), "injected failure"),
            }),
        }
    }

    async fn rendezvous(&self) {
        if let Some(barrier) = &self.fetch_barrier {
            barrier.wait().await;
        }
    }
}

#[async_trait]
impl DataAccess for FakeDataAccess {
    async fn fetch_user(&self, user_id: &UserId) -> DataResult<User> {
        self.record(Call::FetchUser(user_id.clone()));
        self.rendezvous().await;
        self.check(Op::FetchUser, EntityKind::User, user_id.as_str())?;
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| DataAccessError::not_found(EntityKind::User, user_id))
    }

    async fn fetch_group(&self, group_id: &GroupId) -> DataResult<Group> {
        self.record(Call::FetchGroup(group_id.clone()));
        self.rendezvous().await;
        self.check(Op::FetchGroup, EntityKind::Group, group_id.as_str())?;
        self.group(group_id)
            .ok_or_else(|| DataAccessError::not_found(EntityKind::Group, group_id))
    }

    async fn add_group_member(&self, group_id: &GroupId, user_id: &UserId) -> DataResult<()> {
        self.record(Call::AddGroupMember(group_id.clone(), user_id.clone()));
        self.check(Op::AddMember, EntityKind::Group, group_id.as_str())?;
        let mut groups = self.groups.lock().expect("groups lock");
        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| DataAccessError::not_found(EntityKind::Group, group_id))?;
        if !group.has_member(user_id) {
            group.members.push(user_id.clone());
        }
        Ok(())
    }

    async fn remove_group_invite(&self, group_id: &GroupId, user_id: &UserId) -> DataResult<()> {
        self.record(Call::RemoveGroupInvite(group_id.clone(), user_id.clone()));
        self.check(Op::RemoveInvite, EntityKind::Group, group_id.as_str())?;
        let mut groups = self.groups.lock().expect("groups lock");
        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| DataAccessError::not_found(EntityKind::Group, group_id))?;
        group.pending_invitations.retain(|id| id != user_id);
        Ok(())
    }

    async fn fetch_user_notifications(&self, user_id: &UserId) -> DataResult<Vec<Notification>> {
        self.record(Call::FetchUserNotifications(user_id.clone()));
        self.check(Op::Notifications, EntityKind::User, user_id.as_str())?;
        Ok(self
            .notifications
            .iter()
            .filter(|n| &n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_user_groups(&self, user_id: &UserId) -> DataResult<Vec<Group>> {
        self.record(Call::FetchUserGroups(user_id.clone()));
        self.check(Op::Groups, EntityKind::User, user_id.as_str())?;
        let groups = self.groups.lock().expect("groups lock");
        Ok(groups
            .values()
            .filter(|g| g.has_member(user_id))
            .cloned()
            .collect())
    }

    async fn edit_user(&self, user_id: &UserId, edit: &ProfileEdit) -> DataResult<()> {
        self.record(Call::EditUser(user_id.clone(), edit.clone()));
        self.check(Op::EditUser, EntityKind::User, user_id.as_str())
    }

    async fn fetch_user_artefacts(&self, user_id: &UserId) -> DataResult<Vec<Artefact>> {
        self.record(Call::FetchUserArtefacts(user_id.clone()));
        self.check(Op::Artefacts, EntityKind::User, user_id.as_str())?;
        Ok(self
            .artefacts
            .iter()
            .filter(|a| &a.owner == user_id)
            .cloned()
            .collect())
    }

    async fn log_out(&self) -> DataResult<()> {
        self.record(Call::LogOut);
        self.check(Op::LogOut, EntityKind::User, SELF_ID)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Navigate(Route),
    Replace(Route),
}

#[derive(Default)]
pub struct RecordingNavigator {
    actions: Mutex<Vec<NavAction>>,
}

impl RecordingNavigator {
    pub fn actions(&self) -> Vec<NavAction> {
        self.actions.lock().expect("nav lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.actions
            .lock()
            .expect("nav lock")
            .push(NavAction::Navigate(route));
    }

    fn replace(&self, route: Route) {
        self.actions
            .lock()
            .expect("nav lock")
            .push(NavAction::Replace(route));
    }
}

pub fn user(id: &str, username: &str) -> User {
    User {
        id: UserId::new(id),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        name: username.to_string(),
        profile_pic: None,
        date_joined: None,
    }
}

pub fn group_with_invite(id: &str, title: &str, invited: &str) -> Group {
    Group {
        id: GroupId::new(id),
        title: title.to_string(),
        description: None,
        cover_photo: None,
        members: vec![UserId::new("u-admin")],
        pending_invitations: vec![UserId::new(invited)],
    }
}

pub fn artefact(id: &str, privacy: Privacy) -> Artefact {
    Artefact {
        id: ArtefactId::new(id),
        owner: UserId::new(SELF_ID),
        title: format!("artefact {id}"),
        description: String::new(),
        privacy,
        images: Vec::new(),
        comments: Vec::new(),
    }
}

pub fn invite_notification(group_id: &str, from: &str) -> Notification {
    Notification {
        id: NotificationId::new(format!("n-{group_id}")),
        user_id: UserId::new(SELF_ID),
        ref_id: group_id.to_string(),
        kind: NotificationKind::GroupInvite,
        data: NotificationData {
            other_user: Some(UserId::new(from)),
        },
        thumbnail_url: None,
    }
}

pub fn context(
    data: Arc<FakeDataAccess>,
    navigator: Arc<RecordingNavigator>,
) -> ScreenContext {
    ScreenContext::new(
        data,
        Arc::new(Session::new(user(SELF_ID, "me"))),
        navigator,
    )
}
