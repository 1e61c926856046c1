//! `DataAccess` over the artefact backend's JSON HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Artefact, Group, GroupId, Notification, User, UserId},
    error::ApiError,
    protocol::ProfileEdit,
};
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::{
    data_access::DataAccess,
    error::{DataAccessError, DataResult, EntityKind},
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the bearer token for the login it was built with. A successful
/// `log_out` drops it.
pub struct HttpDataAccess {
    http: Client,
    base_url: Url,
    access_token: RwLock<Option<String>>,
}

impl HttpDataAccess {
    pub fn new(base_url: &str, timeout: Duration) -> DataResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            access_token: RwLock::new(None),
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = RwLock::new(Some(token.into()));
        self
    }

    pub async fn has_access_token(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.access_token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        entity: EntityKind,
        id: &str,
    ) -> DataResult<Response> {
        let response = self.authorized(request).await.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "http: response");
        if status == StatusCode::NOT_FOUND {
            return Err(DataAccessError::not_found(entity, id));
        }
        if !status.is_success() {
            let body = response.text().await?;
            return Err(DataAccessError::Rejected {
                status: status.as_u16(),
                error: ApiError::from_response(status.as_u16(), &body),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        entity: EntityKind,
        id: &str,
    ) -> DataResult<T> {
        let request = self.http.get(self.endpoint(segments));
        Ok(self.send(request, entity, id).await?.json().await?)
    }
}

#[async_trait]
impl DataAccess for HttpDataAccess {
    async fn fetch_user(&self, user_id: &UserId) -> DataResult<User> {
        self.get_json(&["users", user_id.as_str()], EntityKind::User, user_id.as_str())
            .await
    }

    async fn fetch_group(&self, group_id: &GroupId) -> DataResult<Group> {
        self.get_json(
            &["groups", group_id.as_str()],
            EntityKind::Group,
            group_id.as_str(),
        )
        .await
    }

    async fn add_group_member(&self, group_id: &GroupId, user_id: &UserId) -> DataResult<()> {
        let url = self.endpoint(&["groups", group_id.as_str(), "members", user_id.as_str()]);
        self.send(self.http.put(url), EntityKind::Group, group_id.as_str())
            .await?;
        Ok(())
    }

    async fn remove_group_invite(&self, group_id: &GroupId, user_id: &UserId) -> DataResult<()> {
        let url = self.endpoint(&["groups", group_id.as_str(), "invites", user_id.as_str()]);
        self.send(self.http.delete(url), EntityKind::Group, group_id.as_str())
            .await?;
        Ok(())
    }

    async fn fetch_user_notifications(&self, user_id: &UserId) -> DataResult<Vec<Notification>> {
        self.get_json(
            &["notifications", "user", user_id.as_str()],
            EntityKind::User,
            user_id.as_str(),
        )
        .await
    }

    async fn fetch_user_groups(&self, user_id: &UserId) -> DataResult<Vec<Group>> {
        self.get_json(
            &["groups", "user", user_id.as_str()],
            EntityKind::User,
            user_id.as_str(),
        )
        .await
    }

    async fn edit_user(&self, user_id: &UserId, edit: &ProfileEdit) -> DataResult<()> {
        let request = self
            .http
            .patch(self.endpoint(&["users", user_id.as_str()]))
            .json(edit);
        self.send(request, EntityKind::User, user_id.as_str())
            .await?;
        Ok(())
    }

    async fn fetch_user_artefacts(&self, user_id: &UserId) -> DataResult<Vec<Artefact>> {
        self.get_json(
            &["artefacts", "user", user_id.as_str()],
            EntityKind::User,
            user_id.as_str(),
        )
        .await
    }

    async fn log_out(&self) -> DataResult<()> {
        let request = self.http.post(self.endpoint(&["auth", "logout"]));
        self.send(request, EntityKind::User, "session").await?;
        if self.access_token.write().await.take().is_some() {
            info!("http: access token dropped after logout");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
