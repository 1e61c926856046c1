use serde::{Deserialize, Serialize};

/// Profile fields staged for an account edit. `None` means "leave unchanged"
/// and is omitted from the request body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "imageURI", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfileEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image_ref.is_none() && self.password.is_none()
    }
}
