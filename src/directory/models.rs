use serde::{Deserialize, Serialize};

/// One directory entry. Flat scalar fields only; the upstream API nests
/// address/company objects but those never reach the directory view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    // Upstream assigns ids; users added through the form have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl User {
    /// Entry created from the add-user form.
    pub fn from_form(name: String, email: String) -> Self {
        Self {
            id: None,
            name,
            email,
            username: None,
            phone: None,
            website: None,
        }
    }
}
