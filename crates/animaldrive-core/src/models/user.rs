use serde::{Deserialize, Serialize};

/// The signed-in account, as returned by the session check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl User {
    /// Full name when both parts are known, else the email, else "User".
    pub fn display_name(&self) -> String {
        match (non_empty(&self.first_name), non_empty(&self.last_name)) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            _ => non_empty(&self.email).unwrap_or("User").to_string(),
        }
    }

    /// Avatar fallback letter.
    pub fn initial(&self) -> char {
        non_empty(&self.first_name)
            .or_else(|| non_empty(&self.email))
            .and_then(|s| s.chars().next())
            .unwrap_or('U')
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
