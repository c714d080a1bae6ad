//! Session user information tool.

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolParam};

/// Static per-session user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub username: String,
    pub email: Option<String>,
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            username: "TestUser".to_string(),
            email: Some("test@example.com".to_string()),
        }
    }
}

impl UserContext {
    /// Text block handed to the model by [`GetUserInfo`].
    pub fn describe(&self) -> String {
        let mut info = format!("User Information:\nUsername: {}", self.username);
        if let Some(email) = &self.email {
            info.push_str(&format!("\nEmail: {}", email));
        }
        info
    }
}

/// Report the current user's name and email.
pub struct GetUserInfo;

#[async_trait]
impl Tool for GetUserInfo {
    fn name(&self) -> &str {
        "get_user_info"
    }

    fn description(&self) -> &str {
        "Get the username and email of the user asking the question."
    }

    fn params(&self) -> &'static [ToolParam] {
        &[]
    }

    async fn execute(&self, _args: Value, ctx: &UserContext) -> anyhow::Result<String> {
        Ok(ctx.describe())
    }
}
