//! Protocol Messages
//!
//! Wire format for client-server communication: one action code plus an
//! ordered list of string content fields. Field meaning is positional and
//! action-specific (for `login`, contents[0] is the username and contents[1]
//! the password). Messages travel as JSON text frames for debugging ease,
//! with optional binary (bincode) frames.

use serde::{Deserialize, Serialize};

use crate::protocol::action::Action;

/// One protocol unit: action code + ordered content fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Numeric action code. May be any byte on the inbound path; decode
    /// through [`Package::kind`] before acting on it.
    pub action: u8,
    /// Ordered content fields.
    pub contents: Vec<String>,
}

impl Package {
    /// Build an outbound message for `action`.
    ///
    /// When the action's reply text is server-authored, `contents` is
    /// ignored in favor of the protocol's default payload.
    pub fn build(action: Action, contents: Vec<String>) -> Self {
        let code = action.code();
        let contents = if action.uses_default_content() {
            Action::default_content(code).unwrap_or_default()
        } else {
            contents
        };
        Self { action: code, contents }
    }

    /// Build a content-free outbound message.
    pub fn notify(action: Action) -> Self {
        Self::build(action, Vec::new())
    }

    /// Decode the action code. `None` means the code is not in the table.
    pub fn kind(&self) -> Option<Action> {
        Action::from_code(self.action)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.kind().map_or("?", Action::name);
        write!(f, "{} ({}): [{}]", name, self.action, self.contents.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_keeps_caller_content() {
        let pkg = Package::build(
            Action::LoginSuccessful,
            vec!["token-123".to_string()],
        );
        assert_eq!(pkg.action, 13);
        assert_eq!(pkg.contents, vec!["token-123".to_string()]);
    }

    #[test]
    fn build_substitutes_default_content() {
        // Caller-supplied text on a server-authored reply is discarded.
        let pkg = Package::build(
            Action::LoginFailure,
            vec!["should not appear".to_string()],
        );
        assert_eq!(pkg.contents, vec!["Invalid username or password.".to_string()]);

        let pkg = Package::build(Action::DuplicateLogin, Vec::new());
        assert_eq!(pkg.contents, vec!["Already logged in.".to_string()]);

        // Codes with no canned payload fall back to empty contents.
        let pkg = Package::build(Action::LogoutSuccessful, vec!["x".to_string()]);
        assert!(pkg.contents.is_empty());
    }

    #[test]
    fn json_round_trip() {
        let pkg = Package::build(
            Action::Login,
            vec!["ana".to_string(), "1234".to_string()],
        );
        let json = pkg.to_json().unwrap();
        let parsed = Package::from_json(&json).unwrap();
        assert_eq!(parsed, pkg);
        assert_eq!(parsed.kind(), Some(Action::Login));
    }

    #[test]
    fn binary_round_trip() {
        let pkg = Package::build(Action::GetBoard, vec!["A".to_string()]);
        let bytes = pkg.to_bytes().unwrap();
        let parsed = Package::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, pkg);
    }

    #[test]
    fn unrecognized_code_decodes_to_none() {
        let pkg = Package { action: 99, contents: Vec::new() };
        assert_eq!(pkg.kind(), None);
    }
}
