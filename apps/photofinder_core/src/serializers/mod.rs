pub mod booking;
pub mod photo;
pub mod user_auth;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResp {
    pub message: String,
}

/// Id fields arrive as JSON numbers from some clients and as strings from
/// form-driven ones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Num(i64),
    Text(String),
}

impl IdInput {
    /// An empty or whitespace-only string.
    pub fn is_blank(&self) -> bool {
        matches!(self, IdInput::Text(s) if s.trim().is_empty())
    }

    pub fn to_id(&self) -> Option<i32> {
        match self {
            IdInput::Num(n) => i32::try_from(*n).ok(),
            IdInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Present and non-blank.
pub(crate) fn filled(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_input_accepts_numbers_and_numeric_strings() {
        let n: IdInput = serde_json::from_str("12").unwrap();
        let s: IdInput = serde_json::from_str("\" 12 \"").unwrap();
        assert_eq!(n.to_id(), Some(12));
        assert_eq!(s.to_id(), Some(12));
        assert!(!s.is_blank());
    }

    #[test]
    fn id_input_rejects_garbage() {
        let s: IdInput = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(s.to_id(), None);
        let big: IdInput = serde_json::from_str("99999999999").unwrap();
        assert_eq!(big.to_id(), None);
        let blank: IdInput = serde_json::from_str("\"  \"").unwrap();
        assert!(blank.is_blank());
    }
}
