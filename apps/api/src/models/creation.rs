use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Discriminates how a creation is rendered by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreationType {
    Article,
    BlogTitle,
    Image,
    ResumeReview,
}

impl CreationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationType::Article => "article",
            CreationType::BlogTitle => "blog-title",
            CreationType::Image => "image",
            CreationType::ResumeReview => "resume-review",
        }
    }
}

impl fmt::Display for CreationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CreationType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "article" => Ok(CreationType::Article),
            "blog-title" => Ok(CreationType::BlogTitle),
            "image" => Ok(CreationType::Image),
            "resume-review" => Ok(CreationType::ResumeReview),
            other => Err(format!("unknown creation type '{other}'")),
        }
    }
}

/// A persisted AI artifact. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreationRow {
    pub id: i64,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    #[sqlx(rename = "type", try_from = "String")]
    #[serde(rename = "type")]
    pub kind: CreationType,
    pub publish: bool,
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for one successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCreation {
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    pub kind: CreationType,
    pub publish: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_type_serializes_kebab_case() {
        let json = serde_json::to_string(&CreationType::BlogTitle).unwrap();
        assert_eq!(json, "\"blog-title\"");
        assert_eq!(CreationType::ResumeReview.as_str(), "resume-review");
    }

    #[test]
    fn test_creation_type_parses_stored_text() {
        assert_eq!(
            CreationType::try_from("image".to_string()).unwrap(),
            CreationType::Image
        );
        assert!(CreationType::try_from("video".to_string()).is_err());
    }
}
