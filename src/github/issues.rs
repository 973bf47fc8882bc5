use serde::{Deserialize, Serialize};

/// An issue as returned by the Issues endpoints.
///
/// Only the fields the suite asserts on are kept; everything else in the
/// response is ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Issue {
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|title| !title.is_empty())
    }
}

/// Payload for `POST /repos/{owner}/{repo}/issues`
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct NewIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Payload for `PATCH /repos/{owner}/{repo}/issues/{id}`
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct IssuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}
