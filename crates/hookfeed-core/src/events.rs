use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{Rejection, validate};

/// Repository action carried by a notification record.
///
/// Unrecognized action strings are kept verbatim so they can be reported
/// when the record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Push,
    PullRequest,
    Merge,
    Unknown(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Push => "PUSH",
            Self::PullRequest => "PULL_REQUEST",
            Self::Merge => "MERGE",
            Self::Unknown(s) => s,
        }
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PUSH" => Self::Push,
            "PULL_REQUEST" => Self::PullRequest,
            "MERGE" => Self::Merge,
            _ => Self::Unknown(s),
        }
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Unknown(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification record as served by the notification endpoint.
///
/// Every field is optional on the wire; `null` and absent are equivalent.
/// Text fields also accept numbers and booleans, which are kept in their
/// JSON spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub from_branch: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub to_branch: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub request_id: Option<String>,
}

impl TryFrom<serde_json::Value> for RawEvent {
    type Error = Rejection;

    /// Decode one element of a fetched batch. Only JSON objects are records.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        if !value.is_object() {
            return Err(Rejection::Malformed("expected a JSON object".to_string()));
        }
        serde_json::from_value(value).map_err(|e| Rejection::Malformed(e.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Flag(bool),
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Uint(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
    }))
}

/// A record that passed validation, together with its rendered text.
///
/// Deserializing goes through [`RawEvent`] and validation, so any incoming
/// `displayText` is ignored and recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct DisplayEvent {
    #[serde(flatten)]
    raw: RawEvent,
    #[serde(rename = "displayText")]
    display_text: String,
}

impl DisplayEvent {
    pub fn raw(&self) -> &RawEvent {
        &self.raw
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Identity used by renderers: `{request_id}-{timestamp}`.
    pub fn key(&self) -> String {
        format!(
            "{}-{}",
            self.raw.request_id.as_deref().unwrap_or_default(),
            self.raw.timestamp.as_deref().unwrap_or_default()
        )
    }

    pub fn into_raw(self) -> RawEvent {
        self.raw
    }
}

impl TryFrom<RawEvent> for DisplayEvent {
    type Error = Rejection;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let display_text = validate(&raw)?;
        Ok(Self { raw, display_text })
    }
}
