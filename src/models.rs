use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

static NULL: Value = Value::Null;

/// One of the data sources a dataset can be computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Discord,
    Github,
    Telegram,
    X,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Discord,
        Platform::Github,
        Platform::Telegram,
        Platform::X,
    ];

    /// Path segment and storage namespace of the platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Discord => "discord",
            Platform::Github => "github",
            Platform::Telegram => "telegram",
            Platform::X => "x",
        }
    }

    /// Name of the platform-specific identifier field exposed as its own
    /// endpoint.
    pub fn secondary_id_field(&self) -> &'static str {
        match self {
            Platform::Discord => "server_id",
            Platform::Github => "ecosystem",
            Platform::Telegram => "channel_id",
            Platform::X => "community_id",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Discord => "Discord",
            Platform::Github => "GitHub",
            Platform::Telegram => "Telegram",
            Platform::X => "X (Twitter)",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discord" => Ok(Platform::Discord),
            "github" => Ok(Platform::Github),
            "telegram" => Ok(Platform::Telegram),
            "x" => Ok(Platform::X),
            _ => Err(format!("unknown platform: {}", s)),
        }
    }
}

/// Immutable JSON document holding one community's computed scores.
///
/// The record shape is opaque; only the top-level fields the API exposes are
/// looked at, and the document is otherwise served verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    document: Map<String, Value>,
}

impl Dataset {
    pub fn new(document: Map<String, Value>) -> Self {
        Self { document }
    }

    /// Parses a stored document. Anything but a JSON object is rejected.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Map<String, Value>>(raw).map(Self::new)
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Top-level field, `null` when the document does not carry it.
    pub fn field(&self, name: &str) -> &Value {
        self.document.get(name).unwrap_or(&NULL)
    }

    pub fn seed(&self) -> &Value {
        self.field("seed")
    }

    /// The ordered score records, if the document has a `scores` array.
    pub fn scores(&self) -> Option<&[Value]> {
        self.document
            .get("scores")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

/// Sub-resource requested below a dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Document,
    Seed,
    SecondaryId,
    Scores,
    Unknown(String),
}

impl Endpoint {
    pub fn parse(segment: Option<&str>, platform: Platform) -> Self {
        match segment {
            None | Some("") => Endpoint::Document,
            Some("seed") => Endpoint::Seed,
            Some("scores") => Endpoint::Scores,
            Some(name) if name == platform.secondary_id_field() => Endpoint::SecondaryId,
            Some(other) => Endpoint::Unknown(other.to_string()),
        }
    }
}

/// A resolved dataset request: which document and which part of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRequest {
    pub platform: Platform,
    pub file_name: String,
    pub endpoint: Endpoint,
}

/// Bounds metadata reported next to a page of scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub start: usize,
    pub size: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ScoresPage<'a> {
    pub scores: &'a [Value],
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct DatasetList {
    pub datasets: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn platforms_round_trip_through_their_path_segment() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
        assert!("mastodon".parse::<Platform>().is_err());
    }

    #[test]
    fn secondary_fields_are_platform_specific() {
        assert_eq!(Platform::Discord.secondary_id_field(), "server_id");
        assert_eq!(Platform::Github.secondary_id_field(), "ecosystem");
        assert_eq!(Platform::Telegram.secondary_id_field(), "channel_id");
        assert_eq!(Platform::X.secondary_id_field(), "community_id");
    }

    #[test]
    fn endpoint_parsing_uses_the_platform_field() {
        assert_eq!(Endpoint::parse(None, Platform::Discord), Endpoint::Document);
        assert_eq!(Endpoint::parse(Some(""), Platform::Discord), Endpoint::Document);
        assert_eq!(Endpoint::parse(Some("seed"), Platform::X), Endpoint::Seed);
        assert_eq!(
            Endpoint::parse(Some("ecosystem"), Platform::Github),
            Endpoint::SecondaryId
        );
        // Another platform's identifier is not an endpoint here.
        assert_eq!(
            Endpoint::parse(Some("server_id"), Platform::Github),
            Endpoint::Unknown("server_id".into())
        );
    }

    #[test]
    fn datasets_must_be_objects() {
        assert!(Dataset::from_json("[1, 2, 3]").is_err());
        assert!(Dataset::from_json("{ not json").is_err());

        let dataset = Dataset::from_json(r#"{ "seed": 7, "scores": [1, 2] }"#).unwrap();
        assert_eq!(dataset.seed(), &json!(7));
        assert_eq!(dataset.field("server_id"), &Value::Null);
        assert_eq!(dataset.scores(), Some(&[json!(1), json!(2)][..]));
    }

    #[test]
    fn scores_must_be_an_array() {
        let dataset = Dataset::from_json(r#"{ "scores": "nope" }"#).unwrap();
        assert_eq!(dataset.scores(), None);
    }
}
