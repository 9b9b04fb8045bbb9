use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NodeError {
    #[error("node identifier cannot be empty")]
    EmptyIdentifier,

    #[error("node title cannot be empty (identifier: {identifier})")]
    EmptyTitle { identifier: String },

    #[error("duplicate sibling identifier: {identifier}")]
    DuplicateSibling { identifier: String },

    #[error("invalid universal link for {identifier}: {raw}")]
    InvalidUniversalLink { identifier: String, raw: String },
}

//
// ─── TYPE & TOPIC ──────────────────────────────────────────────────────────────
//

/// Kind of content a node represents.
///
/// The wire format carries a raw integer; values this crate does not know
/// are preserved as `Other` so the set stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NodeType {
    None,
    App,
    Chapter,
    Section,
    Level,
    Page,
    Task,
    Challenge,
    Quiz,
    Exercise,
    Lesson,
    Book,
    Game,
    Document,
    Audio,
    Video,
    Other(i64),
}

impl NodeType {
    /// Map a raw wire value onto a node type.
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::App,
            2 => Self::Chapter,
            3 => Self::Section,
            4 => Self::Level,
            5 => Self::Page,
            6 => Self::Task,
            7 => Self::Challenge,
            8 => Self::Quiz,
            9 => Self::Exercise,
            10 => Self::Lesson,
            11 => Self::Book,
            12 => Self::Game,
            13 => Self::Document,
            14 => Self::Audio,
            15 => Self::Video,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn raw(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::App => 1,
            Self::Chapter => 2,
            Self::Section => 3,
            Self::Level => 4,
            Self::Page => 5,
            Self::Task => 6,
            Self::Challenge => 7,
            Self::Quiz => 8,
            Self::Exercise => 9,
            Self::Lesson => 10,
            Self::Book => 11,
            Self::Game => 12,
            Self::Document => 13,
            Self::Audio => 14,
            Self::Video => 15,
            Self::Other(other) => *other,
        }
    }
}

/// Predefined category tag a node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Topic {
    Math,
    Science,
    LiteracyAndWriting,
    WorldLanguage,
    SocialScience,
    ComputerScienceAndEngineering,
    ArtsAndMusic,
    HealthAndFitness,
}

impl Topic {
    /// Map a raw wire string onto a topic. Unknown strings are dropped
    /// rather than preserved; the set of topics is closed upstream.
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "math" => Some(Self::Math),
            "science" => Some(Self::Science),
            "literacyAndWriting" => Some(Self::LiteracyAndWriting),
            "worldLanguage" => Some(Self::WorldLanguage),
            "socialScience" => Some(Self::SocialScience),
            "computerScienceAndEngineering" => Some(Self::ComputerScienceAndEngineering),
            "artsAndMusic" => Some(Self::ArtsAndMusic),
            "healthAndFitness" => Some(Self::HealthAndFitness),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_raw(&self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Science => "science",
            Self::LiteracyAndWriting => "literacyAndWriting",
            Self::WorldLanguage => "worldLanguage",
            Self::SocialScience => "socialScience",
            Self::ComputerScienceAndEngineering => "computerScienceAndEngineering",
            Self::ArtsAndMusic => "artsAndMusic",
            Self::HealthAndFitness => "healthAndFitness",
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Wire-format shape of one content node, as decoded from a source JSON file.
///
/// Field names follow the external content format. Drafts are inert until
/// validated into a [`ContentNode`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDraft {
    pub identifier: String,
    pub title: String,
    pub display_order: i64,
    pub type_int: i64,
    #[serde(default)]
    pub topic_string: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<NodeDraft>>,
    #[serde(default)]
    pub universal_link: Option<String>,
}

impl NodeDraft {
    /// Validate the draft tree into an immutable [`ContentNode`].
    ///
    /// # Errors
    ///
    /// Returns `NodeError` if an identifier or title is empty after
    /// trimming, two siblings share an identifier, or a universal link does
    /// not parse as a URL.
    pub fn validate(self) -> Result<ContentNode, NodeError> {
        let identifier = self.identifier.trim().to_owned();
        if identifier.is_empty() {
            return Err(NodeError::EmptyIdentifier);
        }
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(NodeError::EmptyTitle { identifier });
        }

        let universal_link = match self.universal_link {
            Some(raw) => Some(Url::parse(&raw).map_err(|_| NodeError::InvalidUniversalLink {
                identifier: identifier.clone(),
                raw,
            })?),
            None => None,
        };

        let mut children = Vec::new();
        if let Some(drafts) = self.children {
            let mut seen = HashSet::new();
            for draft in drafts {
                let child = draft.validate()?;
                if !seen.insert(child.identifier().to_owned()) {
                    return Err(NodeError::DuplicateSibling {
                        identifier: child.identifier().to_owned(),
                    });
                }
                children.push(child);
            }
        }

        Ok(ContentNode {
            identifier,
            title,
            display_order: self.display_order,
            node_type: NodeType::from_raw(self.type_int),
            topic: self.topic_string.as_deref().and_then(Topic::from_raw),
            universal_link,
            children,
        })
    }
}

//
// ─── CONTENT NODE ──────────────────────────────────────────────────────────────
//

/// One unit of the content hierarchy.
///
/// Identifiers are stable across sessions and unique among siblings; an
/// identifier path from a root is the sole way content is addressed. The
/// tree is built once at load time and read-only thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    identifier: String,
    title: String,
    display_order: i64,
    node_type: NodeType,
    topic: Option<Topic>,
    universal_link: Option<Url>,
    children: Vec<ContentNode>,
}

impl ContentNode {
    /// The super-root standing in for the empty identifier path, with every
    /// registered root model as a child.
    pub(crate) fn synthetic_root(children: Vec<ContentNode>) -> Self {
        Self {
            identifier: String::new(),
            title: String::new(),
            display_order: 0,
            node_type: NodeType::App,
            topic: None,
            universal_link: None,
            children,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn display_order(&self) -> i64 {
        self.display_order
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    #[must_use]
    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    #[must_use]
    pub fn universal_link(&self) -> Option<&Url> {
        self.universal_link.as_ref()
    }

    #[must_use]
    pub fn children(&self) -> &[ContentNode] {
        &self.children
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(identifier: &str, children: Option<Vec<NodeDraft>>) -> NodeDraft {
        NodeDraft {
            identifier: identifier.to_owned(),
            title: format!("Title for {identifier}"),
            display_order: 0,
            type_int: 2,
            topic_string: None,
            children,
            universal_link: None,
        }
    }

    #[test]
    fn validate_rejects_empty_identifier() {
        let mut d = draft("x", None);
        d.identifier = "   ".to_owned();
        assert_eq!(d.validate().unwrap_err(), NodeError::EmptyIdentifier);
    }

    #[test]
    fn validate_rejects_empty_title() {
        let mut d = draft("scene-1", None);
        d.title = String::new();
        assert!(matches!(
            d.validate().unwrap_err(),
            NodeError::EmptyTitle { identifier } if identifier == "scene-1"
        ));
    }

    #[test]
    fn validate_rejects_duplicate_siblings() {
        let d = draft(
            "act-1",
            Some(vec![draft("scene-1", None), draft("scene-1", None)]),
        );
        assert_eq!(
            d.validate().unwrap_err(),
            NodeError::DuplicateSibling {
                identifier: "scene-1".to_owned()
            }
        );
    }

    #[test]
    fn validate_rejects_malformed_universal_link() {
        let mut d = draft("act-1", None);
        d.universal_link = Some("not a url".to_owned());
        assert!(matches!(
            d.validate().unwrap_err(),
            NodeError::InvalidUniversalLink { .. }
        ));
    }

    #[test]
    fn validate_accepts_duplicate_identifiers_across_levels() {
        // Identifiers only need to be unique among siblings.
        let d = draft(
            "act-1",
            Some(vec![draft("act-1", None), draft("scene-1", None)]),
        );
        let node = d.validate().unwrap();
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn decodes_wire_format_field_names() {
        let json = r#"{
            "identifier": "hamlet",
            "title": "Hamlet",
            "displayOrder": 1,
            "typeInt": 11,
            "topicString": "literacyAndWriting",
            "universalLink": "https://example.org/hamlet",
            "children": [
                {"identifier": "act-1", "title": "Act 1", "displayOrder": 1, "typeInt": 2}
            ]
        }"#;
        let node = serde_json::from_str::<NodeDraft>(json)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(node.identifier(), "hamlet");
        assert_eq!(node.node_type(), NodeType::Book);
        assert_eq!(node.topic(), Some(Topic::LiteracyAndWriting));
        assert_eq!(
            node.universal_link().map(Url::as_str),
            Some("https://example.org/hamlet")
        );
        assert_eq!(node.children().len(), 1);
        assert!(node.children()[0].is_leaf());
    }

    #[test]
    fn unknown_type_raw_values_are_preserved() {
        assert_eq!(NodeType::from_raw(42), NodeType::Other(42));
        assert_eq!(NodeType::Other(42).raw(), 42);
        assert_eq!(NodeType::from_raw(8), NodeType::Quiz);
    }

    #[test]
    fn unknown_topic_strings_map_to_none() {
        assert_eq!(Topic::from_raw("underwaterBasketWeaving"), None);
        assert_eq!(Topic::from_raw("math"), Some(Topic::Math));

        let mut d = draft("quiz-1", None);
        d.topic_string = Some("notARealTopic".to_owned());
        assert_eq!(d.validate().unwrap().topic(), None);
    }
}
