use std::{fmt, str::FromStr};

use bson::Bson;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Number of leading characters of the lowercased question text compared
/// when deduplicating pools.
pub const DEDUP_KEY_LENGTH: usize = 80;

/// Top-level exam content areas. Declaration order is significant: it breaks
/// ties when distributing exam seats between domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "Defining the SM/TC Role")]
    DefiningTheRole,
    #[serde(rename = "Supporting Team Events")]
    SupportingTeamEvents,
    #[serde(rename = "Supporting ART Events")]
    SupportingArtEvents,
    #[serde(rename = "Building High-Performing Teams")]
    BuildingHighPerformingTeams,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::DefiningTheRole,
        Domain::SupportingTeamEvents,
        Domain::SupportingArtEvents,
        Domain::BuildingHighPerformingTeams,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Domain::DefiningTheRole => "Defining the SM/TC Role",
            Domain::SupportingTeamEvents => "Supporting Team Events",
            Domain::SupportingArtEvents => "Supporting ART Events",
            Domain::BuildingHighPerformingTeams => "Building High-Performing Teams",
        }
    }

    /// Position in `Domain::ALL`.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDomain(pub String);

impl fmt::Display for UnknownDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown domain '{}'", self.0)
    }
}

impl std::error::Error for UnknownDomain {}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Domain::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

/// Which source a pooled question came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    #[default]
    BuiltIn,
    Practice,
    External,
}

impl Provenance {
    /// Prefix prepended to ids of questions merged from this source.
    pub fn id_prefix(&self) -> Option<&'static str> {
        match self {
            Provenance::BuiltIn => None,
            Provenance::Practice => Some("pq"),
            Provenance::External => Some("ext"),
        }
    }

    pub fn tag_id(&self, id: &str) -> String {
        match self.id_prefix() {
            Some(prefix) => format!("{prefix}-{id}"),
            None => id.to_string(),
        }
    }
}

/// A multiple choice question. `C` is the categorisation: a [`Domain`] for
/// exam questions, a section id for lesson questions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question<C> {
    pub id: String,
    #[serde(rename = "questionText")]
    pub question_text: String,
    pub options: Vec<String>,
    #[serde(rename = "correctIndex")]
    pub correct_index: usize,
    #[serde(
        rename = "correctIndices",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_indices: Option<Vec<usize>>,
    #[serde(rename = "multiSelect", default, skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<usize>,
    pub category: C,
    #[serde(default)]
    pub source: Provenance,
}

pub type ExamQuestion = Question<Domain>;
pub type LessonQuestion = Question<String>;

impl<C> Question<C> {
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.question_text)
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select.is_some()
    }

    /// Indices a respondent has to select for the question to count as correct.
    pub fn expected_answers(&self) -> Vec<usize> {
        match (&self.multi_select, &self.correct_indices) {
            (Some(_), Some(indices)) => indices.clone(),
            _ => vec![self.correct_index],
        }
    }

    /// Re-categorises the question, keeping everything else.
    pub fn with_category<D>(self, category: D) -> Question<D> {
        Question {
            id: self.id,
            question_text: self.question_text,
            options: self.options,
            correct_index: self.correct_index,
            correct_indices: self.correct_indices,
            multi_select: self.multi_select,
            category,
            source: self.source,
        }
    }
}

impl ExamQuestion {
    pub fn domain(&self) -> Domain {
        self.category
    }
}

impl LessonQuestion {
    pub fn section_id(&self) -> &str {
        &self.category
    }
}

/// Approximate equality key: lowercased text truncated to
/// [`DEDUP_KEY_LENGTH`] characters. Distinct questions sharing a long prefix
/// collide.
pub fn dedup_key(text: &str) -> String {
    text.to_lowercase().chars().take(DEDUP_KEY_LENGTH).collect()
}

/// Secondary built-in practice question, categorised by a free-text topic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub id: String,
    #[serde(rename = "questionText")]
    pub question_text: String,
    pub options: Vec<String>,
    #[serde(rename = "correctIndex")]
    pub correct_index: usize,
    pub topic: String,
}

impl PracticeQuestion {
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.question_text)
    }

    pub fn into_question<C>(self, category: C) -> Question<C> {
        Question {
            id: Provenance::Practice.tag_id(&self.id),
            question_text: self.question_text,
            options: self.options,
            correct_index: self.correct_index,
            correct_indices: None,
            multi_select: None,
            category,
            source: Provenance::Practice,
        }
    }
}

/// Record of the externally managed question collection.
///
/// Exam-scoped records carry `domain`, lesson-scoped records carry
/// `lesson_id` and `section_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalQuestion {
    /// `_id` of the stored document, as a hex string when it is an ObjectId.
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_record_id")]
    pub id: String,
    #[serde(rename = "questionText")]
    pub question_text: String,
    pub options: Vec<String>,
    #[serde(rename = "correctIndex")]
    pub correct_index: usize,
    #[serde(
        rename = "correctIndices",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub correct_indices: Option<Vec<usize>>,
    #[serde(rename = "multiSelect", default, skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(rename = "lessonId", default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<u32>,
    #[serde(rename = "sectionId", default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
}

fn enabled_by_default() -> bool {
    true
}

fn deserialize_record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        Bson::String(s) => Ok(s),
        Bson::Int32(n) => Ok(n.to_string()),
        Bson::Int64(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "unsupported record id {other}"
        ))),
    }
}

impl ExternalQuestion {
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.question_text)
    }

    pub fn into_question<C>(self, category: C) -> Question<C> {
        Question {
            id: Provenance::External.tag_id(&self.id),
            question_text: self.question_text,
            options: self.options,
            correct_index: self.correct_index,
            correct_indices: self.correct_indices,
            multi_select: self.multi_select,
            category,
            source: Provenance::External,
        }
    }
}
