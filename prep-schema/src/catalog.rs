use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::question::Domain;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Lesson {
    pub fn declares_section(&self, section_id: &str) -> bool {
        self.sections.iter().any(|s| s.id == section_id)
    }

    /// Resolves a section by its display name, ignoring case and surrounding
    /// whitespace.
    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        let name = name.trim();
        self.sections
            .iter()
            .find(|s| s.name.trim().eq_ignore_ascii_case(name))
    }
}

/// Lesson and section a built-in exam question is taught in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRef {
    #[serde(rename = "lessonId")]
    pub lesson_id: u32,
    #[serde(rename = "sectionId")]
    pub section_id: String,
}

/// Lookup tables the pool builders treat as authoritative configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub lessons: Vec<Lesson>,
    /// Practice question topic label -> exam domain.
    #[serde(rename = "topicDomains", default)]
    pub topic_domains: HashMap<String, Domain>,
    /// Built-in exam question id -> lesson section.
    #[serde(rename = "questionSections", default)]
    pub question_sections: HashMap<String, SectionRef>,
}

impl Catalog {
    pub fn lesson(&self, lesson_id: u32) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    pub fn domain_for_topic(&self, topic: &str) -> Option<Domain> {
        self.topic_domains.get(topic).copied()
    }
}
