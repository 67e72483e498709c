use std::collections::HashSet;

use prep_schema::{
    Catalog, Domain, ExamQuestion, ExternalQuestion, LessonQuestion, PracticeQuestion, Question,
};
use rand::{Rng, seq::SliceRandom};
use tracing::{debug, trace};

/// Dedup keys of the questions already admitted to a pool.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: HashSet<String>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_questions<C>(questions: &[Question<C>]) -> Self {
        let mut set = Self::new();
        for question in questions {
            set.insert(question.dedup_key());
        }
        set
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Returns `false` if the key was already present.
    pub fn insert(&mut self, key: String) -> bool {
        self.seen.insert(key)
    }
}

/// Combines the built-in exam set with the practice and external sets.
///
/// The result lists built-in questions first, then practice, then external,
/// each in source order. A question whose dedup key was already admitted is
/// skipped. Practice questions whose topic has no domain mapping are dropped,
/// as are external records without a recognised domain.
pub fn merge_exam_pool(
    built_in: &[ExamQuestion],
    practice: &[PracticeQuestion],
    external: &[ExternalQuestion],
    catalog: &Catalog,
) -> Vec<ExamQuestion> {
    let mut pool = built_in.to_vec();
    let mut seen = DedupSet::from_questions(built_in);

    for question in practice {
        let key = question.dedup_key();
        if seen.contains(&key) {
            trace!(id = %question.id, "skipping duplicate practice question");
            continue;
        }
        let Some(domain) = catalog.domain_for_topic(&question.topic) else {
            debug!(
                id = %question.id,
                topic = %question.topic,
                "dropping practice question with unmapped topic"
            );
            continue;
        };
        seen.insert(key);
        pool.push(question.clone().into_question(domain));
    }

    for question in external {
        let key = question.dedup_key();
        if seen.contains(&key) {
            trace!(id = %question.id, "skipping duplicate external question");
            continue;
        }
        let domain = match question.domain.as_deref().map(str::parse::<Domain>) {
            Some(Ok(domain)) => domain,
            other => {
                debug!(
                    id = %question.id,
                    domain = ?other,
                    "dropping external question without a recognised domain"
                );
                continue;
            }
        };
        seen.insert(key);
        pool.push(question.clone().into_question(domain));
    }

    debug!(
        built_in = built_in.len(),
        practice = practice.len(),
        external = external.len(),
        merged = pool.len(),
        "merged exam pool"
    );

    pool
}

/// Adds the external questions tagged to `lesson_id` to the hardcoded lesson
/// questions, then shuffles the pool.
///
/// External section ids are trusted as-is; records without a section id are
/// dropped.
pub fn merge_lesson_pool<R>(
    lesson_id: u32,
    hardcoded: &[LessonQuestion],
    external: &[ExternalQuestion],
    rng: &mut R,
) -> Vec<LessonQuestion>
where
    R: Rng + ?Sized,
{
    let mut pool = hardcoded.to_vec();
    let mut seen = DedupSet::from_questions(hardcoded);

    for question in external
        .iter()
        .filter(|q| q.lesson_id == Some(lesson_id))
    {
        let key = question.dedup_key();
        if seen.contains(&key) {
            trace!(id = %question.id, "skipping duplicate external question");
            continue;
        }
        let Some(section_id) = question.section_id.clone() else {
            debug!(id = %question.id, "dropping external question without a section");
            continue;
        };
        seen.insert(key);
        pool.push(question.clone().into_question(section_id));
    }

    debug!(
        lesson_id,
        hardcoded = hardcoded.len(),
        merged = pool.len(),
        "merged lesson pool"
    );

    pool.shuffle(rng);
    pool
}
