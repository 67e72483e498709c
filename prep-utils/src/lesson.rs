use prep_schema::{Catalog, ExamQuestion, Lesson, LessonQuestion, PracticeQuestion};
use rand::{Rng, seq::SliceRandom};
use tracing::{debug, trace};

use crate::merge::DedupSet;

/// Largest number of questions drawn for one section quiz.
pub const MAX_SECTION_QUESTIONS: usize = 10;

/// Splits a practice topic label of the form `"Lesson 3 – Team Sync"` into
/// the lesson number and the section name. En dash, em dash and hyphen are
/// accepted as separators.
pub fn parse_lesson_topic(topic: &str) -> Option<(u32, &str)> {
    let rest = topic.trim().strip_prefix("Lesson")?.trim_start();

    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }
    let lesson = rest[..digits].parse().ok()?;

    let name = rest[digits..]
        .trim_start()
        .strip_prefix(|c: char| matches!(c, '–' | '—' | '-'))?
        .trim();
    if name.is_empty() {
        return None;
    }

    Some((lesson, name))
}

/// Lowercases `name` and joins its alphanumeric runs with `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Section name lookup, falling back to the slug only when the lesson
/// declares it.
fn resolve_section(lesson: &Lesson, name: &str) -> Option<String> {
    if let Some(section) = lesson.section_by_name(name) {
        return Some(section.id.clone());
    }
    let slug = slugify(name);
    lesson.declares_section(&slug).then_some(slug)
}

/// Collects the built-in questions taught in `lesson_id`, unshuffled.
///
/// Practice questions are matched through their topic label, built-in exam
/// questions through `catalog.question_sections`. Every emitted section id is
/// declared by the lesson. The first question seen for a dedup key wins.
pub fn collect_lesson_questions(
    lesson_id: u32,
    built_in: &[ExamQuestion],
    practice: &[PracticeQuestion],
    catalog: &Catalog,
) -> Vec<LessonQuestion> {
    let Some(lesson) = catalog.lesson(lesson_id) else {
        debug!(lesson_id, "lesson not in catalog");
        return Vec::new();
    };

    let mut seen = DedupSet::new();
    let mut questions = Vec::new();

    for question in practice {
        let Some((number, section_name)) = parse_lesson_topic(&question.topic) else {
            continue;
        };
        if number != lesson_id {
            continue;
        }
        let Some(section_id) = resolve_section(lesson, section_name) else {
            debug!(
                id = %question.id,
                topic = %question.topic,
                "dropping practice question with undeclared section"
            );
            continue;
        };
        if !seen.insert(question.dedup_key()) {
            trace!(id = %question.id, "skipping duplicate practice question");
            continue;
        }
        questions.push(question.clone().into_question(section_id));
    }

    for question in built_in {
        let Some(section_ref) = catalog.question_sections.get(&question.id) else {
            continue;
        };
        if section_ref.lesson_id != lesson_id {
            continue;
        }
        if !lesson.declares_section(&section_ref.section_id) {
            debug!(
                id = %question.id,
                section_id = %section_ref.section_id,
                "dropping exam question mapped to undeclared section"
            );
            continue;
        }
        if !seen.insert(question.dedup_key()) {
            trace!(id = %question.id, "skipping duplicate exam question");
            continue;
        }
        questions.push(
            question
                .clone()
                .with_category(section_ref.section_id.clone()),
        );
    }

    debug!(lesson_id, count = questions.len(), "collected lesson questions");

    questions
}

/// [`collect_lesson_questions`], shuffled.
pub fn get_lesson_questions<R>(
    lesson_id: u32,
    built_in: &[ExamQuestion],
    practice: &[PracticeQuestion],
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<LessonQuestion>
where
    R: Rng + ?Sized,
{
    let mut questions = collect_lesson_questions(lesson_id, built_in, practice, catalog);
    questions.shuffle(rng);
    questions
}

/// Number of questions in `pool` tagged with `section_id`, before capping.
pub fn section_question_count(pool: &[LessonQuestion], section_id: &str) -> usize {
    pool.iter().filter(|q| q.section_id() == section_id).count()
}

/// Random draw of at most [`MAX_SECTION_QUESTIONS`] questions tagged with
/// `section_id`. `pool` is expected to be scoped to a single lesson.
pub fn section_questions<R>(
    pool: &[LessonQuestion],
    section_id: &str,
    rng: &mut R,
) -> Vec<LessonQuestion>
where
    R: Rng + ?Sized,
{
    let mut matches: Vec<LessonQuestion> = pool
        .iter()
        .filter(|q| q.section_id() == section_id)
        .cloned()
        .collect();

    matches.shuffle(rng);
    if matches.len() > MAX_SECTION_QUESTIONS {
        trace!(
            available = matches.len(),
            "capping section quiz at {MAX_SECTION_QUESTIONS}"
        );
        matches.truncate(MAX_SECTION_QUESTIONS);
    }
    matches
}
