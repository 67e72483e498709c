use prep_schema::{Catalog, ExamQuestion, ExternalQuestion, LessonQuestion, PracticeQuestion};
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    lesson, merge,
    selection::{self, ExamBlueprint},
    validation,
};

/// The built-in questions and lookup tables, loaded once at start.
///
/// Operations taking an optional pool fall back to the built-in questions
/// when none is given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(rename = "examQuestions")]
    pub exam_questions: Vec<ExamQuestion>,
    #[serde(rename = "practiceQuestions", default)]
    pub practice_questions: Vec<PracticeQuestion>,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub blueprint: ExamBlueprint,
}

impl QuestionBank {
    pub fn validate(&self) -> Result<(), Error> {
        validation::validate_pool(&self.exam_questions)?;
        validation::validate_blueprint(&self.blueprint)?;
        validation::validate_catalog(&self.catalog)?;
        Ok(())
    }

    pub fn merge_exam_pool(&self, external: &[ExternalQuestion]) -> Vec<ExamQuestion> {
        merge::merge_exam_pool(
            &self.exam_questions,
            &self.practice_questions,
            external,
            &self.catalog,
        )
    }

    pub fn merge_lesson_pool(
        &self,
        lesson_id: u32,
        external: &[ExternalQuestion],
    ) -> Vec<LessonQuestion> {
        let hardcoded = self.collect_lesson_questions(lesson_id);
        merge::merge_lesson_pool(lesson_id, &hardcoded, external, &mut rand::rng())
    }

    /// Built-in questions of one lesson, in source order.
    pub fn collect_lesson_questions(&self, lesson_id: u32) -> Vec<LessonQuestion> {
        lesson::collect_lesson_questions(
            lesson_id,
            &self.exam_questions,
            &self.practice_questions,
            &self.catalog,
        )
    }

    /// Built-in questions of one lesson, shuffled.
    pub fn get_lesson_questions(&self, lesson_id: u32) -> Vec<LessonQuestion> {
        lesson::get_lesson_questions(
            lesson_id,
            &self.exam_questions,
            &self.practice_questions,
            &self.catalog,
            &mut rand::rng(),
        )
    }

    pub fn select_exam_questions(
        &self,
        target: usize,
        pool: Option<&[ExamQuestion]>,
    ) -> Vec<ExamQuestion> {
        let pool = pool.unwrap_or(&self.exam_questions);
        selection::select_exam_questions(pool, target, &self.blueprint, &mut rand::rng())
    }

    pub fn get_section_questions(
        &self,
        lesson_id: u32,
        section_id: &str,
        pool: Option<&[LessonQuestion]>,
    ) -> Vec<LessonQuestion> {
        let mut rng = rand::rng();
        match pool {
            Some(pool) => lesson::section_questions(pool, section_id, &mut rng),
            None => {
                let pool = self.collect_lesson_questions(lesson_id);
                lesson::section_questions(&pool, section_id, &mut rng)
            }
        }
    }

    pub fn get_section_question_count(
        &self,
        lesson_id: u32,
        section_id: &str,
        pool: Option<&[LessonQuestion]>,
    ) -> usize {
        match pool {
            Some(pool) => lesson::section_question_count(pool, section_id),
            None => {
                let pool = self.collect_lesson_questions(lesson_id);
                lesson::section_question_count(&pool, section_id)
            }
        }
    }
}
