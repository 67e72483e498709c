use anyhow::Context;
use chrono::{DateTime, Utc};
use prep_schema::{Domain, ExamQuestion, ExternalQuestion, LessonQuestion};
use prep_utils::{
    bank::QuestionBank,
    cache::{ExternalQuestionCache, ExternalQuestionSource},
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{config::EnvVars, loader::load_bank, source::MongoQuestionSource};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DomainCount {
    pub domain: Domain,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Draw {
    Exam {
        #[serde(rename = "domainCounts")]
        domain_counts: Vec<DomainCount>,
        questions: Vec<ExamQuestion>,
    },
    Lesson {
        #[serde(rename = "lessonId")]
        lesson_id: u32,
        questions: Vec<LessonQuestion>,
    },
    Section {
        #[serde(rename = "lessonId")]
        lesson_id: u32,
        #[serde(rename = "sectionId")]
        section_id: String,
        /// Matches before the section cap.
        available: usize,
        questions: Vec<LessonQuestion>,
    },
}

impl Draw {
    pub fn len(&self) -> usize {
        match self {
            Draw::Exam { questions, .. } => questions.len(),
            Draw::Lesson { questions, .. } | Draw::Section { questions, .. } => questions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DrawReport {
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "poolSize")]
    pub pool_size: usize,
    #[serde(flatten)]
    pub draw: Draw,
}

fn domain_counts(questions: &[ExamQuestion]) -> Vec<DomainCount> {
    Domain::ALL
        .into_iter()
        .map(|domain| DomainCount {
            domain,
            count: questions.iter().filter(|q| q.domain() == domain).count(),
        })
        .collect()
}

/// Merges the external snapshot into the exam pool and draws `target`
/// questions from it.
pub fn draw_exam(bank: &QuestionBank, external: &[ExternalQuestion], target: usize) -> DrawReport {
    let pool = bank.merge_exam_pool(external);
    let questions = bank.select_exam_questions(target, Some(&pool));
    if questions.len() < target {
        warn!(
            drawn = questions.len(),
            target, "not enough questions for a full exam"
        );
    }

    DrawReport {
        generated_at: Utc::now(),
        pool_size: pool.len(),
        draw: Draw::Exam {
            domain_counts: domain_counts(&questions),
            questions,
        },
    }
}

/// Draws the merged pool of one lesson, or a capped quiz of one of its
/// sections.
pub fn draw_lesson(
    bank: &QuestionBank,
    external: &[ExternalQuestion],
    lesson_id: u32,
    section_id: Option<&str>,
) -> DrawReport {
    let pool = bank.merge_lesson_pool(lesson_id, external);

    let draw = match section_id {
        Some(section_id) => Draw::Section {
            lesson_id,
            section_id: section_id.to_string(),
            available: bank.get_section_question_count(lesson_id, section_id, Some(&pool)),
            questions: bank.get_section_questions(lesson_id, section_id, Some(&pool)),
        },
        None => Draw::Lesson {
            lesson_id,
            questions: pool.clone(),
        },
    };

    DrawReport {
        generated_at: Utc::now(),
        pool_size: pool.len(),
        draw,
    }
}

/// Current snapshot of the external questions, or none without a cache.
pub async fn fetch_external<S>(
    cache: Option<&mut ExternalQuestionCache<S>>,
) -> anyhow::Result<Vec<ExternalQuestion>>
where
    S: ExternalQuestionSource,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    match cache {
        Some(cache) => cache
            .get()
            .await
            .context("unable to fetch external questions"),
        None => Ok(Vec::new()),
    }
}

pub async fn write_report(report: &DrawReport, env_vars: &EnvVars) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("unable to serialize draw report")?;
    match &env_vars.output_path {
        Some(path) => tokio::fs::write(path, json)
            .await
            .with_context(|| format!("unable to write draw report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

/// Loads the bank, snapshots the external questions, draws an exam (or a
/// lesson/section quiz when `LESSON_ID` is set) and writes the report.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn run(env_vars: &EnvVars) -> anyhow::Result<DrawReport> {
    let bank = load_bank(&env_vars.question_bank_path).await?;

    let mut cache = match &env_vars.mongodb_uri {
        Some(uri) => {
            let source = MongoQuestionSource::connect(uri, &env_vars.external_collection)
                .await
                .context("unable to connect to external question store")?;
            Some(ExternalQuestionCache::new(source, env_vars.external_cache_ttl))
        }
        None => None,
    };
    let external = fetch_external(cache.as_mut()).await?;

    let report = match env_vars.lesson_id {
        Some(lesson_id) => draw_lesson(
            &bank,
            &external,
            lesson_id,
            env_vars.section_id.as_deref(),
        ),
        None => draw_exam(&bank, &external, env_vars.exam_question_count),
    };

    info!(
        pool_size = report.pool_size,
        drawn = report.draw.len(),
        external = external.len(),
        "draw complete"
    );

    write_report(&report, env_vars).await?;

    Ok(report)
}
