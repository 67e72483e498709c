use std::path::Path;

use anyhow::Context;
use prep_utils::bank::QuestionBank;

pub fn parse_bank(json: &str) -> anyhow::Result<QuestionBank> {
    let bank: QuestionBank =
        serde_json::from_str(json).context("unable to deserialize question bank")?;
    Ok(bank)
}

/// Reads and validates the built-in question bank.
#[tracing::instrument(err(Debug))]
pub async fn load_bank(path: &Path) -> anyhow::Result<QuestionBank> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("unable to read question bank at {}", path.display()))?;

    let bank = parse_bank(&json)?;
    bank.validate().context("question bank is invalid")?;

    tracing::info!(
        exam_questions = bank.exam_questions.len(),
        practice_questions = bank.practice_questions.len(),
        lessons = bank.catalog.lessons.len(),
        "loaded question bank"
    );

    Ok(bank)
}
