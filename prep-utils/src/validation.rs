use std::collections::HashSet;

use prep_schema::{Catalog, Domain, Question};

use crate::{error::Error, selection::ExamBlueprint};

/// Validate a question pool:
/// - ids are unique
/// - dedup keys are unique
/// - `question_text` is not empty
/// - there are at least two options
/// - `correct_index` is within the options
/// - multi-select questions list exactly `multi_select` unique indices, all
///   within the options
pub fn validate_pool<C>(pool: &[Question<C>]) -> Result<(), Error> {
    let mut ids = HashSet::new();
    let mut keys = HashSet::new();

    for question in pool {
        if !ids.insert(question.id.as_str()) {
            return Err(Error::InvalidPool(format!(
                "question id {} is duplicated",
                question.id
            )));
        }
        if !keys.insert(question.dedup_key()) {
            return Err(Error::InvalidPool(format!(
                "question {} duplicates the text of an earlier question",
                question.id
            )));
        }
        if question.question_text.trim().is_empty() {
            return Err(Error::InvalidPool(format!(
                "question {} has empty text",
                question.id
            )));
        }
        if question.options.len() < 2 {
            return Err(Error::InvalidPool(format!(
                "question {} has {} option(s), at least 2 required",
                question.id,
                question.options.len()
            )));
        }
        if question.correct_index >= question.options.len() {
            return Err(Error::InvalidPool(format!(
                "question {} correct index {} is out of range. Options: {}",
                question.id,
                question.correct_index,
                question.options.len()
            )));
        }

        match (question.multi_select, &question.correct_indices) {
            (None, _) => {}
            (Some(_), None) => {
                return Err(Error::InvalidPool(format!(
                    "question {} is multi-select without correct indices",
                    question.id
                )));
            }
            (Some(required), Some(indices)) => {
                let unique: HashSet<&usize> = indices.iter().collect();
                if required == 0 || unique.len() != indices.len() || indices.len() != required {
                    return Err(Error::InvalidPool(format!(
                        "question {} requires {} selections but lists correct indices {:?}",
                        question.id, required, indices
                    )));
                }
                if let Some(index) = indices.iter().find(|&&i| i >= question.options.len()) {
                    return Err(Error::InvalidPool(format!(
                        "question {} correct index {} is out of range. Options: {}",
                        question.id,
                        index,
                        question.options.len()
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Validate an exam blueprint:
/// - every domain is weighted exactly once
/// - weights sum to 100
pub fn validate_blueprint(blueprint: &ExamBlueprint) -> Result<(), Error> {
    for domain in Domain::ALL {
        let count = blueprint
            .weights
            .iter()
            .filter(|w| w.domain == domain)
            .count();
        if count != 1 {
            return Err(Error::InvalidBlueprint(format!(
                "domain \"{domain}\" is weighted {count} times, expected once"
            )));
        }
    }

    let total: u32 = blueprint.weights.iter().map(|w| w.percent).sum();
    if total != 100 {
        return Err(Error::InvalidBlueprint(format!(
            "domain weights sum to {total}%, expected 100%"
        )));
    }

    Ok(())
}

/// Validate the lesson catalog:
/// - lesson ids are unique
/// - section ids are unique within their lesson
/// - every question section mapping names a declared lesson section
pub fn validate_catalog(catalog: &Catalog) -> Result<(), Error> {
    let mut lesson_ids = HashSet::new();
    for lesson in &catalog.lessons {
        if !lesson_ids.insert(lesson.id) {
            return Err(Error::InvalidCatalog(format!(
                "lesson id {} is duplicated",
                lesson.id
            )));
        }
        let mut section_ids = HashSet::new();
        for section in &lesson.sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "section id {} is duplicated in lesson {}",
                    section.id, lesson.id
                )));
            }
        }
    }

    for (question_id, section_ref) in &catalog.question_sections {
        let declared = catalog
            .lesson(section_ref.lesson_id)
            .is_some_and(|l| l.declares_section(&section_ref.section_id));
        if !declared {
            return Err(Error::InvalidCatalog(format!(
                "question {} is mapped to undeclared section {} of lesson {}",
                question_id, section_ref.section_id, section_ref.lesson_id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use prep_schema::{ExamQuestion, Lesson, Provenance, Section, SectionRef};

    use super::*;
    use crate::selection::DomainWeight;

    fn question(id: &str, text: &str) -> ExamQuestion {
        Question {
            id: id.into(),
            question_text: text.into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 3,
            correct_indices: None,
            multi_select: None,
            category: Domain::SupportingTeamEvents,
            source: Provenance::BuiltIn,
        }
    }

    #[test]
    fn valid_pool_passes() {
        let mut multi = question("2", "Pick two");
        multi.correct_indices = Some(vec![0, 2]);
        multi.multi_select = Some(2);
        assert!(validate_pool(&[question("1", "Pick one"), multi]).is_ok());
    }

    #[test]
    fn duplicate_ids_and_texts_are_rejected() {
        let err = validate_pool(&[question("1", "a"), question("1", "b")]).unwrap_err();
        assert!(err.to_string().contains("duplicated"));

        let err = validate_pool(&[question("1", "Same"), question("2", "SAME")]).unwrap_err();
        assert!(err.to_string().contains("duplicates the text"));
    }

    #[test]
    fn out_of_range_and_short_questions_are_rejected() {
        let mut q = question("1", "Out of range");
        q.correct_index = 4;
        assert!(validate_pool(&[q]).is_err());

        let mut q = question("1", "One option");
        q.options.truncate(1);
        q.correct_index = 0;
        assert!(validate_pool(&[q]).is_err());

        assert!(validate_pool(&[question("1", "   ")]).is_err());
    }

    #[test]
    fn inconsistent_multi_select_is_rejected() {
        let mut missing = question("1", "Missing indices");
        missing.multi_select = Some(2);
        assert!(validate_pool(&[missing]).is_err());

        let mut wrong_len = question("1", "Wrong length");
        wrong_len.multi_select = Some(3);
        wrong_len.correct_indices = Some(vec![0, 1]);
        assert!(validate_pool(&[wrong_len]).is_err());

        let mut repeated = question("1", "Repeated index");
        repeated.multi_select = Some(2);
        repeated.correct_indices = Some(vec![1, 1]);
        assert!(validate_pool(&[repeated]).is_err());

        let mut out_of_range = question("1", "Index out of range");
        out_of_range.multi_select = Some(2);
        out_of_range.correct_indices = Some(vec![1, 4]);
        assert!(validate_pool(&[out_of_range]).is_err());
    }

    #[test]
    fn default_blueprint_is_valid() {
        assert!(validate_blueprint(&ExamBlueprint::default()).is_ok());
    }

    #[test]
    fn blueprint_must_cover_each_domain_once_and_sum_to_100() {
        let mut blueprint = ExamBlueprint::default();
        blueprint.weights[0].percent = 30;
        assert!(validate_blueprint(&blueprint).is_err());

        let mut blueprint = ExamBlueprint::default();
        blueprint.weights.pop();
        assert!(validate_blueprint(&blueprint).is_err());

        let mut blueprint = ExamBlueprint::default();
        blueprint.weights.push(DomainWeight {
            domain: Domain::DefiningTheRole,
            percent: 0,
        });
        assert!(validate_blueprint(&blueprint).is_err());
    }

    #[test]
    fn catalog_mappings_must_name_declared_sections() {
        let mut catalog = Catalog {
            lessons: vec![Lesson {
                id: 1,
                title: "Intro".into(),
                sections: vec![Section {
                    id: "roles".into(),
                    name: "Roles".into(),
                }],
            }],
            ..Default::default()
        };
        catalog.question_sections.insert(
            "q1".into(),
            SectionRef {
                lesson_id: 1,
                section_id: "roles".into(),
            },
        );
        assert!(validate_catalog(&catalog).is_ok());

        catalog.question_sections.insert(
            "q2".into(),
            SectionRef {
                lesson_id: 1,
                section_id: "events".into(),
            },
        );
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let lesson = Lesson {
            id: 1,
            title: "Intro".into(),
            sections: vec![],
        };
        let catalog = Catalog {
            lessons: vec![lesson.clone(), lesson],
            ..Default::default()
        };
        assert!(validate_catalog(&catalog).is_err());

        let section = Section {
            id: "roles".into(),
            name: "Roles".into(),
        };
        let catalog = Catalog {
            lessons: vec![Lesson {
                id: 1,
                title: "Intro".into(),
                sections: vec![section.clone(), section],
            }],
            ..Default::default()
        };
        assert!(validate_catalog(&catalog).is_err());
    }
}
