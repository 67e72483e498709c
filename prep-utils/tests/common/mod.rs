#![allow(dead_code)]
use prep_schema::{
    Catalog, Domain, ExamQuestion, ExternalQuestion, Lesson, PracticeQuestion, Provenance,
    Question, Section, SectionRef,
};
use prep_utils::{bank::QuestionBank, selection::ExamBlueprint};

pub fn exam_question(id: &str, text: &str, domain: Domain) -> ExamQuestion {
    Question {
        id: id.into(),
        question_text: text.into(),
        options: vec![
            "Option A".into(),
            "Option B".into(),
            "Option C".into(),
            "Option D".into(),
        ],
        correct_index: id.len() % 4,
        correct_indices: None,
        multi_select: None,
        category: domain,
        source: Provenance::BuiltIn,
    }
}

/// `counts[i]` questions for `Domain::ALL[i]`.
pub fn exam_pool(counts: [usize; 4]) -> Vec<ExamQuestion> {
    let mut pool = Vec::new();
    for (domain, count) in Domain::ALL.into_iter().zip(counts) {
        for n in 0..count {
            let id = format!("{}-{n}", domain.index());
            let text = format!("Built-in question {n} about {domain}");
            pool.push(exam_question(&id, &text, domain));
        }
    }
    pool
}

pub fn practice_question(id: &str, text: &str, topic: &str) -> PracticeQuestion {
    PracticeQuestion {
        id: id.into(),
        question_text: text.into(),
        options: vec!["Yes".into(), "No".into(), "Maybe".into(), "Never".into()],
        correct_index: 0,
        topic: topic.into(),
    }
}

pub fn external_question(id: &str, text: &str) -> ExternalQuestion {
    ExternalQuestion {
        id: id.into(),
        question_text: text.into(),
        options: vec!["One".into(), "Two".into(), "Three".into(), "Four".into()],
        correct_index: 1,
        correct_indices: None,
        multi_select: None,
        domain: None,
        lesson_id: None,
        section_id: None,
        enabled: true,
        created_at: None,
    }
}

pub fn catalog() -> Catalog {
    let mut catalog = Catalog {
        lessons: vec![
            Lesson {
                id: 1,
                title: "Defining the Role".into(),
                sections: vec![
                    Section {
                        id: "responsibilities".into(),
                        name: "Responsibilities".into(),
                    },
                    Section {
                        id: "servant-leadership".into(),
                        name: "Servant Leadership".into(),
                    },
                ],
            },
            Lesson {
                id: 2,
                title: "Team Events".into(),
                sections: vec![Section {
                    id: "team-sync".into(),
                    name: "Team Sync".into(),
                }],
            },
        ],
        ..Default::default()
    };
    catalog
        .topic_domains
        .insert("Roles".into(), Domain::DefiningTheRole);
    catalog
        .topic_domains
        .insert("Events".into(), Domain::SupportingTeamEvents);
    catalog
}

/// Bank with `counts` built-in exam questions, the first 12 of the first
/// domain mapped to lesson 1.
pub fn bank(counts: [usize; 4]) -> QuestionBank {
    let exam_questions = exam_pool(counts);
    let mut catalog = catalog();
    for question in exam_questions
        .iter()
        .filter(|q| q.domain() == Domain::DefiningTheRole)
        .take(12)
    {
        catalog.question_sections.insert(
            question.id.clone(),
            SectionRef {
                lesson_id: 1,
                section_id: "responsibilities".into(),
            },
        );
    }

    QuestionBank {
        exam_questions,
        practice_questions: vec![
            practice_question("1", "Which stance does a servant leader take?", "Lesson 1 – Servant Leadership"),
            practice_question("2", "Who runs the team sync?", "Lesson 2 – Team Sync"),
            practice_question("3", "What does the SM/TC coach?", "Roles"),
        ],
        catalog,
        blueprint: ExamBlueprint::default(),
    }
}
