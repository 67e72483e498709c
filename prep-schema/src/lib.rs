//! Question, domain and lesson catalog types shared by the pool builders
//! and the draw service.
pub mod catalog;
pub mod db;
pub mod question;

pub use catalog::{Catalog, Lesson, Section, SectionRef};
pub use question::{
    Domain, ExamQuestion, ExternalQuestion, LessonQuestion, PracticeQuestion, Provenance, Question,
};
