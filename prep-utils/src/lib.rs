//! Question Pool Utility Functions
//!
//! ## Current API
//!
//! - Merge built-in, practice and external questions into deduplicated pools
//! - Draw domain-weighted exams
//! - Build lesson pools and capped section quizzes
//! - Validate pools, blueprints and the lesson catalog
//! - Grade responses
//! - Cache snapshots of the external question source
//!
pub mod bank;
pub mod cache;
pub mod error;
pub mod grading;
pub mod lesson;
pub mod merge;
pub mod selection;
pub mod validation;
