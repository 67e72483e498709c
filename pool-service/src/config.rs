use sentry::types::Dsn;
use std::{env::var, fmt, path::PathBuf, time::Duration};
use tracing::{error, warn};

use prep_utils::{cache::DEFAULT_TTL, selection::DEFAULT_EXAM_LENGTH};

#[derive(Clone, Debug)]
pub struct EnvVars {
    pub environment: Environment,
    pub exam_question_count: usize,
    pub external_cache_ttl: Duration,
    pub external_collection: String,
    pub lesson_id: Option<u32>,
    pub mongodb_uri: Option<String>,
    pub output_path: Option<PathBuf>,
    pub question_bank_path: PathBuf,
    pub section_id: Option<String>,
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                warn!(
                    "ENVIRONMENT value '{}' is not valid. Defaulting to 'production'.",
                    other
                );
                Environment::Production
            }
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(s)
    }
}

impl EnvVars {
    pub fn new() -> Self {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Builds the config from `lookup`, which returns the value of an
    /// environment variable if set.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sentry_dsn = match lookup("SENTRY_DSN") {
            Some(dsn_string) => {
                assert!(
                    valid_sentry_dsn(&dsn_string),
                    "SENTRY_DSN is not valid DSN."
                );
                Some(dsn_string)
            }
            None => {
                warn!("SENTRY_DSN not set.");
                None
            }
        };

        let environment = match lookup("ENVIRONMENT") {
            Some(v) => v.into(),
            None => {
                warn!("ENVIRONMENT not set. Defaulting to 'production'.");
                Environment::Production
            }
        };

        let mongodb_uri = lookup("MONGODB_URI");
        if mongodb_uri.is_none() {
            warn!("MONGODB_URI not set. External questions are disabled.");
        }

        let external_collection = match lookup("EXTERNAL_COLLECTION") {
            Some(name) => name,
            None => {
                let default_collection = "ExternalQuestion".to_string();
                warn!("EXTERNAL_COLLECTION not set. Defaulting to {default_collection}");
                default_collection
            }
        };

        let external_cache_ttl = match lookup("EXTERNAL_CACHE_TTL_IN_S") {
            Some(v) => {
                let seconds = match v.parse::<u64>() {
                    Ok(s) => s,
                    Err(e) => {
                        panic!(
                            "EXTERNAL_CACHE_TTL_IN_S is not a valid whole number of seconds: {:?}",
                            e
                        );
                    }
                };
                Duration::from_secs(seconds)
            }
            None => DEFAULT_TTL,
        };

        let question_bank_path = match lookup("QUESTION_BANK_PATH") {
            Some(path) => PathBuf::from(path),
            None => {
                let default_path = PathBuf::from("data/question_bank.json");
                warn!(
                    "QUESTION_BANK_PATH not set. Defaulting to {}",
                    default_path.display()
                );
                default_path
            }
        };

        let exam_question_count = match lookup("EXAM_QUESTION_COUNT") {
            Some(v) => v
                .parse::<usize>()
                .expect("EXAM_QUESTION_COUNT to be valid unsigned integer"),
            None => DEFAULT_EXAM_LENGTH,
        };

        let lesson_id = lookup("LESSON_ID").map(|v| match v.parse::<u32>() {
            Ok(id) => id,
            Err(e) => {
                error!("LESSON_ID '{v}' is not a valid lesson id");
                panic!("LESSON_ID must be an unsigned integer: {e:?}");
            }
        });

        let section_id = lookup("SECTION_ID");
        if section_id.is_some() && lesson_id.is_none() {
            warn!("SECTION_ID is ignored without LESSON_ID");
        }

        let output_path = lookup("OUTPUT_PATH").map(PathBuf::from);

        Self {
            environment,
            exam_question_count,
            external_cache_ttl,
            external_collection,
            lesson_id,
            mongodb_uri,
            output_path,
            question_bank_path,
            section_id,
            sentry_dsn,
        }
    }
}

fn valid_sentry_dsn(url: &str) -> bool {
    url.parse::<Dsn>().is_ok()
}
