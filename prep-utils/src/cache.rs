use std::{
    future::Future,
    time::{Duration, Instant},
};

use prep_schema::ExternalQuestion;
use tracing::{debug, trace};

/// How long a fetched snapshot of the external questions is served.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Where externally managed questions are fetched from.
pub trait ExternalQuestionSource {
    type Error;

    fn fetch(&self) -> impl Future<Output = Result<Vec<ExternalQuestion>, Self::Error>>;
}

#[derive(Debug)]
struct Snapshot {
    fetched_at: Instant,
    questions: Vec<ExternalQuestion>,
}

/// Serves point-in-time snapshots of an [`ExternalQuestionSource`], refetching
/// once a snapshot is older than the TTL. Disabled records never leave the
/// cache.
#[derive(Debug)]
pub struct ExternalQuestionCache<S> {
    source: S,
    ttl: Duration,
    snapshot: Option<Snapshot>,
}

impl<S> ExternalQuestionCache<S>
where
    S: ExternalQuestionSource,
{
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: None,
        }
    }

    pub async fn get(&mut self) -> Result<Vec<ExternalQuestion>, S::Error> {
        if let Some(snapshot) = &self.snapshot {
            if snapshot.fetched_at.elapsed() < self.ttl {
                trace!(count = snapshot.questions.len(), "serving cached snapshot");
                return Ok(snapshot.questions.clone());
            }
        }

        let questions: Vec<ExternalQuestion> = self
            .source
            .fetch()
            .await?
            .into_iter()
            .filter(|q| q.enabled)
            .collect();
        debug!(count = questions.len(), "refreshed external question snapshot");

        self.snapshot = Some(Snapshot {
            fetched_at: Instant::now(),
            questions: questions.clone(),
        });

        Ok(questions)
    }

    /// Drops the snapshot, so the next `get` refetches.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub fn snapshot_age(&self) -> Option<Duration> {
        self.snapshot.as_ref().map(|s| s.fetched_at.elapsed())
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
