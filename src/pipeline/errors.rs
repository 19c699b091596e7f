// src/pipeline/errors.rs

//! Run-wide error collection.
//!
//! Every stage owns a clone of the [`ErrorSink`]. Item-level failures are
//! reported there and the item is dropped; the run keeps going. The collector
//! side is drained by `OffersUpdates::run` until every sink is gone.

use std::fmt;

use tokio::sync::mpsc;

use crate::error::AppError;

/// Pipeline stage that reported an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Fetch,
    Classify,
    Notify,
    Persist,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Classify => "classify",
            Stage::Notify => "notify",
            Stage::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failure, tagged with the stage it came from.
#[derive(Debug)]
pub struct StageError {
    pub stage: Stage,
    pub source: AppError,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.source)
    }
}

/// Every error reported during one run. Order is arrival order, which is not
/// meaningful across stages.
#[derive(Debug, Default)]
pub struct RunErrors(pub Vec<StageError>);

impl RunErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageError> {
        self.0.iter()
    }

    /// Number of errors reported by one stage.
    pub fn count(&self, stage: Stage) -> usize {
        self.0.iter().filter(|e| e.stage == stage).count()
    }
}

impl fmt::Display for RunErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0.len();
        write!(f, "{} error{} occurred:", n, if n == 1 { "" } else { "s" })?;
        for err in &self.0 {
            write!(f, "\n\t* {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RunErrors {}

/// Sending half of the run's error channel.
#[derive(Debug, Clone)]
pub struct ErrorSink {
    tx: mpsc::UnboundedSender<StageError>,
}

impl ErrorSink {
    /// Record a failure. Never blocks.
    pub fn report(&self, stage: Stage, source: AppError) {
        log::warn!("[{}] {}", stage, source);
        if self.tx.send(StageError { stage, source }).is_err() {
            log::error!("Error collector is gone, dropping a {} error", stage);
        }
    }
}

/// Create a sink and the matching collector.
pub fn channel() -> (ErrorSink, mpsc::UnboundedReceiver<StageError>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ErrorSink { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_error() {
        let errors = RunErrors(vec![
            StageError {
                stage: Stage::Fetch,
                source: AppError::Api {
                    url: "http://api/x".into(),
                    status: 500,
                },
            },
            StageError {
                stage: Stage::Persist,
                source: AppError::s3("denied"),
            },
        ]);

        assert_eq!(
            errors.to_string(),
            "2 errors occurred:\n\
             \t* [fetch] Invalid response code 500 from API at http://api/x\n\
             \t* [persist] S3 error: denied"
        );
        assert_eq!(errors.count(Stage::Fetch), 1);
        assert_eq!(errors.count(Stage::Notify), 0);
    }

    #[tokio::test]
    async fn test_channel_closes_when_all_sinks_drop() {
        let (sink, mut rx) = channel();
        let other = sink.clone();

        sink.report(Stage::Notify, AppError::notify("a"));
        drop(sink);
        other.report(Stage::Notify, AppError::notify("b"));
        drop(other);

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }
}
