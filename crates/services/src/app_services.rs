use std::sync::Arc;

use quiz_core::{RandomShuffle, ShuffleOrder, SourceOrder};
use storage::{QuestionBankCache, QuestionSource, ValidationError};

use crate::Clock;
use crate::error::AppServicesError;
use crate::sessions::{LearnerContext, QuizLoopService};

/// How each new learner's traversal orders are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShuffleMode {
    /// Fresh OS-seeded randomness per learner.
    #[default]
    Random,
    /// Deterministic: learner `n` gets `seed + n`.
    Seeded(u64),
    /// Questions in source order.
    Source,
}

/// Process-wide services: the cached question bank and the action handlers.
pub struct AppServices {
    cache: QuestionBankCache,
    quiz_loop: Arc<QuizLoopService>,
    shuffle: ShuffleMode,
    learners_created: u64,
}

impl AppServices {
    /// Load the question table (once) and assemble the services.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::DataLoad` if the table cannot be fetched or parsed.
    pub async fn load(
        source: Box<dyn QuestionSource>,
        clock: Clock,
        shuffle: ShuffleMode,
    ) -> Result<Self, AppServicesError> {
        let cache = QuestionBankCache::new(source);
        let bank = Arc::clone(&cache.get_or_load().await?.bank);
        let quiz_loop = Arc::new(QuizLoopService::new(clock, bank));

        Ok(Self {
            cache,
            quiz_loop,
            shuffle,
            learners_created: 0,
        })
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    /// Rows skipped while loading the table.
    #[must_use]
    pub fn rejected_rows(&self) -> &[ValidationError] {
        self.cache
            .get()
            .map_or(&[][..], |report| report.rejected.as_slice())
    }

    /// A new isolated learner context.
    pub fn new_learner(&mut self) -> LearnerContext {
        let shuffle: Box<dyn ShuffleOrder> = match self.shuffle {
            ShuffleMode::Random => Box::new(RandomShuffle::from_os_rng()),
            ShuffleMode::Seeded(seed) => {
                Box::new(RandomShuffle::seeded(seed.wrapping_add(self.learners_created)))
            }
            ShuffleMode::Source => Box::new(SourceOrder),
        };
        self.learners_created += 1;
        LearnerContext::new(shuffle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::ChapterId;
    use quiz_core::time::fixed_clock;
    use storage::InMemorySource;

    const TABLE: &str = "Chapter,Question,OptionA,OptionB,OptionC,OptionD,Answer\n\
                         Ch1,Q1,a,b,c,d,A\n\
                         Ch1,Q2,a,b,c,d,X\n";

    #[tokio::test]
    async fn load_exposes_bank_and_rejected_rows() {
        let services = AppServices::load(
            Box::new(InMemorySource::new(TABLE)),
            fixed_clock(),
            ShuffleMode::Source,
        )
        .await
        .unwrap();

        assert_eq!(services.quiz_loop().chapters(), vec![ChapterId::new("Ch1")]);
        assert_eq!(services.rejected_rows().len(), 1);
    }

    #[tokio::test]
    async fn bad_table_fails_startup() {
        let result = AppServices::load(
            Box::new(InMemorySource::new("nope\n")),
            fixed_clock(),
            ShuffleMode::Random,
        )
        .await;
        assert!(matches!(result, Err(AppServicesError::DataLoad(_))));
    }

    #[tokio::test]
    async fn seeded_learners_get_distinct_seeds() {
        let mut services = AppServices::load(
            Box::new(InMemorySource::new(TABLE)),
            fixed_clock(),
            ShuffleMode::Seeded(9),
        )
        .await
        .unwrap();
        let a = services.new_learner();
        let b = services.new_learner();
        assert_ne!(a.id(), b.id());
    }
}
