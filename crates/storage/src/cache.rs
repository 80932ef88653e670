use tokio::sync::OnceCell;

use crate::bank::LoadReport;
use crate::error::DataLoadError;
use crate::source::QuestionSource;
use crate::table::parse_question_table;

/// Loads the question table once and hands out the same result afterwards.
///
/// A failed load is not cached; the next call tries the source again.
pub struct QuestionBankCache {
    source: Box<dyn QuestionSource>,
    loaded: OnceCell<LoadReport>,
}

impl QuestionBankCache {
    #[must_use]
    pub fn new(source: Box<dyn QuestionSource>) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    /// Fetch and parse on first call; return the cached report afterwards.
    ///
    /// # Errors
    ///
    /// Returns `DataLoadError` if fetching or parsing fails.
    pub async fn get_or_load(&self) -> Result<&LoadReport, DataLoadError> {
        self.loaded
            .get_or_try_init(|| async {
                log::info!("loading question table from {}", self.source.describe());
                let text = self.source.fetch().await?;
                parse_question_table(&text)
            })
            .await
    }

    /// The cached report, if a load has succeeded.
    #[must_use]
    pub fn get(&self) -> Option<&LoadReport> {
        self.loaded.get()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }
}

impl std::fmt::Debug for QuestionBankCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionBankCache")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
