use crate::classifier::TriageClassifier;
use crate::config::RevealConfig;
use crate::types::{round_percent, CategoryKey, CategoryMap, TriageCategories};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What the display layer currently shows
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RevealFrame {
    /// Generation of the latest submitted input
    pub generation: u64,
    /// Dominant category of the latest input; `None` before the first submission
    pub dominant: Option<CategoryKey>,
    /// Percentages currently applied to the display
    pub percentages: CategoryMap<f64>,
    /// Whether `percentages` belong to `generation`
    pub revealed: bool,
}

impl RevealFrame {
    pub fn rounded(&self, key: CategoryKey) -> i64 {
        round_percent(*self.percentages.get(key))
    }
}

/// Schedules the staged reveal of percentage targets.
///
/// Each submission supersedes the previous one: the pending task is aborted
/// and a frame is only published while its generation is still the latest.
/// Must be used from within a tokio runtime.
pub struct RevealScheduler {
    delay: Duration,
    classifier: TriageClassifier,
    latest: Arc<AtomicU64>,
    sender: Arc<watch::Sender<RevealFrame>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl RevealScheduler {
    /// Create a scheduler with the given reveal delay
    pub fn new(delay: Duration) -> Self {
        let (sender, _receiver) = watch::channel(RevealFrame::default());
        Self {
            delay,
            classifier: TriageClassifier::new(),
            latest: Arc::new(AtomicU64::new(0)),
            sender: Arc::new(sender),
            pending: Mutex::new(None),
        }
    }

    /// Create a scheduler from reveal configuration
    pub fn from_config(config: &RevealConfig) -> Self {
        Self::new(Duration::from_millis(config.delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Subscribe to display frames
    pub fn subscribe(&self) -> watch::Receiver<RevealFrame> {
        self.sender.subscribe()
    }

    /// Latest published frame
    pub fn current(&self) -> RevealFrame {
        *self.sender.borrow()
    }

    /// Submit new probabilities and schedule their reveal.
    ///
    /// The dominant category is published immediately; the percentage targets
    /// follow after the configured delay. Returns the submission's generation.
    pub fn submit(&self, categories: &TriageCategories) -> u64 {
        let state = self.classifier.classify(categories);
        let mut pending = self.lock_pending();

        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let mut generation = 0;
        self.sender.send_modify(|frame| {
            generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            frame.generation = generation;
            frame.dominant = Some(state.dominant);
            frame.revealed = false;
        });

        tracing::debug!(
            generation,
            dominant = %state.dominant,
            delay_ms = self.delay.as_millis() as u64,
            "Scheduled percentage reveal"
        );

        let sender = Arc::clone(&self.sender);
        let latest = Arc::clone(&self.latest);
        let delay = self.delay;
        let targets = state.animated_percentages;

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let applied = sender.send_if_modified(|frame| {
                if latest.load(Ordering::SeqCst) != generation || frame.generation != generation {
                    return false;
                }
                frame.percentages = targets;
                frame.revealed = true;
                true
            });
            if !applied {
                tracing::debug!(generation, "Discarded superseded reveal");
            }
        }));

        generation
    }

    /// Cancel the pending reveal, if any, without publishing it
    pub fn cancel(&self) {
        let mut pending = self.lock_pending();
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        // Invalidate under the channel lock so a task that already woke up
        // cannot publish afterwards.
        self.sender.send_if_modified(|_| {
            self.latest.fetch_add(1, Ordering::SeqCst);
            false
        });
    }

    /// Whether a reveal is still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::from_config(&RevealConfig::default())
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }
}
