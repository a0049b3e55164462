use crate::debounce::Debouncer;
use crate::model::FilterConfig;
use crate::query_params::{convert_filters_to_query_params, QueryParams};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

pub const DEFAULT_PREVIEW_DEBOUNCE: Duration = Duration::from_millis(300);

/// Throttles preview fetches while a config is being edited and remembers
/// which filter hash is current, so out-of-order responses can be dropped.
pub struct PreviewScheduler<F> {
    debouncer: Debouncer<QueryParams, F>,
    latest_hash: Mutex<Option<String>>,
}

impl<F, Fut> PreviewScheduler<F>
where
    F: Fn(QueryParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    pub fn new(fetch: F, wait: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(fetch, wait),
            latest_hash: Mutex::new(None),
        }
    }

    /// Record the new config and schedule a preview. A config with nothing to
    /// send cancels the pending preview instead.
    pub fn config_changed(&self, config: &FilterConfig) {
        let params = convert_filters_to_query_params(config);
        self.set_latest(params.filter_hash.clone());
        if params.is_empty() {
            tracing::debug!("No complete conditions, preview cancelled");
            self.debouncer.cancel();
            return;
        }
        self.debouncer.call(params);
    }

    pub fn latest_hash(&self) -> Option<String> {
        self.latest_hash
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether a response computed for `hash` still matches the current config
    pub fn is_current(&self, hash: &str) -> bool {
        self.latest_hash().as_deref() == Some(hash)
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn set_latest(&self, hash: Option<String>) {
        *self
            .latest_hash
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = hash;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, FilterGroup, FilterValue};
    use std::sync::Arc;

    fn config_with(value: &str) -> FilterConfig {
        FilterConfig::new(vec![FilterGroup::new(vec![Condition::new(
            "name",
            "contains",
            FilterValue::single(value),
        )
        .with_id("c1")])
        .with_id("g1")])
    }

    fn recording_scheduler(
        sent: &Arc<Mutex<Vec<QueryParams>>>,
    ) -> PreviewScheduler<impl Fn(QueryParams) -> std::future::Ready<()> + Send + Sync + 'static> {
        let sent = Arc::clone(sent);
        PreviewScheduler::new(
            move |params| {
                sent.lock().unwrap().push(params);
                std::future::ready(())
            },
            Duration::from_millis(100),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_send_one_preview() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let scheduler = recording_scheduler(&sent);

        scheduler.config_changed(&config_with("A"));
        scheduler.config_changed(&config_with("Ac"));
        scheduler.config_changed(&config_with("Acme"));
        tokio::time::sleep(Duration::from_millis(150)).await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            convert_filters_to_query_params(&config_with("Acme"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_hash_detection() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let scheduler = recording_scheduler(&sent);

        scheduler.config_changed(&config_with("Acme"));
        tokio::time::sleep(Duration::from_millis(150)).await;
        let first_hash = sent.lock().unwrap()[0].filter_hash.clone().unwrap();
        assert!(scheduler.is_current(&first_hash));

        scheduler.config_changed(&config_with("Globex"));
        assert!(!scheduler.is_current(&first_hash));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_filters_cancels_pending_preview() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let scheduler = recording_scheduler(&sent);

        scheduler.config_changed(&config_with("Acme"));
        assert!(scheduler.is_pending());
        scheduler.config_changed(&FilterConfig::empty());
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.latest_hash(), None);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(sent.lock().unwrap().is_empty());
    }
}
