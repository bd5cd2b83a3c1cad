//! Progress-callback trait for per-label preparation events.
//!
//! Inject an [`Arc<dyn PreparationProgressCallback>`] via
//! [`crate::config::PrepConfigBuilder::progress_callback`] to receive events
//! as the job moves through its stages and processes each label. The CLI uses
//! it to drive a terminal progress bar.

use crate::classify::Carrier;
use crate::prepare::Stage;
use std::path::Path;
use std::sync::Arc;

/// Called by the preparation job as it runs.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Labels are processed one at a time, in order.
pub trait PreparationProgressCallback: Send + Sync {
    /// Called on every stage transition, including the final `Done` or `Failed`.
    fn on_stage(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called once scanning is done.
    ///
    /// # Arguments
    /// * `total_labels`: number of `.pdf` files that will be processed
    fn on_preparation_start(&self, total_labels: usize) {
        let _ = total_labels;
    }

    /// Called before a label's metadata is read.
    ///
    /// # Arguments
    /// * `index`: 1-indexed position in processing order
    /// * `total`: number of labels in the batch
    /// * `name`: file name of the label
    fn on_label_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called once a label has been cropped (and rotated if needed).
    fn on_label_complete(&self, index: usize, total: usize, name: &str, carrier: Carrier) {
        let _ = (index, total, name, carrier);
    }

    /// Called when a label fails; the job stops right after.
    fn on_label_error(&self, index: usize, total: usize, name: &str, error: &str) {
        let _ = (index, total, name, error);
    }

    /// Called after the merged document is written and intermediates removed.
    fn on_preparation_complete(&self, output: &Path, labels: usize) {
        let _ = (output, labels);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PreparationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PrepConfig`].
pub type ProgressCallback = Arc<dyn PreparationProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        stages: Mutex<Vec<Stage>>,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl PreparationProgressCallback for TrackingCallback {
        fn on_stage(&self, stage: Stage) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_label_complete(&self, _index: usize, _total: usize, _name: &str, _carrier: Carrier) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_label_error(&self, _index: usize, _total: usize, _name: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage(Stage::Scanning);
        cb.on_preparation_start(2);
        cb.on_label_start(1, 2, "a.pdf");
        cb.on_label_complete(1, 2, "a.pdf", Carrier::Colissimo);
        cb.on_label_error(2, 2, "b.pdf", "boom");
        cb.on_preparation_complete(Path::new("out.pdf"), 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_stage(Stage::Scanning);
        tracker.on_label_complete(1, 2, "a.pdf", Carrier::MondialRelay);
        tracker.on_label_error(2, 2, "b.pdf", "no region");
        tracker.on_stage(Stage::Failed);

        assert_eq!(
            *tracker.stages.lock().unwrap(),
            vec![Stage::Scanning, Stage::Failed]
        );
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_preparation_start(3);
        cb.on_label_start(1, 3, "a.pdf");
    }
}
