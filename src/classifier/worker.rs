use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use log::{debug, warn};
use tokio::{runtime::Handle, sync::oneshot};

use super::classifier::Classifier;
use super::engine::InferenceEngine;
use super::types::{PixelBuffer, Prediction};
use crate::error::{Error, Result};

/// Runs one classification at a time off the caller's task.
///
/// A trigger while a run is active is rejected with [`Error::Busy`]. Each
/// accepted trigger publishes exactly one result on its channel.
pub struct Recognizer<E: InferenceEngine + 'static> {
    classifier: Arc<Mutex<Classifier<E>>>,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when the worker finishes, even on panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<E: InferenceEngine + 'static> Recognizer<E> {
    pub fn new(classifier: Classifier<E>) -> Self {
        Self {
            classifier: Arc::new(Mutex::new(classifier)),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts a run on the blocking pool of the current tokio runtime.
    pub fn recognize(&self, image: PixelBuffer) -> Result<oneshot::Receiver<Result<Prediction>>> {
        let handle = Handle::try_current().map_err(|e| Error::from_error(&e))?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("recognition requested while another one is running");
            return Err(Error::Busy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let (tx, rx) = oneshot::channel();
        let classifier = Arc::clone(&self.classifier);
        handle.spawn_blocking(move || {
            // classifiers keep no state between calls
            let result = classifier
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .classify(&image);
            // ready again before the result is observable
            drop(guard);
            if tx.send(result).is_err() {
                debug!("recognition result dropped, receiver gone");
            }
        });

        Ok(rx)
    }

    /// Starts a run and waits for its result.
    pub async fn run(&self, image: PixelBuffer) -> Result<Prediction> {
        let rx = self.recognize(image)?;
        rx.await.map_err(|_| Error::WorkerGone)?
    }
}
