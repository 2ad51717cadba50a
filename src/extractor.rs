use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::OpError;
use crate::models::{PreviewResult, SourceFile};
use crate::ops::ExternalOps;
use crate::selection::SelectionSet;

/// One file the last batch could not extract a preview for. Kept alongside
/// the published results so the UI can show which files were dropped instead
/// of silently hiding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFailure {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Default)]
struct PublishedBatch {
    generation: u64,
    results: Vec<PreviewResult>,
    failures: Vec<ExtractionFailure>,
}

/// Turns the current file set into a published set of previews.
///
/// On every file-set change the generation counter is bumped and one
/// extraction request is dispatched per file, all in flight at once. The
/// batch publishes only after every request has settled, and only if its
/// generation is still the newest one; results of a superseded batch are
/// discarded when they arrive. Failed files are excluded from the results and
/// recorded per file, never surfaced as an error of the batch.
pub struct Extractor {
    ops: Arc<dyn ExternalOps>,
    generation: AtomicU64,
    published: Mutex<PublishedBatch>,
}

impl Extractor {
    pub fn new(ops: Arc<dyn ExternalOps>) -> Self {
        Self {
            ops,
            generation: AtomicU64::new(0),
            published: Mutex::new(PublishedBatch::default()),
        }
    }

    /// Run one fan-out/fan-in batch for `files` and publish the outcome.
    ///
    /// Results are re-associated with their source file by path, never by
    /// completion order, and published in file-list order with at most one
    /// result per content hash. On publish the selection set is reconciled
    /// so it cannot keep hashes that are no longer on screen.
    ///
    /// Returns `false` when the batch was superseded while in flight and its
    /// results were discarded.
    pub async fn refresh(&self, files: &[SourceFile], selection: &SelectionSet) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let candidates: Vec<&SourceFile> = files.iter().filter(|f| !f.is_directory).collect();
        debug!(generation, files = candidates.len(), "dispatching extraction batch");

        let requests = candidates.iter().map(|file| {
            let ops = Arc::clone(&self.ops);
            let path = file.path.clone();
            async move {
                let outcome = ops.extract_preview(&path).await;
                (path, outcome)
            }
        });

        // Every request settles before anything is published; a single slow
        // or failing file never aborts its siblings.
        let settled = join_all(requests).await;

        let mut by_path: HashMap<String, Result<PreviewResult, OpError>> =
            settled.into_iter().collect();

        let mut results = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();
        let mut hashes = HashSet::new();
        for file in &candidates {
            match by_path.remove(&file.path) {
                Some(Ok(result)) => {
                    if hashes.insert(result.content_hash.clone()) {
                        results.push(result);
                    } else {
                        warn!(
                            path = %file.path,
                            hash = %result.content_hash,
                            "duplicate content hash in listing, keeping first occurrence"
                        );
                    }
                }
                Some(Err(err)) => {
                    warn!(path = %file.path, error = %err, "preview extraction failed");
                    failures.push(ExtractionFailure {
                        path: file.path.clone(),
                        reason: err.to_string(),
                    });
                }
                // Paths are unique within a listing; a repeated path was
                // consumed by its first occurrence.
                None => {}
            }
        }

        // The staleness check and the store happen under one lock: a newer
        // batch may publish between a bare counter check and the store, and
        // its results must never be overwritten by a superseded batch.
        let mut published = self.published.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation
            || published.generation > generation
        {
            debug!(generation, "file set changed while in flight, discarding batch");
            return false;
        }

        info!(
            generation,
            published = results.len(),
            failed = failures.len(),
            "publishing extraction batch"
        );
        *published = PublishedBatch {
            generation,
            results,
            failures,
        };
        selection.reconcile(&hashes);
        true
    }

    /// Snapshot of the last published results, in file-list order.
    pub fn results(&self) -> Vec<PreviewResult> {
        self.published.lock().unwrap().results.clone()
    }

    /// Content hashes of the last published results.
    pub fn published_hashes(&self) -> HashSet<String> {
        self.published
            .lock()
            .unwrap()
            .results
            .iter()
            .map(|r| r.content_hash.clone())
            .collect()
    }

    /// Per-file failures of the last published batch.
    pub fn failures(&self) -> Vec<ExtractionFailure> {
        self.published.lock().unwrap().failures.clone()
    }

    pub fn generation(&self) -> u64 {
        self.published.lock().unwrap().generation
    }
}
