use crate::pool::report::JobOutcome;
use crossbeam::channel::bounded;

/// Fixed-size pool of worker threads pulling candidates from a shared queue.
///
/// Each item is processed exactly once and yields exactly one outcome, tagged
/// with its original index so the report can be reassembled in scan order.
/// Completion order across workers is unspecified; a slow item occupies only
/// its own worker slot.
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// `workers` is assumed validated (>= 1) by the caller's configuration
    /// checks; it is additionally capped at the item count at run time.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn run<T, F>(&self, items: &[T], job: F) -> Vec<(usize, JobOutcome)>
    where
        T: Sync,
        F: Fn(&T) -> JobOutcome + Sync,
    {
        if items.is_empty() {
            return Vec::new();
        }

        let workers = self.workers.min(items.len());

        // Queue every item up front; capacity == len, so sends never block
        // and dropping the sender marks the queue as drained.
        let (work_tx, work_rx) = bounded(items.len());
        for pair in items.iter().enumerate() {
            let _ = work_tx.send(pair);
        }
        drop(work_tx);

        let (result_tx, result_rx) = bounded(items.len());

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let job = &job;

                scope.spawn(move || {
                    while let Ok((index, item)) = work_rx.recv() {
                        let outcome = job(item);
                        if result_tx.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
        });

        drop(result_tx);
        result_rx.into_iter().collect()
    }
}
