//! Fan a dispenser's items out over a fixed number of worker threads.

use crate::SequenceDispenser;
use crossbeam_channel::unbounded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::debug;

/// Run `f` on every item of `dispenser` using `workers` scoped threads.
///
/// Each worker pulls items until the dispenser is exhausted, so every item is
/// processed by exactly one worker. `f` receives the worker index and the
/// item. Results come back in completion order.
///
/// A looping dispenser never runs dry, so it is run for one lap: `len()`
/// items starting at its current cursor.
pub fn run_workers<T, R, F>(dispenser: &SequenceDispenser<T>, workers: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    let budget = if dispenser.is_looping() {
        dispenser.len()
    } else {
        dispenser.remaining().unwrap_or_default()
    };
    let workers = workers.max(1).min(budget.max(1));
    let taken = AtomicUsize::new(0);
    let (tx, rx) = unbounded();

    thread::scope(|scope| {
        for worker in 0..workers {
            let tx = tx.clone();
            let f = &f;
            let taken = &taken;
            scope.spawn(move || {
                debug!(worker, "worker started");
                let mut handled = 0usize;
                while taken.fetch_add(1, Ordering::Relaxed) < budget {
                    let Some(item) = dispenser.next() else {
                        break;
                    };
                    // Receiver outlives the scope, send cannot fail.
                    let _ = tx.send(f(worker, item));
                    handled += 1;
                }
                debug!(worker, handled, "worker finished");
            });
        }
    });
    drop(tx);

    rx.into_iter().collect()
}
