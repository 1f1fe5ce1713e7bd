//! Bounded-concurrency batch runner
//!
//! Runs a task over many items with at most `ceiling` items in flight.
//! Workers draw from a shared cursor until the queue is exhausted; the call
//! returns only once every item has completed. Per-item results come back
//! in item order; a failed item never aborts its siblings.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// Default ceiling for "compile everything" operations
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Execute `task` over `items` with at most `ceiling` concurrent workers.
///
/// The ceiling is clamped to at least 1 and never exceeds the item count.
/// Completion order across items is unspecified; the returned vector is in
/// item order regardless.
pub fn run_bounded<T, R, F>(items: &[T], ceiling: usize, task: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }

    let workers = ceiling.max(1).min(items.len());
    let cursor = AtomicUsize::new(0);
    let (sender, receiver) = mpsc::channel();

    thread::scope(|scope| {
        for _ in 0..workers {
            let sender = sender.clone();
            let cursor = &cursor;
            let task = &task;
            scope.spawn(move || loop {
                let index = cursor.fetch_add(1, Ordering::SeqCst);
                if index >= items.len() {
                    break;
                }
                let result = task(&items[index]);
                if sender.send((index, result)).is_err() {
                    break;
                }
            });
        }
        drop(sender);
    });

    let mut results: Vec<(usize, R)> = receiver.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}
