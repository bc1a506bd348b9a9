use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

/// size of a candidate solution (larger is better)
pub trait Measure {
    /// value compared by the aggregator
    fn measure(&self) -> usize;
}

impl<T> Measure for Vec<T> {
    fn measure(&self) -> usize { self.len() }
}

/** keeps the largest value offered so far, shared by concurrent trials.

`offer` first compares with an atomic copy of the best size without locking, which rejects
most candidates. Only apparent improvements take the lock and are compared again before
replacing the best value. Equal sizes never replace the stored value (first writer wins).
The stored size only increases.
*/
#[derive(Debug, Default)]
pub struct BestResult<T> {
    /// size of `best`, readable without locking
    best_size: AtomicUsize,
    /// best value so far
    best: Mutex<T>,
    /// number of accepted offers
    nb_improvements: AtomicUsize,
}

impl<T:Measure + Default> BestResult<T> {
    /// empty aggregator
    pub fn new() -> Self {
        Self {
            best_size: AtomicUsize::new(0),
            best: Mutex::new(T::default()),
            nb_improvements: AtomicUsize::new(0),
        }
    }
}

impl<T:Measure> BestResult<T> {
    /// aggregator seeded with an initial value
    pub fn with_initial(value:T) -> Self {
        Self {
            best_size: AtomicUsize::new(value.measure()),
            best: Mutex::new(value),
            nb_improvements: AtomicUsize::new(0),
        }
    }

    /// offers a candidate. Returns true if it became the new best.
    pub fn offer(&self, candidate:T) -> bool {
        let size = candidate.measure();
        if size <= self.best_size.load(Ordering::Acquire) {
            return false;
        }
        let mut best = self.best.lock();
        // another trial may have improved between the check and the lock
        if size <= best.measure() {
            return false;
        }
        *best = candidate;
        self.best_size.store(size, Ordering::Release);
        self.nb_improvements.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// size of the best value so far
    pub fn size(&self) -> usize { self.best_size.load(Ordering::Acquire) }

    /// number of times the best value was replaced
    pub fn nb_improvements(&self) -> usize { self.nb_improvements.load(Ordering::Relaxed) }

    /// consumes the aggregator, returns the best value
    pub fn into_inner(self) -> T { self.best.into_inner() }
}

impl<T:Clone> BestResult<T> {
    /// copy of the best value so far
    pub fn snapshot(&self) -> T { self.best.lock().clone() }
}
