//! Switchable data parallelism for root computation.
//!
//! With the `parallel` feature, the field roots of a container and the
//! element roots of large lists are computed on the rayon pool. The switch
//! lets tests and benchmarks compare both paths in one binary.

use crate::ssz::error::SszResult;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
static PARALLEL_ENABLED: AtomicBool = AtomicBool::new(true);

/// Lists shorter than this are always hashed on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 64;

#[cfg(feature = "parallel")]
pub fn parallelism_enabled() -> bool {
    PARALLEL_ENABLED.load(Ordering::SeqCst)
}

#[cfg(not(feature = "parallel"))]
pub fn parallelism_enabled() -> bool {
    false
}

/// Sets the switch until the returned guard is dropped.
#[cfg(feature = "parallel")]
pub fn set_parallelism(enabled: bool) -> ParallelismGuard {
    let previous = PARALLEL_ENABLED.swap(enabled, Ordering::SeqCst);
    ParallelismGuard { previous }
}

#[cfg(not(feature = "parallel"))]
pub fn set_parallelism(_enabled: bool) -> ParallelismGuard {
    ParallelismGuard {}
}

pub struct ParallelismGuard {
    #[cfg(feature = "parallel")]
    previous: bool,
}

#[cfg(feature = "parallel")]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {
        PARALLEL_ENABLED.store(self.previous, Ordering::SeqCst);
    }
}

/// Maps `f` over `items`, in parallel when the list is large enough.
///
/// Output order always matches input order; the first error wins.
pub(crate) fn try_map<T, R, F>(items: &[T], f: F) -> SszResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> SszResult<R> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if items.len() >= PARALLEL_THRESHOLD && parallelism_enabled() {
            use rayon::prelude::*;
            return items
                .par_iter()
                .with_min_len(PARALLEL_THRESHOLD)
                .map(&f)
                .collect();
        }
    }
    items.iter().map(f).collect()
}

/// Maps `f` over `items` with one pool task per item, however short the
/// slice. Suits a few items of very uneven cost, like a container's fields.
pub(crate) fn try_map_each<T, R, F>(items: &[T], f: F) -> SszResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> SszResult<R> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if items.len() > 1 && parallelism_enabled() {
            use rayon::prelude::*;
            return items.par_iter().map(&f).collect();
        }
    }
    items.iter().map(f).collect()
}

/// Serializes tests that flip the process-wide switch.
#[cfg(test)]
pub(crate) fn switch_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
