//! Memos - cached derived values.

use std::fmt;

use super::computation::{Computation, ComputationKind};
use super::effects::adopt;
use super::signal::Signal;

/// A read-only derived value backed by its own store.
///
/// Subscribers of a memo only rerun when its equality function reports that
/// the recomputed value differs from the previous one.
pub struct Memo<T> {
    store: Signal<T>,
    computation: Computation,
}

impl<T: 'static> Memo<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.store.get()
    }

    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.store.get_untracked()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.store.with(f)
    }

    pub fn computation(&self) -> &Computation {
        &self.computation
    }
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            computation: self.computation.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Memo").field(&self.store).finish()
    }
}

/// Create a memo compared with `PartialEq`.
///
/// `f` receives the previous value, `None` on the first evaluation.
///
/// # Example
///
/// ```
/// use spark_canvas::{create_memo, signal};
///
/// let count = signal(3);
/// let doubled = {
///     let count = count.clone();
///     create_memo(move |_| count.get() * 2)
/// };
/// count.set(4).unwrap();
/// assert_eq!(doubled.get(), 8);
/// ```
pub fn create_memo<T>(f: impl Fn(Option<&T>) -> T + 'static) -> Memo<T>
where
    T: PartialEq + 'static,
{
    create_memo_with(f, None, |a: &T, b: &T| a == b)
}

/// Create a memo with an initial previous value and a custom equality.
pub fn create_memo_with<T: 'static>(
    f: impl Fn(Option<&T>) -> T + 'static,
    initial: Option<T>,
    eq: impl Fn(&T, &T) -> bool + 'static,
) -> Memo<T> {
    let computation = Computation::new(ComputationKind::Memo);
    adopt(&computation);

    let first = computation.track(|| f(initial.as_ref()));
    let store = Signal::new(first);

    let target = store.clone();
    computation.set_callback(move || {
        let next = target.with_untracked(|prev| f(Some(prev)));
        let changed = target.with_untracked(|prev| !eq(prev, &next));
        if changed {
            target.commit(next)?;
        }
        Ok(())
    });

    Memo { store, computation }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::reactive::signal::signal;

    #[test]
    fn test_memo_tracks_source() {
        let count = signal(1);
        let doubled = {
            let count = count.clone();
            create_memo(move |_| count.get() * 2)
        };
        assert_eq!(doubled.get(), 2);
        count.set(5).unwrap();
        assert_eq!(doubled.get(), 10);
    }

    #[test]
    fn test_memo_receives_previous_value() {
        let count = signal(1);
        let sum = {
            let count = count.clone();
            create_memo(move |prev: Option<&i32>| prev.copied().unwrap_or(0) + count.get())
        };
        assert_eq!(sum.get(), 1);
        count.set(2).unwrap();
        count.set(3).unwrap();
        assert_eq!(sum.get(), 6);
    }

    #[test]
    fn test_memo_only_notifies_on_change() {
        let count = signal(1);
        let parity = {
            let count = count.clone();
            create_memo(move |_| count.get() % 2)
        };

        let runs = Rc::new(Cell::new(0));
        let watcher = {
            let parity = parity.clone();
            let runs = runs.clone();
            Computation::with_callback(ComputationKind::Computed, move || {
                parity.get();
                runs.set(runs.get() + 1);
                Ok(())
            })
        };
        watcher.run(false).unwrap();

        count.set(3).unwrap();
        assert_eq!(runs.get(), 1);
        count.set(4).unwrap();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_memo_custom_equality() {
        let value = signal(10);
        let bucket = {
            let value = value.clone();
            create_memo_with(
                move |_| value.get(),
                Some(0),
                |a: &i32, b: &i32| a / 10 == b / 10,
            )
        };
        assert_eq!(bucket.get(), 10);
        value.set(15).unwrap();
        assert_eq!(bucket.get(), 10);
        value.set(21).unwrap();
        assert_eq!(bucket.get(), 21);
    }
}
