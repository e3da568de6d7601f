//! Merge-on-success, keep-on-failure.
//!
//! Both external feeds (geolocation and exchange rates) are last-known-good
//! caches: a successful fetch is merged into the previous value, a failed
//! one leaves the previous value in place. `merge_or_keep` is the single
//! place that decision is made.

/// Result of folding a fetch into a previously held value.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh<T, E> {
    /// The fetch succeeded and was merged.
    Merged(T),
    /// The fetch failed; `value` is the previous value, unchanged.
    Kept { value: T, error: E },
}

impl<T, E> Refresh<T, E> {
    pub fn value(&self) -> &T {
        match self {
            Refresh::Merged(value) | Refresh::Kept { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Refresh::Merged(value) | Refresh::Kept { value, .. } => value,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Refresh::Merged(_) => None,
            Refresh::Kept { error, .. } => Some(error),
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Refresh::Merged(_))
    }

    /// Converts into a `Result`, dropping the retained value on failure.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Refresh::Merged(value) => Ok(value),
            Refresh::Kept { error, .. } => Err(error),
        }
    }
}

/// Merges `fetched` into `previous` on success, keeps a clone of `previous` on failure.
pub fn merge_or_keep<T, U, E, F>(previous: &T, fetched: Result<U, E>, merge: F) -> Refresh<T, E>
where
    T: Clone,
    F: FnOnce(&T, U) -> T,
{
    match fetched {
        Ok(update) => Refresh::Merged(merge(previous, update)),
        Err(error) => Refresh::Kept {
            value: previous.clone(),
            error,
        },
    }
}
