//! View state for asynchronously loaded values.

use std::error::Error;
use std::sync::Arc;

/// Shared, cloneable cause of a failed load.
pub type LoadError = Arc<dyn Error + Send + Sync>;

/// A value that is loading, has loaded, or failed to load.
#[derive(Debug, Clone)]
pub enum Loadable<T> {
    Loading,
    Loaded(T),
    Error(LoadError),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Loadable<T> {
    pub fn error(cause: impl Error + Send + Sync + 'static) -> Self {
        Self::Error(Arc::new(cause))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&LoadError> {
        match self {
            Self::Error(cause) => Some(cause),
            _ => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for Loadable<T>
where
    E: Error + Send + Sync + 'static,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(cause) => Self::error(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("offline")]
    struct Offline;

    #[test]
    fn test_default_is_loading() {
        let state: Loadable<Vec<u8>> = Loadable::default();
        assert!(state.is_loading());
        assert!(state.value().is_none());
    }

    #[test]
    fn test_from_result() {
        let loaded: Loadable<u8> = Ok::<_, Offline>(3).into();
        assert_eq!(loaded.value(), Some(&3));

        let failed: Loadable<u8> = Err(Offline).into();
        assert_eq!(failed.failure().map(|e| e.to_string()), Some("offline".to_string()));
    }
}
