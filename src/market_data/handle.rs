// Market data source plus who releases it

use std::fmt;
use std::sync::Arc;

use super::MarketDataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owned,    // released when the handle drops
    Borrowed, // caller keeps it alive
}

/// Dropping an `Owned` handle calls [`MarketDataSource::release`] exactly once.
pub struct SourceHandle {
    source: Arc<dyn MarketDataSource>,
    ownership: Ownership,
}

impl SourceHandle {
    pub fn owned<S>(source: S) -> Self
    where
        S: MarketDataSource + 'static,
    {
        Self {
            source: Arc::new(source),
            ownership: Ownership::Owned,
        }
    }

    pub fn borrowed(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            ownership: Ownership::Borrowed,
        }
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn get(&self) -> &dyn MarketDataSource {
        self.source.as_ref()
    }

    // for requests that outlive a borrow of the handle
    pub fn source(&self) -> Arc<dyn MarketDataSource> {
        Arc::clone(&self.source)
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle")
            .field("ownership", &self.ownership)
            .finish_non_exhaustive()
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        if self.ownership == Ownership::Owned {
            self.source.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::testing::ScriptedSource;

    #[test]
    fn test_owned_handle_releases_once_on_drop() {
        let source = ScriptedSource::new();
        let handle = SourceHandle::owned(source.clone());
        assert_eq!(handle.ownership(), Ownership::Owned);
        assert_eq!(source.releases(), 0);
        drop(handle);
        assert_eq!(source.releases(), 1);
    }

    #[test]
    fn test_borrowed_handle_never_releases() {
        let source = ScriptedSource::new();
        let shared: Arc<dyn MarketDataSource> = Arc::new(source.clone());
        let handle = SourceHandle::borrowed(Arc::clone(&shared));
        assert_eq!(handle.ownership(), Ownership::Borrowed);
        drop(handle);
        assert_eq!(source.releases(), 0);
    }
}
