//! Immutable request contexts attached to every in-flight backend call
//!
//! A completion is applied only if its context still equals the one the
//! current state would issue; anything else is a stale response.

use tflens_backend::LogQuery;
use tflens_core::{LogFilters, PairingMode, RunId};

use crate::store::SelectionScope;

/// Everything that determines which log page is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub run_id: RunId,
    pub pairing: PairingMode,
    pub page: u32,
    pub page_size: u32,
    pub include_pairs: bool,
    pub filters: LogFilters,
    pub group_rows: bool,
}

impl RequestContext {
    /// Backend query for this context
    pub fn query(&self) -> LogQuery {
        LogQuery {
            run_id: self.run_id,
            page: self.page,
            page_size: self.page_size,
            pairing: self.pairing,
            include_pairs: self.include_pairs,
            filters: self.filters.clone(),
        }
    }

    /// Selection scope rendering under this context reads from
    pub fn scope(&self) -> SelectionScope {
        SelectionScope::new(self.run_id, self.pairing)
    }
}

/// Context of a timeline fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineContext {
    pub run_id: RunId,
    pub pairing: PairingMode,
}

/// Context of a group-listing fetch for a selection dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupListContext {
    pub run_id: RunId,
    pub pairing: PairingMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RequestContext {
        RequestContext {
            run_id: 2,
            pairing: PairingMode::Phase,
            page: 3,
            page_size: 20,
            include_pairs: true,
            filters: LogFilters::default(),
            group_rows: true,
        }
    }

    #[test]
    fn test_query_mirrors_context() {
        let q = ctx().query();
        assert_eq!(q.run_id, 2);
        assert_eq!(q.page, 3);
        assert_eq!(q.page_size, 20);
        assert_eq!(q.pairing, PairingMode::Phase);
        assert!(q.include_pairs);
    }

    #[test]
    fn test_context_equality_detects_changes() {
        let a = ctx();
        let mut b = ctx();
        assert_eq!(a, b);
        b.filters.phase = Some("apply".into());
        assert_ne!(a, b);
        assert_eq!(a.scope(), SelectionScope::new(2, PairingMode::Phase));
    }
}
