/// Grid notifications
///
/// The grid reports every accepted intent as a [`GridEvent`] and, after each
/// transition, publishes an immutable [`GridSnapshot`] of what should be on
/// screen. Both are serializable (events are tagged by a `type` field) so a
/// host can forward them over whatever transport it uses.

use crate::infinite::{FetchTicket, ScrollState};
use crate::pagination::PaginationState;
use crate::query::{Filter, Query, SortSpec};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

/// Advisory notifications, emitted after the grid has applied the change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridEvent<Id: Eq + Hash> {
    /// The active sort changed (`None` means unsorted)
    Sort { sort: Option<SortSpec> },

    /// The filter set changed
    Filter { filters: Vec<Filter> },

    /// The search term or its columns changed
    Search { term: String, columns: Vec<String> },

    /// The current page changed
    PageChange { page: usize },

    /// The page size changed
    PageSizeChange { page_size: usize },

    /// A fetch was started; complete it with this ticket
    FetchNextPage { ticket: FetchTicket },

    /// The selected identities changed
    SelectionChange { selected: HashSet<Id> },
}

/// Selection state relative to the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    /// All selected identities, visible or not
    pub selected: usize,
    pub visible_selected: usize,
    pub all_visible_selected: bool,
    pub indeterminate: bool,
}

/// Everything the render surface needs to redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot<Id> {
    /// Bumped on every query change
    pub generation: u64,
    pub query: Query,
    /// Rows matching the query, before pagination or windowing
    pub matched: usize,
    /// Source positions of the visible rows, in display order
    pub rows: Vec<usize>,
    /// Identities of the visible rows, parallel to `rows`
    pub ids: Vec<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll: Option<ScrollState>,
    pub selection: SelectionSummary,
}

/// Subscriber interface for the render surface or host application.
pub trait GridObserver<Id: Eq + Hash> {
    fn on_event(&mut self, _event: &GridEvent<Id>) {}

    fn on_snapshot(&mut self, _snapshot: &GridSnapshot<Id>) {}
}

impl<Id: Eq + Hash, T: GridObserver<Id> + ?Sized> GridObserver<Id> for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &GridEvent<Id>) {
        self.borrow_mut().on_event(event);
    }

    fn on_snapshot(&mut self, snapshot: &GridSnapshot<Id>) {
        self.borrow_mut().on_snapshot(snapshot);
    }
}

/// Observer that keeps every event and the latest snapshot.
#[derive(Debug, Clone)]
pub struct EventLog<Id: Eq + Hash> {
    pub events: Vec<GridEvent<Id>>,
    pub latest: Option<GridSnapshot<Id>>,
    pub snapshots: usize,
}

impl<Id: Eq + Hash> Default for EventLog<Id> {
    fn default() -> Self {
        EventLog {
            events: Vec::new(),
            latest: None,
            snapshots: 0,
        }
    }
}

impl<Id: Eq + Hash> EventLog<Id> {
    pub fn new() -> Self {
        EventLog::default()
    }

    /// A shareable log: subscribe one clone, inspect the other.
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(EventLog::new()))
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.latest = None;
        self.snapshots = 0;
    }
}

impl<Id: Eq + Hash + Clone> GridObserver<Id> for EventLog<Id> {
    fn on_event(&mut self, event: &GridEvent<Id>) {
        self.events.push(event.clone());
    }

    fn on_snapshot(&mut self, snapshot: &GridSnapshot<Id>) {
        self.latest = Some(snapshot.clone());
        self.snapshots += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortSpec;

    #[test]
    fn test_event_serialization() {
        let event: GridEvent<u32> = GridEvent::Sort {
            sort: Some(SortSpec::descending("salary")),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "sort");
        assert_eq!(json["sort"]["column"], "salary");
        assert_eq!(json["sort"]["direction"], "desc");

        let event: GridEvent<u32> = GridEvent::PageSizeChange { page_size: 50 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "pageSizeChange");

        let cleared: GridEvent<u32> = GridEvent::Sort { sort: None };
        assert!(serde_json::to_value(&cleared).unwrap()["sort"].is_null());
    }

    #[test]
    fn test_shared_log_records() {
        let log = EventLog::<u32>::shared();
        let mut handle = log.clone();
        handle.on_event(&GridEvent::PageChange { page: 2 });

        assert_eq!(log.borrow().events, vec![GridEvent::PageChange { page: 2 }]);
        log.borrow_mut().clear();
        assert!(log.borrow().events.is_empty());
    }
}
