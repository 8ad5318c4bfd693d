/// Infinite scroll controller.
///
/// Accumulates a growing window over the derived view. A proximity signal
/// ([`InfiniteScroll::near_end`]) starts at most one fetch at a time; the
/// fetch completes through [`InfiniteScroll::complete`] with the ticket it
/// was started with.
///
/// ```text
///            near_end (has next, not fetching)
///   Idle ─────────────────────────────────────▶ Fetching
///    ▲  ◀──── complete: loaded < total ─────────┘  │
///    │  ◀──── complete: error ──────────────────────┤
///    │                                              │ complete: loaded >= total
///    └──── reset (rows remain) ◀── Exhausted ◀──────┘
/// ```
///
/// There is no cancellation. A query change calls [`InfiniteScroll::reset`],
/// which bumps the generation; a completion carrying an older generation is
/// reported as [`FetchOutcome::Stale`] and leaves the state untouched.

use crate::error::{FetchError, GridError};
use serde::Serialize;
use std::future::Future;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollPhase {
    /// Not fetching; more rows may exist
    Idle,
    /// One fetch outstanding
    Fetching,
    /// Every row is loaded
    Exhausted,
}

/// Handle for one outstanding fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FetchTicket {
    generation: u64,
    offset: usize,
    limit: usize,
}

impl FetchTicket {
    /// The query generation the fetch was started under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// What a page source is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

/// Result of a successful fetch as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchedPage {
    /// Rows appended by this fetch
    pub received: usize,
    /// Total rows the source reports for the current query
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { loaded: usize, phase: ScrollPhase },
    Failed(FetchError),
    /// The query changed (or the ticket is unknown); the result was discarded.
    Stale,
}

/// Serializable infinite-scroll state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    pub loaded_count: usize,
    pub total: usize,
    pub has_next_page: bool,
    pub is_fetching_next_page: bool,
    pub phase: ScrollPhase,
}

/// A page of rows returned by a [`PageSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub rows: Vec<R>,
    pub total: usize,
}

/// The asynchronous fetch boundary.
pub trait PageSource<R> {
    fn fetch(&mut self, request: PageRequest) -> impl Future<Output = Result<Page<R>, FetchError>>;
}

/// Serves pages out of an in-memory vector.
#[derive(Debug, Clone)]
pub struct SlicePageSource<R> {
    rows: Vec<R>,
}

impl<R> SlicePageSource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        SlicePageSource { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Clone> PageSource<R> for SlicePageSource<R> {
    fn fetch(&mut self, request: PageRequest) -> impl Future<Output = Result<Page<R>, FetchError>> {
        let start = request.offset.min(self.rows.len());
        let end = request.offset.saturating_add(request.limit).min(self.rows.len());
        std::future::ready(Ok(Page {
            rows: self.rows[start..end].to_vec(),
            total: self.rows.len(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct InfiniteScroll {
    initial_window: usize,
    batch_size: usize,
    loaded: usize,
    total: usize,
    phase: ScrollPhase,
    generation: u64,
    in_flight: Option<FetchTicket>,
}

impl InfiniteScroll {
    pub fn new(initial_window: usize, batch_size: usize) -> Result<Self, GridError> {
        if batch_size == 0 {
            return Err(GridError::InvalidBatchSize);
        }
        Ok(InfiniteScroll {
            initial_window,
            batch_size,
            loaded: 0,
            total: 0,
            phase: ScrollPhase::Exhausted,
            generation: 0,
            in_flight: None,
        })
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn has_next_page(&self) -> bool {
        self.loaded < self.total
    }

    pub fn is_fetching(&self) -> bool {
        self.phase == ScrollPhase::Fetching
    }

    /// Starts over for a new query with `total` matching rows. Any fetch
    /// still in flight becomes stale.
    pub fn reset(&mut self, total: usize) {
        self.generation += 1;
        self.total = total;
        self.loaded = self.initial_window.min(total);
        self.in_flight = None;
        self.phase = if self.loaded < total {
            ScrollPhase::Idle
        } else {
            ScrollPhase::Exhausted
        };
        log::debug!(
            "scroll reset: generation {}, {} of {} rows loaded",
            self.generation,
            self.loaded,
            self.total
        );
    }

    /// Proximity signal. Returns a ticket only on an `Idle -> Fetching`
    /// transition; repeated signals while a fetch is outstanding are ignored.
    pub fn near_end(&mut self) -> Option<FetchTicket> {
        match self.phase {
            ScrollPhase::Idle if self.has_next_page() => {
                let ticket = FetchTicket {
                    generation: self.generation,
                    offset: self.loaded,
                    limit: self.batch_size,
                };
                self.phase = ScrollPhase::Fetching;
                self.in_flight = Some(ticket);
                log::debug!(
                    "fetching rows {}..{}",
                    ticket.offset,
                    ticket.offset.saturating_add(ticket.limit)
                );
                Some(ticket)
            }
            ScrollPhase::Fetching => {
                log::trace!("near_end ignored: fetch already outstanding");
                None
            }
            _ => None,
        }
    }

    /// Applies the completion of the fetch started with `ticket`.
    ///
    /// Every path out of `Fetching` goes through here: success moves to
    /// `Idle` or `Exhausted`, failure moves back to `Idle`.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<FetchedPage, FetchError>) -> FetchOutcome {
        if ticket.generation != self.generation || self.in_flight != Some(ticket) {
            log::warn!(
                "discarding stale fetch completion (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.loaded += page.received;
                self.total = page.total.max(self.loaded);
                self.phase = if self.loaded >= self.total {
                    ScrollPhase::Exhausted
                } else {
                    ScrollPhase::Idle
                };
                log::debug!(
                    "fetch applied: {} of {} rows loaded ({:?})",
                    self.loaded,
                    self.total,
                    self.phase
                );
                FetchOutcome::Applied {
                    loaded: self.loaded,
                    phase: self.phase,
                }
            }
            Err(err) => {
                log::warn!("fetch failed, returning to idle: {}", err);
                self.phase = ScrollPhase::Idle;
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Runs one proximity -> fetch -> completion cycle against `source`,
    /// appending received rows to `buffer`. Returns `None` when no fetch
    /// was started.
    pub async fn fetch_next<R, S>(&mut self, source: &mut S, buffer: &mut Vec<R>) -> Option<FetchOutcome>
    where
        S: PageSource<R>,
    {
        let ticket = self.near_end()?;
        let result = source.fetch(ticket.request()).await.map(|page| {
            let received = page.rows.len();
            buffer.extend(page.rows);
            FetchedPage {
                received,
                total: page.total,
            }
        });
        Some(self.complete(ticket, result))
    }

    /// Positions of the derived view currently loaded.
    pub fn window(&self) -> Range<usize> {
        0..self.loaded
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.loaded.min(items.len())]
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            loaded_count: self.loaded,
            total: self.total,
            has_next_page: self.has_next_page(),
            is_fetching_next_page: self.is_fetching(),
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(received: usize, total: usize) -> Result<FetchedPage, FetchError> {
        Ok(FetchedPage { received, total })
    }

    #[test]
    fn test_zero_batch_rejected() {
        assert!(matches!(InfiniteScroll::new(50, 0), Err(GridError::InvalidBatchSize)));
    }

    #[test]
    fn test_reset_phases() {
        let mut scroll = InfiniteScroll::new(50, 50).unwrap();
        scroll.reset(120);
        assert_eq!(scroll.phase(), ScrollPhase::Idle);
        assert_eq!(scroll.loaded_count(), 50);

        scroll.reset(30);
        assert_eq!(scroll.phase(), ScrollPhase::Exhausted);
        assert_eq!(scroll.loaded_count(), 30);
        assert!(!scroll.has_next_page());

        scroll.reset(0);
        assert_eq!(scroll.phase(), ScrollPhase::Exhausted);
        assert!(scroll.window().is_empty());
    }

    #[test]
    fn test_single_outstanding_fetch() {
        let mut scroll = InfiniteScroll::new(50, 50).unwrap();
        scroll.reset(200);

        let ticket = scroll.near_end().unwrap();
        assert_eq!(ticket.offset(), 50);
        assert!(scroll.is_fetching());
        assert!(scroll.near_end().is_none());
        assert!(scroll.near_end().is_none());

        let outcome = scroll.complete(ticket, page(50, 200));
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                loaded: 100,
                phase: ScrollPhase::Idle
            }
        );
        assert!(scroll.near_end().is_some());
    }

    #[test]
    fn test_huge_batch_size() {
        log::set_max_level(log::LevelFilter::Debug);
        let mut scroll = InfiniteScroll::new(10, usize::MAX).unwrap();
        scroll.reset(100);

        let ticket = scroll.near_end().unwrap();
        assert_eq!(ticket.offset(), 10);
        assert_eq!(
            scroll.complete(ticket, page(90, 100)),
            FetchOutcome::Applied {
                loaded: 100,
                phase: ScrollPhase::Exhausted
            }
        );
    }

    #[test]
    fn test_exhaustion() {
        let mut scroll = InfiniteScroll::new(50, 50).unwrap();
        scroll.reset(120);

        let t1 = scroll.near_end().unwrap();
        scroll.complete(t1, page(50, 120));
        let t2 = scroll.near_end().unwrap();
        let outcome = scroll.complete(t2, page(20, 120));

        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                loaded: 120,
                phase: ScrollPhase::Exhausted
            }
        );
        for _ in 0..5 {
            assert!(scroll.near_end().is_none());
        }
        assert_eq!(scroll.phase(), ScrollPhase::Exhausted);
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let mut scroll = InfiniteScroll::new(10, 10).unwrap();
        scroll.reset(100);

        let ticket = scroll.near_end().unwrap();
        let outcome = scroll.complete(ticket, Err(FetchError::failed("timeout")));
        assert_eq!(outcome, FetchOutcome::Failed(FetchError::failed("timeout")));
        assert_eq!(scroll.phase(), ScrollPhase::Idle);
        assert_eq!(scroll.loaded_count(), 10);

        let retry = scroll.near_end().unwrap();
        assert_eq!(retry.offset(), 10);
    }

    #[test]
    fn test_stale_completion_discarded() {
        let mut scroll = InfiniteScroll::new(10, 10).unwrap();
        scroll.reset(100);
        let old = scroll.near_end().unwrap();

        scroll.reset(40);
        assert_eq!(scroll.phase(), ScrollPhase::Idle);

        assert_eq!(scroll.complete(old, page(10, 100)), FetchOutcome::Stale);
        assert_eq!(scroll.loaded_count(), 10);
        assert_eq!(scroll.total(), 40);

        // a ticket can only be completed once
        let current = scroll.near_end().unwrap();
        assert!(matches!(scroll.complete(current, page(10, 40)), FetchOutcome::Applied { .. }));
        assert_eq!(scroll.complete(current, page(10, 40)), FetchOutcome::Stale);
    }

    #[test]
    fn test_slice_and_state() {
        let items: Vec<u32> = (0..25).collect();
        let mut scroll = InfiniteScroll::new(10, 10).unwrap();
        scroll.reset(items.len());
        assert_eq!(scroll.slice(&items).len(), 10);

        let state = scroll.state();
        assert!(state.has_next_page);
        assert!(!state.is_fetching_next_page);
        assert_eq!(serde_json::to_value(state).unwrap()["phase"], "idle");
    }

    #[tokio::test]
    async fn test_fetch_next_with_slice_source() {
        let mut source = SlicePageSource::new((0..23).collect::<Vec<u32>>());
        let mut scroll = InfiniteScroll::new(0, 10).unwrap();
        scroll.reset(source.len());
        let mut loaded: Vec<u32> = Vec::new();

        while let Some(outcome) = scroll.fetch_next(&mut source, &mut loaded).await {
            assert!(matches!(outcome, FetchOutcome::Applied { .. }));
        }

        assert_eq!(loaded, (0..23).collect::<Vec<u32>>());
        assert_eq!(scroll.phase(), ScrollPhase::Exhausted);
    }

    struct FlakySource {
        calls: usize,
    }

    impl PageSource<u32> for FlakySource {
        fn fetch(&mut self, request: PageRequest) -> impl Future<Output = Result<Page<u32>, FetchError>> {
            self.calls += 1;
            let fail = self.calls == 1;
            async move {
                if fail {
                    Err(FetchError::Unavailable)
                } else {
                    Ok(Page {
                        rows: (request.offset as u32..(request.offset + request.limit) as u32).collect(),
                        total: 20,
                    })
                }
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_next_failure_then_retry() {
        let mut source = FlakySource { calls: 0 };
        let mut scroll = InfiniteScroll::new(0, 10).unwrap();
        scroll.reset(20);
        let mut loaded: Vec<u32> = Vec::new();

        let first = scroll.fetch_next(&mut source, &mut loaded).await;
        assert_eq!(first, Some(FetchOutcome::Failed(FetchError::Unavailable)));
        assert!(loaded.is_empty());
        assert_eq!(scroll.phase(), ScrollPhase::Idle);

        let second = scroll.fetch_next(&mut source, &mut loaded).await;
        assert!(matches!(second, Some(FetchOutcome::Applied { loaded: 10, .. })));
        assert_eq!(loaded.len(), 10);
    }
}
