//! Infinite-scroll state: the accumulated list of loaded pages for the current
//! query, plus the bookkeeping that keeps late responses from older queries out.
//!
//! Every request is issued as a [`Ticket`] stamped with the query generation and
//! a per-issue sequence number. Changing the parameters bumps the generation, and
//! a retry gets a fresh sequence number, so a response for a superseded query or
//! an abandoned attempt is recognised and dropped in [`Feed::complete`].

use tracing::{debug, error};

use crate::error::FetchError;
use crate::params::QueryParameters;
use crate::pipeline::ContentPage;
use crate::types::ContentItem;

/// Outbound user-visible error signal.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Default notifier: the error goes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&self, message: &str) {
        error!("{}", message);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Idle,
    Loading,
    Loaded,
    /// Fetch succeeded but nothing matched.
    Empty,
    /// Last request failed; whatever was loaded before stays visible.
    Failed(String),
}

/// A pending page request for one query generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    generation: u64,
    seq: u64,
    params: QueryParameters,
}

impl Ticket {
    /// Parameters to run, page index included.
    pub fn params(&self) -> &QueryParameters {
        &self.params
    }

    pub fn page(&self) -> usize {
        self.params.page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// Response for a superseded or already-settled request; ignored.
    Stale,
}

pub struct Feed<N: Notifier = LogNotifier> {
    params: QueryParameters,
    items: Vec<ContentItem>,
    total_items: usize,
    has_more: bool,
    next_page: usize,
    generation: u64,
    next_seq: u64,
    /// Sequence number of the one request we will accept.
    in_flight: Option<u64>,
    status: FeedStatus,
    notifier: N,
}

impl Default for Feed<LogNotifier> {
    fn default() -> Self {
        Self::new(LogNotifier)
    }
}

impl<N: Notifier> Feed<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            params: QueryParameters::default(),
            items: Vec::new(),
            total_items: 0,
            has_more: false,
            next_page: 0,
            generation: 0,
            next_seq: 0,
            in_flight: None,
            status: FeedStatus::Idle,
            notifier,
        }
    }

    /// Start over with new parameters. Anything still in flight becomes stale.
    pub fn apply(&mut self, params: QueryParameters) -> Ticket {
        self.generation += 1;
        self.params = params.with_page(0);
        self.items.clear();
        self.total_items = 0;
        self.has_more = false;
        self.next_page = 0;
        self.status = FeedStatus::Loading;
        debug!(
            generation = self.generation,
            query = %self.params.to_query_string(),
            "feed query applied"
        );
        self.issue(0)
    }

    /// Next page, if the last one said there is more and nothing is pending.
    pub fn load_more(&mut self) -> Option<Ticket> {
        if self.in_flight.is_some() || !self.has_more {
            return None;
        }
        Some(self.issue(self.next_page))
    }

    /// Re-issue the request that failed last.
    pub fn retry(&mut self) -> Option<Ticket> {
        if self.in_flight.is_some() || !matches!(self.status, FeedStatus::Failed(_)) {
            return None;
        }
        Some(self.issue(self.next_page))
    }

    pub fn complete(
        &mut self,
        ticket: &Ticket,
        result: Result<ContentPage, FetchError>,
    ) -> Completion {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.seq) {
            debug!(
                generation = ticket.generation,
                seq = ticket.seq,
                page = ticket.page(),
                "dropping stale response"
            );
            return Completion::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(page) => {
                self.total_items = page.total_items;
                self.has_more = page.has_more;
                self.next_page = page.page + 1;
                self.items.extend(page.items);
                self.status =
                    if self.items.is_empty() { FeedStatus::Empty } else { FeedStatus::Loaded };
                Completion::Applied
            }
            Err(e) => {
                let message = format!("Failed to fetch content data: {}", e);
                self.notifier.notify_error(&message);
                self.status = FeedStatus::Failed(message);
                Completion::Failed
            }
        }
    }

    fn issue(&mut self, page: usize) -> Ticket {
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        if self.items.is_empty() {
            self.status = FeedStatus::Loading;
        }
        Ticket {
            generation: self.generation,
            seq: self.next_seq,
            params: self.params.with_page(page),
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn params(&self) -> &QueryParameters {
        &self.params
    }
}
