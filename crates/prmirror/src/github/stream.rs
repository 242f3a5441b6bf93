//! Lazy, paginated issue stream.
//!
//! [`IssueStream`] pulls issues one at a time from an [`ActivitySource`],
//! fetching the next page only when the buffered one is exhausted. This is
//! the single suspension point the engine exposes: the checkpointer can
//! interleave "fetch next" with "flush a batch" without ever holding a whole
//! repository's issues in memory.
//!
//! The stream is not seekable; restarting requires a fresh `since` cursor.

use std::collections::VecDeque;

use chrono::NaiveDateTime;

use super::error::GitHubError;
use super::source::{ActivitySource, PAGE_SIZE};
use super::types::IssueRecord;

/// Ordered lazy sequence of issue records for one repository.
pub struct IssueStream<'a, S: ActivitySource> {
    source: &'a S,
    owner: &'a str,
    name: &'a str,
    since: Option<NaiveDateTime>,
    newest: bool,
    next_page: u32,
    buffer: VecDeque<IssueRecord>,
    exhausted: bool,
}

impl<'a, S: ActivitySource> IssueStream<'a, S> {
    /// Open a stream over a repository's issues.
    ///
    /// Issues come back in update order, ascending by default or descending
    /// when `newest` is set (used to prioritize fresh activity over backlog
    /// on a time-boxed run). `since` restricts the listing to issues updated
    /// at or after the cursor.
    pub fn new(
        source: &'a S,
        owner: &'a str,
        name: &'a str,
        since: Option<NaiveDateTime>,
        newest: bool,
    ) -> Self {
        Self {
            source,
            owner,
            name,
            since,
            newest,
            next_page: 1,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Yield the next issue, fetching a page when the buffer runs dry.
    pub async fn next(&mut self) -> Result<Option<IssueRecord>, GitHubError> {
        if self.buffer.is_empty() && !self.exhausted {
            let page = self
                .source
                .list_issues_page(self.owner, self.name, self.since, self.newest, self.next_page)
                .await?;

            if page.len() < PAGE_SIZE {
                self.exhausted = true;
            }
            self.next_page += 1;
            self.buffer.extend(page);
        }

        Ok(self.buffer.pop_front())
    }
}
