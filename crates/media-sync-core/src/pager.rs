use media_sync_models::{DestinationItem, MediaType};
use media_sync_sources::{DestinationLibrary, SourceError};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Lazily walks the destination's unwatched items one page at a time.
///
/// Marking an item watched removes it from the server's unwatched result set
/// and shifts every later item down by one, so callers report each applied
/// mutation through [`UnwatchedPager::note_marked`] and the next page is
/// requested at `yielded - marked`. Item keys are yielded at most once.
pub struct UnwatchedPager<'a, D: ?Sized> {
    destination: &'a D,
    media_type: MediaType,
    page_size: usize,
    buffer: VecDeque<DestinationItem>,
    seen: HashSet<String>,
    yielded: usize,
    marked: usize,
    exhausted: bool,
}

impl<'a, D> UnwatchedPager<'a, D>
where
    D: DestinationLibrary + ?Sized,
{
    pub fn new(destination: &'a D, media_type: MediaType, page_size: usize) -> Self {
        Self {
            destination,
            media_type,
            page_size: page_size.max(1),
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            yielded: 0,
            marked: 0,
            exhausted: false,
        }
    }

    pub async fn next(&mut self) -> Result<Option<DestinationItem>, SourceError> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }

        let item = self.buffer.pop_front();
        if item.is_some() {
            self.yielded += 1;
        }
        Ok(item)
    }

    /// Record that the last yielded item was marked watched on the server.
    pub fn note_marked(&mut self) {
        self.marked += 1;
    }

    async fn fetch_page(&mut self) -> Result<(), SourceError> {
        let offset = self.yielded.saturating_sub(self.marked);
        let page = self
            .destination
            .unwatched_page(self.media_type, offset, self.page_size)
            .await?;
        let fetched = page.items.len();

        let mut fresh = 0;
        for item in page.items {
            if self.seen.insert(item.rating_key.clone()) {
                self.buffer.push_back(item);
                fresh += 1;
            }
        }

        let reached_total = page.total.is_some_and(|total| offset + fetched >= total);
        if fetched < self.page_size || reached_total || fresh == 0 {
            self.exhausted = true;
        }

        debug!(
            "Fetched {} unwatched {} at offset {} ({} new)",
            fetched,
            self.media_type.plural(),
            offset,
            fresh
        );
        Ok(())
    }
}
