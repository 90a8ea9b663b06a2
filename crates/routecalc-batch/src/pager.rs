//! Cursor-based record enumeration.

use futures::stream::{self, Stream, TryStreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::BatchError;
use crate::table::{Record, TableHost};

/// Upper bound on pages fetched per table. Guards against hosts that keep
/// handing out cursors.
pub const MAX_PAGES: usize = 10_000;

/// Pages through every record of one table.
///
/// The token is checked before each page fetch; a cancelled run ends the
/// stream with [`BatchError::Cancelled`] instead of truncating it.
pub struct RecordPager<'a, H: TableHost + ?Sized> {
    host: &'a H,
    table_id: &'a str,
    page_size: usize,
    token: &'a CancellationToken,
}

#[derive(Default)]
struct PageState {
    cursor: Option<String>,
    pages: usize,
    exhausted: bool,
}

impl<'a, H: TableHost + ?Sized> RecordPager<'a, H> {
    pub fn new(
        host: &'a H,
        table_id: &'a str,
        page_size: usize,
        token: &'a CancellationToken,
    ) -> Self {
        Self {
            host,
            table_id,
            page_size: page_size.max(1),
            token,
        }
    }

    /// Lazily fetched pages, in host order.
    pub fn pages(self) -> impl Stream<Item = Result<Vec<Record>, BatchError>> + 'a {
        let Self {
            host,
            table_id,
            page_size,
            token,
        } = self;

        stream::try_unfold(PageState::default(), move |mut state| async move {
            if state.exhausted {
                return Ok(None);
            }
            if token.is_cancelled() {
                return Err(BatchError::Cancelled);
            }

            state.pages += 1;
            if state.pages > MAX_PAGES {
                return Err(BatchError::PaginationLimit {
                    table: table_id.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let page = host
                .get_record_page(table_id, page_size, state.cursor.as_deref())
                .await?;
            tracing::debug!(
                table = table_id,
                page = state.pages,
                records = page.records.len(),
                has_more = page.has_more,
                "fetched record page"
            );

            state.cursor = page.next_cursor.filter(|c| !c.is_empty());
            if page.has_more && state.cursor.is_none() {
                tracing::warn!(
                    table = table_id,
                    page = state.pages,
                    "host reported more records without a cursor; treating as exhausted"
                );
            }
            state.exhausted = !page.has_more || state.cursor.is_none();

            Ok(Some((page.records, state)))
        })
    }

    /// Lazily fetched records, flattened across pages.
    pub fn records(self) -> impl Stream<Item = Result<Record, BatchError>> + 'a {
        self.pages()
            .map_ok(|records| stream::iter(records.into_iter().map(Ok::<_, BatchError>)))
            .try_flatten()
    }
}

#[cfg(test)]
#[path = "pager_test.rs"]
mod tests;
