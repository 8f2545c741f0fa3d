use crate::api::client::ChatClient;
use crate::api::error::ClientError;
use crate::api::{Conversation, ConversationsFilters, Cursor, Pagination};

/// Walks the conversation listing one page at a time.
///
/// Every request after the first carries the previous page's `endCursor`.
/// Iteration stops after a page that reports `hasNextPage = false` or omits
/// its end cursor.
pub struct ConversationPager<'a> {
    client: &'a ChatClient,
    filter: ConversationsFilters,
    access_token: Option<String>,
    page_size: u32,
    cursor: Option<Cursor>,
    exhausted: bool,
}

impl<'a> ConversationPager<'a> {
    pub fn new(
        client: &'a ChatClient,
        filter: ConversationsFilters,
        page_size: u32,
        access_token: Option<String>,
    ) -> Self {
        Self {
            client,
            filter,
            access_token,
            page_size,
            cursor: None,
            exhausted: false,
        }
    }

    /// Resume from a cursor handed out by an earlier listing.
    pub fn starting_at(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Fetch the next page, or `Ok(None)` once the listing is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Conversation>>, ClientError> {
        if self.exhausted {
            return Ok(None);
        }

        let pagination = Pagination {
            first: self.page_size,
            cursor: self.cursor.clone(),
        };
        let page = self
            .client
            .get_conversations(&pagination, &self.filter, self.access_token.as_deref())
            .await?;

        match page.page_info.end_cursor {
            Some(end_cursor) if page.page_info.has_next_page => {
                self.cursor = Some(end_cursor);
            }
            end_cursor => {
                if end_cursor.is_some() {
                    self.cursor = end_cursor;
                }
                self.exhausted = true;
            }
        }

        Ok(Some(page.data))
    }

    /// Drain every remaining page.
    pub async fn collect_all(mut self) -> Result<Vec<Conversation>, ClientError> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page);
        }
        Ok(all)
    }
}
