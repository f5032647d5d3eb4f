//! Offset/limit page walker for a shop's receipts feed.

use crate::client::EtsyClient;
use crate::error::EtsyError;
use crate::types::RawReceipt;

/// Lazily walks the receipts feed one page at a time.
///
/// Each call to [`ReceiptPager::next_page`] issues exactly one request. The
/// sequence ends when the remote returns an empty `results` list; after that
/// the pager keeps returning `Ok(None)` without further requests. A failed
/// page fetch propagates and leaves the pager positioned at the failed page,
/// so a caller that retries the run restarts cleanly.
pub struct ReceiptPager<'a> {
    client: &'a EtsyClient,
    shop_id: i64,
    page_size: u32,
    min_created: Option<i64>,
    offset: u32,
    done: bool,
}

impl<'a> ReceiptPager<'a> {
    /// Creates a pager over `shop_id`'s receipts, bounded by `min_created`
    /// (epoch seconds; `None` fetches without a recency cutoff).
    #[must_use]
    pub const fn new(
        client: &'a EtsyClient,
        shop_id: i64,
        page_size: u32,
        min_created: Option<i64>,
    ) -> Self {
        Self {
            client,
            shop_id,
            page_size,
            min_created,
            offset: 0,
            done: false,
        }
    }

    /// Fetches the next page of receipts.
    ///
    /// Returns `Ok(None)` once the feed is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`EtsyError`] if the page fetch fails; the page is not
    /// consumed and the overall run should abort.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RawReceipt>>, EtsyError> {
        if self.done {
            return Ok(None);
        }

        let page = self
            .client
            .shop_receipts(self.shop_id, self.page_size, self.offset, self.min_created)
            .await?;

        if page.total_fetched == 0 {
            self.done = true;
            return Ok(None);
        }

        self.offset += self.page_size;
        Ok(Some(page.receipts))
    }
}
