use std::future::Future;

use super::conversions::Item;
use crate::errors::ServiceError;

/// One page of a `Query`: its items and the `LastEvaluatedKey`, if any.
pub(super) type Page = (Vec<Item>, Option<Item>);

/// Drive `fetch` from the first page until DynamoDB stops returning a
/// `LastEvaluatedKey`. Each call receives the previous page's key as its
/// `ExclusiveStartKey`. An empty key map also ends the loop.
pub(super) async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<Item>, ServiceError>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<Page, ServiceError>>,
{
    let mut items = Vec::new();
    let mut start_key = None;
    loop {
        let (page, last_key) = fetch(start_key.take()).await?;
        items.extend(page);
        match last_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => break,
        }
    }
    Ok(items)
}
