// src/api/pagination.rs
//! Cursor pagination over list endpoints.
//!
//! Every list response carries `{results, next_cursor, has_more}`. The
//! walker is iterative, not recursive, so arbitrarily long result sets
//! cannot grow the stack. `has_more == false` terminates the walk even
//! if a provider hands back a non-null cursor alongside it.

use crate::error::AppError;
use futures::Stream;
use serde::Deserialize;
use std::future::Future;

/// One page of a cursor-paginated listing, as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> Paginated<T> {
    /// A single complete page, for tests and in-memory sources.
    pub fn single(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }
}

/// Fetches every page and concatenates the results in page order.
///
/// One-shot traversal: the produced sequence is finite and not
/// restartable. Callers that cannot afford the full materialized list
/// should use [`page_stream`] instead.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Paginated<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;

    loop {
        let page = fetch_page(cursor).await?;

        let has_more = page.has_more;
        cursor = page.next_cursor;
        all_items.extend(page.results);

        if !has_more || cursor.is_none() {
            break;
        }
    }

    Ok(all_items)
}

/// Lazy variant of [`fetch_all`]: yields each page's results as fetched
/// instead of materializing the whole listing.
pub fn page_stream<T, F, Fut>(
    fetch_page: F,
) -> impl Stream<Item = Result<Vec<T>, AppError>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Paginated<T>, AppError>>,
{
    // State: the fetcher plus Some(cursor-to-fetch) or None once done.
    futures::stream::try_unfold(
        (fetch_page, Some(None::<String>)),
        |(mut fetch, state)| async move {
            let Some(cursor) = state else {
                return Ok(None);
            };

            let page = fetch(cursor).await?;
            let next = match (page.has_more, page.next_cursor) {
                (true, Some(c)) => Some(Some(c)),
                _ => None,
            };

            Ok(Some((page.results, (fetch, next))))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    fn three_pages(cursor: Option<String>) -> Result<Paginated<u32>, AppError> {
        match cursor.as_deref() {
            None => Ok(Paginated {
                results: vec![1, 2],
                next_cursor: Some("c1".to_string()),
                has_more: true,
            }),
            Some("c1") => Ok(Paginated {
                results: vec![3],
                next_cursor: Some("c2".to_string()),
                has_more: true,
            }),
            Some("c2") => Ok(Paginated {
                results: vec![4, 5],
                next_cursor: None,
                has_more: false,
            }),
            other => panic!("unexpected cursor {other:?}"),
        }
    }

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let items = fetch_all(|cursor| async move { three_pages(cursor) })
            .await
            .unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn trusts_has_more_over_a_lying_cursor() {
        let items = fetch_all(|cursor| async move {
            assert!(cursor.is_none(), "walker must not follow the cursor");
            Ok(Paginated {
                results: vec![1],
                next_cursor: Some("stale".to_string()),
                has_more: false,
            })
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1]);
    }

    #[tokio::test]
    async fn propagates_page_fetch_errors() {
        let result: Result<Vec<u32>, _> = fetch_all(|_| async {
            Err(AppError::Transport("boom".to_string()))
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn stream_yields_pages_lazily() {
        let stream = page_stream(|cursor| async move { three_pages(cursor) });
        let pages: Vec<Vec<u32>> = stream.try_collect().await.unwrap();
        assert_eq!(pages, vec![vec![1, 2], vec![3], vec![4, 5]]);
    }
}
