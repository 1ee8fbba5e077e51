//! Module: aggregate
//! Responsibility: drive paged listings to completion.
//!
//! There is no iteration cap: an unbounded partition or table produces an
//! unbounded result vector. Callers that cannot afford that page manually.

use crate::{
    db::{page::PageResult, repository::TableRepository, store::TableStore},
    error::Error,
    key::is_blank,
    obs::sink::{self, MetricsEvent},
    traits::TableEntity,
};

/// Fetch pages until one comes back without a continuation token.
///
/// Each page is requested with the token returned by the previous one.
/// Pages that come back empty but still carry a token are followed.
pub(crate) fn drain_pages<E>(
    table: &str,
    mut fetch: impl FnMut(Option<&str>) -> Result<PageResult<E>, Error>,
) -> Result<Vec<E>, Error> {
    let mut rows = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0u64;

    loop {
        let (results, next) = fetch(token.as_deref())?.into_parts();
        pages += 1;
        rows.extend(results);

        match next {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    sink::record(MetricsEvent::AggregateFinish {
        table,
        pages,
        rows: rows.len() as u64,
    });
    tracing::debug!(table, pages, rows = rows.len(), "full listing drained");

    Ok(rows)
}

impl<E, S> TableRepository<E, S>
where
    E: TableEntity,
    S: TableStore<E>,
{
    /// Every entity in `partition_key`, across as many pages as it takes.
    pub fn list_all_by_partition_key(&self, partition_key: &str) -> Result<Vec<E>, Error> {
        if is_blank(partition_key) {
            return Err(Error::invalid_argument(
                "partition_key",
                "must not be blank",
            ));
        }

        self.with_metrics(|| {
            drain_pages(self.table(), |token| {
                self.list_by_partition_key(partition_key, None, token)
            })
        })
    }

    /// Every entity in the table, across as many pages as it takes.
    pub fn list_all_entities(&self) -> Result<Vec<E>, Error> {
        self.with_metrics(|| drain_pages(self.table(), |token| self.list_all(None, token)))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::drain_pages;
    use crate::{db::page::PageResult, error::Error};

    #[test]
    fn drain_follows_tokens_through_empty_pages() {
        let mut script = vec![
            PageResult::new(vec![1, 2], Some("a".to_string())),
            PageResult::new(Vec::new(), Some("b".to_string())),
            PageResult::new(vec![3], None),
        ]
        .into_iter();
        let mut seen_tokens = Vec::new();

        let rows = drain_pages("numbers", |token| {
            seen_tokens.push(token.map(str::to_string));
            Ok(script.next().expect("script should not run dry"))
        })
        .expect("drain should succeed");

        assert_eq!(rows, vec![1, 2, 3]);
        assert_eq!(
            seen_tokens,
            vec![None, Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[test]
    fn drain_stops_at_first_error() {
        let mut calls = 0;
        let err = drain_pages::<u32>("numbers", |_| {
            calls += 1;
            if calls == 1 {
                Ok(PageResult::new(vec![1], Some("a".to_string())))
            } else {
                Err(Error::internal("store went away"))
            }
        })
        .expect_err("drain should surface the error");

        assert_eq!(calls, 2);
        assert!(matches!(err, Error::Internal { .. }));
    }
}
