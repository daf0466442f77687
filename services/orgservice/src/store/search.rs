//! Filtering and pagination shared by the list operations.
use super::{StoreError, StoreResult};
use orgplane_object::{ListQuery, TextFilter, list_query_to_query};

/// Reject text filters whose method does not translate to a comparison.
pub(crate) fn ensure_valid_filter(filter: &TextFilter, field: &str) -> StoreResult<()> {
    if filter.comparison().is_valid() {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "invalid text query method for {field}"
        )))
    }
}

/// Apply offset/limit to an already filtered and ordered list.
///
/// Returns the page together with the number of items before paging. A limit
/// of zero means no limit.
pub(crate) fn paginate<T>(items: Vec<T>, query: Option<&ListQuery>) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let (offset, limit, _) = list_query_to_query(query);
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let page = items.into_iter().skip(offset);
    let page = if limit == 0 {
        page.collect()
    } else {
        page.take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect()
    };
    (page, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgplane_object::{TextMethod, TextQueryMethod};

    #[test]
    fn paginate_counts_before_paging() {
        let query = ListQuery {
            offset: 1,
            limit: 2,
            asc: false,
        };
        let (page, total) = paginate(vec![1, 2, 3, 4], Some(&query));
        assert_eq!(page, vec![2, 3]);
        assert_eq!(total, 4);
    }

    #[test]
    fn zero_limit_is_unbounded() {
        let (page, total) = paginate(vec![1, 2, 3], None);
        assert_eq!(page, vec![1, 2, 3]);
        assert_eq!(total, 3);

        let past_end = ListQuery {
            offset: 10,
            limit: 0,
            asc: true,
        };
        let (page, total) = paginate(vec![1, 2, 3], Some(&past_end));
        assert!(page.is_empty());
        assert_eq!(total, 3);
    }

    #[test]
    fn invalid_methods_are_rejected() {
        let valid = TextFilter::new("acme", TextQueryMethod::Contains);
        assert!(ensure_valid_filter(&valid, "name").is_ok());

        let invalid = TextFilter {
            value: "acme".to_string(),
            method: TextMethod::Code(42),
        };
        let err = ensure_valid_filter(&invalid, "name").expect_err("invalid");
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
