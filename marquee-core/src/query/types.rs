//! Typed filter/pagination values handed to the persistence layer.
//!
//! Handlers convert untyped request parameters into these once, at the
//! boundary; repositories never see raw strings.

/// First page served when the caller does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size served when the caller does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Restrictions applied to a movie listing. Both fields optional; an empty
/// filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilters {
    /// Case-insensitive substring match against the title.
    pub title: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<i32>,
}

impl MovieFilters {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category_id.is_none()
    }
}

/// Page selection, always at least page 1 with limit 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

impl Pagination {
    /// Builds a page selection from raw inputs. Absent or sub-1 values fall
    /// back to the defaults rather than failing, mirroring permissive
    /// query-parameter parsing.
    pub fn clamped(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE),
            limit: limit.filter(|l| *l >= 1).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Rows to skip before the requested page starts. Saturates so
    /// client-supplied magnitudes cannot overflow into a negative offset.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// A complete listing request: filters plus paging and ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub filters: MovieFilters,
    pub pagination: Pagination,
    /// Order by release date descending; `false` falls back to insertion
    /// order (`id` ascending).
    pub order_by_date: bool,
}

impl Default for MovieQuery {
    fn default() -> Self {
        Self {
            filters: MovieFilters::default(),
            pagination: Pagination::default(),
            order_by_date: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_defaults_absent_inputs() {
        let p = Pagination::clamped(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
    }

    #[test]
    fn clamped_rejects_sub_one_values() {
        let p = Pagination::clamped(Some(0), Some(-5));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
    }

    #[test]
    fn clamped_keeps_valid_values() {
        let p = Pagination::clamped(Some(3), Some(25));
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 25);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(Pagination { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(Pagination { page: 2, limit: 10 }.offset(), 10);
        assert_eq!(Pagination { page: 7, limit: 3 }.offset(), 18);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        let p = Pagination::clamped(Some(3), Some(i64::MAX / 2 + 1));
        assert_eq!(p.offset(), i64::MAX);

        let p = Pagination { page: i64::MAX, limit: i64::MAX };
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn query_orders_by_date_by_default() {
        let q = MovieQuery::default();
        assert!(q.order_by_date);
        assert!(q.filters.is_empty());
    }
}
