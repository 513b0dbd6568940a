use serde::Deserialize;

use super::deserializers::deserialize_lenient_page;
use super::error::ApiError;

pub const QUESTIONS_PER_PAGE: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_page")]
    pub page: Option<i64>,
}

/// A validated 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    /// Pages start at 1; anything lower can never hold rows.
    pub fn new(page: Option<i64>) -> Result<Self, ApiError> {
        match page.unwrap_or(1) {
            n if n < 1 => Err(ApiError::NotFound),
            n => Ok(Page(n)),
        }
    }

    pub fn number(&self) -> i64 {
        self.0
    }

    pub fn limit(&self) -> i64 {
        QUESTIONS_PER_PAGE
    }

    pub fn offset(&self) -> i64 {
        (self.0 - 1).saturating_mul(QUESTIONS_PER_PAGE)
    }

    /// The first page is always valid, even when empty. Later pages must hold rows.
    pub fn ensure_in_range(&self, rows_on_page: usize) -> Result<(), ApiError> {
        if self.0 > 1 && rows_on_page == 0 {
            Err(ApiError::NotFound)
        } else {
            Ok(())
        }
    }
}

impl TryFrom<PageQuery> for Page {
    type Error = ApiError;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        Page::new(query.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let page = Page::new(None).unwrap();
        assert_eq!(page.number(), 1);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn offset_follows_page_size() {
        assert_eq!(Page::new(Some(3)).unwrap().offset(), 20);
    }

    #[test]
    fn non_positive_pages_are_not_found() {
        assert!(matches!(Page::new(Some(0)), Err(ApiError::NotFound)));
        assert!(matches!(Page::new(Some(-4)), Err(ApiError::NotFound)));
    }

    #[test]
    fn empty_first_page_is_in_range() {
        let first = Page::new(Some(1)).unwrap();
        assert!(first.ensure_in_range(0).is_ok());

        let second = Page::new(Some(2)).unwrap();
        assert!(second.ensure_in_range(3).is_ok());
        assert!(matches!(second.ensure_in_range(0), Err(ApiError::NotFound)));
    }

    #[test]
    fn huge_page_does_not_overflow() {
        assert_eq!(Page::new(Some(i64::MAX)).unwrap().offset(), i64::MAX);
    }
}
