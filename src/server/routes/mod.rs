mod categories;
mod questions;
mod quizzes;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::db::Category;

use super::error::ApiError;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

pub type ApiResponse<T> = Result<T, ApiError>;

/// Categories rendered as an `{"<id>": "<type>"}` object, keeping the query order.
#[derive(Debug)]
pub struct CategoryMap(pub Vec<Category>);

impl CategoryMap {
    pub fn label(&self, id: i64) -> Option<&str> {
        self.0
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.kind.as_str())
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for category in &self.0 {
            map.serialize_entry(&category.id.to_string(), &category.kind)?;
        }
        map.end()
    }
}
