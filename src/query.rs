//! Canonical query-string building for list endpoints.
//!
//! A filter field only reaches the wire when it carries a value: missing
//! fields and empty strings are dropped, numbers are always sent. Paging
//! parameters are appended after the filters in a fixed order.

use std::fmt::Display;

use url::form_urlencoded;

/// Value held by a single filter field.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    Missing,
    Text(String),
    Number(i64),
}

impl FilterValue {
    /// Returns the wire representation, or `None` when the filter is not applied.
    pub fn as_query_value(&self) -> Option<String> {
        match self {
            FilterValue::Missing => None,
            FilterValue::Text(s) if s.is_empty() => None,
            FilterValue::Text(s) => Some(s.clone()),
            FilterValue::Number(n) => Some(n.to_string()),
        }
    }

    pub fn is_applied(&self) -> bool {
        self.as_query_value().is_some()
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        FilterValue::Text(value.clone())
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value)
    }
}

impl<T> From<Option<T>> for FilterValue
where
    T: Into<FilterValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Search criteria owned by a list view.
///
/// Implementors describe their fields in the order they should appear in the
/// query string.
pub trait FilterSet: Clone + Default + Send + Sync + 'static {
    /// Name of the page-size parameter understood by the endpoint.
    const PAGE_SIZE_KEY: &'static str = "page_size";

    fn fields(&self) -> Vec<(&'static str, FilterValue)>;

    /// `true` when no field would be sent.
    fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| !value.is_applied())
    }
}

/// Ordered key/value pairs ready for URL encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the parameters for one page of a filtered list.
    pub fn build<F: FilterSet>(filters: &F, page: usize, page_size: usize) -> Self {
        let mut params = Self::new();
        for (key, value) in filters.fields() {
            params.push_filter(key, value);
        }
        params.push("page", page);
        params.push(F::PAGE_SIZE_KEY, page_size);
        params
    }

    /// Appends a value unconditionally.
    pub fn push(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Appends a filter only when it carries a value.
    pub fn push_filter(&mut self, key: &str, value: impl Into<FilterValue>) -> &mut Self {
        if let Some(value) = value.into().as_query_value() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encodes the pairs as `application/x-www-form-urlencoded`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SampleFilters {
        name: Option<String>,
        shed: Option<i32>,
    }

    impl FilterSet for SampleFilters {
        const PAGE_SIZE_KEY: &'static str = "pageSize";

        fn fields(&self) -> Vec<(&'static str, FilterValue)> {
            vec![
                ("name", self.name.clone().into()),
                ("shed_id", self.shed.into()),
            ]
        }
    }

    #[test]
    fn empty_filters_emit_only_paging() {
        let filters = SampleFilters {
            name: Some(String::new()),
            shed: None,
        };
        let params = QueryParams::build(&filters, 1, 10);

        assert!(filters.is_empty());
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["page", "pageSize"]);
    }

    #[test]
    fn applied_filter_is_emitted_with_its_value() {
        let filters = SampleFilters {
            name: Some("tornillo".to_string()),
            shed: Some(3),
        };
        let params = QueryParams::build(&filters, 2, 10);

        assert_eq!(params.get("name"), Some("tornillo"));
        assert_eq!(params.get("shed_id"), Some("3"));
        assert_eq!(
            params.to_query_string(),
            "name=tornillo&shed_id=3&page=2&pageSize=10"
        );
    }

    #[test]
    fn only_empty_text_is_not_applied() {
        assert_eq!(FilterValue::from("").as_query_value(), None);
        assert_eq!(FilterValue::from("   ").as_query_value(), Some("   ".into()));
        assert_eq!(FilterValue::from(0).as_query_value(), Some("0".into()));
    }

    #[test]
    fn values_are_form_encoded() {
        let mut params = QueryParams::new();
        params.push_filter("name", "llave inglesa & tuerca");

        assert_eq!(params.to_query_string(), "name=llave+inglesa+%26+tuerca");
    }
}
