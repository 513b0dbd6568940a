use serde::{Deserialize, Deserializer};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::Value;

// an unparsable page falls back to the default page instead of failing the request
pub fn deserialize_lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<i64>().ok()))
}

// pair with `#[serde(default)]`: a missing field stays None, an explicit null becomes Some(Null)
pub fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ids come from the frontend either as numbers or as the string keys of the categories map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LenientI64(#[serde(deserialize_with = "deserialize_number_from_string")] pub i64);

impl From<LenientI64> for i64 {
    fn from(value: LenientI64) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_lenient_page")]
        page: Option<i64>,
    }

    #[test]
    fn page_parses_or_falls_back() {
        let parsed: Params = serde_json::from_value(json!({ "page": "3" })).unwrap();
        assert_eq!(parsed.page, Some(3));

        let garbage: Params = serde_json::from_value(json!({ "page": "three" })).unwrap();
        assert_eq!(garbage.page, None);

        let missing: Params = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.page, None);
    }

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_present")]
        field: Option<Value>,
    }

    #[test]
    fn null_field_is_present() {
        let null: Body = serde_json::from_value(json!({ "field": null })).unwrap();
        assert_eq!(null.field, Some(Value::Null));

        let missing: Body = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.field, None);
    }

    #[test]
    fn lenient_i64_accepts_numbers_and_strings() {
        let ids: Vec<LenientI64> = serde_json::from_value(json!([1, "2", 30])).unwrap();
        let ids: Vec<i64> = ids.into_iter().map(i64::from).collect();
        assert_eq!(ids, [1, 2, 30]);
    }

    #[test]
    fn lenient_i64_rejects_null_and_words() {
        assert!(serde_json::from_value::<LenientI64>(json!(null)).is_err());
        assert!(serde_json::from_value::<LenientI64>(json!("one")).is_err());
    }
}
