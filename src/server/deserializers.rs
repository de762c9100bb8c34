use serde::{Deserialize, Deserializer};

// `?page=abc` behaves like no page at all instead of rejecting the request
pub fn deserialize_lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<i64>().ok()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

// a number typed into a text field comes through as a JSON number: 1930 searches "1930"
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }),
    )
}

// The game frontend keys categories by the JSON object keys, so ids arrive as strings
// ("1") as often as numbers (1).
pub use serde_aux::field_attributes::{
    deserialize_number_from_string as deserialize_id,
    deserialize_option_number_from_string as deserialize_optional_id,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Page {
        #[serde(default, deserialize_with = "deserialize_lenient_page")]
        page: Option<i64>,
    }

    #[derive(Deserialize)]
    struct Ids {
        #[serde(deserialize_with = "deserialize_id")]
        id: i64,
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        category: Option<i64>,
    }

    #[derive(Deserialize)]
    struct Term {
        #[serde(default, deserialize_with = "deserialize_optional_text")]
        term: Option<String>,
    }

    #[test]
    fn text_accepts_numbers() {
        let term: Term = serde_json::from_str(r#"{"term": "who"}"#).unwrap();
        assert_eq!(term.term.as_deref(), Some("who"));
        let term: Term = serde_json::from_str(r#"{"term": 1930}"#).unwrap();
        assert_eq!(term.term.as_deref(), Some("1930"));
        let term: Term = serde_json::from_str(r#"{"term": null}"#).unwrap();
        assert_eq!(term.term, None);
        assert!(serde_json::from_str::<Term>(r#"{"term": [1]}"#).is_err());
    }

    #[test]
    fn page_falls_back_to_none() {
        let page: Page = serde_json::from_str(r#"{"page": "2"}"#).unwrap();
        assert_eq!(page.page, Some(2));
        let page: Page = serde_json::from_str(r#"{"page": "two"}"#).unwrap();
        assert_eq!(page.page, None);
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page.page, None);
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let ids: Ids = serde_json::from_str(r#"{"id": "3", "category": 4}"#).unwrap();
        assert_eq!((ids.id, ids.category), (3, Some(4)));
        let ids: Ids = serde_json::from_str(r#"{"id": 0, "category": "5"}"#).unwrap();
        assert_eq!((ids.id, ids.category), (0, Some(5)));
        let ids: Ids = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(ids.category, None);
        assert!(serde_json::from_str::<Ids>(r#"{"id": "one"}"#).is_err());
    }
}
