use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseParseError {
    #[error("no JSON object found in model response")]
    NoObject,

    #[error("embedded JSON is malformed: {0}")]
    Malformed(String),

    #[error("embedded JSON is not an object")]
    NotAnObject,
}

/// Parses the span from the first `{` to the last `}` of `text` as a JSON object.
///
/// Prose around the object, including markdown fences, is ignored.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ResponseParseError> {
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(ResponseParseError::NoObject),
    };

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ResponseParseError::NotAnObject),
        Err(e) => Err(ResponseParseError::Malformed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_surrounded_by_prose() {
        let text = r#"blah {"product_name":"Chair","description":"Wood","category":"Furniture","condition":"Used"} trailing"#;

        let object = extract_json_object(text).unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["product_name"], "Chair");
        assert_eq!(object["condition"], "Used");
    }

    #[test]
    fn test_extracts_from_code_fence() {
        let text = "Here you go:\n```json\n{\n  \"category\": \"Toys\",\n  \"nested\": {\"a\": 1}\n}\n```";

        let object = extract_json_object(text).unwrap();

        assert_eq!(object["category"], "Toys");
        assert_eq!(object["nested"]["a"], 1);
    }

    #[test]
    fn test_no_braces() {
        assert_eq!(
            extract_json_object("I cannot identify this product."),
            Err(ResponseParseError::NoObject)
        );
        assert_eq!(extract_json_object(""), Err(ResponseParseError::NoObject));
    }

    #[test]
    fn test_closing_brace_before_opening_brace() {
        assert_eq!(extract_json_object("} nothing {"), Err(ResponseParseError::NoObject));
    }

    #[test]
    fn test_two_objects_in_prose_are_malformed() {
        let result = extract_json_object(r#"first {"a": 1} and then {"b": 2}"#);
        assert!(matches!(result, Err(ResponseParseError::Malformed(_))));
    }

    #[test]
    fn test_non_ascii_content() {
        let object = extract_json_object("結果: {\"商品名\": \"椅子\"} 以上").unwrap();
        assert_eq!(object["商品名"], "椅子");
    }
}
