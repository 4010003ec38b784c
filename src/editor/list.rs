use serde_json::Value;

use crate::error::PathError;
use crate::path::{self, FieldPath};

/// A string list inside a draft (tags, symptoms, keywords, ...) plus the
/// single-line input that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListField {
    path: FieldPath,
    input: String,
}

impl ListField {
    pub fn new(path: FieldPath) -> Self { Self { path, input: String::new() } }

    pub fn parse(raw: &str) -> Result<Self, PathError> { Ok(Self::new(FieldPath::parse(raw)?)) }

    pub fn path(&self) -> &FieldPath { &self.path }

    pub fn input(&self) -> &str { &self.input }

    pub fn set_input(&mut self, text: impl Into<String>) { self.input = text.into(); }

    pub fn items<'a>(&self, draft: &'a Value) -> Vec<&'a str> {
        path::read(draft, &self.path)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self, draft: &Value) -> usize {
        path::read(draft, &self.path).and_then(Value::as_array).map_or(0, Vec::len)
    }

    /// Append `item` to the end. Blank items are refused and return `false`.
    pub fn append(&self, draft: &mut Value, item: &str) -> Result<bool, PathError> {
        let item = item.trim();
        if item.is_empty() {
            return Ok(false);
        }
        self.array_mut(draft)?.push(Value::String(item.to_string()));
        Ok(true)
    }

    /// The Enter gesture: append the input and clear it, but only on success.
    pub fn commit(&mut self, draft: &mut Value) -> Result<bool, PathError> {
        let appended = self.append(draft, &self.input)?;
        if appended {
            self.input.clear();
        }
        Ok(appended)
    }

    /// Remove the element at `index`; later elements shift down.
    pub fn remove_at(&self, draft: &mut Value, index: usize) -> Result<Value, PathError> {
        let at = self.path.to_string();
        let items = self.array_mut(draft)?;
        if index >= items.len() {
            return Err(PathError::OutOfRange { at, index, len: items.len() });
        }
        Ok(items.remove(index))
    }

    fn array_mut<'a>(&self, draft: &'a mut Value) -> Result<&'a mut Vec<Value>, PathError> {
        path::read_mut(draft, &self.path)?
            .as_array_mut()
            .ok_or_else(|| PathError::Missing { at: self.path.to_string(), expected: "array" })
    }
}

/// Append to a plain list, refusing blank items.
pub fn append_item(items: &mut Vec<String>, item: &str) -> bool {
    let item = item.trim();
    if item.is_empty() {
        return false;
    }
    items.push(item.to_string());
    true
}

pub fn remove_item(items: &mut Vec<String>, index: usize) -> Option<String> {
    (index < items.len()).then(|| items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> Value { json!({ "tags": ["heart", "bp"], "seo": { "keywords": [] } }) }

    #[test]
    fn commit_appends_and_clears_input() {
        let mut d = draft();
        let mut tags = ListField::parse("tags").unwrap();
        tags.set_input("diet");
        assert!(tags.commit(&mut d).unwrap());
        assert_eq!(tags.input(), "");
        assert_eq!(tags.items(&d), vec!["heart", "bp", "diet"]);
    }

    #[test]
    fn blank_commit_is_a_noop_and_keeps_input() {
        let mut d = draft();
        let mut tags = ListField::parse("tags").unwrap();
        tags.set_input("   ");
        assert!(!tags.commit(&mut d).unwrap());
        assert_eq!(tags.input(), "   ");
        assert_eq!(tags.len(&d), 2);
        assert!(!tags.append(&mut d, "").unwrap());
        assert_eq!(tags.len(&d), 2);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut d = draft();
        let kw = ListField::parse("seo.keywords").unwrap();
        assert!(kw.append(&mut d, "bp").unwrap());
        assert!(kw.append(&mut d, "bp").unwrap());
        assert_eq!(kw.items(&d), vec!["bp", "bp"]);
    }

    #[test]
    fn remove_at_keeps_order_dense() {
        let mut d = json!({ "tags": ["a", "b", "c", "d"] });
        let tags = ListField::parse("tags").unwrap();
        assert_eq!(tags.remove_at(&mut d, 1).unwrap(), json!("b"));
        assert_eq!(tags.items(&d), vec!["a", "c", "d"]);
        assert!(matches!(tags.remove_at(&mut d, 3), Err(PathError::OutOfRange { index: 3, len: 3, .. })));
        assert_eq!(tags.len(&d), 3);
    }

    #[test]
    fn missing_list_is_an_error() {
        let mut d = json!({ "tags": "oops" });
        let tags = ListField::parse("tags").unwrap();
        assert!(tags.append(&mut d, "x").is_err());
        let symptoms = ListField::parse("symptoms").unwrap();
        assert!(symptoms.append(&mut d, "x").is_err());
    }

    #[test]
    fn plain_list_helpers() {
        let mut v = vec!["mon".to_string()];
        assert!(append_item(&mut v, "tue"));
        assert!(!append_item(&mut v, " "));
        assert_eq!(remove_item(&mut v, 0).as_deref(), Some("mon"));
        assert_eq!(remove_item(&mut v, 4), None);
        assert_eq!(v, vec!["tue"]);
    }
}
