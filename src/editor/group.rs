use serde_json::Value;

use crate::editor::list::ListField;
use crate::error::PathError;
use crate::path::{self, FieldPath};

/// An array of structured groups inside a draft, e.g. `sections` or
/// `sections[1].blocks`.
///
/// New groups are cloned from `template`, so no two groups share structure.
/// There is no reordering: groups are appended at the end or removed.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEditor {
    path: FieldPath,
    template: Value,
}

impl GroupEditor {
    pub fn new(path: FieldPath, template: Value) -> Self { Self { path, template } }

    pub fn path(&self) -> &FieldPath { &self.path }

    pub fn len(&self, draft: &Value) -> usize {
        path::read(draft, &self.path).and_then(Value::as_array).map_or(0, Vec::len)
    }

    /// Append a fresh group; returns its index.
    pub fn append_group(&self, draft: &mut Value) -> Result<usize, PathError> {
        let groups = self.array_mut(draft)?;
        groups.push(self.template.clone());
        Ok(groups.len() - 1)
    }

    pub fn remove_group(&self, draft: &mut Value, index: usize) -> Result<Value, PathError> {
        let at = self.path.to_string();
        let groups = self.array_mut(draft)?;
        if index >= groups.len() {
            return Err(PathError::OutOfRange { at, index, len: groups.len() });
        }
        Ok(groups.remove(index))
    }

    /// Write `value` at `field` inside group `index`.
    pub fn update_field(&self, draft: &mut Value, index: usize, field: &FieldPath, value: Value) -> Result<(), PathError> {
        path::set(draft, &self.field_path(index, field), value)
    }

    pub fn read_field<'a>(&self, draft: &'a Value, index: usize, field: &FieldPath) -> Option<&'a Value> {
        path::read(draft, &self.field_path(index, field))
    }

    /// Editor for a group array one level down, e.g. the blocks of section `index`.
    pub fn nested(&self, index: usize, key: &str, template: Value) -> GroupEditor {
        GroupEditor::new(self.path.clone().index(index).join(&FieldPath::key(key)), template)
    }

    /// String list inside group `index`, e.g. a block's bullets.
    pub fn list_field(&self, index: usize, key: &str) -> ListField {
        ListField::new(self.path.clone().index(index).join(&FieldPath::key(key)))
    }

    fn field_path(&self, index: usize, field: &FieldPath) -> FieldPath {
        self.path.clone().index(index).join(field)
    }

    fn array_mut<'a>(&self, draft: &'a mut Value) -> Result<&'a mut Vec<Value>, PathError> {
        path::read_mut(draft, &self.path)?
            .as_array_mut()
            .ok_or_else(|| PathError::Missing { at: self.path.to_string(), expected: "array" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{block_template, section_template, Resource};
    use serde_json::json;

    fn sections() -> GroupEditor { GroupEditor::new(FieldPath::key("sections"), section_template()) }

    #[test]
    fn append_clones_template() {
        let mut d = Resource::Conditions.template();
        let s = sections();
        assert_eq!(s.append_group(&mut d).unwrap(), 1);
        s.update_field(&mut d, 0, &FieldPath::parse("title").unwrap(), json!("Causes")).unwrap();
        assert_eq!(d["sections"][0]["title"], "Causes");
        assert_eq!(d["sections"][1]["title"], "");
    }

    #[test]
    fn remove_group_keeps_indices_dense() {
        let mut d = json!({ "sections": [{ "title": "a" }, { "title": "b" }, { "title": "c" }] });
        let s = sections();
        let removed = s.remove_group(&mut d, 0).unwrap();
        assert_eq!(removed["title"], "a");
        assert_eq!(s.len(&d), 2);
        assert_eq!(d["sections"], json!([{ "title": "b" }, { "title": "c" }]));
        assert!(s.remove_group(&mut d, 2).is_err());
    }

    #[test]
    fn nested_blocks() {
        let mut d = Resource::WellBeing.template();
        let s = sections();
        let blocks = s.nested(0, "blocks", block_template());
        assert_eq!(blocks.path().to_string(), "sections[0].blocks");
        assert_eq!(blocks.append_group(&mut d).unwrap(), 1);

        let img = FieldPath::parse("image.url").unwrap();
        blocks.update_field(&mut d, 1, &img, json!("https://cdn/sleep.png")).unwrap();
        assert_eq!(blocks.read_field(&d, 1, &img), Some(&json!("https://cdn/sleep.png")));
        assert_eq!(d["sections"][0]["blocks"][0]["image"]["url"], "");

        let bullets = blocks.list_field(1, "bullets");
        assert!(bullets.append(&mut d, "8 hours").unwrap());
        assert_eq!(d["sections"][0]["blocks"][1]["bullets"], json!(["8 hours"]));

        blocks.remove_group(&mut d, 0).unwrap();
        assert_eq!(blocks.len(&d), 1);
        assert_eq!(d["sections"][0]["blocks"][0]["image"]["url"], "https://cdn/sleep.png");
    }

    #[test]
    fn update_out_of_range_group_fails() {
        let mut d = Resource::Articles.template();
        let s = GroupEditor::new(FieldPath::key("sections"), json!({}));
        let err = s.update_field(&mut d, 3, &FieldPath::key("heading"), json!("x")).unwrap_err();
        assert!(matches!(err, PathError::OutOfRange { index: 3, len: 1, .. }));
    }
}
