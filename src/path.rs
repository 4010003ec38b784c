//! Dotted field paths over nested JSON documents.
//!
//! A path such as `sections[2].blocks[0].heading` addresses one location in a
//! draft. Reads never allocate; writes walk down the path and replace only the
//! values along it, leaving sibling branches untouched.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::PathError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let syntax = |reason| PathError::Syntax { path: raw.to_string(), reason };

        let mut segments = Vec::new();
        for part in raw.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(i) => (&part[..i], &part[i..]),
                None => (part, ""),
            };
            if key.is_empty() && (rest.is_empty() || segments.is_empty()) {
                return Err(syntax("empty key"));
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| syntax("unterminated index"))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| syntax("index is not a number"))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(syntax("unexpected text after index"));
                }
            }
        }
        Ok(Self { segments })
    }

    pub fn key(key: &str) -> Self {
        Self { segments: vec![Segment::Key(key.to_string())] }
    }

    pub fn segments(&self) -> &[Segment] { &self.segments }

    pub fn is_empty(&self) -> bool { self.segments.is_empty() }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Path of the first `n` segments, used in error locations.
    fn prefix(&self, n: usize) -> String {
        FieldPath { segments: self.segments[..n].to_vec() }.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

pub fn read<'a>(doc: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments.iter().try_fold(doc, |cur, seg| match seg {
        Segment::Key(k) => cur.as_object()?.get(k),
        Segment::Index(i) => cur.as_array()?.get(*i),
    })
}

/// Mutable access to the container addressed by `path`. Every step must exist.
pub fn read_mut<'a>(doc: &'a mut Value, path: &FieldPath) -> Result<&'a mut Value, PathError> {
    let mut cur = doc;
    for (depth, seg) in path.segments.iter().enumerate() {
        cur = step_mut(cur, seg, path, depth)?;
    }
    Ok(cur)
}

/// Write `value` at `path` in place.
///
/// The final key may be new on an existing object; everything above it must
/// already exist. Array indices must be in range.
pub fn set(doc: &mut Value, path: &FieldPath, value: Value) -> Result<(), PathError> {
    let (last, parents) = path.segments.split_last().ok_or(PathError::Empty)?;
    let mut cur = doc;
    for (depth, seg) in parents.iter().enumerate() {
        cur = step_mut(cur, seg, path, depth)?;
    }
    let at = path.prefix(parents.len());
    match last {
        Segment::Key(k) => {
            let obj = cur.as_object_mut().ok_or(PathError::Missing { at, expected: "object" })?;
            obj.insert(k.clone(), value);
        }
        Segment::Index(i) => {
            let arr = cur.as_array_mut().ok_or(PathError::Missing { at: at.clone(), expected: "array" })?;
            let len = arr.len();
            let slot = arr.get_mut(*i).ok_or(PathError::OutOfRange { at, index: *i, len })?;
            *slot = value;
        }
    }
    Ok(())
}

/// Return a copy of `doc` with `value` written at `path`.
pub fn write(doc: &Value, path: &FieldPath, value: Value) -> Result<Value, PathError> {
    let mut next = doc.clone();
    set(&mut next, path, value)?;
    Ok(next)
}

fn step_mut<'a>(cur: &'a mut Value, seg: &Segment, path: &FieldPath, depth: usize) -> Result<&'a mut Value, PathError> {
    let at = path.prefix(depth);
    match seg {
        Segment::Key(k) => {
            let obj = cur.as_object_mut().ok_or(PathError::Missing { at, expected: "object" })?;
            obj.get_mut(k).ok_or(PathError::Missing { at: path.prefix(depth + 1), expected: "field" })
        }
        Segment::Index(i) => {
            let arr = cur.as_array_mut().ok_or(PathError::Missing { at: at.clone(), expected: "array" })?;
            let len = arr.len();
            arr.get_mut(*i).ok_or(PathError::OutOfRange { at, index: *i, len })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "title": "Heart health",
            "image": { "url": "", "alt": "" },
            "sections": [
                { "title": "Intro", "blocks": [{ "heading": "", "bullets": [] }] },
                { "title": "Care", "blocks": [] }
            ]
        })
    }

    #[test]
    fn parses_keys_and_indices() {
        let p = FieldPath::parse("sections[2].blocks[0].heading").unwrap();
        assert_eq!(
            p.segments(),
            &[
                Segment::Key("sections".into()),
                Segment::Index(2),
                Segment::Key("blocks".into()),
                Segment::Index(0),
                Segment::Key("heading".into()),
            ]
        );
        assert_eq!(p.to_string(), "sections[2].blocks[0].heading");
    }

    #[test]
    fn rejects_bad_syntax() {
        assert_eq!(FieldPath::parse(" "), Err(PathError::Empty));
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse("a[1").is_err());
        assert!(FieldPath::parse("a[x]").is_err());
        assert!(FieldPath::parse("a[1]b").is_err());
        assert!(FieldPath::parse("[0]").is_err());
    }

    #[test]
    fn read_after_write_returns_value() {
        let d = doc();
        for (raw, v) in [
            ("image.url", json!("https://cdn/x.png")),
            ("sections[0].blocks[0].heading", json!("Symptoms")),
            ("sections[1].title", json!("Aftercare")),
            ("title", json!("Renamed")),
        ] {
            let p = FieldPath::parse(raw).unwrap();
            let next = write(&d, &p, v.clone()).unwrap();
            assert_eq!(read(&next, &p), Some(&v), "{raw}");
        }
    }

    #[test]
    fn write_leaves_siblings_alone() {
        let d = doc();
        let p = FieldPath::parse("sections[0].title").unwrap();
        let next = write(&d, &p, json!("Overview")).unwrap();
        assert_eq!(next["sections"][1], d["sections"][1]);
        assert_eq!(next["image"], d["image"]);
        assert_eq!(d["sections"][0]["title"], "Intro");
    }

    #[test]
    fn missing_containers_are_errors() {
        let d = doc();
        let p = FieldPath::parse("seo.metaTitle").unwrap();
        assert!(matches!(write(&d, &p, json!("x")), Err(PathError::Missing { .. })));

        let p = FieldPath::parse("sections[5].title").unwrap();
        assert!(matches!(write(&d, &p, json!("x")), Err(PathError::OutOfRange { index: 5, len: 2, .. })));
        assert_eq!(read(&d, &p), None);
    }
}
