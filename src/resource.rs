use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::editor::GroupEditor;
use crate::path::FieldPath;

/// The content collections exposed by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Articles,
    Conditions,
    Diseases,
    WellBeing,
    Doctors,
    Categories,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Articles,
        Resource::Conditions,
        Resource::Diseases,
        Resource::WellBeing,
        Resource::Doctors,
        Resource::Categories,
    ];

    /// Collection segment under `/api/`.
    pub fn endpoint(self) -> &'static str {
        match self {
            Resource::Articles => "articles",
            Resource::Conditions => "conditions",
            Resource::Diseases => "diseases",
            Resource::WellBeing => "well-being",
            Resource::Doctors => "doctors",
            Resource::Categories => "categories",
        }
    }

    /// Singular noun used in user facing messages.
    pub fn singular(self) -> &'static str {
        match self {
            Resource::Articles => "article",
            Resource::Conditions => "condition",
            Resource::Diseases => "disease",
            Resource::WellBeing => "well-being topic",
            Resource::Doctors => "doctor",
            Resource::Categories => "category",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Resource::Articles => "articles",
            Resource::Conditions => "conditions",
            Resource::Diseases => "diseases",
            Resource::WellBeing => "well-being topics",
            Resource::Doctors => "doctors",
            Resource::Categories => "categories",
        }
    }

    /// Fields that must be non-blank before a draft is sent.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Resource::Articles | Resource::WellBeing => &["title"],
            _ => &["name"],
        }
    }

    /// Fields that reference another record by id.
    pub fn reference_fields(self) -> &'static [&'static str] {
        match self {
            Resource::Articles | Resource::Conditions | Resource::Diseases | Resource::WellBeing => &["category"],
            Resource::Doctors | Resource::Categories => &[],
        }
    }

    /// Pages for these resources pick a category from a dropdown.
    pub fn uses_categories(self) -> bool { !self.reference_fields().is_empty() }

    /// Editor for the top-level `sections`, for resources that have them.
    pub fn sections(self) -> Option<GroupEditor> {
        let template = match self {
            Resource::Articles => article_section_template(),
            Resource::Conditions | Resource::WellBeing => section_template(),
            _ => return None,
        };
        Some(GroupEditor::new(FieldPath::key("sections"), template))
    }

    /// Editor for the blocks of section `index` (conditions and well-being only).
    pub fn blocks(self, index: usize) -> Option<GroupEditor> {
        match self {
            Resource::Conditions | Resource::WellBeing => {
                self.sections().map(|s| s.nested(index, "blocks", block_template()))
            }
            _ => None,
        }
    }

    /// Fresh empty draft; every container an editor can reach already exists.
    pub fn template(self) -> Value {
        match self {
            Resource::Articles => json!({
                "title": "",
                "author": { "name": "", "specialization": "", "qualification": "" },
                "category": "",
                "type": "article",
                "sections": [article_section_template()],
                "image": image_template(),
                "seo": seo_template(),
                "tags": [],
                "isPublished": true
            }),
            Resource::Conditions => json!({
                "name": "",
                "category": "",
                "image": image_template(),
                "sections": [section_template()],
                "seo": seo_template(),
                "tags": [],
                "isPublished": true
            }),
            Resource::Diseases => json!({
                "name": "",
                "category": "",
                "overview": "",
                "symptoms": [],
                "causes": "",
                "diagnosis": "",
                "treatment": "",
                "prevention": "",
                "seo": seo_template(),
                "tags": [],
                "isPublished": true
            }),
            Resource::WellBeing => json!({
                "title": "",
                "category": "",
                "image": image_template(),
                "sections": [section_template()],
                "seo": seo_template(),
                "tags": [],
                "isPublished": true
            }),
            Resource::Doctors => json!({
                "name": "",
                "specialization": "",
                "qualification": "",
                "experience": 0,
                "hospital": "",
                "city": "",
                "location": {
                    "address": "",
                    "area": "",
                    "city": "",
                    "state": "",
                    "country": "",
                    "pincode": "",
                    "coordinates": { "lat": 0, "lng": 0 }
                },
                "contact": { "phone": "", "email": "" },
                "availability": { "days": [], "timeFrom": "", "timeTo": "" },
                "expertise": [],
                "certifications": [],
                "licenseNumber": "",
                "languages": [],
                "bio": "",
                "image": { "url": "", "alt": "" },
                "seo": seo_template(),
                "tags": [],
                "isActive": true
            }),
            Resource::Categories => json!({
                "name": "",
                "description": "",
                "isActive": true
            }),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.endpoint()) }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        Ok(match norm.as_str() {
            "articles" | "article" => Resource::Articles,
            "conditions" | "condition" => Resource::Conditions,
            "diseases" | "disease" => Resource::Diseases,
            "well-being" | "wellbeing" | "wellbeings" => Resource::WellBeing,
            "doctors" | "doctor" => Resource::Doctors,
            "categories" | "category" => Resource::Categories,
            other => return Err(format!("unknown resource: {other}")),
        })
    }
}

pub fn image_template() -> Value { json!({ "url": "", "alt": "", "caption": "" }) }

pub fn seo_template() -> Value { json!({ "metaTitle": "", "metaDescription": "", "keywords": [] }) }

/// Block inside a condition or well-being section.
pub fn block_template() -> Value {
    json!({ "heading": "", "content": "", "bullets": [], "image": image_template() })
}

/// Condition/well-being section: a title over a list of blocks.
pub fn section_template() -> Value {
    json!({ "title": "", "blocks": [block_template()] })
}

/// Article section: inline content, no blocks.
pub fn article_section_template() -> Value {
    json!({ "heading": "", "content": "", "bullets": [], "image": { "url": "", "alt": "" } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("well-being".parse::<Resource>().unwrap(), Resource::WellBeing);
        assert_eq!("WellBeing".parse::<Resource>().unwrap(), Resource::WellBeing);
        assert_eq!("category".parse::<Resource>().unwrap(), Resource::Categories);
        assert!("patients".parse::<Resource>().is_err());
        for r in Resource::ALL {
            assert_eq!(r.endpoint().parse::<Resource>().unwrap(), r);
        }
    }

    #[test]
    fn templates_carry_required_and_reference_fields() {
        for r in Resource::ALL {
            let t = r.template();
            assert!(t.get("_id").is_none(), "{r}");
            for f in r.required_fields() {
                assert_eq!(t[*f], "", "{r}.{f}");
            }
            for f in r.reference_fields() {
                assert_eq!(t[*f], "", "{r}.{f}");
            }
        }
    }

    #[test]
    fn section_templates_differ_by_resource() {
        assert!(Resource::Articles.template()["sections"][0].get("blocks").is_none());
        assert_eq!(Resource::Conditions.template()["sections"][0]["blocks"].as_array().map(Vec::len), Some(1));
        assert!(Resource::Diseases.template().get("sections").is_none());
    }

    #[test]
    fn section_editors_follow_shape() {
        assert!(Resource::Doctors.sections().is_none());
        assert!(Resource::Articles.blocks(0).is_none());
        let blocks = Resource::Conditions.blocks(2).unwrap();
        assert_eq!(blocks.path().to_string(), "sections[2].blocks");

        let mut d = Resource::Articles.template();
        let s = Resource::Articles.sections().unwrap();
        s.append_group(&mut d).unwrap();
        assert_eq!(d["sections"][1], article_section_template());
    }
}
