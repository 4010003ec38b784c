//! Typed views of the records served by the content API.
//!
//! Every field defaults when absent or null so partially populated historical
//! records deserialize instead of failing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::resource::Resource;

/// A referenced record: the API embeds the full object on read but takes a
/// bare identifier on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Id(String),
    Embedded(CategoryRef),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Reference {
    pub fn id(&self) -> &str {
        match self {
            Reference::Id(id) => id,
            Reference::Embedded(r) => &r.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::Embedded(r) if !r.name.is_empty() => Some(&r.name),
            _ => None,
        }
    }
}

/// Collapse a reference field value to its identifier.
///
/// Embedded objects yield their `_id`, strings pass through, anything else
/// (null, missing) becomes the empty string.
pub fn reference_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(o)) => o.get("_id").and_then(Value::as_str).unwrap_or_default().to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub url: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Image {
    /// An image only exists for display once it has a url.
    pub fn is_present(&self) -> bool { !self.url.trim().is_empty() }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seo {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    pub heading: String,
    pub content: String,
    pub bullets: Vec<String>,
    pub image: Option<Image>,
}

/// Either an article section (inline content) or a condition/well-being
/// section (title over blocks). Both shapes share one struct.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    pub heading: String,
    pub title: String,
    pub content: String,
    pub bullets: Vec<String>,
    pub image: Option<Image>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn label(&self) -> &str {
        if self.title.is_empty() { &self.heading } else { &self.title }
    }
}

/// Server bookkeeping shared by every record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub name: String,
    pub specialization: String,
    pub qualification: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    #[serde(flatten)]
    pub meta: Meta,
    pub title: String,
    pub author: Author,
    pub category: Option<Reference>,
    #[serde(rename = "type")]
    pub kind: String,
    pub sections: Vec<Section>,
    pub image: Option<Image>,
    pub seo: Seo,
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    pub category: Option<Reference>,
    pub image: Option<Image>,
    pub sections: Vec<Section>,
    pub seo: Seo,
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Disease {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    pub category: Option<Reference>,
    pub overview: String,
    pub symptoms: Vec<String>,
    pub causes: String,
    pub diagnosis: String,
    pub treatment: String,
    pub prevention: String,
    pub seo: Seo,
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WellBeingTopic {
    #[serde(flatten)]
    pub meta: Meta,
    pub title: String,
    pub category: Option<Reference>,
    pub image: Option<Image>,
    pub sections: Vec<Section>,
    pub seo: Seo,
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Coordinates {
    #[serde(deserialize_with = "lenient")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient")]
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub address: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub days: Vec<String>,
    pub time_from: String,
    pub time_to: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Doctor {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    pub specialization: String,
    pub qualification: String,
    #[serde(deserialize_with = "lenient")]
    pub experience: f64,
    pub hospital: String,
    pub city: String,
    pub location: Location,
    pub contact: Contact,
    pub availability: Availability,
    pub expertise: Vec<String>,
    pub certifications: Vec<String>,
    pub license_number: String,
    pub languages: Vec<String>,
    pub bio: String,
    pub image: Option<Image>,
    pub seo: Seo,
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub is_active: bool,
}

/// One record of any resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentRecord {
    Article(Article),
    Condition(Condition),
    Disease(Disease),
    WellBeing(WellBeingTopic),
    Doctor(Doctor),
    Category(Category),
}

impl ContentRecord {
    pub fn from_value(resource: Resource, mut value: Value) -> Result<Self, serde_json::Error> {
        strip_nulls(&mut value);
        Ok(match resource {
            Resource::Articles => ContentRecord::Article(serde_json::from_value(value)?),
            Resource::Conditions => ContentRecord::Condition(serde_json::from_value(value)?),
            Resource::Diseases => ContentRecord::Disease(serde_json::from_value(value)?),
            Resource::WellBeing => ContentRecord::WellBeing(serde_json::from_value(value)?),
            Resource::Doctors => ContentRecord::Doctor(serde_json::from_value(value)?),
            Resource::Categories => ContentRecord::Category(serde_json::from_value(value)?),
        })
    }

    pub fn resource(&self) -> Resource {
        match self {
            ContentRecord::Article(_) => Resource::Articles,
            ContentRecord::Condition(_) => Resource::Conditions,
            ContentRecord::Disease(_) => Resource::Diseases,
            ContentRecord::WellBeing(_) => Resource::WellBeing,
            ContentRecord::Doctor(_) => Resource::Doctors,
            ContentRecord::Category(_) => Resource::Categories,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            ContentRecord::Article(r) => &r.meta,
            ContentRecord::Condition(r) => &r.meta,
            ContentRecord::Disease(r) => &r.meta,
            ContentRecord::WellBeing(r) => &r.meta,
            ContentRecord::Doctor(r) => &r.meta,
            ContentRecord::Category(r) => &r.meta,
        }
    }

    pub fn id(&self) -> Option<&str> { self.meta().id.as_deref() }

    pub fn title(&self) -> &str {
        match self {
            ContentRecord::Article(r) => &r.title,
            ContentRecord::Condition(r) => &r.name,
            ContentRecord::Disease(r) => &r.name,
            ContentRecord::WellBeing(r) => &r.title,
            ContentRecord::Doctor(r) => &r.name,
            ContentRecord::Category(r) => &r.name,
        }
    }

    /// Published for content, active for doctors and categories.
    pub fn is_live(&self) -> bool {
        match self {
            ContentRecord::Article(r) => r.is_published,
            ContentRecord::Condition(r) => r.is_published,
            ContentRecord::Disease(r) => r.is_published,
            ContentRecord::WellBeing(r) => r.is_published,
            ContentRecord::Doctor(r) => r.is_active,
            ContentRecord::Category(r) => r.is_active,
        }
    }

    pub fn category(&self) -> Option<&Reference> {
        match self {
            ContentRecord::Article(r) => r.category.as_ref(),
            ContentRecord::Condition(r) => r.category.as_ref(),
            ContentRecord::Disease(r) => r.category.as_ref(),
            ContentRecord::WellBeing(r) => r.category.as_ref(),
            ContentRecord::Doctor(_) | ContentRecord::Category(_) => None,
        }
    }

    pub fn image(&self) -> Option<&Image> {
        let image = match self {
            ContentRecord::Article(r) => r.image.as_ref(),
            ContentRecord::Condition(r) => r.image.as_ref(),
            ContentRecord::WellBeing(r) => r.image.as_ref(),
            ContentRecord::Doctor(r) => r.image.as_ref(),
            ContentRecord::Disease(_) | ContentRecord::Category(_) => None,
        };
        image.filter(|i| i.is_present())
    }
}

/// Drop null object entries and null array elements so field defaults apply.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            obj.retain(|_, v| !v.is_null());
            obj.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

/// Deserialize `T`, falling back to its default when the value has the wrong
/// shape (a numeric string for a number, an unparseable date).
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// Identifier of a raw record, if it has one.
pub fn record_id(value: &Value) -> Option<&str> {
    value.get("_id").and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Fill every key the template has but `value` lacks, recursing into objects.
///
/// Arrays are left as they are: a record's sections are its own.
pub fn backfill(value: &mut Value, template: &Value) {
    let (Some(obj), Some(tpl)) = (value.as_object_mut(), template.as_object()) else { return };
    for (k, t) in tpl {
        if matches!(obj.get(k), None | Some(Value::Null)) {
            obj.insert(k.clone(), t.clone());
        } else if let Some(v) = obj.get_mut(k) {
            backfill(v, t);
        }
    }
}
