//! Plain-text table rows and detail views.
//!
//! Rendering never fails: anything a record lacks prints as blank, and images
//! without a url are left out entirely.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::records::{Block, ContentRecord, Image, Reference, Section, Seo};
use crate::resource::Resource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: Option<String>,
    pub cells: Vec<String>,
}

pub fn columns(resource: Resource) -> &'static [&'static str] {
    match resource {
        Resource::Articles => &["Title", "Author", "Category", "Published Date", "Status"],
        Resource::Conditions | Resource::Diseases => &["Name", "Category", "Published Date", "Status"],
        Resource::WellBeing => &["Title", "Category", "Published Date", "Status"],
        Resource::Doctors => &["Name", "Specialization", "City", "Status"],
        Resource::Categories => &["Name", "Description", "Status", "Created Date"],
    }
}

/// Table row for `record`. `categories` are `(id, name)` pairs used when a
/// record only carries a category id.
pub fn row(record: &ContentRecord, categories: &[(String, String)]) -> Row {
    let created = date(record.meta().created_at);
    let status = status(record).to_string();
    let cells = match record {
        ContentRecord::Article(a) => {
            vec![a.title.clone(), a.author.name.clone(), category_name(record, categories), created, status]
        }
        ContentRecord::Condition(_) | ContentRecord::Disease(_) | ContentRecord::WellBeing(_) => {
            vec![record.title().to_string(), category_name(record, categories), created, status]
        }
        ContentRecord::Doctor(d) => vec![d.name.clone(), d.specialization.clone(), d.city.clone(), status],
        ContentRecord::Category(c) => vec![c.name.clone(), excerpt(&c.description), status, created],
    };
    Row { id: record.id().map(str::to_string), cells }
}

/// Rows laid out under a header, columns padded to the widest cell.
pub fn render_table(resource: Resource, rows: &[Row]) -> String {
    let header: Vec<String> = columns(resource).iter().map(|c| c.to_string()).collect();
    let id_of = |r: &Row| r.id.clone().unwrap_or_else(|| "-".into());

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    let mut id_width = "ID".len();
    for r in rows {
        id_width = id_width.max(id_of(r).chars().count());
        for (w, cell) in widths.iter_mut().zip(&r.cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut line = |id: &str, cells: &[String]| {
        let mut s = format!("{id:<id_width$}");
        for (cell, &w) in cells.iter().zip(&widths) {
            let _ = write!(s, "  {cell:<w$}");
        }
        out.push_str(s.trim_end());
        out.push('\n');
    };
    line("ID", &header);
    for r in rows {
        line(&id_of(r), &r.cells);
    }
    out
}

/// Full detail view, one `Label: value` per line.
pub fn detail(record: &ContentRecord, categories: &[(String, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", record.title());

    match record {
        ContentRecord::Article(a) => {
            field(&mut out, "Author", &a.author.name);
            if !a.author.specialization.is_empty() || !a.author.qualification.is_empty() {
                field(&mut out, "Author Details", &format!("{}, {}", a.author.specialization, a.author.qualification));
            }
            field(&mut out, "Category", &category_name(record, categories));
            field(&mut out, "Published", &date(a.meta.created_at));
            field(&mut out, "Status", status(record));
            image(&mut out, "Image", record.image());
            for s in &a.sections {
                section(&mut out, s);
            }
            tags(&mut out, &a.tags);
            seo(&mut out, &a.seo);
        }
        ContentRecord::Condition(c) => sectioned(&mut out, record, categories, &c.sections, &c.tags, &c.seo),
        ContentRecord::WellBeing(w) => sectioned(&mut out, record, categories, &w.sections, &w.tags, &w.seo),
        ContentRecord::Disease(d) => {
            field(&mut out, "Category", &category_name(record, categories));
            field(&mut out, "Published", &date(d.meta.created_at));
            field(&mut out, "Status", status(record));
            field(&mut out, "Overview", &d.overview);
            field(&mut out, "Symptoms", &d.symptoms.join(", "));
            field(&mut out, "Causes", &d.causes);
            field(&mut out, "Diagnosis", &d.diagnosis);
            field(&mut out, "Treatment", &d.treatment);
            field(&mut out, "Prevention", &d.prevention);
            tags(&mut out, &d.tags);
            seo(&mut out, &d.seo);
        }
        ContentRecord::Doctor(d) => {
            field(&mut out, "Specialization", &d.specialization);
            field(&mut out, "Qualification", &d.qualification);
            field(&mut out, "Experience", &format!("{} years", d.experience));
            field(&mut out, "Hospital", &d.hospital);
            field(&mut out, "City", &d.city);
            field(&mut out, "License Number", &d.license_number);
            field(&mut out, "Status", status(record));
            field(&mut out, "Phone", &d.contact.phone);
            field(&mut out, "Email", &d.contact.email);
            field(&mut out, "Address", &d.location.address);
            field(&mut out, "Area", &d.location.area);
            field(&mut out, "State", &d.location.state);
            field(&mut out, "Country", &d.location.country);
            field(&mut out, "Pincode", &d.location.pincode);
            let c = &d.location.coordinates;
            field(&mut out, "Coordinates", &format!("Lat: {}, Lng: {}", c.lat, c.lng));
            field(&mut out, "Days", &d.availability.days.join(", "));
            field(&mut out, "Time From", &d.availability.time_from);
            field(&mut out, "Time To", &d.availability.time_to);
            field(&mut out, "Expertise", &d.expertise.join(", "));
            field(&mut out, "Certifications", &d.certifications.join(", "));
            field(&mut out, "Languages", &d.languages.join(", "));
            field(&mut out, "Bio", &d.bio);
            image(&mut out, "Image", record.image());
            tags(&mut out, &d.tags);
            seo(&mut out, &d.seo);
        }
        ContentRecord::Category(c) => {
            field(&mut out, "Description", &c.description);
            field(&mut out, "Status", status(record));
            field(&mut out, "Created", &date(c.meta.created_at));
            field(&mut out, "Updated", &date(c.meta.updated_at));
        }
    }
    out
}

fn sectioned(
    out: &mut String,
    record: &ContentRecord,
    categories: &[(String, String)],
    sections: &[Section],
    tag_list: &[String],
    seo_data: &Seo,
) {
    field(out, "Category", &category_name(record, categories));
    field(out, "Published", &date(record.meta().created_at));
    field(out, "Status", status(record));
    image(out, "Image", record.image());
    for s in sections {
        section(out, s);
    }
    tags(out, tag_list);
    seo(out, seo_data);
}

/// Category display name: the embedded name, else the name the id maps to.
pub fn category_name(record: &ContentRecord, categories: &[(String, String)]) -> String {
    let resolved = match record.category() {
        Some(r @ Reference::Embedded(_)) => r.name().map(str::to_string),
        Some(Reference::Id(id)) => categories.iter().find(|(cid, _)| cid == id).map(|(_, name)| name.clone()),
        None => None,
    };
    resolved.filter(|n| !n.is_empty()).unwrap_or_else(|| "Uncategorized".into())
}

pub fn status(record: &ContentRecord) -> &'static str {
    match (record, record.is_live()) {
        (ContentRecord::Doctor(_) | ContentRecord::Category(_), true) => "Active",
        (ContentRecord::Doctor(_) | ContentRecord::Category(_), false) => "Inactive",
        (_, true) => "Published",
        (_, false) => "Draft",
    }
}

fn excerpt(text: &str) -> String {
    let mut s: String = text.chars().take(50).collect();
    s.push_str("...");
    s
}

fn date(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{label}: {value}");
}

fn image(out: &mut String, label: &str, image: Option<&Image>) {
    let Some(img) = image.filter(|i| i.is_present()) else { return };
    if img.alt.is_empty() {
        field(out, label, &img.url);
    } else {
        field(out, label, &format!("{} ({})", img.url, img.alt));
    }
}

fn section(out: &mut String, s: &Section) {
    let _ = writeln!(out, "\n## {}", s.label());
    if !s.content.is_empty() {
        let _ = writeln!(out, "{}", s.content);
    }
    bullets(out, &s.bullets);
    image(out, "Image", s.image.as_ref());
    for b in &s.blocks {
        block(out, b);
    }
}

fn block(out: &mut String, b: &Block) {
    let _ = writeln!(out, "### {}", b.heading);
    if !b.content.is_empty() {
        let _ = writeln!(out, "{}", b.content);
    }
    bullets(out, &b.bullets);
    image(out, "Image", b.image.as_ref());
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn tags(out: &mut String, tags: &[String]) {
    let joined = if tags.is_empty() { "None".to_string() } else { tags.join(", ") };
    let _ = writeln!(out);
    field(out, "Tags", &joined);
}

fn seo(out: &mut String, seo: &Seo) {
    let or_na = |s: &str| if s.is_empty() { "N/A".to_string() } else { s.to_string() };
    field(out, "SEO Meta Title", &or_na(&seo.meta_title));
    field(out, "SEO Meta Description", &or_na(&seo.meta_description));
    field(out, "SEO Keywords", &or_na(&seo.keywords.join(", ")));
}
