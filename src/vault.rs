use crate::model::PropertyRecord;
use std::path::{Path, PathBuf};

const PROPERTIES_SEGMENT: &str = "Properties";

pub fn resolve(record: &PropertyRecord, vault_root: &Path) -> (PathBuf, String) {
    let directory = vault_root
        .join(PROPERTIES_SEGMENT)
        .join(sanitize_segment(&record.province))
        .join(sanitize_segment(&record.city))
        .join(sanitize_segment(&record.suburb));

    (directory, note_file_name(record))
}

pub fn sanitize_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_underscore = false;
    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() || c == ' ' {
            out.push(c);
            last_was_underscore = false;
        } else if !last_was_underscore {
            out.push('_');
            last_was_underscore = true;
        }
    }

    let trimmed = out.trim_matches(['_', ' ']).to_string();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed
    }
}

pub fn note_file_name(record: &PropertyRecord) -> String {
    let mut parts = vec![record.bedrooms.to_string(), slugify(&record.property_type)];
    if let Some(listing_id) = record.listing_id {
        parts.push(listing_id.to_string());
    }
    parts.retain(|part| !part.is_empty());

    format!("{}.md", parts.join("_"))
}

fn slugify(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_underscore = true;
    for c in value.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_underscore = false;
        } else if !last_was_underscore {
            out.push('_');
            last_was_underscore = true;
        }
    }

    out.trim_matches('_').to_string()
}
