use crate::error::ParseError;
use crate::fetch::FetchedPage;
use crate::model::{PoiCategory, PoiEntry, RawListing};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, warn};
use url::Url;

const AMENITY_KEYWORDS: &[(&str, &[&str])] = &[
    ("pool", &["pool", "swimming"]),
    ("security", &["security", "24-hour", "access control"]),
    ("gym", &["gym", "fitness"]),
    ("garden", &["garden", "landscaped"]),
    ("balcony", &["balcony", "terrace", "patio"]),
    ("view", &["mountain view", "sea view", "city view"]),
    ("air_conditioning", &["air conditioning", "aircon"]),
    ("elevator", &["elevator", "lift"]),
    ("laundry", &["laundry"]),
    ("fireplace", &["fireplace", "braai"]),
    ("pet_friendly", &["pet friendly", "pets allowed"]),
];

pub fn parse_listing_page(page: &FetchedPage) -> Result<RawListing, ParseError> {
    let html_text = String::from_utf8_lossy(&page.body).to_string();
    let doc = Html::parse_document(&html_text);
    let page_text = collect_page_text(&doc);
    let json_ld = json_ld_listing(&doc);
    let url_parts = UrlParts::from_listing_url(&page.source_url);

    let mut raw = RawListing {
        source_url: page.source_url.clone(),
        ..RawListing::default()
    };

    raw.listing_id = url_parts.listing_id.or_else(|| {
        overview_value(&doc, "Listing Number").and_then(|value| value.trim().parse().ok())
    });

    raw.title = json_string(json_ld.as_ref(), "/name").or_else(|| first_text(&doc, "h1"));

    raw.property_type = json_string(json_ld.as_ref(), "/about/@type")
        .or_else(|| overview_value(&doc, "Type of Property"))
        .or_else(|| detect_property_type(&page_text));

    raw.price = extract_price(&doc, json_ld.as_ref(), &page_text)?;

    let bedrooms_re =
        Regex::new(r"(?i)(\d+)\s*(?:bed|bedroom)").expect("bedrooms regex must be valid");
    let bathrooms_re =
        Regex::new(r"(?i)(\d+)\s*(?:bath|bathroom)").expect("bathrooms regex must be valid");
    let kitchens_re = Regex::new(r"(?i)(\d+)\s*kitchen").expect("kitchens regex must be valid");

    raw.bedrooms = count_field(
        &doc,
        json_ld.as_ref(),
        &page_text,
        "bedrooms",
        "/about/numberOfBedrooms",
        "Bedrooms",
        &bedrooms_re,
    );
    raw.bathrooms = count_field(
        &doc,
        json_ld.as_ref(),
        &page_text,
        "bathrooms",
        "/about/numberOfBathroomsTotal",
        "Bathrooms",
        &bathrooms_re,
    );
    raw.kitchens = count_field(
        &doc,
        json_ld.as_ref(),
        &page_text,
        "kitchens",
        "/about/numberOfKitchens",
        "Kitchens",
        &kitchens_re,
    );

    let parking_re = Regex::new(r"(?i)\b(\d+\s+(?:parking(?:\s+bays?)?|garages?|carports?))\b")
        .expect("parking regex must be valid");
    raw.parking = overview_value(&doc, "Parking").or_else(|| {
        parking_re
            .captures(&page_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    });

    raw.street_address = json_string(json_ld.as_ref(), "/about/address/streetAddress")
        .or_else(|| first_text(&doc, "div.p24_address"));

    raw.suburb = url_parts
        .suburb
        .or_else(|| json_string(json_ld.as_ref(), "/about/address/addressLocality"));
    raw.city = url_parts.city;
    raw.province = url_parts
        .province
        .or_else(|| json_string(json_ld.as_ref(), "/about/address/addressRegion"));

    let levies_re =
        Regex::new(r"(?i)levies\s*:?\s*R?\s*([\d\s,]+)").expect("levies regex must be valid");
    let rates_re = Regex::new(r"(?i)rates\s*(?:and|&)?\s*taxes\s*:?\s*R?\s*([\d\s,]+)")
        .expect("rates regex must be valid");
    raw.levies = amount_field(&doc, &page_text, "levies", "Levies", &levies_re);
    raw.rates = amount_field(&doc, &page_text, "rates", "Rates and Taxes", &rates_re);

    raw.amenities = extract_amenities(&doc, json_ld.as_ref(), &page_text);
    raw.points_of_interest = extract_points_of_interest(&doc);

    Ok(raw)
}

fn extract_price(
    doc: &Html,
    json_ld: Option<&Value>,
    page_text: &str,
) -> Result<Option<i64>, ParseError> {
    if let Some(value) = json_ld.and_then(|v| v.pointer("/offers/priceSpecification/price")) {
        match value {
            Value::Number(number) => {
                if let Some(price) = number.as_i64() {
                    return Ok(Some(price));
                }
            }
            Value::String(text) if !text.trim().is_empty() => {
                return parse_amount("price", text).map(Some);
            }
            _ => {}
        }
    }

    if let Some(text) = first_text(doc, "div.p24_price") {
        return parse_amount("price", &text).map(Some);
    }

    // Site convention: listing prices are six digits or more; shorter matches
    // are levies, rates or floor sizes.
    let price_re = Regex::new(r"R\s*([\d\s,]+)").expect("price regex must be valid");
    for caps in price_re.captures_iter(page_text) {
        if let Some(m) = caps.get(1) {
            let cleaned: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
            if cleaned.len() >= 6
                && let Ok(price) = cleaned.parse::<i64>()
            {
                return Ok(Some(price));
            }
        }
    }

    Ok(None)
}

fn count_field(
    doc: &Html,
    json_ld: Option<&Value>,
    page_text: &str,
    field: &'static str,
    json_pointer: &str,
    overview_label: &str,
    fallback: &Regex,
) -> Option<u32> {
    let raw_value = json_ld
        .and_then(|v| v.pointer(json_pointer))
        .and_then(json_value_to_string)
        .or_else(|| overview_value(doc, overview_label))
        .or_else(|| {
            fallback
                .captures(page_text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })?;

    match parse_count(field, &raw_value) {
        Ok(count) => Some(count),
        Err(err) => {
            warn!(field, error = %err, "dropping unparseable count field");
            None
        }
    }
}

fn amount_field(
    doc: &Html,
    page_text: &str,
    field: &'static str,
    overview_label: &str,
    fallback: &Regex,
) -> Option<i64> {
    let raw_value = overview_value(doc, overview_label).or_else(|| {
        fallback
            .captures(page_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })?;

    match parse_amount(field, &raw_value) {
        Ok(amount) => Some(amount),
        Err(err) => {
            warn!(field, error = %err, "dropping unparseable amount field");
            None
        }
    }
}

fn extract_amenities(doc: &Html, json_ld: Option<&Value>, page_text: &str) -> BTreeSet<String> {
    let mut amenities = BTreeSet::new();

    let items = selector("div.p24_keyFeatures li");
    for item in doc.select(&items) {
        let text = element_text(item);
        if !text.is_empty() {
            amenities.insert(tag_from(&text));
        }
    }

    let lowered = page_text.to_lowercase();
    for (tag, keywords) in AMENITY_KEYWORDS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            amenities.insert((*tag).to_string());
        }
    }

    if json_ld
        .and_then(|v| v.pointer("/about/petsAllowed"))
        .is_some_and(is_truthy)
    {
        amenities.insert("pet_friendly".to_string());
    }

    amenities
}

fn extract_points_of_interest(doc: &Html) -> Vec<PoiCategory> {
    let category_selector = selector("div.p24_poiCategory");
    let name_selector = selector("h5");
    let entry_selector = selector("li");
    let poi_name_selector = selector("span.p24_poiName");
    let poi_distance_selector = selector("span.p24_poiDistance");

    let mut categories = Vec::new();
    for block in doc.select(&category_selector) {
        let Some(name) = block
            .select(&name_selector)
            .next()
            .map(element_text)
            .filter(|name| !name.is_empty())
        else {
            continue;
        };

        let mut entries = Vec::new();
        for item in block.select(&entry_selector) {
            let Some(entry_name) = item
                .select(&poi_name_selector)
                .next()
                .map(element_text)
                .filter(|text| !text.is_empty())
            else {
                continue;
            };
            let Some(distance_raw) = item.select(&poi_distance_selector).next().map(element_text)
            else {
                continue;
            };

            match parse_distance_km("distance", &distance_raw) {
                Ok(distance_km) => entries.push(PoiEntry {
                    name: entry_name,
                    distance_km,
                }),
                Err(err) => {
                    warn!(category = %name, error = %err, "dropping point of interest with unparseable distance");
                }
            }
        }

        categories.push(PoiCategory { name, entries });
    }

    categories
}

fn detect_property_type(page_text: &str) -> Option<String> {
    let re = Regex::new(r"(?i)\b(apartment|penthouse|townhouse|house|flat|duplex|studio|vacant land)\b")
        .expect("property type regex must be valid");
    re.captures(page_text)
        .and_then(|caps| caps.get(1))
        .map(|m| title_case_words(m.as_str()))
}

struct UrlParts {
    suburb: Option<String>,
    city: Option<String>,
    province: Option<String>,
    listing_id: Option<u64>,
}

impl UrlParts {
    fn from_listing_url(source_url: &str) -> Self {
        let mut parts = Self {
            suburb: None,
            city: None,
            province: None,
            listing_id: None,
        };

        let Ok(url) = Url::parse(source_url) else {
            debug!(url = source_url, "listing url is not parseable; skipping url strategies");
            return parts;
        };
        let Some(segments) = url.path_segments() else {
            return parts;
        };
        let segments: Vec<&str> = segments.filter(|segment| !segment.is_empty()).collect();

        if let Some(idx) = segments.iter().position(|segment| *segment == "for-sale") {
            parts.suburb = segments.get(idx + 1).map(|s| title_case_kebab(s));
            parts.city = segments.get(idx + 2).map(|s| title_case_kebab(s));
            parts.province = segments.get(idx + 3).map(|s| title_case_kebab(s));
        }

        parts.listing_id = segments
            .iter()
            .rev()
            .find_map(|segment| segment.parse::<u64>().ok());

        parts
    }
}

pub fn parse_amount(field: &'static str, raw: &str) -> Result<i64, ParseError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['R', 'r'])
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::new(field, raw));
    }
    cleaned.parse().map_err(|_| ParseError::new(field, raw))
}

pub fn parse_count(field: &'static str, raw: &str) -> Result<u32, ParseError> {
    let cleaned = raw.trim();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::new(field, raw));
    }
    cleaned.parse().map_err(|_| ParseError::new(field, raw))
}

pub fn parse_distance_km(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    let lowered = raw.trim().to_lowercase();
    let cleaned = lowered.strip_suffix("km").unwrap_or(&lowered).trim();

    match cleaned.parse::<f64>() {
        Ok(distance) if distance.is_finite() && distance >= 0.0 => Ok(distance),
        _ => Err(ParseError::new(field, raw)),
    }
}

fn json_ld_listing(doc: &Html) -> Option<Value> {
    let scripts = selector(r#"script[type="application/ld+json"]"#);
    for script in doc.select(&scripts) {
        let body = script.text().collect::<String>();
        let Ok(payload) = serde_json::from_str::<Value>(&body) else {
            debug!("skipping unparseable json-ld block");
            continue;
        };
        if let Some(listing) = find_real_estate_listing(&payload) {
            return Some(listing.clone());
        }
    }
    None
}

fn find_real_estate_listing(payload: &Value) -> Option<&Value> {
    if is_real_estate_listing(payload) {
        return Some(payload);
    }
    if let Some(graph) = payload.get("@graph").and_then(Value::as_array) {
        return graph.iter().find(|item| is_real_estate_listing(item));
    }
    if let Some(items) = payload.as_array() {
        return items.iter().find(|item| is_real_estate_listing(item));
    }
    None
}

fn is_real_estate_listing(value: &Value) -> bool {
    value.get("@type").and_then(Value::as_str) == Some("RealEstateListing")
}

fn json_string(value: Option<&Value>, pointer: &str) -> Option<String> {
    value
        .and_then(|v| v.pointer(pointer))
        .and_then(json_value_to_string)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn json_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(v) => Some(v.to_string()),
        other => Some(other.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(v) => *v,
        Value::String(s) => s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes"),
        _ => false,
    }
}

fn overview_value(doc: &Html, label: &str) -> Option<String> {
    let row_selector = selector("div.p24_propertyOverviewRow");
    let key_selector = selector("span.p24_propertyOverviewKey");
    let value_selector = selector("span.p24_info");

    for row in doc.select(&row_selector) {
        let Some(key) = row.select(&key_selector).next() else {
            continue;
        };
        if !element_text(key).eq_ignore_ascii_case(label) {
            continue;
        }
        if let Some(value) = row.select(&value_selector).next() {
            let text = element_text(value);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    None
}

fn first_text(doc: &Html, expression: &'static str) -> Option<String> {
    let parsed = selector(expression);
    doc.select(&parsed)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_page_text(doc: &Html) -> String {
    doc.root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn selector(expression: &'static str) -> Selector {
    Selector::parse(expression).expect("selector must be valid")
}

fn tag_from(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn title_case_kebab(segment: &str) -> String {
    segment
        .split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_words(value: &str) -> String {
    value
        .split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
        }
        None => String::new(),
    }
}
