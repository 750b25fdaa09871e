use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiEntry {
    pub name: String,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiCategory {
    pub name: String,
    pub entries: Vec<PoiEntry>,
}

impl PoiCategory {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RawListing {
    pub source_url: String,
    pub listing_id: Option<u64>,
    pub title: Option<String>,
    pub property_type: Option<String>,
    pub price: Option<i64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub kitchens: Option<u32>,
    pub parking: Option<String>,
    pub street_address: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub levies: Option<i64>,
    pub rates: Option<i64>,
    pub amenities: BTreeSet<String>,
    pub points_of_interest: Vec<PoiCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub source_url: String,
    pub listing_id: Option<u64>,
    pub title: String,
    pub property_type: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub kitchens: u32,
    pub parking: Option<String>,
    pub street_address: Option<String>,
    pub suburb: String,
    pub city: String,
    pub province: String,
    pub price: i64,
    pub levies: Option<i64>,
    pub rates: Option<i64>,
    pub amenities: BTreeSet<String>,
    pub points_of_interest: Vec<PoiCategory>,
}

impl PropertyRecord {
    pub fn from_raw(raw: RawListing) -> Result<Self, ValidationError> {
        let price = raw.price.ok_or_else(|| ValidationError::missing("price"))?;
        let title = raw
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .ok_or_else(|| ValidationError::missing("title"))?;

        if raw.suburb.is_none() && raw.city.is_none() && raw.province.is_none() {
            return Err(ValidationError::missing("location"));
        }

        Ok(Self {
            source_url: raw.source_url,
            listing_id: raw.listing_id,
            title,
            property_type: raw.property_type.unwrap_or_else(|| "Property".to_string()),
            bedrooms: raw.bedrooms.unwrap_or(0),
            bathrooms: raw.bathrooms.unwrap_or(0),
            kitchens: raw.kitchens.unwrap_or(0),
            parking: raw.parking,
            street_address: raw.street_address,
            suburb: raw.suburb.unwrap_or_else(unknown_level),
            city: raw.city.unwrap_or_else(unknown_level),
            province: raw.province.unwrap_or_else(unknown_level),
            price,
            levies: raw.levies,
            rates: raw.rates,
            amenities: raw.amenities,
            points_of_interest: raw.points_of_interest,
        })
    }
}

fn unknown_level() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub listing_id: Option<u64>,
    pub title: String,
    pub price: i64,
    pub transfer_duty: f64,
    pub total_monthly_cost: f64,
    pub note_path: PathBuf,
    pub written: bool,
    pub note: String,
}
