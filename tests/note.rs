use chrono::{TimeZone, Utc};
use propnote::config::CostAssumptions;
use propnote::finance::compute;
use propnote::model::{PoiCategory, PoiEntry, PropertyRecord, RawListing};
use propnote::note::render;
use propnote::vault::{note_file_name, resolve, sanitize_segment};
use std::path::Path;

const LISTING_URL: &str =
    "https://www.property24.com/for-sale/zonnebloem/cape-town/western-cape/10166/114098915";

fn base_raw() -> RawListing {
    RawListing {
        source_url: LISTING_URL.to_string(),
        listing_id: Some(114098915),
        title: Some("Modern Two Bedroom Apartment in Zonnebloem".to_string()),
        property_type: Some("Apartment".to_string()),
        price: Some(1_890_000),
        bedrooms: Some(2),
        bathrooms: Some(2),
        suburb: Some("Zonnebloem".to_string()),
        city: Some("Cape Town".to_string()),
        province: Some("Western Cape".to_string()),
        ..RawListing::default()
    }
}

fn assumptions() -> CostAssumptions {
    CostAssumptions {
        annual_interest_rate: 0.11,
        ..CostAssumptions::default()
    }
}

fn render_record(record: &PropertyRecord) -> String {
    let summary = compute(record, &assumptions()).unwrap();
    let generated_at = Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap();
    render(record, &summary, &assumptions(), generated_at)
}

#[test]
fn builder_requires_price() {
    let raw = RawListing {
        price: None,
        ..base_raw()
    };
    let err = PropertyRecord::from_raw(raw).unwrap_err();
    assert_eq!(err.field, "price");
}

#[test]
fn builder_requires_title() {
    let raw = RawListing {
        title: Some("   ".to_string()),
        ..base_raw()
    };
    let err = PropertyRecord::from_raw(raw).unwrap_err();
    assert_eq!(err.field, "title");
}

#[test]
fn builder_requires_a_location_level() {
    let raw = RawListing {
        suburb: None,
        city: None,
        province: None,
        ..base_raw()
    };
    let err = PropertyRecord::from_raw(raw).unwrap_err();
    assert_eq!(err.field, "location");
}

#[test]
fn builder_fills_neutral_defaults() {
    let raw = RawListing {
        property_type: None,
        bedrooms: None,
        bathrooms: None,
        kitchens: None,
        city: None,
        province: None,
        ..base_raw()
    };
    let record = PropertyRecord::from_raw(raw).unwrap();

    assert_eq!(record.property_type, "Property");
    assert_eq!(record.bedrooms, 0);
    assert_eq!(record.bathrooms, 0);
    assert_eq!(record.kitchens, 0);
    assert_eq!(record.city, "Unknown");
    assert_eq!(record.province, "Unknown");
    assert_eq!(record.suburb, "Zonnebloem");
    assert!(record.amenities.is_empty());
    assert!(record.points_of_interest.is_empty());
}

#[test]
fn resolve_is_deterministic_and_idempotent() {
    let record = PropertyRecord::from_raw(base_raw()).unwrap();
    let vault_root = Path::new("/vault");

    let (directory, file_name) = resolve(&record, vault_root);
    assert_eq!(
        directory,
        Path::new("/vault/Properties/Western Cape/Cape Town/Zonnebloem")
    );
    assert_eq!(file_name, "2_apartment_114098915.md");

    assert_eq!(resolve(&record, vault_root), (directory, file_name));
}

#[test]
fn resolve_sanitizes_path_segments() {
    assert_eq!(sanitize_segment("Western Cape"), "Western Cape");
    assert_eq!(sanitize_segment("St. George's Mall"), "St_ George_s Mall");
    assert_eq!(sanitize_segment("???"), "Unknown");
    assert_eq!(sanitize_segment("  Zonnebloem  "), "Zonnebloem");
}

#[test]
fn file_name_slug_lowercases_the_property_type() {
    let raw = RawListing {
        property_type: Some("Apartment / Flat".to_string()),
        ..base_raw()
    };
    let record = PropertyRecord::from_raw(raw).unwrap();
    assert_eq!(note_file_name(&record), "2_apartment_flat_114098915.md");
}

#[test]
fn file_name_drops_a_missing_listing_id() {
    let raw = RawListing {
        listing_id: None,
        ..base_raw()
    };
    let record = PropertyRecord::from_raw(raw).unwrap();
    assert_eq!(note_file_name(&record), "2_apartment.md");
}

#[test]
fn render_is_deterministic() {
    let record = PropertyRecord::from_raw(base_raw()).unwrap();
    assert_eq!(render_record(&record), render_record(&record));
}

#[test]
fn render_keeps_poi_order_and_omits_empty_categories() {
    let raw = RawListing {
        points_of_interest: vec![
            PoiCategory {
                name: "Education".to_string(),
                entries: vec![
                    PoiEntry {
                        name: "Holy Cross RC Primary School".to_string(),
                        distance_km: 0.54,
                    },
                    PoiEntry {
                        name: "Zonnebloem College".to_string(),
                        distance_km: 0.81,
                    },
                ],
            },
            PoiCategory {
                name: "Healthcare".to_string(),
                entries: Vec::new(),
            },
        ],
        ..base_raw()
    };
    let record = PropertyRecord::from_raw(raw).unwrap();
    let text = render_record(&record);

    assert!(text.contains("## Points of Interest"));
    assert!(text.contains("### Education"));
    assert!(!text.contains("### Healthcare"));
    assert!(text.contains("- Holy Cross RC Primary School - 0.54 km"));

    let first = text.find("Holy Cross RC Primary School").unwrap();
    let second = text.find("Zonnebloem College").unwrap();
    assert!(first < second);
}

#[test]
fn render_omits_poi_section_when_no_category_has_entries() {
    let raw = RawListing {
        points_of_interest: vec![PoiCategory {
            name: "Healthcare".to_string(),
            entries: Vec::new(),
        }],
        ..base_raw()
    };
    let record = PropertyRecord::from_raw(raw).unwrap();
    let text = render_record(&record);

    assert!(!text.contains("## Points of Interest"));
}

#[test]
fn render_formats_currency_with_thousands_separators() {
    let record = PropertyRecord::from_raw(base_raw()).unwrap();
    let text = render_record(&record);

    assert!(text.contains("| **Purchase Price** | R1,890,000 |"));
    assert!(text.contains("| **Transfer Duty** | R27,186 |"));
    assert!(text.contains("| **Bond Amount** | R1,701,000 |"));
    assert!(text.contains("| **Interest Rate** | 11.00% |"));
}

#[test]
fn render_omits_monthly_rows_for_absent_amounts() {
    let record = PropertyRecord::from_raw(base_raw()).unwrap();
    let text = render_record(&record);
    assert!(!text.contains("| **Levies** |"));
    assert!(!text.contains("| **Rates & Taxes** |"));
    assert!(text.contains("| **Total Monthly** |"));

    let raw = RawListing {
        levies: Some(1_200),
        rates: Some(800),
        ..base_raw()
    };
    let with_amounts = PropertyRecord::from_raw(raw).unwrap();
    let text = render_record(&with_amounts);
    assert!(text.contains("| **Levies** | R1,200 |"));
    assert!(text.contains("| **Rates & Taxes** | R800 |"));
}

#[test]
fn render_links_the_suburb_and_lists_amenities() {
    let mut raw = base_raw();
    raw.amenities.insert("pet_friendly".to_string());
    raw.amenities.insert("pool".to_string());
    let record = PropertyRecord::from_raw(raw).unwrap();
    let text = render_record(&record);

    assert!(text.contains("| **Suburb** | [[Zonnebloem]] |"));
    assert!(text.contains("- Pet Friendly"));
    assert!(text.contains("- Pool"));
    assert!(text.contains("amenities:"));
    assert!(text.contains("  - pet_friendly"));
}
