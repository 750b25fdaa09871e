use propnote::config::{CostAssumptions, DutyBracket};
use propnote::error::FinanceError;
use propnote::finance::{compute, monthly_instalment, transfer_duty};
use propnote::model::{PropertyRecord, RawListing};

const LISTING_URL: &str =
    "https://www.property24.com/for-sale/zonnebloem/cape-town/western-cape/10166/114098915";

fn record_with_price(price: i64) -> PropertyRecord {
    PropertyRecord::from_raw(RawListing {
        source_url: LISTING_URL.to_string(),
        listing_id: Some(114098915),
        title: Some("Modern Two Bedroom Apartment in Zonnebloem".to_string()),
        property_type: Some("Apartment".to_string()),
        price: Some(price),
        bedrooms: Some(2),
        bathrooms: Some(2),
        suburb: Some("Zonnebloem".to_string()),
        city: Some("Cape Town".to_string()),
        province: Some("Western Cape".to_string()),
        ..RawListing::default()
    })
    .expect("record must build")
}

fn assumptions() -> CostAssumptions {
    CostAssumptions {
        annual_interest_rate: 0.11,
        term_months: 240,
        deposit_fraction: 0.10,
        ..CostAssumptions::default()
    }
}

#[test]
fn compute_is_deterministic() {
    let record = record_with_price(1_890_000);
    let first = compute(&record, &assumptions()).unwrap();
    let second = compute(&record, &assumptions()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn transfer_duty_matches_bracket_table() {
    let brackets = CostAssumptions::default().transfer_duty_brackets;

    assert_eq!(transfer_duty(1_000_000, &brackets).unwrap(), 0.0);
    let duty = transfer_duty(1_890_000, &brackets).unwrap();
    assert!((duty - 27_186.0).abs() < 1e-6);
}

#[test]
fn transfer_duty_is_continuous_at_bracket_boundaries() {
    let brackets = CostAssumptions::default().transfer_duty_brackets;

    for pair in brackets.windows(2) {
        let upper = pair[0].upper.expect("inner brackets are bounded");
        let via_lower_bracket = transfer_duty(upper, &brackets).unwrap();
        assert!(
            (via_lower_bracket - pair[1].base).abs() < 1e-6,
            "duty discontinuity at {upper}: {via_lower_bracket} vs base {}",
            pair[1].base
        );
    }
}

#[test]
fn zonnebloem_scenario_matches_amortization_formula() {
    let record = record_with_price(1_890_000);
    let summary = compute(&record, &assumptions()).unwrap();

    assert!((summary.transfer_duty - 27_186.0).abs() < 1e-6);
    assert!((summary.total_purchase_cost - (1_890_000.0 + summary.transfer_duty)).abs() < 1e-6);
    assert_eq!(summary.deposit, 189_000.0);
    assert_eq!(summary.principal, 1_701_000.0);

    let monthly_rate: f64 = 0.11 / 12.0;
    let growth = (1.0 + monthly_rate).powf(240.0);
    let expected = 1_701_000.0 * (monthly_rate * growth) / (growth - 1.0);
    assert!((summary.monthly_instalment - expected).abs() < 0.5);

    // no levies or rates on the record, so the instalment is the whole monthly cost
    assert_eq!(summary.total_monthly_cost, summary.monthly_instalment);
}

#[test]
fn levies_and_rates_add_to_monthly_cost() {
    let mut raw = RawListing {
        source_url: LISTING_URL.to_string(),
        title: Some("Listing".to_string()),
        price: Some(1_890_000),
        suburb: Some("Zonnebloem".to_string()),
        ..RawListing::default()
    };
    raw.levies = Some(1_200);
    raw.rates = Some(800);
    let record = PropertyRecord::from_raw(raw).unwrap();

    let summary = compute(&record, &assumptions()).unwrap();
    assert!((summary.total_monthly_cost - (summary.monthly_instalment + 2_000.0)).abs() < 1e-6);
}

#[test]
fn zero_rate_instalment_is_linear() {
    assert_eq!(monthly_instalment(120_000.0, 0.0, 240), 500.0);

    let record = record_with_price(1_890_000);
    let zero_rate = CostAssumptions {
        annual_interest_rate: 0.0,
        ..assumptions()
    };
    let summary = compute(&record, &zero_rate).unwrap();
    assert_eq!(summary.monthly_instalment, summary.principal / 240.0);
}

#[test]
fn instalment_times_term_exceeds_principal_for_positive_rates() {
    let summary = compute(&record_with_price(1_890_000), &assumptions()).unwrap();
    assert!(summary.monthly_instalment * 240.0 > summary.principal);
}

#[test]
fn zero_price_yields_zero_summary() {
    let mut with_fees = assumptions();
    with_fees
        .fees
        .insert("Conveyancing Fees".to_string(), 45_000.0);

    let summary = compute(&record_with_price(0), &with_fees).unwrap();
    assert_eq!(summary.transfer_duty, 0.0);
    assert_eq!(summary.monthly_instalment, 0.0);
    assert_eq!(summary.total_purchase_cost, 0.0);
    assert_eq!(summary.total_monthly_cost, 0.0);
}

#[test]
fn fixed_fees_are_added_to_purchase_cost() {
    let mut with_fees = assumptions();
    with_fees
        .fees
        .insert("Conveyancing Fees".to_string(), 45_000.0);
    with_fees
        .fees
        .insert("Bond Registration".to_string(), 32_000.0);

    let summary = compute(&record_with_price(1_890_000), &with_fees).unwrap();
    let expected = 1_890_000.0 + summary.transfer_duty + 77_000.0;
    assert!((summary.total_purchase_cost - expected).abs() < 1e-6);
}

#[test]
fn negative_price_is_rejected() {
    let err = compute(&record_with_price(-1), &assumptions()).unwrap_err();
    assert!(matches!(err, FinanceError::InvalidInput(_)));
}

#[test]
fn zero_term_is_a_configuration_error() {
    let bad = CostAssumptions {
        term_months: 0,
        ..assumptions()
    };
    let err = compute(&record_with_price(1_890_000), &bad).unwrap_err();
    assert!(matches!(err, FinanceError::Configuration(_)));
}

#[test]
fn negative_rate_is_a_configuration_error() {
    let bad = CostAssumptions {
        annual_interest_rate: -0.01,
        ..assumptions()
    };
    let err = compute(&record_with_price(1_890_000), &bad).unwrap_err();
    assert!(matches!(err, FinanceError::Configuration(_)));
}

#[test]
fn gapped_brackets_are_a_configuration_error() {
    let bad = CostAssumptions {
        transfer_duty_brackets: vec![
            DutyBracket {
                lower: 0,
                upper: Some(1_000_000),
                base: 0.0,
                rate: 0.0,
            },
            DutyBracket {
                lower: 1_500_000,
                upper: None,
                base: 0.0,
                rate: 0.03,
            },
        ],
        ..assumptions()
    };

    assert!(bad.validate().is_err());
    let err = compute(&record_with_price(1_890_000), &bad).unwrap_err();
    assert!(matches!(err, FinanceError::Configuration(_)));
}

#[test]
fn bounded_final_bracket_is_a_configuration_error() {
    let bad = CostAssumptions {
        transfer_duty_brackets: vec![DutyBracket {
            lower: 0,
            upper: Some(1_000_000),
            base: 0.0,
            rate: 0.0,
        }],
        ..assumptions()
    };

    assert!(bad.validate().is_err());
}
