use std::path::PathBuf;
use std::sync::Arc;

use application_docs::config::AppConfig;
use application_docs::documents::{
    Applicant, ApplicationId, ApplicationRecord, ApplicationReview, ApplicationState, Fund,
    LegalEntity, Product,
};
use application_docs::error::AppError;
use application_docs::telemetry;
use chrono::NaiveDate;
use clap::Args;
use rust_decimal_macros::dec;
use tracing::info;
use uuid::Uuid;

use crate::infra::{build_generator, InMemoryApplicationLookup};

pub(crate) const PENDING_ID: ApplicationId =
    ApplicationId(Uuid::from_u128(0x5c1e_9a40_7b2d_4f3a_8e61_0000_0000_0001));
pub(crate) const ACTIVATED_ID: ApplicationId =
    ApplicationId(Uuid::from_u128(0x5c1e_9a40_7b2d_4f3a_8e61_0000_0000_0002));
pub(crate) const IN_REVIEW_ID: ApplicationId =
    ApplicationId(Uuid::from_u128(0x5c1e_9a40_7b2d_4f3a_8e61_0000_0000_0003));
pub(crate) const DECLINED_ID: ApplicationId =
    ApplicationId(Uuid::from_u128(0x5c1e_9a40_7b2d_4f3a_8e61_0000_0000_0004));

const APPLIED_ON: NaiveDate = demo_date(2025, 8, 4);
const REVIEW_OPENED_ON: NaiveDate = demo_date(2025, 8, 11);

const fn demo_date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("demo seed date is not a calendar date"),
    }
}

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Application identifier (UUID) from the demo store
    #[arg(long)]
    pub(crate) application_id: String,
    /// Template base URI (defaults to DOCS_TEMPLATE_BASE_URI)
    #[arg(long)]
    pub(crate) base_uri: Option<String>,
    /// Where to write the rendered document
    #[arg(long, default_value = "application.html")]
    pub(crate) output: PathBuf,
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let RenderArgs {
        application_id,
        base_uri,
        output,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let lookup = Arc::new(InMemoryApplicationLookup::seeded(demo_records()));
    let generator = build_generator(lookup, config.documents)?;
    let base_uri = base_uri.unwrap_or(config.templates.base_uri);

    match generator.generate_for(&application_id, &base_uri)? {
        Some(document) => {
            std::fs::write(&output, &document)?;
            info!(path = %output.display(), bytes = document.len(), "document written");
            println!("Wrote {} bytes to {}", document.len(), output.display());
        }
        None => println!("No document available for application {application_id}"),
    }

    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let lookup = Arc::new(InMemoryApplicationLookup::seeded(demo_records()));
    let generator = build_generator(lookup, config.documents)?;

    println!("Application document demo");
    println!("Template base URI: {}", config.templates.base_uri);
    for record in demo_records() {
        let outcome = generator.generate(&record.id, &config.templates.base_uri)?;
        let availability = match outcome {
            Some(document) => format!("{} bytes", document.len()),
            None => "no document".to_string(),
        };
        println!(
            "- {} {} ({}): {}",
            record.id,
            record.reference_number,
            record.state.label(),
            availability
        );
    }

    Ok(())
}

pub(crate) fn demo_records() -> Vec<ApplicationRecord> {
    let applicant = Applicant {
        first_name: "Lerato".to_string(),
        surname: "Mokoena".to_string(),
    };
    let applied_on = APPLIED_ON;
    let products = vec![
        Product {
            name: "Retirement Annuity".to_string(),
            funds: vec![
                Fund {
                    name: "Balanced Growth".to_string(),
                    amount: dec!(185000.00),
                    fees: dec!(1387.50),
                },
                Fund {
                    name: "Global Equity Feeder".to_string(),
                    amount: dec!(64250.75),
                    fees: dec!(642.51),
                },
            ],
        },
        Product {
            name: "Tax-Free Savings".to_string(),
            funds: vec![Fund {
                name: "Money Market".to_string(),
                amount: dec!(36000.00),
                fees: dec!(90.00),
            }],
        },
    ];

    let pending = ApplicationRecord {
        id: PENDING_ID,
        reference_number: "APP-2025-0001".to_string(),
        state: ApplicationState::Pending,
        applicant: applicant.clone(),
        applied_on,
        is_legal_entity: false,
        legal_entity: None,
        products: Vec::new(),
        current_review: None,
    };

    let activated = ApplicationRecord {
        id: ACTIVATED_ID,
        reference_number: "APP-2025-0002".to_string(),
        state: ApplicationState::Activated,
        applicant: applicant.clone(),
        applied_on,
        is_legal_entity: true,
        legal_entity: Some(LegalEntity {
            registered_name: "Mokoena Family Trust".to_string(),
            registration_number: "IT4471/2021".to_string(),
            tax_number: Some("9301245567".to_string()),
        }),
        products: products.clone(),
        current_review: None,
    };

    let in_review = ApplicationRecord {
        id: IN_REVIEW_ID,
        reference_number: "APP-2025-0003".to_string(),
        state: ApplicationState::InReview,
        applicant: applicant.clone(),
        applied_on,
        is_legal_entity: false,
        legal_entity: None,
        products,
        current_review: Some(ApplicationReview {
            reason: Some("Proof of address older than three months".to_string()),
            opened_on: REVIEW_OPENED_ON,
            assigned_to: Some("FICA desk".to_string()),
        }),
    };

    let declined = ApplicationRecord {
        id: DECLINED_ID,
        reference_number: "APP-2025-0004".to_string(),
        state: ApplicationState::Declined,
        applicant,
        applied_on,
        is_legal_entity: false,
        legal_entity: None,
        products: Vec::new(),
        current_review: None,
    };

    vec![pending, activated, in_review, declined]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_store_covers_every_state_branch() {
        let records = demo_records();
        let states: HashSet<_> = records.iter().map(|record| record.state).collect();
        assert!(states.contains(&ApplicationState::Pending));
        assert!(states.contains(&ApplicationState::Activated));
        assert!(states.contains(&ApplicationState::InReview));
        assert!(states.contains(&ApplicationState::Declined));

        let ids: HashSet<_> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn demo_records_carry_seeded_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 8, 4).expect("valid date");
        for record in demo_records() {
            assert_eq!(record.applied_on, expected);
            if let Some(review) = record.current_review {
                assert_eq!(
                    review.opened_on,
                    NaiveDate::from_ymd_opt(2025, 8, 11).expect("valid date")
                );
            }
        }
    }
}
