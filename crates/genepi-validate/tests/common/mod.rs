#![allow(dead_code)]

use chrono::NaiveDate;
use genepi_model::{Location, LocationVocabulary, Workflow};
use genepi_validate::ImportOptions;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 8, 1).expect("valid date")
}

pub fn options(workflow: Workflow) -> ImportOptions {
    ImportOptions::for_workflow(workflow).with_today(today())
}

pub fn county(id: i64, name: &str) -> Location {
    Location {
        id,
        region: "North America".to_string(),
        country: Some("USA".to_string()),
        division: Some("California".to_string()),
        location: Some(name.to_string()),
    }
}

pub fn vocabulary() -> LocationVocabulary {
    LocationVocabulary::new(vec![
        county(1, "San Mateo County"),
        county(2, "Santa Clara County"),
        county(3, "Alameda County"),
    ])
}

pub fn tsv(rows: &[&[&str]]) -> Vec<u8> {
    rows.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}

pub const UPLOAD_HEADERS: &[&str] = &[
    "Private ID",
    "Collection Date",
    "Collection Location",
    "Sample is Private",
];
