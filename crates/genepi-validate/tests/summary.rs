mod common;

use std::collections::BTreeSet;

use genepi_model::{ErrorCode, WarningCode, Workflow};
use genepi_validate::{ValidationContext, run_import};

use common::{UPLOAD_HEADERS, options, tsv, vocabulary};

fn known(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(ToString::to_string).collect()
}

#[test]
fn summary_snapshot() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Upload), &vocabulary);
    let bytes = tsv(&[UPLOAD_HEADERS, &["S1", "2022-07-10", "San Mateo County", "maybe"]]);
    let outcome = run_import(&ctx, "samples.tsv", &bytes, &known(&["S1", "S2"]));

    insta::assert_json_snapshot!(outcome.summary, @r#"
    {
      "filename": "samples.tsv",
      "imported": 1,
      "errors": [],
      "warnings": [
        {
          "code": "AUTO_CORRECT",
          "headline": "Some values were corrected automatically",
          "count": 1,
          "details": [
            {
              "identifier": "S1",
              "column": "Sample is Private",
              "original": "maybe",
              "corrected": "false"
            }
          ]
        }
      ],
      "unknown_fields": null,
      "extraneous": [],
      "absent": [
        "S2"
      ],
      "completely_unused": false
    }
    "#);
}

#[test]
fn groups_count_samples_and_flag_unknown_columns() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Upload), &vocabulary);
    let bytes = tsv(&[
        &[
            "Private ID",
            "Collection Date",
            "Collection Location",
            "Sample is Private",
            "Notes",
        ],
        &["S1", "2022-07-10", "santa clara", "maybe", "x"],
        &["S1", "2022-07-10", "San Mateo County", "no", ""],
        &["S2", "2022-07-10", "alameda", "no", ""],
    ]);
    let outcome = run_import(&ctx, "samples.tsv", &bytes, &known(&["S1", "S2"]));
    let summary = &outcome.summary;

    assert!(!summary.is_clean());
    assert!(!summary.show_success_notice());
    let duplicates = summary
        .error(ErrorCode::DuplicatePrivateIds)
        .expect("duplicate group");
    assert_eq!(duplicates.values, vec!["S1"]);
    assert_eq!(summary.error_count(), 1);

    let reformatted = summary
        .warning(WarningCode::BadFormatData)
        .expect("bad format group");
    assert_eq!(reformatted.count, 2);
    assert_eq!(reformatted.details.len(), 2);
    assert_eq!(reformatted.details[0].identifier, "S1");
    assert_eq!(reformatted.details[0].column, "Collection Location");

    assert_eq!(summary.unknown_fields, Some(vec!["Notes".to_string()]));
    // Two samples with location fixes, one auto-corrected flag, one unknown column.
    assert_eq!(summary.warning_count(), 4);
}
