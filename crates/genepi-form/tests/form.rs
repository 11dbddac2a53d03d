use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use genepi_ingest::ImportFile;
use genepi_form::{FormError, ImportSession, RowForm, RowStatus};
use genepi_model::{
    FieldValue, Location, LocationVocabulary, Metadata, MetadataField, WarningCode,
    WarningMessage, Workflow,
};
use genepi_validate::{FieldError, ImportOptions, ValidationContext};

fn vocabulary() -> LocationVocabulary {
    LocationVocabulary::new(vec![Location {
        id: 1,
        region: "North America".to_string(),
        country: Some("USA".to_string()),
        division: Some("California".to_string()),
        location: Some("San Mateo County".to_string()),
    }])
}

fn options(workflow: Workflow) -> ImportOptions {
    ImportOptions::for_workflow(workflow)
        .with_today(NaiveDate::from_ymd_opt(2022, 8, 1).expect("valid date"))
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn ignore() -> impl FnMut(&str, &Metadata) {
    |_: &str, _: &Metadata| {}
}

#[test]
fn seeding_marks_parsed_rows_touched() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Upload), &vocabulary);
    let mut parsed = BTreeMap::new();
    parsed.insert(
        "S1".to_string(),
        Metadata {
            private_id: FieldValue::Set("S1".to_string()),
            collection_date: FieldValue::Set("2022-07-10".to_string()),
            ..Metadata::default()
        },
    );
    let form = RowForm::seed(&ctx, ids(&["S1", "S2"]), &parsed, &BTreeMap::new());

    let s1 = form.row("S1").expect("S1 row");
    assert!(s1.is_touched(MetadataField::CollectionDate));
    assert_eq!(s1.status, RowStatus::Invalid);
    assert_eq!(
        s1.error(MetadataField::CollectionLocation),
        Some(&FieldError::Required)
    );

    let s2 = form.row("S2").expect("S2 row");
    assert_eq!(s2.status, RowStatus::Pristine);
    assert!(!s2.is_valid);
    assert_eq!(s2.values.private_id, FieldValue::Set("S2".to_string()));
    assert!(!form.is_valid());
}

#[test]
fn seeding_fills_the_configured_identifier_slot() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(
        options(Workflow::Edit).with_identifier(MetadataField::PublicId),
        &vocabulary,
    );
    let mut prior = BTreeMap::new();
    prior.insert(
        "USA/B".to_string(),
        Metadata {
            public_id: FieldValue::Cleared,
            ..Metadata::default()
        },
    );
    let form = RowForm::seed(&ctx, ids(&["USA/A", "USA/B"]), &BTreeMap::new(), &prior);
    let a = form.row("USA/A").expect("USA/A row");
    assert_eq!(a.values.public_id, FieldValue::Set("USA/A".to_string()));
    assert_eq!(a.values.private_id, FieldValue::Unset);
    // Only an unset slot takes the row identifier.
    let b = form.row("USA/B").expect("USA/B row");
    assert_eq!(b.values.public_id, FieldValue::Cleared);
}

#[test]
fn prior_values_survive_unless_overridden() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Upload), &vocabulary);
    let mut prior = BTreeMap::new();
    prior.insert(
        "S1".to_string(),
        Metadata {
            private_id: FieldValue::Set("S1".to_string()),
            collection_date: FieldValue::Set("2022-01-01".to_string()),
            sequencing_date: FieldValue::Set("2022-01-05".to_string()),
            ..Metadata::default()
        },
    );
    let mut parsed = BTreeMap::new();
    parsed.insert(
        "S1".to_string(),
        Metadata {
            collection_date: FieldValue::Set("2022-07-10".to_string()),
            ..Metadata::default()
        },
    );
    let form = RowForm::seed(&ctx, ids(&["S1"]), &parsed, &prior);
    let values = &form.row("S1").expect("S1 row").values;
    assert_eq!(values.collection_date, FieldValue::Set("2022-07-10".to_string()));
    assert_eq!(values.sequencing_date, FieldValue::Set("2022-01-05".to_string()));
}

#[test]
fn typing_revalidates_and_notifies() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Upload), &vocabulary);
    let mut form = RowForm::seed(&ctx, ids(&["S1"]), &BTreeMap::new(), &BTreeMap::new());
    let mut seen = Vec::new();
    let mut handler = |id: &str, metadata: &Metadata| {
        seen.push((id.to_string(), metadata.collection_date.clone()));
    };

    let state = form
        .set_field(&ctx, "S1", MetadataField::CollectionDate, "2022-07", &mut handler)
        .expect("set date");
    assert_eq!(state.status, RowStatus::Invalid);
    assert_eq!(
        state.error(MetadataField::CollectionDate),
        Some(&FieldError::DateFormat)
    );

    form.set_field(&ctx, "S1", MetadataField::CollectionDate, "2022-07-10", &mut handler)
        .expect("set date");
    form.set_field(
        &ctx,
        "S1",
        MetadataField::CollectionLocation,
        "San Mateo County",
        &mut handler,
    )
    .expect("set location");
    let state = form.row("S1").expect("S1 row");
    assert_eq!(state.status, RowStatus::Valid);
    assert!(form.is_valid());
    assert_eq!(seen.len(), 3);
    assert_eq!(
        seen[1],
        ("S1".to_string(), FieldValue::Set("2022-07-10".to_string()))
    );
}

#[test]
fn unresolved_location_input_is_an_error() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Edit), &vocabulary);
    let mut form = RowForm::seed(&ctx, ids(&["S1"]), &BTreeMap::new(), &BTreeMap::new());
    let state = form
        .set_field(
            &ctx,
            "S1",
            MetadataField::CollectionLocation,
            "Atlantis",
            &mut ignore(),
        )
        .expect("set location");
    assert_eq!(
        state.error(MetadataField::CollectionLocation),
        Some(&FieldError::UnresolvedLocation("Atlantis".to_string()))
    );
    let state = form
        .set_field(&ctx, "S1", MetadataField::CollectionLocation, "", &mut ignore())
        .expect("clear location");
    assert!(state.is_valid);
}

#[test]
fn delete_keyword_in_edit_form_clears_value() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Edit), &vocabulary);
    let mut form = RowForm::seed(&ctx, ids(&["S1"]), &BTreeMap::new(), &BTreeMap::new());
    let state = form
        .set_field(&ctx, "S1", MetadataField::NewPrivateId, "DELETE", &mut ignore())
        .expect("set new id");
    assert_eq!(state.values.new_private_id, FieldValue::Cleared);
    assert!(state.is_valid);
}

#[test]
fn corrected_input_keeps_its_warning_until_retyped() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Edit), &vocabulary);
    let mut form = RowForm::seed(&ctx, ids(&["S1", "S2"]), &BTreeMap::new(), &BTreeMap::new());

    let state = form
        .set_field(&ctx, "S1", MetadataField::KeepPrivate, "maybe", &mut ignore())
        .expect("set keep private");
    assert_eq!(state.values.keep_private, FieldValue::Set(false));
    assert_eq!(
        state.warning(MetadataField::KeepPrivate),
        Some(&WarningMessage::new(
            WarningCode::AutoCorrect,
            MetadataField::KeepPrivate,
            "maybe",
            "false",
        ))
    );

    let state = form
        .set_field(&ctx, "S1", MetadataField::PublicId, "hCoV-19/USA/X", &mut ignore())
        .expect("set public id");
    assert_eq!(state.values.public_id, FieldValue::Set("USA/X".to_string()));
    let warning = state.warning(MetadataField::PublicId).expect("public id warning");
    assert_eq!(warning.code, WarningCode::AutoCorrect);
    assert_eq!(warning.original_value, "hCoV-19/USA/X");
    assert_eq!(warning.updated_value, "USA/X");

    form.apply_to_all(&ctx, "S1", MetadataField::KeepPrivate, &mut ignore())
        .expect("apply to all");
    let s2 = form.row("S2").expect("S2 row");
    assert_eq!(s2.values.keep_private, FieldValue::Set(false));
    assert_eq!(
        s2.warning(MetadataField::KeepPrivate).map(|w| w.original_value.as_str()),
        Some("maybe")
    );

    let state = form
        .set_field(&ctx, "S1", MetadataField::KeepPrivate, "yes", &mut ignore())
        .expect("retype keep private");
    assert_eq!(state.values.keep_private, FieldValue::Set(true));
    assert_eq!(state.warning(MetadataField::KeepPrivate), None);
    assert!(state.warning(MetadataField::PublicId).is_some());

    form.apply_to_all(&ctx, "S1", MetadataField::KeepPrivate, &mut ignore())
        .expect("apply to all");
    assert_eq!(
        form.row("S2").expect("S2 row").warning(MetadataField::KeepPrivate),
        None
    );
}

#[test]
fn apply_to_all_copies_and_revalidates_each_row() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Upload), &vocabulary);
    let mut form = RowForm::seed(
        &ctx,
        ids(&["S1", "S2", "S3"]),
        &BTreeMap::new(),
        &BTreeMap::new(),
    );
    form.set_field(&ctx, "S1", MetadataField::CollectionDate, "2022-07-10", &mut ignore())
        .expect("set date");

    let mut notified = BTreeSet::new();
    let updated = form
        .apply_to_all(&ctx, "S1", MetadataField::CollectionDate, &mut |id: &str, _: &Metadata| {
            notified.insert(id.to_string());
        })
        .expect("apply to all");
    assert_eq!(updated, ids(&["S2", "S3"]));
    let expected: BTreeSet<String> = ["S2", "S3"].iter().map(ToString::to_string).collect();
    assert_eq!(notified, expected);

    for id in ["S2", "S3"] {
        let state = form.row(id).expect("row");
        assert_eq!(
            state.values.collection_date,
            FieldValue::Set("2022-07-10".to_string())
        );
        assert!(state.is_touched(MetadataField::CollectionDate));
        // Location is still missing, so each row settles as invalid on its own.
        assert_eq!(state.status, RowStatus::Invalid);
        assert_eq!(state.error(MetadataField::CollectionDate), None);
    }
}

#[test]
fn apply_to_all_rejects_identifiers_and_unknown_rows() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Edit), &vocabulary);
    let mut form = RowForm::seed(&ctx, ids(&["S1", "S2"]), &BTreeMap::new(), &BTreeMap::new());
    assert_eq!(
        form.apply_to_all(&ctx, "S1", MetadataField::NewPrivateId, &mut ignore()),
        Err(FormError::NotBulkEditable(MetadataField::NewPrivateId))
    );
    assert_eq!(
        form.apply_to_all(&ctx, "S9", MetadataField::SequencingDate, &mut ignore()),
        Err(FormError::UnknownRow("S9".to_string()))
    );
    let upload = ValidationContext::new(options(Workflow::Upload), &vocabulary);
    assert!(matches!(
        form.set_field(&upload, "S1", MetadataField::NewPrivateId, "x", &mut ignore()),
        Err(FormError::FieldNotInWorkflow(MetadataField::NewPrivateId))
    ));
}

#[test]
fn session_replaces_outcome_and_keeps_edits() {
    let vocabulary = vocabulary();
    let ctx = ValidationContext::new(options(Workflow::Upload), &vocabulary);
    let known: BTreeSet<String> = ["S1", "S2"].iter().map(ToString::to_string).collect();
    let mut session = ImportSession::new(ctx, known);
    assert_eq!(session.form().len(), 2);

    session
        .set_field("S2", MetadataField::SequencingDate, "2022-07-20", &mut ignore())
        .expect("edit S2");

    let first = ImportFile::new(
        "first.tsv",
        "Private ID\tCollection Date\tCollection Location\tSample is Private\n\
         S1\t2022-07-10\tSan Mateo County\tno\n",
    );
    let outcome = session.select_file(&first);
    assert_eq!(outcome.reconciliation.absent, ids(&["S2"]));

    let second = ImportFile::new(
        "second.csv",
        "Private ID,Collection Date,Collection Location,Sample is Private\n\
         S2,2022-07-11,San Mateo County,yes\n",
    );
    let outcome = session.select_file(&second);
    assert_eq!(outcome.result.filename, "second.csv");
    assert_eq!(outcome.reconciliation.absent, ids(&["S1"]));

    let output = session.output();
    let s1 = &output.metadata["S1"];
    let s2 = &output.metadata["S2"];
    // S1 came from the first file and stays in the form.
    assert_eq!(s1.collection_date, FieldValue::Set("2022-07-10".to_string()));
    assert_eq!(s2.keep_private, FieldValue::Set(true));
    assert_eq!(s2.sequencing_date, FieldValue::Set("2022-07-20".to_string()));
    assert!(output.is_valid);

    session.reset();
    assert!(session.outcome().is_none());
    assert!(!session.output().is_valid);
}
