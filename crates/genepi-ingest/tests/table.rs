use std::fs;

use genepi_ingest::{
    Delimiter, IngestError, TableError, decode_text, parse_bytes, parse_table, read_import_file,
};
use genepi_model::{Column, MetadataField, Schema};

const UPLOAD_HEADER: &str =
    "Private ID\tCollection Date\tCollection Location\tSample is Private - Optional";

#[test]
fn parses_tsv_rows_by_known_column() {
    let text = format!("{UPLOAD_HEADER}\nS1\t2022-07-10\tSan Mateo County\tfalse\n");
    let table = parse_table(&text, Delimiter::Tab, &Schema::upload()).expect("parse tsv");
    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.line, 2);
    assert_eq!(row.get(MetadataField::PrivateId), Some("S1"));
    assert_eq!(row.get(MetadataField::CollectionDate), Some("2022-07-10"));
    assert_eq!(row.get(MetadataField::KeepPrivate), Some("false"));
    assert_eq!(row.get(MetadataField::PublicId), None);
    assert!(!table.has_unknown_fields());
}

#[test]
fn skips_comments_blank_rows_and_trailing_columns() {
    let text = "# instructions for filling in the template\n\
                Private ID,Collection Date,Collection Location,Sample is Private,,\n\
                ,,,\n\
                S1,2022-07-10,San Mateo County,no,,\n\
                S2,2022-07-11,Santa Clara County\n";
    let table = parse_table(text, Delimiter::Comma, &Schema::upload()).expect("parse csv");
    assert_eq!(table.raw_headers.len(), 4);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1].get(MetadataField::KeepPrivate), Some(""));
}

#[test]
fn unknown_headers_are_retained() {
    let text = format!("{UPLOAD_HEADER}\tLab Notes\nS1\t2022-07-10\tSan Mateo\tno\tre-run\n");
    let table = parse_table(&text, Delimiter::Tab, &Schema::upload()).expect("parse tsv");
    assert!(table.has_unknown_fields());
    assert_eq!(table.unknown_headers(), vec!["Lab Notes"]);
    let unknown: Vec<_> = table.rows[0].unknown().collect();
    assert_eq!(unknown, vec![("Lab Notes", "re-run")]);
    assert_eq!(
        table.columns.last(),
        Some(&Column::Unknown("Lab Notes".to_string()))
    );
}

#[test]
fn missing_required_headers_fail_table() {
    let text = "Private ID\tCollection Date\nS1\t2022-07-10\n";
    let err = parse_table(text, Delimiter::Tab, &Schema::upload()).unwrap_err();
    assert_eq!(
        err,
        TableError::MissingHeaders(vec![
            MetadataField::CollectionLocation,
            MetadataField::KeepPrivate,
        ])
    );
    assert_eq!(
        err.to_string(),
        "missing required columns: Collection Location, Sample is Private"
    );
}

#[test]
fn empty_and_binary_files_are_structural_failures() {
    assert_eq!(
        parse_bytes("a.tsv", b"# only a comment\n\n", &Schema::upload()),
        Err(TableError::NoHeader)
    );
    assert_eq!(decode_text(&[0xff, 0xfe, 0x00]), Err(TableError::NotText));
    assert_eq!(decode_text(b"a\0b"), Err(TableError::NotText));
    assert_eq!(decode_text("\u{feff}abc".as_bytes()), Ok("abc"));
}

#[test]
fn csv_quoting_preserves_embedded_delimiters() {
    let text = "Private ID,Collection Date,Collection Location,Sample is Private\n\
                S1,2022-07-10,\"San Mateo, California\",yes\n";
    let table = parse_bytes("meta.csv", text.as_bytes(), &Schema::upload()).expect("parse csv");
    assert_eq!(
        table.rows[0].get(MetadataField::CollectionLocation),
        Some("San Mateo, California")
    );
}

#[test]
fn reads_file_name_from_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("metadata.tsv");
    fs::write(&path, UPLOAD_HEADER).expect("write file");
    let file = read_import_file(&path).expect("read file");
    assert_eq!(file.filename, "metadata.tsv");
    assert_eq!(file.bytes, UPLOAD_HEADER.as_bytes());

    let missing = read_import_file(&dir.path().join("absent.tsv")).unwrap_err();
    assert!(matches!(missing, IngestError::Read { .. }));
}

#[test]
fn stray_quote_in_tsv_stays_in_its_cell() {
    let text = format!(
        "{UPLOAD_HEADER}\n\
         S1\t2022-07-10\t\"San Mateo County\tno\n\
         S2\t2022-07-11\tSan Mateo County\tno\n\
         S3\t2022-07-12\tSan Mateo County\tyes\n"
    );
    let table = parse_bytes("meta.tsv", text.as_bytes(), &Schema::upload()).expect("parse tsv");
    let ids: Vec<_> = table
        .rows
        .iter()
        .map(|row| row.get(MetadataField::PrivateId))
        .collect();
    assert_eq!(ids, vec![Some("S1"), Some("S2"), Some("S3")]);
    assert_eq!(
        table.rows[0].get(MetadataField::CollectionLocation),
        Some("\"San Mateo County")
    );
    assert_eq!(table.rows[0].get(MetadataField::KeepPrivate), Some("no"));
}

#[test]
fn csv_value_spanning_lines_is_malformed() {
    let text = "Private ID,Collection Date,Collection Location,Sample is Private\n\
                S1,2022-07-10,\"San Mateo County,no\n\
                S2,2022-07-11,San Mateo County,no\n";
    let err = parse_bytes("meta.csv", text.as_bytes(), &Schema::upload()).unwrap_err();
    assert!(matches!(err, TableError::Malformed { line: 2, .. }));
}

#[test]
fn indented_comments_are_skipped_but_hash_identifiers_are_rows() {
    let text = [
        "  # filled in by the lab",
        UPLOAD_HEADER,
        "S1\t2022-07-10\tSan Mateo County\tno",
        "  # batch notes",
        "#42\t2022-07-11\tSan Mateo County\tyes",
    ]
    .join("\n");
    let table = parse_table(&text, Delimiter::Tab, &Schema::upload()).expect("parse tsv");
    let ids: Vec<_> = table
        .rows
        .iter()
        .map(|row| row.get(MetadataField::PrivateId))
        .collect();
    assert_eq!(ids, vec![Some("S1"), Some("#42")]);
    assert_eq!(table.rows[1].line, 5);
}
