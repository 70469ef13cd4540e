// ── Tabular encoder ──
//
// Records -> CSV for the vendor's bulk "paste file" upload, plus the
// header-derived column mapping the upload needs. The column set is the
// sorted union of record keys so identical data always yields identical
// headers. Newlines inside values are stripped, not escaped.

use std::collections::BTreeSet;

use crate::auth::AccountTier;
use crate::bean::fields;
use crate::error::{OperationError, OperationResult};
use crate::wire::{FieldValue, Mapping};

/// Column-mapping fields derived from a table header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMapping {
    /// Vendor field descriptors (`emailCol`, `field1Col`, `field1Name`, ...).
    pub fields: Mapping,
    /// Custom columns beyond the tier's capacity, in header order.
    pub dropped: Vec<String>,
}

/// Render `records` as CSV: a header row, then one row per record.
pub fn to_table(records: &[Mapping]) -> OperationResult<String> {
    if records.is_empty() {
        return Err(OperationError::invalid_parameters("no records to encode"));
    }

    let columns: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();
    if columns.is_empty() {
        return Err(OperationError::invalid_parameters("records have no fields"));
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|c| strip_newlines(c)))
        .map_err(csv_error)?;

    for record in records {
        let row = columns.iter().map(|column| {
            record
                .get(*column)
                .map(|value| strip_newlines(&value.to_string()))
                .unwrap_or_default()
        });
        writer.write_record(row).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OperationError::invalid_parameters(format!("csv flush failed: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| OperationError::invalid_parameters(format!("csv output not UTF-8: {e}")))
}

/// Single-record form of [`to_table`].
pub fn to_table_one(record: &Mapping) -> OperationResult<String> {
    to_table(std::slice::from_ref(record))
}

/// Derive vendor column descriptors from the header row of `table`.
///
/// `email` and `mobile` get their dedicated index fields; every other
/// column becomes a numbered custom field until `tier`'s capacity is
/// reached. Excess columns are left out of `fields` and listed in `dropped`.
pub fn to_field_mapping(table: &str, tier: AccountTier) -> OperationResult<FieldMapping> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(table.as_bytes());
    let header = reader.headers().map_err(csv_error)?;

    let capacity = tier.max_custom_fields();
    let mut mapping = FieldMapping::default();
    let mut custom = 0usize;

    for (index, column) in header.iter().enumerate() {
        let index = FieldValue::Text(index.to_string());
        match column {
            "email" => {
                mapping.fields.insert(fields::EMAIL_COL.to_owned(), index);
            }
            "mobile" => {
                mapping.fields.insert(fields::MOBILE_COL.to_owned(), index);
            }
            other if custom < capacity => {
                custom += 1;
                mapping
                    .fields
                    .insert(format!("field{custom}Col"), index);
                mapping.fields.insert(
                    format!("field{custom}Name"),
                    FieldValue::Text(other.replace(' ', "_")),
                );
            }
            other => mapping.dropped.push(other.to_owned()),
        }
    }

    Ok(mapping)
}

fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

fn csv_error(err: csv::Error) -> OperationError {
    OperationError::invalid_parameters(format!("csv: {err}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::ErrorCode;

    fn records(value: serde_json::Value) -> Vec<Mapping> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn columns_are_sorted_union_with_empty_cells() {
        let table = to_table(&records(json!([{ "b": 1, "a": 2 }, { "a": 3 }]))).unwrap();
        assert_eq!(table, "a,b\n2,1\n3,\n");
        insta::assert_snapshot!(table.trim_end(), @r"
        a,b
        2,1
        3,
        ");
    }

    #[test]
    fn header_is_stable_across_key_order() {
        let first = to_table(&records(json!([{ "z": "1", "m": "2" }]))).unwrap();
        let second = to_table(&records(json!([{ "m": "2", "z": "1" }]))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn newlines_are_stripped() {
        let table = to_table_one(&records(json!([{ "note": "line1\nline2\r\n" }]))[0]).unwrap();
        assert_eq!(table, "note\nline1line2\n");
    }

    #[test]
    fn delimiters_are_quoted() {
        let table = to_table_one(&records(json!([{ "name": "Smith, Jo" }]))[0]).unwrap();
        assert_eq!(table, "name\n\"Smith, Jo\"\n");
    }

    #[test]
    fn scalars_render_as_text() {
        let table = to_table(&records(json!([{ "n": 7, "ok": false, "x": 2.5 }]))).unwrap();
        assert_eq!(table, "n,ok,x\n7,false,2.5\n");
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = to_table(&[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameters);
        let err = to_table(&[Mapping::new()]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameters);
    }

    #[test]
    fn field_mapping_assigns_dedicated_and_custom_columns() {
        let table = "age,email,first name,mobile\n";
        let mapping = to_field_mapping(table, AccountTier::Lite).unwrap();
        let expected: Mapping = serde_json::from_value(json!({
            "field1Col": "0",
            "field1Name": "age",
            "emailCol": "1",
            "field2Col": "2",
            "field2Name": "first_name",
            "mobileCol": "3"
        }))
        .unwrap();
        assert_eq!(mapping.fields, expected);
        assert!(mapping.dropped.is_empty());
    }

    #[test]
    fn field_mapping_drops_columns_past_capacity() {
        let header: Vec<String> = (0..12).map(|i| format!("c{i:02}")).collect();
        let table = format!("email,{}\n", header.join(","));
        let mapping = to_field_mapping(&table, AccountTier::Lite).unwrap();

        assert!(mapping.fields.contains_key("field10Name"));
        assert!(!mapping.fields.contains_key("field11Name"));
        assert_eq!(mapping.dropped, vec!["c10".to_owned(), "c11".to_owned()]);

        let roomy = to_field_mapping(&table, AccountTier::Pro).unwrap();
        assert!(roomy.dropped.is_empty());
        assert!(roomy.fields.contains_key("field12Name"));
    }
}
