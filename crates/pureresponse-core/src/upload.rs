// Contact upload payload: list name, append-mode descriptor, the CSV paste
// file and the header-derived column mapping.

use serde::Serialize;
use tracing::warn;

use pureresponse_api::bean::{fields, values};
use pureresponse_api::{AccountTier, FieldValue, Mapping, OperationResult, tabular};

/// What a contact upload sent, returned by the list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    /// Data rows in the paste file.
    pub rows: usize,
    /// Custom columns left out of the field mapping because the account
    /// tier has no room for them. The values are still in the paste file.
    pub dropped_columns: Vec<String>,
}

pub(crate) struct UploadPayload {
    pub entity: Mapping,
    pub summary: UploadSummary,
}

/// Build the entity data for a list store carrying `records`.
///
/// The paste file always contains newlines, so the codec ships it as
/// `pasteFile_base64`.
pub(crate) fn build(
    list_name: &str,
    records: &[Mapping],
    tier: AccountTier,
    notify_uri: Option<&str>,
) -> OperationResult<UploadPayload> {
    let table = tabular::to_table(records)?;
    let mapping = tabular::to_field_mapping(&table, tier)?;

    if !mapping.dropped.is_empty() {
        warn!(
            list = list_name,
            %tier,
            dropped = ?mapping.dropped,
            "custom fields exceed account capacity"
        );
    }

    let mut entity = mapping.fields;
    entity.insert(fields::LIST_NAME.to_owned(), FieldValue::from(list_name));
    entity.insert(fields::UPLOAD_TYPE.to_owned(), FieldValue::from(values::APPEND));
    entity.insert(fields::PASTE_FILE.to_owned(), FieldValue::Text(table));
    if let Some(uri) = notify_uri {
        entity.insert(fields::NOTIFY_URI.to_owned(), FieldValue::from(uri));
    }

    Ok(UploadPayload {
        entity,
        summary: UploadSummary {
            rows: records.len(),
            dropped_columns: mapping.dropped,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_carries_table_and_mapping() {
        let records: Vec<Mapping> = serde_json::from_value(json!([
            { "email": "a@example.com", "city": "Leeds" },
            { "email": "b@example.com" }
        ]))
        .unwrap();

        let payload = build("Customers", &records, AccountTier::Lite, Some("https://hook")).unwrap();
        let entity = payload.entity;

        assert_eq!(entity["listName"], FieldValue::from("Customers"));
        assert_eq!(entity["uploadTransactionType"], FieldValue::from("APPEND"));
        assert_eq!(
            entity["pasteFile"],
            FieldValue::from("city,email\nLeeds,a@example.com\n,b@example.com\n")
        );
        assert_eq!(entity["emailCol"], FieldValue::from("1"));
        assert_eq!(entity["field1Name"], FieldValue::from("city"));
        assert_eq!(entity["notifyUri"], FieldValue::from("https://hook"));
        assert_eq!(payload.summary.rows, 2);
        assert!(payload.summary.dropped_columns.is_empty());
    }
}
