use crate::bean::{BeanClass, BeanType, bean_key, fields, values};
use crate::codec;
use crate::error::{ErrorCode, OperationError};
use crate::wire::{FieldValue, Mapping};

/// A decoded `handleRequest` reply.
///
/// The body is `None` when the transport returned something without the
/// pair-list structure. Accessors treat that the same as a reply lacking
/// the requested field.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    body: Option<Mapping>,
}

impl Reply {
    pub fn new(body: Option<Mapping>) -> Self {
        Self { body }
    }

    pub fn body(&self) -> Option<&Mapping> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<Mapping> {
        self.body
    }

    /// The reply's `result` discriminant (`success` or an exception name).
    pub fn result_code(&self) -> Option<&str> {
        self.body.as_ref()?.get(fields::RESULT)?.as_text()
    }

    pub fn is_success(&self) -> bool {
        self.result_code() == Some(values::SUCCESS)
    }

    pub fn has_exception(&self, exception: &str) -> bool {
        self.result_code() == Some(exception)
    }

    pub fn result_data(&self) -> Option<&Mapping> {
        self.body.as_ref()?.get(fields::RESULT_DATA)?.as_map()
    }

    /// The `resultData` section for one bean, e.g. `bus_entity_campaign_list`.
    pub fn bean(&self, bean_type: BeanType, bean_class: BeanClass) -> Option<&Mapping> {
        self.result_data()?
            .get(&bean_key(bean_type, bean_class))
            .and_then(FieldValue::as_map)
    }

    /// The `beanId` of an entity in this reply.
    pub fn bean_id(&self, bean_type: BeanType, bean_class: BeanClass) -> Option<String> {
        codec::text_field(self.bean(bean_type, bean_class)?, fields::BEAN_ID)
    }

    /// The `idData` block of a search reply: index -> candidate record.
    pub fn found_data(&self, bean_type: BeanType, bean_class: BeanClass) -> Option<&Mapping> {
        self.bean(bean_type, bean_class)?
            .get(fields::FOUND_DATA)
            .and_then(FieldValue::as_map)
    }

    /// Turn this reply into an error carrying it as diagnostic payload.
    pub fn failure(self, code: ErrorCode) -> OperationError {
        OperationError::new(code, self.body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reply(value: serde_json::Value) -> Reply {
        Reply::new(Some(serde_json::from_value(value).unwrap()))
    }

    #[test]
    fn success_and_bean_id() {
        let r = reply(json!({
            "result": "success",
            "resultData": { "bus_entity_context": { "beanId": "ctx-1" } }
        }));
        assert!(r.is_success());
        assert_eq!(
            r.bean_id(BeanType::Entity, BeanClass::Context).as_deref(),
            Some("ctx-1")
        );
        assert_eq!(r.bean_id(BeanType::Entity, BeanClass::CampaignList), None);
    }

    #[test]
    fn found_data_of_search() {
        let r = reply(json!({
            "result": "success",
            "resultData": {
                "bus_search_campaign_list": { "idData": { "0": { "listId": "7" } } }
            }
        }));
        let found = r.found_data(BeanType::Search, BeanClass::CampaignList).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn exception_and_failure_payload() {
        let r = reply(json!({ "result": "bean_exception_validation" }));
        assert!(!r.is_success());
        assert!(r.has_exception("bean_exception_validation"));
        let err = r.failure(ErrorCode::AuthParams);
        assert_eq!(err.code, ErrorCode::AuthParams);
        assert!(err.meta.unwrap().contains_key("result"));
    }

    #[test]
    fn absent_body_is_not_success() {
        let r = Reply::new(None);
        assert!(!r.is_success());
        assert_eq!(r.result_data(), None);
        assert_eq!(r.failure(ErrorCode::Generic).meta, None);
    }
}
