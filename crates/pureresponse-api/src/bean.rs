// ── PAINT vocabulary ──
//
// Bean types, bean classes, processes and the field/value names the vendor
// schema uses. None of these vary per client instance.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Object-role tag, first half of the bean key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumString)]
pub enum BeanType {
    #[strum(serialize = "bus_entity")]
    Entity,
    #[strum(serialize = "bus_facade")]
    Facade,
    #[strum(serialize = "bus_search")]
    Search,
}

/// Business object class, second half of the bean key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumString)]
pub enum BeanClass {
    #[strum(serialize = "campaign_delivery")]
    CampaignDelivery,
    #[strum(serialize = "campaign_email")]
    CampaignEmail,
    #[strum(serialize = "campaign_list")]
    CampaignList,
    #[strum(serialize = "campaign_one2one")]
    CampaignOneToOne,
    #[strum(serialize = "context")]
    Context,
}

/// Process invoked on a bean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Process {
    #[strum(serialize = "login")]
    Authenticate,
    #[strum(serialize = "logout")]
    Invalidate,
    Search,
    Load,
    Create,
    Store,
    Remove,
}

/// Composite `<beanType>_<beanClass>` key selecting the remote object.
pub fn bean_key(bean_type: BeanType, bean_class: BeanClass) -> String {
    format!("{bean_type}_{bean_class}")
}

/// Field names used in entity/process data and replies.
pub mod fields {
    pub const USERNAME: &str = "userName";
    pub const PASSWORD: &str = "password";
    pub const BEAN_ID: &str = "beanId";
    pub const MESSAGE_ID: &str = "messageId";
    pub const MESSAGE_NAME: &str = "messageName";
    pub const SUBJECT: &str = "subject";
    pub const BODY_HTML: &str = "bodyHtml";
    pub const LIST_ID: &str = "listId";
    pub const LIST_IDS: &str = "listIds";
    pub const LIST_NAME: &str = "listName";
    pub const DELIVERY_TIME: &str = "deliveryDtTm";
    pub const FOUND_DATA: &str = "idData";
    pub const RESULT: &str = "result";
    pub const RESULT_DATA: &str = "resultData";
    pub const MSG_MSG_NAME: &str = "message_messageName";
    pub const TO_ADDRESS: &str = "toAddress";
    pub const CUSTOM_DATA: &str = "customData";
    pub const UPLOAD_TYPE: &str = "uploadTransactionType";
    pub const PASTE_FILE: &str = "pasteFile";
    pub const NOTIFY_URI: &str = "notifyUri";
    pub const EMAIL_COL: &str = "emailCol";
    pub const MOBILE_COL: &str = "mobileCol";
}

/// Literal values sent to, or recognized from, the vendor.
pub mod values {
    pub const SUCCESS: &str = "success";
    pub const APPEND: &str = "APPEND";
}

/// Exception discriminants found in a reply's `result` field.
pub mod exceptions {
    pub const VALIDATION: &str = "bean_exception_validation";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bean_keys_join_type_and_class() {
        assert_eq!(
            bean_key(BeanType::Facade, BeanClass::CampaignList),
            "bus_facade_campaign_list"
        );
        assert_eq!(
            bean_key(BeanType::Entity, BeanClass::CampaignOneToOne),
            "bus_entity_campaign_one2one"
        );
    }

    #[test]
    fn process_names() {
        assert_eq!(Process::Authenticate.as_ref(), "login");
        assert_eq!(Process::Invalidate.as_ref(), "logout");
        assert_eq!(Process::Remove.as_ref(), "remove");
    }
}
