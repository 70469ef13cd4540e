// ── Operation orchestrator ──
//
// Each public operation is a fixed sequence of PAINT calls glued together by
// reply inspection. Steps run strictly in order; the first failing step ends
// the operation with its own error code and reply. `NotAuthenticated` and
// transport failures pass through `?` untouched.

use chrono::Local;
use secrecy::SecretString;
use tracing::{debug, info};

use pureresponse_api::bean::fields;
use pureresponse_api::{
    AccountTier, BeanClass, BeanType, ErrorCode, FieldValue, Mapping, OperationError,
    OperationResult, Process, Reply, Request, Session, Transport,
};

use crate::config::ClientConfig;
use crate::lookup::{self, CONTACT_LIST, EMAIL_MESSAGE};
use crate::schedule::{self, ScheduleDelay};
use crate::upload::{self, UploadSummary};

/// High-level PureResponse client.
///
/// Wraps a [`Session`] and composes its calls into campaign, email and
/// contact-list operations. Intended for sequential use: concurrent calls
/// are safe with respect to the session state but interleave on the wire.
pub struct PureResponseClient<T> {
    session: Session<T>,
    default_delay: ScheduleDelay,
}

impl<T: Transport> PureResponseClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            session: Session::new(transport),
            default_delay: ScheduleDelay::default(),
        }
    }

    /// Build a client from `config` and authenticate it.
    pub async fn connect(config: &ClientConfig, transport: T) -> OperationResult<Self> {
        let client = Self::new(transport).with_default_delay(config.schedule_delay);
        client
            .authenticate(&config.username, &config.password, config.tier)
            .await?;
        Ok(client)
    }

    /// Delay used by [`send_to_list`](Self::send_to_list) when none is given.
    pub fn with_default_delay(mut self, delay: ScheduleDelay) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    // ── Session ──────────────────────────────────────────────────────

    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
        tier: AccountTier,
    ) -> OperationResult<String> {
        self.session.authenticate(username, password, tier).await
    }

    pub async fn invalidate(&self) {
        self.session.invalidate().await;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    // ── Deliveries ───────────────────────────────────────────────────

    /// Schedule `message_name` for delivery to the contact list `list_name`.
    ///
    /// The delivery time is now plus `delay` (or the client default).
    pub async fn send_to_list(
        &self,
        list_name: &str,
        message_name: &str,
        delay: Option<ScheduleDelay>,
    ) -> OperationResult<()> {
        let delivery_id = self.create_bean(BeanClass::CampaignDelivery).await?;

        let lists = lookup::find_exact(&self.session, CONTACT_LIST, list_name).await?;
        let Some(list) = lists.found else {
            return Err(lists.reply.failure(ErrorCode::ListNotFound));
        };
        let messages = lookup::find_exact(&self.session, EMAIL_MESSAGE, message_name).await?;
        let Some(message) = messages.found else {
            return Err(messages.reply.failure(ErrorCode::MessageNotFound));
        };

        let delay = delay.unwrap_or(self.default_delay);
        let delivery_time = schedule::delivery_time(Local::now().naive_local(), delay)?;
        debug!(list = list_name, message = message_name, %delivery_time, "scheduling delivery");

        let entity = Mapping::from([
            (fields::BEAN_ID.to_owned(), FieldValue::Text(delivery_id)),
            (
                fields::LIST_IDS.to_owned(),
                FieldValue::Map(Mapping::from([("0".to_owned(), FieldValue::Text(list.id))])),
            ),
            (fields::MESSAGE_ID.to_owned(), FieldValue::Text(message.id)),
            (fields::DELIVERY_TIME.to_owned(), FieldValue::Text(delivery_time)),
        ]);
        self.store(BeanClass::CampaignDelivery, entity, ErrorCode::CouldNotDeliver)
            .await?;

        info!(list = list_name, message = message_name, "delivery scheduled");
        Ok(())
    }

    /// Send `message_name` to a single address, with optional merge data.
    pub async fn send_to_contact(
        &self,
        email_to: &str,
        message_name: &str,
        custom_data: Option<Mapping>,
    ) -> OperationResult<()> {
        let mut entity =
            Mapping::from([(fields::TO_ADDRESS.to_owned(), FieldValue::from(email_to))]);
        if let Some(custom) = custom_data {
            entity.insert(fields::CUSTOM_DATA.to_owned(), FieldValue::Map(custom));
        }
        let process_fields = Mapping::from([(
            fields::MSG_MSG_NAME.to_owned(),
            FieldValue::from(message_name),
        )]);

        let created = self
            .session
            .dispatch(
                Request::facade(BeanClass::CampaignOneToOne, Process::Create)
                    .with_entity(entity)
                    .with_process_fields(process_fields),
            )
            .await?;
        let bean_id = created_bean_id(created, BeanClass::CampaignOneToOne)?;

        self.store(
            BeanClass::CampaignOneToOne,
            bean_id_entity(bean_id),
            ErrorCode::CouldNotDeliver,
        )
        .await?;

        info!(to = email_to, message = message_name, "one-to-one message sent");
        Ok(())
    }

    // ── Messages ─────────────────────────────────────────────────────

    /// Create a new email message, refusing to reuse an existing name.
    pub async fn create_email(
        &self,
        message_name: &str,
        subject: &str,
        body_html: &str,
    ) -> OperationResult<()> {
        let existing = lookup::find_exact(&self.session, EMAIL_MESSAGE, message_name).await?;
        if let Some(found) = existing.found {
            debug!(message = message_name, id = %found.id, "message name taken");
            return Err(existing.reply.failure(ErrorCode::MessageNameExists));
        }

        let bean_id = self.create_bean(BeanClass::CampaignEmail).await?;
        let mut entity = bean_id_entity(bean_id);
        entity.insert(fields::MESSAGE_NAME.to_owned(), FieldValue::from(message_name));
        entity.insert(fields::SUBJECT.to_owned(), FieldValue::from(subject));
        entity.insert(fields::BODY_HTML.to_owned(), FieldValue::from(body_html));

        self.store(BeanClass::CampaignEmail, entity, ErrorCode::MessageNotSaved)
            .await?;

        info!(message = message_name, "email created");
        Ok(())
    }

    // ── Contact lists ────────────────────────────────────────────────

    /// Create the contact list `list_name` from `records`.
    ///
    /// An existing list with the same name is an error unless `overwrite`
    /// is set, in which case it is removed first. `notify_uri` is passed to
    /// the vendor for upload-complete notification.
    pub async fn create_contact_list(
        &self,
        list_name: &str,
        records: &[Mapping],
        notify_uri: Option<&str>,
        overwrite: bool,
    ) -> OperationResult<UploadSummary> {
        let tier = self.tier().await?;
        let payload = upload::build(list_name, records, tier, notify_uri)?;

        let existing = lookup::find_exact(&self.session, CONTACT_LIST, list_name).await?;
        if let Some(found) = existing.found {
            if !overwrite {
                return Err(existing.reply.failure(ErrorCode::ListNameExists));
            }
            self.remove_list(found.bean_id, existing.reply, list_name).await?;
        }

        self.store_new_list(payload.entity).await?;

        info!(list = list_name, rows = payload.summary.rows, "contact list created");
        Ok(payload.summary)
    }

    /// Upload one contact to `list_name`.
    pub async fn add_contact(
        &self,
        list_name: &str,
        record: &Mapping,
    ) -> OperationResult<UploadSummary> {
        self.append_contacts(list_name, std::slice::from_ref(record))
            .await
    }

    /// Upload several contacts to `list_name`.
    pub async fn add_contacts(
        &self,
        list_name: &str,
        records: &[Mapping],
    ) -> OperationResult<UploadSummary> {
        self.append_contacts(list_name, records).await
    }

    // NOTE: this allocates a new list entity named `list_name` rather than
    // appending to an existing list of that name.
    async fn append_contacts(
        &self,
        list_name: &str,
        records: &[Mapping],
    ) -> OperationResult<UploadSummary> {
        let tier = self.tier().await?;
        let payload = upload::build(list_name, records, tier, None)?;

        self.store_new_list(payload.entity).await?;

        info!(list = list_name, rows = payload.summary.rows, "contacts uploaded");
        Ok(payload.summary)
    }

    // ── Shared steps ─────────────────────────────────────────────────

    async fn tier(&self) -> OperationResult<AccountTier> {
        self.session
            .tier()
            .await
            .ok_or_else(OperationError::not_authenticated)
    }

    /// `create` on a facade; returns the new entity's bean id.
    async fn create_bean(&self, class: BeanClass) -> OperationResult<String> {
        let reply = self
            .session
            .dispatch(Request::facade(class, Process::Create))
            .await?;
        created_bean_id(reply, class)
    }

    /// `store` on a facade, mapping an unsuccessful reply to `failure`.
    async fn store(
        &self,
        class: BeanClass,
        entity: Mapping,
        failure: ErrorCode,
    ) -> OperationResult<()> {
        let reply = self
            .session
            .dispatch(Request::facade(class, Process::Store).with_entity(entity))
            .await?;
        if reply.is_success() {
            Ok(())
        } else {
            Err(reply.failure(failure))
        }
    }

    async fn store_new_list(&self, mut entity: Mapping) -> OperationResult<()> {
        let bean_id = self.create_bean(BeanClass::CampaignList).await?;
        entity.insert(fields::BEAN_ID.to_owned(), FieldValue::Text(bean_id));
        self.store(BeanClass::CampaignList, entity, ErrorCode::ListNotSaved)
            .await
    }

    /// Remove the list loaded in `loaded`; a load without a `beanId` is
    /// `Generic` with that load as diagnostic.
    async fn remove_list(
        &self,
        bean_id: Option<String>,
        loaded: Reply,
        list_name: &str,
    ) -> OperationResult<()> {
        let Some(bean_id) = bean_id else {
            return Err(loaded.failure(ErrorCode::Generic));
        };

        let reply = self
            .session
            .dispatch(
                Request::facade(BeanClass::CampaignList, Process::Remove)
                    .with_entity(bean_id_entity(bean_id)),
            )
            .await?;
        if !reply.is_success() {
            return Err(reply.failure(ErrorCode::Generic));
        }

        info!(list = list_name, "existing contact list removed");
        Ok(())
    }
}

fn created_bean_id(reply: Reply, class: BeanClass) -> OperationResult<String> {
    match reply.bean_id(BeanType::Entity, class) {
        Some(bean_id) if reply.is_success() => Ok(bean_id),
        _ => Err(reply.failure(ErrorCode::BeanNotCreated)),
    }
}

fn bean_id_entity(bean_id: String) -> Mapping {
    Mapping::from([(fields::BEAN_ID.to_owned(), FieldValue::Text(bean_id))])
}
