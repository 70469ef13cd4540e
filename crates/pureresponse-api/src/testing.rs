// Scripted in-memory transport.
//
// Replies are handed out in order, one per call, and every call is recorded
// (already decoded) so tests can assert on exactly what would have gone over
// the wire.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::bean::{BeanClass, BeanType, bean_key, fields, values};
use crate::codec;
use crate::error::TransportError;
use crate::transport::Transport;
use crate::wire::{FieldValue, Mapping, RawReply, WireRecord};

/// One call observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub context: Option<String>,
    pub bean_key: String,
    pub process: String,
    pub entity: Option<WireRecord>,
    pub process_fields: Option<WireRecord>,
}

impl RecordedCall {
    pub fn entity_mapping(&self) -> Mapping {
        codec::decode(self.entity.as_ref())
    }

    pub fn process_mapping(&self) -> Mapping {
        codec::decode(self.process_fields.as_ref())
    }

    /// `"<bean_key> <process>"`, handy for asserting call sequences.
    pub fn label(&self) -> String {
        format!("{} {}", self.bean_key, self.process)
    }
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<RawReply, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next unanswered call.
    pub fn push(&self, reply: RawReply) -> &Self {
        self.lock_replies().push_back(Ok(reply));
        self
    }

    /// Queue a transport failure for the next unanswered call.
    pub fn push_error(&self, message: &str) -> &Self {
        self.lock_replies()
            .push_back(Err(TransportError::new(message)));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Labels of every recorded call, in order.
    pub fn labels(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::label).collect()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<RawReply, TransportError>>> {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for ScriptedTransport {
    async fn invoke(
        &self,
        context: Option<&str>,
        bean_key: &str,
        process: &str,
        entity: Option<WireRecord>,
        process_fields: Option<WireRecord>,
    ) -> Result<RawReply, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                context: context.map(str::to_owned),
                bean_key: bean_key.to_owned(),
                process: process.to_owned(),
                entity,
                process_fields,
            });

        self.lock_replies().pop_front().unwrap_or_else(|| {
            Err(TransportError::new(format!(
                "no scripted reply for {bean_key} {process}"
            )))
        })
    }
}

// ── Reply builders ──────────────────────────────────────────────────

/// Encode a decoded reply body into its raw wire form.
pub fn raw(body: &Mapping) -> RawReply {
    serde_json::to_value(codec::encode(body)).unwrap_or(RawReply::Null)
}

/// A reply with the given `result` and `resultData` sections.
pub fn reply(result: &str, result_data: Mapping) -> RawReply {
    raw(&Mapping::from([
        (fields::RESULT.to_owned(), FieldValue::Text(result.to_owned())),
        (fields::RESULT_DATA.to_owned(), FieldValue::Map(result_data)),
    ]))
}

/// A successful reply carrying one bean section.
pub fn success_with(bean_type: BeanType, bean_class: BeanClass, bean: Mapping) -> RawReply {
    reply(
        values::SUCCESS,
        Mapping::from([(bean_key(bean_type, bean_class), FieldValue::Map(bean))]),
    )
}

/// A successful reply with no data.
pub fn success() -> RawReply {
    reply(values::SUCCESS, Mapping::new())
}

/// A successful `create`/`login` reply returning a new entity id.
pub fn created(bean_class: BeanClass, bean_id: &str) -> RawReply {
    success_with(
        BeanType::Entity,
        bean_class,
        Mapping::from([(fields::BEAN_ID.to_owned(), FieldValue::Text(bean_id.to_owned()))]),
    )
}

/// A successful search reply whose `idData` lists the given ids under
/// `id_field`, indexed `"0"`, `"1"`, ...
pub fn search_hits(bean_class: BeanClass, id_field: &str, ids: &[&str]) -> RawReply {
    let found: Mapping = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let hit = Mapping::from([(id_field.to_owned(), FieldValue::Text((*id).to_owned()))]);
            (i.to_string(), FieldValue::Map(hit))
        })
        .collect();
    success_with(
        BeanType::Search,
        bean_class,
        Mapping::from([(fields::FOUND_DATA.to_owned(), FieldValue::Map(found))]),
    )
}

/// A successful `load` reply for an entity with a bean id and a name field.
pub fn loaded(bean_class: BeanClass, bean_id: &str, name_field: &str, name: &str) -> RawReply {
    success_with(
        BeanType::Entity,
        bean_class,
        Mapping::from([
            (fields::BEAN_ID.to_owned(), FieldValue::Text(bean_id.to_owned())),
            (name_field.to_owned(), FieldValue::Text(name.to_owned())),
        ]),
    )
}

/// A failed reply with the given exception discriminant.
pub fn failure(result: &str) -> RawReply {
    reply(result, Mapping::new())
}
