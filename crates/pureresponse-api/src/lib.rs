// pureresponse-api: wire codec, session gate and transport seam for the
// PureResponse PAINT API.

pub mod auth;
pub mod bean;
pub mod codec;
pub mod error;
pub mod reply;
pub mod session;
pub mod tabular;
pub mod transport;
pub mod wire;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use auth::AccountTier;
pub use bean::{BeanClass, BeanType, Process};
pub use error::{ErrorCode, OperationError, OperationResult, TransportError};
pub use reply::Reply;
pub use session::{Request, Session, SessionState};
pub use tabular::FieldMapping;
pub use transport::{Endpoint, Transport};
pub use wire::{FieldValue, Mapping, RawReply, WirePair, WireRecord, WireValue};
