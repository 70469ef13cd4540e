//! Campaign, email and contact-list operations for the PureResponse PAINT API.
//!
//! - **[`PureResponseClient`]**: composes session-gated PAINT calls into the
//!   public operations: [`send_to_list`](PureResponseClient::send_to_list),
//!   [`send_to_contact`](PureResponseClient::send_to_contact),
//!   [`create_email`](PureResponseClient::create_email),
//!   [`create_contact_list`](PureResponseClient::create_contact_list),
//!   [`add_contact`](PureResponseClient::add_contact) and
//!   [`add_contacts`](PureResponseClient::add_contacts). Every operation
//!   returns an [`OperationResult`]; failures carry an [`ErrorCode`] plus the
//!   decoded vendor reply of the step that failed.
//!
//! - **[`ClientConfig`]**: credentials, account tier, endpoint and default
//!   delivery delay, usually produced by `pureresponse-config`.
//!
//! The wire codec, session state machine and [`Transport`] seam live in
//! `pureresponse-api` and are re-exported here.

pub mod client;
pub mod config;
mod lookup;
pub mod schedule;
pub mod upload;

pub use client::PureResponseClient;
pub use config::ClientConfig;
pub use schedule::{DelayUnit, ScheduleDelay};
pub use upload::UploadSummary;

pub use pureresponse_api::{
    AccountTier, Endpoint, ErrorCode, FieldValue, Mapping, OperationError, OperationResult,
    Transport, TransportError,
};
