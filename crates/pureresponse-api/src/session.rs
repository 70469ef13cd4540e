// ── Session manager ──
//
// Owns the PAINT context token and gates every outbound call on it. The
// state is an explicit two-variant machine behind an async RwLock; the lock
// is only held to read or swap the state, never across a transport call.

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::auth::AccountTier;
use crate::bean::{BeanClass, BeanType, Process, bean_key, exceptions, fields};
use crate::codec;
use crate::error::{ErrorCode, OperationError, OperationResult};
use crate::reply::Reply;
use crate::transport::Transport;
use crate::wire::{FieldValue, Mapping};

/// Authentication state of a [`Session`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated {
        context: String,
        tier: AccountTier,
    },
}

/// One PAINT call, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub bean_type: BeanType,
    pub bean_class: BeanClass,
    pub process: Process,
    pub entity: Mapping,
    pub process_fields: Mapping,
}

impl Request {
    /// A facade call with no entity or process data.
    pub fn facade(bean_class: BeanClass, process: Process) -> Self {
        Self {
            bean_type: BeanType::Facade,
            bean_class,
            process,
            entity: Mapping::new(),
            process_fields: Mapping::new(),
        }
    }

    pub fn with_entity(mut self, entity: Mapping) -> Self {
        self.entity = entity;
        self
    }

    pub fn with_process_fields(mut self, process_fields: Mapping) -> Self {
        self.process_fields = process_fields;
        self
    }

    pub fn bean_key(&self) -> String {
        bean_key(self.bean_type, self.bean_class)
    }
}

/// Session-gated access to a PAINT [`Transport`].
pub struct Session<T> {
    transport: T,
    state: RwLock<SessionState>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: RwLock::new(SessionState::Unauthenticated),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.state.read().await, SessionState::Authenticated { .. })
    }

    /// The current context token, if authenticated.
    pub async fn context(&self) -> Option<String> {
        match &*self.state.read().await {
            SessionState::Authenticated { context, .. } => Some(context.clone()),
            SessionState::Unauthenticated => None,
        }
    }

    /// The account tier recorded at login, if authenticated.
    pub async fn tier(&self) -> Option<AccountTier> {
        match &*self.state.read().await {
            SessionState::Authenticated { tier, .. } => Some(*tier),
            SessionState::Unauthenticated => None,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Log in and store the returned context.
    ///
    /// Empty credentials fail with `AuthParams` before any call is made.
    /// A vendor validation exception is also `AuthParams`; any other
    /// unsuccessful reply is `AuthProcess`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
        tier: AccountTier,
    ) -> OperationResult<String> {
        if username.is_empty() || password.expose_secret().is_empty() {
            return Err(OperationError::bare(ErrorCode::AuthParams));
        }

        let request = Request::facade(BeanClass::Context, Process::Authenticate).with_entity(
            Mapping::from([
                (fields::USERNAME.to_owned(), FieldValue::from(username)),
                (
                    fields::PASSWORD.to_owned(),
                    FieldValue::from(password.expose_secret()),
                ),
            ]),
        );

        let reply = self.call(None, &request).await?;

        if reply.is_success() {
            let Some(context) = reply.bean_id(BeanType::Entity, BeanClass::Context) else {
                return Err(reply.failure(ErrorCode::AuthProcess));
            };
            *self.state.write().await = SessionState::Authenticated {
                context: context.clone(),
                tier,
            };
            info!(username, %tier, "authenticated");
            Ok(context)
        } else if reply.has_exception(exceptions::VALIDATION) {
            Err(reply.failure(ErrorCode::AuthParams))
        } else {
            Err(reply.failure(ErrorCode::AuthProcess))
        }
    }

    /// Log out (best effort) and return to the unauthenticated state.
    ///
    /// The logout is fire-and-forget: its reply is ignored and a failed call
    /// is only logged. The local state is cleared either way.
    pub async fn invalidate(&self) {
        if !self.is_authenticated().await {
            return;
        }

        let logout = Request::facade(BeanClass::Context, Process::Invalidate);
        match self.dispatch_no_reply(logout).await {
            Ok(()) => info!("session invalidated"),
            Err(e) => warn!(error = %e, "logout failed; local session cleared anyway"),
        }
        *self.state.write().await = SessionState::Unauthenticated;
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Send `request` and decode the reply.
    ///
    /// Without a session only the login process is let through; anything
    /// else fails with `NotAuthenticated` and the transport is not touched.
    pub async fn dispatch(&self, request: Request) -> OperationResult<Reply> {
        let context = match &*self.state.read().await {
            SessionState::Authenticated { context, .. } => Some(context.clone()),
            SessionState::Unauthenticated if request.process == Process::Authenticate => None,
            SessionState::Unauthenticated => {
                debug!(bean = %request.bean_key(), process = %request.process, "rejected: not authenticated");
                return Err(OperationError::not_authenticated());
            }
        };

        self.call(context, &request).await
    }

    /// Fire-and-forget form of [`dispatch`](Self::dispatch): the reply is
    /// discarded once the call has gone through.
    pub async fn dispatch_no_reply(&self, request: Request) -> OperationResult<()> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn call(&self, context: Option<String>, request: &Request) -> OperationResult<Reply> {
        let bean = request.bean_key();
        debug!(%bean, process = %request.process, "dispatching");

        let raw = self
            .transport
            .invoke(
                context.as_deref(),
                &bean,
                request.process.as_ref(),
                codec::encode(&request.entity),
                codec::encode(&request.process_fields),
            )
            .await?;

        Ok(Reply::new(codec::decode_reply(raw)))
    }
}
