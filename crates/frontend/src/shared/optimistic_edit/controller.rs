//! Optimistic update controller.
//!
//! Per field: `Idle -> Pending -> {Committed, RolledBack} -> Idle`. The new
//! value is shown before the write resolves; on failure the exact pre-edit
//! rendering comes back.

use std::cell::RefCell;
use std::fmt::Debug;

use contracts::domain::a001_memorial::edit::FieldId;
use leptos::prelude::*;
use thiserror::Error;

use super::sync_client::{EditRequest, RemoteSyncClient, SuccessPayload, SyncFailure, SyncTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Idle,
    Pending,
}

/// Client-side state of one editable field for the page session
#[derive(Debug, Clone, PartialEq)]
pub struct EditableField<V> {
    field_id: FieldId,
    display: V,
    committed: V,
    /// Rendering captured right before the optimistic apply; `Some` while pending
    snapshot: Option<V>,
}

impl<V: Clone + PartialEq> EditableField<V> {
    /// Seeded from server-rendered content
    pub fn new(field_id: FieldId, initial: V) -> Self {
        Self {
            field_id,
            display: initial.clone(),
            committed: initial,
            snapshot: None,
        }
    }

    pub fn field_id(&self) -> FieldId {
        self.field_id
    }

    pub fn display(&self) -> &V {
        &self.display
    }

    pub fn committed(&self) -> &V {
        &self.committed
    }

    pub fn phase(&self) -> EditPhase {
        if self.snapshot.is_some() {
            EditPhase::Pending
        } else {
            EditPhase::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.phase() == EditPhase::Pending
    }

    /// Idle -> Pending
    pub fn begin(&mut self, optimistic: V) -> Result<(), EditError> {
        if self.is_pending() {
            return Err(EditError::InFlight(self.field_id));
        }
        self.snapshot = Some(std::mem::replace(&mut self.display, optimistic));
        Ok(())
    }

    /// Pending -> Committed -> Idle
    pub fn commit(&mut self, canonical: V) {
        self.snapshot = None;
        self.display = canonical.clone();
        self.committed = canonical;
    }

    /// Pending -> RolledBack -> Idle
    pub fn rollback(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.display = snapshot;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("The {} is still being saved", .0.as_str())]
    InFlight(FieldId),

    /// Rejected by the serializer; nothing was sent
    #[error("{0}")]
    Invalid(String),

    #[error("The page was closed before the update finished")]
    Detached,

    #[error(transparent)]
    Sync(#[from] SyncFailure),
}

impl EditError {
    pub fn user_message(&self) -> String {
        match self {
            EditError::Sync(failure) => failure.user_message(),
            other => other.to_string(),
        }
    }
}

/// Where a field's state lives: a signal in the page, a `RefCell` in tests.
/// `None` means the owner is gone.
pub trait FieldSlot<V> {
    fn with_field<R>(&self, f: impl FnOnce(&mut EditableField<V>) -> R) -> Option<R>;
}

impl<V> FieldSlot<V> for RefCell<EditableField<V>> {
    fn with_field<R>(&self, f: impl FnOnce(&mut EditableField<V>) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

impl<V: Send + Sync + 'static> FieldSlot<V> for RwSignal<EditableField<V>> {
    fn with_field<R>(&self, f: impl FnOnce(&mut EditableField<V>) -> R) -> Option<R> {
        self.try_update(f)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditController<T> {
    client: RemoteSyncClient<T>,
}

impl<T: SyncTransport> EditController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            client: RemoteSyncClient::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        self.client.transport()
    }

    /// Applies `optimistic`, sends `request`, then commits the value chosen by
    /// `canonical` or rolls back. Returns the committed value.
    pub async fn submit<V, S>(
        &self,
        slot: &S,
        optimistic: V,
        request: EditRequest,
        canonical: impl FnOnce(&SuccessPayload, V) -> V,
    ) -> Result<V, EditError>
    where
        V: Clone + PartialEq + Debug,
        S: FieldSlot<V>,
    {
        let field_id = slot
            .with_field(|field| {
                field.begin(optimistic.clone())?;
                Ok::<_, EditError>(field.field_id())
            })
            .ok_or(EditError::Detached)??;
        log::debug!("{}: optimistic apply, POST {}", field_id.as_str(), request.endpoint);

        match self.client.send(&request).await {
            Ok(payload) => {
                let value = canonical(&payload, optimistic);
                slot.with_field(|field| field.commit(value.clone()))
                    .ok_or(EditError::Detached)?;
                log::debug!("{}: committed", field_id.as_str());
                Ok(value)
            }
            Err(failure) => {
                slot.with_field(EditableField::rollback)
                    .ok_or(EditError::Detached)?;
                log::warn!("{}: rolled back ({})", field_id.as_str(), failure);
                Err(EditError::Sync(failure))
            }
        }
    }
}
