//! Optimistic inline editing: show the change first, write it, then commit
//! or roll back.

pub mod controller;
pub mod sync_client;
pub mod transport;

pub use controller::{EditController, EditError, EditPhase, EditableField, FieldSlot};
pub use sync_client::{
    CsrfToken, EditRequest, RawResponse, RemoteSyncClient, RequestBody, SuccessPayload,
    SyncFailure, SyncTransport, GENERIC_FAILURE_MESSAGE,
};
pub use transport::BrowserTransport;
