//! Editing and synchronisation engine for a medical content admin console.
//!
//! Records are edited as plain JSON documents: [`path`] addresses fields,
//! [`editor`] manages list and group fields inside a draft, [`form`] owns the
//! draft's lifecycle and [`collection`] keeps a cached list in step with the
//! REST API reached through [`transport`]. [`page`] ties these together the
//! way one console page uses them.

pub mod collection;
pub mod config;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod form;
pub mod page;
pub mod path;
pub mod records;
pub mod resource;
pub mod transport;
pub mod view;

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::collection::{AssumeYes, Collection, Confirm, LoadState, ReferenceList};
    pub use crate::config::ConsoleConfig;
    pub use crate::editor::{GroupEditor, ListField};
    pub use crate::error::{FormError, PathError, SyncError, TransportError};
    pub use crate::form::{FormController, FormState, Mode};
    pub use crate::page::Page;
    pub use crate::path::FieldPath;
    pub use crate::records::{record_id, ContentRecord};
    pub use crate::resource::Resource;
    pub use crate::transport::{HttpTransport, Transport};
}
