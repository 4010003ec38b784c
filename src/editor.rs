//! Editing primitives shared by every resource form.
//!
//! Editors hold no document of their own: they are addressed by a field path
//! and mutate whatever draft the form controller lends them.

pub mod group;
pub mod list;

pub use group::GroupEditor;
pub use list::ListField;
