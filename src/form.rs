//! The add/edit form: a draft document and its lifecycle.
//!
//! `Closed -> Open(Creating | Editing) -> Submitting -> Closed`. A failed
//! submission goes back to `Open` with the draft intact.

use std::mem;

use serde_json::Value;
use tracing::{debug, warn};

use crate::collection::Collection;
use crate::editor::{GroupEditor, ListField};
use crate::error::FormError;
use crate::path::{self, FieldPath};
use crate::records::{backfill, record_id, reference_id};
use crate::resource::Resource;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Creating,
    Editing { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Closed,
    Open { mode: Mode, draft: Value, pristine: Value },
    Submitting { mode: Mode, draft: Value, pristine: Value },
}

pub struct FormController {
    resource: Resource,
    state: FormState,
    error: Option<String>,
}

impl FormController {
    pub fn new(resource: Resource) -> Self { Self { resource, state: FormState::Closed, error: None } }

    pub fn resource(&self) -> Resource { self.resource }

    pub fn state(&self) -> &FormState { &self.state }

    pub fn is_open(&self) -> bool { matches!(self.state, FormState::Open { .. }) }

    pub fn mode(&self) -> Option<&Mode> {
        match &self.state {
            FormState::Open { mode, .. } | FormState::Submitting { mode, .. } => Some(mode),
            FormState::Closed => None,
        }
    }

    /// Message from the last failed validation or submission.
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }

    pub fn open_for_create(&mut self) -> Result<(), FormError> {
        self.ensure_closed()?;
        let draft = self.resource.template();
        self.state = FormState::Open { mode: Mode::Creating, pristine: draft.clone(), draft };
        self.error = None;
        Ok(())
    }

    /// Seed the draft from a fetched record.
    ///
    /// Reference fields are collapsed to bare ids and containers the record
    /// lacks are filled in from the template.
    pub fn open_for_edit(&mut self, record: &Value) -> Result<(), FormError> {
        self.ensure_closed()?;
        let id = record_id(record).ok_or(FormError::MissingId)?.to_string();
        let mut draft = record.clone();
        normalize_references(self.resource, &mut draft);
        backfill(&mut draft, &self.resource.template());
        debug!(resource = %self.resource, id = %id, "editing");
        self.state = FormState::Open { mode: Mode::Editing { id }, pristine: draft.clone(), draft };
        self.error = None;
        Ok(())
    }

    /// Discard the draft. Returns `false` if no form was open.
    pub fn cancel(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = FormState::Closed;
        self.error = None;
        true
    }

    pub fn draft(&self) -> Option<&Value> {
        match &self.state {
            FormState::Open { draft, .. } | FormState::Submitting { draft, .. } => Some(draft),
            FormState::Closed => None,
        }
    }

    pub fn draft_mut(&mut self) -> Result<&mut Value, FormError> {
        match &mut self.state {
            FormState::Open { draft, .. } => Ok(draft),
            FormState::Submitting { .. } => Err(FormError::Submitting),
            FormState::Closed => Err(FormError::NotOpen),
        }
    }

    pub fn get(&self, field: &FieldPath) -> Option<&Value> { self.draft().and_then(|d| path::read(d, field)) }

    pub fn set(&mut self, field: &FieldPath, value: Value) -> Result<(), FormError> {
        path::set(self.draft_mut()?, field, value)?;
        Ok(())
    }

    /// Commit the list field's input into the draft.
    pub fn commit_list(&mut self, field: &mut ListField) -> Result<bool, FormError> {
        Ok(field.commit(self.draft_mut()?)?)
    }

    pub fn remove_list_item(&mut self, field: &ListField, index: usize) -> Result<(), FormError> {
        field.remove_at(self.draft_mut()?, index)?;
        Ok(())
    }

    /// Editor for the string list at `field`, e.g. `seo.keywords`.
    pub fn list_field(&self, field: &str) -> Result<ListField, FormError> { Ok(ListField::parse(field)?) }

    /// Editor for the group array at `field`; new groups are cloned from `template`.
    pub fn group(&self, field: &str, template: Value) -> Result<GroupEditor, FormError> {
        Ok(GroupEditor::new(FieldPath::parse(field)?, template))
    }

    pub fn sections(&self) -> Option<GroupEditor> { self.resource.sections() }

    pub fn blocks(&self, section: usize) -> Option<GroupEditor> { self.resource.blocks(section) }

    /// True once the draft differs from what the form was opened with.
    pub fn is_dirty(&self) -> bool {
        match &self.state {
            FormState::Open { draft, pristine, .. } | FormState::Submitting { draft, pristine, .. } => draft != pristine,
            FormState::Closed => false,
        }
    }

    /// Required fields must be non-blank; everything else is the server's call.
    pub fn validate(&self) -> Result<(), FormError> {
        let draft = self.draft().ok_or(FormError::NotOpen)?;
        check_required(self.resource, draft)
    }

    /// The document that would be submitted now.
    pub fn finalize(&self) -> Result<Value, FormError> {
        let mut doc = self.draft().ok_or(FormError::NotOpen)?.clone();
        normalize_references(self.resource, &mut doc);
        Ok(doc)
    }

    /// Send the draft: create or update through `collection`, then close.
    ///
    /// On failure the form stays open with the draft untouched and the
    /// surfaced message in `error()`.
    pub async fn submit<T: Transport>(&mut self, collection: &mut Collection<T>) -> Result<Value, FormError> {
        let body = match &self.state {
            FormState::Open { .. } => self.finalize()?,
            FormState::Submitting { .. } => return Err(FormError::Submitting),
            FormState::Closed => return Err(FormError::NotOpen),
        };
        if let Err(e) = check_required(self.resource, &body) {
            self.error = Some(e.to_string());
            return Err(e);
        }

        let FormState::Open { mode, draft, pristine } = mem::replace(&mut self.state, FormState::Closed) else {
            return Err(FormError::NotOpen);
        };
        let target = mode.clone();
        self.state = FormState::Submitting { mode, draft, pristine };
        let result = match &target {
            Mode::Creating => collection.create(&body).await,
            Mode::Editing { id } => collection.update(id, &body).await,
        };

        match result {
            Ok(record) => {
                self.state = FormState::Closed;
                self.error = None;
                Ok(record)
            }
            Err(e) => {
                warn!(resource = %self.resource, "submit failed: {}", e.banner);
                if let FormState::Submitting { mode, draft, pristine } = mem::replace(&mut self.state, FormState::Closed) {
                    self.state = FormState::Open { mode, draft, pristine };
                }
                self.error = Some(e.banner.clone());
                Err(e.into())
            }
        }
    }

    fn ensure_closed(&self) -> Result<(), FormError> {
        match self.state {
            FormState::Closed => Ok(()),
            FormState::Open { .. } => Err(FormError::AlreadyOpen),
            FormState::Submitting { .. } => Err(FormError::Submitting),
        }
    }
}

/// Replace embedded reference objects with their ids.
pub fn normalize_references(resource: Resource, doc: &mut Value) {
    let Some(obj) = doc.as_object_mut() else { return };
    for field in resource.reference_fields() {
        let id = reference_id(obj.get(*field));
        obj.insert(field.to_string(), Value::String(id));
    }
}

fn check_required(resource: Resource, doc: &Value) -> Result<(), FormError> {
    for field in resource.required_fields() {
        let filled = doc.get(*field).and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty());
        if !filled {
            return Err(FormError::MissingRequired(field.to_string()));
        }
    }
    Ok(())
}
