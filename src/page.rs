//! One console page: the primary collection, the category dropdown source,
//! the add/edit form and the error banner shown above the table.

use serde_json::Value;
use tracing::{debug, info};

use crate::collection::{Collection, Confirm, LoadState, ReferenceList};
use crate::error::FormError;
use crate::form::FormController;
use crate::records::ContentRecord;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::view::{self, Row};

pub struct Page<T> {
    resource: Resource,
    list: Collection<T>,
    categories: Option<ReferenceList<T>>,
    form: FormController,
    banner: Option<String>,
}

impl<T: Transport + Clone> Page<T> {
    pub fn new(resource: Resource, transport: T) -> Self {
        let categories = resource
            .uses_categories()
            .then(|| ReferenceList::new(Resource::Categories, transport.clone()));
        Self {
            resource,
            list: Collection::new(resource, transport),
            categories,
            form: FormController::new(resource),
            banner: None,
        }
    }
}

impl<T: Transport> Page<T> {
    pub fn resource(&self) -> Resource { self.resource }

    /// Fetch the list and the categories side by side.
    ///
    /// Failures land in `banner()`; a list failure takes precedence over a
    /// categories failure.
    pub async fn activate(&mut self) {
        let Self { list, categories, banner, .. } = self;
        if let Some(c) = categories.as_mut() {
            c.reset();
        }
        let (listed, cats) = tokio::join!(list.load(), async {
            match categories.as_mut() {
                Some(c) => c.load().await,
                None => Ok(()),
            }
        });
        *banner = match (listed, cats) {
            (Err(e), _) | (Ok(()), Err(e)) => Some(e.banner),
            (Ok(()), Ok(())) => None,
        };
        info!(resource = %self.resource, items = self.list.len(), "page active");
    }

    /// Both loads have settled, successfully or not.
    pub fn ready(&self) -> bool {
        let cats = self.categories.as_ref().map_or(LoadState::Loaded, ReferenceList::state);
        self.list.state().is_settled() && cats.is_settled()
    }

    pub fn banner(&self) -> Option<&str> { self.banner.as_deref() }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
        self.list.clear_error();
    }

    pub fn list(&self) -> &Collection<T> { &self.list }

    pub fn categories(&self) -> Option<&ReferenceList<T>> { self.categories.as_ref() }

    /// `(id, name)` pairs for the category dropdown; empty for pages without one.
    pub fn category_options(&self) -> Vec<(String, String)> {
        self.categories.as_ref().map(ReferenceList::options).unwrap_or_default()
    }

    pub fn form(&self) -> &FormController { &self.form }

    pub fn form_mut(&mut self) -> &mut FormController { &mut self.form }

    pub fn open_create(&mut self) -> Result<(), FormError> { self.form.open_for_create() }

    /// Open the form on the cached record `id`.
    pub fn open_edit(&mut self, id: &str) -> Result<(), FormError> {
        let record = self.list.find(id).ok_or(FormError::MissingId)?.clone();
        self.form.open_for_edit(&record)
    }

    pub async fn submit(&mut self) -> Result<Value, FormError> {
        self.banner = None;
        let result = self.form.submit(&mut self.list).await;
        if let Err(FormError::Sync(e)) = &result {
            self.banner = Some(e.banner.clone());
        }
        result
    }

    pub fn cancel(&mut self) -> bool { self.form.cancel() }

    /// Delete `id` after `confirm` agrees. Returns `false` if declined.
    pub async fn delete(&mut self, id: &str, confirm: &mut impl Confirm) -> Result<bool, FormError> {
        self.banner = None;
        match self.list.remove(id, confirm).await {
            Ok(removed) => {
                debug!(resource = %self.resource, id, removed, "delete finished");
                Ok(removed)
            }
            Err(e) => {
                self.banner = Some(e.banner.clone());
                Err(e.into())
            }
        }
    }

    /// Typed copy of cached record `id`, for the detail view.
    pub fn view(&self, id: &str) -> Option<ContentRecord> {
        let value = self.list.find(id)?.clone();
        ContentRecord::from_value(self.resource, value).ok()
    }

    pub fn detail(&self, id: &str) -> Option<String> {
        self.view(id).map(|r| view::detail(&r, &self.category_options()))
    }

    /// Table rows in server order.
    pub fn rows(&self) -> Vec<Row> {
        let options = self.category_options();
        self.list.records().iter().map(|r| view::row(r, &options)).collect()
    }

    pub fn table(&self) -> String { view::render_table(self.resource, &self.rows()) }
}
