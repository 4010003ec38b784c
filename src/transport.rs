//! The HTTP boundary to the content API.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::TransportError;
use crate::resource::Resource;

/// One REST collection per resource: `GET|POST /api/{resource}` and
/// `PUT|DELETE /api/{resource}/{id}`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn list(&self, resource: Resource) -> Result<Vec<Value>, TransportError>;
    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, TransportError>;
    async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, TransportError>;
    async fn delete(&self, resource: Resource, id: &str) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn list(&self, resource: Resource) -> Result<Vec<Value>, TransportError> {
        (**self).list(resource).await
    }
    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, TransportError> {
        (**self).create(resource, body).await
    }
    async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, TransportError> {
        (**self).update(resource, id, body).await
    }
    async fn delete(&self, resource: Resource, id: &str) -> Result<(), TransportError> {
        (**self).delete(resource, id).await
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base: Url) -> Result<Self, TransportError> {
        let client = Client::builder().user_agent("medconsole/0.1").build()?;
        Ok(Self::with_client(client, base))
    }

    pub fn with_client(client: Client, mut base: Url) -> Self {
        // Url::join drops the last segment unless the base ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    pub fn base(&self) -> &Url { &self.base }

    pub fn collection_url(&self, resource: Resource) -> Result<Url, TransportError> {
        Ok(self.base.join(&format!("api/{}", resource.endpoint()))?)
    }

    pub fn item_url(&self, resource: Resource, id: &str) -> Result<Url, TransportError> {
        let mut url = self.collection_url(resource)?;
        url.path_segments_mut()
            .map_err(|_| TransportError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn list(&self, resource: Resource) -> Result<Vec<Value>, TransportError> {
        let url = self.collection_url(resource)?;
        debug!(%url, "GET");
        let resp = check(self.client.get(url).send().await?).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, TransportError> {
        let url = self.collection_url(resource)?;
        debug!(%url, "POST");
        let resp = check(self.client.post(url).json(body).send().await?).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, TransportError> {
        let url = self.item_url(resource, id)?;
        debug!(%url, "PUT");
        let resp = check(self.client.put(url).json(body).send().await?).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), TransportError> {
        let url = self.item_url(resource, id)?;
        debug!(%url, "DELETE");
        check(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}

/// Turn a non-success response into `TransportError::Status`, keeping the
/// body's message if it has one.
async fn check(resp: Response) -> Result<Response, TransportError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(TransportError::Status { status, message: error_message(&body) })
}

/// `message` (or `error`) from a JSON error body.
pub fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|k| json.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn builds_collection_and_item_urls() {
        let t = transport("http://localhost:5000");
        assert_eq!(t.collection_url(Resource::WellBeing).unwrap().as_str(), "http://localhost:5000/api/well-being");
        assert_eq!(t.item_url(Resource::Articles, "65f0").unwrap().as_str(), "http://localhost:5000/api/articles/65f0");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let t = transport("https://pharmacy.example.com/backend");
        assert_eq!(t.collection_url(Resource::Doctors).unwrap().as_str(), "https://pharmacy.example.com/backend/api/doctors");
    }

    #[test]
    fn item_ids_are_escaped() {
        let t = transport("http://localhost:5000/");
        assert_eq!(t.item_url(Resource::Categories, "a/b").unwrap().as_str(), "http://localhost:5000/api/categories/a%2Fb");
    }

    #[test]
    fn extracts_error_messages() {
        assert_eq!(error_message(r#"{"message":"Name is required"}"#).as_deref(), Some("Name is required"));
        assert_eq!(error_message(r#"{"error":"Duplicate slug"}"#).as_deref(), Some("Duplicate slug"));
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(""), None);
    }
}
