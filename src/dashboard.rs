//! Record counts for the landing page.

use futures::future::join_all;
use tracing::warn;

use crate::resource::Resource;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub resource: Resource,
    /// `None` when the resource could not be fetched.
    pub count: Option<usize>,
}

impl Stat {
    pub fn label(&self) -> String {
        let name = self.resource.plural();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn display_count(&self) -> String {
        self.count.map_or_else(|| "unavailable".into(), |n| n.to_string())
    }
}

/// Count every resource concurrently. A failing resource does not fail the
/// others.
pub async fn collect<T: Transport>(transport: &T) -> Vec<Stat> {
    collect_for(transport, &Resource::ALL).await
}

pub async fn collect_for<T: Transport>(transport: &T, resources: &[Resource]) -> Vec<Stat> {
    let counts = join_all(resources.iter().map(|&resource| async move {
        match transport.list(resource).await {
            Ok(items) => Some(items.len()),
            Err(e) => {
                warn!(%resource, "count failed: {e}");
                None
            }
        }
    }))
    .await;
    resources.iter().zip(counts).map(|(&resource, count)| Stat { resource, count }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::{MemoryTransport, Op};
    use serde_json::json;

    #[tokio::test]
    async fn counts_each_resource() {
        let t = MemoryTransport::new();
        t.seed(Resource::Articles, vec![json!({ "_id": "1" }), json!({ "_id": "2" })]);
        t.seed(Resource::Doctors, vec![json!({ "_id": "d" })]);
        t.fail_next(Resource::Conditions, Op::List, None);

        let stats = collect(&t).await;
        assert_eq!(stats.len(), Resource::ALL.len());
        let get = |r: Resource| stats.iter().find(|s| s.resource == r).unwrap().clone();
        assert_eq!(get(Resource::Articles).count, Some(2));
        assert_eq!(get(Resource::Doctors).count, Some(1));
        assert_eq!(get(Resource::Categories).count, Some(0));
        assert_eq!(get(Resource::Conditions).count, None);
        assert_eq!(get(Resource::Conditions).display_count(), "unavailable");
    }

    #[test]
    fn labels_are_capitalised() {
        let s = Stat { resource: Resource::Doctors, count: Some(3) };
        assert_eq!(s.label(), "Doctors");
        assert_eq!(s.display_count(), "3");
    }
}
