use fanout_core::error::{FanoutError, Result};
use fanout_core::{Inventory, PodRef, Target};
use futures::future::BoxFuture;
use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use kube::{Api, Client};
use regex::Regex;

// ---------------------------------------------------------------------------
// KubeInventory
// ---------------------------------------------------------------------------

/// [`Inventory`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeInventory {
    client: Client,
}

impl KubeInventory {
    /// Connect using the ambient kubeconfig or in-cluster service account.
    pub async fn connect() -> std::result::Result<Self, kube::Error> {
        let client = Client::try_default().await?;
        Ok(Self { client })
    }

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Inventory for KubeInventory {
    fn list_pods<'a>(&'a self, target: &'a Target) -> BoxFuture<'a, Result<Vec<PodRef>>> {
        Box::pin(async move {
            let namespace = target
                .namespace
                .clone()
                .unwrap_or_else(|| self.client.default_namespace().to_string());

            let api: Api<Pod> = Api::namespaced(self.client.clone(), &namespace);
            let mut params = ListParams::default();
            if let Some(selector) = &target.selector {
                params = params.labels(selector);
            }

            let pods = api.list(&params).await.map_err(|e| {
                FanoutError::Resolution {
                    target: target.name.clone(),
                    reason: e.to_string(),
                }
            })?;

            // Pattern was validated at config load; a failure here means the
            // target was built outside the registry.
            let pattern = match &target.name_pattern {
                Some(p) => Some(Regex::new(p).map_err(|e| FanoutError::Resolution {
                    target: target.name.clone(),
                    reason: format!("invalid name_pattern: {e}"),
                })?),
                None => None,
            };

            let refs: Vec<PodRef> = pods
                .items
                .into_iter()
                .filter(|pod| matches(target, pattern.as_ref(), pod))
                .map(|pod| pod_ref(target, &namespace, pod))
                .collect();

            tracing::debug!(
                target = %target.name,
                namespace = %namespace,
                pods = refs.len(),
                "listed pods"
            );
            Ok(refs)
        })
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Apply the target's post-list filters (name regex, StatefulSet owner).
/// The label selector was already applied server-side.
fn matches(target: &Target, pattern: Option<&Regex>, pod: &Pod) -> bool {
    let name = pod.metadata.name.as_deref().unwrap_or_default();

    if let Some(pattern) = pattern {
        if !pattern.is_match(name) {
            return false;
        }
    }

    if let Some(stateful_set) = &target.stateful_set {
        let owned = pod
            .metadata
            .owner_references
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|owner| owner.kind == "StatefulSet" && owner.name == *stateful_set);
        if !owned {
            return false;
        }
    }

    true
}

fn pod_ref(target: &Target, namespace: &str, pod: Pod) -> PodRef {
    PodRef {
        name: pod.metadata.name.unwrap_or_default(),
        namespace: namespace.to_string(),
        address: pod.status.and_then(|s| s.pod_ip),
        created_at: pod.metadata.creation_timestamp.map(|t| t.0),
        target: target.name.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
