//! The config registry: loads YAML documents, validates them, and resolves
//! name references once into shared handles. Read-only after load.

use crate::config::{Action, ConfigDoc, Endpoint, Request, Target};
use crate::error::{FanoutError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Named, validated configuration objects with all cross-references
/// resolved. Actions keep their declaration order for batch mode.
#[derive(Debug, Clone)]
pub struct Registry {
    endpoints: HashMap<String, Arc<Endpoint>>,
    targets: HashMap<String, Arc<Target>>,
    requests: HashMap<String, Arc<Request>>,
    actions: Vec<Arc<Action>>,
    actions_by_name: HashMap<String, Arc<Action>>,
}

impl Registry {
    /// Read and merge one or more YAML config files, then build the registry.
    /// Any validation failure here means the process refuses to start.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut merged = ConfigDoc::default();
        for path in paths {
            tracing::info!(path = %path.as_ref().display(), "loading config");
            let data = std::fs::read_to_string(path)?;
            merged.merge(ConfigDoc::from_yaml(&data)?);
        }
        Self::build(merged)
    }

    /// Validate a merged document and resolve every name reference.
    pub fn build(doc: ConfigDoc) -> Result<Self> {
        let mut endpoints = HashMap::new();
        for endpoint in doc.endpoints {
            insert_unique(&mut endpoints, "endpoint", endpoint.name.clone(), endpoint)?;
        }

        let mut targets = HashMap::new();
        for target in doc.targets {
            target.validate()?;
            insert_unique(&mut targets, "target", target.name.clone(), target)?;
        }

        let mut requests: HashMap<String, Arc<Request>> = HashMap::new();
        for spec in doc.requests {
            spec.validate()?;
            let endpoint = endpoints
                .get(&spec.endpoint)
                .cloned()
                .ok_or_else(|| FanoutError::UnknownEndpoint(spec.endpoint.clone()))?;
            let request = Request {
                name: spec.name.clone(),
                endpoint,
                retries: spec.retries,
                retry_delay_secs: spec.retry_delay_secs,
            };
            insert_unique(&mut requests, "request", spec.name, request)?;
        }

        let mut actions = Vec::new();
        let mut actions_by_name = HashMap::new();
        for spec in doc.actions {
            let resolved_targets = spec
                .targets
                .iter()
                .map(|name| {
                    targets
                        .get(name)
                        .cloned()
                        .ok_or_else(|| FanoutError::UnknownTarget(name.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
            let resolved_requests = spec
                .requests
                .iter()
                .map(|name| {
                    requests
                        .get(name)
                        .cloned()
                        .ok_or_else(|| FanoutError::UnknownRequest(name.clone()))
                })
                .collect::<Result<Vec<_>>>()?;

            let action = Arc::new(Action {
                name: spec.name.clone(),
                targets: resolved_targets,
                requests: resolved_requests,
                order: spec.order,
                pod_start_index: spec.pod_start_index,
                pod_count: spec.pod_count,
                loop_order: spec.loop_order,
            });
            if actions_by_name
                .insert(spec.name.clone(), action.clone())
                .is_some()
            {
                return Err(FanoutError::DuplicateName {
                    kind: "action",
                    name: spec.name,
                });
            }
            actions.push(action);
        }

        Ok(Self {
            endpoints,
            targets,
            requests,
            actions,
            actions_by_name,
        })
    }

    pub fn endpoint(&self, name: &str) -> Result<Arc<Endpoint>> {
        self.endpoints
            .get(name)
            .cloned()
            .ok_or_else(|| FanoutError::UnknownEndpoint(name.into()))
    }

    pub fn target(&self, name: &str) -> Result<Arc<Target>> {
        self.targets
            .get(name)
            .cloned()
            .ok_or_else(|| FanoutError::UnknownTarget(name.into()))
    }

    pub fn request(&self, name: &str) -> Result<Arc<Request>> {
        self.requests
            .get(name)
            .cloned()
            .ok_or_else(|| FanoutError::UnknownRequest(name.into()))
    }

    pub fn action(&self, name: &str) -> Result<Arc<Action>> {
        self.actions_by_name
            .get(name)
            .cloned()
            .ok_or_else(|| FanoutError::UnknownAction(name.into()))
    }

    /// All actions in declaration order.
    pub fn actions(&self) -> &[Arc<Action>] {
        &self.actions
    }

    pub fn summary(&self) -> RegistrySummary {
        let mut endpoints: Vec<_> = self.endpoints.keys().cloned().collect();
        endpoints.sort();
        let mut targets: Vec<_> = self.targets.keys().cloned().collect();
        targets.sort();
        let mut requests: Vec<_> = self.requests.keys().cloned().collect();
        requests.sort();
        let actions = self.actions.iter().map(|a| a.name.clone()).collect();
        RegistrySummary {
            endpoints,
            targets,
            requests,
            actions,
        }
    }
}

fn insert_unique<T>(
    map: &mut HashMap<String, Arc<T>>,
    kind: &'static str,
    name: String,
    value: T,
) -> Result<()> {
    if map.insert(name.clone(), Arc::new(value)).is_some() {
        return Err(FanoutError::DuplicateName { kind, name });
    }
    Ok(())
}

/// Loaded object names per section; actions in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    pub endpoints: Vec<String>,
    pub targets: Vec<String>,
    pub requests: Vec<String>,
    pub actions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
