use crate::error::{FanoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Method / Scheme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

fn default_scheme() -> Scheme {
    Scheme::Http
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// A named HTTP call shape, independent of which pod it is aimed at.
///
/// The `path` may contain `{pod}`, which is replaced with the pod name when
/// the concrete URL is built at invocation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub method: Method,
    pub path: String,
    pub port: u16,
    #[serde(default = "default_scheme")]
    pub scheme: Scheme,
    /// Headers sent with every request to this endpoint.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Optional JSON body sent with the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// A named pod-selection filter. Stateless: re-evaluated on every action run
/// so pod membership changes between runs are picked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    /// Namespace to list pods in; falls back to the client's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Kubernetes label selector, e.g. `app=store,tier=backend`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Regex matched against pod names, e.g. `^client-[0-9]+$`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,
    /// Only match pods owned by this StatefulSet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stateful_set: Option<String>,
}

impl Target {
    /// Reject patterns that would fail at resolution time.
    pub fn validate(&self) -> Result<()> {
        if let Some(pattern) = &self.name_pattern {
            regex::Regex::new(pattern).map_err(|e| {
                FanoutError::InvalidConfig(format!(
                    "target '{}' has invalid name_pattern: {e}",
                    self.name
                ))
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Raw request declaration as it appears in a config document; the endpoint
/// is referenced by name and resolved by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSpec {
    pub name: String,
    pub endpoint: String,
    /// Number of retries after a failed attempt (not counting the initial one).
    #[serde(default)]
    pub retries: u32,
    /// Fixed delay between attempts, in seconds. May be zero.
    #[serde(default)]
    pub retry_delay_secs: f64,
}

impl RequestSpec {
    pub fn validate(&self) -> Result<()> {
        if !self.retry_delay_secs.is_finite() || self.retry_delay_secs < 0.0 {
            return Err(FanoutError::InvalidConfig(format!(
                "request '{}' has negative or non-finite retry_delay_secs",
                self.name
            )));
        }
        Ok(())
    }
}

/// A resolved request: how to call an endpoint resiliently.
#[derive(Debug, Clone)]
pub struct Request {
    pub name: String,
    pub endpoint: Arc<Endpoint>,
    pub retries: u32,
    pub retry_delay_secs: f64,
}

impl Request {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay_secs)
    }
}

// ---------------------------------------------------------------------------
// Action ordering / windowing parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodOrder {
    NameAscending,
    NameDescending,
    CreationTime,
    Random,
}

fn default_order() -> PodOrder {
    PodOrder::NameAscending
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopOrder {
    /// For each pod in window order, perform every request before moving on.
    PodsOuter,
    /// For each request in list order, hit every pod before moving on.
    RequestsOuter,
}

/// Number of pods an action's window takes from the sorted list: either a
/// fixed count (which may exceed the resolved pod count, wrapping around) or
/// the literal `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodCount {
    All,
    Count(usize),
}

impl Serialize for PodCount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PodCount::All => serializer.serialize_str("all"),
            PodCount::Count(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl<'de> Deserialize<'de> for PodCount {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct PodCountVisitor;

        impl serde::de::Visitor<'_> for PodCountVisitor {
            type Value = PodCount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer or the string \"all\"")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<PodCount, E> {
                Ok(PodCount::Count(v as usize))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<PodCount, E> {
                if v < 0 {
                    return Err(E::custom("pod_count must be non-negative"));
                }
                Ok(PodCount::Count(v as usize))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<PodCount, E> {
                if v == "all" {
                    Ok(PodCount::All)
                } else {
                    Err(E::custom(format!("expected \"all\", got \"{v}\"")))
                }
            }
        }

        deserializer.deserialize_any(PodCountVisitor)
    }
}

fn default_pod_count() -> PodCount {
    PodCount::All
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Raw action declaration; targets and requests are referenced by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    pub targets: Vec<String>,
    pub requests: Vec<String>,
    #[serde(default = "default_order")]
    pub order: PodOrder,
    #[serde(default)]
    pub pod_start_index: usize,
    #[serde(default = "default_pod_count")]
    pub pod_count: PodCount,
    pub loop_order: LoopOrder,
}

/// A resolved action: one executable unit of work. Holds shared handles to
/// its targets and requests — name resolution happens once at load time,
/// never during execution.
#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub targets: Vec<Arc<Target>>,
    pub requests: Vec<Arc<Request>>,
    pub order: PodOrder,
    pub pod_start_index: usize,
    pub pod_count: PodCount,
    pub loop_order: LoopOrder,
}

// ---------------------------------------------------------------------------
// ConfigDoc (top-level document)
// ---------------------------------------------------------------------------

/// One parsed configuration document. Multiple documents are merged
/// section-wise, in file order, before the registry resolves references.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigDoc {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub requests: Vec<RequestSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

impl ConfigDoc {
    pub fn from_yaml(data: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn merge(&mut self, other: ConfigDoc) {
        self.endpoints.extend(other.endpoints);
        self.targets.extend(other.targets);
        self.requests.extend(other.requests);
        self.actions.extend(other.actions);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
