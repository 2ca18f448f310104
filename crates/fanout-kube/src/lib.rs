//! `fanout-kube` — the cluster inventory capability for fanout.
//!
//! Implements [`fanout_core::Inventory`] against the Kubernetes API: a
//! [`Target`](fanout_core::Target) is evaluated as a namespaced pod list
//! (optionally narrowed by label selector), post-filtered by the target's
//! name regex and StatefulSet owner, and mapped into
//! [`PodRef`](fanout_core::PodRef)s carrying the pod IP and creation
//! timestamp the engine sorts on.
//!
//! Kept as its own crate so `fanout-core` stays free of kube types and the
//! engine can be tested without a cluster.

pub mod inventory;

pub use inventory::KubeInventory;
