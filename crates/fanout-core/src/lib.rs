//! `fanout-core` — domain model and action execution engine.
//!
//! Operators declare named building blocks in YAML — [`Endpoint`]s (HTTP
//! call shapes), [`Target`]s (pod-selection filters), [`Request`]s (endpoint
//! + retry policy) — and compose them into [`Action`]s. The [`Engine`]
//! executes an action: it resolves which pods currently match, sorts and
//! windows them, and fires the configured requests pod-by-pod.
//!
//! ```text
//! Registry (load + resolve names once)
//!     │
//!     ▼
//! Engine::execute(action)
//!     │  Inventory::list_pods per target → concatenate
//!     │  sequence() → sort + circular window
//!     ▼
//! pods × requests traversal (loop_order)
//!     │  invoke() per pairing → HttpCall + retry/delay
//!     ▼
//! ActionResult (outcomes in traversal order)
//! ```
//!
//! The two capabilities at the boundary — [`Inventory`] (cluster pod
//! lookup) and [`HttpCall`] (one network call) — are trait objects so the
//! production implementations (`fanout-kube`, [`ReqwestCaller`]) and test
//! doubles plug in interchangeably.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod inventory;
pub mod invoke;
pub mod outcome;
pub mod pod;
pub mod registry;
pub mod sequence;

pub use config::{
    Action, ConfigDoc, Endpoint, LoopOrder, Method, PodCount, PodOrder, Request, Scheme, Target,
};
pub use engine::Engine;
pub use error::{FanoutError, Result};
pub use http::{HttpCall, HttpResponse, ReqwestCaller};
pub use inventory::Inventory;
pub use outcome::{ActionResult, Outcome, OutcomeStatus};
pub use pod::PodRef;
pub use registry::{Registry, RegistrySummary};
