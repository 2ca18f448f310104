use crate::config::Target;
use crate::error::Result;
use crate::pod::PodRef;
use futures::future::BoxFuture;

/// The cluster inventory capability: turns a [`Target`] filter into the list
/// of pods that currently match it.
///
/// Object-safe (boxed futures) so the engine can hold `Arc<dyn Inventory>`
/// and tests can substitute a canned implementation. The production
/// implementation lives in the `fanout-kube` crate.
///
/// A failure here is the one failure the engine does not absorb: it aborts
/// the enclosing action with [`FanoutError::Resolution`].
///
/// [`FanoutError::Resolution`]: crate::error::FanoutError::Resolution
pub trait Inventory: Send + Sync {
    fn list_pods<'a>(&'a self, target: &'a Target) -> BoxFuture<'a, Result<Vec<PodRef>>>;
}
