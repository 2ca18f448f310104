//! The action execution engine: resolve targets, sequence the pod window,
//! and drive the pods×requests traversal.

use crate::config::{Action, LoopOrder};
use crate::error::Result;
use crate::http::HttpCall;
use crate::inventory::Inventory;
use crate::invoke::invoke;
use crate::outcome::ActionResult;
use crate::pod::PodRef;
use crate::sequence::sequence;
use std::sync::Arc;

/// Executes declarative [`Action`]s against a dynamic pod set.
///
/// Holds no mutable state across executions, so concurrent `execute` calls
/// for independent actions are safe. Within one execution, invocations are
/// strictly sequential: outcome order equals traversal order and targets are
/// never hit by more than one in-flight request.
#[derive(Clone)]
pub struct Engine {
    inventory: Arc<dyn Inventory>,
    http: Arc<dyn HttpCall>,
}

impl Engine {
    pub fn new(inventory: Arc<dyn Inventory>, http: Arc<dyn HttpCall>) -> Self {
        Self { inventory, http }
    }

    /// Execute one action to completion.
    ///
    /// Returns `Err` only when pod resolution itself fails; individual call
    /// failures are recorded in the outcomes and never abort the traversal.
    pub async fn execute(&self, action: &Action) -> Result<ActionResult> {
        let resolved = self.resolve(action).await?;
        tracing::debug!(
            action = %action.name,
            pods = resolved.len(),
            "resolved target pods"
        );

        let pods = sequence(
            resolved,
            action.order,
            action.pod_start_index,
            action.pod_count,
        );
        tracing::info!(
            action = %action.name,
            pods = pods.len(),
            requests = action.requests.len(),
            "executing action"
        );

        let mut outcomes = Vec::with_capacity(pods.len() * action.requests.len());
        match action.loop_order {
            LoopOrder::PodsOuter => {
                for pod in &pods {
                    for request in &action.requests {
                        outcomes.push(invoke(self.http.as_ref(), request, pod).await);
                    }
                }
            }
            LoopOrder::RequestsOuter => {
                for request in &action.requests {
                    for pod in &pods {
                        outcomes.push(invoke(self.http.as_ref(), request, pod).await);
                    }
                }
            }
        }

        Ok(ActionResult::new(&action.name, outcomes))
    }

    /// Resolve every target in list order and concatenate. Pods matching
    /// multiple targets appear once per match — duplicates are preserved so
    /// an action can deliberately over-weight pods.
    async fn resolve(&self, action: &Action) -> Result<Vec<PodRef>> {
        let mut pods = Vec::new();
        for target in &action.targets {
            pods.extend(self.inventory.list_pods(target).await?);
        }
        Ok(pods)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Endpoint, Method, PodCount, PodOrder, Request, Scheme, Target,
    };
    use crate::error::FanoutError;
    use crate::http::HttpResponse;
    use crate::outcome::OutcomeStatus;
    use futures::future::BoxFuture;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // -- canned inventory ---------------------------------------------------

    /// Inventory serving a fixed pod list per target name.
    struct StaticInventory {
        pods: HashMap<String, Vec<PodRef>>,
    }

    impl StaticInventory {
        fn new(entries: &[(&str, &[&str])]) -> Self {
            let pods = entries
                .iter()
                .map(|(target, names)| {
                    let refs = names
                        .iter()
                        .map(|name| PodRef {
                            name: (*name).into(),
                            namespace: "test".into(),
                            address: Some(format!("ip-{name}")),
                            created_at: None,
                            target: (*target).into(),
                        })
                        .collect();
                    ((*target).to_string(), refs)
                })
                .collect();
            Self { pods }
        }
    }

    impl Inventory for StaticInventory {
        fn list_pods<'a>(&'a self, target: &'a Target) -> BoxFuture<'a, Result<Vec<PodRef>>> {
            Box::pin(async move {
                self.pods.get(&target.name).cloned().ok_or_else(|| {
                    FanoutError::Resolution {
                        target: target.name.clone(),
                        reason: "no such target".into(),
                    }
                })
            })
        }
    }

    struct FailingInventory;

    impl Inventory for FailingInventory {
        fn list_pods<'a>(&'a self, target: &'a Target) -> BoxFuture<'a, Result<Vec<PodRef>>> {
            Box::pin(async move {
                Err(FanoutError::Resolution {
                    target: target.name.clone(),
                    reason: "cluster API unreachable".into(),
                })
            })
        }
    }

    // -- scripted HTTP capability -------------------------------------------

    /// Records every URL called; fails the first `fail_times` calls per URL
    /// (or every call to URLs containing `always_fail`).
    struct ScriptedHttp {
        calls: Mutex<Vec<String>>,
        hits: Mutex<HashMap<String, u32>>,
        fail_times: u32,
        always_fail: Option<String>,
    }

    impl ScriptedHttp {
        fn ok() -> Self {
            Self::failing(0)
        }

        fn failing(fail_times: u32) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                hits: Mutex::new(HashMap::new()),
                fail_times,
                always_fail: None,
            }
        }

        fn always_failing_for(fragment: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                hits: Mutex::new(HashMap::new()),
                fail_times: 0,
                always_fail: Some(fragment.into()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl HttpCall for ScriptedHttp {
        fn call<'a>(
            &'a self,
            _method: Method,
            url: &'a str,
            _headers: &'a HashMap<String, String>,
            _body: Option<&'a serde_json::Value>,
        ) -> BoxFuture<'a, Result<HttpResponse>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(url.to_string());
                let mut hits = self.hits.lock().unwrap();
                let hit = hits.entry(url.to_string()).or_insert(0);
                *hit += 1;

                let always_fail = self
                    .always_fail
                    .as_deref()
                    .is_some_and(|fragment| url.contains(fragment));
                if always_fail || *hit <= self.fail_times {
                    Ok(HttpResponse {
                        status: 500,
                        body: "boom".into(),
                    })
                } else {
                    Ok(HttpResponse {
                        status: 200,
                        body: "ok".into(),
                    })
                }
            })
        }
    }

    // -- fixtures -----------------------------------------------------------

    fn target(name: &str) -> Arc<Target> {
        Arc::new(Target {
            name: name.into(),
            namespace: None,
            selector: None,
            name_pattern: None,
            stateful_set: None,
        })
    }

    fn request(name: &str, path: &str, retries: u32) -> Arc<Request> {
        Arc::new(Request {
            name: name.into(),
            endpoint: Arc::new(Endpoint {
                name: format!("{name}-endpoint"),
                method: Method::Get,
                path: path.into(),
                port: 80,
                scheme: Scheme::Http,
                headers: HashMap::new(),
                body: None,
            }),
            retries,
            retry_delay_secs: 0.0,
        })
    }

    fn action(targets: Vec<Arc<Target>>, requests: Vec<Arc<Request>>) -> Action {
        Action {
            name: "test-action".into(),
            targets,
            requests,
            order: PodOrder::NameAscending,
            pod_start_index: 0,
            pod_count: PodCount::All,
            loop_order: LoopOrder::PodsOuter,
        }
    }

    fn engine(inventory: impl Inventory + 'static, http: impl HttpCall + 'static) -> Engine {
        Engine::new(Arc::new(inventory), Arc::new(http))
    }

    // -- tests --------------------------------------------------------------

    #[tokio::test]
    async fn concatenates_targets_without_dedup() {
        let inventory = StaticInventory::new(&[
            ("set", &["p0", "p1", "p2"]),
            ("pattern", &["p1", "p2"]),
        ]);
        let http = ScriptedHttp::ok();
        let engine = engine(inventory, http);

        let action = action(
            vec![target("set"), target("pattern")],
            vec![request("ping", "/ping", 0)],
        );
        let result = engine.execute(&action).await.unwrap();

        // 3 + 2 pods, duplicates preserved.
        assert_eq!(result.outcomes.len(), 5);
        let pods: Vec<_> = result.outcomes.iter().map(|o| o.pod.as_str()).collect();
        assert_eq!(pods, ["p0", "p1", "p1", "p2", "p2"]);
    }

    #[tokio::test]
    async fn pods_outer_traversal_order() {
        let inventory = StaticInventory::new(&[("set", &["p1", "p2"])]);
        let http = Arc::new(ScriptedHttp::ok());
        let engine = Engine::new(Arc::new(inventory), http.clone());

        let mut action = action(
            vec![target("set")],
            vec![request("r1", "/r1", 0), request("r2", "/r2", 0)],
        );
        action.loop_order = LoopOrder::PodsOuter;
        let result = engine.execute(&action).await.unwrap();

        assert_eq!(
            http.calls(),
            [
                "http://ip-p1:80/r1",
                "http://ip-p1:80/r2",
                "http://ip-p2:80/r1",
                "http://ip-p2:80/r2",
            ]
        );
        // Outcome order matches traversal order.
        let pairs: Vec<_> = result
            .outcomes
            .iter()
            .map(|o| format!("{}/{}", o.pod, o.request))
            .collect();
        assert_eq!(pairs, ["p1/r1", "p1/r2", "p2/r1", "p2/r2"]);
    }

    #[tokio::test]
    async fn requests_outer_traversal_order() {
        let inventory = StaticInventory::new(&[("set", &["p1", "p2"])]);
        let http = Arc::new(ScriptedHttp::ok());
        let engine = Engine::new(Arc::new(inventory), http.clone());

        let mut action = action(
            vec![target("set")],
            vec![request("r1", "/r1", 0), request("r2", "/r2", 0)],
        );
        action.loop_order = LoopOrder::RequestsOuter;
        engine.execute(&action).await.unwrap();

        assert_eq!(
            http.calls(),
            [
                "http://ip-p1:80/r1",
                "http://ip-p2:80/r1",
                "http://ip-p1:80/r2",
                "http://ip-p2:80/r2",
            ]
        );
    }

    #[tokio::test]
    async fn windowing_applies_before_traversal() {
        let inventory = StaticInventory::new(&[("set", &["a", "b", "c"])]);
        let http = ScriptedHttp::ok();
        let engine = engine(inventory, http);

        let mut action = action(vec![target("set")], vec![request("ping", "/ping", 0)]);
        action.pod_start_index = 2;
        action.pod_count = PodCount::Count(4);
        let result = engine.execute(&action).await.unwrap();

        let pods: Vec<_> = result.outcomes.iter().map(|o| o.pod.as_str()).collect();
        assert_eq!(pods, ["c", "a", "b", "c"]);
    }

    #[tokio::test]
    async fn retry_succeeds_on_second_attempt() {
        let inventory = StaticInventory::new(&[("set", &["p1"])]);
        let http = ScriptedHttp::failing(1);
        let engine = engine(inventory, http);

        let action = action(vec![target("set")], vec![request("ping", "/ping", 2)]);
        let result = engine.execute(&action).await.unwrap();

        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.outcomes[0].status, OutcomeStatus::Succeeded);
        assert_eq!(result.outcomes[0].attempts, 2);
    }

    #[tokio::test]
    async fn partial_failure_does_not_abort_action() {
        let inventory = StaticInventory::new(&[("set", &["bad", "good"])]);
        let http = ScriptedHttp::always_failing_for("ip-bad");
        let engine = engine(inventory, http);

        let action = action(vec![target("set")], vec![request("ping", "/ping", 2)]);
        let result = engine.execute(&action).await.unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.succeeded, 1);
        assert_eq!(result.outcomes[0].pod, "bad");
        assert_eq!(result.outcomes[0].status, OutcomeStatus::Failed);
        assert_eq!(result.outcomes[0].attempts, 3);
        assert_eq!(result.outcomes[1].status, OutcomeStatus::Succeeded);
    }

    #[tokio::test]
    async fn resolution_failure_aborts_with_no_outcomes() {
        let http = Arc::new(ScriptedHttp::ok());
        let engine = Engine::new(Arc::new(FailingInventory), http.clone());

        let action = action(vec![target("set")], vec![request("ping", "/ping", 0)]);
        let err = engine.execute(&action).await.unwrap_err();

        assert!(matches!(err, FanoutError::Resolution { .. }));
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_pod_set_yields_empty_result() {
        let inventory = StaticInventory::new(&[("set", &[])]);
        let http = ScriptedHttp::ok();
        let engine = engine(inventory, http);

        let mut action = action(vec![target("set")], vec![request("ping", "/ping", 0)]);
        action.pod_start_index = 5;
        action.pod_count = PodCount::Count(10);
        let result = engine.execute(&action).await.unwrap();

        assert!(result.outcomes.is_empty());
        assert_eq!(result.failed, 0);
    }
}
