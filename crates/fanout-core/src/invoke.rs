//! Request invocation: one logical request against one pod, with the
//! request's retry/delay policy applied around the HTTP capability.

use crate::config::{Endpoint, Request};
use crate::http::HttpCall;
use crate::outcome::{Outcome, OutcomeStatus};
use crate::pod::PodRef;
use std::time::Instant;

/// Build the concrete URL for an endpoint aimed at a pod address.
/// `{pod}` in the path is replaced with the pod name.
pub fn build_url(endpoint: &Endpoint, address: &str, pod_name: &str) -> String {
    let path = endpoint.path.replace("{pod}", pod_name);
    format!(
        "{}://{}:{}{}",
        endpoint.scheme.as_str(),
        address,
        endpoint.port,
        path
    )
}

/// Execute one (pod, request) pairing and return its outcome.
///
/// Failures (non-2xx status or transport error) are retried up to
/// `request.retries` times with a fixed delay between attempts. A failed
/// outcome never propagates as an error — the executor records it and
/// continues.
pub async fn invoke(http: &dyn HttpCall, request: &Request, pod: &PodRef) -> Outcome {
    let endpoint = &request.endpoint;
    let started = Instant::now();

    let Some(address) = pod.address.as_deref() else {
        tracing::warn!(pod = %pod.name, request = %request.name, "pod has no assigned address");
        return Outcome {
            pod: pod.name.clone(),
            address: None,
            request: request.name.clone(),
            endpoint: endpoint.name.clone(),
            status: OutcomeStatus::Failed,
            attempts: 0,
            status_code: None,
            body: None,
            error: Some("pod has no assigned address".into()),
            elapsed_ms: 0,
        };
    };

    let url = build_url(endpoint, address, &pod.name);
    let max_attempts = request.retries + 1;
    let mut attempt = 0u32;
    let mut last_status = None;
    let mut last_body = None;
    let mut last_error = None;

    loop {
        attempt += 1;
        match http
            .call(
                endpoint.method,
                &url,
                &endpoint.headers,
                endpoint.body.as_ref(),
            )
            .await
        {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    pod = %pod.name,
                    request = %request.name,
                    status = response.status,
                    attempt,
                    "request succeeded"
                );
                return Outcome {
                    pod: pod.name.clone(),
                    address: Some(address.to_string()),
                    request: request.name.clone(),
                    endpoint: endpoint.name.clone(),
                    status: OutcomeStatus::Succeeded,
                    attempts: attempt,
                    status_code: Some(response.status),
                    body: Some(response.body),
                    error: None,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                };
            }
            Ok(response) => {
                last_error = Some(format!("unexpected status {}", response.status));
                last_status = Some(response.status);
                last_body = Some(response.body);
            }
            Err(e) => {
                last_error = Some(e.to_string());
                last_status = None;
                last_body = None;
            }
        }

        if attempt >= max_attempts {
            break;
        }
        tracing::warn!(
            pod = %pod.name,
            request = %request.name,
            attempt,
            delay_secs = request.retry_delay_secs,
            error = last_error.as_deref().unwrap_or(""),
            "request failed, retrying"
        );
        tokio::time::sleep(request.retry_delay()).await;
    }

    tracing::error!(
        pod = %pod.name,
        request = %request.name,
        attempts = attempt,
        error = last_error.as_deref().unwrap_or(""),
        "request failed, retries exhausted"
    );
    Outcome {
        pod: pod.name.clone(),
        address: Some(address.to_string()),
        request: request.name.clone(),
        endpoint: endpoint.name.clone(),
        status: OutcomeStatus::Failed,
        attempts: attempt,
        status_code: last_status,
        body: last_body,
        error: last_error,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
