use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use batchpush_core::{HttpResponse, HttpTransport, PostRequest, TransportError};
use serde_json::Value;

type Scripted = Result<HttpResponse, TransportError>;

/// In-memory `HttpTransport` that records every request.
///
/// Responses are chosen by the first rule whose fragment appears in the
/// request URL (the API key is a convenient fragment to split iOS from
/// Android). Unmatched requests get a `201` with an empty JSON object.
#[derive(Default, Clone)]
pub struct MockTransport {
    rules: Arc<Mutex<Vec<(String, Scripted)>>>,
    requests: Arc<Mutex<Vec<PostRequest>>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer requests whose URL contains `fragment` with `status` and `body`.
    pub fn respond(self: &Arc<Self>, fragment: &str, status: u16, body: &str) -> Arc<Self> {
        self.rules.lock().unwrap().push((fragment.to_string(), Ok(HttpResponse::new(status, body))));
        Arc::clone(self)
    }

    /// Fail requests whose URL contains `fragment` at the transport level.
    pub fn fail(self: &Arc<Self>, fragment: &str, error: TransportError) -> Arc<Self> {
        self.rules.lock().unwrap().push((fragment.to_string(), Err(error)));
        Arc::clone(self)
    }

    pub fn requests(&self) -> Vec<PostRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Parsed JSON body of the request sent to a URL containing `fragment`.
    pub fn body_for(&self, fragment: &str) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|request| request.url.contains(fragment))
            .map(|request| serde_json::from_slice(&request.body).unwrap())
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(&self, request: PostRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Ok(HttpResponse::new(201, "{}")));

        self.requests.lock().unwrap().push(request);
        response
    }
}
