#![allow(dead_code)]

use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration as StdDuration;
use tiny_http::{Header, Response, Server};

#[derive(Debug)]
pub struct MockHttpResponse {
    pub status: u16,
    pub body: Option<Value>,
    pub delay: Option<StdDuration>,
}

impl MockHttpResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: StdDuration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub params: HashMap<String, String>,
    pub user_agent: Option<String>,
}

pub fn spawn_json_sequence_server(
    responses: Vec<MockHttpResponse>,
) -> (String, Receiver<CapturedRequest>, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("mock server");
    let base_url = format!("http://{}", server.server_addr());
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        for response_spec in responses {
            let request = match server.recv_timeout(StdDuration::from_secs(8)) {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(_) => break,
            };

            let parsed =
                Url::parse(&format!("http://localhost{}", request.url())).expect("request url");
            let params = parsed
                .query_pairs()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<HashMap<String, String>>();
            let user_agent = request
                .headers()
                .iter()
                .find(|header| header.field.equiv("User-Agent"))
                .map(|header| header.value.to_string());
            let _ = tx.send(CapturedRequest {
                path: parsed.path().to_string(),
                params,
                user_agent,
            });

            if let Some(delay) = response_spec.delay {
                thread::sleep(delay);
            }

            let mut response = match response_spec.body {
                Some(body) => {
                    let mut response = Response::from_string(body.to_string());
                    response.add_header(
                        Header::from_bytes("Content-Type", "application/json")
                            .expect("content-type header"),
                    );
                    response
                }
                None => Response::from_string(String::new()),
            };
            response = response.with_status_code(response_spec.status);
            let _ = request.respond(response);
        }
    });

    (base_url, rx, handle)
}

pub fn join_with_timeout(handle: thread::JoinHandle<()>, timeout: StdDuration) {
    let start = std::time::Instant::now();
    while !handle.is_finished() {
        assert!(
            start.elapsed() < timeout,
            "mock server join timed out after {:?}",
            timeout
        );
        thread::sleep(StdDuration::from_millis(10));
    }
    handle.join().expect("mock server thread panicked");
}
