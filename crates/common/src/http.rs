// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use http::StatusCode;
use serde_json::Value;

pub trait RequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync);
    fn take_body(&mut self) -> Value;
}

#[derive(Debug, Clone, Default)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self { inner: vec![] }
    }

    pub fn from_vec(vec: Vec<(String, String)>) -> Self {
        Self {
            inner: vec
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .iter()
            .find(|(k, _)| k == &key.to_lowercase())
            .map(|(_, v)| v.clone())
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.inner.push((key.to_lowercase(), value));
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

pub struct ResponsePayload {
    pub body: ResponseBody,
    pub headers: Headers,
    pub status_code: StatusCode,
}

impl ResponsePayload {
    /// A JSON response with the `content-type` header set
    pub fn json(value: &Value, status_code: StatusCode) -> Self {
        let mut headers = Headers::new();
        headers.insert("content-type".into(), "application/json".into());

        Self {
            body: ResponseBody::Bytes(value.to_string().into_bytes()),
            headers,
            status_code,
        }
    }
}

pub enum ResponseBody {
    Bytes(Vec<u8>),
    None,
}

impl ResponseBody {
    pub fn to_json(self) -> Result<Value, serde_json::Error> {
        match self {
            ResponseBody::Bytes(bytes) => serde_json::from_slice(&bytes),
            ResponseBody::None => Ok(Value::Null),
        }
    }
}

/// Represents a HTTP request from which information can be extracted
pub trait RequestHead {
    // return all header values that have the following key
    fn get_headers(&self, key: &str) -> Vec<String>;

    // return the first header
    fn get_header(&self, key: &str) -> Option<String> {
        self.get_headers(&key.to_lowercase()).first().cloned()
    }

    fn get_path(&self) -> String;

    fn get_method(&self) -> http::Method;
}

/// A request head held in memory, used by tests and by callers without a transport
pub struct MemoryRequestHead {
    headers: HashMap<String, Vec<String>>,
    method: http::Method,
    path: String,
}

impl MemoryRequestHead {
    pub fn new(headers: HashMap<String, Vec<String>>, method: http::Method, path: String) -> Self {
        Self {
            headers: headers
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
            method,
            path,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HashMap::new(), http::Method::POST, path.into())
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers
            .entry(key.to_lowercase())
            .or_default()
            .push(value.into());
        self
    }
}

impl RequestHead for MemoryRequestHead {
    fn get_headers(&self, key: &str) -> Vec<String> {
        self.headers
            .get(&key.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    fn get_path(&self) -> String {
        self.path.clone()
    }

    fn get_method(&self) -> http::Method {
        self.method.clone()
    }
}

/// A request whose body is already parsed as JSON
pub struct MemoryRequestPayload {
    head: MemoryRequestHead,
    body: Value,
}

impl MemoryRequestPayload {
    pub fn new(body: Value, head: MemoryRequestHead) -> Self {
        Self { head, body }
    }
}

impl RequestPayload for MemoryRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&mut self) -> Value {
        self.body.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive() {
        let head = MemoryRequestHead::post("/graphql").with_header("Authorization", "Bearer abc");

        assert_eq!(head.get_header("authorization"), Some("Bearer abc".to_string()));
        assert_eq!(head.get_header("AUTHORIZATION"), Some("Bearer abc".to_string()));
        assert_eq!(head.get_header("x-other"), None);
    }

    #[test]
    fn json_response() {
        let response = ResponsePayload::json(&serde_json::json!({"data": null}), StatusCode::OK);

        assert_eq!(
            response.headers.get("Content-Type"),
            Some("application/json".to_string())
        );
        assert_eq!(
            response.body.to_json().unwrap(),
            serde_json::json!({"data": null})
        );
    }
}
