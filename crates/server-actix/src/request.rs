// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{HttpRequest, http::header::HeaderMap};
use common::http::{RequestHead, RequestPayload};
use serde_json::Value;

pub struct ActixRequestHead {
    // we cannot refer to HttpRequest directly, as it holds an Rc (and therefore does
    // not impl Send or Sync)
    headers: HeaderMap,
    method: actix_web::http::Method,
    path: String,
}

impl ActixRequestHead {
    pub fn from_request(req: &HttpRequest) -> ActixRequestHead {
        ActixRequestHead {
            headers: req.headers().clone(),
            method: req.method().clone(),
            path: req.path().to_string(),
        }
    }
}

impl RequestHead for ActixRequestHead {
    fn get_headers(&self, key: &str) -> Vec<String> {
        self.headers
            .get_all(key.to_lowercase())
            .filter_map(|h| h.to_str().ok())
            .map(|h| h.to_string())
            .collect()
    }

    fn get_method(&self) -> http::Method {
        // Actix uses http-0.2. However, the rest of the system uses
        // http-1.x, so we need to convert between the two.
        match self.method {
            actix_web::http::Method::GET => http::Method::GET,
            actix_web::http::Method::HEAD => http::Method::HEAD,
            actix_web::http::Method::OPTIONS => http::Method::OPTIONS,
            actix_web::http::Method::POST => http::Method::POST,
            actix_web::http::Method::PUT => http::Method::PUT,
            actix_web::http::Method::DELETE => http::Method::DELETE,
            actix_web::http::Method::PATCH => http::Method::PATCH,
            _ => http::Method::from_bytes(self.method.as_str().as_bytes()).unwrap_or_default(),
        }
    }

    fn get_path(&self) -> String {
        self.path.clone()
    }
}

pub struct ActixRequestPayload {
    pub head: ActixRequestHead,
    pub body: Value,
}

impl RequestPayload for ActixRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&mut self) -> Value {
        self.body.take()
    }
}
