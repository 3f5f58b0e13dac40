// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{HttpRequest, http::header::HeaderMap, web::Bytes};
use common::http::{RequestHead, RequestPayload};
use serde_json::Value;

/// Owned snapshot of the parts of an `HttpRequest` the router reads (`HttpRequest` itself is
/// not `Send`)
pub struct ActixRequestHead {
    headers: HeaderMap,
    method: actix_web::http::Method,
    path: String,
    query: Value,
}

impl ActixRequestHead {
    pub fn new(request: &HttpRequest, query: Value) -> Self {
        Self {
            headers: request.headers().clone(),
            method: request.method().clone(),
            path: request.path().to_string(),
            query,
        }
    }
}

impl RequestHead for ActixRequestHead {
    fn get_headers(&self, name: &str) -> Vec<String> {
        self.headers
            .get_all(name)
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    fn get_method(&self) -> http::Method {
        // Actix is still on http 0.2, so go through the method name
        http::Method::from_bytes(self.method.as_str().as_bytes()).unwrap_or_else(|err| {
            // Only GET and POST get past the router, so any other method will do here
            tracing::error!("Unsupported method {}: {}", self.method, err);
            http::Method::OPTIONS
        })
    }

    fn get_path(&self) -> String {
        self.path.clone()
    }

    fn get_query(&self) -> Value {
        self.query.clone()
    }
}

pub struct ActixRequestPayload {
    head: ActixRequestHead,
    body: Bytes,
}

impl ActixRequestPayload {
    pub fn new(head: ActixRequestHead, body: Bytes) -> Self {
        Self { head, body }
    }
}

impl RequestPayload for ActixRequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
        &self.head
    }

    fn take_body(&mut self) -> Bytes {
        std::mem::take(&mut self.body)
    }
}
