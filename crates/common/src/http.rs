// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use bytes::Bytes;
use http::StatusCode;

/// A framework-independent view of an incoming HTTP request
pub trait RequestPayload {
    fn get_head(&self) -> &(dyn RequestHead + Send + Sync);

    /// Take the raw body. Subsequent calls return an empty body.
    fn take_body(&mut self) -> Bytes;
}

/// Response headers; names are stored lowercased
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(entries: Vec<(String, String)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
        }
    }

    /// First value for `name` (case-insensitive)
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries
            .iter()
            .find_map(|(n, value)| n.eq_ignore_ascii_case(name).then(|| value.clone()))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((name.into().to_ascii_lowercase(), value.into()));
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

pub struct ResponsePayload {
    pub body: ResponseBody,
    pub headers: Headers,
    pub status_code: StatusCode,
}

pub enum ResponseBody {
    Bytes(Vec<u8>),
    None,
}

impl ResponseBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ResponseBody::Bytes(bytes) => bytes,
            ResponseBody::None => &[],
        }
    }
}

/// Method, path, headers and query string of a request
pub trait RequestHead {
    /// Every value sent for the header `name`
    fn get_headers(&self, name: &str) -> Vec<String>;

    fn get_header(&self, name: &str) -> Option<String> {
        self.get_headers(name).into_iter().next()
    }

    fn get_path(&self) -> String;

    /// The query string decoded into a JSON object (or `Null` if there is none)
    fn get_query(&self) -> serde_json::Value;

    fn get_method(&self) -> http::Method;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_keys_are_case_insensitive() {
        let mut headers = Headers::from_vec(vec![("Content-Type".into(), "text/plain".into())]);
        headers.insert("ALLOW", "GET, POST");

        assert_eq!(headers.get("content-type"), Some("text/plain".into()));
        assert_eq!(headers.get("Allow"), Some("GET, POST".into()));
        assert_eq!(headers.get("location"), None);

        assert_eq!(
            headers.into_iter().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["content-type", "allow"]
        );
    }
}
