// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use serde_json::{Map, Value, json};
use tracing::{error, instrument, warn};

use common::env_const::{
    get_graphql_http_path, is_batch_enabled, is_pretty_json, should_catch_errors,
};
use common::http::{Headers, RequestHead, RequestPayload, ResponseBody, ResponsePayload};
use common::router::Router;
use http_query::{
    ErrorPolicy, ExecuteOptions, GraphQLExecutor, HttpMethod, HttpQueryConfig, HttpQueryError,
    encode_execution_results, json::json_encode, json::load_json_body, run_http_query,
};
use nextql_env::{EnvError, Environment};

const APPLICATION_GRAPHQL: &str = "application/graphql";

pub struct GraphQLRouter {
    executor: Arc<dyn GraphQLExecutor>,
    config: HttpQueryConfig,
    execute_options: ExecuteOptions,
    pretty: bool,
    env: Arc<dyn Environment>,
}

impl GraphQLRouter {
    pub fn new(
        executor: Arc<dyn GraphQLExecutor>,
        config: HttpQueryConfig,
        pretty: bool,
        env: Arc<dyn Environment>,
    ) -> Self {
        Self {
            executor,
            config,
            execute_options: ExecuteOptions::default(),
            pretty,
            env,
        }
    }

    /// Create a router configured from `NEXTQL_BATCH_ENABLED`, `NEXTQL_CATCH_ERRORS` and
    /// `NEXTQL_PRETTY_JSON`.
    pub fn from_env(
        executor: Arc<dyn GraphQLExecutor>,
        env: Arc<dyn Environment>,
    ) -> Result<Self, EnvError> {
        let config = HttpQueryConfig {
            batch_enabled: is_batch_enabled(env.as_ref())?,
            error_policy: ErrorPolicy::from_catch_errors(should_catch_errors(env.as_ref())?),
        };
        let pretty = is_pretty_json(env.as_ref())?;

        Ok(Self::new(executor, config, pretty, env))
    }

    pub fn with_execute_options(mut self, execute_options: ExecuteOptions) -> Self {
        self.execute_options = execute_options;
        self
    }

    fn suitable(&self, request_head: &(dyn RequestHead + Send + Sync)) -> bool {
        request_head.get_path() == get_graphql_http_path(self.env.as_ref())
    }

    fn json_response(
        &self,
        body: &Value,
        status_code: StatusCode,
        mut headers: Headers,
    ) -> ResponsePayload {
        match json_encode(body, self.pretty) {
            Ok(body) => {
                headers.insert("content-type", "application/json");
                ResponsePayload {
                    body: ResponseBody::Bytes(body.into_bytes()),
                    headers,
                    status_code,
                }
            }
            Err(e) => internal_error_response(e),
        }
    }

    fn error_response(&self, error: HttpQueryError) -> ResponsePayload {
        let body = json!({ "errors": [{ "message": error.to_string() }] });

        self.json_response(&body, error.status_code(), Headers::from_vec(error.headers()))
    }
}

#[async_trait]
impl Router for GraphQLRouter {
    /// Resolves an incoming GraphQL request (single or batch), returning the JSON-encoded results
    /// or, if the request itself is invalid, a JSON list of errors along with the matching status
    /// code.
    #[instrument(
        name = "GraphQLRouter::route",
        skip(self, request)
    )]
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        if !self.suitable(request.get_head()) {
            return None;
        }

        let head = request.get_head();
        let method = head.get_method();
        let content_type = head.get_header(http::header::CONTENT_TYPE.as_str());
        let query_string = head.get_query();

        // Reject other methods before looking at the body
        if let Err(e) = method.as_str().parse::<HttpMethod>() {
            warn!(%method, "Rejecting request with unsupported method");
            return Some(self.error_response(e));
        }

        let body = match parse_body(&method, request.take_body(), content_type.as_deref()) {
            Ok(body) => body,
            Err(e) => return Some(self.error_response(e)),
        };
        let is_batch = body.is_array();

        let response = run_http_query(
            self.executor.as_ref(),
            method.as_str(),
            body,
            query_string.as_object(),
            self.config,
            &self.execute_options,
        )
        .await;

        let responses = match response {
            Ok((responses, _)) => responses,
            Err(e) => {
                if is_client_error(&e) {
                    warn!("Rejected request: {}", e);
                } else {
                    error!("Error while resolving request: {}", e);
                }
                return Some(self.error_response(e));
            }
        };

        Some(
            match encode_execution_results(&responses, is_batch, self.pretty) {
                Ok(encoded) => {
                    let mut headers = Headers::new();
                    headers.insert("content-type", "application/json");
                    ResponsePayload {
                        body: ResponseBody::Bytes(encoded.body.into_bytes()),
                        headers,
                        status_code: encoded.status_code,
                    }
                }
                Err(e) => internal_error_response(e),
            },
        )
    }
}

/// Client errors are logged as warnings; anything else is a server-side problem
fn is_client_error(error: &HttpQueryError) -> bool {
    error.status_code().is_client_error()
}

/// Decode the request body into the JSON shape expected by the normalizer.
///
/// A blank GET body is an empty payload, and an `application/graphql` body is the query itself.
fn parse_body(
    method: &http::Method,
    body: Bytes,
    content_type: Option<&str>,
) -> Result<Value, HttpQueryError> {
    if *method == http::Method::GET && body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    let is_graphql = content_type
        .map(|content_type| content_type.trim().starts_with(APPLICATION_GRAPHQL))
        .unwrap_or(false);

    if is_graphql {
        let query = String::from_utf8(body.to_vec()).map_err(|e| {
            warn!(error = %e, "Received an application/graphql body that is not UTF-8");
            HttpQueryError::InvalidUtf8Body
        })?;
        Ok(json!({ "query": query }))
    } else {
        load_json_body(&body)
    }
}

fn internal_error_response(error: serde_json::Error) -> ResponsePayload {
    error!(%error, "Failed to encode the response");

    let mut headers = Headers::new();
    headers.insert("content-type", "application/json");

    ResponsePayload {
        body: ResponseBody::Bytes(
            br#"{"errors":[{"message":"Internal server error"}]}"#.to_vec(),
        ),
        headers,
        status_code: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use http_query::{ExecutionError, ExecutionRequest, ExecutionResult};
    use nextql_env::MapEnvironment;

    use super::*;

    /// Returns the query and variables as data; a `mutation` over GET is refused.
    struct EchoExecutor;

    #[async_trait]
    impl GraphQLExecutor for EchoExecutor {
        async fn execute(
            &self,
            request: ExecutionRequest<'_>,
        ) -> Result<ExecutionResult, ExecutionError> {
            let query = request.params.query.clone().unwrap_or_default();

            if request.allow_only_query && query.starts_with("mutation") {
                return Err(ExecutionError::new(
                    StatusCode::METHOD_NOT_ALLOWED,
                    "Can only perform a mutation operation from a POST request.",
                )
                .with_header("Allow", "POST"));
            }

            if query.is_empty() {
                return Ok(ExecutionResult::new(
                    None,
                    vec![json!({"message": "Must provide query string."})],
                )
                .with_status_code(StatusCode::BAD_REQUEST));
            }

            Ok(ExecutionResult::new(
                Some(json!({
                    "query": query,
                    "variables": request.params.variables.clone(),
                })),
                vec![],
            ))
        }
    }

    struct MockRequestPayload {
        method: Method,
        path: String,
        query: Value,
        body: Bytes,
        headers: Headers,
    }

    impl MockRequestPayload {
        fn new(method: Method, body: &str) -> Self {
            Self {
                method,
                path: "/graphql".to_string(),
                query: Value::Null,
                body: Bytes::from(body.to_string()),
                headers: Headers::new(),
            }
        }
    }

    impl RequestPayload for MockRequestPayload {
        fn get_head(&self) -> &(dyn RequestHead + Send + Sync) {
            self
        }

        fn take_body(&mut self) -> Bytes {
            std::mem::take(&mut self.body)
        }
    }

    impl RequestHead for MockRequestPayload {
        fn get_headers(&self, key: &str) -> Vec<String> {
            match self.headers.get(key) {
                Some(value) => vec![value],
                None => vec![],
            }
        }

        fn get_path(&self) -> String {
            self.path.clone()
        }

        fn get_query(&self) -> Value {
            self.query.clone()
        }

        fn get_method(&self) -> Method {
            self.method.clone()
        }
    }

    fn router(env: MapEnvironment) -> GraphQLRouter {
        GraphQLRouter::from_env(Arc::new(EchoExecutor), Arc::new(env)).unwrap()
    }

    fn batch_router() -> GraphQLRouter {
        router(MapEnvironment::from([("NEXTQL_BATCH_ENABLED", "true")]))
    }

    async fn route(router: &GraphQLRouter, mut request: MockRequestPayload) -> ResponsePayload {
        router
            .route(&mut request)
            .await
            .expect("GraphQL path should be routed")
    }

    fn body_json(response: &ResponsePayload) -> Value {
        serde_json::from_slice(response.body.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn ignores_other_paths() {
        let mut request = MockRequestPayload::new(Method::POST, "{}");
        request.path = "/other".to_string();

        assert!(
            router(MapEnvironment::new())
                .route(&mut request)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn honors_configured_path() {
        let router = router(MapEnvironment::from([(
            "NEXTQL_GRAPHQL_HTTP_PATH",
            "/api/graphql",
        )]));

        let mut request = MockRequestPayload::new(Method::POST, r#"{"query": "{ a }"}"#);
        request.path = "/api/graphql".to_string();

        assert!(router.route(&mut request).await.is_some());
    }

    #[tokio::test]
    async fn single_post() {
        let response = route(
            &router(MapEnvironment::new()),
            MockRequestPayload::new(Method::POST, r#"{"query": "{ hero { name } }"}"#),
        )
        .await;

        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(
            response.headers.get("content-type"),
            Some("application/json".to_string())
        );
        assert_eq!(
            body_json(&response),
            json!({"data": {"query": "{ hero { name } }", "variables": null}})
        );
    }

    #[tokio::test]
    async fn get_with_query_string() {
        let mut request = MockRequestPayload::new(Method::GET, "");
        request.query = json!({
            "query": "query Hero($id: String!) { droid(id: $id) { name } }",
            "variables": "{\"id\": \"2001\"}"
        });

        let response = route(&router(MapEnvironment::new()), request).await;

        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(
            body_json(&response)["data"]["variables"],
            json!({"id": "2001"})
        );
    }

    #[tokio::test]
    async fn application_graphql_body() {
        let mut request = MockRequestPayload::new(Method::POST, "{ hero { name } }");
        request
            .headers
            .insert("Content-Type", "application/graphql");

        let response = route(&router(MapEnvironment::new()), request).await;

        assert_eq!(
            body_json(&response)["data"]["query"],
            json!("{ hero { name } }")
        );
    }

    #[test]
    fn only_server_errors_are_logged_as_errors() {
        assert!(is_client_error(&HttpQueryError::InvalidJsonBody));
        assert!(is_client_error(&HttpQueryError::MethodNotAllowed));
        assert!(is_client_error(&HttpQueryError::Execution(ExecutionError::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "Can only perform a mutation operation from a POST request.",
        ))));
        assert!(!is_client_error(&HttpQueryError::Execution(
            ExecutionError::new(StatusCode::INTERNAL_SERVER_ERROR, "engine failed")
        )));
    }

    #[tokio::test]
    async fn application_graphql_body_must_be_utf8() {
        let mut request = MockRequestPayload::new(Method::POST, "");
        request.body = Bytes::from_static(b"{ hero { name \xff } }");
        request
            .headers
            .insert("Content-Type", "application/graphql");

        let response = route(&router(MapEnvironment::new()), request).await;

        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(&response),
            json!({"errors": [{"message": "POST body is not valid UTF-8."}]})
        );
    }

    #[tokio::test]
    async fn blank_post_body_is_invalid_json() {
        for body in ["", "  \n"] {
            let response = route(
                &router(MapEnvironment::new()),
                MockRequestPayload::new(Method::POST, body),
            )
            .await;

            assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(&response),
                json!({"errors": [{"message": "POST body sent invalid JSON."}]})
            );
        }
    }

    #[tokio::test]
    async fn batch_post() {
        let response = route(
            &batch_router(),
            MockRequestPayload::new(Method::POST, r#"[{"query": "A"}, {"query": "B"}]"#),
        )
        .await;

        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(
            body_json(&response),
            json!([
                {"data": {"query": "A", "variables": null}},
                {"data": {"query": "B", "variables": null}}
            ])
        );
    }

    #[tokio::test]
    async fn batch_status_is_highest() {
        let response = route(
            &batch_router(),
            MockRequestPayload::new(Method::POST, r#"[{"query": "A"}, {}]"#),
        )
        .await;

        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(&response)[1],
            json!({"data": null, "errors": [{"message": "Must provide query string."}]})
        );
    }

    #[tokio::test]
    async fn put_is_not_allowed() {
        let response = route(
            &router(MapEnvironment::new()),
            MockRequestPayload::new(Method::PUT, "not even json"),
        )
        .await;

        assert_eq!(response.status_code, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers.get("allow"), Some("GET, POST".to_string()));
        assert_eq!(
            body_json(&response),
            json!({"errors": [{"message": "GraphQL only supports GET and POST requests."}]})
        );
    }

    #[tokio::test]
    async fn invalid_json_body() {
        let response = route(
            &router(MapEnvironment::new()),
            MockRequestPayload::new(Method::POST, r#"{"query": "#),
        )
        .await;

        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(&response),
            json!({"errors": [{"message": "POST body sent invalid JSON."}]})
        );
    }

    #[tokio::test]
    async fn batching_disabled() {
        let response = route(
            &router(MapEnvironment::new()),
            MockRequestPayload::new(Method::POST, r#"[{"query": "A"}]"#),
        )
        .await;

        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(&response),
            json!({"errors": [{"message": "Batch GraphQL requests are not enabled."}]})
        );
    }

    #[tokio::test]
    async fn get_mutation_is_refused() {
        let mut request = MockRequestPayload::new(Method::GET, "");
        request.query = json!({"query": "mutation { addHero }"});

        let response = route(&router(MapEnvironment::new()), request).await;

        assert_eq!(response.status_code, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers.get("allow"), Some("POST".to_string()));
    }

    #[tokio::test]
    async fn caught_errors_become_null_entries() {
        let router = router(MapEnvironment::from([
            ("NEXTQL_BATCH_ENABLED", "true"),
            ("NEXTQL_CATCH_ERRORS", "true"),
        ]));

        let request = MockRequestPayload::new(
            Method::GET,
            r#"[{"query": "{ a }"}, {"query": "mutation { b }"}]"#,
        );

        let response = route(&router, request).await;

        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(
            body_json(&response),
            json!([{"data": {"query": "{ a }", "variables": null}}, null])
        );
    }

    #[tokio::test]
    async fn pretty_output() {
        let response = route(
            &router(MapEnvironment::from([("NEXTQL_PRETTY_JSON", "true")])),
            MockRequestPayload::new(Method::POST, r#"{"query": "A"}"#),
        )
        .await;

        let body = String::from_utf8(response.body.as_bytes().to_vec()).unwrap();
        assert!(body.contains("\n  \"data\": {"), "{body}");
    }
}
