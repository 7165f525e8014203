// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use common::context::{JwtAuthenticator, RequestContext};
use common::env_const::get_graphql_http_path;
use common::http::{Headers, RequestHead, RequestPayload, ResponseBody, ResponsePayload};
use common::operation_payload::OperationsPayload;
use core_resolver::{
    GraphQLResponse,
    error_formatter::format_system_error,
    system_resolver::{GraphQLSystemResolver, RequestError, SystemResolutionError},
};
use feed_env::Environment;
use http::StatusCode;
use tracing::{error, instrument};

/// Serves the GraphQL endpoint without depending on any specific web framework
pub struct FeedRouter {
    system_resolver: GraphQLSystemResolver,
    authenticator: Arc<JwtAuthenticator>,
    env: Arc<dyn Environment>,
}

impl FeedRouter {
    pub fn new(
        system_resolver: GraphQLSystemResolver,
        authenticator: Arc<JwtAuthenticator>,
        env: Arc<dyn Environment>,
    ) -> Self {
        Self {
            system_resolver,
            authenticator,
            env,
        }
    }

    pub fn graphql_http_path(&self) -> String {
        get_graphql_http_path(self.env.as_ref())
    }

    fn suitable(&self, request_head: &(dyn RequestHead + Send + Sync)) -> bool {
        request_head.get_path() == self.graphql_http_path()
            && request_head.get_method() == http::Method::POST
    }

    /// Resolve the request if it is meant for the GraphQL endpoint, `None` otherwise.
    ///
    /// The response carries the `{data, errors}` envelope with the status of the first error (or
    /// 200 if there are none).
    #[instrument(name = "FeedRouter::route", skip_all)]
    pub async fn route(
        &self,
        request: &mut (dyn RequestPayload + Send),
    ) -> Option<ResponsePayload> {
        if !self.suitable(request.get_head()) {
            return None;
        }

        let response = self.resolve(request).await;

        let status_code = StatusCode::from_u16(response.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match response.to_json() {
            Ok(body) => Some(ResponsePayload::json(&body, status_code)),
            Err(e) => {
                error!("Could not serialize response: {}", e);
                Some(ResponsePayload {
                    body: ResponseBody::None,
                    headers: Headers::new(),
                    status_code: StatusCode::INTERNAL_SERVER_ERROR,
                })
            }
        }
    }

    async fn resolve(&self, request: &mut (dyn RequestPayload + Send)) -> GraphQLResponse {
        let operations_payload = match OperationsPayload::from_json(request.take_body()) {
            Ok(operations_payload) => operations_payload,
            Err(e) => {
                let error = SystemResolutionError::RequestError(RequestError::InvalidBodyJson(e));
                error!("Error while resolving request: {:?}", error);
                return GraphQLResponse::failed(format_system_error(&error));
            }
        };

        let request_context =
            RequestContext::new(self.authenticator.identify(request.get_head()));

        self.system_resolver
            .resolve_operations(operations_payload, &request_context)
            .await
    }
}

#[cfg(test)]
mod tests {
    use common::env_const::{FEED_GRAPHQL_HTTP_PATH, FEED_JWT_SECRET};
    use common::http::{MemoryRequestHead, MemoryRequestPayload};
    use feed_env::MapEnvironment;
    use serde_json::{Value, json};

    use crate::init_with_env;

    use super::*;

    fn router() -> FeedRouter {
        init_with_env(Arc::new(MapEnvironment::from([(FEED_JWT_SECRET, "secret")]))).unwrap()
    }

    async fn post(router: &FeedRouter, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut head = MemoryRequestHead::post("/graphql");
        if let Some(token) = token {
            head = head.with_header("Authorization", format!("Bearer {token}"));
        }

        let response = router
            .route(&mut MemoryRequestPayload::new(body, head))
            .await
            .unwrap();
        assert_eq!(
            response.headers.get("content-type"),
            Some("application/json".to_string())
        );

        (response.status_code, response.body.to_json().unwrap())
    }

    #[tokio::test]
    async fn only_posts_to_graphql_path() {
        let router = router();
        let body = json!({"query": "{ user { name } }"});

        let mut wrong_path =
            MemoryRequestPayload::new(body.clone(), MemoryRequestHead::post("/other"));
        assert!(router.route(&mut wrong_path).await.is_none());

        let get_head = MemoryRequestHead::new(
            Default::default(),
            http::Method::GET,
            "/graphql".to_string(),
        );
        assert!(
            router
                .route(&mut MemoryRequestPayload::new(body, get_head))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn custom_path() {
        let env = MapEnvironment::from([
            (FEED_JWT_SECRET, "secret"),
            (FEED_GRAPHQL_HTTP_PATH, "/api"),
        ]);
        let router = init_with_env(Arc::new(env)).unwrap();

        let mut request = MemoryRequestPayload::new(
            json!({"query": "{ user { name } }"}),
            MemoryRequestHead::post("/api"),
        );
        assert!(router.route(&mut request).await.is_some());
    }

    #[tokio::test]
    async fn invalid_body() {
        let router = router();

        let (status, body) = post(&router, json!("not an object"), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "data": null,
                "errors": [{"message": "Invalid request", "statusCode": 400}]
            })
        );
    }

    #[tokio::test]
    async fn syntax_error() {
        let router = router();

        let (status, body) = post(&router, json!({"query": "{ user { name }"}), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["errors"][0]["statusCode"], 400);
    }

    #[tokio::test]
    async fn bearer_token_identifies_caller() {
        let router = router();

        let (status, _) = post(
            &router,
            json!({
                "query": "mutation { createUser(userInput: {email: \"ann@example.com\", name: \"Ann\", password: \"secret\"}) { id } }"
            }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post(
            &router,
            json!({
                "query": "query($email: String!) { login(email: $email, password: \"secret\") { token } }",
                "variables": {"email": "ann@example.com"}
            }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["data"]["login"]["token"].as_str().unwrap().to_string();

        let user_query = json!({"query": "{ user { name } }"});

        let (status, body) = post(&router, user_query.clone(), Some(token.as_str())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": {"user": {"name": "Ann"}}}));

        let (status, body) = post(&router, user_query.clone(), Some("not-a-token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({
                "data": null,
                "errors": [{"message": "Not authenticated!", "statusCode": 401}]
            })
        );
    }

    #[test]
    fn missing_secret() {
        assert!(matches!(
            init_with_env(Arc::new(MapEnvironment::new())),
            Err(crate::ServerInitError::Authentication(_))
        ));
    }
}
