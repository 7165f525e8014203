// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use common::context::{Identity, JwtAuthenticator, RequestContext};
use common::http::MemoryRequestHead;
use common::operation_payload::OperationsPayload;
use core_resolver::system_resolver::GraphQLSystemResolver;
use feed_resolver::{
    FeedState,
    asset::LocalAssetStore,
    config::FeedConfig,
    entity::{Post, User},
    feed_bindings, feed_schema,
    password::Sha256PasswordHasher,
    storage::{Criteria, InMemoryRepository},
};
use serde_json::{Value, json};
use tempfile::TempDir;

struct TestServer {
    resolver: GraphQLSystemResolver,
    state: Arc<FeedState>,
    authenticator: Arc<JwtAuthenticator>,
    image_root: TempDir,
}

impl TestServer {
    fn new() -> Self {
        let image_root = tempfile::tempdir().unwrap();
        let authenticator = Arc::new(JwtAuthenticator::new("test-secret", 3600));

        let state = Arc::new(FeedState {
            users: Arc::new(InMemoryRepository::<User>::new()),
            posts: Arc::new(InMemoryRepository::<Post>::new()),
            password_hasher: Arc::new(Sha256PasswordHasher),
            asset_store: Arc::new(LocalAssetStore::new(image_root.path())),
            token_issuer: authenticator.clone(),
            config: FeedConfig::default(),
        });

        let resolver = GraphQLSystemResolver::new(
            Arc::new(feed_schema().unwrap()),
            Arc::new(feed_bindings(state.clone()).unwrap()),
            16,
        )
        .unwrap();

        Self {
            resolver,
            state,
            authenticator,
            image_root,
        }
    }

    /// Run an operation, returning the HTTP status and the response envelope
    async fn execute(&self, query: &str, variables: Value, user_id: Option<&str>) -> (u16, Value) {
        let request_context = match user_id {
            Some(user_id) => RequestContext::new(Identity::authenticated(user_id)),
            None => RequestContext::anonymous(),
        };

        let response = self
            .resolver
            .resolve_operations(
                OperationsPayload::new(query).with_variables(variables),
                &request_context,
            )
            .await;

        (response.status_code(), response.to_json().unwrap())
    }

    async fn create_user(&self, email: &str, name: &str) -> String {
        let (status, response) = self
            .execute(
                "mutation($input: UserInputData!) { createUser(userInput: $input) { id } }",
                json!({"input": {"email": email, "name": name, "password": "secret"}}),
                None,
            )
            .await;
        assert_eq!(status, 200, "{response}");

        response["data"]["createUser"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn create_post(&self, user_id: &str, title: &str, image_url: &str) -> String {
        let (status, response) = self
            .execute(
                "mutation($input: PostInputData!) { createPost(postInput: $input) { id } }",
                json!({"input": {"title": title, "content": "Some content", "imageUrl": image_url}}),
                Some(user_id),
            )
            .await;
        assert_eq!(status, 200, "{response}");

        response["data"]["createPost"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn user_count(&self) -> usize {
        self.state
            .users
            .count_matching(&Criteria::all())
            .await
            .unwrap()
    }

    async fn post_count(&self) -> usize {
        self.state
            .posts
            .count_matching(&Criteria::all())
            .await
            .unwrap()
    }

    async fn store_image(&self, name: &str) -> std::path::PathBuf {
        let path = self.image_root.path().join(name);
        tokio::fs::write(&path, b"image").await.unwrap();
        path
    }
}

const CREATE_USER: &str =
    r#"mutation { createUser(userInput: {email: "a@b.com", name: "A", password: "abcde"}) { id email } }"#;

#[tokio::test]
async fn create_user_and_duplicate() {
    let server = TestServer::new();

    let (status, response) = server.execute(CREATE_USER, Value::Null, None).await;
    assert_eq!(status, 200);
    assert!(response.get("errors").is_none());
    assert_eq!(response["data"]["createUser"]["email"], "a@b.com");
    assert!(!response["data"]["createUser"]["id"].as_str().unwrap().is_empty());

    let (status, response) = server.execute(CREATE_USER, Value::Null, None).await;
    assert_eq!(status, 500);
    assert_eq!(
        response,
        json!({
            "data": null,
            "errors": [{"message": "User exists already!", "statusCode": 500}]
        })
    );
    assert_eq!(server.user_count().await, 1);
}

#[tokio::test]
async fn invalid_user_input() {
    let server = TestServer::new();

    let (status, response) = server
        .execute(
            r#"mutation { createUser(userInput: {email: "ab.com", name: "A", password: "abc"}) { id } }"#,
            Value::Null,
            None,
        )
        .await;

    assert_eq!(status, 422);
    assert_eq!(
        response,
        json!({
            "data": null,
            "errors": [{
                "message": "Invalid input.",
                "statusCode": 422,
                "detail": [
                    {"field": "email", "message": "E-Mail is invalid."},
                    {"field": "password", "message": "Password too short!"}
                ]
            }]
        })
    );
    assert_eq!(server.user_count().await, 0);
}

#[tokio::test]
async fn authentication_gate() {
    let server = TestServer::new();

    let (status, response) = server
        .execute(r#"mutation { deletePost(id: "p1") }"#, Value::Null, None)
        .await;
    assert_eq!(status, 401);
    assert_eq!(
        response,
        json!({
            "data": {"deletePost": null},
            "errors": [{"message": "Not authenticated!", "statusCode": 401}]
        })
    );

    let (status, response) = server
        .execute(
            r#"mutation { createPost(postInput: {title: "A title", content: "Content", imageUrl: "a.png"}) { id } }"#,
            Value::Null,
            None,
        )
        .await;
    assert_eq!(status, 401);
    assert_eq!(response["data"], Value::Null);
    assert_eq!(server.post_count().await, 0);

    for query in ["{ posts { totalPosts } }", "{ user { name } }"] {
        let (status, _) = server.execute(query, Value::Null, None).await;
        assert_eq!(status, 401, "{query}");
    }
}

#[tokio::test]
async fn stale_identity() {
    let server = TestServer::new();

    let (status, response) = server
        .execute(
            r#"mutation { createPost(postInput: {title: "A title", content: "Content", imageUrl: "a.png"}) { id } }"#,
            Value::Null,
            Some("deleted-user"),
        )
        .await;

    assert_eq!(status, 401);
    assert_eq!(response["errors"][0]["message"], "Invalid user.");
    assert_eq!(server.post_count().await, 0);
}

#[tokio::test]
async fn login() {
    let server = TestServer::new();
    let user_id = server.create_user("ann@example.com", "Ann").await;

    let login = "query($email: String!, $password: String!) { login(email: $email, password: $password) { token userId } }";

    let (status, response) = server
        .execute(
            login,
            json!({"email": "ann@example.com", "password": "secret"}),
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(response["data"]["login"]["userId"], user_id.as_str());

    let token = response["data"]["login"]["token"].as_str().unwrap();
    let request_head = MemoryRequestHead::post("/graphql")
        .with_header("Authorization", format!("Bearer {token}"));
    assert_eq!(
        server.authenticator.identify(&request_head),
        Identity::authenticated(user_id.clone())
    );

    let (status, response) = server
        .execute(
            login,
            json!({"email": "ann@example.com", "password": "wrong"}),
            None,
        )
        .await;
    assert_eq!(status, 401);
    assert_eq!(
        response,
        json!({
            "data": null,
            "errors": [{"message": "Password is incorrect.", "statusCode": 401}]
        })
    );

    let (_, response) = server
        .execute(
            login,
            json!({"email": "bob@example.com", "password": "secret"}),
            None,
        )
        .await;
    assert_eq!(response["errors"][0]["message"], "User not found.");
}

fn titles(response: &Value) -> Vec<&str> {
    response["data"]["posts"]["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn pagination() {
    let server = TestServer::new();
    let user_id = server.create_user("ann@example.com", "Ann").await;
    for title in ["Post 1", "Post 2", "Post 3"] {
        server.create_post(&user_id, title, "images/a.png").await;
    }

    let page = |page: Value| {
        let server = &server;
        let user_id = &user_id;
        async move {
            server
                .execute(
                    "query($page: Int) { posts(page: $page) { posts { title } totalPosts } }",
                    json!({"page": page}),
                    Some(user_id.as_str()),
                )
                .await
                .1
        }
    };

    let first = page(json!(1)).await;
    assert_eq!(titles(&first), vec!["Post 3", "Post 2"]);
    assert_eq!(first["data"]["posts"]["totalPosts"], 3);

    let second = page(json!(2)).await;
    assert_eq!(titles(&second), vec!["Post 1"]);

    assert_eq!(page(json!(0)).await, first);
    assert_eq!(page(Value::Null).await, first);

    let beyond = page(json!(5)).await;
    assert!(titles(&beyond).is_empty());
    assert_eq!(beyond["data"]["posts"]["totalPosts"], 3);
}

#[tokio::test]
async fn post_ownership() {
    let server = TestServer::new();
    let owner = server.create_user("ann@example.com", "Ann").await;
    let other = server.create_user("bob@example.com", "Bob").await;
    let post_id = server.create_post(&owner, "Ann's post", "images/a.png").await;

    let (status, response) = server
        .execute(
            "mutation($id: ID!) { updatePost(id: $id, postInput: {title: \"Taken over\", content: \"Content\", imageUrl: \"undefined\"}) { title } }",
            json!({"id": post_id}),
            Some(other.as_str()),
        )
        .await;
    assert_eq!(status, 403);
    assert_eq!(
        response,
        json!({
            "data": null,
            "errors": [{"message": "Not authorized!", "statusCode": 403}]
        })
    );

    let (status, response) = server
        .execute(
            "mutation($id: ID!) { deletePost(id: $id) }",
            json!({"id": post_id}),
            Some(other.as_str()),
        )
        .await;
    assert_eq!(status, 403);
    assert_eq!(response["data"], json!({"deletePost": null}));
    assert_eq!(server.post_count().await, 1);

    let (status, response) = server
        .execute(
            r#"{ post(id: "missing") { title } }"#,
            Value::Null,
            Some(owner.as_str()),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(
        response,
        json!({
            "data": null,
            "errors": [{"message": "No post found!", "statusCode": 404}]
        })
    );
}

#[tokio::test]
async fn invalid_post_input() {
    let server = TestServer::new();
    let user_id = server.create_user("ann@example.com", "Ann").await;

    let (status, response) = server
        .execute(
            r#"mutation { createPost(postInput: {title: "abc", content: "", imageUrl: "a.png"}) { id } }"#,
            Value::Null,
            Some(user_id.as_str()),
        )
        .await;

    assert_eq!(status, 422);
    assert_eq!(
        response["errors"][0]["detail"],
        json!([
            {"field": "title", "message": "Title is invalid."},
            {"field": "content", "message": "Content is invalid."}
        ])
    );
    assert_eq!(server.post_count().await, 0);
}

#[tokio::test]
async fn update_and_delete_post_images() {
    let server = TestServer::new();
    let user_id = server.create_user("ann@example.com", "Ann").await;
    let old_image = server.store_image("old.png").await;
    let new_image = server.store_image("new.png").await;
    let post_id = server.create_post(&user_id, "First title", "images/old.png").await;

    let update = "mutation($id: ID!, $input: PostInputData!) { updatePost(id: $id, postInput: $input) { title imageUrl } }";

    let (status, response) = server
        .execute(
            update,
            json!({"id": post_id, "input": {"title": "Second title", "content": "Some content", "imageUrl": "undefined"}}),
            Some(user_id.as_str()),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        response,
        json!({"data": {"updatePost": {"title": "Second title", "imageUrl": "images/old.png"}}})
    );
    assert!(old_image.exists());

    let (_, response) = server
        .execute(
            update,
            json!({"id": post_id, "input": {"title": "Third title", "content": "Some content", "imageUrl": "images/new.png"}}),
            Some(user_id.as_str()),
        )
        .await;
    assert_eq!(response["data"]["updatePost"]["imageUrl"], "images/new.png");
    assert!(!old_image.exists());
    assert!(new_image.exists());

    let (status, response) = server
        .execute(
            "mutation($id: ID!) { deletePost(id: $id) }",
            json!({"id": post_id}),
            Some(user_id.as_str()),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(response, json!({"data": {"deletePost": true}}));
    assert!(!new_image.exists());
    assert_eq!(server.post_count().await, 0);
}

#[tokio::test]
async fn nested_users_and_posts() {
    let server = TestServer::new();
    let user_id = server.create_user("ann@example.com", "Ann").await;
    let first = server.create_post(&user_id, "Post 1", "images/a.png").await;
    server.create_post(&user_id, "Post 2", "images/b.png").await;

    let (status, response) = server
        .execute(
            "query($id: ID!) { post(id: $id) { __typename title creator { name posts { title } } } }",
            json!({"id": first}),
            Some(user_id.as_str()),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        response,
        json!({
            "data": {
                "post": {
                    "__typename": "Post",
                    "title": "Post 1",
                    "creator": {
                        "name": "Ann",
                        "posts": [{"title": "Post 2"}, {"title": "Post 1"}]
                    }
                }
            }
        })
    );

    let (_, response) = server
        .execute(
            r#"mutation { updateStatus(status: "Busy") { status } }"#,
            Value::Null,
            Some(user_id.as_str()),
        )
        .await;
    assert_eq!(response, json!({"data": {"updateStatus": {"status": "Busy"}}}));

    let (_, response) = server
        .execute(
            "{ me: user { ...userFields } }
             fragment userFields on User { name status email }",
            Value::Null,
            Some(user_id.as_str()),
        )
        .await;
    assert_eq!(
        response,
        json!({"data": {"me": {"name": "Ann", "status": "Busy", "email": "ann@example.com"}}})
    );
}

#[tokio::test]
async fn default_status_and_missing_user() {
    let server = TestServer::new();
    let user_id = server.create_user("ann@example.com", "Ann").await;

    let (_, response) = server
        .execute("{ user { status } }", Value::Null, Some(user_id.as_str()))
        .await;
    assert_eq!(response, json!({"data": {"user": {"status": "I am new!"}}}));

    let (status, response) = server
        .execute("{ user { status } }", Value::Null, Some("gone"))
        .await;
    assert_eq!(status, 404);
    assert_eq!(response["errors"][0]["message"], "No user found!");
}
