//! HTTP router configuration

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{
        HeaderValue, Method, Request,
        header::{ACCEPT, CONTENT_TYPE},
    },
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::api::{REQUEST_ID_HEADER, posts, system, todos, users};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let api = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/{id}/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route(
            "/users/{id}/todos",
            get(todos::list_todos).post(todos::create_todo),
        )
        .route("/openapi.json", get(system::openapi));

    let trace_layer = TraceLayer::new_for_http().make_span_with(request_span);

    // Outermost last: the id is assigned before tracing and propagation see it
    Router::new()
        .route("/health", get(system::health))
        .nest("/api", api)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, ACCEPT, REQUEST_ID_HEADER])
        .expose_headers([REQUEST_ID_HEADER])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use gorest_client::{ClientError, Operation};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::test_support::{MockDirectory, body_json, request};

    fn app(directory: MockDirectory) -> (Router, Arc<MockDirectory>) {
        let directory = Arc::new(directory);
        let state = AppState::new(directory.clone(), Config::default());
        (create_router(Arc::new(state)), directory)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = app(MockDirectory::default());
        let req = request("GET", "/health", None);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn list_clamps_per_page_and_reports_pagination() {
        let (app, directory) = app(MockDirectory::with_users(3).total_count(250));
        let response = app
            .oneshot(request("GET", "/api/users?page=1&perPage=150", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
        assert_eq!(
            json["pagination"],
            json!({ "currentPage": 1, "perPage": 100, "totalCount": 250, "totalPages": 3 })
        );

        let params = directory.last_params().unwrap();
        assert_eq!(params.per_page(), 100);
    }

    #[tokio::test]
    async fn list_accepts_snake_case_alias_and_defaults() {
        let (app, directory) = app(MockDirectory::with_users(1).total_count(41));
        let response = app
            .clone()
            .oneshot(request("GET", "/api/users?page=3&per_page=20", None))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["pagination"]["currentPage"], 3);
        assert_eq!(json["pagination"]["totalPages"], 3);

        let req = request("GET", "/api/users", None);
        app.oneshot(req).await.unwrap();
        let params = directory.last_params().unwrap();
        assert_eq!((params.page(), params.per_page()), (1, 20));
    }

    #[tokio::test]
    async fn unparsable_query_is_a_validation_failure() {
        let (app, directory) = app(MockDirectory::default());
        let response = app
            .oneshot(request("GET", "/api/users?page=first", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid pagination parameters");
        assert!(directory.calls().is_empty());
    }

    #[tokio::test]
    async fn get_returns_user() {
        let (app, _) = app(MockDirectory::with_users(2));
        let req = request("GET", "/api/users/2", None);
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["id"], 2);
        assert!(json.get("pagination").is_none());
    }

    #[tokio::test]
    async fn upstream_failure_becomes_500_envelope_with_request_id() {
        let failure = ClientError::RetryExhausted {
            attempts: 3,
            source: Box::new(ClientError::Upstream {
                status: 404,
                body: "{\"message\":\"Resource not found\"}".to_string(),
            }),
        };
        let (app, _) = app(MockDirectory::default().failing(failure));
        let response = app
            .oneshot(request("GET", "/api/users/999", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let header_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to fetch user");
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("after 3 attempts"));
        assert_eq!(json["requestId"], header_id.as_str());
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let failure = ClientError::Upstream {
            status: 502,
            body: String::new(),
        };
        let (app, _) = app(MockDirectory::default().failing(failure));
        let mut req = request("DELETE", "/api/users/7", None);
        let caller_id = HeaderValue::from_static("trace-abc");
        req.headers_mut().insert("x-request-id", caller_id);

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "trace-abc");
        let json = body_json(response).await;
        assert_eq!(json["requestId"], "trace-abc");
        assert_eq!(json["message"], "Failed to delete user");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_failure() {
        let (app, directory) = app(MockDirectory::default());
        let response = app
            .oneshot(request("GET", "/api/users/abc", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid user id");
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
        assert!(json["requestId"].is_string());
        assert!(directory.calls().is_empty());
    }

    #[tokio::test]
    async fn create_returns_201_with_normalized_user() {
        let (app, directory) = app(MockDirectory::default());
        let body = json!({
            "name": "A",
            "email": "a@b.com",
            "gender": "Male",
            "status": "Active"
        });
        let response = app
            .oneshot(request("POST", "/api/users", Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["gender"], "male");
        assert_eq!(json["data"]["status"], "active");
        assert_eq!(directory.calls(), vec![Operation::CreateUser]);
    }

    #[tokio::test]
    async fn create_with_missing_fields_lists_errors() {
        let (app, directory) = app(MockDirectory::default());
        let response = app
            .oneshot(request("POST", "/api/users", Some(json!({ "name": "A" }))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid user data");
        let errors: Vec<&str> = json["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            errors,
            vec![
                "email is required",
                "gender is required",
                "status is required",
            ]
        );
        assert!(directory.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_failure() {
        let (app, _) = app(MockDirectory::default());
        let req = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid user data");
        assert!(json["requestId"].is_string());
    }

    #[tokio::test]
    async fn update_forwards_patch() {
        let (app, directory) = app(MockDirectory::with_users(1));
        let response = app
            .oneshot(request(
                "PUT",
                "/api/users/1",
                Some(json!({ "status": "Inactive", "gender": "female" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "inactive");
        assert_eq!(json["data"]["gender"], "male");
        assert_eq!(directory.calls(), vec![Operation::UpdateUser]);
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let (app, _) = app(MockDirectory::with_users(1));
        let response = app
            .oneshot(request("PUT", "/api/users/1", Some(json!({}))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_returns_bare_success() {
        let (app, directory) = app(MockDirectory::with_users(1));
        let response = app
            .oneshot(request("DELETE", "/api/users/1", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true }));
        assert_eq!(directory.calls(), vec![Operation::DeleteUser]);
    }

    #[tokio::test]
    async fn nested_posts_and_todos() {
        let (app, directory) = app(MockDirectory::with_users(1));

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/users/1/posts",
                Some(json!({ "title": "Hello", "body": "World" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["data"]["user_id"], 1);

        let todo = json!({
            "title": "Ship",
            "status": "Completed",
            "due_on": "2026-11-01"
        });
        let response = app
            .clone()
            .oneshot(request("POST", "/api/users/1/todos", Some(todo)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["data"]["status"], "completed");

        let response = app
            .clone()
            .oneshot(request("GET", "/api/users/1/posts", None))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let response = app
            .oneshot(request("GET", "/api/users/1/todos", None))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        assert_eq!(
            directory.calls(),
            vec![
                Operation::CreateUserPost,
                Operation::CreateUserTodo,
                Operation::ListUserPosts,
                Operation::ListUserTodos,
            ]
        );
    }

    #[tokio::test]
    async fn post_without_body_field_is_rejected() {
        let (app, _) = app(MockDirectory::with_users(1));
        let post = json!({ "title": "Hi" });
        let response = app
            .oneshot(request("POST", "/api/users/1/posts", Some(post)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["errors"], json!(["body is required"]));
    }

    #[tokio::test]
    async fn openapi_lists_component_schemas() {
        let (app, _) = app(MockDirectory::default());
        let response = app
            .oneshot(request("GET", "/api/openapi.json", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let schemas = &json["components"]["schemas"];
        assert!(schemas.get("User").is_some());
        assert!(schemas.get("FailureEnvelope").is_some());
    }
}
