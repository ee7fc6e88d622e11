//! HTTP surface: axum routes over the workout controller.
//!
//! Each handler collects its path id and raw body into an `Exchange`, runs
//! the controller on the blocking pool, and returns the written response.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{debug, error, info};
use serde_json::{json, Value};
use tokio::task::spawn_blocking;
use workout_core::transport::ID_PARAM;
use workout_core::{Exchange, Operation, WorkoutController, WorkoutStore};

pub const WORKOUTS_PREFIX: &str = "/api/workouts";

type SharedController<S> = Arc<WorkoutController<S>>;

pub fn router<S: WorkoutStore + 'static>(controller: SharedController<S>) -> Router {
    let workouts = Router::new()
        .route("/", get(list_handler::<S>).post(create_handler::<S>))
        .route(
            "/:id",
            get(get_handler::<S>)
                .patch(update_handler::<S>)
                .delete(delete_handler::<S>),
        );

    Router::new()
        .nest(WORKOUTS_PREFIX, workouts)
        .layer(middleware::from_fn(log_request))
        .with_state(controller)
}

async fn list_handler<S: WorkoutStore + 'static>(
    State(controller): State<SharedController<S>>,
) -> Response {
    dispatch(controller, Operation::List, None, None).await
}

async fn get_handler<S: WorkoutStore + 'static>(
    State(controller): State<SharedController<S>>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    dispatch(controller, Operation::Get, path_id(id), None).await
}

async fn create_handler<S: WorkoutStore + 'static>(
    State(controller): State<SharedController<S>>,
    body: Bytes,
) -> Response {
    dispatch(controller, Operation::Create, None, Some(body)).await
}

async fn update_handler<S: WorkoutStore + 'static>(
    State(controller): State<SharedController<S>>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Response {
    dispatch(controller, Operation::Update, path_id(id), Some(body)).await
}

async fn delete_handler<S: WorkoutStore + 'static>(
    State(controller): State<SharedController<S>>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    dispatch(controller, Operation::Delete, path_id(id), None).await
}

/// An id the router cannot decode is dropped; the controller then answers
/// with the same not-found body as for an unknown id.
fn path_id(id: Result<Path<String>, PathRejection>) -> Option<String> {
    match id {
        Ok(Path(id)) => Some(id),
        Err(rejection) => {
            debug!("event=http_path module=server status=rejected error={rejection}");
            None
        }
    }
}

async fn dispatch<S: WorkoutStore + 'static>(
    controller: SharedController<S>,
    operation: Operation,
    id: Option<String>,
    body: Option<Bytes>,
) -> Response {
    let outcome = spawn_blocking(move || {
        let mut exchange = Exchange::new();
        if let Some(id) = id {
            exchange = exchange.with_param(ID_PARAM, id);
        }
        if let Some(body) = body {
            exchange = exchange.with_body(body.to_vec());
        }
        controller.handle(operation, &mut exchange);
        exchange.into_response()
    })
    .await;

    match outcome {
        Ok(Some((status, payload))) => json_response(status, payload),
        Ok(None) => {
            error!("event=http_dispatch module=server status=error op={operation} error=no_response");
            internal_error()
        }
        Err(err) => {
            error!("event=http_dispatch module=server status=error op={operation} error={err}");
            internal_error()
        }
    }
}

fn json_response(status: u16, payload: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(payload)).into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Request handler failed" })),
    )
        .into_response()
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server method={method} path={path} status_code={}",
        response.status().as_u16()
    );
    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use workout_core::{SqliteWorkoutStore, WorkoutController, WorkoutResource};

    use super::router;

    fn app() -> Router {
        let store = SqliteWorkoutStore::open_in_memory().unwrap();
        router(Arc::new(WorkoutController::new(WorkoutResource::new(store))))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, title: &str, load: f64, reps: u32) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/api/workouts",
            Some(json!({ "title": title, "load": load, "reps": reps })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn full_crud_cycle() {
        let app = app();

        let created = create(&app, "squat", 100.0, 5).await;
        let id = created["id"].as_str().unwrap().to_string();
        let item_uri = format!("/api/workouts/{id}");

        let (status, fetched) = send(&app, "GET", &item_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, updated) = send(&app, "PATCH", &item_uri, Some(json!({ "reps": 3 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["reps"], 3);
        assert_eq!(updated["title"], "squat");
        assert_eq!(updated["load"], created["load"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);

        let (status, deleted) = send(&app, "DELETE", &item_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, updated);

        let (status, missing) = send(&app, "GET", &item_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing, json!({ "error": "No such workout" }));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let app = app();
        let first = create(&app, "first", 1.0, 1).await;
        let second = create(&app, "second", 2.0, 2).await;

        let (status, listed) = send(&app, "GET", "/api/workouts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([second, first]));
    }

    #[tokio::test]
    async fn malformed_id_is_not_found_not_server_error() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/workouts/123abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "No such workout" }));

        let (status, _) = send(&app, "DELETE", "/api/workouts/123abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn undecodable_id_is_not_found_for_every_item_route() {
        let app = app();
        for method in ["GET", "PATCH", "DELETE"] {
            let body = (method == "PATCH").then(|| json!({ "reps": 1 }));
            let (status, payload) = send(&app, method, "/api/workouts/%FF", body).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
            assert_eq!(payload, json!({ "error": "No such workout" }), "{method}");
        }
    }

    #[tokio::test]
    async fn invalid_create_is_bad_request_with_field_errors() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/workouts",
            Some(json!({ "title": "", "load": 5, "reps": 10 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "title");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_body_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/workouts")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_patch_is_bad_request() {
        let app = app();
        let created = create(&app, "row", 50.0, 10).await;
        let uri = format!("/api/workouts/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "reps": -1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "reps");

        let (_, unchanged) = send(&app, "GET", &uri, None).await;
        assert_eq!(unchanged, created);
    }
}
