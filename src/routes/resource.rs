//! Resource CRUD routes. Parameterized paths: the Path extractor receives the
//! segment and id, and handlers resolve the entity by path segment, so one
//! route pair serves all six resources.

use crate::handlers::resource::{create, delete as delete_handler, get_by_id, list, replace};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/:resource", get(list).post(create))
        .route(
            "/:resource/:id",
            get(get_by_id).put(replace).delete(delete_handler),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::routes::app;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// App over a lazily-connected pool: requests that fail before any query
    /// (validation, unknown resource, bad ids) never touch the database.
    fn test_app() -> axum::Router {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://127.0.0.1/invoices_test")
            .expect("lazy pool");
        app(AppState::new(pool))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn put_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let resp = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_resource_is_not_found() {
        let resp = test_app()
            .oneshot(Request::get("/widgets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn invalid_user_payload_reports_every_violation() {
        let resp = test_app()
            .oneshot(post_json(
                "/user",
                json!({
                    "username": "ab",
                    "password": "123",
                    "email": "invalidemail",
                    "mobileNumber": "12345",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "validation_error");
        let details = body["error"]["details"].as_array().unwrap();
        assert_eq!(details.len(), 4);
        for (i, field) in ["username", "password", "email", "mobileNumber"]
            .iter()
            .enumerate()
        {
            assert!(details[i].as_str().unwrap().contains(field));
        }
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let resp = test_app()
            .oneshot(Request::get("/user/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn replace_validates_before_lookup() {
        // The id may not exist, but the malformed body must win with a 400.
        let resp = test_app()
            .oneshot(put_json("/Invoice/999999", json!({"invoiceNumber": ""})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "validation_error");
        let details = body["error"]["details"].as_array().unwrap();
        assert!(details.iter().any(|d| d.as_str().unwrap().contains("dueDate")));
    }

    #[tokio::test]
    async fn array_body_is_rejected() {
        let resp = test_app()
            .oneshot(post_json("/client", json!([1, 2, 3])))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn bank_details_payload_is_validated() {
        let resp = test_app()
            .oneshot(post_json(
                "/bankDetails",
                json!({
                    "accountNumber": "123",
                    "ifsc": "not-an-ifsc",
                    "bankName": "X",
                    "userId": 0,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        let details = body["error"]["details"].as_array().unwrap();
        assert_eq!(details.len(), 4);
    }
}
