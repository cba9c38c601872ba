// 🌐 REST API - catalog views over Axum
//
// The selection state travels with each request; the server only holds the
// immutable joined catalog.

use crate::catalog::Catalog;
use crate::entities::{Category, Person};
use crate::error::CatalogError;
use crate::joiner::Good;
use crate::selection::{ResetScope, SelectionEvent, SelectionState, SortColumn, SortIndicator};
use crate::view::NO_RESULTS_MESSAGE;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub reset_scope: ResetScope,
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Error half of every handler
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<CatalogError> for ApiFailure {
    fn from(e: CatalogError) -> Self {
        let status = if e.is_bad_input() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        } else {
            warn!(status = %self.status, message = %self.message, "rejected request");
        }

        (self.status, Json(ApiResponse::<()>::err(self.message))).into_response()
    }
}

// Extractor failures (malformed JSON, unknown enum values, non-numeric ids)
// come back in the same ApiResponse shape as every other error.
impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiFailure {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// `Json` body extractor that rejects with `ApiFailure`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiFailure))]
pub struct ApiJson<T>(pub T);

/// `Query` extractor that rejects with `ApiFailure`
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiFailure))]
pub struct ApiQuery<T>(pub T);

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiFailure>;

/// Derived view plus what a renderer needs to draw headers
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewResponse {
    pub state: SelectionState,
    pub count: usize,
    pub goods: Vec<Good>,
    pub indicators: Vec<ColumnIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ColumnIndicator {
    pub column: SortColumn,
    pub indicator: SortIndicator,
}

impl ViewResponse {
    fn build(catalog: &Catalog, state: SelectionState) -> Self {
        let goods = catalog.view(&state);
        let indicators = SortColumn::ALL
            .iter()
            .map(|&column| ColumnIndicator {
                column,
                indicator: state.sort_indicator(column),
            })
            .collect();

        Self {
            count: goods.len(),
            message: goods.is_empty().then(|| NO_RESULTS_MESSAGE.to_string()),
            goods,
            indicators,
            state,
        }
    }
}

/// Selection encoded in a query string:
/// `?user=1&query=milk&categories=1,3&sort=product&direction=desc`
#[derive(Debug, Default, Deserialize)]
pub struct GoodsQuery {
    user: Option<i64>,
    query: Option<String>,
    categories: Option<String>,
    sort: Option<String>,
    direction: Option<String>,
}

impl GoodsQuery {
    fn into_selection(self, catalog: &Catalog) -> Result<SelectionState, ApiFailure> {
        let mut state = SelectionState::new();

        if let Some(user) = self.user {
            catalog
                .dataset
                .find_person(user)
                .ok_or(CatalogError::UnknownPerson(user))?;
            state = state.select_user(Some(user));
        }

        if let Some(query) = self.query {
            state = state.set_query(&query);
        }

        if let Some(categories) = self.categories {
            for raw in categories.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let id: i64 = raw
                    .parse()
                    .map_err(|_| ApiFailure::bad_request(format!("invalid category id: {:?}", raw)))?;
                catalog
                    .dataset
                    .find_category(id)
                    .ok_or(CatalogError::UnknownCategory(id))?;
                state.selected_categories.insert(id);
            }
        }

        if let Some(sort) = self.sort {
            state.sort_column = Some(sort.parse()?);
        }

        if let Some(direction) = self.direction {
            state.sort_direction = direction.parse()?;
        }

        Ok(state)
    }
}

/// Body of POST /api/view
#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    #[serde(default)]
    state: SelectionState,
    #[serde(default)]
    event: Option<SelectionEvent>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/people - All users, in dataset order
async fn get_people(State(state): State<AppState>) -> Json<ApiResponse<Vec<Person>>> {
    Json(ApiResponse::ok(state.catalog.dataset.people.clone()))
}

/// GET /api/categories - All categories, in dataset order
async fn get_categories(State(state): State<AppState>) -> Json<ApiResponse<Vec<Category>>> {
    Json(ApiResponse::ok(state.catalog.dataset.categories.clone()))
}

/// GET /api/goods - Derived view for a selection given in the query string
async fn get_goods(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<GoodsQuery>,
) -> ApiResult<ViewResponse> {
    let selection = params.into_selection(&state.catalog)?;
    Ok(Json(ApiResponse::ok(ViewResponse::build(&state.catalog, selection))))
}

/// POST /api/view - Apply one event to the posted state, return state + view
async fn post_view(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ViewRequest>,
) -> ApiResult<ViewResponse> {
    let mut selection = request.state;

    if let Some(event) = request.event {
        event.validate(&state.catalog.dataset)?;
        selection = selection.apply(&event, state.reset_scope);
    }

    Ok(Json(ApiResponse::ok(ViewResponse::build(&state.catalog, selection))))
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/people", get(get_people))
        .route("/categories", get(get_categories))
        .route("/goods", get(get_goods))
        .route("/view", post(post_view))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app(reset_scope: ResetScope) -> Router {
        build_router(AppState {
            catalog: Arc::new(Catalog::load(None).unwrap()),
            reset_scope,
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn names(body: &serde_json::Value) -> Vec<String> {
        body["data"]["goods"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(ResetScope::Filters), get_request("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_people_and_categories() {
        let (_, people) = send(app(ResetScope::Filters), get_request("/api/people")).await;
        assert_eq!(people["data"].as_array().unwrap().len(), 4);
        assert_eq!(people["data"][1]["sex"], "f");

        let (_, categories) = send(app(ResetScope::Filters), get_request("/api/categories")).await;
        assert_eq!(categories["data"][0]["ownerId"], 2);
    }

    #[tokio::test]
    async fn test_goods_with_query_string() {
        let (status, body) = send(
            app(ResetScope::Filters),
            get_request("/api/goods?user=1&sort=product&direction=desc"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Milk", "Coffee", "Beer"]);
        assert_eq!(body["data"]["indicators"][1]["indicator"], "descending");
        assert_eq!(body["data"]["indicators"][0]["indicator"], "unsorted");
    }

    #[tokio::test]
    async fn test_goods_empty_view_has_message() {
        let (status, body) = send(
            app(ResetScope::Filters),
            get_request("/api/goods?categories=1&query=milk"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 0);
        assert_eq!(body["data"]["message"], NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_goods_rejects_unknown_sort_column() {
        let (status, body) =
            send(app(ResetScope::Filters), get_request("/api/goods?sort=price")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("price"));
    }

    #[tokio::test]
    async fn test_goods_rejects_unknown_user_and_bad_category() {
        let (status, _) = send(app(ResetScope::Filters), get_request("/api/goods?user=42")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(app(ResetScope::Filters), get_request("/api/goods?categories=1,abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_view_applies_event() {
        let state = SelectionState::new().click_column(SortColumn::Product);
        let body = serde_json::json!({
            "state": state,
            "event": { "type": "clickColumn", "column": "product" }
        });

        let (status, body) = send(app(ResetScope::Filters), post_json("/api/view", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["state"]["sortDirection"], "desc");
        assert_eq!(names(&body)[0], "Sugar");
    }

    #[tokio::test]
    async fn test_post_view_reset_respects_scope() {
        let state = SelectionState::new()
            .select_user(Some(2))
            .toggle_category(1)
            .click_column(SortColumn::Id);
        let body = serde_json::json!({ "state": state, "event": { "type": "resetAll" } });

        let (_, narrow) = send(app(ResetScope::Filters), post_json("/api/view", body.clone())).await;
        assert_eq!(narrow["data"]["state"]["selectedUser"], serde_json::Value::Null);
        assert_eq!(narrow["data"]["state"]["selectedCategories"], serde_json::json!([1]));

        let (_, wide) = send(app(ResetScope::All), post_json("/api/view", body)).await;
        assert_eq!(wide["data"]["state"]["selectedCategories"], serde_json::json!([]));
        assert_eq!(wide["data"]["state"]["sortColumn"], serde_json::Value::Null);
        assert_eq!(wide["data"]["count"], 9);
    }

    #[tokio::test]
    async fn test_post_view_rejects_unknown_category() {
        let body = serde_json::json!({ "event": { "type": "toggleCategory", "category": 77 } });
        let (status, _) = send(app(ResetScope::Filters), post_json("/api/view", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_query_string_is_json_error() {
        let (status, body) = send(app(ResetScope::Filters), get_request("/api/goods?user=abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_post_view_unknown_column_is_json_error() {
        let body = serde_json::json!({ "event": { "type": "clickColumn", "column": "price" } });
        let (status, body) = send(app(ResetScope::Filters), post_json("/api/view", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("price"));
    }

    #[tokio::test]
    async fn test_post_view_malformed_body_is_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/view")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(ResetScope::Filters), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
