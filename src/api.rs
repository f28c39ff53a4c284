use crate::error::CatalogError;
use crate::params::{ParamParser, decode_pairs};
use crate::query::QuerySpecification;
use crate::schema::{Block, Blocks};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Body of `POST /query`: the block name plus raw parameters at the top
/// level, e.g. `{"name": "stats", "select": ["visits"], "limit": 10}`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub name: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Catalog(err @ CatalogError::UnknownBlock(_)) => {
                (StatusCode::NOT_FOUND, err.to_string()).into_response()
            }
        }
    }
}

pub fn parse_request(
    blocks: &Blocks,
    name: &str,
    params: Map<String, Value>,
) -> Result<QuerySpecification, ApiError> {
    let parser = ParamParser::new(blocks, name, params)?;
    let spec = parser.to_spec();
    debug!(
        block = parser.block(),
        measures = spec.measures.len(),
        dimensions = spec.dimensions.len(),
        operations = spec.operations.len(),
        orders = spec.orders.len(),
        limit = spec.limit,
        offset = spec.offset,
        "parsed query parameters"
    );
    Ok(spec)
}

async fn query_handler(
    State(blocks): State<Arc<Blocks>>,
    Json(query_request): Json<QueryRequest>,
) -> Result<Json<QuerySpecification>, ApiError> {
    info!(block = %query_request.name, "query request");
    parse_request(&blocks, &query_request.name, query_request.params).map(Json)
}

async fn block_query_handler(
    Path(block_name): Path<String>,
    State(blocks): State<Arc<Blocks>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<QuerySpecification>, ApiError> {
    info!(block = %block_name, "query request");
    parse_request(&blocks, &block_name, decode_pairs(pairs)).map(Json)
}

async fn get_blocks_handler(State(blocks): State<Arc<Blocks>>) -> impl IntoResponse {
    (StatusCode::OK, Json(blocks.names())).into_response()
}

async fn get_block_description_handler(
    Path(block_name): Path<String>,
    State(blocks): State<Arc<Blocks>>,
) -> Result<Json<Block>, ApiError> {
    Ok(Json(blocks.block(&block_name)?.clone()))
}

async fn get_schema_handler(State(blocks): State<Arc<Blocks>>) -> impl IntoResponse {
    (StatusCode::OK, Json(blocks.as_map().clone())).into_response()
}

pub fn create_router(blocks: Arc<Blocks>) -> Router {
    Router::new()
        .route("/query", post(query_handler))
        .route("/blocks", get(get_blocks_handler))
        .route("/blocks/{block_name}", get(get_block_description_handler))
        .route("/blocks/{block_name}/query", get(block_query_handler))
        .route("/schema", get(get_schema_handler))
        .with_state(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::json;
    use tower::ServiceExt;

    fn blocks() -> Blocks {
        Blocks::from_toml_str(
            r#"
            [[block]]
            name = "stats"
            measures = [{ name = "visits", sql = "count()" }]
            dimensions = [{ name = "website_id", sql = "website_id", data_type = "number" }]
            constraints = [{ field = "visits", operators = ["gt", "in"], data_type = "numeric" }]
            "#,
        )
        .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = create_router(Arc::new(blocks()))
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    #[test]
    fn request_body_flattens_parameters() {
        let request: QueryRequest =
            serde_json::from_value(json!({"name": "stats", "limit": 5, "by": "website_id"}))
                .unwrap();
        assert_eq!(request.name, "stats");
        assert_eq!(request.params.len(), 2);
        let spec = parse_request(&blocks(), &request.name, request.params).unwrap();
        assert_eq!(spec.limit, 5);
    }

    #[tokio::test]
    async fn block_query_route_decodes_bracket_parameters() {
        let (status, body) = get(
            "/blocks/stats/query?select%5B%5D=visits&order=visits.d&page=2&per_page=10\
             &where%5Bvisits.gt%5D=3&where%5Bvisits__in%5D%5B%5D=1&where%5Bvisits__in%5D%5B%5D=2",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let spec: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(spec["measures"], json!([{"name": "visits", "kind": "measure"}]));
        assert_eq!(spec["orders"], json!([{"field": "visits", "direction": "desc"}]));
        assert_eq!(spec["limit"], json!(10));
        assert_eq!(spec["offset"], json!(10));
        assert_eq!(
            spec["operations"],
            json!([
                {"key": "visits.gt", "field": "visits", "operator": "gt", "args": [3]},
                {"key": "visits.in", "field": "visits", "operator": "in", "args": [1, 2]},
            ])
        );
    }

    #[tokio::test]
    async fn query_route_accepts_json_body() {
        let request = Request::post("/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"name": "stats", "by": ["website_id"], "limit": 5, "where": "WRONG"})
                    .to_string(),
            ))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        let spec: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(spec["limit"], json!(5));
        assert_eq!(spec["operations"], json!([]));
        assert_eq!(spec["dimensions"], json!([{"name": "website_id", "kind": "dimension"}]));
    }

    #[tokio::test]
    async fn unknown_blocks_are_not_found_on_every_route() {
        let message = b"block 'nope' not found".to_vec();
        assert_eq!(get("/blocks/nope").await, (StatusCode::NOT_FOUND, message.clone()));
        assert_eq!(get("/blocks/nope/query?limit=1").await, (StatusCode::NOT_FOUND, message.clone()));

        let request = Request::post("/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"name": "nope"}).to_string()))
            .unwrap();
        assert_eq!(send(request).await, (StatusCode::NOT_FOUND, message));
    }

    #[tokio::test]
    async fn describes_known_blocks() {
        let (status, body) = get("/blocks/stats").await;
        assert_eq!(status, StatusCode::OK);
        let block: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(block["name"], json!("stats"));
        assert_eq!(block["constraints"][0]["operators"], json!(["gt", "in"]));
    }
}
