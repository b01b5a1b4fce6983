use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{AppState, error::AppError, routes::movie::items_of};

use super::model::{SearchQuery, SearchResponse};

#[axum::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    // 响应里原样回显调用方传入的关键词，缓存键和上游只用去掉空白后的
    let echoed = query.keyword.clone().unwrap_or_default();
    // 参数不合法时不触碰缓存和上游
    let params = query.validate()?;

    let result = state
        .catalog
        .search(&params.keyword, params.page, params.limit)
        .await
        .ok_or_else(|| AppError::NotFound("No results found".to_string()))?;

    let data = items_of(&result);
    let total = data.as_array().map_or(0, Vec::len);
    Ok(Json(SearchResponse {
        success: true,
        keyword: echoed,
        data,
        total,
    }))
}
