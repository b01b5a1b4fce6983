use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde_json::Value;

use crate::{AppState, catalog::DEFAULT_LIMIT, error::AppError};

use super::model::{DetailResponse, ListingResponse, PageQuery, ReferenceResponse, validate_slug};

type ListingResult = Result<Json<ListingResponse>, AppError>;

fn page_of(query: Result<Query<PageQuery>, QueryRejection>) -> Result<u32, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    query.page()
}

fn listing_or_not_found(result: Option<Value>, message: &str) -> ListingResult {
    result
        .as_ref()
        .and_then(ListingResponse::from_upstream)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(message.to_string()))
}

#[axum::debug_handler]
pub async fn new_movies(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ListingResult {
    let page = page_of(query)?;
    let result = state.catalog.new_movies(page).await;
    listing_or_not_found(result, "No movies found")
}

#[axum::debug_handler]
pub async fn movies(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ListingResult {
    let page = page_of(query)?;
    let result = state.catalog.movies(page, DEFAULT_LIMIT).await;
    listing_or_not_found(result, "No movies found")
}

#[axum::debug_handler]
pub async fn series(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ListingResult {
    let page = page_of(query)?;
    let result = state.catalog.series(page, DEFAULT_LIMIT).await;
    listing_or_not_found(result, "No series found")
}

#[axum::debug_handler]
pub async fn tv_shows(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ListingResult {
    let page = page_of(query)?;
    let result = state.catalog.tv_shows(page, DEFAULT_LIMIT).await;
    listing_or_not_found(result, "No TV shows found")
}

#[axum::debug_handler]
pub async fn anime(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ListingResult {
    let page = page_of(query)?;
    let result = state.catalog.anime(page, DEFAULT_LIMIT).await;
    listing_or_not_found(result, "No anime found")
}

#[axum::debug_handler]
pub async fn movie_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<DetailResponse>, AppError> {
    let slug = validate_slug(&slug, "Movie")?;

    state
        .catalog
        .movie_detail(slug)
        .await
        .as_ref()
        .and_then(DetailResponse::from_upstream)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
}

#[axum::debug_handler]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category_slug): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ListingResult {
    let slug = validate_slug(&category_slug, "Category")?;
    let page = page_of(query)?;
    let result = state
        .catalog
        .by_category(slug, page, DEFAULT_LIMIT)
        .await;
    listing_or_not_found(result, "No movies found in this category")
}

#[axum::debug_handler]
pub async fn by_country(
    State(state): State<AppState>,
    Path(country_slug): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ListingResult {
    let slug = validate_slug(&country_slug, "Country")?;
    let page = page_of(query)?;
    let result = state
        .catalog
        .by_country(slug, page, DEFAULT_LIMIT)
        .await;
    listing_or_not_found(result, "No movies found in this country")
}

#[axum::debug_handler]
pub async fn by_year(
    State(state): State<AppState>,
    Path(year): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ListingResult {
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid year: {}", year)))?;
    let page = page_of(query)?;
    let result = state.catalog.by_year(year, page, DEFAULT_LIMIT).await;
    listing_or_not_found(result, "No movies found for this year")
}

#[axum::debug_handler]
pub async fn categories(State(state): State<AppState>) -> Result<Json<ReferenceResponse>, AppError> {
    let data = state
        .catalog
        .categories()
        .await
        .ok_or_else(|| AppError::NotFound("No categories found".to_string()))?;
    Ok(Json(ReferenceResponse {
        success: true,
        data,
    }))
}

#[axum::debug_handler]
pub async fn countries(State(state): State<AppState>) -> Result<Json<ReferenceResponse>, AppError> {
    let data = state
        .catalog
        .countries()
        .await
        .ok_or_else(|| AppError::NotFound("No countries found".to_string()))?;
    Ok(Json(ReferenceResponse {
        success: true,
        data,
    }))
}
