use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{AppState, middleware::log_errors, routes};

/// 组装全部路由
pub fn build_router(state: AppState) -> Router {
    let movie_routes = Router::new()
        .route("/movies/new", get(routes::movie::new_movies))
        .route("/movies/movies", get(routes::movie::movies))
        .route("/movies/series", get(routes::movie::series))
        .route("/movies/tv-shows", get(routes::movie::tv_shows))
        .route("/movies/anime", get(routes::movie::anime))
        .route("/movies/category/{category_slug}", get(routes::movie::by_category))
        .route("/movies/country/{country_slug}", get(routes::movie::by_country))
        .route("/movies/year/{year}", get(routes::movie::by_year))
        .route("/movies/{slug}", get(routes::movie::movie_detail))
        .route("/catalog/categories", get(routes::movie::categories))
        .route("/catalog/countries", get(routes::movie::countries));

    let search_routes = Router::new().route("/search", get(routes::search::search));

    let router = Router::new()
        .route("/health", get(routes::health))
        .nest(
            &state.config.api_prefix,
            Router::new().merge(movie_routes).merge(search_routes),
        )
        .layer(axum::middleware::from_fn(log_errors));

    let router = router.layer(cors_layer(&state.config.cors_origins));

    router.with_state(state)
}

// 开发模式下允许所有来源
#[cfg(debug_assertions)]
fn cors_layer(_origins: &[String]) -> CorsLayer {
    tracing::debug!("Adding permissive CORS layer for development mode");
    CorsLayer::permissive()
}

#[cfg(not(debug_assertions))]
fn cors_layer(origins: &[String]) -> CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::Any;

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
