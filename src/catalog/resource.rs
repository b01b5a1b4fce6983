use std::time::Duration;

use crate::cache::keys;
use crate::upstream::Query;

// 各类资源的缓存时间，单位秒
const NEW_MOVIES_TTL: u64 = 300; // 新片更新频繁
const LISTING_TTL: u64 = 600;
const DETAIL_TTL: u64 = 1800;
const SEARCH_TTL: u64 = 300;
const REFERENCE_TTL: u64 = 86400; // 分类、国家几乎不变

pub const DEFAULT_LIMIT: u32 = 20;

/// 可代理的上游资源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    NewMovies { page: u32 },
    Movies { page: u32, limit: u32 },
    Series { page: u32, limit: u32 },
    TvShows { page: u32, limit: u32 },
    Anime { page: u32, limit: u32 },
    Detail { slug: String },
    Search { keyword: String, page: u32, limit: u32 },
    Category { slug: String, page: u32, limit: u32 },
    Country { slug: String, page: u32, limit: u32 },
    Year { year: i32, page: u32, limit: u32 },
    Categories,
    Countries,
}

impl Resource {
    pub fn cache_key(&self) -> String {
        match self {
            Resource::NewMovies { page } => keys::new_movies_key(*page),
            Resource::Movies { page, limit } => keys::listing_key(keys::MOVIES_PREFIX, *page, *limit),
            Resource::Series { page, limit } => keys::listing_key(keys::SERIES_PREFIX, *page, *limit),
            Resource::TvShows { page, limit } => {
                keys::listing_key(keys::TV_SHOWS_PREFIX, *page, *limit)
            }
            Resource::Anime { page, limit } => keys::listing_key(keys::ANIME_PREFIX, *page, *limit),
            Resource::Detail { slug } => keys::movie_detail_key(slug),
            Resource::Search { keyword, page, limit } => keys::search_key(keyword, *page, *limit),
            Resource::Category { slug, page, limit } => {
                keys::filtered_key(keys::CATEGORY_PREFIX, slug, *page, *limit)
            }
            Resource::Country { slug, page, limit } => {
                keys::filtered_key(keys::COUNTRY_PREFIX, slug, *page, *limit)
            }
            Resource::Year { year, page, limit } => {
                keys::filtered_key(keys::YEAR_PREFIX, &year.to_string(), *page, *limit)
            }
            Resource::Categories => keys::CATEGORIES_KEY.to_string(),
            Resource::Countries => keys::COUNTRIES_KEY.to_string(),
        }
    }

    /// 上游路径
    pub fn path(&self) -> String {
        match self {
            Resource::NewMovies { .. } => "/danh-sach/phim-moi-cap-nhat".to_string(),
            Resource::Movies { .. } => "/v1/api/danh-sach/phim-le".to_string(),
            Resource::Series { .. } => "/v1/api/danh-sach/phim-bo".to_string(),
            Resource::TvShows { .. } => "/v1/api/danh-sach/tv-shows".to_string(),
            Resource::Anime { .. } => "/v1/api/danh-sach/hoat-hinh".to_string(),
            Resource::Detail { slug } => format!("/phim/{}", slug),
            Resource::Search { .. } => "/v1/api/tim-kiem".to_string(),
            Resource::Category { slug, .. } => format!("/v1/api/the-loai/{}", slug),
            Resource::Country { slug, .. } => format!("/v1/api/quoc-gia/{}", slug),
            Resource::Year { year, .. } => format!("/v1/api/nam/{}", year),
            Resource::Categories => "/the-loai".to_string(),
            Resource::Countries => "/quoc-gia".to_string(),
        }
    }

    pub fn query(&self) -> Query {
        match self {
            Resource::NewMovies { page } => vec![("page", page.to_string())],
            Resource::Movies { page, limit }
            | Resource::Series { page, limit }
            | Resource::TvShows { page, limit }
            | Resource::Anime { page, limit }
            | Resource::Category { page, limit, .. }
            | Resource::Country { page, limit, .. }
            | Resource::Year { page, limit, .. } => {
                vec![("page", page.to_string()), ("limit", limit.to_string())]
            }
            Resource::Search {
                keyword,
                page,
                limit,
            } => vec![
                ("keyword", keyword.clone()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ],
            Resource::Detail { .. } | Resource::Categories | Resource::Countries => Vec::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        let secs = match self {
            Resource::NewMovies { .. } => NEW_MOVIES_TTL,
            Resource::Movies { .. }
            | Resource::Series { .. }
            | Resource::TvShows { .. }
            | Resource::Anime { .. }
            | Resource::Category { .. }
            | Resource::Country { .. }
            | Resource::Year { .. } => LISTING_TTL,
            Resource::Detail { .. } => DETAIL_TTL,
            Resource::Search { .. } => SEARCH_TTL,
            Resource::Categories | Resource::Countries => REFERENCE_TTL,
        };
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_resources_map_to_v1_paths() {
        let movies = Resource::Movies { page: 2, limit: 20 };
        assert_eq!(movies.cache_key(), "movies:page:2:limit:20");
        assert_eq!(movies.path(), "/v1/api/danh-sach/phim-le");
        assert_eq!(
            movies.query(),
            vec![("page", "2".to_string()), ("limit", "20".to_string())]
        );
        assert_eq!(movies.ttl(), Duration::from_secs(600));
    }

    #[test]
    fn new_movies_use_short_ttl() {
        let new = Resource::NewMovies { page: 1 };
        assert_eq!(new.cache_key(), "new_movies:page:1");
        assert_eq!(new.path(), "/danh-sach/phim-moi-cap-nhat");
        assert_eq!(new.query(), vec![("page", "1".to_string())]);
        assert_eq!(new.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn detail_has_no_query() {
        let detail = Resource::Detail {
            slug: "tay-du-ky".to_string(),
        };
        assert_eq!(detail.cache_key(), "movie_detail:tay-du-ky");
        assert_eq!(detail.path(), "/phim/tay-du-ky");
        assert!(detail.query().is_empty());
        assert_eq!(detail.ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn search_orders_keyword_page_limit() {
        let search = Resource::Search {
            keyword: "naruto".to_string(),
            page: 1,
            limit: 10,
        };
        assert_eq!(search.cache_key(), "search:naruto:1:10");
        assert_eq!(
            search.query(),
            vec![
                ("keyword", "naruto".to_string()),
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
            ]
        );
        assert_eq!(search.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn filters_embed_slug_in_key_and_path() {
        let year = Resource::Year {
            year: 2024,
            page: 1,
            limit: DEFAULT_LIMIT,
        };
        assert_eq!(year.cache_key(), "year:2024:page:1:limit:20");
        assert_eq!(year.path(), "/v1/api/nam/2024");

        let country = Resource::Country {
            slug: "han-quoc".to_string(),
            page: 3,
            limit: DEFAULT_LIMIT,
        };
        assert_eq!(country.cache_key(), "country:han-quoc:page:3:limit:20");
        assert_eq!(country.path(), "/v1/api/quoc-gia/han-quoc");
    }

    #[test]
    fn reference_lists_are_cached_for_a_day() {
        assert_eq!(Resource::Categories.cache_key(), "categories");
        assert_eq!(Resource::Countries.path(), "/quoc-gia");
        assert_eq!(Resource::Categories.ttl(), Duration::from_secs(86400));
    }

    #[test]
    fn same_params_same_key() {
        let a = Resource::Category {
            slug: "hanh-dong".to_string(),
            page: 1,
            limit: 20,
        };
        assert_eq!(a.cache_key(), a.clone().cache_key());
    }
}
