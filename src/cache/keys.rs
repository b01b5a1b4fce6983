//! 缓存键生成函数
//!
//! 资源标签在前，区分参数按固定顺序拼接，同一组参数总是得到同一个键。

/// 新片列表缓存键前缀
pub const NEW_MOVIES_PREFIX: &str = "new_movies";
pub const MOVIES_PREFIX: &str = "movies";
pub const SERIES_PREFIX: &str = "series";
pub const TV_SHOWS_PREFIX: &str = "tv_shows";
pub const ANIME_PREFIX: &str = "anime";
/// 详情页缓存键前缀
pub const MOVIE_DETAIL_PREFIX: &str = "movie_detail";
pub const SEARCH_PREFIX: &str = "search";
pub const CATEGORY_PREFIX: &str = "category";
pub const COUNTRY_PREFIX: &str = "country";
pub const YEAR_PREFIX: &str = "year";

/// 分类、国家列表键
pub const CATEGORIES_KEY: &str = "categories";
pub const COUNTRIES_KEY: &str = "countries";

pub fn new_movies_key(page: u32) -> String {
    format!("{}:page:{}", NEW_MOVIES_PREFIX, page)
}

/// 分页列表键：`{prefix}:page:{page}:limit:{limit}`
pub fn listing_key(prefix: &str, page: u32, limit: u32) -> String {
    format!("{}:page:{}:limit:{}", prefix, page, limit)
}

pub fn movie_detail_key(slug: &str) -> String {
    format!("{}:{}", MOVIE_DETAIL_PREFIX, slug)
}

pub fn search_key(keyword: &str, page: u32, limit: u32) -> String {
    format!("{}:{}:{}:{}", SEARCH_PREFIX, keyword, page, limit)
}

/// 按分类、国家、年份过滤的列表键：`{prefix}:{filter}:page:{page}:limit:{limit}`
pub fn filtered_key(prefix: &str, filter: &str, page: u32, limit: u32) -> String {
    format!("{}:{}:page:{}:limit:{}", prefix, filter, page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable() {
        assert_eq!(new_movies_key(1), "new_movies:page:1");
        assert_eq!(listing_key(MOVIES_PREFIX, 2, 20), "movies:page:2:limit:20");
        assert_eq!(movie_detail_key("ngoi-nha-hanh-phuc"), "movie_detail:ngoi-nha-hanh-phuc");
        assert_eq!(search_key("batman", 1, 10), "search:batman:1:10");
        assert_eq!(
            filtered_key(CATEGORY_PREFIX, "hanh-dong", 3, 20),
            "category:hanh-dong:page:3:limit:20"
        );
    }

    #[test]
    fn distinct_params_give_distinct_keys() {
        assert_ne!(listing_key(MOVIES_PREFIX, 1, 20), listing_key(MOVIES_PREFIX, 1, 10));
        assert_ne!(listing_key(MOVIES_PREFIX, 1, 20), listing_key(SERIES_PREFIX, 1, 20));
        assert_ne!(search_key("a", 1, 10), search_key("a", 2, 10));
    }
}
