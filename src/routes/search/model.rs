use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::routes::movie::validate_page;

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const MAX_SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// 校验后的搜索参数
#[derive(Debug, PartialEq)]
pub struct SearchParams {
    pub keyword: String,
    pub page: u32,
    pub limit: u32,
}

impl SearchQuery {
    pub fn validate(self) -> Result<SearchParams, AppError> {
        let keyword = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::BadRequest("Search keyword is required".to_string()))?
            .to_string();

        let limit = match self.limit {
            None => DEFAULT_SEARCH_LIMIT,
            Some(limit) if (1..=i64::from(MAX_SEARCH_LIMIT)).contains(&limit) => limit as u32,
            Some(_) => {
                return Err(AppError::BadRequest(format!(
                    "Limit must be between 1 and {}",
                    MAX_SEARCH_LIMIT
                )));
            }
        };

        Ok(SearchParams {
            keyword,
            page: validate_page(self.page)?,
            limit,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub keyword: String,
    pub data: Value,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(keyword: Option<&str>, limit: Option<i64>) -> SearchQuery {
        SearchQuery {
            keyword: keyword.map(str::to_string),
            limit,
            page: None,
        }
    }

    #[test]
    fn trims_keyword_and_applies_defaults() {
        let params = query(Some("  one piece "), None).validate().unwrap();
        assert_eq!(
            params,
            SearchParams {
                keyword: "one piece".to_string(),
                page: 1,
                limit: DEFAULT_SEARCH_LIMIT,
            }
        );
    }

    #[test]
    fn rejects_missing_or_blank_keyword() {
        assert!(matches!(query(None, None).validate(), Err(AppError::BadRequest(_))));
        assert!(matches!(query(Some("   "), None).validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn limit_must_be_in_range() {
        assert_eq!(query(Some("a"), Some(50)).validate().unwrap().limit, 50);
        assert!(query(Some("a"), Some(0)).validate().is_err());
        assert!(query(Some("a"), Some(51)).validate().is_err());
    }
}
