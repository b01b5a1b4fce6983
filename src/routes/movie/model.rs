use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::utils::{is_truthy, upstream_succeeded};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    /// 页码从 1 开始，缺省为 1
    pub fn page(&self) -> Result<u32, AppError> {
        validate_page(self.page)
    }
}

pub fn validate_page(page: Option<i64>) -> Result<u32, AppError> {
    match page {
        None => Ok(1),
        Some(page) if page >= 1 => u32::try_from(page)
            .map_err(|_| AppError::BadRequest("Page number is too large".to_string())),
        Some(_) => Err(AppError::BadRequest(
            "Page number must be greater than or equal to 1".to_string(),
        )),
    }
}

/// 检查路径中的 slug，只允许字母、数字、连字符和下划线
///
/// slug 会拼进上游路径，`/`、`?`、`#`、`.` 等字符会改变请求的目标。
pub fn validate_slug<'a>(slug: &'a str, what: &str) -> Result<&'a str, AppError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(AppError::BadRequest(format!("{} slug is required", what)));
    }
    if !slug.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(AppError::BadRequest(format!("Invalid {} slug: {}", what.to_lowercase(), slug)));
    }
    Ok(slug)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ListingResponse {
    pub success: bool,
    pub data: Value,
    pub pagination: Value,
}

impl ListingResponse {
    /// 从上游列表响应中取出条目和分页；状态不是成功时返回 None
    ///
    /// 旧接口把 items/pagination 放在顶层，v1 接口放在 data 和 data.params 下。
    pub fn from_upstream(payload: &Value) -> Option<Self> {
        if !upstream_succeeded(payload) {
            return None;
        }

        let data = payload.get("data");
        let pagination = payload
            .get("pagination")
            .or_else(|| data.and_then(|d| d.get("params")).and_then(|p| p.get("pagination")))
            .or_else(|| data.and_then(|d| d.get("pagination")))
            .cloned()
            .unwrap_or_else(|| json!({}));

        Some(Self {
            success: true,
            data: items_of(payload),
            pagination,
        })
    }
}

/// 取出条目列表，缺失时为空数组
pub fn items_of(payload: &Value) -> Value {
    payload
        .get("items")
        .or_else(|| payload.get("data").and_then(|d| d.get("items")))
        .cloned()
        .unwrap_or_else(|| json!([]))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DetailResponse {
    pub success: bool,
    pub data: Value,
}

impl DetailResponse {
    pub fn from_upstream(payload: &Value) -> Option<Self> {
        let movie = payload.get("movie").filter(|movie| is_truthy(movie))?;
        Some(Self {
            success: true,
            data: movie.clone(),
        })
    }
}

/// 分类、国家等参考列表
#[derive(Debug, Serialize)]
pub struct ReferenceResponse {
    pub success: bool,
    pub data: Value,
}
