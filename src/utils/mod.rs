use serde_json::Value;

/// JSON 真值判断：null、false、0、空串、空数组、空对象都视为无数据
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// 上游的状态字段：v1 接口返回 "success"，旧接口返回 true
pub fn upstream_succeeded(payload: &Value) -> bool {
    match payload.get("status") {
        Some(Value::String(s)) => s == "success",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_follows_json_emptiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(1), json!("x"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn status_accepts_both_upstream_styles() {
        assert!(upstream_succeeded(&json!({"status": "success"})));
        assert!(upstream_succeeded(&json!({"status": true})));
        assert!(!upstream_succeeded(&json!({"status": "error"})));
        assert!(!upstream_succeeded(&json!({"status": false})));
        assert!(!upstream_succeeded(&json!({"items": []})));
    }
}
