use indexmap::IndexMap;
use serde_json::{Map, Value};

const LIMIT_HEADER_PREFIXES: [&str; 2] = ["x-mbx-used-weight", "x-mbx-order-count"];

/// 응답 헤더에서 추출한 rate limit 사용량 (`x-mbx-used-weight-1m` 등).
///
/// 헤더 이름은 소문자로 바꾸고 응답 순서대로 보관한다. 비어 있으면 거래소가
/// 이번 호출에 사용량 헤더를 보내지 않은 것이다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitUsage {
    headers: IndexMap<String, String>,
}

impl LimitUsage {
    /// `(name, value)` 쌍에서 알려진 rate limit 헤더만 고른다.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .filter(|(name, _)| LIMIT_HEADER_PREFIXES.iter().any(|p| name.starts_with(p)))
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        Self { headers }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn used_weight_1m(&self) -> Option<u32> {
        self.get("x-mbx-used-weight-1m").and_then(|v| v.parse().ok())
    }

    pub fn order_count_10s(&self) -> Option<u32> {
        self.get("x-mbx-order-count-10s").and_then(|v| v.parse().ok())
    }

    pub fn order_count_1m(&self) -> Option<u32> {
        self.get("x-mbx-order-count-1m").and_then(|v| v.parse().ok())
    }
}

/// 성공한 호출의 원문 본문. 요청한 경우 사용량 정보가 함께 온다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub data: String,
    /// limit usage 표시를 끈 호출이면 `None`
    pub limit_usage: Option<LimitUsage>,
}

impl Response {
    pub fn new(data: impl Into<String>, limit_usage: Option<LimitUsage>) -> Self {
        Self {
            data: data.into(),
            limit_usage,
        }
    }

    /// limit usage 헤더를 최상위 키로, 본문을 `"data"` 아래에 둔 JSON.
    /// 사용량 정보가 없으면 본문을 그대로 돌려준다.
    pub fn to_json(&self) -> String {
        let Some(usage) = &self.limit_usage else {
            return self.data.clone();
        };

        let mut out = Map::new();
        for (name, value) in usage.iter() {
            out.insert(name.to_string(), Value::String(value.to_string()));
        }
        let data = serde_json::from_str::<Value>(&self.data)
            .unwrap_or_else(|_| Value::String(self.data.clone()));
        out.insert("data".to_string(), data);
        Value::Object(out).to_string()
    }
}
