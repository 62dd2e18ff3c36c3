use std::fmt;

use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;

/// 요청 파라미터 값. 쿼리 문자열에 들어갈 때의 표기 규칙은 `Display`가 정한다.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Array(Vec<ParamValue>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Array(_) => "array",
        }
    }
}

/// Scalar rendering. Floats use the shortest round-trip form, which never
/// switches to exponent notation. Arrays render comma-joined; the query
/// encoder expands them into repeated keys instead.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::UInt(v.into())
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

/// 삽입 순서를 유지하는 파라미터 맵.
///
/// 순서가 곧 정규 쿼리 문자열의 순서이고 서명 입력이므로, 같은 키를 다시 넣으면
/// 값만 바뀌고 위치는 유지된다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    inner: IndexMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.inner.insert(name.into(), value.into());
    }

    /// Inserts only when `name` is not present yet.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.inner.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.inner.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, ParamValue> {
        self.inner.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParamValue);
    type IntoIter = IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let params = ParameterSet::new()
            .with("symbol", "BTCUSDT")
            .with("side", "SELL")
            .with("type", "LIMIT")
            .with("quantity", 0.01);

        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, vec!["symbol", "side", "type", "quantity"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut params = ParameterSet::new().with("timestamp", 1_i64).with("symbol", "ETHUSDT");
        params.insert("timestamp", 2_i64);

        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, vec!["timestamp", "symbol"]);
        assert_eq!(params.get("timestamp"), Some(&ParamValue::Int(2)));
    }

    #[test]
    fn test_insert_if_absent() {
        let mut params = ParameterSet::new().with("recvWindow", 10_000_u64);
        params.insert_if_absent("recvWindow", 5_000_u64);
        params.insert_if_absent("timestamp", 1_u64);

        assert_eq!(params.get("recvWindow"), Some(&ParamValue::UInt(10_000)));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ParamValue::from(0.01).to_string(), "0.01");
        assert_eq!(ParamValue::from(50000.0).to_string(), "50000");
        assert_eq!(ParamValue::from(0.0000001).to_string(), "0.0000001");
        assert_eq!(ParamValue::from(1e21).to_string(), "1000000000000000000000");
        assert_eq!(ParamValue::from(true).to_string(), "true");
        assert_eq!(ParamValue::from(-7_i64).to_string(), "-7");
        assert_eq!(ParamValue::from(vec!["A", "B"]).to_string(), "A,B");
    }

    #[test]
    fn test_from_iterator() {
        let params: ParameterSet = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(params.get("b").and_then(ParamValue::as_str), Some("2"));
    }
}
