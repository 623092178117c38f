use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::ordering::Nested;

/// 代碼或日期的原始 JSON 值，寫檔時原樣輸出。
///
/// 數字依數值比較，字串依字典序比較；型別不同時依
/// null < bool < 數字 < 字串 < 其他 排列。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scalar(Value);

impl Scalar {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_truthy(&self) -> bool {
        is_truthy(&self.0)
    }

    fn type_rank(&self) -> u8 {
        match self.0 {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) | Value::Object(_) => 4,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        scalar.0
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            Value::Null => Ok(()),
            other => write!(f, "{}", other),
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (a, b) => self
                .type_rank()
                .cmp(&other.type_rank())
                .then_with(|| a.to_string().cmp(&b.to_string())),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        matches!(&self.0, Value::String(s) if s == other)
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or_default();
    let y = b.as_f64().unwrap_or_default();
    x.total_cmp(&y)
}

/// 省級或市級行政區，`children` 為其下轄的市級行政區。
///
/// 只解讀 `cityCode` 與 `children`，其餘欄位（含 `cityName`）原樣保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "cityCode")]
    pub code: Scalar,

    #[serde(default)]
    pub children: Vec<Region>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Region {
    pub fn new(code: impl Into<Scalar>, label: &str) -> Self {
        let mut extra = Map::new();
        extra.insert("cityName".to_string(), Value::from(label));
        Self {
            code: code.into(),
            children: Vec::new(),
            extra,
        }
    }

    pub fn with_child(mut self, child: Region) -> Self {
        self.children.push(child);
        self
    }

    pub fn label(&self) -> &str {
        self.extra
            .get("cityName")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

impl Nested for Region {
    fn split_children(mut self) -> (Self, Vec<Self>) {
        let children = std::mem::take(&mut self.children);
        (self, children)
    }

    fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }
}

/// 直轄市下的區縣，只保留代碼與名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    #[serde(rename = "cityCode")]
    pub code: Scalar,

    #[serde(rename = "cityName", default)]
    pub label: Scalar,
}

impl County {
    pub fn new(code: impl Into<Scalar>, label: &str) -> Self {
        Self {
            code: code.into(),
            label: Scalar::from(label),
        }
    }

    /// 從 `cityInfo` 的一筆原始資料投影出 County；代碼為假值時回傳 None
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let code = Scalar::new(entry.get("cityCode")?.clone());
        if !code.is_truthy() {
            return None;
        }

        Some(Self {
            code,
            label: Scalar::new(entry.get("cityName").cloned().unwrap_or_default()),
        })
    }
}

/// 單筆異動紀錄；除 `date` 外的欄位原樣保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: Scalar,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// 遠端 API 回應外層 `{code, rsp}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub rsp: Value,
}

/// 所有請求共用的 `{"request": {"req": {<param>: <value>}}}` 外殼
pub fn request_payload(param: &str, value: impl Into<Value>) -> Value {
    let mut req = Map::new();
    req.insert(param.to_string(), value.into());
    serde_json::json!({ "request": { "req": req } })
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
