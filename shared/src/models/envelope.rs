use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response standar backend STS: `{ success, message, count, data }`
///
/// Semua field optional karena beberapa endpoint cuma kirim sebagian
/// (misalnya `/handover/process` tanpa `data`, `/shipments/in-transit` tanpa `count`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T = Value> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Backend menandai gagal secara eksplisit dengan `success: false`
    pub fn is_explicit_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// Pesan dari server kalau ada dan tidak kosong
    pub fn server_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Bentuk response list: array langsung atau dibungkus `{ data: [...] }`
#[derive(Debug, Clone, PartialEq)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped(Vec<T>),
}

impl<T: DeserializeOwned> ListEnvelope<T> {
    /// Normalisasi satu-satunya untuk response list.
    /// `data: null` atau field `data` yang hilang dianggap list kosong.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(_) => Ok(ListEnvelope::Bare(serde_json::from_value(value)?)),
            Value::Object(mut map) => match map.remove("data") {
                None | Some(Value::Null) => Ok(ListEnvelope::Wrapped(Vec::new())),
                Some(data) => Ok(ListEnvelope::Wrapped(serde_json::from_value(data)?)),
            },
            Value::Null => Ok(ListEnvelope::Bare(Vec::new())),
            other => Err(serde::de::Error::custom(format!(
                "response list tidak dikenali: {}",
                json_kind(&other)
            ))),
        }
    }
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) | ListEnvelope::Wrapped(items) => items,
        }
    }
}

/// Bentuk response object tunggal: object langsung atau `{ success, data: {...} }`
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T>(pub T);

impl<T: DeserializeOwned> Envelope<T> {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if let Value::Object(map) = &value {
            if let Some(data) = map.get("data") {
                if data.is_object() {
                    return Ok(Envelope(serde_json::from_value(data.clone())?));
                }
            }
        }
        Ok(Envelope(serde_json::from_value(value)?))
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
