// Serde helpers untuk field backend yang tipenya tidak konsisten.
// Backend kadang kirim id sebagai string ("1000123"), kadang number, kadang null.
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Float(f64),
    Text(String),
}

fn to_i64<E: de::Error>(raw: NumberOrString) -> Result<Option<i64>, E> {
    match raw {
        NumberOrString::Number(n) => Ok(Some(n)),
        NumberOrString::Float(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
        NumberOrString::Float(f) => Err(E::custom(format!("id bukan bilangan bulat: {}", f))),
        NumberOrString::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "-" {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| E::custom(format!("id tidak valid: {:?}", s)))
        }
    }
}

/// Id wajib: number atau string angka
pub fn i64_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = NumberOrString::deserialize(deserializer)?;
    to_i64(raw)?.ok_or_else(|| de::Error::custom("id kosong"))
}

/// Id optional: null, string kosong, dan 0 dianggap belum diisi
pub fn opt_i64_from_any<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrString> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) => Ok(to_i64(value)?.filter(|id| *id != 0)),
    }
}

/// String optional: string kosong dan "-" dianggap tidak ada
pub fn opt_trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "-"))
}

/// Tanggal optional: RFC 3339 ("2024-01-05T00:00:00+07:00"), datetime tanpa zona,
/// atau "yyyy-MM-dd". Hanya bagian tanggal yang disimpan.
pub fn opt_date_from_any<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .get(..10)
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("tanggal tidak valid: {:?}", raw)))
}
