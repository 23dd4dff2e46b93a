use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};

// Buat value Authorization header dari token mentah
pub fn bearer_value(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))?;
    value.set_sensitive(true);
    Ok(value)
}

// Extract Authorization header dari headers
pub fn extract_auth_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}

// Extract bearer token dari Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

// Token yang disimpan kadang sudah berisi prefix "Bearer "
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    extract_bearer_token(trimmed).or_else(|| Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_roundtrip_through_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer_value("abc.def").unwrap());

        let header = extract_auth_header(&headers).unwrap();
        assert_eq!(header, "Bearer abc.def");
        assert_eq!(extract_bearer_token(&header), Some("abc.def".to_string()));
    }

    #[test]
    fn test_extract_bearer_rejects_other_schemes() {
        assert_eq!(extract_bearer_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_bearer_token("Bearer   "), None);
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("  tok "), Some("tok".to_string()));
        assert_eq!(normalize_token("Bearer tok"), Some("tok".to_string()));
        assert_eq!(normalize_token("   "), None);
    }

    #[test]
    fn test_bearer_value_rejects_newline() {
        assert!(bearer_value("bad\ntoken").is_err());
    }
}
