use crate::utils::error::{ConnectorError, Result};
use serde_json::Value;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ConnectorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConnectorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ConnectorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConnectorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ConnectorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses a user-supplied JSON parameter, reporting the parameter name on failure.
pub fn parse_json_field(field_name: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| ConnectorError::ValidationError {
        field: field_name.to_string(),
        message: format!("invalid JSON: {}", e),
    })
}

/// Parses a user-supplied JSON parameter and rejects anything that is not an array.
pub fn parse_json_array_field(field_name: &str, raw: &str) -> Result<Value> {
    let value = parse_json_field(field_name, raw)?;
    if !value.is_array() {
        return Err(ConnectorError::ValidationError {
            field: field_name.to_string(),
            message: "must be a JSON array".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("server", "https://api.jiandaoyun.com/").is_ok());
        assert!(validate_url("server", "http://localhost:8080").is_ok());
        assert!(validate_url("server", "").is_err());
        assert!(validate_url("server", "not-a-url").is_err());
        assert!(validate_url("server", "ftp://api.jiandaoyun.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("api_key", "abc").is_ok());
        assert!(validate_non_empty_string("api_key", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("returnCount", 100, 1, 100).is_ok());
        assert!(validate_range("returnCount", 0, 1, 100).is_err());
        assert!(validate_range("returnCount", 101, 1, 100).is_err());
    }

    #[test]
    fn test_parse_json_array_field() {
        assert!(parse_json_array_field("dataRecordIdsJson", "[\"a\", \"b\"]").is_ok());

        let err = parse_json_array_field("dataRecordIdsJson", "{\"a\": 1}").unwrap_err();
        assert!(err.to_string().contains("must be a JSON array"));

        let err = parse_json_array_field("dataRecordIdsJson", "not json").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }
}
