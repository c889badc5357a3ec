use crate::core::date_format::parse_utc_offset;
use crate::core::year_sort::SortOrder;
use crate::utils::error::{LaunchError, Result};
use url::Url;

pub const EXPORT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty".to_string()));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty".to_string()));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes".to_string()));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only".to_string(),
        ));
    }
    Ok(())
}

/// 年份必須與 `i32::to_string()` 的輸出完全一致，否則篩選永遠不會命中。
/// 空字串代表不篩選。
pub fn validate_year(field_name: &str, year: &str) -> Result<()> {
    if year.is_empty() {
        return Ok(());
    }

    match year.parse::<i32>() {
        Ok(parsed) if parsed.to_string() == year => Ok(()),
        Ok(_) => Err(invalid(
            field_name,
            year,
            "Year must not contain leading zeros or a sign prefix".to_string(),
        )),
        Err(_) => Err(invalid(field_name, year, "Year must be an integer".to_string())),
    }
}

/// Unknown sort directions are legal (they leave the order untouched), so this
/// only rejects values that look like a typo of a recognized direction.
pub fn validate_sort(field_name: &str, sort: &str) -> Result<()> {
    if sort.is_empty() || SortOrder::parse(sort).is_some() {
        return Ok(());
    }

    let lowered = sort.to_ascii_lowercase();
    if lowered == "ascending" || lowered == "descending" {
        return Err(invalid(
            field_name,
            sort,
            "Sort direction is case-sensitive: use 'Ascending' or 'Descending'".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_formats(field_name: &str, formats: &[String]) -> Result<()> {
    for format in formats {
        if !EXPORT_FORMATS.contains(&format.as_str()) {
            return Err(invalid(
                field_name,
                format,
                format!("Unsupported format. Valid formats: {}", EXPORT_FORMATS.join(", ")),
            ));
        }
    }
    Ok(())
}

pub fn validate_utc_offset(field_name: &str, offset: &str) -> Result<()> {
    parse_utc_offset(offset)
        .map(|_| ())
        .map_err(|reason| invalid(field_name, offset, reason))
}

fn invalid(field_name: &str, value: &str, reason: String) -> LaunchError {
    LaunchError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint", "https://example.com").is_ok());
        assert!(validate_url("endpoint", "http://example.com").is_ok());
        assert!(validate_url("endpoint", "").is_err());
        assert!(validate_url("endpoint", "invalid-url").is_err());
        assert!(validate_url("endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_year() {
        assert!(validate_year("year", "").is_ok());
        assert!(validate_year("year", "2020").is_ok());
        assert!(validate_year("year", "02020").is_err());
        assert!(validate_year("year", "+2020").is_err());
        assert!(validate_year("year", "twenty").is_err());
    }

    #[test]
    fn test_validate_sort() {
        assert!(validate_sort("sort", "Ascending").is_ok());
        assert!(validate_sort("sort", "Descending").is_ok());
        assert!(validate_sort("sort", "").is_ok());
        assert!(validate_sort("sort", "banana").is_ok());
        assert!(validate_sort("sort", "descending").is_err());
    }

    #[test]
    fn test_validate_formats() {
        let formats = vec!["csv".to_string(), "json".to_string()];
        assert!(validate_formats("formats", &formats).is_ok());

        let invalid_formats = vec!["xlsx".to_string()];
        assert!(validate_formats("formats", &invalid_formats).is_err());
    }

    #[test]
    fn test_validate_utc_offset() {
        assert!(validate_utc_offset("utc_offset", "+09:00").is_ok());
        assert!(validate_utc_offset("utc_offset", "-05:30").is_ok());
        assert!(validate_utc_offset("utc_offset", "nine").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("timeout_seconds", 30, 1).is_ok());
        assert!(validate_positive_number("timeout_seconds", 0, 1).is_err());
    }
}
