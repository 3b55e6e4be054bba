use crate::utils::error::{Result, TravelError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TravelError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| TravelError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TravelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

// 以下為使用者輸入 (表單欄位) 的驗證，錯誤類別為 InputError

pub fn validate_non_empty_input(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TravelError::InputError {
            field: field_name.to_string(),
            message: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_minimum_amount(field_name: &str, value: f64, min_value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TravelError::InputError {
            field: field_name.to_string(),
            message: format!("'{}' is not a number", value),
        });
    }
    if value < min_value {
        return Err(TravelError::InputError {
            field: field_name.to_string(),
            message: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_positive_count(field_name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(TravelError::InputError {
            field: field_name.to_string(),
            message: "Value must be at least 1".to_string(),
        });
    }
    Ok(())
}
