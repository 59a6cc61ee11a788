use crate::error::AppError;

/// Rejects blank names; the accepted name is kept exactly as sent.
pub fn validate_name(field: &str, name: String) -> Result<String, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::bad_request(format!("{field} required")));
    }
    Ok(name)
}

pub fn validate_price(price: f64) -> Result<f64, AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::bad_request(
            "Price must be a finite number greater than or equal to 0",
        ));
    }
    Ok(price)
}

pub fn validate_calories(calories: i32) -> Result<i32, AppError> {
    if calories < 0 {
        return Err(AppError::bad_request(
            "Calories must be greater than or equal to 0",
        ));
    }
    Ok(calories)
}

pub fn validate_quantity(quantity: i32) -> Result<i32, AppError> {
    if quantity < 1 {
        return Err(AppError::bad_request("Quantity must be at least 1"));
    }
    Ok(quantity)
}

pub fn null_not_allowed(field: &'static str) -> impl FnOnce() -> AppError {
    move || AppError::bad_request(format!("{field} cannot be null"))
}
