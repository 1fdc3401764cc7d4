//! # Validation Module
//!
//! Input validation run before anything is sent to the backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Argument parsing (clap)                                      │
//! │  ├── Types: ids are integers, statuses are known names                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, prices, quantities                      │
//! │  └── Fails before any network call                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── 400/422 → ClientError::Rejected                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderly_core::validation::{parse_price, validate_quantity};
//!
//! assert_eq!(parse_price("12.5").unwrap().cents(), 1250);
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductInput;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length for accounts created from this client.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const MAX_USERNAME_LENGTH: usize = 50;
const MAX_PRODUCT_NAME_LENGTH: usize = 100;
const MAX_SEARCH_LENGTH: usize = 100;

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a username.
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
/// - No whitespace inside
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LENGTH,
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Checks the password typed at login. Only presence is checked; the
/// backend decides whether it is right.
pub fn validate_login_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

/// Checks a password for a new account (registration or admin create).
pub fn validate_new_password(password: &str) -> ValidationResult<()> {
    validate_login_password(password)?;

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product name: required, at most 100 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Parses a price typed by an admin.
///
/// ## Example
/// ```rust
/// use orderly_core::validation::parse_price;
///
/// assert_eq!(parse_price("4").unwrap().cents(), 400);
/// assert!(parse_price("").is_err());
/// assert!(parse_price("four").is_err());
/// assert!(parse_price("-1").is_err());
/// ```
pub fn parse_price(raw: &str) -> ValidationResult<Money> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    let price = Money::parse_decimal(raw).map_err(|e| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: e.to_string(),
    })?;

    if price.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(price)
}

/// Builds a product body from raw form fields.
///
/// Blank optional fields become `None`.
pub fn product_input(
    name: &str,
    description: Option<&str>,
    price: &str,
    image_uri: Option<&str>,
) -> ValidationResult<ProductInput> {
    validate_product_name(name)?;
    let price = parse_price(price)?;

    let non_blank = |s: Option<&str>| {
        s.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(ProductInput {
        name: name.trim().to_string(),
        description: non_blank(description),
        price,
        product_image_uri: non_blank(image_uri),
    })
}

/// Normalizes a search query: trimmed, at most 100 characters.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order or cart quantity (1..=99).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Backend ids are positive integers.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("ana").is_ok());
        assert!(validate_username("  ").is_err());
        assert!(validate_username("two words").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_passwords() {
        assert!(validate_login_password("x").is_ok());
        assert!(validate_login_password("").is_err());
        assert!(validate_new_password("secret").is_ok());
        assert!(matches!(
            validate_new_password("abc"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
    }

    #[test]
    fn test_product_input_requires_name_and_numeric_price() {
        assert!(matches!(
            product_input(" ", None, "1.00", None),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            product_input("Tea", None, "", None),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            product_input("Tea", None, "cheap", None),
            Err(ValidationError::InvalidFormat { .. })
        ));

        let input = product_input(" Tea ", Some(""), "2.5", Some(" img.png ")).unwrap();
        assert_eq!(input.name, "Tea");
        assert_eq!(input.description, None);
        assert_eq!(input.price.cents(), 250);
        assert_eq!(input.product_image_uri.as_deref(), Some("img.png"));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  noodles ").unwrap(), "noodles");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("product id", 3).is_ok());
        assert!(validate_id("product id", 0).is_err());
    }
}
