use rust_decimal::Decimal;

use crate::error::FieldErrors;

pub const REQUIRED: &str = "This field is required.";

/// Prices are stored with at most 8 whole digits and 2 decimal places.
pub const PRICE_WHOLE_DIGITS: u32 = 8;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "12345678", "123456789", "qwertyuiop", "iloveyou",
    "sunshine", "princess", "football", "baseball", "welcome1", "letmein1",
];

pub fn require(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if value.map(str::trim).unwrap_or_default().is_empty() {
        errors.add(field, REQUIRED);
    }
}

/// Minimal address shape: `local@domain.tld`, no whitespace.
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

pub fn check_email(errors: &mut FieldErrors, field: &str, value: &str) {
    if !looks_like_email(value) {
        errors.add(field, "Enter a valid email address.");
    }
}

pub fn check_password_strength(errors: &mut FieldErrors, field: &str, password: &str) {
    if password.chars().count() < 8 {
        errors.add(field, "This password is too short. It must contain at least 8 characters.");
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }
    if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        errors.add(field, "This password is too common.");
    }
}

pub fn check_price(errors: &mut FieldErrors, field: &str, price: Decimal) {
    if price.is_sign_negative() {
        errors.add(field, "Ensure this value is greater than or equal to 0.");
    }
    if price.scale() > PRICE_DECIMAL_PLACES {
        errors.add(field, format!("Ensure that there are no more than {} decimal places.", PRICE_DECIMAL_PLACES));
    }
    if price.trunc().abs() >= Decimal::from(10_i64.pow(PRICE_WHOLE_DIGITS)) {
        errors.add(field, format!("Ensure that there are no more than {} digits before the decimal point.", PRICE_WHOLE_DIGITS));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(looks_like_email("ana@example.com"));
        assert!(looks_like_email("a.b+c@mail.example.org"));
        assert!(!looks_like_email("ana"));
        assert!(!looks_like_email("ana@localhost"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ana@@example.com"));
        assert!(!looks_like_email("ana @example.com"));
        assert!(!looks_like_email("ana@example."));
    }

    #[test]
    fn test_password_rules() {
        let mut errors = FieldErrors::new();
        check_password_strength(&mut errors, "password", "Str0ng-enough");
        assert!(errors.is_empty());

        check_password_strength(&mut errors, "password", "short");
        assert!(errors.contains("password"));

        let mut numeric = FieldErrors::new();
        check_password_strength(&mut numeric, "new_password", "9876543210");
        assert_eq!(numeric.0["new_password"], vec!["This password is entirely numeric.".to_string()]);

        let mut common = FieldErrors::new();
        check_password_strength(&mut common, "password", "Password");
        assert!(common.0["password"].iter().any(|m| m.contains("too common")));
    }

    #[test]
    fn test_require_rejects_blank() {
        let mut errors = FieldErrors::new();
        require(&mut errors, "username", Some("   "));
        require(&mut errors, "email", None);
        require(&mut errors, "phone_number", Some("555-0100"));
        assert!(errors.contains("username"));
        assert!(errors.contains("email"));
        assert!(!errors.contains("phone_number"));
    }

    #[test]
    fn test_price_bounds() {
        let mut ok = FieldErrors::new();
        check_price(&mut ok, "price", Decimal::new(9_999_999_999, 2));
        check_price(&mut ok, "price", Decimal::new(5000, 2));
        check_price(&mut ok, "price", Decimal::ZERO);
        assert!(ok.is_empty());

        let mut too_precise = FieldErrors::new();
        check_price(&mut too_precise, "price", Decimal::new(12345, 3));
        assert_eq!(too_precise.0["price"], vec!["Ensure that there are no more than 2 decimal places.".to_string()]);

        let mut too_large = FieldErrors::new();
        check_price(&mut too_large, "price", Decimal::from(100_000_000));
        assert!(too_large.0["price"][0].contains("8 digits before the decimal point"));

        let mut huge = FieldErrors::new();
        check_price(&mut huge, "price", Decimal::MAX);
        assert!(huge.contains("price"));

        let mut negative = FieldErrors::new();
        check_price(&mut negative, "price", Decimal::new(-100, 2));
        assert!(negative.contains("price"));
    }
}
