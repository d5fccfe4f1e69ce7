//! Buyer details entered at checkout, and their validation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const REQUIRED: &str = "This field is required";

/// What the buyer types into the checkout form.
///
/// Missing fields read as empty, so they fail validation as required
/// fields rather than failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuyerDetails {
    #[serde(alias = "fname")]
    pub first_name: String,
    #[serde(alias = "lname")]
    pub last_name: String,
    pub street: String,
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    /// Five-digit ZIP code.
    pub zip: String,
    pub card_number: String,
    /// `MM/YY`.
    pub expiration: String,
    /// Card security code.
    pub code: String,
}

/// One invalid form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name, as posted (`fname`, `zip`, ...).
    pub field: &'static str,
    /// Message shown next to the field.
    pub message: &'static str,
}

impl BuyerDetails {
    /// Check every field against the checkout rules, as of `today`.
    ///
    /// Returns all failing fields, not just the first.
    pub fn validate(&self, today: NaiveDate) -> Result<(), Vec<FieldError>> {
        let checks: [(&'static str, &str, Rule); 9] = [
            ("fname", self.first_name.as_str(), no_rule),
            ("lname", self.last_name.as_str(), no_rule),
            ("street", self.street.as_str(), no_rule),
            ("city", self.city.as_str(), no_rule),
            ("state", self.state.as_str(), state_rule),
            ("zip", self.zip.as_str(), zip_rule),
            ("cardNumber", self.card_number.as_str(), card_rule),
            ("expiration", self.expiration.as_str(), validate_expiration),
            ("code", self.code.as_str(), code_rule),
        ];

        let errors: Vec<FieldError> = checks
            .into_iter()
            .filter_map(|(field, value, check)| {
                let value = value.trim();
                let message = if value.is_empty() {
                    Some(REQUIRED)
                } else {
                    check(value, today)
                };
                message.map(|message| FieldError { field, message })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

type Rule = fn(&str, NaiveDate) -> Option<&'static str>;

fn no_rule(_: &str, _: NaiveDate) -> Option<&'static str> {
    None
}

fn state_rule(value: &str, _: NaiveDate) -> Option<&'static str> {
    let ok = value.len() == 2 && value.bytes().all(|b| b.is_ascii_uppercase());
    (!ok).then_some("State must be 2 letters (e.g., UT)")
}

fn zip_rule(value: &str, _: NaiveDate) -> Option<&'static str> {
    check_digits(value, 5, "ZIP code must be 5 digits")
}

fn card_rule(value: &str, _: NaiveDate) -> Option<&'static str> {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    check_digits(&digits, 16, "Card number must be 16 digits")
}

fn code_rule(value: &str, _: NaiveDate) -> Option<&'static str> {
    check_digits(value, 3, "Security code must be 3 digits")
}

fn check_digits(value: &str, len: usize, message: &'static str) -> Option<&'static str> {
    let ok = value.len() == len && value.bytes().all(|b| b.is_ascii_digit());
    (!ok).then_some(message)
}

/// Check a card expiration of the form `MM/YY` against `today`.
///
/// Returns the error message, or `None` if the card is still valid. A card
/// expiring this month is valid.
pub fn validate_expiration(value: &str, today: NaiveDate) -> Option<&'static str> {
    const FORMAT: &str = "Expiration must be MM/YY format";

    let Some((month, year)) = value.split_once('/') else {
        return Some(FORMAT);
    };
    if month.len() != 2 || year.len() != 2 {
        return Some(FORMAT);
    }
    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<u32>()) else {
        return Some(FORMAT);
    };
    if !(1..=12).contains(&month) {
        return Some(FORMAT);
    }

    let current_year = today.year().rem_euclid(100) as u32;
    if year < current_year || (year == current_year && month < today.month()) {
        return Some("Card has expired");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn buyer() -> BuyerDetails {
        BuyerDetails {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            street: "12 Trail Rd".into(),
            city: "Provo".into(),
            state: "UT".into(),
            zip: "84601".into(),
            card_number: "1234 5678 9012 3456".into(),
            expiration: "11/27".into(),
            code: "123".into(),
        }
    }

    #[test]
    fn test_valid_buyer() {
        assert_eq!(buyer().validate(today()), Ok(()));
    }

    #[test]
    fn test_reports_every_bad_field() {
        let mut b = buyer();
        b.first_name = "  ".into();
        b.state = "ut".into();
        b.zip = "8460".into();
        b.code = "12a".into();

        let errors = b.validate(today()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["fname", "state", "zip", "code"]);
        assert_eq!(errors[0].message, "This field is required");
        assert_eq!(errors[1].message, "State must be 2 letters (e.g., UT)");
    }

    #[test]
    fn test_card_number_length() {
        let mut b = buyer();
        b.card_number = "4111 1111 1111".into();
        let errors = b.validate(today()).unwrap_err();
        assert_eq!(errors[0].message, "Card number must be 16 digits");
    }

    #[test]
    fn test_expiration() {
        assert_eq!(validate_expiration("10/26", today()), None);
        assert_eq!(validate_expiration("01/30", today()), None);
        assert_eq!(validate_expiration("09/26", today()), Some("Card has expired"));
        assert_eq!(validate_expiration("12/25", today()), Some("Card has expired"));
        assert_eq!(
            validate_expiration("13/27", today()),
            Some("Expiration must be MM/YY format")
        );
        assert_eq!(
            validate_expiration("1/27", today()),
            Some("Expiration must be MM/YY format")
        );
        assert_eq!(
            validate_expiration("1127", today()),
            Some("Expiration must be MM/YY format")
        );
    }

    #[test]
    fn test_parse_form_fields() {
        let parsed: BuyerDetails =
            serde_json::from_str(r#"{"fname":"Ada","lname":"Lovelace","zip":"84601"}"#).unwrap();
        assert_eq!(parsed.first_name, "Ada");
        assert_eq!(parsed.last_name, "Lovelace");

        let errors = parsed.validate(today()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().all(|e| e.message == "This field is required"));
    }
}
