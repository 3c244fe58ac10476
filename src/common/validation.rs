// src/common/validation.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Amount cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

pub fn not_in_future(value: &NaiveDate) -> Result<(), ValidationError> {
    if *value > Utc::now().date_naive() {
        let mut err = ValidationError::new("not_in_future");
        err.message = Some("Date cannot be in the future".into());
        return Err(err);
    }
    Ok(())
}

/// Lets an update tell "field absent" (`None`) from "field set to null"
/// (`Some(None)`). Use together with `#[serde(default)]`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        household_id: Option<Option<i64>>,
    }

    #[test]
    fn nullable_distinguishes_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.household_id, None);

        let null: Patch = serde_json::from_str(r#"{"household_id": null}"#).unwrap();
        assert_eq!(null.household_id, Some(None));

        let set: Patch = serde_json::from_str(r#"{"household_id": 4}"#).unwrap();
        assert_eq!(set.household_id, Some(Some(4)));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(non_negative(&Decimal::from_f64(-0.5).unwrap()).is_err());
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&Decimal::new(15000, 2)).is_ok());
    }

    #[test]
    fn future_dates_are_rejected() {
        let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
        assert!(not_in_future(&tomorrow).is_err());
        assert!(not_in_future(&NaiveDate::from_ymd_opt(1990, 5, 20).unwrap()).is_ok());
    }
}
