//! Input validation for externally supplied results

use crate::{
    error::{AppError, Result},
    models::{Decimal2, DecimalError, NewMeasurement, SpeedTestInput},
};

/// Input that passed validation, normalized to two decimal digits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInput {
    pub download_speed: Decimal2,
    pub upload_speed: Decimal2,
    pub ping: Decimal2,
}

impl ValidatedInput {
    /// Row to insert, recorded at insertion time
    pub fn into_new_measurement(self) -> NewMeasurement {
        NewMeasurement::new(self.download_speed, self.upload_speed, self.ping)
    }
}

/// Check a caller-supplied result.
///
/// Fields are checked in order (download, upload, ping) and the first
/// violation is reported with its field name. The constraints apply to the
/// value as supplied; rounding to two digits happens afterwards.
pub fn validate_speed_test_input(input: &SpeedTestInput) -> Result<ValidatedInput> {
    Ok(ValidatedInput {
        download_speed: positive("download_speed", input.download_speed)?,
        upload_speed: positive("upload_speed", input.upload_speed)?,
        ping: non_negative("ping", input.ping)?,
    })
}

fn positive(field: &str, value: f64) -> Result<Decimal2> {
    let decimal = to_decimal(field, value)?;
    if value <= 0.0 {
        return Err(AppError::validation(field, "must be greater than 0"));
    }
    Ok(decimal)
}

fn non_negative(field: &str, value: f64) -> Result<Decimal2> {
    let decimal = to_decimal(field, value)?;
    if value < 0.0 {
        return Err(AppError::validation(field, "must not be negative"));
    }
    Ok(decimal)
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal2> {
    Decimal2::from_f64(value).map_err(|e| match e {
        DecimalError::NotFinite => AppError::validation(field, "must be a finite number"),
        other => AppError::validation(field, other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: Result<ValidatedInput>) -> String {
        result.unwrap_err().field().unwrap().to_string()
    }

    #[test]
    fn test_valid_input_is_normalized() {
        let validated = validate_speed_test_input(&SpeedTestInput::new(123.456, 67.89, 0.0)).unwrap();

        assert_eq!(validated.download_speed.to_string(), "123.46");
        assert_eq!(validated.upload_speed.to_string(), "67.89");
        assert_eq!(validated.ping, Decimal2::ZERO);
    }

    #[test]
    fn test_non_positive_speeds_rejected() {
        assert_eq!(field_of(validate_speed_test_input(&SpeedTestInput::new(0.0, 1.0, 1.0))), "download_speed");
        assert_eq!(field_of(validate_speed_test_input(&SpeedTestInput::new(-5.0, 1.0, 1.0))), "download_speed");
        assert_eq!(field_of(validate_speed_test_input(&SpeedTestInput::new(1.0, 0.0, 1.0))), "upload_speed");
    }

    #[test]
    fn test_negative_ping_rejected() {
        let error = validate_speed_test_input(&SpeedTestInput::new(1.0, 1.0, -0.01)).unwrap_err();
        assert_eq!(error.field(), Some("ping"));
        assert!(error.to_string().contains("must not be negative"));
    }

    #[test]
    fn test_first_violation_reported() {
        assert_eq!(field_of(validate_speed_test_input(&SpeedTestInput::new(0.0, 0.0, -1.0))), "download_speed");
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(field_of(validate_speed_test_input(&SpeedTestInput::new(f64::NAN, 1.0, 1.0))), "download_speed");
        assert_eq!(field_of(validate_speed_test_input(&SpeedTestInput::new(1.0, f64::INFINITY, 1.0))), "upload_speed");
        assert_eq!(field_of(validate_speed_test_input(&SpeedTestInput::new(1.0, 1.0, f64::NAN))), "ping");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let error = validate_speed_test_input(&SpeedTestInput::new(1_000_000.0, 1.0, 1.0)).unwrap_err();
        assert_eq!(error.field(), Some("download_speed"));
    }

    #[test]
    fn test_tiny_positive_value_accepted() {
        let validated = validate_speed_test_input(&SpeedTestInput::new(0.001, 0.004, 0.0)).unwrap();
        assert_eq!(validated.download_speed, Decimal2::ZERO);
    }
}
