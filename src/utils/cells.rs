use crate::error::{ProcessingError, Result};
use crate::models::TemperatureCell;
use crate::utils::constants::MISSING_MARKERS;

/// Parse a temperature cell, accepting a decimal comma (e.g., "27,5")
pub fn parse_temperature_cell(text: &str) -> TemperatureCell {
    let trimmed = text.trim();

    if MISSING_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
        return TemperatureCell::Missing;
    }

    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(value) => TemperatureCell::Value(value),
        Err(_) => TemperatureCell::Invalid(trimmed.to_string()),
    }
}

/// Parse a year/month/day cell; spreadsheet exports may write "2023.0"
pub fn parse_date_part(text: &str, field: &str) -> Result<i64> {
    let trimmed = text.trim();

    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value.is_finite() => Ok(value as i64),
        _ => Err(ProcessingError::InvalidFormat(format!(
            "Invalid {}: '{}'",
            field, trimmed
        ))),
    }
}

/// Position of the first header matching one of `names` (case-insensitive)
pub fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_temperature_cell() {
        assert_eq!(parse_temperature_cell(" 27.5 "), TemperatureCell::Value(27.5));
        assert_eq!(parse_temperature_cell("27,5"), TemperatureCell::Value(27.5));
        assert_eq!(parse_temperature_cell("-3"), TemperatureCell::Value(-3.0));
        assert_eq!(parse_temperature_cell(""), TemperatureCell::Missing);
        assert_eq!(parse_temperature_cell("NaN"), TemperatureCell::Missing);
        assert_eq!(
            parse_temperature_cell("hot"),
            TemperatureCell::Invalid("hot".to_string())
        );
    }

    #[test]
    fn test_parse_date_part() {
        assert_eq!(parse_date_part("2023", "year").unwrap(), 2023);
        assert_eq!(parse_date_part("7.0", "month").unwrap(), 7);
        assert!(parse_date_part("7.5", "month").is_err());
        assert!(parse_date_part("", "day").is_err());
    }

    #[test]
    fn test_find_column() {
        let headers: Vec<String> = ["Aasta", "Kuu", "Päev", "Tartu"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(find_column(&headers, &["year", "aasta"]), Some(0));
        assert_eq!(find_column(&headers, &["day", "paev", "päev"]), Some(2));
        assert_eq!(find_column(&headers, &["station"]), None);
    }
}
