pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Parses a coordinate the way users type them: surrounding whitespace is
/// ignored, and only finite numbers are accepted.
pub fn parse_coordinate(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn is_valid_latitude(latitude: f64) -> bool {
    (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude)
}

pub fn is_valid_longitude(longitude: f64) -> bool {
    (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude)
}

pub fn is_valid_position(latitude: f64, longitude: f64) -> bool {
    is_valid_latitude(latitude) && is_valid_longitude(longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(is_valid_position(90.0, 180.0));
        assert!(is_valid_position(-90.0, -180.0));
        assert!(!is_valid_latitude(90.000001));
        assert!(!is_valid_longitude(-180.5));
    }

    #[test]
    fn rejects_non_finite_and_garbage() {
        assert_eq!(parse_coordinate(" 3.157324409 "), Some(3.157324409));
        assert_eq!(parse_coordinate("-0.5"), Some(-0.5));
        assert_eq!(parse_coordinate("NaN"), None);
        assert_eq!(parse_coordinate("inf"), None);
        assert_eq!(parse_coordinate("12abc"), None);
        assert_eq!(parse_coordinate(""), None);
    }
}
