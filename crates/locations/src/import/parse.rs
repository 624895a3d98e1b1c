use itertools::Itertools;
use model::location::NewLocation;
use utility::geo;

use super::{Candidate, ImportError, LineError, LineErrorKind, ParsedPayload};

/// Splits a payload into candidates and per line errors.
///
/// The first line is always dropped, whatever it contains. Blank lines are
/// skipped without an error but still count towards the line numbers.
pub fn parse_payload(text: &str) -> Result<ParsedPayload, ImportError> {
    let mut payload = ParsedPayload::default();
    let mut data_lines = 0;

    for (index, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        data_lines += 1;

        let number = index + 1;
        match parse_line(line) {
            Ok(location) => payload.candidates.push(Candidate {
                line: number,
                location,
            }),
            Err(kind) => {
                log::debug!("skipping line {}: {}", number, kind);
                payload.errors.push(LineError { line: number, kind });
            }
        }
    }

    if data_lines == 0 {
        return Err(ImportError::Empty);
    }
    if payload.candidates.is_empty() {
        return Err(ImportError::NoValidLocations(payload.errors));
    }
    Ok(payload)
}

/// Parses one `name,latitude,longitude` line. Checks run in order and the
/// first failing one decides the error.
pub fn parse_line(line: &str) -> Result<NewLocation, LineErrorKind> {
    let (name, latitude, longitude) = line
        .split(',')
        .map(str::trim)
        .collect_tuple()
        .ok_or(LineErrorKind::InvalidFormat)?;

    if name.is_empty() {
        return Err(LineErrorKind::MissingName);
    }

    let (Some(latitude), Some(longitude)) =
        (geo::parse_coordinate(latitude), geo::parse_coordinate(longitude))
    else {
        return Err(LineErrorKind::InvalidCoordinates);
    };

    if !geo::is_valid_position(latitude, longitude) {
        return Err(LineErrorKind::OutOfRange);
    }

    Ok(NewLocation::new(name, latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_valid_line() {
        assert_eq!(
            parse_line("  Suria KLCC , 3.157324409 ,101.7121981 "),
            Ok(NewLocation::new("Suria KLCC", 3.157324409, 101.7121981))
        );
    }

    #[test]
    fn requires_exactly_three_columns() {
        assert_eq!(parse_line("Bad Row"), Err(LineErrorKind::InvalidFormat));
        assert_eq!(parse_line("A,1"), Err(LineErrorKind::InvalidFormat));
        assert_eq!(parse_line("A,1,2,3"), Err(LineErrorKind::InvalidFormat));
    }

    #[test]
    fn column_count_is_checked_before_coordinates() {
        assert_eq!(parse_line("A,north,2,x"), Err(LineErrorKind::InvalidFormat));
    }

    #[test]
    fn rejects_unparseable_coordinates() {
        assert_eq!(
            parse_line("A,north,101"),
            Err(LineErrorKind::InvalidCoordinates)
        );
        assert_eq!(parse_line("A,1,"), Err(LineErrorKind::InvalidCoordinates));
        assert_eq!(parse_line("A,NaN,1"), Err(LineErrorKind::InvalidCoordinates));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(parse_line("X,95,100"), Err(LineErrorKind::OutOfRange));
        assert_eq!(parse_line("X,45,-181"), Err(LineErrorKind::OutOfRange));
        assert!(parse_line("Edge,-90,180").is_ok());
    }

    #[test]
    fn rejects_empty_names() {
        assert_eq!(parse_line(" ,1,2"), Err(LineErrorKind::MissingName));
    }

    #[test]
    fn keeps_valid_lines_and_reports_the_rest() {
        let payload =
            parse_payload("name,lat,lng\nSuria KLCC,3.157324409,101.7121981\nBad Row\n").unwrap();
        assert_eq!(
            payload.candidates,
            vec![Candidate {
                line: 2,
                location: NewLocation::new("Suria KLCC", 3.157324409, 101.7121981),
            }]
        );
        assert_eq!(
            payload.errors,
            vec![LineError {
                line: 3,
                kind: LineErrorKind::InvalidFormat
            }]
        );
        assert_eq!(
            payload.errors[0].to_string(),
            "Line 3: Invalid format (expected 3 columns)"
        );
    }

    #[test]
    fn header_is_dropped_even_if_it_looks_like_data() {
        let payload = parse_payload("A,1,2\nB,3,4").unwrap();
        assert_eq!(payload.candidates.len(), 1);
        assert_eq!(payload.candidates[0].location.name, "B");
    }

    #[test]
    fn line_numbers_count_blank_lines_and_windows_line_endings() {
        let payload = parse_payload("header\r\n\r\nA,1,2\r\n   \r\nB,x,2\r\n").unwrap();
        assert_eq!(payload.candidates[0].line, 3);
        assert_eq!(
            payload.errors,
            vec![LineError {
                line: 5,
                kind: LineErrorKind::InvalidCoordinates
            }]
        );
    }

    #[test]
    fn header_only_payload_is_empty() {
        assert!(matches!(
            parse_payload("name,lat,lng\n"),
            Err(ImportError::Empty)
        ));
        assert!(matches!(
            parse_payload("name,lat,lng\n\n   \n"),
            Err(ImportError::Empty)
        ));
        assert!(matches!(parse_payload(""), Err(ImportError::Empty)));
    }

    #[test]
    fn all_lines_invalid_carries_details() {
        let error = parse_payload("name,lat,lng\nX,95,100\n").unwrap_err();
        assert_eq!(error.to_string(), "No valid locations found in file");
        assert_eq!(
            error.details(),
            Some(vec!["Line 2: Coordinates out of range".to_owned()])
        );
    }

    #[test]
    fn duplicate_lines_are_all_kept() {
        let payload = parse_payload("h\nA,1,2\nA,1,2\n").unwrap();
        assert_eq!(payload.candidates.len(), 2);
        assert!(payload.errors.is_empty());
    }
}
