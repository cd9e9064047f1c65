//! Analysis-tool output grammar.
//!
//! The tool prints unstructured text; the values needed here follow two
//! fixed shapes:
//!
//! - star rating: the first `D.D` floating-point number immediately
//!   preceding the literal word `stars`;
//! - ar/cs/od: a two-letter lowercase label immediately followed by a
//!   1-2 digit number with an optional 1-2 place decimal part.
//!
//! Keeping this in its own module lets it be unit-tested against
//! captured literal tool outputs without invoking the real tool.

use regex_lite::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputParseError {
    #[error("no star rating in tool output")]
    MissingStars,

    #[error("no '{label}' value in tool output")]
    MissingAttr { label: &'static str },
}

/// Difficulty attributes recovered from the tool's text output. HP drain
/// is absent: the tool does not model it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolOutput {
    pub stars: f64,
    pub ar: f64,
    pub cs: f64,
    pub od: f64,
}

/// Parses the tool's stdout into structured difficulty values.
pub fn parse_output(text: &str) -> Result<ToolOutput, OutputParseError> {
    Ok(ToolOutput {
        stars: parse_stars(text).ok_or(OutputParseError::MissingStars)?,
        ar: parse_attr(text, "ar").ok_or(OutputParseError::MissingAttr { label: "ar" })?,
        cs: parse_attr(text, "cs").ok_or(OutputParseError::MissingAttr { label: "cs" })?,
        od: parse_attr(text, "od").ok_or(OutputParseError::MissingAttr { label: "od" })?,
    })
}

fn parse_stars(text: &str) -> Option<f64> {
    let re = Regex::new(r"([0-9]+\.[0-9]+)\s+stars").ok()?;
    let caps = re.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

fn parse_attr(text: &str, label: &'static str) -> Option<f64> {
    let re = Regex::new(&format!(r"{}([0-9][0-9]?(?:\.[0-9][0-9]?)?)", label)).ok()?;
    let caps = re.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Captured shape of real tool output.
    const SAMPLE: &str = "o p p a i | v1.1.0\n\
        artist - song [hard] (mapper) +HDDT\n\
        od9.7 ar10.3 cs4.0 hp6.0\n\
        1337 objects (900 circles, 430 sliders)\n\
        5.10 stars (2.61 speed, 2.44 aim)\n\
        99.11% 423x misses\n";

    #[test]
    fn test_parse_sample_output() {
        let parsed = parse_output(SAMPLE).unwrap();
        assert_eq!(parsed.stars, 5.10);
        assert_eq!(parsed.ar, 10.3);
        assert_eq!(parsed.cs, 4.0);
        assert_eq!(parsed.od, 9.7);
    }

    #[test]
    fn test_parse_integer_attrs() {
        let parsed = parse_output("od7 ar9 cs4\n6.22 stars").unwrap();
        assert_eq!(parsed.ar, 9.0);
        assert_eq!(parsed.cs, 4.0);
        assert_eq!(parsed.od, 7.0);
    }

    #[test]
    fn test_stars_requires_decimal_form() {
        // A bare integer before "stars" is not the SR line.
        assert_eq!(parse_stars("5 stars"), None);
        assert_eq!(parse_stars("4.9 stars"), Some(4.9));
    }

    #[test]
    fn test_first_star_value_wins() {
        assert_eq!(parse_stars("2.01 stars then 9.99 stars"), Some(2.01));
    }

    #[test]
    fn test_attr_label_must_touch_number() {
        // "ar" inside "stars" is never followed by a digit.
        assert_eq!(parse_attr("4.90 stars", "ar"), None);
        assert_eq!(parse_attr("ar 9", "ar"), None);
        assert_eq!(parse_attr("ar9.33", "ar"), Some(9.33));
    }

    #[test]
    fn test_missing_values_are_reported() {
        assert_eq!(parse_output("").unwrap_err(), OutputParseError::MissingStars);
        assert_eq!(
            parse_output("5.10 stars od7 cs4").unwrap_err(),
            OutputParseError::MissingAttr { label: "ar" }
        );
    }
}
