//! Parsing of user-supplied problem inputs.

use crate::error::{StepreelError, StepreelResult};

/// Parses a comma-separated integer list, skipping blank and non-numeric entries so a
/// trailing comma or a stray token never aborts a run. Errors only when nothing numeric
/// remains.
pub fn parse_int_list(text: &str) -> StepreelResult<Vec<i64>> {
    let values: Vec<i64> = text
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse::<i64>().ok())
        .collect();
    if values.is_empty() {
        return Err(StepreelError::validation(
            "input contains no numeric entries",
        ));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_list() {
        assert_eq!(parse_int_list("12,5,7,3,9,1").unwrap(), vec![12, 5, 7, 3, 9, 1]);
    }

    #[test]
    fn tolerates_whitespace_and_trailing_comma() {
        assert_eq!(parse_int_list(" 4 , -2 , 0 , ").unwrap(), vec![4, -2, 0]);
    }

    #[test]
    fn skips_non_numeric_tokens() {
        assert_eq!(parse_int_list("1, x, 3").unwrap(), vec![1, 3]);
    }

    #[test]
    fn rejects_input_with_no_numbers() {
        assert!(parse_int_list("a, b, c").is_err());
        assert!(parse_int_list("").is_err());
    }
}
