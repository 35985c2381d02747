//! Parsing of era-qualified composition dates.
//!
//! A date field may hold several year numerals, each optionally suffixed with ` BCE`
//! (`"44 BCE, 100"`, `"ca. 50 BCE - 17"`). BCE years are negative. A field resolves to
//! the ceiling of the mean of all its numerals.

use std::sync::LazyLock;

use regex::Regex;

use crate::MetadataError;

/// A year numeral with an optional era suffix.
static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+)( BCE)?").expect("numeral pattern is valid"));

/// Parses a date field into a single year.
///
/// Returns the ceiling of the arithmetic mean of every numeral in the field. A numeral
/// followed by ` BCE` is negated; one already carrying a minus sign stays negative.
pub fn parse_period(value: &str) -> Result<i32, MetadataError> {
    let mut sum: i64 = 0;
    let mut count: i64 = 0;

    for caps in NUMERAL.captures_iter(value) {
        let numeral = &caps[1];
        let year: i64 = numeral.parse().map_err(|_| MetadataError::Parse {
            value: value.to_string(),
            reason: format!("numeral out of range: {numeral}"),
        })?;
        let year = if caps.get(2).is_some() {
            -year.abs()
        } else {
            year
        };
        sum = sum.checked_add(year).ok_or_else(|| MetadataError::Parse {
            value: value.to_string(),
            reason: "sum of numerals overflows".to_string(),
        })?;
        count += 1;
    }

    if count == 0 {
        return Err(MetadataError::Parse {
            value: value.to_string(),
            reason: "no year numeral found".to_string(),
        });
    }

    i32::try_from(ceil_div(sum, count)).map_err(|_| MetadataError::Parse {
        value: value.to_string(),
        reason: "year out of range".to_string(),
    })
}

/// Ceiling division for a positive divisor.
fn ceil_div(numerator: i64, divisor: i64) -> i64 {
    let quotient = numerator.div_euclid(divisor);
    if numerator.rem_euclid(divisor) == 0 {
        quotient
    } else {
        quotient + 1
    }
}
