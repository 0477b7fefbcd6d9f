//! Roman numerals used for pay-band names.

const NUMERALS: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

/// Render a 1-based pay-band position.
///
/// Positions above ten (and zero) fall back to the decimal number.
pub fn roman_numeral(position: usize) -> String {
    match position {
        1..=10 => NUMERALS[position - 1].to_string(),
        _ => position.to_string(),
    }
}

/// Parse a numeral token produced by [`roman_numeral`].
pub fn parse_roman_numeral(token: &str) -> Option<usize> {
    NUMERALS
        .iter()
        .position(|numeral| *numeral == token)
        .map(|index| index + 1)
}

/// Strip a trailing numeral token, returning the base rank name.
///
/// `"Officer III"` becomes `"Officer"`; names without a numeral suffix are
/// returned unchanged.
pub fn base_rank_name(name: &str) -> &str {
    split_numeral_suffix(name).map_or(name, |(base, _)| base)
}

/// Split `"Officer III"` into `("Officer", 3)`.
pub fn split_numeral_suffix(name: &str) -> Option<(&str, usize)> {
    let trimmed = name.trim_end();
    let (base, token) = trimmed.rsplit_once(' ')?;
    let position = parse_roman_numeral(token)?;
    let base = base.trim_end();
    if base.is_empty() {
        return None;
    }
    Some((base, position))
}
