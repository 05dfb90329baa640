use thiserror::Error;

/// Currency amounts are integer cents, so 100.00 is stored as 10_000.
/// Keeping money out of floating point means balances always sum exactly.
pub type Cents = i64;

pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, cents.abs() / 100, cents.abs() % 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid amount: {0:?}")]
pub struct ParseAmountError(String);

/// Parse a decimal string like "50", "12.5" or "0.01" into cents.
/// At most two fractional digits are accepted.
pub fn parse_cents(input: &str) -> Result<Cents, ParseAmountError> {
    let trimmed = input.trim();
    let err = || ParseAmountError(input.to_owned());

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (units_part, fraction_part) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };
    if units_part.is_empty() && fraction_part.is_empty() {
        return Err(err());
    }
    if fraction_part.len() > 2 || fraction_part.contains('.') {
        return Err(err());
    }

    let units: i64 = if units_part.is_empty() {
        0
    } else {
        units_part.parse().map_err(|_| err())?
    };
    let fraction: i64 = match fraction_part.len() {
        0 => 0,
        1 => fraction_part.parse::<i64>().map_err(|_| err())? * 10,
        _ => fraction_part.parse().map_err(|_| err())?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(err)?;
    Ok(if negative { -cents } else { cents })
}
