use serde::{Deserialize, Serialize};

/// How tooltip and axis values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueFormat {
    /// Rounded count with thousands separators: `12,345`.
    #[default]
    Integer,
    /// Fixed number of decimals: `3.14`.
    Decimal(usize),
    /// Minutes with one decimal and the `분` suffix: `62.1분`.
    Minutes,
    /// Percentage with one decimal: `42.5%`.
    Percent,
}

impl ValueFormat {
    /// Formats `value`; non-finite input prints as `-`.
    #[must_use]
    pub fn format(self, value: f64) -> String {
        if !value.is_finite() {
            return "-".to_owned();
        }
        match self {
            Self::Integer => group_thousands(value.round()),
            Self::Decimal(precision) => format!("{value:.precision$}"),
            Self::Minutes => format!("{value:.1}분"),
            Self::Percent => format!("{value:.1}%"),
        }
    }
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 {
        grouped.push('-');
    }
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// `value` as a percentage of `total`, absent when `total` is not a
/// positive finite number.
#[must_use]
pub fn percent_of(value: f64, total: f64) -> Option<f64> {
    if !(total.is_finite() && total > 0.0) || !value.is_finite() {
        return None;
    }
    Some(value / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_group_by_thousands() {
        assert_eq!(ValueFormat::Integer.format(1_234_567.4), "1,234,567");
        assert_eq!(ValueFormat::Integer.format(999.0), "999");
        assert_eq!(ValueFormat::Integer.format(-1_000.0), "-1,000");
        assert_eq!(ValueFormat::Integer.format(-0.2), "0");
    }

    #[test]
    fn minutes_and_percent_carry_suffixes() {
        assert_eq!(ValueFormat::Minutes.format(62.08), "62.1분");
        assert_eq!(ValueFormat::Percent.format(42.46), "42.5%");
        assert_eq!(ValueFormat::Decimal(2).format(f64::NAN), "-");
    }
}
