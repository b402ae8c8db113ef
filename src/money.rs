//! Currency helpers for price inputs.
//!
//! Price fields store what the user typed as a string of digits, which is the
//! amount in minor units (cents). The formatted string is only for display.

/// Strip everything but ASCII digits from a user-typed price.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Convert a typed or formatted price into an integer minor-unit amount.
///
/// `"1050"` and `"R$ 10,50"` both yield `1050`. Returns `None` when the input
/// holds no digits or does not fit in an `i64`.
pub fn convert_to_amount(input: &str) -> Option<i64> {
    let digits = digits_only(input);
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok()
}

/// Format a minor-unit amount for display.
pub fn convert_to_money(amount: i64, currency: &str) -> String {
    let style = MoneyStyle::for_currency(currency);
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let major = group_thousands(abs / 100, style.grouping);
    let minor = abs % 100;
    format!(
        "{sign}{} {major}{}{minor:02}",
        style.symbol, style.decimal
    )
}

struct MoneyStyle {
    symbol: String,
    decimal: char,
    grouping: char,
}

impl MoneyStyle {
    fn for_currency(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        match code.as_str() {
            "BRL" => Self {
                symbol: "R$".into(),
                decimal: ',',
                grouping: '.',
            },
            "EUR" => Self {
                symbol: "€".into(),
                decimal: ',',
                grouping: '.',
            },
            "USD" => Self {
                symbol: "$".into(),
                decimal: '.',
                grouping: ',',
            },
            _ => Self {
                symbol: code,
                decimal: '.',
                grouping: ',',
            },
        }
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
