//! Number and key formatting shared by report views

use serde_json::Value;

/// Currency display: `$14.00`, `-$24.00` for negatives, no thousands
/// separators. Amounts that round to zero always print as `$0.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    if cents == 0.0 {
        "$0.00".to_string()
    } else if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

/// JSON form of an amount; whole numbers stay integers so templates print
/// `176` rather than `176.0`.
pub fn amount_value(amount: f64) -> Value {
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        Value::from(amount as i64)
    } else {
        Value::from(amount)
    }
}

/// Category name reduced to ASCII alphanumerics for use in flat keys:
/// `NEW ACCT. PHONE` becomes `NEWACCTPHONE`.
pub fn key_fragment(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}
