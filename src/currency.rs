/// How currency amounts are written out. Display-only: the engine keeps full
/// f64 precision and nothing formatted here flows back into a calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrencyStyle {
    /// `1.234,56 €` — dot grouping, comma decimals, trailing symbol.
    European,
    /// `$1,234.56` — comma grouping, dot decimals, leading symbol.
    Anglo,
}

pub fn format_currency(value: f64, symbol: &str, style: CurrencyStyle) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let group_sep = match style {
        CurrencyStyle::European => '.',
        CurrencyStyle::Anglo => ',',
    };
    let grouped = group_thousands(int_part, group_sep);
    let sign = if negative { "-" } else { "" };

    match style {
        CurrencyStyle::European => format!("{}{},{} {}", sign, grouped, frac_part, symbol),
        CurrencyStyle::Anglo => format!("{}{}{}.{}", sign, symbol, grouped, frac_part),
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}
