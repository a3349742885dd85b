//! Numeral schemes for list counters

use docweave_ast::NumFormat;

/// Glyph used for bullet levels and unresolvable list references
pub const BULLET: &str = "\u{2022}";

const ROMAN: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Format a counter value in the given scheme
///
/// # Example
///
/// ```
/// use docweave_ast::NumFormat;
/// use docweave_core::numbering::format_counter;
///
/// assert_eq!(format_counter(9, &NumFormat::UpperRoman), "IX");
/// assert_eq!(format_counter(2, &NumFormat::LowerLetter), "b");
/// assert_eq!(format_counter(7, &NumFormat::Other("ordinal".into())), "");
/// ```
pub fn format_counter(value: u32, format: &NumFormat) -> String {
    match format {
        NumFormat::Decimal => value.to_string(),
        NumFormat::UpperRoman => to_roman(value),
        NumFormat::LowerRoman => to_roman(value).to_lowercase(),
        NumFormat::UpperLetter => to_letter(value, true),
        NumFormat::LowerLetter => to_letter(value, false),
        NumFormat::Bullet => BULLET.to_string(),
        NumFormat::Other(_) => String::new(),
    }
}

/// Classical subtractive Roman numeral (uppercase); empty for 0
pub fn to_roman(mut value: u32) -> String {
    let mut out = String::new();
    for (amount, symbol) in ROMAN {
        while value >= amount {
            out.push_str(symbol);
            value -= amount;
        }
    }
    out
}

/// Nth letter of the alphabet; empty for 0
///
/// Past 26 the letter repeats: 27 is "AA", 53 is "AAA".
pub fn to_letter(value: u32, upper: bool) -> String {
    if value == 0 {
        return String::new();
    }
    let index = ((value - 1) % 26) as u8;
    let repeat = ((value - 1) / 26 + 1) as usize;
    let base = if upper { b'A' } else { b'a' };
    char::from(base + index).to_string().repeat(repeat)
}
