//! Plain-text decklist parsing.
//!
//! Accepts the common export format used by deck builders:
//!
//! ```text
//! Commander:
//! 1 Atraxa, Praetors' Voice (2XM) 190
//! 3x Sol Ring (C21)
//! Fire // Ice
//! ```

use tracing::debug;

use super::line::LineItem;

const SECTION_HEADERS: &[&str] = &[
    "deck",
    "main",
    "mainboard",
    "sideboard",
    "commander",
    "companion",
    "maybeboard",
    "considering",
];

/// Parse decklist text into line items, skipping anything unparseable.
#[must_use]
pub fn parse_decklist(text: &str) -> Vec<LineItem> {
    text.lines().filter_map(parse_line).collect()
}

/// Parse one decklist line.
#[must_use]
pub fn parse_line(raw: &str) -> Option<LineItem> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
        return None;
    }
    if is_section_header(line) {
        return None;
    }

    let (quantity, rest) = split_quantity(line)?;
    let rest = strip_foil_marker(rest);
    let (name, set) = split_set(rest);

    let item = LineItem::new(name.trim(), set, quantity);
    if item.is_none() {
        debug!(line = raw, "Skipping decklist line");
    }
    item
}

fn is_section_header(line: &str) -> bool {
    let word = line.strip_suffix(':').unwrap_or(line).trim();
    SECTION_HEADERS
        .iter()
        .any(|header| word.eq_ignore_ascii_case(header))
}

/// Leading `3`, `3x` or `3X`; defaults to 1 when absent.
fn split_quantity(line: &str) -> Option<(u32, &str)> {
    let digits_end = line
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(line.len(), |(i, _)| i);

    if digits_end == 0 {
        return Some((1, line));
    }

    let after_digits = &line[digits_end..];
    let rest = after_digits
        .strip_prefix(['x', 'X'])
        .unwrap_or(after_digits);

    // Digits run straight into text: part of the name, not a quantity.
    if !rest.starts_with(char::is_whitespace) {
        return Some((1, line));
    }

    match line[..digits_end].parse::<u32>() {
        Ok(quantity) => Some((quantity, rest.trim_start())),
        Err(_) => {
            debug!(line, "Unparseable quantity");
            None
        }
    }
}

fn strip_foil_marker(rest: &str) -> &str {
    let trimmed = rest.trim_end();
    trimmed
        .strip_suffix("*F*")
        .or_else(|| trimmed.strip_suffix("*E*"))
        .unwrap_or(trimmed)
        .trim_end()
}

/// Split `Name (SET) 123` into the name and set code.
fn split_set(rest: &str) -> (&str, Option<String>) {
    let Some(open) = rest.rfind('(') else {
        return (rest, None);
    };
    let Some(close_offset) = rest[open..].find(')') else {
        return (rest, None);
    };
    let close = open + close_offset;
    let code = rest[open + 1..close].trim();
    let tail = rest[close + 1..].trim();

    let looks_like_set = !code.is_empty()
        && code.len() <= 6
        && code.chars().all(|c| c.is_ascii_alphanumeric());
    let tail_is_collector_number = tail.is_empty()
        || tail
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '★');

    if looks_like_set && tail_is_collector_number {
        (rest[..open].trim_end(), Some(code.to_ascii_uppercase()))
    } else {
        (rest, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quantity_name_and_set() {
        let lines = parse_decklist("3 Sol Ring (C21)\n1 Made-Up Card");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "Sol Ring");
        assert_eq!(lines[0].set.as_deref(), Some("C21"));
        assert_eq!(lines[0].quantity.get(), 3);
        assert_eq!(lines[1].name, "Made-Up Card");
        assert_eq!(lines[1].set, None);
        assert_eq!(lines[1].quantity.get(), 1);
    }

    #[test]
    fn accepts_x_suffix_collector_numbers_and_foil_markers() {
        let line = parse_line("4x Lightning Bolt (2x2) 117 *F*").unwrap();
        assert_eq!(line.name, "Lightning Bolt");
        assert_eq!(line.set.as_deref(), Some("2X2"));
        assert_eq!(line.quantity.get(), 4);
    }

    #[test]
    fn missing_quantity_defaults_to_one() {
        let line = parse_line("Fire // Ice").unwrap();
        assert_eq!(line.name, "Fire // Ice");
        assert_eq!(line.quantity.get(), 1);
    }

    #[test]
    fn skips_headers_comments_and_zero_quantities() {
        let text = "Commander:\n1 Atraxa, Praetors' Voice\n\n# notes\n// comment\nSideboard\n0 Sol Ring";
        let lines = parse_decklist(text);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Atraxa, Praetors' Voice");
    }

    #[test]
    fn parenthesised_text_that_is_not_a_set_stays_in_name() {
        let line = parse_line("1 Our Market Research Shows That Players Like Really Long Card Names So We Made this Card to Have the Absolute Longest Card Name Ever Elemental (not a real set code)").unwrap();
        assert!(line.name.ends_with("(not a real set code)"));
        assert_eq!(line.set, None);
    }

    #[test]
    fn numeric_card_names_need_an_explicit_quantity() {
        let line = parse_line("1 1996 World Champion").unwrap();
        assert_eq!(line.name, "1996 World Champion");
        assert_eq!(line.quantity.get(), 1);

        let line = parse_line("2 Sol Ring").unwrap();
        assert_eq!(line.quantity.get(), 2);
    }
}
