//! Card identity and name/set normalization.

use std::fmt;

/// Set codes that sources use to mean "no particular set".
const WILDCARD_SET_ALIASES: &[&str] = &["NULL", "UNK", "NONE", "UNDEFINED"];

/// Cache-stable identity of one printing of a card.
///
/// Both fields are normalized on construction, so value-equal keys hash
/// equal. An empty set code is the wildcard ("any print of this name") and
/// is distinct from every specific-set key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey {
    name: String,
    set: String,
}

impl CardKey {
    /// Build a key from raw user or source input.
    pub fn new(name: impl AsRef<str>, set: impl AsRef<str>) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            set: normalize_set(set.as_ref()),
        }
    }

    /// Build a wildcard-set key.
    pub fn wildcard(name: impl AsRef<str>) -> Self {
        Self::new(name, "")
    }

    /// Normalized card name (lower case, single-spaced).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized set code, empty for the wildcard.
    #[must_use]
    pub fn set(&self) -> &str {
        &self.set
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.set.is_empty()
    }

    /// True when the name is empty after normalization.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
    }

    /// Same name, specific set.
    #[must_use]
    pub fn with_set(&self, set: &str) -> Self {
        Self {
            name: self.name.clone(),
            set: normalize_set(set),
        }
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            write!(f, "{} [*]", self.name)
        } else {
            write!(f, "{} [{}]", self.name, self.set)
        }
    }
}

/// Canonicalize a card name.
///
/// Strips control and zero-width characters, folds Latin diacritics and case,
/// trims and collapses whitespace. Punctuation such as `,` `'` `:` and `//`
/// is left intact.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if is_invisible(ch) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        match fold_diacritic(ch) {
            Some(folded) => out.push_str(folded),
            None => out.extend(ch.to_lowercase()),
        }
    }

    out
}

/// Canonicalize a set code. Empty and placeholder codes become the wildcard.
#[must_use]
pub fn normalize_set(raw: &str) -> String {
    let code: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !is_invisible(*c))
        .flat_map(char::to_uppercase)
        .collect();

    if WILDCARD_SET_ALIASES.contains(&code.as_str()) {
        String::new()
    } else {
        code
    }
}

fn is_invisible(ch: char) -> bool {
    ch.is_control()
        || matches!(
            ch,
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
        )
}

/// Lower-case ASCII replacement for common Latin diacritics.
///
/// Card names in print use a handful of these (`Lim-Dûl`, `Lórien`,
/// `Æther`); anything outside this table is only case-folded.
fn fold_diacritic(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'Æ' | 'æ' => "ae",
        'Ç' | 'ç' => "c",
        'È' | 'É' | 'Ê' | 'Ë' | 'è' | 'é' | 'ê' | 'ë' => "e",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'ì' | 'í' | 'î' | 'ï' => "i",
        'Ñ' | 'ñ' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'Œ' | 'œ' => "oe",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ý' | 'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}
