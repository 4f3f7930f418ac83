use chrono::{DateTime, Datelike, Utc};
use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns (CJK and emoji aware).
///
/// ```
/// use banca::util::display_width;
///
/// assert_eq!(display_width("Olá"), 3);
/// assert_eq!(display_width("你好"), 4); // CJK: 2 columns each
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate a string to fit within `max_width` terminal columns, appending
/// "..." when text was cut. Returns `Cow::Borrowed` when the string already
/// fits, avoiding allocation on the render hot path.
///
/// For widths of 3 columns or less there is no room for "char + ellipsis",
/// so as many characters as fit are returned without the ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    if max_width > ELLIPSIS_WIDTH {
        out.push_str(ELLIPSIS);
    }
    Cow::Owned(out)
}

/// Strip C0 control characters, DEL and ESC sequences from CMS-sourced text
/// before it reaches the terminal. Tabs and newlines are dropped too: every
/// call site renders a single line.
///
/// Returns `Cow::Borrowed` for clean input (the common case for CMS titles).
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c.is_control()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI sequence: consume "[" plus parameter bytes up to the final byte
            if chars.peek() == Some(&'[') {
                chars.next();
                for f in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&f) {
                        break;
                    }
                }
            }
            continue;
        }
        if !c.is_control() {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Build a collation key for alphabetical title ordering: lowercase with
/// Latin diacritics folded to their base letter. Approximates pt-BR
/// base-sensitivity collation ("África" sorts with "Africa") without pulling
/// in a full ICU collator.
pub fn collation_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        for lower in c.to_lowercase() {
            out.push(fold_diacritic(lower));
        }
    }
    out
}

/// Fold the accented Latin letters that occur in Portuguese text.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Month names for publication dates, as the site displays them.
const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Format a publication date as the listing shows it: "junho de 2024".
pub fn format_month_year(dt: DateTime<Utc>) -> String {
    let month = MONTHS_PT[(dt.month0() as usize).min(11)];
    format!("{} de {}", month, dt.year())
}
