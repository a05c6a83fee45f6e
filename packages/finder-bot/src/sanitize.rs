//! Turning free chat text into a query token.

use telegraph_finder::{error::Result, Query};

/// Transliterate Cyrillic to Latin, turn spaces into hyphens and drop
/// everything outside `[A-Za-z0-9-]`.
///
/// Slugs are case-sensitive, so Latin letters keep their case and an
/// uppercase Cyrillic letter becomes a capitalised Latin one (`Ж` → `Zh`).
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else if c == ' ' {
            out.push('-');
        } else if let Some(latin) = cyrillic(c) {
            out.push_str(latin);
        } else if let Some(latin) = c.to_lowercase().next().and_then(cyrillic) {
            push_capitalised(&mut out, latin);
        }
    }
    out
}

fn push_capitalised(out: &mut String, latin: &str) {
    let mut chars = latin.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
    }
}

/// Transliterate `text` and validate the result as a query.
pub fn sanitize(text: &str) -> Result<Query> {
    Query::parse(&transliterate(text.trim()))
}

fn cyrillic(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "eh",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}
