use regex::Regex;
use std::sync::LazyLock;

static AMPERSAND_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)&amp;").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static SEPARATOR_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \-_]+").unwrap());

const TRANSLITERATIONS: &[(char, &str)] = &[
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('Ä', "Ae"),
    ('Ö', "Oe"),
    ('Ü', "Ue"),
    ('ß', "ss"),
    ('á', "a"),
    ('à', "a"),
    ('â', "a"),
    ('é', "e"),
    ('è', "e"),
    ('ê', "e"),
    ('í', "i"),
    ('ì', "i"),
    ('î', "i"),
    ('ó', "o"),
    ('ò', "o"),
    ('ô', "o"),
    ('ú', "u"),
    ('ù', "u"),
    ('û', "u"),
    ('ç', "c"),
    ('ñ', "n"),
    ('Á', "A"),
    ('À', "A"),
    ('É', "E"),
    ('È', "E"),
    ('Ó', "O"),
    ('Ú', "U"),
    ('Ç', "C"),
];

/// Normalize scraped text for display and for use in performance data.
///
/// - `&amp;` (any case) becomes the word `und`
/// - `@` becomes the word `at`
/// - German umlauts, `ß` and common accented letters are transliterated to ASCII
/// - runs of spaces collapse to one and the result is trimmed
///
/// The function is idempotent: nothing it produces is matched again.
pub fn exchange_special_characters(text: &str) -> String {
    // Transliterate first: `&ámp;` must become `&amp;` before entities are replaced.
    let mut ascii = String::with_capacity(text.len());
    for c in text.chars() {
        match TRANSLITERATIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => ascii.push_str(to),
            None => ascii.push(c),
        }
    }

    let replaced = AMPERSAND_ENTITY.replace_all(&ascii, " und ");
    let replaced = replaced.replace('@', " at ");

    SPACE_RUNS.replace_all(&replaced, " ").trim().to_string()
}

/// Turn a label into a performance-data key: normalized, periods removed,
/// runs of spaces and hyphens folded into a single underscore.
pub fn convert_to_nagios_variable(text: &str) -> String {
    let normalized = exchange_special_characters(text).replace('.', "");
    SEPARATOR_RUNS.replace_all(&normalized, "_").to_string()
}
