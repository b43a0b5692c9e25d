//! Identifier case conversion and English inflection for resource naming.
//! Module names come in CamelCase ("BlogPost"), field names in snake_case ("first_name").

/// Convert a single identifier from CamelCase to snake_case.
/// e.g. "BlogPost" -> "blog_post", "HTTPRequest" -> "http_request"
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p == '_' => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                Some(_) => false,
                None => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Split on underscores, capitalize the first letter of each token and join with spaces.
/// e.g. "first_name" -> "First Name"
pub fn title_case(s: &str) -> String {
    s.split('_')
        .filter(|t| !t.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Field identifier as a column heading: a trailing "_id" is dropped before title-casing.
/// e.g. "state_id" -> "State"
pub fn humanize(field: &str) -> String {
    title_case(field.strip_suffix("_id").unwrap_or(field))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const UNCOUNTABLE: &[&str] = &[
    "equipment", "information", "rice", "money", "species", "series", "fish", "sheep", "deer",
    "news", "metadata", "feedback", "software",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
    ("quiz", "quizzes"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("shelf", "shelves"),
    ("hero", "heroes"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("echo", "echoes"),
];

/// Pluralize the last word of `s`. Words are separated by spaces or underscores, so
/// both raw identifiers ("blog_post") and rendered titles ("Blog Post") work.
pub fn pluralize(s: &str) -> String {
    let split = s.rfind([' ', '_']).map(|i| i + 1).unwrap_or(0);
    let (head, word) = s.split_at(split);
    if word.is_empty() {
        return s.to_string();
    }
    format!("{}{}", head, pluralize_word(word))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    if lower.ends_with("sis") || lower.ends_with("xis") {
        return format!("{}es", &word[..word.len() - 2]);
    }
    if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    let sibilant = lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh");
    let suffix = if sibilant { "es" } else { "s" };
    if word.chars().all(|c| !c.is_lowercase()) && word.chars().any(char::is_uppercase) {
        return format!("{}{}", word, suffix.to_uppercase());
    }
    format!("{}{}", word, suffix)
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut rev = lower.chars().rev();
    rev.next();
    matches!(rev.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

/// Carry the capitalisation of `original` over to `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    if original.len() > 1 && original.chars().all(|c| !c.is_lowercase()) {
        replacement.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize(replacement)
    } else {
        replacement.to_string()
    }
}
