use crate::config::NamingConfig;
use crate::types::{erasure_fqn, simple_name};
use naviscope_api::models::TypeRef;

/// Reserved words and literals that cannot be used as identifiers.
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "var", "void", "volatile", "while", "yield",
];

pub fn is_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Suggest local variable names for a value of type `ty`, best first.
///
/// `Map.Entry<K, V>` suggests `entry`, `OrderItem` suggests `orderItem`
/// and `item`, `Order[]` suggests `orders`, `int` suggests `i`. Names in
/// `excluded` get a counter appended, starting at 2.
pub fn suggest_variable_names(
    ty: &TypeRef,
    excluded: &[&str],
    config: &NamingConfig,
) -> Vec<String> {
    let dimensions = ty.dimensions();
    let base = match ty {
        TypeRef::Array { element, .. } => element.as_ref(),
        other => other,
    };

    let mut candidates = match base {
        TypeRef::Raw(name) if dimensions == 0 => {
            vec![name.chars().take(1).collect::<String>()]
        }
        _ => {
            let fqn = erasure_fqn(base);
            let name = simple_name(&fqn);
            let name = if name.is_empty() { "object" } else { name };
            camel_case_suffixes(name)
        }
    };

    if dimensions > 0 {
        candidates = candidates.iter().map(|c| pluralize(c)).collect();
    }

    let mut result: Vec<String> = Vec::new();
    for candidate in decorate(&candidates, config) {
        let name = make_unique(&candidate, excluded, config.avoid_keywords);
        if !result.contains(&name) {
            result.push(name);
        }
    }
    result
}

/// `OrderLineItem` -> `orderLineItem`, `lineItem`, `item`.
fn camel_case_suffixes(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut starts = vec![0];
    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let cur = chars[i];
        let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
        // `URLConnection` splits before `Connection`
        let boundary =
            prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower);
        if cur.is_uppercase() && boundary {
            starts.push(i);
        }
    }

    starts
        .into_iter()
        .map(|start| decapitalize(&chars[start..].iter().collect::<String>()))
        .filter(|s| !s.is_empty() && s != "_")
        .collect()
}

fn decapitalize(word: &str) -> String {
    // All caps acronyms are lowered entirely: `URL` -> `url`
    if word.chars().all(|c| !c.is_lowercase()) {
        return word.to_lowercase();
    }
    let upper_prefix = word.chars().take_while(|c| c.is_uppercase()).count();
    if upper_prefix > 1 {
        // `XMLParser` -> `xmlParser`
        let split = upper_prefix - 1;
        let (head, tail): (String, String) = (
            word.chars().take(split).collect(),
            word.chars().skip(split).collect(),
        );
        return format!("{}{}", head.to_lowercase(), tail);
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem
            .chars()
            .last()
            .is_some_and(|c| !"aeiouAEIOU".contains(c))
        {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

/// Apply the configured prefixes and suffixes, in configuration order.
fn decorate(candidates: &[String], config: &NamingConfig) -> Vec<String> {
    let prefixes: Vec<&str> = if config.local_prefixes.is_empty() {
        vec![""]
    } else {
        config.local_prefixes.iter().map(String::as_str).collect()
    };
    let suffixes: Vec<&str> = if config.local_suffixes.is_empty() {
        vec![""]
    } else {
        config.local_suffixes.iter().map(String::as_str).collect()
    };

    let mut decorated = Vec::new();
    for candidate in candidates {
        for prefix in &prefixes {
            let stem = if prefix.is_empty() {
                candidate.clone()
            } else {
                format!("{}{}", prefix, capitalize(candidate))
            };
            for suffix in &suffixes {
                decorated.push(format!("{}{}", stem, suffix));
            }
        }
    }
    decorated
}

fn make_unique(name: &str, excluded: &[&str], avoid_keywords: bool) -> String {
    let taken = |n: &str| excluded.contains(&n) || (avoid_keywords && is_keyword(n));
    if !taken(name) {
        return name.to_string();
    }
    (2..)
        .map(|i| format!("{}{}", name, i))
        .find(|n| !taken(n))
        .unwrap_or_else(|| name.to_string())
}
