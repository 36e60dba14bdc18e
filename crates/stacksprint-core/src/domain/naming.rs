//! Identifier case conversion for generated source code.

/// Split an identifier into lowercase words (`orderItem`, `OrderItem`,
/// `order_item` and `order-item` all give `["order", "item"]`).
fn words(ident: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in ident.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        current.push(ch.to_ascii_lowercase());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn snake(ident: &str) -> String {
    words(ident).join("_")
}

pub fn kebab(ident: &str) -> String {
    words(ident).join("-")
}

pub fn pascal(ident: &str) -> String {
    words(ident).iter().map(|w| capitalize(w)).collect()
}

pub fn camel(ident: &str) -> String {
    let words = words(ident);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// Naive English plural, good enough for table and route names.
pub fn plural(word: &str) -> String {
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

/// Snake-case plural, used for SQL tables and REST collections.
pub fn table(ident: &str) -> String {
    plural(&snake(ident))
}

/// Lowercase, `[a-z0-9-]` only, collapsed dashes.
pub fn slug(raw: &str) -> String {
    let mut out = String::new();
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_cases() {
        assert_eq!(snake("OrderItem"), "order_item");
        assert_eq!(snake("orderItem"), "order_item");
        assert_eq!(pascal("order_item"), "OrderItem");
        assert_eq!(camel("OrderItem"), "orderItem");
        assert_eq!(kebab("Order_Item"), "order-item");
    }

    #[test]
    fn pluralizes_common_shapes() {
        assert_eq!(table("Order"), "orders");
        assert_eq!(table("Category"), "categories");
        assert_eq!(table("Address"), "addresses");
        assert_eq!(table("Day"), "days");
    }

    #[test]
    fn slugifies_project_names() {
        assert_eq!(slug("  My Cool_App!! "), "my-cool-app");
        assert_eq!(slug("---"), "");
    }
}
