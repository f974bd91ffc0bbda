/// Turn a stable entity name into a display title: underscore/hyphen/space
/// runs collapse to single spaces and each word gets a capital first letter.
/// Empty input falls back to `"Unnamed"`.
pub fn title_case(name: &str) -> String {
    let cleaned = name.replace(['_', '-'], " ");
    let words: Vec<String> = cleaned.split_whitespace().map(capitalize).collect();
    if words.is_empty() {
        "Unnamed".to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
