//! Error-map key construction

/// `prefix.name`, or bare `name` at the root
pub fn member_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// `prefix[index]`
pub fn item_path(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}
