/// Uppercase the first character, leaving the rest untouched.
///
/// # Examples
/// ```
/// use eqdiff_core::utils::capitalize;
/// assert_eq!(capitalize("slice"), "Slice");
/// assert_eq!(capitalize("HTTPRoute"), "HTTPRoute");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Last segment of an import path.
///
/// # Examples
/// ```
/// use eqdiff_core::utils::path_base;
/// assert_eq!(path_base("k8s.io/api/core/v1"), "v1");
/// assert_eq!(path_base("models"), "models");
/// ```
pub fn path_base(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Identifier-safe alias for a package name, if it needs one.
///
/// Dashes become underscores and a leading digit gets an underscore prefix.
/// Returns `None` when the name is already usable as-is.
///
/// # Examples
/// ```
/// use eqdiff_core::utils::package_alias;
/// assert_eq!(package_alias("go-client").as_deref(), Some("go_client"));
/// assert_eq!(package_alias("3scale").as_deref(), Some("_3scale"));
/// assert_eq!(package_alias("models"), None);
/// ```
pub fn package_alias(name: &str) -> Option<String> {
    let mut alias = name.replace('-', "_");
    if alias.starts_with(|c: char| c.is_ascii_digit()) {
        alias.insert(0, '_');
    }
    (alias != name).then_some(alias)
}

/// Package name used when the universe does not declare one.
pub fn default_package_name(path: &str) -> String {
    let base = path_base(path);
    package_alias(base).unwrap_or_else(|| base.to_string())
}

/// Whether `s` is a valid Go identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic()) && chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Whether `s` names an exported Go identifier.
pub fn is_exported(s: &str) -> bool {
    is_identifier(s) && s.chars().next().is_some_and(char::is_uppercase)
}

/// Split `import/path.Name` at the last dot that follows the last slash.
///
/// # Examples
/// ```
/// use eqdiff_core::utils::split_full_name;
/// assert_eq!(
///     split_full_name("example.com/app/models.Backend"),
///     Some(("example.com/app/models", "Backend"))
/// );
/// assert_eq!(split_full_name("Backend"), None);
/// ```
pub fn split_full_name(full: &str) -> Option<(&str, &str)> {
    let slash = full.rfind('/').map_or(0, |i| i + 1);
    let dot = slash + full[slash..].rfind('.')?;
    let (path, name) = (&full[..dot], &full[dot + 1..]);
    if path.is_empty() || name.is_empty() {
        return None;
    }
    Some((path, name))
}
