//! Content-type normalization shared by the factory registries.

/// Drops any `;`-separated parameters and lowercases the remaining type.
pub(crate) fn strip_parameters(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Collapses a vendor-extended subtype onto its structured-syntax suffix,
/// e.g. `application/vnd.api+json` becomes `application/json`.
pub(crate) fn vendor_fallback(content_type: &str) -> Option<String> {
    let (essence, subtype) = content_type.split_once('/')?;
    let (_, suffix) = subtype.rsplit_once('+')?;
    if suffix.is_empty() {
        return None;
    }
    Some(format!("{essence}/{suffix}"))
}
