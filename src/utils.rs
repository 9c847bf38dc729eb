use anyhow::Result;

/// Resolve an optional leading `~/` to the current user's HOME path.
pub fn resolve_home(path: &str) -> Result<String> {
    if path.starts_with("~/") {
        let home = home_dir()?;
        Ok(path.replacen('~', &home, 1))
    } else {
        Ok(path.to_string())
    }
}

/// Return the path to the current user home directory.
///
/// Implement simple variable lookup for linux.
/// Other OS are not currently supported.
fn home_dir() -> Result<String> {
    match std::env::var("HOME") {
        Err(std::env::VarError::NotPresent) => anyhow::bail!("unable to lookup the $HOME path"),
        Err(std::env::VarError::NotUnicode(_)) => anyhow::bail!("unable to UTF-8 decode $HOME"),
        Ok(path) => Ok(path),
    }
}

/// Render a record field, or a placeholder when the record does not carry it.
pub fn field_or_dash<'a>(record: &'a serde_json::Value, field: &str) -> &'a str {
    record.get(field).and_then(serde_json::Value::as_str).unwrap_or("-")
}

/// Join an optional reference filter with explicit filters into one expression.
pub fn merge_filters(reference: Option<String>, extra: &[String]) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(reference) = reference {
        parts.push(reference);
    }
    parts.extend(extra.iter().cloned());
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}
