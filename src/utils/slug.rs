use uuid::Uuid;

/// Derives a URL-safe slug from a display name.
///
/// The name is lowercased, spaces become hyphens, and every character
/// outside `[a-z0-9-]` is dropped (multi-byte characters included, no
/// transliteration). An 8-hex-char suffix from a fresh UUID makes
/// collisions practically, though not provably, impossible.
pub fn generate_slug(name: &str) -> String {
    let normalized: String = name
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    let token = Uuid::new_v4().simple().to_string();
    format!("{}-{}", normalized, &token[..8])
}
