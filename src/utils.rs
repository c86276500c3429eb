/// Characters Lucene treats as query syntax; everything here must be
/// backslash-escaped inside a field-qualified MusicBrainz expression.
const LUCENE_SPECIALS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
];

/// Artist placeholders written by rippers and tag editors; a `artist:`
/// search clause built from one of these only suppresses real matches.
pub const PLACEHOLDER_ARTISTS: &[&str] = &["Unknown Artist", "Various Artists"];

/// Album-title counterpart of [`PLACEHOLDER_ARTISTS`].
pub const PLACEHOLDER_ALBUMS: &[&str] = &["Unknown Album"];

/// Forces a display string into the rich-presence protocol's length window.
///
/// Fields shorter than `min_len` are rejected by the transport, so short
/// strings are padded with trailing spaces; strings longer than `max_len`
/// are cut to `max_len - 3` characters and terminated with `...`. The
/// function is idempotent: clamping an already-clamped string is a no-op.
///
/// # Example
///
/// ```
/// let title = clamp_for_display("x", 2, 128); // "x "
/// ```
pub fn clamp_for_display(s: &str, min_len: usize, max_len: usize) -> String {
    let len = s.chars().count();
    if len < min_len {
        let mut padded = s.to_string();
        for _ in len..min_len {
            padded.push(' ');
        }
        padded
    } else if len > max_len {
        let mut cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    } else {
        s.to_string()
    }
}

/// Removes a trailing parenthetical suffix from an album title and trims
/// the remainder, e.g. `"Album (Deluxe Edition)"` -> `"Album"`.
///
/// Store catalogs list the plain title for many editions that local tags
/// annotate, so this is used as a fallback query transform. Never use the
/// result for display.
pub fn strip_parenthetical(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.ends_with(')') {
        if let Some(open) = trimmed.find('(') {
            return trimmed[..open].trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Escapes Lucene query syntax in a term destined for a field-qualified
/// MusicBrainz search expression.
pub fn escape_query_term(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if LUCENE_SPECIALS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the free-text term for the primary song search.
///
/// Asterisks act as wildcards on the store side and suppress otherwise
/// exact matches, so they are dropped from the term.
pub fn search_term(name: &str, artist: &str, album: &str) -> String {
    format!("{} {} {}", name, artist, album)
        .replace('*', "")
        .trim()
        .to_string()
}

/// Detects the mime type of raw artwork bytes from their magic numbers.
///
/// Returns `None` for formats the presence transport cannot display.
pub fn detect_image_mime(data: &[u8]) -> Option<&'static str> {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x47, 0x49, 0x46, ..] => Some("image/gif"),
        [0x42, 0x4D, ..] => Some("image/bmp"),
        _ => None,
    }
}

/// Decodes the `$...$`-delimited hex blob the scripting bridge prints for
/// raw artwork data.
///
/// Returns `None` when no well-formed hex run is present.
pub fn decode_hex_blob(raw: &str) -> Option<Vec<u8>> {
    let start = raw.find('$')?;
    let rest = &raw[start + 1..];
    let end = rest.find('$')?;
    let hex = &rest[..end];
    if hex.is_empty() || hex.len() % 2 != 0 {
        return None;
    }

    let mut data = Vec::with_capacity(hex.len() / 2);
    for chunk in hex.as_bytes().chunks(2) {
        let pair = std::str::from_utf8(chunk).ok()?;
        data.push(u8::from_str_radix(pair, 16).ok()?);
    }
    Some(data)
}
