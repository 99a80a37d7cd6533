//! Line normalization for hosts-style and plain domain feeds.
//!
//! A raw feed line may carry a whole-line comment, a trailing comment, or a
//! hosts-file address prefix (`0.0.0.0` / `127.0.0.1`). [`format_line`]
//! strips all of these and returns the bare candidate token.

/// Address prefixes recognised in front of a hosts-file entry.
pub const ADDRESS_PREFIXES: &[&str] = &["0.0.0.0", "127.0.0.1"];

/// Reduce one raw feed line to its bare domain/IP token.
///
/// Returns an empty string when there is nothing to extract.
///
/// # Examples
/// ```
/// use hostsfeed::normalizer::format_line;
/// assert_eq!(format_line("127.0.0.1\t\t\tgoogle.com"), "google.com");
/// assert_eq!(format_line("# google.com"), "");
/// assert_eq!(format_line("google.com # comment"), "google.com");
/// ```
pub fn format_line(line: &str) -> String {
    let line = line.trim_start();
    if line.starts_with('#') {
        return String::new();
    }

    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let line = line.trim();

    strip_address_prefix(line).trim().to_string()
}

/// Remove a leading address prefix and the whitespace run after it.
///
/// The prefix only counts when followed by a space or tab run or by the end
/// of the line, so `127.0.0.10` is left untouched while a bare `0.0.0.0`
/// yields an empty string.
fn strip_address_prefix(line: &str) -> &str {
    for prefix in ADDRESS_PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            if rest.is_empty() || rest.starts_with([' ', '\t']) {
                return rest.trim_start_matches([' ', '\t']);
            }
        }
    }
    line
}
