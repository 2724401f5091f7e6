//! Line-level helpers for markdown headings.

/// Split an ATX heading line into its level and raw text.
///
/// The line must start with 1-6 `#` characters followed by at least one
/// whitespace character. An optional closing run of `#` (preceded by
/// whitespace) is dropped, and the remaining text is trimmed. Returns `None`
/// for anything else, including headings with no text.
///
/// # Examples
///
/// ```
/// # use tocnav::parser::utils::parse_heading_line;
/// assert_eq!(parse_heading_line("## Section"), Some((2, "Section")));
/// assert_eq!(parse_heading_line("# Title #"), Some((1, "Title")));
/// assert_eq!(parse_heading_line("#NoSpace"), None);
/// assert_eq!(parse_heading_line("  # Indented"), None);
/// ```
pub fn parse_heading_line(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&ch| ch == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = strip_closing_sequence(rest.trim());
    if text.is_empty() {
        return None;
    }

    Some((level, text))
}

fn strip_closing_sequence(text: &str) -> &str {
    let without_hashes = text.trim_end_matches('#');
    if without_hashes.len() == text.len() {
        return text;
    }
    if without_hashes.is_empty() {
        return "";
    }
    if without_hashes.ends_with(char::is_whitespace) {
        without_hashes.trim_end()
    } else {
        // `# C#` keeps its hash
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heading_line_levels() {
        assert_eq!(parse_heading_line("# Title"), Some((1, "Title")));
        assert_eq!(parse_heading_line("## Section"), Some((2, "Section")));
        assert_eq!(parse_heading_line("###### Level 6"), Some((6, "Level 6")));
        assert_eq!(parse_heading_line("#\tTabbed"), Some((1, "Tabbed")));

        assert_eq!(parse_heading_line("not a heading"), None);
        assert_eq!(parse_heading_line("#NoSpace"), None);
        assert_eq!(parse_heading_line("####### Too many"), None);
        assert_eq!(parse_heading_line("  ## Indented"), None);
        assert_eq!(parse_heading_line("#   "), None);
        assert_eq!(parse_heading_line("#"), None);
    }

    #[test]
    fn test_parse_heading_line_trims_and_closes() {
        assert_eq!(parse_heading_line("##   Padded   "), Some((2, "Padded")));
        assert_eq!(parse_heading_line("## Closed ##"), Some((2, "Closed")));
        assert_eq!(parse_heading_line("# Learn C#"), Some((1, "Learn C#")));
        assert_eq!(parse_heading_line("# ###"), None);
    }
}
