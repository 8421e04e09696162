/// Line parser: raw input line → (command, args, normalized line).
///
/// Pure function; the identifier set and whether a `shell` command exists are
/// supplied by the caller.

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// `None` for empty or unparseable lines; `Some("")` when the line starts
    /// with a non-identifier character.
    pub command: Option<String>,
    /// Remainder after the command name, trimmed.
    pub args: Option<String>,
    /// Stripped line with `?` / `!` shorthands expanded.
    pub line: String,
}

impl ParsedLine {
    fn unparsed(line: String) -> Self {
        Self {
            command: None,
            args: None,
            line,
        }
    }
}

/// Parse a line.
///
/// `?x` becomes `help x`; `!x` becomes `shell x` only when `has_shell`,
/// otherwise the line is unparseable.
pub fn parse_line(line: &str, is_identchar: impl Fn(char) -> bool, has_shell: bool) -> ParsedLine {
    let stripped = line.trim();
    let line = if let Some(rest) = stripped.strip_prefix('?') {
        format!("help {rest}")
    } else if let Some(rest) = stripped.strip_prefix('!') {
        if !has_shell {
            return ParsedLine::unparsed(stripped.to_string());
        }
        format!("shell {rest}")
    } else if stripped.is_empty() {
        return ParsedLine::unparsed(String::new());
    } else {
        stripped.to_string()
    };

    let split = line
        .char_indices()
        .find(|&(_, c)| !is_identchar(c))
        .map_or(line.len(), |(i, _)| i);
    let (command, rest) = line.split_at(split);

    ParsedLine {
        command: Some(command.to_string()),
        args: Some(rest.trim().to_string()),
        line,
    }
}
