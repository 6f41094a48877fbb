//! Text filters for piped input (`dq`, `kv-splitter`).

/// Remove one leading and one trailing double quote if both are present.
///
/// Strings shorter than two characters are returned unchanged, so a lone `"`
/// stays as it is.
///
/// # Example
/// ```
/// use cli_tools::text::strip_quotes;
/// assert_eq!(strip_quotes("\"abc\""), "abc");
/// assert_eq!(strip_quotes("abc"), "abc");
/// assert_eq!(strip_quotes("\""), "\"");
/// ```
pub fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Remove a single trailing line terminator (`\n` or `\r\n`).
pub fn trim_line_ending(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

/// How `split_items` cuts and re-joins its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub item_separator: String,
    /// Without a key/value separator items are passed through whole
    pub kv_separator: Option<String>,
    pub item_replacement: String,
    pub kv_replacement: String,
}

impl SplitConfig {
    /// Built-in presets: `path` (`;`-separated list) and `cookies`
    /// (`;`-separated `key=value` pairs). Case-insensitive.
    pub fn from_preset(name: &str) -> Option<Self> {
        let kv_separator = match name.to_lowercase().as_str() {
            "path" => None,
            "cookies" => Some("=".to_string()),
            _ => return None,
        };

        Some(Self {
            item_separator: ";".to_string(),
            kv_separator,
            item_replacement: "\n".to_string(),
            kv_replacement: "\t".to_string(),
        })
    }
}

/// Expand `\n`, `\t`, `\r` and `\\` escapes typed on the command line.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Split `input` into trimmed, non-empty items and re-join them.
pub fn split_items(input: &str, config: &SplitConfig) -> String {
    let items: Vec<String> = input
        .split(config.item_separator.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| match &config.kv_separator {
            Some(sep) => match item.split_once(sep.as_str()) {
                Some((key, value)) => {
                    format!("{}{}{}", key.trim(), config.kv_replacement, value.trim())
                }
                None => item.to_string(),
            },
            None => item.to_string(),
        })
        .collect();

    items.join(&config.item_replacement)
}
