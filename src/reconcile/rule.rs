//! Key rewrite rules

/// Which lines a rule rewrites
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Matcher {
    /// `key = ...` lines, optionally only inside the given `[section]`
    Key {
        /// Key name
        key: &'static str,

        /// Table the key must appear in (any table if `None`)
        section: Option<&'static str>,
    },

    /// `key = ...` line immediately following a specific comment line
    AfterComment {
        /// Full text of the preceding comment line (trimmed)
        comment: &'static str,

        /// Key name
        key: &'static str,
    },
}

/// Replace the value of every line matching `matcher` with `value`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    matcher: Matcher,
    value: String,
}

impl Rule {
    /// Rewrite `key` anywhere in the document
    pub fn key(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            matcher: Matcher::Key { key, section: None },
            value: value.into(),
        }
    }

    /// Rewrite `key` only where it directly follows `comment`
    pub fn after_comment(
        comment: &'static str,
        key: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self {
            matcher: Matcher::AfterComment { comment, key },
            value: value.into(),
        }
    }

    /// Restrict a key rule to a single `[section]`
    pub fn in_section(mut self, name: &'static str) -> Self {
        if let Matcher::Key { section, .. } = &mut self.matcher {
            *section = Some(name);
        }
        self
    }

    /// Name of the key this rule rewrites
    pub fn key_name(&self) -> &'static str {
        match self.matcher {
            Matcher::Key { key, .. } | Matcher::AfterComment { key, .. } => key,
        }
    }

    /// Rendered replacement value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Does `line` match, given the enclosing section and the previous line?
    pub(super) fn matches(
        &self,
        line: &str,
        section: Option<&str>,
        previous: Option<&str>,
    ) -> bool {
        if key_of(line) != Some(self.key_name()) {
            return false;
        }

        match &self.matcher {
            Matcher::Key { section: None, .. } => true,
            Matcher::Key {
                section: Some(wanted),
                ..
            } => section == Some(*wanted),
            Matcher::AfterComment { comment, .. } => previous.map(str::trim) == Some(*comment),
        }
    }

    /// Rewrite a matching line, keeping its indentation and any trailing
    /// comment
    pub(super) fn rewrite(&self, line: &str) -> String {
        let indent = &line[..line.len() - line.trim_start().len()];
        let comment = line
            .split_once('=')
            .map_or("", |(_, value)| trailing_comment(value));

        format!("{}{} = {}{}", indent, self.key_name(), self.value, comment)
    }
}

/// Inline `# comment` after a value, including the whitespace before it
fn trailing_comment(value: &str) -> &str {
    let mut quote = None;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => (),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => {
                let start = value[..i].trim_end().len();
                return &value[start..];
            }
            None => (),
        }
    }

    ""
}

/// Key of a `key = value` line (`None` for comments, headers and blanks)
pub(super) fn key_of(line: &str) -> Option<&str> {
    let line = line.trim_start();

    if line.starts_with('#') || line.starts_with('[') {
        return None;
    }

    let (key, _) = line.split_once('=')?;
    let key = key.trim_end();

    if key.is_empty() || key.contains(char::is_whitespace) {
        None
    } else {
        Some(key)
    }
}

/// Table name of a `[section]` / `[[section]]` header line
pub(super) fn section_of(line: &str) -> Option<&str> {
    let line = line.trim();
    let name = line.strip_prefix('[')?;
    let end = name.find(']')?;
    let rest = name[end..].trim_start_matches(']').trim_start();

    // rules out array values such as `  ["a", "b"],`
    if !rest.is_empty() && !rest.starts_with('#') {
        return None;
    }

    Some(name[..end].trim_start_matches('[').trim())
}

/// Render a string as a TOML basic string
pub fn quoted(value: &str) -> String {
    toml::Value::String(value.to_owned()).to_string()
}
