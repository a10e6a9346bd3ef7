/// Leading `#` comment lines of an HPOA file, in their original order.
///
/// Lines of the form `#key: value` can be looked up by key; other comment
/// lines are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HeaderMetadata {
    lines: Vec<String>,
}

impl HeaderMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment line; a leading `#` is stripped.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        let body = line.strip_prefix('#').map(str::to_string).unwrap_or(line);
        self.lines.push(body);
    }

    /// Comment bodies without the leading `#`.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case(key)
                .then(|| value.trim())
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
