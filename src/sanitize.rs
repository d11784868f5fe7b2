//! Filesystem-safe file names from document headers.

/// Extension appended to every sanitized name.
pub const DOCX_EXTENSION: &str = ".docx";

/// Characters that cannot appear in an NTFS file name, with their stand-ins.
const DEFAULT_RULES: &[(&str, &str)] = &[("/", "-"), ("\\", "-"), ("|", "-"), ("\"", "'")];

/// A single literal replacement applied to the whole name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceRule {
    /// Substring to replace
    pub from: String,
    /// Replacement text
    pub to: String,
}

/// Ordered replacement rules plus the extension to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitizer {
    rules: Vec<ReplaceRule>,
    extension: String,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES
                .iter()
                .map(|(from, to)| ReplaceRule {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .collect(),
            extension: DOCX_EXTENSION.to_string(),
        }
    }
}

impl Sanitizer {
    /// Create a sanitizer with the default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a replacement rule, applied after the existing ones.
    ///
    /// An empty `from` is ignored.
    pub fn with_rule(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        if !from.is_empty() {
            self.rules.push(ReplaceRule {
                from,
                to: to.into(),
            });
        }
        self
    }

    /// The replacement rules, in application order.
    pub fn rules(&self) -> &[ReplaceRule] {
        &self.rules
    }

    /// The extension appended after replacement.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Apply every rule in order, then append the extension.
    pub fn sanitize(&self, raw: &str) -> String {
        let mut name = self
            .rules
            .iter()
            .fold(raw.to_string(), |acc, rule| acc.replace(&rule.from, &rule.to));
        name.push_str(&self.extension);
        name
    }
}

/// Sanitize a raw header with the default rules and append `.docx`.
///
/// # Example
///
/// ```
/// assert_eq!(redocx::sanitize("a/b\\c|d\"e"), "a-b-c-d'e.docx");
/// ```
pub fn sanitize(raw: &str) -> String {
    Sanitizer::default().sanitize(raw)
}
