/// Configuration options for the scanner and the node overlay.
///
/// These options choose between strict JSON and a set of lenient grammar
/// extensions, and control how object keys are scanned and matched.
///
/// # Default
///
/// All flags default to `false`; `max_depth` defaults to
/// [`ParserOptions::DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether to reject input that standard JSON rejects but a forgiving
    /// reader can still make sense of.
    ///
    /// When `true`, anything but whitespace after the root value is an error,
    /// and so is a trailing comma before `]` or `}`. When `false`, trailing
    /// content is ignored and one trailing comma is tolerated.
    ///
    /// # Default
    ///
    /// `false`
    pub strict: bool,

    /// Whether object keys may contain backslash escapes.
    ///
    /// When `true`, keys are scanned escape-aware and key lookup decodes an
    /// escaped key before comparing it. When `false`, keys are scanned up to
    /// the first quote and compared byte for byte, which is the faster path
    /// for the common case of plain keys.
    ///
    /// # Default
    ///
    /// `false`
    pub objects_keys_can_be_encoded: bool,

    /// Whether `#` starts a comment running to the end of the line.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_hash_comments: bool,

    /// Whether `//` starts a comment running to the end of the line.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_slash_slash_comments: bool,

    /// Whether `/* ... */` block comments are skipped like whitespace.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_slash_star_comments: bool,

    /// Whether object keys may be written without quotes.
    ///
    /// An unquoted key starts with an ASCII letter and runs until whitespace
    /// or the `:` separator.
    ///
    /// # Examples
    ///
    /// ```json
    /// {name: "jsonoverlay", version: 1}
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unquoted_keys: bool,

    /// Deepest container nesting accepted before scanning fails.
    ///
    /// # Default
    ///
    /// [`ParserOptions::DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,
}

impl ParserOptions {
    /// Default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 2_000;

    /// Options accepting every lenient extension: all comment styles and
    /// unquoted keys.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            allow_unquoted_keys: true,
            ..Self::default().with_comments(true)
        }
    }

    /// Enables or disables all three comment styles at once.
    #[must_use]
    pub fn with_comments(self, allow: bool) -> Self {
        Self {
            allow_hash_comments: allow,
            allow_slash_slash_comments: allow,
            allow_slash_star_comments: allow,
            ..self
        }
    }

    /// Whether any comment style is enabled.
    #[must_use]
    pub fn allows_comments(&self) -> bool {
        self.allow_hash_comments || self.allow_slash_slash_comments || self.allow_slash_star_comments
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            strict: false,
            objects_keys_can_be_encoded: false,
            allow_hash_comments: false,
            allow_slash_slash_comments: false,
            allow_slash_star_comments: false,
            allow_unquoted_keys: false,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
