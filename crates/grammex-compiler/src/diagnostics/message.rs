use grammex_core::Location;

/// Diagnostic kinds, errors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Malformed input data
    InvalidCharRange,
    InvalidRepetitionRange,

    // Structural errors found by the semantic passes
    EmptyLoopBody,
    LeftRecursion,
    RegexLoop,

    // Choice reachability advisories
    EmptyAlternative,
    CodeForcedChoice,
    CodeForcedLoop,

    // Grammar ambiguity
    ChoiceConflict,
    LoopConflict,

    // Lexer
    UnmatchableRegex,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::InvalidCharRange
            | Self::InvalidRepetitionRange
            | Self::EmptyLoopBody
            | Self::LeftRecursion
            | Self::RegexLoop => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptyAlternative | Self::CodeForcedChoice => {
                Some("this choice is always taken in favor of the choices appearing later")
            }
            Self::CodeForcedLoop => {
                Some("the construct is always entered in favor of expansions occurring after it")
            }
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::InvalidCharRange => "invalid character range",
            Self::InvalidRepetitionRange => "invalid repetition range",
            Self::EmptyLoopBody => "expansion can be matched by the empty string",
            Self::LeftRecursion => "left recursion detected",
            Self::RegexLoop => "loop in regular expression detected",
            Self::EmptyAlternative => "choice can expand to the empty token sequence",
            Self::CodeForcedChoice => "code production forces this choice to be taken",
            Self::CodeForcedLoop => "code production forces this construct to be entered",
            Self::ChoiceConflict => "choice conflict",
            Self::LoopConflict => "choice conflict in loop construct",
            Self::UnmatchableRegex => "regular expression choice can never be matched",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::InvalidCharRange => "invalid character range {}".to_string(),
            Self::InvalidRepetitionRange => "invalid repetition range {}".to_string(),
            Self::EmptyLoopBody => "expansion within `{}` can be matched by the empty string".to_string(),
            Self::CodeForcedLoop => {
                "code production within `{}` forces this construct to be entered".to_string()
            }
            Self::LoopConflict => "choice conflict in {}".to_string(),
            Self::UnmatchableRegex => "regular expression choice {}".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) location: Location,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One reported problem, anchored at a grammar location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) location: Location,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl Diagnostic {
    pub(crate) fn with_default_message(kind: DiagnosticKind, location: Location) -> Self {
        Self {
            kind,
            location,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
            hints: kind.default_hint().map(str::to_owned).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn related(&self) -> &[RelatedInfo] {
        &self.related
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}: {}",
            self.severity(),
            self.location.line,
            self.location.column,
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}:{})",
                related.message, related.location.line, related.location.column
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
