//! Immutable failure records and the diagnostics they report to

use std::{
    backtrace::{Backtrace, BacktraceStatus},
    cell::RefCell,
    fmt::Debug,
};

use console::style;
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

/// A closed set of string tags identifying the kind of a [`Failure`]
///
/// Usually declared with [`failure_codes!`](crate::failure_codes)
pub trait Code: Debug + Clone + PartialEq {
    fn tag(&self) -> &'static str;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("Unknown failure code `{tag}`, expected one of: {expected}")]
    /// The tag is not part of the code set
    UnknownCode { tag: String, expected: String },
}

/// Declare a closed set of failure codes
///
/// ```
/// forkpath::failure_codes! {
///     pub enum LookupCode {
///         NotFound => "not_found",
///         Forbidden => "forbidden",
///     }
/// }
///
/// assert_eq!("forbidden".parse::<LookupCode>(), Ok(LookupCode::Forbidden));
/// ```
#[macro_export]
macro_rules! failure_codes {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl $crate::failure::Code for $name {
            fn tag(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::failure::Code::tag(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::failure::CodeError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    other => Err($crate::failure::CodeError::UnknownCode {
                        tag: other.to_string(),
                        expected: [$($tag),+].join(", "),
                    }),
                }
            }
        }
    };
}

// {{{ Diagnostics

/// Where diagnostic lines go when a failure is built with [`FailureBuilder::log`]
///
/// Writing is fire and forget, a sink that cannot write drops the line.
pub trait DiagnosticSink {
    fn write_line(&self, line: &str);
}

/// Forwards diagnostic lines to the `log` facade at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn write_line(&self, line: &str) {
        error!("{}", line);
    }
}

/// Drops every line
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn write_line(&self, _line: &str) {}
}

/// Keeps every line in memory, in the order written
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: RefCell<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn write_line(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn write_line(&self, line: &str) {
        (**self).write_line(line)
    }
}

/// How the call stack is captured when a failure is built
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    /// Capture when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enables it,
    /// otherwise the trace is left empty
    Capture,

    /// Always capture, whatever the environment says
    #[default]
    Force,

    /// Never capture, the trace is left empty
    Off,
}

impl TraceMode {
    fn snapshot(self) -> String {
        let bt = match self {
            TraceMode::Capture => Backtrace::capture(),
            TraceMode::Force => Backtrace::force_capture(),
            TraceMode::Off => return String::new(),
        };

        match bt.status() {
            BacktraceStatus::Captured => bt.to_string(),
            _ => String::new(),
        }
    }
}

/// The capabilities a failure is built against
#[derive(Debug, Clone)]
pub struct Diagnostics<S = LogSink> {
    sink: S,
    trace: TraceMode,
}

impl Default for Diagnostics<LogSink> {
    fn default() -> Self {
        Self {
            sink: LogSink,
            trace: TraceMode::default(),
        }
    }
}

impl<S: DiagnosticSink> Diagnostics<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            trace: TraceMode::default(),
        }
    }

    pub fn trace_mode(self, trace: TraceMode) -> Self {
        Self { trace, ..self }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Start building a failure that reports to this sink
    pub fn fail<C: Code, B>(&self, code: C) -> FailureBuilder<'_, C, B> {
        FailureBuilder::new(&self.sink, self.trace, code)
    }
}

// }}}

/// Start building a failure against the default diagnostics
///
/// Diagnostic lines go through [`LogSink`] and the trace is always captured
/// ([`TraceMode::Force`]).
pub fn fail<C: Code, B>(code: C) -> FailureBuilder<'static, C, B> {
    FailureBuilder::new(&LogSink, TraceMode::Force, code)
}

#[must_use = "a failure is only created by calling `finish`"]
pub struct FailureBuilder<'d, C, B = ()> {
    sink: &'d dyn DiagnosticSink,
    trace: TraceMode,
    code: C,
    message: Option<String>,
    body: Option<B>,
    diagnostic: Option<String>,
}

impl<'d, C: Code, B> FailureBuilder<'d, C, B> {
    fn new(sink: &'d dyn DiagnosticSink, trace: TraceMode, code: C) -> Self {
        Self {
            sink,
            trace,
            code,
            message: None,
            body: None,
            diagnostic: None,
        }
    }

    /// Attach a human readable message
    ///
    /// Strings are kept verbatim, anything else is stored as its JSON text.
    pub fn message(mut self, message: impl Serialize) -> Self {
        self.message.replace(message_text(&message));
        self
    }

    pub fn body(mut self, body: B) -> Self {
        self.body.replace(body);
        self
    }

    /// A line for the diagnostics sink, written when the failure is built
    pub fn log(mut self, line: impl Into<String>) -> Self {
        self.diagnostic.replace(line.into());
        self
    }

    pub fn finish(self) -> Failure<C, B> {
        if let Some(line) = &self.diagnostic {
            self.sink.write_line(line);
        }

        Failure {
            code: self.code,
            message: self.message,
            body: self.body,
            trace: self.trace.snapshot(),
        }
    }
}

fn message_text(message: &impl Serialize) -> String {
    match serde_json::to_value(message) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(value) => value.to_string(),
        Err(e) => {
            warn!("Could not serialize failure message: {}", e);
            format!("<unserializable message: {}>", e)
        }
    }
}

/// A structured, immutable error record
///
/// Equality looks at the code, message and body. The trace is only there for
/// whoever reads the failure later.
#[derive(Debug, Clone)]
pub struct Failure<C, B = ()> {
    code: C,
    message: Option<String>,
    body: Option<B>,
    trace: String,
}

impl<C: Code, B> Failure<C, B> {
    pub fn code(&self) -> &C {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Call stack at construction, empty when capture was disabled
    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// Re-tag the failure, keeping everything else
    pub fn recode<D: Code>(self, f: impl FnOnce(C) -> D) -> Failure<D, B> {
        Failure {
            code: f(self.code),
            message: self.message,
            body: self.body,
            trace: self.trace,
        }
    }
}

impl<C: Code, B: Debug> Failure<C, B> {
    /// Render headline and body with terminal styling
    pub fn render(&self) -> String {
        let mut out = format!("{}", style(self.headline()).red().bold());
        let body = HeadlineError::body(self);
        if !body.is_empty() {
            out.push('\n');
            out.push_str(&body);
        }
        if !self.trace.is_empty() {
            out.push('\n');
            out.push_str(&format!("{}", style(&self.trace).dim()));
        }
        out
    }
}

impl<C: PartialEq, B: PartialEq> PartialEq for Failure<C, B> {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message && self.body == other.body
    }
}

impl<C: Code, B> std::fmt::Display for Failure<C, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code.tag(), message),
            None => write!(f, "{}", self.code.tag()),
        }
    }
}

impl<C: Code, B: Debug> std::error::Error for Failure<C, B> {}

/// Errors that can be shown as a one line headline followed by a longer body
pub trait HeadlineError {
    fn headline(&self) -> String;
    fn body(&self) -> String;
}

impl<C: Code, B: Debug> HeadlineError for Failure<C, B> {
    fn headline(&self) -> String {
        format!("Failed with {}", self.code.tag())
    }

    fn body(&self) -> String {
        match (&self.message, &self.body) {
            (Some(m), Some(b)) => format!("{}\n{:#?}", m, b),
            (Some(m), None) => m.clone(),
            (None, Some(b)) => format!("{:#?}", b),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    crate::failure_codes! {
        enum TestCode {
            Missing => "missing",
            Invalid => "invalid",
        }
    }

    crate::failure_codes! {
        enum OuterCode {
            Lookup => "lookup",
        }
    }

    #[derive(Serialize)]
    struct Detail {
        field: &'static str,
        line: u32,
    }

    fn quiet() -> Diagnostics<RecordingSink> {
        Diagnostics::new(RecordingSink::new()).trace_mode(TraceMode::Off)
    }

    #[test]
    fn writes_diagnostic_on_construction() {
        let diag = quiet();

        let _: Failure<TestCode> = diag.fail(TestCode::Missing).log("lookup failed").finish();
        let _: Failure<TestCode> = diag.fail(TestCode::Invalid).finish();

        assert_eq!(diag.sink().lines(), vec!["lookup failed".to_string()]);
    }

    #[test]
    fn keeps_text_messages_and_serializes_others() {
        let diag = quiet();

        let text: Failure<TestCode> = diag.fail(TestCode::Invalid).message("bad input").finish();
        let structured: Failure<TestCode> = diag
            .fail(TestCode::Invalid)
            .message(Detail {
                field: "name",
                line: 3,
            })
            .finish();

        assert_eq!(text.message(), Some("bad input"));
        assert_eq!(structured.message(), Some(r#"{"field":"name","line":3}"#));
    }

    #[test]
    fn equality_ignores_trace() {
        let forced: Failure<TestCode, u8> = Diagnostics::new(NullSink)
            .trace_mode(TraceMode::Force)
            .fail(TestCode::Missing)
            .body(7)
            .finish();
        let bare: Failure<TestCode, u8> = quiet().fail(TestCode::Missing).body(7).finish();

        assert!(!forced.trace().is_empty());
        assert!(bare.trace().is_empty());
        assert_eq!(forced, bare);
    }

    #[test]
    fn codes_round_trip_through_tags() {
        for code in TestCode::ALL {
            assert_eq!(code.tag().parse::<TestCode>(), Ok(*code));
        }

        assert_eq!(
            "gone".parse::<TestCode>(),
            Err(CodeError::UnknownCode {
                tag: "gone".to_string(),
                expected: "missing, invalid".to_string(),
            })
        );
    }

    #[test]
    fn display_and_headline() {
        console::set_colors_enabled(false);

        let f: Failure<TestCode, u8> = quiet()
            .fail(TestCode::Invalid)
            .message("out of range")
            .body(42)
            .finish();

        assert_eq!(f.to_string(), "invalid: out of range");
        assert_eq!(f.headline(), "Failed with invalid");
        assert_eq!(f.render(), "Failed with invalid\nout of range\n42");
    }

    #[test]
    fn default_failures_carry_a_stack() {
        let f: Failure<TestCode> = fail(TestCode::Missing).message("m").finish();

        assert!(!f.trace().is_empty());
        assert_ne!(f.trace(), "disabled backtrace");
        assert_eq!(Diagnostics::default().trace, TraceMode::Force);
    }

    #[test]
    fn capture_leaves_no_placeholder_text() {
        console::set_colors_enabled(false);

        let f: Failure<TestCode> = Diagnostics::new(NullSink)
            .trace_mode(TraceMode::Capture)
            .fail(TestCode::Missing)
            .message("m")
            .finish();

        // empty unless the environment turned capture on
        assert!(!f.trace().contains("disabled backtrace"));
        if f.trace().is_empty() {
            assert_eq!(f.render(), "Failed with missing\nm");
        }
    }

    #[test]
    fn recode_keeps_payload() {
        let f: Failure<TestCode> = quiet().fail(TestCode::Missing).message("x").finish();
        let g = f.recode(|_| OuterCode::Lookup);

        assert_eq!(g.code().tag(), "lookup");
        assert_eq!(g.message(), Some("x"));
    }
}
