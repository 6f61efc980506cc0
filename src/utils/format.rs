use futures::future::LocalBoxFuture;
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

/// Key/value context a format template is resolved against.
pub type FormatContext = Map<String, Value>;

type SyncFormatter = Rc<dyn Fn(&FormatContext) -> String>;
type AsyncFormatter = Rc<dyn Fn(FormatContext) -> LocalBoxFuture<'static, String>>;

/// A format template: `{key}` placeholders, or a function of the context.
#[derive(Clone)]
pub enum FormatString {
    Template(String),
    Func(SyncFormatter),
    AsyncFunc(AsyncFormatter),
    /// A value that cannot act as a template; renders as an inline error.
    Invalid(&'static str),
}

impl FormatString {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&FormatContext) -> String + 'static,
    {
        FormatString::Func(Rc::new(f))
    }

    pub fn async_func<F>(f: F) -> Self
    where
        F: Fn(FormatContext) -> LocalBoxFuture<'static, String> + 'static,
    {
        FormatString::AsyncFunc(Rc::new(f))
    }
}

impl fmt::Debug for FormatString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatString::Template(t) => f.debug_tuple("Template").field(t).finish(),
            FormatString::Func(_) => f.write_str("Func(..)"),
            FormatString::AsyncFunc(_) => f.write_str("AsyncFunc(..)"),
            FormatString::Invalid(kind) => f.debug_tuple("Invalid").field(kind).finish(),
        }
    }
}

impl From<&str> for FormatString {
    fn from(template: &str) -> Self {
        FormatString::Template(template.to_string())
    }
}

impl From<String> for FormatString {
    fn from(template: String) -> Self {
        FormatString::Template(template)
    }
}

/// Templates taken from dynamic values (render environment, process env).
impl From<Value> for FormatString {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FormatString::Template(s),
            other => FormatString::Invalid(value_kind(&other)),
        }
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text form of a context value; `None` for null, which leaves the
/// placeholder untouched.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Replace every `{key}` in `template` with its value in `context`.
pub fn substitute(template: &str, context: &FormatContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match context.get(key).and_then(value_to_text) {
            Some(text) => out.push_str(&text),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

pub async fn apply_format(format: &FormatString, context: &FormatContext) -> String {
    match format {
        FormatString::Template(template) => substitute(template, context),
        FormatString::Func(f) => f(context),
        FormatString::AsyncFunc(f) => f(context.clone()).await,
        FormatString::Invalid(kind) => {
            format!("Cannot use type {} as a format template.", kind)
        }
    }
}
