//! Loggable values
//!
//! A log message or context field is any [`Value`]: a scalar, an ordered
//! collection, an error with its cause chain, an introspectable object or an
//! opaque resource handle. Formatters turn these into text or JSON trees.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Error(ErrorValue),
    Object(ObjectRef),
    /// Something with no textual form, such as an OS handle. The string
    /// names the kind of resource.
    Resource(String),
}

impl Value {
    /// Wrap an introspectable object.
    pub fn object<T: Describe + 'static>(object: Arc<T>) -> Self {
        Value::Object(ObjectRef::new(object))
    }

    pub fn resource(kind: impl Into<String>) -> Self {
        Value::Resource(kind.into())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// String conversion of a scalar, `None` for anything else.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Plain JSON rendering without normalization rules.
    ///
    /// Objects collapse to their display text, resources to `"[resource]"`.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json_value).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
            Value::Error(err) => serde_json::Value::String(err.to_string()),
            Value::Object(obj) => serde_json::Value::String(obj.to_string()),
            Value::Resource(_) => serde_json::Value::String("[resource]".to_string()),
        }
    }
}

/// Text used when a value is substituted into a `{placeholder}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => f.write_str(s),
            Value::List(_) | Value::Map(_) => write!(f, "{}", self.to_json_value()),
            Value::Error(err) => write!(f, "{}", err),
            Value::Object(obj) => write!(f, "{}", obj),
            Value::Resource(_) => f.write_str("[resource]"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        i64::try_from(i)
            .map(Value::Int)
            .unwrap_or(Value::Float(i as f64))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::from(i as u64)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<ErrorValue> for Value {
    fn from(err: ErrorValue) -> Self {
        Value::Error(err)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

/// One frame of an error's call stack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackFrame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: Option<String>,
}

impl StackFrame {
    pub fn at(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            function: None,
        }
    }

    /// A frame known only by its function name.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            function: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.function = Some(name.into());
        self
    }

    /// `"file:line"` when the frame has a source location.
    pub fn location(&self) -> Option<String> {
        let file = self.file.as_ref()?;
        Some(format!("{}:{}", file, self.line.unwrap_or(0)))
    }
}

/// An error captured as loggable data
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    pub class: String,
    pub message: String,
    pub code: i64,
    pub file: String,
    pub line: u32,
    pub trace: Vec<StackFrame>,
    pub previous: Option<Box<ErrorValue>>,
}

impl ErrorValue {
    /// Create an error value located at the caller.
    #[track_caller]
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            class: class.into(),
            message: message.into(),
            code: 0,
            file: location.file().to_string(),
            line: location.line(),
            trace: Vec::new(),
            previous: None,
        }
    }

    /// Capture a Rust error and its `source()` chain.
    ///
    /// The class is the error's type name, the location is the caller and
    /// OS error codes are kept when the error (or a cause) is an
    /// `std::io::Error`.
    #[track_caller]
    pub fn from_error<E: std::error::Error + 'static>(err: &E) -> Self {
        let location = std::panic::Location::caller();
        let mut value = Self::capture(std::any::type_name::<E>(), err);
        value.file = location.file().to_string();
        value.line = location.line();

        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            let mut previous = Self::capture("std::error::Error", cause);
            previous.file = value.file.clone();
            previous.line = value.line;
            causes.push(previous);
            source = cause.source();
        }

        // innermost cause first, so each link wraps the deeper chain
        value.previous = causes.into_iter().rev().fold(None, |deeper, mut cause| {
            cause.previous = deeper;
            Some(Box::new(cause))
        });
        value
    }

    fn capture(class: &str, err: &(dyn std::error::Error + 'static)) -> Self {
        let code = err
            .downcast_ref::<std::io::Error>()
            .and_then(std::io::Error::raw_os_error)
            .map(i64::from)
            .unwrap_or(0);
        Self {
            class: class.to_string(),
            message: err.to_string(),
            code,
            file: String::new(),
            line: 0,
            trace: Vec::new(),
            previous: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.trace.push(frame);
        self
    }

    #[must_use]
    pub fn with_previous(mut self, previous: ErrorValue) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub const fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named field reported by [`Describe::describe_fields`]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, visibility: Visibility, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            visibility,
            is_static: false,
            value: value.into(),
        }
    }

    pub fn public(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, Visibility::Public, value)
    }

    pub fn protected(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, Visibility::Protected, value)
    }

    pub fn private(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, Visibility::Private, value)
    }

    #[must_use]
    pub fn shared(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Visibility tag, e.g. `"protected"` or `"private static"`.
    pub fn tag(&self) -> String {
        if self.is_static {
            format!("{} static", self.visibility)
        } else {
            self.visibility.to_string()
        }
    }
}

/// Introspection capability for values logged as objects.
///
/// Implementors list their fields, hidden ones included, so formatters can
/// render them without runtime reflection.
///
/// # Example
///
/// ```
/// use log_dispatch::{Describe, Field, Value};
/// use std::sync::Arc;
///
/// struct Session {
///     user: String,
///     token: String,
/// }
///
/// impl Describe for Session {
///     fn type_name(&self) -> &str {
///         "Session"
///     }
///
///     fn describe_fields(&self) -> Vec<Field> {
///         vec![
///             Field::public("user", self.user.as_str()),
///             Field::private("token", self.token.as_str()),
///         ]
///     }
/// }
///
/// let value = Value::object(Arc::new(Session {
///     user: "alice".into(),
///     token: "s3cr3t".into(),
/// }));
/// assert!(!value.is_scalar());
/// ```
pub trait Describe: Send + Sync {
    fn type_name(&self) -> &str;

    fn describe_fields(&self) -> Vec<Field>;

    /// Human-readable form, if the type has one.
    fn display(&self) -> Option<String> {
        None
    }
}

/// Shared handle to an introspectable object, compared by identity
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Describe>);

impl ObjectRef {
    pub fn new<T: Describe + 'static>(object: Arc<T>) -> Self {
        ObjectRef(object)
    }

    pub fn from_dyn(object: Arc<dyn Describe>) -> Self {
        ObjectRef(object)
    }

    /// Address of the shared object, stable for its lifetime.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.id() == other.id()
    }

    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    pub fn fields(&self) -> Vec<Field> {
        self.0.describe_fields()
    }

    pub fn display(&self) -> Option<String> {
        self.0.display()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type_name", &self.type_name())
            .field("id", &format_args!("{:#x}", self.id()))
            .finish()
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display() {
            Some(text) => write!(f, "[object] ({}: {})", self.type_name(), text),
            None => write!(f, "[object] ({})", self.type_name()),
        }
    }
}
