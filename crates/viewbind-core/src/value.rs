#![forbid(unsafe_code)]

//! Dynamic values exchanged between controller properties and widgets.
//!
//! Widgets only understand a handful of shapes (text, numbers, toggles,
//! lists), while controller properties are strongly typed. [`Value`] is the
//! currency in between and [`Value::convert_to`] is the type converter used
//! whenever a widget value flows back into a typed property.
//!
//! # Conversion Rules
//!
//! | From \ To | Bool | Int | Float | Text | List |
//! |-----------|------|-----|-------|------|------|
//! | Bool      | =    | 0/1 | 0/1   | `"true"`/`"false"` | error |
//! | Int       | `!= 0` | = | exact | decimal | error |
//! | Float     | `!= 0` | rounded | = | decimal | error |
//! | Text      | parse | parse | parse | = | error |
//! | List      | error | error | error | error | = |
//! | None      | default | default | default | default | default |
//!
//! Non-finite floats never convert to `Int`. Numbers that do not fit the
//! target (a float rounding outside `i64`, an `i64` outside `i32`, a finite
//! `f64` beyond `f32::MAX`) are [`ValueError::OutOfRange`], never clamped.

use core::fmt;

/// Declared type of a value-carrying property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Text,
    List,
}

impl ValueType {
    /// Default value used when converting [`Value::None`].
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::Text => Value::Text(String::new()),
            Self::List => Value::List(Vec::new()),
        }
    }

    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced by [`Value::convert_to`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The two types have no conversion between them.
    #[error("cannot convert {found} to {expected}")]
    Incompatible {
        expected: ValueType,
        found: ValueType,
    },
    /// Text could not be parsed as the requested type.
    #[error("cannot parse {text:?} as {expected}")]
    Parse { expected: ValueType, text: String },
    /// The number does not fit the target type.
    #[error("{value} is out of range for {expected}")]
    OutOfRange { expected: ValueType, value: String },
}

/// `2^63`: the first float above every `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn out_of_range(expected: ValueType, value: impl fmt::Display) -> ValueError {
    ValueError::OutOfRange {
        expected,
        value: value.to_string(),
    }
}

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value (an uninitialized widget, an empty selection).
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Runtime type of this value, `None` for [`Value::None`].
    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::None => None,
            Self::Bool(_) => Some(ValueType::Bool),
            Self::Int(_) => Some(ValueType::Int),
            Self::Float(_) => Some(ValueType::Float),
            Self::Text(_) => Some(ValueType::Text),
            Self::List(_) => Some(ValueType::List),
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert this value to `target`, following the module-level rules.
    pub fn convert_to(&self, target: ValueType) -> Result<Value, ValueError> {
        let Some(found) = self.value_type() else {
            return Ok(target.default_value());
        };
        if found == target {
            return Ok(self.clone());
        }
        let incompatible = ValueError::Incompatible {
            expected: target,
            found,
        };
        match (self, target) {
            (Self::Bool(b), ValueType::Int) => Ok(Self::Int(i64::from(*b))),
            (Self::Bool(b), ValueType::Float) => Ok(Self::Float(if *b { 1.0 } else { 0.0 })),
            (Self::Bool(b), ValueType::Text) => Ok(Self::Text(b.to_string())),
            (Self::Int(i), ValueType::Bool) => Ok(Self::Bool(*i != 0)),
            (Self::Int(i), ValueType::Float) => Ok(Self::Float(*i as f64)),
            (Self::Int(i), ValueType::Text) => Ok(Self::Text(i.to_string())),
            (Self::Float(f), ValueType::Bool) => Ok(Self::Bool(*f != 0.0)),
            (Self::Float(f), ValueType::Int) => {
                if !f.is_finite() {
                    return Err(incompatible);
                }
                let rounded = f.round();
                if (-I64_BOUND..I64_BOUND).contains(&rounded) {
                    Ok(Self::Int(rounded as i64))
                } else {
                    Err(out_of_range(ValueType::Int, f))
                }
            }
            (Self::Float(f), ValueType::Text) => Ok(Self::Text(f.to_string())),
            (Self::Text(s), ValueType::Bool) => parse_bool(s)
                .map(Self::Bool)
                .ok_or_else(|| parse_error(ValueType::Bool, s)),
            (Self::Text(s), ValueType::Int) => s
                .trim()
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|_| parse_error(ValueType::Int, s)),
            (Self::Text(s), ValueType::Float) => s
                .trim()
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| parse_error(ValueType::Float, s)),
            _ => Err(incompatible),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" || text.is_empty() {
        Some(false)
    } else {
        None
    }
}

fn parse_error(expected: ValueType, text: &str) -> ValueError {
    ValueError::Parse {
        expected,
        text: text.to_owned(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

/// A Rust type that can back a bindable controller property.
///
/// The declared [`ValueType`] is what the property registry records for the
/// property; `from_value` runs the converter first, so a slider's float can
/// land in an integer property.
pub trait Bindable: Sized {
    /// Declared type of properties of this Rust type.
    const TYPE: ValueType;

    /// Wrap into a [`Value`].
    fn into_value(self) -> Value;

    /// Convert from any compatible [`Value`].
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

impl Bindable for bool {
    const TYPE: ValueType = ValueType::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value.convert_to(Self::TYPE)? {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(Self::TYPE, &other)),
        }
    }
}

impl Bindable for i64 {
    const TYPE: ValueType = ValueType::Int;

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value.convert_to(Self::TYPE)? {
            Value::Int(i) => Ok(i),
            other => Err(mismatch(Self::TYPE, &other)),
        }
    }
}

impl Bindable for i32 {
    const TYPE: ValueType = ValueType::Int;

    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| out_of_range(Self::TYPE, wide))
    }
}

impl Bindable for f64 {
    const TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value.convert_to(Self::TYPE)? {
            Value::Float(f) => Ok(f),
            other => Err(mismatch(Self::TYPE, &other)),
        }
    }
}

impl Bindable for f32 {
    const TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let wide = f64::from_value(value)?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return Err(out_of_range(Self::TYPE, wide));
        }
        Ok(wide as f32)
    }
}

impl Bindable for String {
    const TYPE: ValueType = ValueType::Text;

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value.convert_to(Self::TYPE)? {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(Self::TYPE, &other)),
        }
    }
}

impl Bindable for Vec<Value> {
    const TYPE: ValueType = ValueType::List;

    fn into_value(self) -> Value {
        Value::List(self)
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value.convert_to(Self::TYPE)? {
            Value::List(items) => Ok(items),
            other => Err(mismatch(Self::TYPE, &other)),
        }
    }
}

fn mismatch(expected: ValueType, found: &Value) -> ValueError {
    ValueError::Incompatible {
        expected,
        found: found.value_type().unwrap_or(expected),
    }
}
