//! Declared tree shapes, checked at the validator boundary.
//!
//! The engine itself is shape-agnostic. A [`Shape`] is one ready-made
//! [`Validator`] for callers that only need kind checks and required
//! fields.

use form_path::Path;

use crate::errors::ErrorSet;
use crate::validator::Validator;
use crate::value::{Scalar, Value};

pub const REQUIRED: &str = "required";

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Any,
    Text,
    /// A checkbox: a boolean, or the text `on`, `true` or `false`.
    Bool,
    /// A number, or text that parses as one.
    Number,
    File,
    List(Box<Shape>),
    Object(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    pub fn required(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: false,
        }
    }
}

impl Shape {
    pub fn list(item: Shape) -> Self {
        Shape::List(Box::new(item))
    }

    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Shape::Object(fields.into_iter().collect())
    }

    /// Check `value` against this shape.
    pub fn check(&self, value: &Value) -> ErrorSet {
        let mut errors = ErrorSet::new();
        self.check_at(value, &Path::root(), &mut errors);
        errors
    }

    fn check_at(&self, value: &Value, path: &Path, errors: &mut ErrorSet) {
        if matches!(self, Shape::Any) {
            return;
        }
        if value.is_null() {
            errors.push(path.clone(), REQUIRED);
            return;
        }
        match (self, value) {
            (Shape::Text, Value::Scalar(Scalar::Text(_))) => {}
            (Shape::Text, _) => errors.push(path.clone(), "expected text"),
            (Shape::Bool, Value::Scalar(Scalar::Bool(_))) => {}
            (Shape::Bool, Value::Scalar(Scalar::Text(s))) if matches!(s.as_str(), "on" | "true" | "false") => {}
            (Shape::Bool, _) => errors.push(path.clone(), "expected a boolean"),
            (Shape::Number, Value::Scalar(Scalar::Number(_))) => {}
            (Shape::Number, Value::Scalar(Scalar::Text(s))) if s.trim().parse::<f64>().is_ok() => {}
            (Shape::Number, _) => errors.push(path.clone(), "expected a number"),
            (Shape::File, Value::Scalar(Scalar::File(_))) => {}
            (Shape::File, _) => errors.push(path.clone(), "expected a file"),
            (Shape::List(item), Value::List(items)) => {
                for (i, element) in items.iter().enumerate() {
                    item.check_at(element, &path.join(i), errors);
                }
            }
            // A multi-valued control that submitted once.
            (Shape::List(item), Value::Scalar(_)) => item.check_at(value, &path.join(0usize), errors),
            (Shape::List(_), _) => errors.push(path.clone(), "expected a list"),
            (Shape::Object(fields), Value::Object(present)) => {
                for field in fields {
                    let at = path.join(field.name.as_str());
                    match present.get(&field.name) {
                        Some(child) if !child.is_blank() => field.shape.check_at(child, &at, errors),
                        _ if field.required => errors.push(at, REQUIRED),
                        _ => {}
                    }
                }
            }
            (Shape::Object(_), _) => errors.push(path.clone(), "expected an object"),
            (Shape::Any, _) => {}
        }
    }
}

impl Validator for Shape {
    fn validate(&self, tree: &Value) -> ErrorSet {
        self.check(tree)
    }
}
