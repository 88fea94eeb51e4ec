//! Translation of raw field-validation failures into a [`ResponseError`].
//!
//! A validation engine reports one [`RawFieldFailure`] per failed rule.
//! [`translate`] turns a batch of them into a single `validation/property`
//! error with one [`PropertyError`] per field, whose property name comes from
//! [`normalize`](crate::identifier::normalize) unless the failure already
//! carries its wire name.
//!
//! With the `validator` feature (default), [`failures_from`] adapts
//! `validator::ValidationErrors` into raw failures.

use crate::error::{PropertyError, ResponseError};
use crate::identifier::normalize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

/// One failed validation rule, as reported by the validation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFieldFailure {
    /// Field identifier as written in source (`UserName`).
    pub field: String,
    /// Name of the failing rule (`required`, `min`).
    pub rule: String,
    /// Rule parameter, if the rule takes one (`"8"` for `min=8`).
    pub param: Option<String>,
    /// Offending value; only used in the diagnostic message.
    pub value: Value,
    /// Wire name of the field, when the engine already knows it. Used as-is.
    pub property: Option<String>,
}

impl RawFieldFailure {
    /// Create a failure for a rule without parameter.
    #[must_use]
    pub fn new(field: impl Into<String>, rule: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            param: None,
            value: value.into(),
            property: None,
        }
    }

    /// Set the rule parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Set the wire name, bypassing normalization of `field`.
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Property name reported to the client.
    ///
    /// ```
    /// use apicore::RawFieldFailure;
    ///
    /// assert_eq!(RawFieldFailure::new("PDFLoader", "required", "").property_name(), "pdf_loader");
    ///
    /// let failure = RawFieldFailure::new("address_line2", "required", "").with_property("address_line2");
    /// assert_eq!(failure.property_name(), "address_line2");
    /// ```
    #[must_use]
    pub fn property_name(&self) -> Cow<'_, str> {
        match self.property.as_deref() {
            Some(property) => Cow::Borrowed(property),
            None => Cow::Owned(normalize(&self.field)),
        }
    }

    /// Human-readable description of the failed constraint.
    ///
    /// # Examples
    ///
    /// ```
    /// use apicore::RawFieldFailure;
    ///
    /// let failure = RawFieldFailure::new("Password", "min", "abc").with_param("8");
    /// assert_eq!(failure.constraint(), "validation [min 8] failed with value: abc");
    /// ```
    #[must_use]
    pub fn constraint(&self) -> String {
        let value = render_value(&self.value);
        match self.param.as_deref() {
            Some(param) if !param.is_empty() => {
                format!("validation [{} {param}] failed with value: {value}", self.rule)
            }
            _ => format!("validation [{}] failed with value: {value}", self.rule),
        }
    }
}

/// Strings render bare, everything else as its JSON text.
fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

/// Translate raw failures into a `validation/property` error.
///
/// Failures on the same property collapse into one [`PropertyError`].
/// Properties keep the order in which they were first reported, constraints
/// the order in which they were encountered.
#[must_use]
pub fn translate<'a, I>(failures: I) -> ResponseError
where
    I: IntoIterator<Item = &'a RawFieldFailure>,
{
    let mut error = ResponseError::invalid_parameters();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for failure in failures {
        let property = failure.property_name();
        let constraint = failure.constraint();
        if let Some(&slot) = slots.get(property.as_ref()) {
            error.properties[slot].constraints.push(constraint);
        } else {
            let property = property.into_owned();
            slots.insert(property.clone(), error.properties.len());
            error.properties.push(PropertyError::new(property, constraint));
        }
    }

    error
}

#[cfg(feature = "validator")]
pub use adapter::failures_from;

#[cfg(feature = "validator")]
mod adapter {
    use super::{render_value, RawFieldFailure};
    use crate::error::ServiceError;
    use serde_json::Value;
    use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

    const VALUE_PARAM: &str = "value";

    /// Flatten `validator` errors into raw failures.
    ///
    /// Fields are visited in name order; nested structs and list items are
    /// flattened in place and reported under their own field names. The Rust
    /// field name is what serde reads from the payload, so it is kept as the
    /// wire name instead of going through the normalizer.
    #[must_use]
    pub fn failures_from(errors: &ValidationErrors) -> Vec<RawFieldFailure> {
        let mut failures = Vec::new();
        collect(errors, &mut failures);
        failures
    }

    fn collect(errors: &ValidationErrors, out: &mut Vec<RawFieldFailure>) {
        let mut fields: Vec<_> = errors
            .errors()
            .iter()
            .map(|(field, kind)| (field_name(field), kind))
            .collect();
        fields.sort_by_key(|(field, _)| *field);

        for (field, kind) in fields {
            match kind {
                ValidationErrorsKind::Field(field_errors) => {
                    out.extend(field_errors.iter().map(|err| failure(field, err)));
                }
                ValidationErrorsKind::Struct(nested) => collect(nested, out),
                ValidationErrorsKind::List(items) => {
                    for nested in items.values() {
                        collect(nested, out);
                    }
                }
            }
        }
    }

    fn field_name<K: AsRef<str> + ?Sized>(key: &K) -> &str {
        key.as_ref()
    }

    fn failure(field: &str, err: &ValidationError) -> RawFieldFailure {
        let mut params: Vec<_> = err
            .params
            .iter()
            .filter(|(key, _)| field_name(*key) != VALUE_PARAM)
            .map(|(key, value)| format!("{key}={}", render_value(value)))
            .collect();
        params.sort();

        let value = err
            .params
            .get(VALUE_PARAM)
            .cloned()
            .unwrap_or(Value::Null);

        let failure =
            RawFieldFailure::new(field, err.code.to_string(), value).with_property(field);
        if params.is_empty() {
            failure
        } else {
            failure.with_param(params.join(" "))
        }
    }

    impl From<ValidationErrors> for ServiceError {
        fn from(errors: ValidationErrors) -> Self {
            Self::Validation(failures_from(&errors))
        }
    }

}
