use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::CoreError;
use crate::fields::FieldName;
use crate::form::FormValues;

/// Numeric request body: one number per field, in schema order.
///
/// Entries that failed coercion are NaN and serialize as JSON `null`.
#[derive(Debug, Clone, Copy)]
pub struct Payload {
    values: [f64; FieldName::COUNT],
}

impl Payload {
    /// Coerce every field of `form` with [`coerce`].
    pub fn from_form(form: &FormValues) -> Self {
        let mut values = [f64::NAN; FieldName::COUNT];
        for (field, text) in form.iter() {
            values[field.ordinal()] = coerce(text);
        }
        Self { values }
    }

    pub fn get(&self, field: FieldName) -> f64 {
        self.values[field.ordinal()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, f64)> + '_ {
        FieldName::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Fields whose value is NaN.
    pub fn invalid_fields(&self) -> Vec<FieldName> {
        self.iter()
            .filter(|(_, v)| v.is_nan())
            .map(|(f, _)| f)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FieldName::COUNT))?;
        for (field, value) in self.iter() {
            let value = value.is_finite().then_some(value);
            map.serialize_entry(field.as_str(), &value)?;
        }
        map.end()
    }
}

/// Decimal text to number. Blank, unparsable, or non-finite input is NaN.
pub fn coerce(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

/// Turns form text into a request payload.
pub trait PayloadBuilder: Send + Sync {
    fn build(&self, form: &FormValues) -> Result<Payload, CoreError>;
}

/// Never rejects. NaN entries go to the service, which is expected to
/// answer with a validation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveBuilder;

impl PayloadBuilder for PermissiveBuilder {
    fn build(&self, form: &FormValues) -> Result<Payload, CoreError> {
        let payload = Payload::from_form(form);
        let invalid = payload.invalid_fields();
        if !invalid.is_empty() {
            debug!(?invalid, "payload carries non-numeric entries");
        }
        Ok(payload)
    }
}

/// Rejects the payload when any field fails coercion.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictBuilder;

impl PayloadBuilder for StrictBuilder {
    fn build(&self, form: &FormValues) -> Result<Payload, CoreError> {
        let payload = Payload::from_form(form);
        let invalid = payload.invalid_fields();
        if invalid.is_empty() {
            Ok(payload)
        } else {
            Err(CoreError::InvalidFields(invalid))
        }
    }
}
