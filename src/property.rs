//! Observable properties: a named value with optional write validation,
//! optional coercion, and change notification fired after coercion.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertyError {
    #[error("value rejected by the `{property}` validator")]
    Rejected { property: &'static str },
}

pub type Validator<T> = fn(&T) -> bool;
pub type Coercer<T> = fn(T) -> T;
pub type ChangeObserver<T> = Box<dyn FnMut(&T, &T)>;

pub struct Property<T> {
    name: &'static str,
    value: T,
    validate: Option<Validator<T>>,
    coerce: Option<Coercer<T>>,
    observers: Vec<ChangeObserver<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl<T: PartialEq> Property<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value,
            validate: None,
            coerce: None,
            observers: Vec::new(),
        }
    }

    pub fn with_validator(mut self, validate: Validator<T>) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn with_coerce(mut self, coerce: Coercer<T>) -> Self {
        self.coerce = Some(coerce);
        self
    }

    /// Registers a callback invoked with (old, new) after every effective
    /// change.
    pub fn observe(&mut self, observer: impl FnMut(&T, &T) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Writes the property. The value first passes the validator (a failed
    /// validation rejects the write and notifies nobody), then the coercer,
    /// and observers fire only if the coerced value differs from the current
    /// one. Returns whether the value changed.
    pub fn set(&mut self, value: T) -> Result<bool, PropertyError> {
        if let Some(validate) = self.validate
            && !validate(&value)
        {
            log::warn!("rejected write to property `{}`", self.name);
            return Err(PropertyError::Rejected {
                property: self.name,
            });
        }

        let value = match self.coerce {
            Some(coerce) => coerce(value),
            None => value,
        };

        if value == self.value {
            return Ok(false);
        }

        let old = std::mem::replace(&mut self.value, value);
        for observer in &mut self.observers {
            observer(&old, &self.value);
        }
        Ok(true)
    }
}

impl<T: PartialEq + Copy> Property<T> {
    pub fn value(&self) -> T {
        self.value
    }
}

/// Validator for size- and double-valued properties: finite and positive.
pub fn finite_positive(value: &f32) -> bool {
    value.is_finite() && *value > 0.0
}

/// Validator rejecting NaN and infinities.
pub fn finite(value: &f32) -> bool {
    value.is_finite()
}
