//! Shared types for the sorter PoC

/// One of the four measurement fields of a classification request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Width,
    Height,
    Length,
    Mass,
}

impl Field {
    /// Validation order: width, height, length, mass
    pub const ORDERED: [Field; 4] = [Field::Width, Field::Height, Field::Length, Field::Mass];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Width => "width",
            Field::Height => "height",
            Field::Length => "length",
            Field::Mass => "mass",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch category for a classified package
///
/// The string labels are part of the contract with downstream consumers
/// that match on them; casing and spelling are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Standard,
    Special,
    Rejected,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Standard => "STANDARD",
            Classification::Special => "SPECIAL",
            Classification::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for a classification request
///
/// Two kinds only: the supplied value was not a (real) number, or it was
/// a number but not strictly positive. Both carry the offending field.
/// The core raises on the first invalid field and performs no partial
/// computation; whether a failure skips a record or aborts a batch is the
/// caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementError {
    /// The value is not a finite number (TypeKind)
    NotANumber(Field),
    /// The value is zero or negative (ValueKind)
    NotPositive(Field),
}

impl MeasurementError {
    /// The field that failed validation
    pub fn field(&self) -> Field {
        match self {
            MeasurementError::NotANumber(field) | MeasurementError::NotPositive(field) => *field,
        }
    }

    /// Stable kind tag for structured logging
    pub fn kind_str(&self) -> &'static str {
        match self {
            MeasurementError::NotANumber(_) => "not_a_number",
            MeasurementError::NotPositive(_) => "not_positive",
        }
    }
}

impl std::fmt::Display for MeasurementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementError::NotANumber(field) => write!(f, "{} must be a number", field),
            MeasurementError::NotPositive(field) => write!(f, "{} must be positive", field),
        }
    }
}

impl std::error::Error for MeasurementError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_labels() {
        assert_eq!(Classification::Standard.as_str(), "STANDARD");
        assert_eq!(Classification::Special.as_str(), "SPECIAL");
        assert_eq!(Classification::Rejected.as_str(), "REJECTED");
    }

    #[test]
    fn test_field_order() {
        let names: Vec<&str> = Field::ORDERED.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, ["width", "height", "length", "mass"]);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MeasurementError::NotANumber(Field::Width).to_string(),
            "width must be a number"
        );
        assert_eq!(
            MeasurementError::NotPositive(Field::Mass).to_string(),
            "mass must be positive"
        );
    }

    #[test]
    fn test_error_field_and_kind() {
        let err = MeasurementError::NotPositive(Field::Height);
        assert_eq!(err.field(), Field::Height);
        assert_eq!(err.kind_str(), "not_positive");
        assert_eq!(MeasurementError::NotANumber(Field::Mass).kind_str(), "not_a_number");
    }
}
