//! Error types for payload generation and rendering.
//!
//! Two families are kept apart: [`ValidationError`] means the record itself is
//! wrong and can be fixed by the caller, [`SystemError`] means the environment
//! (or a value that bypassed validation) is at fault. [`EpcError`] wraps both.

use std::path::PathBuf;
use thiserror::Error;

/// The record field a validation rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ServiceTag,
    Version,
    CharacterSet,
    IdentificationCode,
    BeneficiaryBic,
    BeneficiaryName,
    BeneficiaryIban,
    CreditAmount,
    Purpose,
    RemittanceStructured,
    RemittanceUnstructured,
    BeneficiaryToOriginatorInfo,
    /// The serialized payload as a whole.
    Payload,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ServiceTag => "service_tag",
            Field::Version => "version",
            Field::CharacterSet => "character_set",
            Field::IdentificationCode => "identification_code",
            Field::BeneficiaryBic => "beneficiary_bic",
            Field::BeneficiaryName => "beneficiary_name",
            Field::BeneficiaryIban => "beneficiary_iban",
            Field::CreditAmount => "credit_amount",
            Field::Purpose => "purpose",
            Field::RemittanceStructured => "remittance_structured",
            Field::RemittanceUnstructured => "remittance_unstructured",
            Field::BeneficiaryToOriginatorInfo => "beneficiary_to_originator_info",
            Field::Payload => "payload",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a violated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A fixed literal value was not matched.
    Literal,
    /// A mandatory value is missing or blank.
    Presence,
    Length,
    Format,
    Range,
    Exclusivity,
    /// The encoded payload exceeds the byte ceiling.
    Size,
}

/// A single violated rule. Validation stops at the first one found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("service_tag must be \"BCD\", found {found:?}")]
    ServiceTag { found: String },

    #[error("version needs to be defined")]
    MissingVersion,

    #[error("character_set is mandatory")]
    MissingCharacterSet,

    #[error("identification_code must be \"SCT\", found {found:?}")]
    IdentificationCode { found: String },

    #[error("beneficiary_bic is mandatory when using version 001")]
    BicRequiredForV1,

    #[error("beneficiary_bic must be 8 to 11 characters long, found {length}")]
    BicLength { length: usize },

    #[error("beneficiary_bic does not have a valid BIC format")]
    BicFormat,

    #[error("{field} is mandatory")]
    Missing { field: Field },

    #[error("{field} cannot be longer than {max} characters, found {length}")]
    TooLong {
        field: Field,
        max: usize,
        length: usize,
    },

    #[error("{field} cannot contain line breaks")]
    LineBreak { field: Field },

    #[error("beneficiary_iban does not have a valid IBAN format")]
    IbanFormat,

    #[error("credit_amount is mandatory")]
    AmountMissing,

    #[error("credit_amount cannot be lower than 0.01")]
    AmountTooSmall,

    #[error("credit_amount cannot be greater than 999999999.99")]
    AmountTooLarge,

    #[error("only one type of remittance information can be used per data set")]
    RemittanceConflict,

    #[error("encoded payload is {bytes} bytes, the maximum is {max}")]
    PayloadTooLarge { bytes: usize, max: usize },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::ServiceTag { .. } => Field::ServiceTag,
            ValidationError::MissingVersion => Field::Version,
            ValidationError::MissingCharacterSet => Field::CharacterSet,
            ValidationError::IdentificationCode { .. } => Field::IdentificationCode,
            ValidationError::BicRequiredForV1
            | ValidationError::BicLength { .. }
            | ValidationError::BicFormat => Field::BeneficiaryBic,
            ValidationError::Missing { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::LineBreak { field } => *field,
            ValidationError::IbanFormat => Field::BeneficiaryIban,
            ValidationError::AmountMissing
            | ValidationError::AmountTooSmall
            | ValidationError::AmountTooLarge => Field::CreditAmount,
            ValidationError::RemittanceConflict => Field::RemittanceUnstructured,
            ValidationError::PayloadTooLarge { .. } => Field::Payload,
        }
    }

    pub fn kind(&self) -> ViolationKind {
        match self {
            ValidationError::ServiceTag { .. } | ValidationError::IdentificationCode { .. } => {
                ViolationKind::Literal
            }
            ValidationError::MissingVersion
            | ValidationError::MissingCharacterSet
            | ValidationError::BicRequiredForV1
            | ValidationError::Missing { .. }
            | ValidationError::AmountMissing => ViolationKind::Presence,
            ValidationError::BicLength { .. } | ValidationError::TooLong { .. } => {
                ViolationKind::Length
            }
            ValidationError::BicFormat
            | ValidationError::IbanFormat
            | ValidationError::LineBreak { .. } => ViolationKind::Format,
            ValidationError::AmountTooSmall | ValidationError::AmountTooLarge => {
                ViolationKind::Range
            }
            ValidationError::RemittanceConflict => ViolationKind::Exclusivity,
            ValidationError::PayloadTooLarge { .. } => ViolationKind::Size,
        }
    }
}

/// Environment or programming-error class failures.
#[derive(Error, Debug)]
pub enum SystemError {
    #[error("the requested character set is not supported")]
    UnsupportedCharacterSet,

    #[error("failed to write {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("QR symbol encoding failed: {0}")]
    Symbol(String),

    #[error("SVG serialization failed: {0}")]
    Svg(String),
}

#[derive(Error, Debug)]
pub enum EpcError {
    #[error("the provided EPC QR-Code data is invalid")]
    InvalidData(#[source] ValidationError),

    #[error(transparent)]
    System(#[from] SystemError),
}

impl EpcError {
    pub fn is_validation(&self) -> bool {
        matches!(self, EpcError::InvalidData(_))
    }

    /// The violated rule, when this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            EpcError::InvalidData(err) => Some(err),
            EpcError::System(_) => None,
        }
    }
}

impl From<ValidationError> for EpcError {
    fn from(err: ValidationError) -> Self {
        EpcError::InvalidData(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_data_keeps_original_cause() {
        let err = EpcError::from(ValidationError::BicRequiredForV1);
        assert!(err.is_validation());
        assert_eq!(err.validation(), Some(&ValidationError::BicRequiredForV1));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("beneficiary_bic is mandatory when using version 001")
        );
    }

    #[test]
    fn too_long_reports_field_and_kind() {
        let err = ValidationError::TooLong {
            field: Field::BeneficiaryName,
            max: 70,
            length: 71,
        };
        assert_eq!(err.field(), Field::BeneficiaryName);
        assert_eq!(err.kind(), ViolationKind::Length);
        assert_eq!(
            err.to_string(),
            "beneficiary_name cannot be longer than 70 characters, found 71"
        );
    }

    #[test]
    fn line_break_is_a_format_violation() {
        let err = ValidationError::LineBreak {
            field: Field::RemittanceUnstructured,
        };
        assert_eq!(err.field(), Field::RemittanceUnstructured);
        assert_eq!(err.kind(), ViolationKind::Format);
        assert_eq!(
            err.to_string(),
            "remittance_unstructured cannot contain line breaks"
        );
    }

    #[test]
    fn system_errors_are_not_validation() {
        let err = EpcError::from(SystemError::UnsupportedCharacterSet);
        assert!(!err.is_validation());
        assert!(err.validation().is_none());
    }
}
