use crate::error::{Field, ValidationError};
use crate::models::{EpcVersion, PaymentRecord};
use crate::reference::{
    max_credit_amount, min_credit_amount, BIC_MAX_LENGTH, BIC_MIN_LENGTH, IBAN_BBAN_MAX_LENGTH,
    IBAN_BBAN_MIN_LENGTH, IBAN_MAX_LENGTH, IDENTIFICATION_CODE, NAME_MAX_LENGTH,
    ORIGINATOR_INFO_MAX_LENGTH, PURPOSE_MAX_LENGTH, REMITTANCE_STRUCTURED_MAX_LENGTH,
    REMITTANCE_UNSTRUCTURED_MAX_LENGTH, SERVICE_TAG,
};
use crate::util::{char_len, is_blank, is_blank_opt};

/// Checks a record against the EPC rules in their fixed order and reports
/// the first violation only.
pub fn validate(record: &PaymentRecord) -> Result<(), ValidationError> {
    if record.service_tag != SERVICE_TAG {
        return Err(ValidationError::ServiceTag {
            found: record.service_tag.clone(),
        });
    }

    let version = record.version.ok_or(ValidationError::MissingVersion)?;

    if record.character_set.is_none() {
        return Err(ValidationError::MissingCharacterSet);
    }

    if record.identification_code != IDENTIFICATION_CODE {
        return Err(ValidationError::IdentificationCode {
            found: record.identification_code.clone(),
        });
    }

    validate_bic(record.beneficiary_bic.as_deref(), version)?;

    if is_blank(&record.beneficiary_name) {
        return Err(ValidationError::Missing {
            field: Field::BeneficiaryName,
        });
    }
    check_length(Field::BeneficiaryName, &record.beneficiary_name, NAME_MAX_LENGTH)?;

    if is_blank(&record.beneficiary_iban) {
        return Err(ValidationError::Missing {
            field: Field::BeneficiaryIban,
        });
    }
    check_length(Field::BeneficiaryIban, &record.beneficiary_iban, IBAN_MAX_LENGTH)?;
    if !is_valid_iban(&record.beneficiary_iban) {
        return Err(ValidationError::IbanFormat);
    }

    if record.credit_amount.is_zero() {
        return Err(ValidationError::AmountMissing);
    }
    if record.credit_amount < min_credit_amount() {
        return Err(ValidationError::AmountTooSmall);
    }
    if record.credit_amount > max_credit_amount() {
        return Err(ValidationError::AmountTooLarge);
    }

    check_optional_length(Field::Purpose, record.purpose.as_deref(), PURPOSE_MAX_LENGTH)?;

    if !is_blank_opt(record.remittance_structured.as_deref())
        && !is_blank_opt(record.remittance_unstructured.as_deref())
    {
        return Err(ValidationError::RemittanceConflict);
    }
    check_optional_length(
        Field::RemittanceStructured,
        record.remittance_structured.as_deref(),
        REMITTANCE_STRUCTURED_MAX_LENGTH,
    )?;
    check_optional_length(
        Field::RemittanceUnstructured,
        record.remittance_unstructured.as_deref(),
        REMITTANCE_UNSTRUCTURED_MAX_LENGTH,
    )?;

    check_optional_length(
        Field::BeneficiaryToOriginatorInfo,
        record.beneficiary_to_originator_info.as_deref(),
        ORIGINATOR_INFO_MAX_LENGTH,
    )?;

    Ok(())
}

fn validate_bic(bic: Option<&str>, version: EpcVersion) -> Result<(), ValidationError> {
    let bic = match bic {
        Some(value) if !is_blank(value) => value,
        _ => {
            return match version {
                EpcVersion::V1 => Err(ValidationError::BicRequiredForV1),
                EpcVersion::V2 => Ok(()),
            };
        }
    };

    let length = char_len(bic);
    if !(BIC_MIN_LENGTH..=BIC_MAX_LENGTH).contains(&length) {
        return Err(ValidationError::BicLength { length });
    }
    if !is_valid_bic(bic) {
        return Err(ValidationError::BicFormat);
    }
    Ok(())
}

/// Length ceiling, then the single-line constraint: every field owns exactly
/// one payload line.
fn check_length(field: Field, value: &str, max: usize) -> Result<(), ValidationError> {
    let length = char_len(value);
    if length > max {
        return Err(ValidationError::TooLong { field, max, length });
    }
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::LineBreak { field });
    }
    Ok(())
}

fn check_optional_length(
    field: Field,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => check_length(field, value, max),
        None => Ok(()),
    }
}

/// Structural BIC check: institution (4 letters), country (2 letters),
/// location (2 alphanumerics), optional branch (3 alphanumerics).
/// Letters are accepted in either case. Does not check that the bank exists.
pub fn is_valid_bic(bic: &str) -> bool {
    let bytes = bic.as_bytes();
    if !(bytes.len() == BIC_MIN_LENGTH || bytes.len() == BIC_MAX_LENGTH) {
        return false;
    }
    bytes[..6].iter().all(u8::is_ascii_alphabetic)
        && bytes[6..].iter().all(u8::is_ascii_alphanumeric)
}

/// Structural IBAN check: country (2 letters), check digits (2 digits),
/// BBAN (11 to 30 alphanumerics). No spaces; check digits are not verified.
///
/// The BBAN floor of 11 is the shortest registered BBAN (Norway, 15
/// characters in total). A 16-character total minimum would reject Norwegian
/// accounts and a 16-character BBAN minimum would also reject Belgian ones.
pub fn is_valid_iban(iban: &str) -> bool {
    let bytes = iban.as_bytes();
    if bytes.len() < 4 {
        return false;
    }
    let bban = &bytes[4..];
    bytes[..2].iter().all(u8::is_ascii_alphabetic)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && (IBAN_BBAN_MIN_LENGTH..=IBAN_BBAN_MAX_LENGTH).contains(&bban.len())
        && bban.iter().all(u8::is_ascii_alphanumeric)
}
