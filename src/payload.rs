use crate::charset;
use crate::error::{EpcError, SystemError, ValidationError};
use crate::models::PaymentRecord;
use crate::reference::{CURRENCY, MAX_PAYLOAD_BYTES};
use crate::util::{format_amount, is_blank};
use crate::validation::validate;

const LF: char = '\n';

/// Builds the EPC payload for `record`.
///
/// The record is validated first; on success the fields are written in
/// their fixed order, one per line, then normalized to the record's
/// character set. The encoded payload must fit in 331 bytes.
pub fn serialize(record: &PaymentRecord) -> Result<String, EpcError> {
    validate(record)?;

    let charset = record
        .character_set
        .ok_or(SystemError::UnsupportedCharacterSet)?;
    let version = record.version.ok_or(ValidationError::MissingVersion)?;

    let mut payload = String::with_capacity(MAX_PAYLOAD_BYTES);
    push_line(&mut payload, &record.service_tag);
    push_line(&mut payload, version.code());
    push_line(&mut payload, &charset.code().to_string());
    push_line(&mut payload, &record.identification_code);
    push_optional_line(&mut payload, record.beneficiary_bic.as_deref());
    push_line(&mut payload, &record.beneficiary_name);
    push_line(&mut payload, &record.beneficiary_iban);
    push_line(
        &mut payload,
        &format!("{CURRENCY}{}", format_amount(record.credit_amount)),
    );
    push_optional_line(&mut payload, record.purpose.as_deref());
    push_optional_line(&mut payload, record.remittance_structured.as_deref());
    push_optional_line(&mut payload, record.remittance_unstructured.as_deref());
    push_optional_line(
        &mut payload,
        record.beneficiary_to_originator_info.as_deref(),
    );

    let normalized = charset::normalize(&payload, charset);
    if normalized.byte_len > MAX_PAYLOAD_BYTES {
        return Err(ValidationError::PayloadTooLarge {
            bytes: normalized.byte_len,
            max: MAX_PAYLOAD_BYTES,
        }
        .into());
    }

    log::debug!(
        "generated {} payload ({} bytes, {})",
        version,
        normalized.byte_len,
        charset
    );
    Ok(normalized.text)
}

/// Same as [`serialize`].
pub fn generate_payload(record: &PaymentRecord) -> Result<String, EpcError> {
    serialize(record)
}

fn push_line(payload: &mut String, value: &str) {
    payload.push_str(value);
    payload.push(LF);
}

fn push_optional_line(payload: &mut String, value: Option<&str>) {
    match value {
        Some(value) if !is_blank(value) => push_line(payload, value),
        _ => payload.push(LF),
    }
}
