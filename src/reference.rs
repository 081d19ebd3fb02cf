use rust_decimal::Decimal;

pub const SERVICE_TAG: &str = "BCD";
pub const IDENTIFICATION_CODE: &str = "SCT";
pub const CURRENCY: &str = "EUR";

/// Total payload ceiling in bytes, measured after character-set encoding.
pub const MAX_PAYLOAD_BYTES: usize = 331;

pub const BIC_MIN_LENGTH: usize = 8;
pub const BIC_MAX_LENGTH: usize = 11;
pub const NAME_MAX_LENGTH: usize = 70;
pub const IBAN_MAX_LENGTH: usize = 34;
pub const PURPOSE_MAX_LENGTH: usize = 4;
pub const REMITTANCE_STRUCTURED_MAX_LENGTH: usize = 35;
pub const REMITTANCE_UNSTRUCTURED_MAX_LENGTH: usize = 140;
pub const ORIGINATOR_INFO_MAX_LENGTH: usize = 70;

/// Bounds on the BBAN part of an IBAN (everything after country + check digits).
pub const IBAN_BBAN_MIN_LENGTH: usize = 11;
pub const IBAN_BBAN_MAX_LENGTH: usize = 30;

pub fn min_credit_amount() -> Decimal {
    Decimal::new(1, 2)
}

pub fn max_credit_amount() -> Decimal {
    Decimal::new(99_999_999_999, 2)
}
