use crate::reference::{IDENTIFICATION_CODE, SERVICE_TAG};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EPC QR-Code format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EpcVersion {
    V1,
    V2,
}

impl EpcVersion {
    pub fn code(&self) -> &'static str {
        match self {
            EpcVersion::V1 => "001",
            EpcVersion::V2 => "002",
        }
    }
}

impl fmt::Display for EpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EpcVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "001" | "1" | "V1" => Ok(EpcVersion::V1),
            "002" | "2" | "V2" => Ok(EpcVersion::V2),
            other => Err(format!("unknown EPC version: {other}")),
        }
    }
}

impl TryFrom<String> for EpcVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EpcVersion> for String {
    fn from(value: EpcVersion) -> Self {
        value.code().to_string()
    }
}

/// Character sets allowed in an EPC payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CharacterSet {
    Iso8859_1,
    Iso8859_2,
    Iso8859_4,
    Iso8859_5,
    Iso8859_7,
    Iso8859_10,
    Iso8859_15,
    Utf8,
}

impl CharacterSet {
    pub const ALL: [CharacterSet; 8] = [
        CharacterSet::Iso8859_1,
        CharacterSet::Iso8859_2,
        CharacterSet::Iso8859_4,
        CharacterSet::Iso8859_5,
        CharacterSet::Iso8859_7,
        CharacterSet::Iso8859_10,
        CharacterSet::Iso8859_15,
        CharacterSet::Utf8,
    ];

    /// Integer code written on the third payload line.
    ///
    /// ISO-8859-1 is `1`; the other sets are numbered in [`CharacterSet::ALL`]
    /// order. This is not the EPC069-12 table, which gives UTF-8 `1`,
    /// ISO-8859-1 `2` and ISO-8859-2 through ISO-8859-15 `3` to `8`. A
    /// scanner that follows that table reads these codes as a different
    /// character set.
    pub fn code(&self) -> u8 {
        match self {
            CharacterSet::Iso8859_1 => 1,
            CharacterSet::Iso8859_2 => 2,
            CharacterSet::Iso8859_4 => 3,
            CharacterSet::Iso8859_5 => 4,
            CharacterSet::Iso8859_7 => 5,
            CharacterSet::Iso8859_10 => 6,
            CharacterSet::Iso8859_15 => 7,
            CharacterSet::Utf8 => 8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CharacterSet::Iso8859_1 => "ISO-8859-1",
            CharacterSet::Iso8859_2 => "ISO-8859-2",
            CharacterSet::Iso8859_4 => "ISO-8859-4",
            CharacterSet::Iso8859_5 => "ISO-8859-5",
            CharacterSet::Iso8859_7 => "ISO-8859-7",
            CharacterSet::Iso8859_10 => "ISO-8859-10",
            CharacterSet::Iso8859_15 => "ISO-8859-15",
            CharacterSet::Utf8 => "UTF-8",
        }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CharacterSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('_', "-");
        CharacterSet::ALL
            .iter()
            .copied()
            .find(|charset| {
                charset.label() == wanted
                    || charset.label().replace('-', "") == wanted
                    || charset.code().to_string() == wanted
            })
            .ok_or_else(|| format!("unsupported character set: {}", s.trim()))
    }
}

impl TryFrom<String> for CharacterSet {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CharacterSet> for String {
    fn from(value: CharacterSet) -> Self {
        value.label().to_string()
    }
}

fn default_service_tag() -> String {
    SERVICE_TAG.to_string()
}

fn default_identification_code() -> String {
    IDENTIFICATION_CODE.to_string()
}

fn default_version() -> Option<EpcVersion> {
    Some(EpcVersion::V2)
}

fn default_character_set() -> Option<CharacterSet> {
    Some(CharacterSet::Iso8859_1)
}

/// Payment data for a single EPC QR-Code.
///
/// The record is read-only for the engine: nothing is checked until a
/// payload is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default = "default_service_tag")]
    pub service_tag: String,
    #[serde(default = "default_version")]
    pub version: Option<EpcVersion>,
    #[serde(default = "default_character_set")]
    pub character_set: Option<CharacterSet>,
    #[serde(default = "default_identification_code")]
    pub identification_code: String,
    #[serde(default)]
    pub beneficiary_bic: Option<String>,
    pub beneficiary_name: String,
    pub beneficiary_iban: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub credit_amount: Decimal,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub remittance_structured: Option<String>,
    #[serde(default)]
    pub remittance_unstructured: Option<String>,
    #[serde(default)]
    pub beneficiary_to_originator_info: Option<String>,
}

impl Default for PaymentRecord {
    fn default() -> Self {
        Self {
            service_tag: default_service_tag(),
            version: default_version(),
            character_set: default_character_set(),
            identification_code: default_identification_code(),
            beneficiary_bic: None,
            beneficiary_name: String::new(),
            beneficiary_iban: String::new(),
            credit_amount: Decimal::ZERO,
            purpose: None,
            remittance_structured: None,
            remittance_unstructured: None,
            beneficiary_to_originator_info: None,
        }
    }
}

impl PaymentRecord {
    pub fn new(name: impl Into<String>, iban: impl Into<String>, amount: Decimal) -> Self {
        Self {
            beneficiary_name: name.into(),
            beneficiary_iban: iban.into(),
            credit_amount: amount,
            ..Self::default()
        }
    }
}
