//! EPC QR-Code generation for SEPA credit transfers.
//!
//! A [`PaymentRecord`] is validated against the European Payments Council
//! rules, serialized into the twelve-line payload, normalized to its declared
//! character set and, optionally, rendered as an SVG QR-Code.
//!
//! ```no_run
//! use epc_qr::{generate_payload, render_to_svg_file, PaymentRecord};
//! use rust_decimal::Decimal;
//! use std::path::Path;
//!
//! let record = PaymentRecord {
//!     beneficiary_bic: Some("CITIGB2L".to_string()),
//!     remittance_unstructured: Some("Thank you for your hard work.".to_string()),
//!     ..PaymentRecord::new("WIKIMEDIA FOUNDATION INC", "GB12CITI18500818796270", Decimal::ONE)
//! };
//! let payload = generate_payload(&record)?;
//! assert!(payload.starts_with("BCD\n002\n"));
//! render_to_svg_file(&record, Path::new("donate.svg"))?;
//! # Ok::<(), epc_qr::EpcError>(())
//! ```

pub mod batch;
pub mod charset;
pub mod error;
pub mod logging;
pub mod models;
pub mod payload;
pub mod reference;
pub mod render;
pub mod util;
pub mod validation;

pub use error::{EpcError, Field, SystemError, ValidationError, ViolationKind};
pub use models::{CharacterSet, EpcVersion, PaymentRecord};
pub use payload::{generate_payload, serialize};
pub use render::{
    render_to_svg_file, EpcQrGenerator, ErrorCorrection, QrCodeGenEncoder, QrEncoder,
    RenderOptions, SvgSymbol,
};
pub use validation::{is_valid_bic, is_valid_iban, validate};
