use crate::error::{EpcError, SystemError};
use crate::models::PaymentRecord;
use crate::payload::generate_payload;

use qrcodegen::{QrCode, QrCodeEcc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const SVG_DOCTYPE: &str =
    r#"svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorCorrection::Low => "low",
            ErrorCorrection::Medium => "medium",
            ErrorCorrection::Quartile => "quartile",
            ErrorCorrection::High => "high",
        };
        f.write_str(label)
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(ErrorCorrection::Low),
            "m" | "medium" => Ok(ErrorCorrection::Medium),
            "q" | "quartile" => Ok(ErrorCorrection::Quartile),
            "h" | "high" => Ok(ErrorCorrection::High),
            other => Err(format!("unknown error correction level: {other}")),
        }
    }
}

impl From<ErrorCorrection> for QrCodeEcc {
    fn from(value: ErrorCorrection) -> Self {
        match value {
            ErrorCorrection::Low => QrCodeEcc::Low,
            ErrorCorrection::Medium => QrCodeEcc::Medium,
            ErrorCorrection::Quartile => QrCodeEcc::Quartile,
            ErrorCorrection::High => QrCodeEcc::High,
        }
    }
}

/// Rendering policy: error-correction level and quiet-zone width in modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub error_correction: ErrorCorrection,
    pub border: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::Medium,
            border: 1,
        }
    }
}

/// A QR symbol that can be written out as an SVG document.
pub trait SvgSymbol {
    fn to_svg_string(&self, border: u32) -> Result<String, SystemError>;
}

/// Turns payload text into a QR symbol.
pub trait QrEncoder {
    type Symbol: SvgSymbol;

    fn encode(&self, text: &str, ecc: ErrorCorrection) -> Result<Self::Symbol, SystemError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeGenEncoder;

impl QrEncoder for QrCodeGenEncoder {
    type Symbol = QrCode;

    fn encode(&self, text: &str, ecc: ErrorCorrection) -> Result<QrCode, SystemError> {
        QrCode::encode_text(text, ecc.into()).map_err(|err| SystemError::Symbol(err.to_string()))
    }
}

impl SvgSymbol for QrCode {
    fn to_svg_string(&self, border: u32) -> Result<String, SystemError> {
        let size = u32::try_from(self.size())
            .map_err(|_| SystemError::Svg("negative symbol size".to_string()))?;
        let dimension = size + border * 2;

        let mut path = String::new();
        for y in 0..self.size() {
            for x in 0..self.size() {
                if self.get_module(x, y) {
                    if !path.is_empty() {
                        path.push(' ');
                    }
                    write!(
                        path,
                        "M{},{}h1v1h-1z",
                        i64::from(x) + i64::from(border),
                        i64::from(y) + i64::from(border)
                    )
                    .map_err(svg_error)?;
                }
            }
        }

        write_svg(dimension, &path)
    }
}

fn write_svg(dimension: u32, path: &str) -> Result<String, SystemError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
    let view_box = format!("0 0 {dimension} {dimension}");

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(svg_error)?;
    writer
        .write_event(Event::DocType(BytesText::from_escaped(SVG_DOCTYPE)))
        .map_err(svg_error)?;

    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", SVG_NAMESPACE));
    root.push_attribute(("version", "1.1"));
    root.push_attribute(("viewBox", view_box.as_str()));
    root.push_attribute(("stroke", "none"));
    writer.write_event(Event::Start(root)).map_err(svg_error)?;

    write_empty(
        &mut writer,
        "rect",
        &[("width", "100%"), ("height", "100%"), ("fill", "#FFFFFF")],
    )?;
    write_empty(&mut writer, "path", &[("d", path), ("fill", "#000000")])?;

    writer
        .write_event(Event::End(BytesEnd::new("svg")))
        .map_err(svg_error)?;

    let mut svg = String::from_utf8(writer.into_inner()).map_err(svg_error)?;
    svg.push('\n');
    Ok(svg)
}

fn write_empty<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
) -> Result<(), SystemError> {
    let mut elem = BytesStart::new(name);
    for (key, value) in attrs {
        elem.push_attribute((*key, *value));
    }
    writer.write_event(Event::Empty(elem)).map_err(svg_error)?;
    Ok(())
}

fn svg_error(err: impl fmt::Display) -> SystemError {
    SystemError::Svg(err.to_string())
}

/// Renders payment records as QR-Code SVG documents.
#[derive(Debug, Clone)]
pub struct EpcQrGenerator<E = QrCodeGenEncoder> {
    encoder: E,
    options: RenderOptions,
}

impl EpcQrGenerator<QrCodeGenEncoder> {
    pub fn new(options: RenderOptions) -> Self {
        Self::with_encoder(QrCodeGenEncoder, options)
    }
}

impl<E: QrEncoder> EpcQrGenerator<E> {
    pub fn with_encoder(encoder: E, options: RenderOptions) -> Self {
        Self { encoder, options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn to_svg(&self, record: &PaymentRecord) -> Result<String, EpcError> {
        let payload = generate_payload(record)?;
        let symbol = self
            .encoder
            .encode(&payload, self.options.error_correction)?;
        Ok(symbol.to_svg_string(self.options.border)?)
    }

    /// Writes the SVG for `record` to `path`. The parent directory must exist.
    pub fn save_as_svg(&self, record: &PaymentRecord, path: &Path) -> Result<(), EpcError> {
        let svg = self.to_svg(record)?;
        std::fs::write(path, svg).map_err(|source| SystemError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("QR-Code written to {}", path.display());
        Ok(())
    }
}

/// Renders `record` with the default options and writes it to `path`.
pub fn render_to_svg_file(record: &PaymentRecord, path: &Path) -> Result<(), EpcError> {
    EpcQrGenerator::new(RenderOptions::default()).save_as_svg(record, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::models::EpcVersion;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    fn sample() -> PaymentRecord {
        PaymentRecord {
            remittance_unstructured: Some("Thank you for your hard work.".to_string()),
            beneficiary_bic: Some("CITIGB2L".to_string()),
            ..PaymentRecord::new("WIKIMEDIA FOUNDATION INC", "GB12CITI18500818796270", dec!(1.00))
        }
    }

    struct Recorded(String);

    impl SvgSymbol for Recorded {
        fn to_svg_string(&self, border: u32) -> Result<String, SystemError> {
            Ok(format!("{}|{}", border, self.0))
        }
    }

    #[derive(Default)]
    struct RecordingEncoder {
        calls: RefCell<Vec<ErrorCorrection>>,
    }

    impl QrEncoder for &RecordingEncoder {
        type Symbol = Recorded;

        fn encode(&self, text: &str, ecc: ErrorCorrection) -> Result<Recorded, SystemError> {
            self.calls.borrow_mut().push(ecc);
            Ok(Recorded(text.to_string()))
        }
    }

    #[test]
    fn default_policy_is_medium_with_one_module_border() {
        let options = RenderOptions::default();
        assert_eq!(options.error_correction, ErrorCorrection::Medium);
        assert_eq!(options.border, 1);
    }

    #[test]
    fn generator_hands_payload_and_policy_to_encoder() {
        let encoder = RecordingEncoder::default();
        let generator = EpcQrGenerator::with_encoder(
            &encoder,
            RenderOptions {
                error_correction: ErrorCorrection::High,
                border: 4,
            },
        );
        let svg = generator.to_svg(&sample()).unwrap();
        assert!(svg.starts_with("4|BCD\n002\n1\nSCT\nCITIGB2L\n"));
        assert_eq!(encoder.calls.borrow().as_slice(), &[ErrorCorrection::High]);
    }

    #[test]
    fn svg_document_shape() {
        let svg = EpcQrGenerator::new(RenderOptions::default())
            .to_svg(&sample())
            .unwrap();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("<!DOCTYPE svg PUBLIC"));
        assert!(svg.contains("xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>"));
        assert!(svg.contains("fill=\"#000000\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn view_box_includes_border() {
        let symbol = QrCodeGenEncoder
            .encode("BCD\n002\n1\nSCT\n", ErrorCorrection::Medium)
            .unwrap();
        let dimension = symbol.size() + 2 * 3;
        let svg = symbol.to_svg_string(3).unwrap();
        assert!(svg.contains(&format!("viewBox=\"0 0 {dimension} {dimension}\"")));
        assert!(svg.contains("M3,3h1v1h-1z"));
    }

    #[test]
    fn invalid_record_is_not_rendered() {
        let encoder = RecordingEncoder::default();
        let generator = EpcQrGenerator::with_encoder(&encoder, RenderOptions::default());
        let record = PaymentRecord {
            version: Some(EpcVersion::V1),
            beneficiary_bic: None,
            ..sample()
        };
        let err = generator.to_svg(&record).unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::BicRequiredForV1));
        assert!(encoder.calls.borrow().is_empty());
    }

    #[test]
    fn error_correction_parses_names_and_letters() {
        assert_eq!("Q".parse::<ErrorCorrection>(), Ok(ErrorCorrection::Quartile));
        assert_eq!("high".parse::<ErrorCorrection>(), Ok(ErrorCorrection::High));
        assert!("max".parse::<ErrorCorrection>().is_err());
    }
}
