//! Character-set normalization of a payload.
//!
//! Text is encoded into the declared character set and decoded back, so the
//! result only holds characters that set can represent. Anything else becomes
//! `?`, the same substitution a lossy single-byte encoder performs.

use crate::models::CharacterSet;
use encoding_rs::{EncoderResult, Encoding};

const REPLACEMENT: u8 = b'?';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Text after the encode/decode round trip.
    pub text: String,
    /// Length of the encoded form in bytes.
    pub byte_len: usize,
    /// Number of characters replaced because the set cannot represent them.
    pub substitutions: usize,
}

pub fn normalize(text: &str, charset: CharacterSet) -> Normalized {
    let (bytes, substitutions) = encode(text, charset);
    let byte_len = bytes.len();
    let text = decode(&bytes, charset);
    if substitutions > 0 {
        log::warn!(
            "{} character(s) not representable in {} were replaced",
            substitutions,
            charset
        );
    }
    Normalized {
        text,
        byte_len,
        substitutions,
    }
}

enum Codec {
    Utf8,
    Latin1,
    SingleByte(&'static Encoding),
}

// encoding_rs treats the ISO-8859-1 label as windows-1252, so Latin-1 is
// mapped directly instead.
fn codec(charset: CharacterSet) -> Codec {
    match charset {
        CharacterSet::Utf8 => Codec::Utf8,
        CharacterSet::Iso8859_1 => Codec::Latin1,
        CharacterSet::Iso8859_2 => Codec::SingleByte(encoding_rs::ISO_8859_2),
        CharacterSet::Iso8859_4 => Codec::SingleByte(encoding_rs::ISO_8859_4),
        CharacterSet::Iso8859_5 => Codec::SingleByte(encoding_rs::ISO_8859_5),
        CharacterSet::Iso8859_7 => Codec::SingleByte(encoding_rs::ISO_8859_7),
        CharacterSet::Iso8859_10 => Codec::SingleByte(encoding_rs::ISO_8859_10),
        CharacterSet::Iso8859_15 => Codec::SingleByte(encoding_rs::ISO_8859_15),
    }
}

/// Encodes `text` into `charset`, replacing unrepresentable characters.
/// Returns the bytes and the number of replacements.
pub fn encode(text: &str, charset: CharacterSet) -> (Vec<u8>, usize) {
    match codec(charset) {
        Codec::Utf8 => (text.as_bytes().to_vec(), 0),
        Codec::Latin1 => encode_latin1(text),
        Codec::SingleByte(encoding) => encode_single_byte(encoding, text),
    }
}

pub fn decode(bytes: &[u8], charset: CharacterSet) -> String {
    match codec(charset) {
        Codec::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Codec::Latin1 => bytes.iter().map(|&byte| char::from(byte)).collect(),
        Codec::SingleByte(encoding) => encoding
            .decode_without_bom_handling(bytes)
            .0
            .into_owned(),
    }
}

fn encode_latin1(text: &str) -> (Vec<u8>, usize) {
    let mut substitutions = 0;
    let bytes = text
        .chars()
        .map(|ch| match u8::try_from(u32::from(ch)) {
            Ok(byte) => byte,
            Err(_) => {
                substitutions += 1;
                REPLACEMENT
            }
        })
        .collect();
    (bytes, substitutions)
}

fn encode_single_byte(encoding: &'static Encoding, text: &str) -> (Vec<u8>, usize) {
    let mut encoder = encoding.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut buffer = [0u8; 512];
    let mut remaining = text;
    let mut substitutions = 0;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(remaining, &mut buffer, true);
        out.extend_from_slice(&buffer[..written]);
        remaining = &remaining[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => {
                out.push(REPLACEMENT);
                substitutions += 1;
            }
        }
    }

    (out, substitutions)
}
