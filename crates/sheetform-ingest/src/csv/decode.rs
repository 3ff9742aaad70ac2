//! Byte-to-text decoding for CSV uploads.

use encoding_rs::{Encoding, GBK, UTF_8};

use crate::options::CsvEncoding;

const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Decoded CSV text and the encoding that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// Decodes CSV bytes according to the chosen encoding.
///
/// A leading byte order mark is honoured and removed.
pub fn decode_csv_bytes(bytes: &[u8], encoding: CsvEncoding) -> DecodedText {
    match encoding {
        CsvEncoding::Utf8 => decode_with(bytes, UTF_8),
        CsvEncoding::Gbk => decode_with(bytes, GBK),
        CsvEncoding::Auto => {
            let utf8 = decode_with(bytes, UTF_8);
            if utf8.text.contains(REPLACEMENT_CHARACTER) {
                tracing::warn!(
                    "UTF-8 decode produced replacement characters, decoding again as GBK"
                );
                decode_with(bytes, GBK)
            } else {
                utf8
            }
        }
    }
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedText {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = used.name(), "malformed byte sequences replaced");
    }
    DecodedText {
        text: text.into_owned(),
        encoding: used,
    }
}
