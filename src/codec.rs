//! Share serialization
//!
//! Two encodings are provided:
//!
//! - **Binary** (`encode_share` / `decode_share`): `index (1 byte) || value (33 bytes)`,
//!   the fixed-width form used for storage and transport.
//! - **Words** (`encode_share_words` / `decode_share_words`): the binary share
//!   together with its threshold and a CRC32, spelled as BIP39 words behind a
//!   version word. Meant for guardians who keep their share on paper.
//!
//! # Examples
//!
//! ```rust
//! use guardian_recovery::codec::{decode_share_words, encode_share_words};
//! use guardian_recovery::domain::{Share, ShareIndex, Threshold};
//! use guardian_recovery::field::FieldElement;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let share = Share::new(ShareIndex::new(2)?, FieldElement::from(0xBEEFu64));
//! let threshold = Threshold::new(3)?;
//!
//! let words = encode_share_words(&share, threshold);
//! assert!(words.as_str().starts_with("guardian "));
//!
//! let (parsed_threshold, parsed) = decode_share_words(words.as_str())?;
//! assert_eq!(parsed_threshold, threshold);
//! assert_eq!(parsed, share);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use bip39::Language;
use crc::{CRC_32_ISO_HDLC, Crc};
use zeroize::Zeroizing;

use crate::domain::{Share, ShareIndex, Threshold};
use crate::error::{RecoveryError, Result};
use crate::field::{FIELD_BYTES, FieldElement};

/// Width of a binary-encoded share
pub const SHARE_BYTES: usize = 1 + FIELD_BYTES;

/// First word of every word-encoded share
pub const VERSION_WORD: &str = "guardian";

/// Layout revision carried inside the word payload
const FORMAT_VERSION: u8 = 1;

/// version || threshold || binary share || crc32
const WORD_PAYLOAD_BYTES: usize = 1 + 1 + SHARE_BYTES + 4;

/// 11 bits per BIP39 word, rounded up
const WORD_COUNT: usize = (WORD_PAYLOAD_BYTES * 8).div_ceil(11);

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

static WORD_TO_INDEX: LazyLock<HashMap<&'static str, u16>> = LazyLock::new(|| {
    Language::English
        .word_list()
        .iter()
        .zip(0u16..)
        .map(|(&word, idx)| (word, idx))
        .collect()
});

/// Encodes a share as `SHARE_BYTES` bytes
#[must_use]
pub fn encode_share(share: &Share) -> Zeroizing<[u8; SHARE_BYTES]> {
    let mut out = Zeroizing::new([0u8; SHARE_BYTES]);
    out[0] = *share.index();
    out[1..].copy_from_slice(&share.value().to_be_bytes());
    out
}

/// Decodes a share from its binary form
///
/// # Errors
/// Returns `MalformedShare` on a wrong length, index 0, or a value outside
/// the field
pub fn decode_share(bytes: &[u8]) -> Result<Share> {
    if bytes.len() != SHARE_BYTES {
        return Err(RecoveryError::MalformedShare(format!(
            "expected {SHARE_BYTES} bytes, got {}",
            bytes.len()
        )));
    }
    let index = ShareIndex::new(bytes[0])?;
    let value = FieldElement::from_canonical_bytes(&bytes[1..])?;
    Ok(Share::new(index, value))
}

/// A word-encoded share, wiped from memory on drop
#[derive(Debug, Clone, PartialEq)]
pub struct ShareMnemonic(Zeroizing<String>);

impl ShareMnemonic {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShareMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spells a share and its threshold as BIP39 words
#[must_use]
pub fn encode_share_words(share: &Share, threshold: Threshold) -> ShareMnemonic {
    let mut payload = Zeroizing::new(Vec::with_capacity(WORD_PAYLOAD_BYTES));
    payload.push(FORMAT_VERSION);
    payload.push(*threshold);
    payload.extend_from_slice(&*encode_share(share));
    let checksum = CRC32.checksum(&payload);
    payload.extend_from_slice(&checksum.to_be_bytes());

    let wordlist = Language::English.word_list();
    let mut text = Zeroizing::new(String::from(VERSION_WORD));
    for index in pack_words(&payload) {
        text.push(' ');
        text.push_str(wordlist[usize::from(index)]);
    }
    ShareMnemonic(text)
}

/// Parses a word-encoded share back into its threshold and share
///
/// Words are matched case-insensitively; any run of whitespace separates them.
///
/// # Errors
/// Returns `MalformedShare` for a wrong version word, word count, unknown
/// word or layout, and `ChecksumMismatch` if the CRC does not match
pub fn decode_share_words(text: &str) -> Result<(Threshold, Share)> {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();

    let Some((version, data)) = words.split_first() else {
        return Err(RecoveryError::MalformedShare("empty share".into()));
    };
    if version != VERSION_WORD {
        return Err(RecoveryError::MalformedShare(format!(
            "expected version word '{VERSION_WORD}', got '{version}'"
        )));
    }
    if data.len() != WORD_COUNT {
        return Err(RecoveryError::MalformedShare(format!(
            "expected {WORD_COUNT} data words, got {}",
            data.len()
        )));
    }

    let indices = data
        .iter()
        .map(|word| {
            WORD_TO_INDEX.get(word.as_str()).copied().ok_or_else(|| {
                RecoveryError::MalformedShare(format!("'{word}' is not a BIP39 word"))
            })
        })
        .collect::<Result<Vec<u16>>>()?;
    let payload = unpack_words(&indices, WORD_PAYLOAD_BYTES)?;

    let (body, tail) = payload.split_at(WORD_PAYLOAD_BYTES - 4);
    let expected = CRC32.checksum(body);
    let actual = u32::from_be_bytes([tail[0], tail[1], tail[2], tail[3]]);
    if expected != actual {
        return Err(RecoveryError::ChecksumMismatch { expected, actual });
    }

    if body[0] != FORMAT_VERSION {
        return Err(RecoveryError::MalformedShare(format!(
            "unsupported format version {}",
            body[0]
        )));
    }
    let threshold = Threshold::new(usize::from(body[1]))
        .map_err(|_| RecoveryError::MalformedShare("threshold 0".into()))?;
    let share = decode_share(&body[2..])?;
    Ok((threshold, share))
}

/// Splits bytes into 11-bit word indices, left-padding with zero bits
fn pack_words(bytes: &[u8]) -> Vec<u16> {
    let bit_count = bytes.len() * 8;
    let padding = (11 - bit_count % 11) % 11;
    let mut out = Vec::with_capacity((bit_count + padding) / 11);

    let mut acc: u32 = 0;
    let mut pending = padding;
    for &byte in bytes {
        acc = (acc << 8) | u32::from(byte);
        pending += 8;
        while pending >= 11 {
            pending -= 11;
            // masked to 11 bits
            #[allow(clippy::cast_possible_truncation)]
            out.push(((acc >> pending) & 0x7FF) as u16);
        }
    }
    out
}

/// Inverse of [`pack_words`] for a known byte length
fn unpack_words(indices: &[u16], byte_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let padding = indices.len() * 11 - byte_len * 8;
    let mut out = Zeroizing::new(Vec::with_capacity(byte_len));

    let mut acc: u32 = 0;
    let mut pending: usize = 0;
    let mut skip = padding;
    for &index in indices {
        acc = (acc << 11) | u32::from(index & 0x7FF);
        pending += 11;
        if skip > 0 {
            let take = skip.min(pending);
            if (acc >> (pending - take)) & ((1 << take) - 1) != 0 {
                return Err(RecoveryError::MalformedShare("non-zero padding bits".into()));
            }
            pending -= take;
            skip -= take;
        }
        while pending >= 8 {
            pending -= 8;
            // masked to 8 bits
            #[allow(clippy::cast_possible_truncation)]
            out.push(((acc >> pending) & 0xFF) as u8);
        }
        acc &= (1 << pending) - 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_share() -> Share {
        Share::new(
            ShareIndex::new(7).unwrap(),
            FieldElement::from(0x0123_4567_89AB_CDEFu64),
        )
    }

    #[test]
    fn test_binary_layout() {
        let bytes = encode_share(&sample_share());
        assert_eq!(bytes.len(), SHARE_BYTES);
        assert_eq!(bytes[0], 7);
        assert_eq!(&bytes[SHARE_BYTES - 8..], &0x0123_4567_89AB_CDEFu64.to_be_bytes());
        assert!(bytes[1..SHARE_BYTES - 8].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_binary_round_trip() {
        let share = sample_share();
        assert_eq!(decode_share(&*encode_share(&share)).unwrap(), share);
    }

    #[test]
    fn test_binary_rejects_wrong_length() {
        let bytes = encode_share(&sample_share());
        assert!(matches!(
            decode_share(&bytes[..SHARE_BYTES - 1]),
            Err(RecoveryError::MalformedShare(_))
        ));
    }

    #[test]
    fn test_binary_rejects_index_zero() {
        let mut bytes = *encode_share(&sample_share());
        bytes[0] = 0;
        assert!(matches!(
            decode_share(&bytes),
            Err(RecoveryError::MalformedShare(_))
        ));
    }

    #[test]
    fn test_binary_rejects_value_above_modulus() {
        let mut bytes = [0xFFu8; SHARE_BYTES];
        bytes[0] = 1;
        bytes[1] = 0x01;
        assert!(matches!(
            decode_share(&bytes),
            Err(RecoveryError::MalformedShare(_))
        ));
    }

    #[test]
    fn test_word_count_is_fixed() {
        let words = encode_share_words(&sample_share(), Threshold::new(2).unwrap());
        assert_eq!(words.as_str().split_whitespace().count(), 1 + WORD_COUNT);
    }

    #[test]
    fn test_pack_unpack_preserves_bytes() {
        let data: Vec<u8> = (0..=255u8).step_by(7).collect();
        let packed = pack_words(&data);
        let unpacked = unpack_words(&packed, data.len()).unwrap();
        assert_eq!(&*unpacked, &data);
    }

    #[test]
    fn test_words_are_case_insensitive() {
        let share = sample_share();
        let words = encode_share_words(&share, Threshold::new(4).unwrap());
        let shouted = words.as_str().to_uppercase();
        let (threshold, parsed) = decode_share_words(&shouted).unwrap();
        assert_eq!(*threshold, 4);
        assert_eq!(parsed, share);
    }

    #[test]
    fn test_invalid_version_word() {
        let result = decode_share_words("mnemonic abandon abandon");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("expected version word")
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(matches!(
            decode_share_words("   "),
            Err(RecoveryError::MalformedShare(_))
        ));
    }

    #[test]
    fn test_corruption_is_detected() {
        let words = encode_share_words(&sample_share(), Threshold::new(3).unwrap());
        let mut parts: Vec<&str> = words.as_str().split_whitespace().collect();
        let last = parts.len() - 1;
        parts[last] = if parts[last] == "zoo" { "abandon" } else { "zoo" };

        let result = decode_share_words(&parts.join(" "));
        assert!(matches!(
            result,
            Err(RecoveryError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_word() {
        let words = encode_share_words(&sample_share(), Threshold::new(3).unwrap());
        let mut parts: Vec<&str> = words.as_str().split_whitespace().collect();
        parts[5] = "notaword";
        assert!(
            decode_share_words(&parts.join(" "))
                .unwrap_err()
                .to_string()
                .contains("not a BIP39 word")
        );
    }
}
