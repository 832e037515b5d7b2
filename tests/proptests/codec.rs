//! Property tests for share encodings

use guardian_recovery::RecoveryError;
use guardian_recovery::codec::{
    SHARE_BYTES, decode_share, decode_share_words, encode_share, encode_share_words,
};
use guardian_recovery::domain::{Share, ShareIndex, Threshold};
use guardian_recovery::field::FieldElement;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Random share with index 1..=255 and a uniformly random field value
#[derive(Clone, Debug)]
struct ArbitraryShare(Share);

impl Arbitrary for ArbitraryShare {
    fn arbitrary(g: &mut Gen) -> Self {
        let index = ShareIndex::new(u8::arbitrary(g).max(1)).unwrap();
        let value = FieldElement::random(&mut ChaCha20Rng::seed_from_u64(u64::arbitrary(g)));
        ArbitraryShare(Share::new(index, value))
    }
}

#[quickcheck]
fn prop_binary_round_trip(share: ArbitraryShare) -> bool {
    decode_share(&*encode_share(&share.0)).is_ok_and(|decoded| decoded == share.0)
}

#[quickcheck]
fn prop_words_round_trip(share: ArbitraryShare, threshold: u8) -> bool {
    let threshold = Threshold::new(usize::from(threshold.max(1))).unwrap();
    let words = encode_share_words(&share.0, threshold);
    decode_share_words(words.as_str())
        .is_ok_and(|(t, decoded)| t == threshold && decoded == share.0)
}

#[quickcheck]
fn prop_truncated_binary_rejected(share: ArbitraryShare, cut: usize) -> bool {
    let bytes = encode_share(&share.0);
    let len = cut % SHARE_BYTES;
    matches!(
        decode_share(&bytes[..len]),
        Err(RecoveryError::MalformedShare(_))
    )
}

#[quickcheck]
fn prop_word_substitution_detected(share: ArbitraryShare, position: usize) -> bool {
    let words = encode_share_words(&share.0, Threshold::new(2).unwrap());
    let mut parts: Vec<&str> = words.as_str().split_whitespace().collect();
    // skip the version word
    let at = 1 + position % (parts.len() - 1);
    parts[at] = if parts[at] == "zoo" { "abandon" } else { "zoo" };
    decode_share_words(&parts.join(" ")).is_err()
}
