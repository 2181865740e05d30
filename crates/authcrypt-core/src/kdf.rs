//! Concat KDF (NIST SP 800-56A, as profiled by RFC 7518 §4.6.2).
//!
//! ```text
//! round_i = SHA-256( BE32(i) || Z || OtherInfo )
//! OtherInfo = lp(AlgorithmID) || lp(PartyUInfo) || lp(PartyVInfo) || BE32(keydatalen_bits)
//! lp(x)     = BE32(len(x)) || x
//! ```
//!
//! SuppPrivInfo is always empty. Rounds are counted from 1 and concatenated
//! until `key_len` bytes are available.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

fn length_prefixed(hasher: &mut Sha256, data: &[u8]) {
    hasher.update((data.len() as u32).to_be_bytes());
    hasher.update(data);
}

/// Derive `key_len` bytes from the agreement output `z`.
pub fn concat_kdf(
    z: &[u8],
    alg_id: &[u8],
    apu: &[u8],
    apv: &[u8],
    key_len: usize,
) -> Zeroizing<Vec<u8>> {
    let key_bits = (key_len as u32) * 8;
    let mut out = Zeroizing::new(Vec::with_capacity(key_len));
    let mut counter: u32 = 1;

    while out.len() < key_len {
        let mut hasher = Sha256::new();
        hasher.update(counter.to_be_bytes());
        hasher.update(z);
        length_prefixed(&mut hasher, alg_id);
        length_prefixed(&mut hasher, apu);
        length_prefixed(&mut hasher, apv);
        hasher.update(key_bits.to_be_bytes());

        let round = hasher.finalize();
        let take = (key_len - out.len()).min(round.len());
        out.extend_from_slice(&round[..take]);
        counter += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_round_layout() {
        let z = [0x11u8; 32];
        let derived = concat_kdf(&z, b"XC20P", b"apu", &[], 32);

        let mut hasher = Sha256::new();
        hasher.update(1u32.to_be_bytes());
        hasher.update(z);
        hasher.update(5u32.to_be_bytes());
        hasher.update(b"XC20P");
        hasher.update(3u32.to_be_bytes());
        hasher.update(b"apu");
        hasher.update(0u32.to_be_bytes());
        hasher.update(256u32.to_be_bytes());
        let expected = hasher.finalize();

        assert_eq!(derived.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_multi_round_output_length() {
        let derived = concat_kdf(&[0x22; 32], b"alg", &[], &[], 80);
        assert_eq!(derived.len(), 80);

        // The first round only differs from a 32-byte request in keydatalen.
        let short = concat_kdf(&[0x22; 32], b"alg", &[], &[], 32);
        assert_ne!(&derived[..32], short.as_slice());
    }

    #[test]
    fn test_party_info_is_length_prefixed() {
        // Moving a byte between PartyUInfo and PartyVInfo must change the output.
        let a = concat_kdf(&[0x33; 32], b"alg", b"ab", b"c", 32);
        let b = concat_kdf(&[0x33; 32], b"alg", b"a", b"bc", 32);
        assert_ne!(a.as_slice(), b.as_slice());
    }

    proptest! {
        #[test]
        fn output_has_requested_length(z in any::<[u8; 32]>(), key_len in 1usize..128) {
            prop_assert_eq!(concat_kdf(&z, b"XC20P", &[], &[], key_len).len(), key_len);
        }

        #[test]
        fn apu_separates_keys(
            z in any::<[u8; 32]>(),
            a in prop::collection::vec(any::<u8>(), 64),
            b in prop::collection::vec(any::<u8>(), 64),
        ) {
            prop_assume!(a != b);
            let ka = concat_kdf(&z, b"XC20P", &a, &[], 32);
            let kb = concat_kdf(&z, b"XC20P", &b, &[], 32);
            prop_assert_ne!(ka.as_slice(), kb.as_slice());
        }
    }
}
