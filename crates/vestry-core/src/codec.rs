//! Canonical binary encoding for persisted records.
//!
//! Records go through their serde representation with bincode's standard
//! configuration. Amounts travel as decimal strings, so nothing is ever
//! narrowed to a fixed-width or floating-point integer.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::VestryError;

/// Encode `value` to bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, VestryError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| VestryError::Codec(e.to_string()))
}

/// Decode a value previously produced by [`encode`]. Trailing bytes are rejected.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, VestryError> {
    let (value, read) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|e| VestryError::Codec(e.to_string()))?;
    if read != bytes.len() {
        return Err(VestryError::Codec(format!(
            "{} trailing bytes after record",
            bytes.len() - read
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::period::Period;
    use crate::schedule::Schedule;
    use num_bigint::BigUint;

    #[test]
    fn schedule_survives_encoding() {
        let huge = BigUint::from(10u64).pow(40) + 3u64;
        let s = Schedule::new(
            1_700_000_000,
            vec![
                Period::new(0, Amount::coin("aISLM", huge)),
                Period::new(86_400, Amount::coin("aISLM", 1u64) + Amount::coin("other", 2u64)),
            ],
        );
        let bytes = encode(&s).unwrap();
        let back: Schedule = decode(&bytes).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = encode(&Amount::coin("aISLM", 5u64)).unwrap();
        bytes.push(0);
        assert!(matches!(decode::<Amount>(&bytes), Err(VestryError::Codec(_))));
    }

    #[test]
    fn garbage_rejected() {
        assert!(decode::<Schedule>(&[0xff, 0xff, 0xff]).is_err());
    }
}
