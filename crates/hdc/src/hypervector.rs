//! Fixed-width binary hypervectors
//!
//! Every [`HyperVector`] holds exactly [`DIMENSION`] bits. Tokens get a stable
//! identity through [`HyperVector::from_seed`], which hashes the token text
//! (FNV-1a) and expands the hash with xorshift64, so the same text always
//! yields the same vector on every platform and every run.

use bitvec::prelude::*;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::DIMENSION;

/// Number of 64-bit words backing a hypervector.
pub const WORDS: usize = (DIMENSION + 63) / 64;

/// Number of bytes in the packed byte form of a hypervector.
pub const BYTES: usize = (DIMENSION + 7) / 8;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A high-dimensional binary vector
///
/// Bits beyond `DIMENSION` in the last backing word are always zero, so
/// word-level popcounts never see stray bits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HyperVector {
    bits: BitVec<u64, Lsb0>,
}

impl HyperVector {
    /// Create a zero hypervector
    pub fn zeros() -> Self {
        Self::from_words(vec![0u64; WORDS])
    }

    /// Create an all-ones hypervector
    pub fn ones() -> Self {
        Self::from_words(vec![u64::MAX; WORDS])
    }

    /// Create a random hypervector from the operating system's CSPRNG
    ///
    /// Not reproducible; use [`HyperVector::from_seed`] for token identities.
    pub fn random() -> Self {
        let mut words = vec![0u64; WORDS];
        for word in words.iter_mut() {
            *word = OsRng.next_u64();
        }
        Self::from_words(words)
    }

    /// Deterministic hypervector for a piece of text
    pub fn from_seed(text: &str) -> Self {
        Self::random_seeded(fnv1a(text.as_bytes()))
    }

    /// Deterministic hypervector for a numeric seed
    pub fn random_seeded(seed: u64) -> Self {
        let mut state = splitmix64(seed);
        if state == 0 {
            state = FNV_OFFSET;
        }

        let mut words = vec![0u64; WORDS];
        for word in words.iter_mut() {
            *word = xorshift64(&mut state);
        }
        Self::from_words(words)
    }

    pub(crate) fn from_words(mut words: Vec<u64>) -> Self {
        mask_tail(&mut words);
        let mut bits = BitVec::<u64, Lsb0>::from_vec(words);
        bits.truncate(DIMENSION);
        Self { bits }
    }

    /// Get the dimension
    pub fn dimension(&self) -> usize {
        DIMENSION
    }

    /// Get a specific bit
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|b| *b)
    }

    /// Set a specific bit; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, value: bool) {
        if let Some(mut bit) = self.bits.get_mut(index) {
            bit.set(value);
        }
    }

    /// Flip a specific bit; out-of-range indices are ignored
    pub fn flip(&mut self, index: usize) {
        if let Some(mut bit) = self.bits.get_mut(index) {
            let val = *bit;
            bit.set(!val);
        }
    }

    /// Count the number of 1s (Hamming weight)
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of set bits, in [0, 1]
    pub fn density(&self) -> f64 {
        self.count_ones() as f64 / DIMENSION as f64
    }

    /// Hamming distance to another vector
    pub fn hamming_distance(&self, other: &HyperVector) -> usize {
        self.words()
            .iter()
            .zip(other.words())
            .map(|(a, b)| (a ^ b).count_ones() as usize)
            .sum()
    }

    /// Normalized Hamming similarity: `1 - hamming / D`
    ///
    /// 1.0 for identical vectors, 0.0 for complements, about 0.5 for
    /// independent random vectors.
    pub fn resonance(&self, other: &HyperVector) -> f64 {
        1.0 - self.hamming_distance(other) as f64 / DIMENSION as f64
    }

    /// XOR with another vector (binding operation)
    pub fn bind(&self, other: &HyperVector) -> HyperVector {
        let mut result = self.clone();
        result.bind_assign(other);
        result
    }

    /// In-place XOR
    pub fn bind_assign(&mut self, other: &HyperVector) {
        for (a, b) in self.bits.as_raw_mut_slice().iter_mut().zip(other.words()) {
            *a ^= *b;
        }
    }

    /// Bitwise NOT
    pub fn complement(&self) -> HyperVector {
        let words = self.words().iter().map(|w| !w).collect();
        Self::from_words(words)
    }

    /// Cyclic shift toward higher indices by `positions mod D`
    ///
    /// Negative amounts rotate the other way, so `permute(k)` followed by
    /// `permute(-k)` is the identity.
    pub fn permute(&self, positions: isize) -> HyperVector {
        let mut result = self.clone();

        let shift = positions.rem_euclid(DIMENSION as isize) as usize;
        if shift > 0 {
            result.bits.rotate_right(shift);
        }

        result
    }

    /// Inverse of [`HyperVector::permute`]
    pub fn unpermute(&self, positions: isize) -> HyperVector {
        self.permute(-positions)
    }

    /// Create from raw bytes, LSB-first within each byte
    ///
    /// Buffers shorter than `D` bits leave the remaining high bits unset;
    /// longer buffers are truncated to `D` bits.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut words = vec![0u64; WORDS];
        for (i, byte) in bytes.iter().take(BYTES).enumerate() {
            words[i / 8] |= (*byte as u64) << ((i % 8) * 8);
        }
        Self::from_words(words)
    }

    /// Convert to raw bytes, LSB-first within each byte
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words()
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .take(BYTES)
            .collect()
    }

    /// Backing words; bits past `D` in the last word are zero
    pub fn words(&self) -> &[u64] {
        self.bits.as_raw_slice()
    }

    /// Get inner bitvec for advanced operations
    pub fn as_bitvec(&self) -> &BitVec<u64, Lsb0> {
        &self.bits
    }
}

fn mask_tail(words: &mut [u64]) {
    let tail = DIMENSION % 64;
    if tail != 0 {
        if let Some(last) = words.last_mut() {
            *last &= (1u64 << tail) - 1;
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ *b as u64).wrapping_mul(FNV_PRIME)
    })
}

// Spreads low-entropy seeds (0, 1, 2, ...) before they reach xorshift, whose
// early outputs stay correlated for seeds differing in few bits.
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn xorshift64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

impl Serialize for HyperVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("HyperVector", 2)?;
        state.serialize_field("dimension", &DIMENSION)?;
        state.serialize_field("bytes", &self.to_bytes())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for HyperVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, SeqAccess, Visitor};

        struct HyperVectorVisitor;

        fn checked<E: de::Error>(dimension: usize, bytes: Vec<u8>) -> Result<HyperVector, E> {
            if dimension != DIMENSION {
                return Err(E::custom(format!(
                    "hypervector has {} bits, expected {}",
                    dimension, DIMENSION
                )));
            }
            if bytes.len() != BYTES {
                return Err(E::custom(format!(
                    "hypervector has {} bytes, expected {}",
                    bytes.len(),
                    BYTES
                )));
            }
            Ok(HyperVector::from_bytes(&bytes))
        }

        impl<'de> Visitor<'de> for HyperVectorVisitor {
            type Value = HyperVector;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("struct HyperVector")
            }

            // Compact formats such as bincode encode structs as sequences.
            fn visit_seq<V>(self, mut seq: V) -> Result<HyperVector, V::Error>
            where
                V: SeqAccess<'de>,
            {
                let dimension: usize = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let bytes: Vec<u8> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                checked(dimension, bytes)
            }

            fn visit_map<V>(self, mut map: V) -> Result<HyperVector, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut bytes = None;
                let mut dimension = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "bytes" => {
                            bytes = Some(map.next_value()?);
                        }
                        "dimension" => {
                            dimension = Some(map.next_value()?);
                        }
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                let bytes: Vec<u8> = bytes.ok_or_else(|| de::Error::missing_field("bytes"))?;
                let dimension = dimension.ok_or_else(|| de::Error::missing_field("dimension"))?;

                checked(dimension, bytes)
            }
        }

        const FIELDS: &[&str] = &["dimension", "bytes"];
        deserializer.deserialize_struct("HyperVector", FIELDS, HyperVectorVisitor)
    }
}

impl fmt::Display for HyperVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HyperVector[{}D, {:.1}% ones]", DIMENSION, self.density() * 100.0)
    }
}
