//! Serde round-trip for the amplitude vector
//!
//! The wire form is the amplitude sequence in canonical little-endian-qubit
//! index order, nothing else. Deserialization re-infers the qubit count
//! from the length and rejects anything that is not a power of two; the
//! execution configuration is not part of the wire form and comes back as
//! the default.

use num_complex::Complex64;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::state_vector::StateVector;

impl Serialize for StateVector {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.amplitudes())
    }
}

impl<'de> Deserialize<'de> for StateVector {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amplitudes = Vec::<Complex64>::deserialize(deserializer)?;
        StateVector::from_amplitudes(&amplitudes).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn round_trip_preserves_amplitudes() {
        let amplitudes: Vec<Complex64> = (0..8)
            .map(|i| Complex64::new(0.25 * i as f64, -0.5 * i as f64))
            .collect();
        let state = StateVector::from_amplitudes(&amplitudes).unwrap();

        let encoded = serde_json::to_string(&state).unwrap();
        let decoded: StateVector = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.num_qubits(), 3);
        for (a, b) in decoded.amplitudes().iter().zip(state.amplitudes()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-15);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-15);
        }
    }

    #[test]
    fn bad_length_fails_to_deserialize() {
        let encoded = "[[1.0,0.0],[0.0,0.0],[0.0,0.0]]";
        let decoded: std::result::Result<StateVector, _> = serde_json::from_str(encoded);
        assert!(decoded.is_err());
    }
}
