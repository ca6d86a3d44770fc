//! Structural fingerprint of a frame sequence.
//!
//! Two independently seeded FNV-1a 64-bit hashes over the canonical JSON form of every
//! frame (step, description, snapshot with object keys sorted). Equal fingerprints
//! across two runs mean the recorded sequences are structurally identical, which is the
//! determinism check the replay tests rely on.

use std::fmt;

use serde::Serialize;

use crate::{
    error::{StepreelError, StepreelResult},
    frame::FrameSequence,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub fn fingerprint_frames<S: Serialize>(
    seq: &FrameSequence<S>,
) -> StepreelResult<FrameFingerprint> {
    let mut a = Fnv1a64::new(0xcbf29ce484222325);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_u64_pair(&mut a, &mut b, seq.len() as u64);
    for frame in seq {
        write_u64_pair(&mut a, &mut b, frame.step as u64);
        write_str_pair(&mut a, &mut b, &frame.description);
        let value = serde_json::to_value(&frame.snapshot)
            .map_err(|e| StepreelError::serde(e.to_string()))?;
        write_json_value_pair(&mut a, &mut b, &value);
    }

    Ok(FrameFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    })
}

fn write_json_value_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: &serde_json::Value) {
    match v {
        serde_json::Value::Null => write_u8_pair(a, b, 0),
        serde_json::Value::Bool(x) => {
            write_u8_pair(a, b, 1);
            write_u8_pair(a, b, u8::from(*x));
        }
        serde_json::Value::Number(n) => {
            write_u8_pair(a, b, 2);
            write_str_pair(a, b, &n.to_string());
        }
        serde_json::Value::String(s) => {
            write_u8_pair(a, b, 3);
            write_str_pair(a, b, s);
        }
        serde_json::Value::Array(items) => {
            write_u8_pair(a, b, 4);
            write_u64_pair(a, b, items.len() as u64);
            for item in items {
                write_json_value_pair(a, b, item);
            }
        }
        serde_json::Value::Object(map) => {
            write_u8_pair(a, b, 5);
            let mut keys = map.keys().cloned().collect::<Vec<_>>();
            keys.sort();
            write_u64_pair(a, b, keys.len() as u64);
            for k in keys {
                write_str_pair(a, b, &k);
                write_json_value_pair(a, b, &map[&k]);
            }
        }
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Recorder;

    fn sequence(values: &[i64]) -> FrameSequence<Vec<i64>> {
        let mut rec = Recorder::new();
        for (i, _) in values.iter().enumerate() {
            rec.snapshot(format!("prefix of length {i}"), values[..i].to_vec());
        }
        rec.finish()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let seq = sequence(&[3, 1, 4, 1, 5]);
        let a = fingerprint_frames(&seq).unwrap();
        let b = fingerprint_frames(&seq).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_changes_when_frames_change() {
        let a = fingerprint_frames(&sequence(&[3, 1, 4])).unwrap();
        let b = fingerprint_frames(&sequence(&[3, 1, 5])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_32_hex_chars() {
        let fp = fingerprint_frames(&sequence(&[1])).unwrap();
        let text = fp.to_string();
        assert_eq!(text.len(), 32);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn empty_sequence_has_a_stable_fingerprint() {
        let empty: FrameSequence<Vec<i64>> = FrameSequence::default();
        let a = fingerprint_frames(&empty).unwrap();
        let b = fingerprint_frames(&empty).unwrap();
        assert_eq!(a, b);
    }
}
