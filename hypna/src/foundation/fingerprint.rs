use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x8b5a_d4a0_c7d8_e9f1;

/// Stable 128-bit fingerprint of a compiled frame.
///
/// Two frames with byte-identical compiled text always share a fingerprint, across runs and
/// platforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl FrameFingerprint {
    /// Lowercase hex form (32 chars), used in exported documents.
    pub fn to_hex(self) -> String {
        format!("{:016x}{:016x}", self.hi, self.lo)
    }
}

pub(crate) fn fingerprint_text(text: &str) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(text.len() as u64);
    h.write_bytes(text.as_bytes());
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}
