//! Seeded random streams owned by a single generation call.
//!
//! Two independent streams are derived from the run seed: one feeds the name
//! source (names, email domains, cities), the other every numeric and
//! categorical draw plus the segment shuffle. Nothing here is global.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Which stream a draw consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Names,
    Attributes,
}

impl StreamKind {
    fn key(self) -> &'static str {
        match self {
            Self::Names => "names",
            Self::Attributes => "attributes",
        }
    }
}

/// The per-run pair of random streams.
#[derive(Debug, Clone)]
pub struct SeededStreams {
    pub names: ChaCha8Rng,
    pub attributes: ChaCha8Rng,
}

impl SeededStreams {
    pub fn new(seed: u64) -> Self {
        Self {
            names: ChaCha8Rng::seed_from_u64(derive_seed(seed, StreamKind::Names.key())),
            attributes: ChaCha8Rng::seed_from_u64(derive_seed(
                seed,
                StreamKind::Attributes.key(),
            )),
        }
    }

    pub fn get(&mut self, kind: StreamKind) -> &mut ChaCha8Rng {
        match kind {
            StreamKind::Names => &mut self.names,
            StreamKind::Attributes => &mut self.attributes,
        }
    }
}

/// FNV-1a over `key`, keyed by `seed`.
pub fn derive_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
