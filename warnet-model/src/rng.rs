//! The single random source owned by each simulation instance.
//!
//! Graph generation, target sampling, damage severity and casualty placement
//! all draw from one stream so that a run is fully reproducible from its
//! user-visible seed.
use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::constants::RNG_DOMAIN_TAG;

/// Draw-counting wrapper around a portable `ChaCha20` stream.
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: ChaCha20Rng,
    draws: u64,
}

impl SimRng {
    /// Construct the stream from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::from_seed(derive_stream_seed(seed, RNG_DOMAIN_TAG)),
            draws: 0,
        }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> [u8; 32] {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("HMAC accepts any key");
    mac.update(domain_tag);
    mac.finalize().into_bytes().into()
}
