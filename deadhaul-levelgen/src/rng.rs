//! Deterministic RNG streams segregated by generation domain.
//!
//! Each stream is seeded independently from the user-visible seed through an
//! HMAC-SHA256 domain tag, so drawing from one stream never perturbs the
//! sequence of another. Swapping the secret-area roll count, for example,
//! leaves objective selection byte-for-byte identical under the same seed.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Bundle of per-domain RNG streams owned by one generator instance.
#[derive(Debug, Clone)]
pub struct RngStreams {
    selection: RefCell<TallyRng<SmallRng>>,
    secrets: RefCell<TallyRng<SmallRng>>,
    checkpoints: RefCell<TallyRng<SmallRng>>,
}

impl RngStreams {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            selection: RefCell::new(TallyRng::seeded(stream_seed(seed, b"selection"))),
            secrets: RefCell::new(TallyRng::seeded(stream_seed(seed, b"secrets"))),
            checkpoints: RefCell::new(TallyRng::seeded(stream_seed(seed, b"checkpoints"))),
        }
    }

    /// Stream driving objective type selection and bonus draws.
    #[must_use]
    pub fn selection(&self) -> RefMut<'_, TallyRng<SmallRng>> {
        self.selection.borrow_mut()
    }

    /// Stream driving secret-area trigger, count, and type rolls.
    #[must_use]
    pub fn secrets(&self) -> RefMut<'_, TallyRng<SmallRng>> {
        self.secrets.borrow_mut()
    }

    /// Stream driving the waypoint/outpost split for checkpoints.
    #[must_use]
    pub fn checkpoints(&self) -> RefMut<'_, TallyRng<SmallRng>> {
        self.checkpoints.borrow_mut()
    }

    /// Total draws performed across all streams since construction.
    #[must_use]
    pub fn total_draws(&self) -> u64 {
        self.selection.borrow().draws()
            + self.secrets.borrow().draws()
            + self.checkpoints.borrow().draws()
    }
}

/// Draw-counting wrapper providing instrumentation for generator statistics.
#[derive(Debug, Clone)]
pub struct TallyRng<R> {
    rng: R,
    draws: u64,
}

impl TallyRng<SmallRng> {
    fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> TallyRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for TallyRng<R> {
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

fn stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
