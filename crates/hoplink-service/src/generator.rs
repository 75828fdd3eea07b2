use hoplink_core::ShortCode;
use jiff::Timestamp;
use rand::RngExt;
use xxhash_rust::xxh64::xxh64;

/// The base-62 alphabet used for generated short codes.
pub const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Trait for generating candidate short codes.
///
/// Implementations are pure functions aside from their entropy source:
/// they never touch storage and never fail. Collision avoidance is the
/// resolver's job, enforced against the store, not the generator's.
pub trait CodeGenerator: Send + Sync + 'static {
    /// Produces a fixed-length candidate code for the given URL.
    fn generate(&self, url: &str) -> ShortCode;
}

/// Digest-based code generator.
///
/// Combines the input URL with a high-resolution timestamp and a random
/// salt, hashes the combination with xxh64 (collision resistance is
/// enforced externally, so a non-cryptographic digest is fine), and
/// reduces the hash to base-62 digits. Two calls with the same URL
/// produce different codes because the entropy changes between calls.
#[derive(Debug, Clone)]
pub struct HashCodeGenerator {
    length: usize,
}

impl HashCodeGenerator {
    /// Creates a generator emitting codes of the given length.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl CodeGenerator for HashCodeGenerator {
    fn generate(&self, url: &str) -> ShortCode {
        let salt: u64 = rand::rng().random();
        let seed = format!("{}:{}:{}", url, Timestamp::now().as_nanosecond(), salt);

        let mut value = xxh64(seed.as_bytes(), salt);
        let mut code = String::with_capacity(self.length);
        while code.len() < self.length {
            code.push(BASE62[(value % 62) as usize] as char);
            value /= 62;
        }
        ShortCode::new_unchecked(code)
    }
}

/// Uniformly random code generator over the same alphabet.
///
/// Serves as the always-available fallback when no digest source is
/// wanted, and as a handy stand-in for tests.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator emitting codes of the given length.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, _url: &str) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| BASE62[rng.random_range(0..62)] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
