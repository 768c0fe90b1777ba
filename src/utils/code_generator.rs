//! Short code generation.
//!
//! Candidates are random and may collide; uniqueness is enforced by the
//! allocator at write time.

use rand::Rng;

/// URL-safe alphabet of 64 symbols.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Number of characters in a generated code.
pub const CODE_LENGTH: usize = 8;

/// Generates one candidate short code.
///
/// Each character is drawn independently and uniformly from [`ALPHABET`]
/// using the thread-local RNG, so the function is safe to call from any task.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 8);
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `code` has the shape of a generated code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}
