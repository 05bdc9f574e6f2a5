use rand::Rng;

/// Lowercase base-36. Every character is safe in a URL path segment.
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const CONFESSION_ID_LEN: usize = 8;

/// How many fresh ids a backend tries before giving up on a create.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Source of confession ids. Backends hold one so tests can force collisions.
pub type IdGenerator = fn() -> String;

/// Draw a short, shareable confession id.
///
/// Uses the thread-local PRNG; these ids are link handles, not secrets.
pub fn generate_confession_id() -> String {
    let mut rng = rand::rng();
    (0..CONFESSION_ID_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// True if `id` has the shape `generate_confession_id` produces.
pub fn is_confession_id(id: &str) -> bool {
    id.len() == CONFESSION_ID_LEN && id.bytes().all(|b| ALPHABET.contains(&b))
}
