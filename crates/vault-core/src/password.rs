//! Password generation.

use rand::Rng;

/// Characters eligible for generated passwords.
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Default length for generated passwords.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Generates a random password of the default length.
pub fn generate_password() -> String {
    generate_password_of_length(DEFAULT_PASSWORD_LENGTH)
}

/// Generates a random password of the given length, drawing each character
/// uniformly from the eligible set.
pub fn generate_password_of_length(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
