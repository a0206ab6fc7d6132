//! Document id generation
//!
//! Ids are 12 random bytes rendered as 24 lowercase hex characters. With a
//! 96-bit space collisions are improbable but not impossible, so callers that
//! need uniqueness check against their existing keys and draw again.

use std::fmt::Write;

use rand::RngCore;

/// Length of a generated id in characters
pub const ID_LEN: usize = 24;

/// Generate a fresh random id
pub fn generate_id() -> String {
    let mut bytes = [0u8; ID_LEN / 2];
    rand::thread_rng().fill_bytes(&mut bytes);

    let mut id = String::with_capacity(ID_LEN);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(id, "{:02x}", byte);
    }
    id
}
