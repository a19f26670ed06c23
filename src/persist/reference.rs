//! Booking reference generation with a bounded retry budget.

use rand::Rng;

use crate::{config::ReferencePolicy, types::BookingRef};

use super::{BookingStore, PersistError, PersistResult};

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random uppercase alphanumeric token of `len` characters.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Draws candidates until one is absent from `store`.
///
/// Tries `policy.max_attempts` tokens of `policy.length`, then
/// `policy.fallback_attempts` of `policy.fallback_length`.
pub fn generate_unique_reference<S, R>(
    store: &S,
    rng: &mut R,
    policy: &ReferencePolicy,
) -> PersistResult<BookingRef>
where
    S: BookingStore + ?Sized,
    R: Rng + ?Sized,
{
    let schedule = [
        (policy.length, policy.max_attempts),
        (policy.fallback_length, policy.fallback_attempts),
    ];

    let mut attempts = 0usize;
    for (stage, (len, budget)) in schedule.into_iter().enumerate() {
        if stage > 0 && budget > 0 {
            log::warn!(
                "no free {}-character reference after {attempts} attempts; widening to {len}",
                policy.length
            );
        }
        for _ in 0..budget {
            attempts += 1;
            let candidate = BookingRef::from_generated(random_token(rng, len));
            if !store.reference_exists(&candidate)? {
                return Ok(candidate);
            }
            log::debug!("reference {candidate} already issued, retrying");
        }
    }

    Err(PersistError::ReferenceExhausted { attempts })
}
