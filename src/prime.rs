//! Prime sizing for bucket arrays.
//!
//! Quadratic probing over a prime-sized table visits `(p + 1) / 2` distinct slots before
//! repeating, so every bucket array in this crate is sized with [`next_prime`].

/// Returns the smallest odd prime that is `>= n`.
///
/// An even `n` is bumped to `n + 1` before testing, so `next_prime(2)` is `3`.
/// `n` is returned unchanged only when it is odd and already prime.
#[must_use]
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n.saturating_add(1) } else { n };

    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }

    candidate
}

/// Returns true if `n` is prime, by trial division with odd factors up to `sqrt(n)`.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }

    if n < 2 || n % 2 == 0 {
        return false;
    }

    // factor starts at 3 and only grows, so the remainder below never divides by zero
    let mut factor: usize = 3;
    while factor.saturating_mul(factor) <= n {
        if n % factor == 0 {
            return false;
        }
        factor = factor.saturating_add(2);
    }

    true
}
