//! CPU-bound numeric workloads.
//!
//! All functions are pure and deterministic. Recursive variants are left
//! naive on purpose: their cost is the measurement.

use std::hint::black_box;

/// Trial-division primality test.
#[must_use]
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut i = 3;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Count primes in `[2, limit)` by trial division.
#[must_use]
pub fn count_primes(limit: u64) -> u64 {
    (2..limit).filter(|&n| is_prime(n)).count() as u64
}

/// Count primes in `[0, limit)` with a sieve of Eratosthenes.
#[must_use]
pub fn sieve_count(limit: usize) -> u64 {
    if limit < 2 {
        return 0;
    }

    let mut is_prime = vec![true; limit];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut i = 2;
    while i * i < limit {
        if is_prime[i] {
            let mut j = i * i;
            while j < limit {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }

    is_prime.iter().filter(|&&p| p).count() as u64
}

/// Iterative Fibonacci.
///
/// Wraps modulo 2^64 past `fib(93)`, the largest value that fits in a `u64`.
#[must_use]
pub fn fib_iter(n: u32) -> u64 {
    if n <= 1 {
        return u64::from(n);
    }

    let (mut a, mut b) = (0u64, 1u64);
    for _ in 2..=n {
        let c = a.wrapping_add(b);
        a = b;
        b = c;
    }
    b
}

/// Naive doubly-recursive Fibonacci. Wraps like [`fib_iter`].
#[must_use]
pub fn fib_rec(n: u32) -> u64 {
    if n <= 1 {
        return u64::from(n);
    }
    fib_rec(n - 1).wrapping_add(fib_rec(n - 2))
}

/// Takeuchi function, classic three-argument definition, unmemoized.
#[must_use]
pub fn tak(x: i32, y: i32, z: i32) -> i32 {
    if y >= x {
        z
    } else {
        tak(tak(x - 1, y, z), tak(y - 1, z, x), tak(z - 1, x, y))
    }
}

/// Shape of the synthetic per-request arithmetic loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// `sum(i * id)` for `i` in `0..iterations`. Zero for request id 0.
    Scaled { iterations: u64 },
    /// `sum(i)` for `i` in `0..iterations`, independent of the id.
    Flat { iterations: u64 },
}

/// Simulate handling one request.
#[must_use]
pub fn process_request(id: u64, shape: RequestShape) -> u64 {
    let mut acc: u64 = 0;
    match shape {
        RequestShape::Scaled { iterations } => {
            for i in 0..iterations {
                acc = acc.wrapping_add(i.wrapping_mul(id));
            }
        }
        RequestShape::Flat { iterations } => {
            for i in 0..iterations {
                acc = acc.wrapping_add(i);
            }
        }
    }
    acc
}

/// Process requests `0..total` sequentially; returns how many produced a
/// non-zero result.
#[must_use]
pub fn run_requests(total: u64, shape: RequestShape) -> u64 {
    let mut completed = 0;
    for id in 0..total {
        if process_request(black_box(id), shape) > 0 {
            completed += 1;
        }
    }
    completed
}
