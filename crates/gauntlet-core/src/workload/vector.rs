/// Elementwise addition of `a[i] = i` and `b[i] = 2i`.
///
/// Returns the sum sequence; callers keep it alive (or `black_box` it) so the
/// loop cannot be discarded.
#[must_use]
pub fn vector_add(len: usize) -> Vec<i64> {
    let a: Vec<i64> = (0..len as i64).collect();
    let b: Vec<i64> = (0..len as i64).map(|i| i * 2).collect();

    let mut c = vec![0i64; len];
    for ((out, x), y) in c.iter_mut().zip(&a).zip(&b) {
        *out = x + y;
    }
    c
}
