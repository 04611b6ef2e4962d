//! Power-of-two canvas sizing shared by all strategies.

/// Smallest power of two `>= v`; `0` and `1` map to `1`. Saturates at `2^31`.
pub fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    if v > 1 << 31 {
        return 1 << 31;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

pub fn is_pow2(v: u32) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

/// Power-of-two size covering `required`, or `None` if it exceeds `max`.
pub fn fit_pow2(required: u32, max: u32) -> Option<u32> {
    let size = next_pow2(required);
    (size >= required && size <= max).then_some(size)
}

/// Consecutive powers of two from the one covering `min` up to `max`.
pub fn candidates(min: u32, max: u32) -> impl Iterator<Item = u32> {
    let start = next_pow2(min);
    let start = (start >= min).then_some(start);
    std::iter::successors(start, |&w| w.checked_mul(2)).take_while(move |&w| w <= max)
}
