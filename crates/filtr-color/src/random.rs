//! Random integers for stochastic filters.

use rand::Rng;

/// Uniform integer in `[min(lo, hi), max(lo, hi)]`, both ends inclusive.
#[inline]
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    let (min, max) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    rng.gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_int_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..2000 {
            let v = random_int(&mut rng, 3, -2);
            assert!((-2..=3).contains(&v));
            seen_lo |= v == -2;
            seen_hi |= v == 3;
        }
        assert!(seen_lo && seen_hi);
    }

    #[test]
    fn test_random_int_degenerate() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_int(&mut rng, 5, 5), 5);
    }
}
