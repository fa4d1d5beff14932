use std::ops::Range;

/// N even, 8
///
/// n : 0 1 2 3 4 5 6 7
///
/// i : 0 1 2 3 -4 -3 -2 -1
///
/// N Odd, 7
///
/// n : 0 1 2 3 4 5 6
///
/// i : 0 1 2 3 -3 -2 -1
pub fn fft_n2i(n: usize, ntot: usize) -> i64 {
    if 2 * n < ntot {
        n as i64
    } else {
        n as i64 - ntot as i64
    }
}

pub fn fft_i2n(i: i64, ntot: usize) -> usize {
    i.rem_euclid(ntot as i64) as usize
}

/// Split `0..ntot` into `nrank` contiguous chunks, the first `ntot % nrank`
/// chunks one element longer.
pub fn get_chunks(ntot: usize, nrank: usize) -> Vec<Range<usize>> {
    assert!(nrank > 0);

    let mut vchunks_size = vec![0; nrank];

    for i in 0..ntot {
        vchunks_size[i % nrank] += 1;
    }

    let mut vchunks = Vec::with_capacity(nrank);

    let mut n = 0;
    for size in vchunks_size {
        vchunks.push(n..n + size);
        n += size;
    }

    vchunks
}

/// `ceil(a / b)` for non-negative integers.
pub fn div_ceil(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_n2i_even() {
        let wrapped: Vec<i64> = (0..8).map(|n| fft_n2i(n, 8)).collect();

        assert_eq!(wrapped, vec![0, 1, 2, 3, -4, -3, -2, -1]);
    }

    #[test]
    fn test_fft_n2i_odd() {
        let wrapped: Vec<i64> = (0..7).map(|n| fft_n2i(n, 7)).collect();

        assert_eq!(wrapped, vec![0, 1, 2, 3, -3, -2, -1]);
    }

    #[test]
    fn test_fft_i2n_inverts_n2i() {
        for ntot in 1..12 {
            for n in 0..ntot {
                assert_eq!(fft_i2n(fft_n2i(n, ntot), ntot), n);
            }
        }
    }

    #[test]
    fn test_chunks_cover_range() {
        let chunks = get_chunks(31, 5);

        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0], 0..7);
        assert_eq!(chunks[4], 25..31);

        for w in chunks.windows(2) {
            assert_eq!(w[0].end, w[1].start);
        }
    }

    #[test]
    fn test_chunks_with_more_ranks_than_elements() {
        let chunks = get_chunks(2, 4);

        assert_eq!(chunks, vec![0..1, 1..2, 2..2, 2..2]);
    }
}
