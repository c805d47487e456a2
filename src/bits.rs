//! Integer helpers shared by the planner, the emitters and the stimulus writers.

/// Ceiling log2. `clog2(1) == 0`; `clog2(0)` is treated as `0`.
pub fn clog2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

/// Floor log2 of `n >= 1`; `flog2(0)` is treated as `0`.
pub fn flog2(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        (usize::BITS - 1 - n.leading_zeros()) as usize
    }
}

/// Width of a select bus addressing `n` streams. Never narrower than one bit.
pub fn select_width(n: usize) -> usize {
    clog2(n).max(1)
}

/// `value` as a zero-padded binary string of `width` digits, MSB first.
pub fn to_binary(value: u64, width: usize) -> String {
    (0..width)
        .rev()
        .map(|bit| {
            if bit < 64 && (value >> bit) & 1 == 1 {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clog2() {
        assert_eq!(clog2(1), 0);
        assert_eq!(clog2(2), 1);
        assert_eq!(clog2(3), 2);
        assert_eq!(clog2(4), 2);
        assert_eq!(clog2(5), 3);
        assert_eq!(clog2(100), 7);
        assert_eq!(clog2(128), 7);
        assert_eq!(clog2(129), 8);
    }

    #[test]
    fn test_flog2() {
        assert_eq!(flog2(1), 0);
        assert_eq!(flog2(2), 1);
        assert_eq!(flog2(3), 1);
        assert_eq!(flog2(7), 2);
        assert_eq!(flog2(8), 3);
        assert_eq!(flog2(1000), 9);
    }

    #[test]
    fn test_select_width_minimum() {
        assert_eq!(select_width(1), 1);
        assert_eq!(select_width(2), 1);
        assert_eq!(select_width(4), 2);
        assert_eq!(select_width(6), 3);
    }

    #[test]
    fn test_to_binary_padding() {
        assert_eq!(to_binary(5, 4), "0101");
        assert_eq!(to_binary(0, 3), "000");
        assert_eq!(to_binary(3, 1), "1");
    }
}
