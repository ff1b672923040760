// THEORY:
// The median is the per-cell summary of the fingerprint: the middle intensity of the
// cell's pixels once they are put in order. Isolated bright or dark specks inside a
// cell leave it unchanged.
//
// Intensities are 8-bit, and the two middle values of an even-sized cell are averaged
// with integer division, which rounds down.

/// Reduces a tile buffer to its median intensity.
///
/// The buffer is reordered in place; it is refilled by the next frame anyway.
/// An empty buffer yields 0. For an even number of pixels the result is the
/// mean of the two middle values, rounded down.
pub fn median(buffer: &mut [u8]) -> u8 {
    let n = buffer.len();
    if n == 0 {
        return 0;
    }

    // Selection is O(n) and leaves everything below `mid` in the lower half.
    let mid = n / 2;
    let (lower, upper, _) = buffer.select_nth_unstable(mid);
    let upper = *upper;

    if n % 2 == 1 {
        return upper;
    }

    let lower = lower.iter().copied().max().unwrap_or(upper);
    ((lower as u16 + upper as u16) / 2) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_length_takes_middle_value() {
        assert_eq!(median(&mut [1, 2, 3]), 2);
        assert_eq!(median(&mut [9, 1, 5, 3, 7]), 5);
        assert_eq!(median(&mut [5]), 5);
    }

    #[test]
    fn even_length_floors_the_mean_of_middle_values() {
        assert_eq!(median(&mut [1, 2, 3, 4]), 2);
        assert_eq!(median(&mut [4, 3, 2, 1]), 2);
        assert_eq!(median(&mut [10, 20]), 15);
        assert_eq!(median(&mut [7, 8]), 7);
    }

    #[test]
    fn middle_values_near_the_top_do_not_overflow() {
        assert_eq!(median(&mut [255, 255]), 255);
        assert_eq!(median(&mut [254, 255, 0, 255]), 254);
    }

    #[test]
    fn empty_buffer_yields_zero() {
        assert_eq!(median(&mut []), 0);
    }

    #[test]
    fn matches_sorted_reference() {
        let mut seed = 0x2545_f491u32;
        for len in 1..64usize {
            let mut values: Vec<u8> = (0..len)
                .map(|_| {
                    seed ^= seed << 13;
                    seed ^= seed >> 17;
                    seed ^= seed << 5;
                    (seed >> 24) as u8
                })
                .collect();

            let mut sorted = values.clone();
            sorted.sort_unstable();
            let expected = if len % 2 == 1 {
                sorted[len / 2]
            } else {
                ((sorted[len / 2 - 1] as u16 + sorted[len / 2] as u16) / 2) as u8
            };

            assert_eq!(median(&mut values), expected, "len {len}");
        }
    }
}
