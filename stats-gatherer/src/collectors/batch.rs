/// Splits `ids` into contiguous chunks of at most `limit` ids, preserving order. The last chunk may be shorter.
///
/// A `limit` of zero is treated as one so the split always terminates.
pub fn split_batches<T>(ids: &[T], limit: usize) -> Vec<&[T]> {
    ids.chunks(limit.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn batches_cover_all_ids_in_order() {
        for n in [0usize, 1, 99, 100, 101, 150, 200, 250, 1001] {
            let ids = (0..n as u64).collect::<Vec<_>>();
            let batches = split_batches(&ids, 100);

            assert_eq!(batches.len(), n.div_ceil(100), "n = {n}");
            assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= 100));
            assert_eq!(batches.concat(), ids);
            if let Some(last) = batches.last() {
                let expected = if n % 100 == 0 { 100 } else { n % 100 };
                assert_eq!(last.len(), expected, "n = {n}");
            }
        }
    }

    #[test]
    fn one_hundred_fifty_ids_make_two_batches() {
        let ids = (1..=150u64).collect::<Vec<_>>();
        let sizes = split_batches(&ids, 100).iter().map(|b| b.len()).collect::<Vec<_>>();
        assert_eq!(sizes, vec![100, 50]);
    }

    #[test]
    fn duplicates_are_kept() {
        let ids = [7u64, 7, 8];
        assert_eq!(split_batches(&ids, 2), vec![&[7u64, 7][..], &[8][..]]);
    }

    #[test]
    fn zero_limit_does_not_panic() {
        assert_eq!(split_batches(&[1u64, 2], 0).len(), 2);
    }
}
