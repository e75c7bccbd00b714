//! Translation between per-channel enable vectors and packed bit masks.
//!
//! A digitizer exposes channel enablement as a packed integer mask, but it may
//! address that mask at a coarser granularity than single channels: on grouped
//! models one mask bit switches a whole block of contiguous channels. The
//! configuration side instead works with one `Option<bool>` per physical
//! channel, where `None` means "no preference expressed".
//!
//! [`vec_to_mask`] and [`mask_to_vec`] convert between the two
//! representations for an arbitrary group size; `group_size == 1` yields the
//! plain per-channel mask. Comparing the mask at group size 1 against the
//! device's real group size is how the programming layer detects channel
//! selections that the hardware's grouping cannot represent exactly.

/// Pack a channel-enable vector into a bit mask.
///
/// Vector elements are grouped into chunks of `group_size` contiguous
/// entries; bit `i` of the result is set iff any element of chunk `i` is
/// enabled. An unset (`None`) element expresses no preference and does not
/// assert its group's bit.
pub fn vec_to_mask(vec: &[Option<bool>], group_size: usize) -> u32 {
    debug_assert!(group_size >= 1, "group size must be at least 1");
    let mut mask: u32 = 0;
    for (i, entry) in vec.iter().enumerate() {
        let bit = i / group_size.max(1);
        if entry.unwrap_or(false) && bit < u32::BITS as usize {
            mask |= 1 << bit;
        }
    }
    mask
}

/// Expand a bit mask back into a channel-enable vector, in place.
///
/// Every element of a group whose bit is set becomes `Some(true)`. Elements
/// of unasserted groups become `Some(false)`, except that an element already
/// holding `Some(true)` is never narrowed back to false. After the call every
/// element of `vec` is set.
pub fn mask_to_vec(mask: u32, vec: &mut [Option<bool>], group_size: usize) {
    debug_assert!(group_size >= 1, "group size must be at least 1");
    for (i, entry) in vec.iter_mut().enumerate() {
        let bit = i / group_size.max(1);
        let enabled = bit < u32::BITS as usize && (mask >> bit) & 1 == 1;
        if enabled {
            *entry = Some(true);
        } else if *entry != Some(true) {
            *entry = Some(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec(bits: &[u8]) -> Vec<Option<bool>> {
        bits.iter().map(|&b| Some(b != 0)).collect()
    }

    #[test]
    fn per_channel_mask() {
        assert_eq!(vec_to_mask(&vec(&[0, 1, 0, 1]), 1), 0b1010);
        assert_eq!(vec_to_mask(&vec(&[1, 1, 1, 1]), 1), 0b1111);
        assert_eq!(vec_to_mask(&vec(&[0, 0, 0, 0]), 1), 0);
    }

    #[test]
    fn unset_entries_do_not_assert_bits() {
        let v = [None, Some(true), None, None];
        assert_eq!(vec_to_mask(&v, 1), 0b0010);
    }

    #[test]
    fn grouped_mask_sets_bit_if_any_member_enabled() {
        // groups of 2: chunk 0 = {ch0, ch1}, chunk 1 = {ch2, ch3}
        assert_eq!(vec_to_mask(&vec(&[0, 1, 0, 0]), 2), 0b01);
        assert_eq!(vec_to_mask(&vec(&[0, 0, 1, 1]), 2), 0b10);
        assert_eq!(vec_to_mask(&vec(&[1, 0, 0, 1]), 2), 0b11);
    }

    #[test]
    fn aligned_selection_is_group_consistent() {
        // both chunks fully enabled or fully disabled: the group mask expands
        // to exactly the per-channel pattern
        let v = vec(&[1, 1, 0, 0]);
        let group_mask = vec_to_mask(&v, 2);
        let mut expanded = vec![None; 4];
        mask_to_vec(group_mask, &mut expanded, 2);
        assert_eq!(vec_to_mask(&expanded, 1), vec_to_mask(&v, 1));
    }

    #[test]
    fn partial_group_widens_under_group_granularity() {
        let v = vec(&[0, 1, 0, 0]);
        let channel_mask = vec_to_mask(&v, 1);
        let group_mask = vec_to_mask(&v, 2);
        assert_ne!(channel_mask, group_mask);
    }

    #[test]
    fn expansion_is_monotonic() {
        // every channel enabled in the input stays enabled after a round trip
        let v = vec(&[0, 1, 0, 0, 1, 0]);
        let mut round = v.clone();
        mask_to_vec(vec_to_mask(&v, 2), &mut round, 2);
        for (orig, after) in v.iter().zip(&round) {
            if *orig == Some(true) {
                assert_eq!(*after, Some(true));
            }
        }
    }

    #[test]
    fn round_trip_is_idempotent() {
        let v = vec(&[1, 0, 1, 1, 0, 0]);
        let mut once = v.clone();
        mask_to_vec(vec_to_mask(&v, 3), &mut once, 3);
        let mut twice = once.clone();
        mask_to_vec(vec_to_mask(&once, 3), &mut twice, 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn expansion_sets_every_entry() {
        let mut v = vec![None, Some(true), None, None];
        mask_to_vec(0b10, &mut v, 1);
        assert!(v.iter().all(Option::is_some));
        assert_eq!(v, [Some(false), Some(true), Some(false), Some(false)]);
    }

    #[test]
    fn expansion_never_narrows_enabled_entry() {
        let mut v = [Some(true), Some(false)];
        mask_to_vec(0, &mut v, 1);
        assert_eq!(v[0], Some(true));
        assert_eq!(v[1], Some(false));
    }
}
