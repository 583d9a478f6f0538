use crate::internal::range::{ByteRange, DEFAULT_HUNKS, RangePlanError, RangePlanner};

fn assert_partition(ranges: &[ByteRange], len: u64) {
    assert_eq!(ranges.first().map(ByteRange::lower), Some(0));
    for pair in ranges.windows(2) {
        assert_eq!(pair[0].end(), pair[1].lower(), "ranges must be contiguous");
    }
    assert_eq!(ranges.last().map(ByteRange::end), Some(len));
    assert_eq!(ranges.iter().map(ByteRange::len).sum::<u64>(), len);
}

#[test]
fn plans_cover_content_without_overlap() {
    for hunks in 1..=16usize {
        let planner = RangePlanner::new(hunks);
        for len in 0..=257u64 {
            let ranges = planner.plan(len).unwrap();
            assert_partition(&ranges, len);

            if len < hunks as u64 {
                assert_eq!(ranges.len(), 1, "len={len} hunks={hunks}");
            } else {
                assert_eq!(ranges.len(), hunks, "len={len} hunks={hunks}");
                let hunk_size = len / hunks as u64;
                for range in &ranges[..hunks - 1] {
                    assert_eq!(range.len(), hunk_size);
                }
            }
        }
    }
}

#[test]
fn twenty_bytes_in_two_hunks() {
    let ranges = RangePlanner::new(2).plan(20).unwrap();
    assert_eq!(ranges, vec![ByteRange::new(0, 10), ByteRange::new(10, 20)]);
    assert_eq!(ranges[0].range_header(), "bytes=0-9");
    assert_eq!(ranges[1].range_header(), "bytes=10-19");
    assert_eq!(ranges[0].upper(), Some(9));
    assert_eq!(ranges[1].upper(), Some(19));
}

#[test]
fn remainder_goes_to_last_range() {
    let ranges = RangePlanner::new(4).plan(23).unwrap();
    let lens: Vec<u64> = ranges.iter().map(ByteRange::len).collect();
    assert_eq!(lens, vec![5, 5, 5, 8]);
}

#[test]
fn short_content_is_a_single_range() {
    let ranges = RangePlanner::new(10).plan(7).unwrap();
    assert_eq!(ranges, vec![ByteRange::new(0, 7)]);
    assert_eq!(ranges[0].to_string(), "bytes=0-6");
}

#[test]
fn zero_length_yields_single_empty_range() {
    let ranges = RangePlanner::default().plan(0).unwrap();
    assert_eq!(ranges.len(), 1);
    assert!(ranges[0].is_empty());
    assert_eq!(ranges[0].upper(), None);
}

#[test]
fn zero_hunks_is_a_planning_error() {
    assert_eq!(RangePlanner::new(0).plan(100), Err(RangePlanError::ZeroHunks));
    assert_eq!(RangePlanner::new(0).plan(0), Err(RangePlanError::ZeroHunks));
}

#[test]
fn default_planner_uses_ten_hunks() {
    assert_eq!(RangePlanner::default().hunks(), DEFAULT_HUNKS);
    assert_eq!(RangePlanner::default().plan(1000).unwrap().len(), 10);
}

#[test]
fn very_large_content_length() {
    let len = u64::MAX / 3;
    let ranges = RangePlanner::new(7).plan(len).unwrap();
    assert_eq!(ranges.len(), 7);
    assert_partition(&ranges, len);
}
