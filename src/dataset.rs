//! Fixed input data for each algorithm.
//!
//! Every accessor returns a fresh copy, so callers may mutate the result
//! freely without affecting later resets.

use crate::core::{AlgorithmKind, CustomerRecord, WorkingSequence};

pub const BUBBLE_DATA: [i64; 4] = [4, 2, 3, 1];

pub const SELECTION_DATA: [i64; 5] = [3, 4, 1, 5, 2];

/// Sorted ascending; binary search relies on it.
pub const BINARY_SEARCH_DATA: [i64; 10] = [3, 9, 14, 18, 25, 32, 47, 56, 60, 75];

const CUSTOMERS: [(u32, &str, &str); 5] = [
    (1, "Nguyễn An", "Xóm 1, Nghĩa Lộ, Vòng Xuyên"),
    (2, "Trần Bình", "Xóm 3, Thư Trai"),
    (3, "Hoàng Mai", "Số 3, tổ 7, Phúc Hoà"),
    (4, "Thanh Trúc", "Xóm 2, Lục Xuân, Hoà Hưng"),
    (5, "Nguyễn Hoà", "Số 69 đường Ngô Quyền"),
];

pub fn bubble_values() -> Vec<i64> {
    BUBBLE_DATA.to_vec()
}

pub fn selection_values() -> Vec<i64> {
    SELECTION_DATA.to_vec()
}

pub fn binary_search_values() -> Vec<i64> {
    BINARY_SEARCH_DATA.to_vec()
}

pub fn customer_table() -> Vec<CustomerRecord> {
    CUSTOMERS
        .iter()
        .map(|&(sequence_number, name, address)| CustomerRecord {
            sequence_number,
            name: name.to_string(),
            address: address.to_string(),
        })
        .collect()
}

/// The initial working sequence for `kind`.
pub fn dataset_for(kind: AlgorithmKind) -> WorkingSequence {
    match kind {
        AlgorithmKind::Bubble => WorkingSequence::Numbers(bubble_values()),
        AlgorithmKind::Selection => WorkingSequence::Numbers(selection_values()),
        AlgorithmKind::LinearSearch => WorkingSequence::Records(customer_table()),
        AlgorithmKind::BinarySearch => WorkingSequence::Numbers(binary_search_values()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_sizes_match_each_kind() {
        assert_eq!(dataset_for(AlgorithmKind::Bubble).len(), 4);
        assert_eq!(dataset_for(AlgorithmKind::Selection).len(), 5);
        assert_eq!(dataset_for(AlgorithmKind::LinearSearch).len(), 5);
        assert_eq!(dataset_for(AlgorithmKind::BinarySearch).len(), 10);
    }

    #[test]
    fn linear_search_gets_records_and_others_get_numbers() {
        for kind in AlgorithmKind::ALL {
            let data = dataset_for(kind);
            match kind {
                AlgorithmKind::LinearSearch => assert!(data.as_records().is_some()),
                _ => assert!(data.as_numbers().is_some()),
            }
        }
    }

    #[test]
    fn each_call_returns_a_fresh_copy() {
        let mut first = bubble_values();
        first.swap(0, 3);
        assert_eq!(bubble_values(), vec![4, 2, 3, 1]);
    }

    #[test]
    fn binary_search_data_is_sorted() {
        assert!(BINARY_SEARCH_DATA.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn customer_numbers_are_sequential() {
        let table = customer_table();
        let numbers: Vec<u32> = table.iter().map(|r| r.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(table[2].name, "Hoàng Mai");
    }
}
