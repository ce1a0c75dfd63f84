//! Binary search over an ascending sequence.
//!
//! The input must already be sorted; this is not checked. The window
//! `[low, high]` shrinks on every narrowing step and `mid` is kept inside
//! it until the search resolves.

use super::Algorithm;
use crate::core::{AlgorithmKind, Cursor, HighlightSets, Range, WorkingSequence};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

crate::phase_enum! {
    /// Micro-steps of binary search.
    pub enum BinarySearchPhase {
        Start => "start",
        CalcMid => "calc_mid",
        Compare => "compare",
        GoLeft => "go_left",
        GoRight => "go_right",
        Found => "found",
        NotFound => "not_found",
        Done => "done",
    }
    start: Start
    final: Done
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySearch {
    values: Vec<i64>,
    target: i64,
    range: Range,
    phase: BinarySearchPhase,
}

impl BinarySearch {
    pub fn new(values: Vec<i64>, target: i64) -> Self {
        let range = if values.is_empty() {
            Range::default()
        } else {
            Range::spanning(values.len())
        };
        Self {
            values,
            target,
            range,
            phase: BinarySearchPhase::Start,
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub(crate) fn retarget(&mut self, target: i64) {
        self.target = target;
    }

    fn narrow(&mut self, low: usize, high: usize) {
        self.range = Range {
            low,
            high,
            mid: low + (high - low) / 2,
        };
    }
}

impl Algorithm for BinarySearch {
    type Phase = BinarySearchPhase;

    const KIND: AlgorithmKind = AlgorithmKind::BinarySearch;

    fn phase(&self) -> BinarySearchPhase {
        self.phase
    }

    fn cursor(&self) -> Cursor {
        Cursor::default()
    }

    fn range(&self) -> Option<Range> {
        Some(self.range)
    }

    fn sequence(&self) -> WorkingSequence {
        WorkingSequence::Numbers(self.values.clone())
    }

    fn ready_message(&self) -> String {
        format!("Tìm kiếm nhị phân: Tìm số {} trong dãy.", self.target)
    }

    fn step(&mut self, highlights: &mut HighlightSets) -> Option<String> {
        let Range { low, high, mid } = self.range;
        let target = self.target;

        let message = match self.phase {
            BinarySearchPhase::Done => return None,
            BinarySearchPhase::Start if self.values.is_empty() => {
                self.phase = BinarySearchPhase::NotFound;
                "Dãy rỗng, không có gì để tìm.".to_string()
            }
            BinarySearchPhase::Start => {
                self.phase = BinarySearchPhase::CalcMid;
                format!("Xác định vùng tìm kiếm từ index {low} đến {high}.")
            }
            BinarySearchPhase::CalcMid => {
                let mid = low + (high - low) / 2;
                self.range.mid = mid;
                highlights.compare([mid]);
                self.phase = BinarySearchPhase::Compare;
                format!(
                    "Lấy vị trí giữa Mid = {mid}. Giá trị = {}.",
                    self.values[mid]
                )
            }
            BinarySearchPhase::Compare => {
                let value = self.values[mid];
                match value.cmp(&target) {
                    Ordering::Equal => {
                        self.phase = BinarySearchPhase::Found;
                        format!("Giá trị {value} bằng số cần tìm. TÌM THẤY!")
                    }
                    Ordering::Greater => {
                        self.phase = BinarySearchPhase::GoLeft;
                        format!("{value} > {target}. Tìm nửa TRƯỚC.")
                    }
                    Ordering::Less => {
                        self.phase = BinarySearchPhase::GoRight;
                        format!("{value} < {target}. Tìm nửa SAU.")
                    }
                }
            }
            BinarySearchPhase::GoLeft => {
                highlights.discard(mid, high);
                match mid.checked_sub(1).filter(|new_high| *new_high >= low) {
                    Some(new_high) => {
                        self.narrow(low, new_high);
                        highlights.clear_comparing();
                        self.phase = BinarySearchPhase::CalcMid;
                        format!("Thu hẹp: [{low} - {new_high}].")
                    }
                    None => {
                        self.phase = BinarySearchPhase::NotFound;
                        "Không còn phần tử nào ở nửa TRƯỚC.".to_string()
                    }
                }
            }
            BinarySearchPhase::GoRight => {
                highlights.discard(low, mid);
                let new_low = mid + 1;
                if new_low > high {
                    self.phase = BinarySearchPhase::NotFound;
                    "Không còn phần tử nào ở nửa SAU.".to_string()
                } else {
                    self.narrow(new_low, high);
                    highlights.clear_comparing();
                    self.phase = BinarySearchPhase::CalcMid;
                    format!("Thu hẹp: [{new_low} - {high}].")
                }
            }
            BinarySearchPhase::Found => {
                highlights.mark_found(mid);
                self.phase = BinarySearchPhase::Done;
                format!("KẾT QUẢ: Tìm thấy số {target} tại index {mid}.")
            }
            BinarySearchPhase::NotFound => {
                self.phase = BinarySearchPhase::Done;
                format!("KẾT QUẢ: Không tìm thấy {target}.")
            }
        };

        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::binary_search_values;
    use std::collections::BTreeSet;

    fn run(search: &mut BinarySearch, highlights: &mut HighlightSets) -> Vec<BinarySearchPhase> {
        let mut phases = Vec::new();
        while search.step(highlights).is_some() {
            phases.push(search.phase());
        }
        phases
    }

    #[test]
    fn initial_window_spans_everything() {
        let search = BinarySearch::new(binary_search_values(), 32);
        assert_eq!(search.range(), Some(Range { low: 0, high: 9, mid: 4 }));
    }

    #[test]
    fn first_midpoint_goes_right_for_32() {
        let mut search = BinarySearch::new(binary_search_values(), 32);
        let mut highlights = HighlightSets::new();
        search.step(&mut highlights);
        search.step(&mut highlights);
        assert_eq!(search.range().unwrap().mid, 4);
        assert_eq!(highlights.comparing, BTreeSet::from([4]));

        let message = search.step(&mut highlights).unwrap();
        assert_eq!(search.phase(), BinarySearchPhase::GoRight);
        assert_eq!(message, "25 < 32. Tìm nửa SAU.");

        search.step(&mut highlights);
        assert_eq!(highlights.discarded, (0..=4).collect());
        assert_eq!(search.range(), Some(Range { low: 5, high: 9, mid: 7 }));
    }

    #[test]
    fn finds_32_at_index_5() {
        let mut search = BinarySearch::new(binary_search_values(), 32);
        let mut highlights = HighlightSets::new();
        let phases = run(&mut search, &mut highlights);

        assert!(phases.contains(&BinarySearchPhase::Found));
        assert_eq!(search.range().unwrap().mid, 5);
        assert_eq!(highlights.sorted, BTreeSet::from([5]));
    }

    #[test]
    fn value_below_everything_is_not_found() {
        let mut search = BinarySearch::new(binary_search_values(), 4);
        let mut highlights = HighlightSets::new();
        let phases = run(&mut search, &mut highlights);

        assert!(phases.contains(&BinarySearchPhase::NotFound));
        assert!(!phases.contains(&BinarySearchPhase::Found));
        assert!(highlights.sorted.is_empty());
    }

    #[test]
    fn go_left_at_index_zero_does_not_underflow() {
        let mut search = BinarySearch::new(vec![10], 3);
        let mut highlights = HighlightSets::new();
        let phases = run(&mut search, &mut highlights);
        assert_eq!(
            phases,
            vec![
                BinarySearchPhase::CalcMid,
                BinarySearchPhase::Compare,
                BinarySearchPhase::GoLeft,
                BinarySearchPhase::NotFound,
                BinarySearchPhase::Done,
            ]
        );
        assert_eq!(highlights.discarded, BTreeSet::from([0]));
    }

    #[test]
    fn empty_sequence_is_not_found() {
        let mut search = BinarySearch::new(Vec::new(), 1);
        let mut highlights = HighlightSets::new();
        let phases = run(&mut search, &mut highlights);
        assert_eq!(
            phases,
            vec![BinarySearchPhase::NotFound, BinarySearchPhase::Done]
        );
    }

    #[test]
    fn cursor_is_unused() {
        let search = BinarySearch::new(binary_search_values(), 32);
        assert_eq!(search.cursor(), Cursor::default());
    }
}
