//! Selection sort in its exchange form.
//!
//! `i` is the position being filled; `j` scans the tail. Whenever the
//! scanned element is smaller than the one at `i` the two are exchanged
//! straight away, so position `i` always holds the smallest value seen so
//! far in the round.

use super::Algorithm;
use crate::core::{AlgorithmKind, Cursor, HighlightSets, WorkingSequence};
use serde::{Deserialize, Serialize};

crate::phase_enum! {
    /// Micro-steps of selection sort.
    pub enum SelectionPhase {
        Start => "start",
        Compare => "compare",
        CheckSwap => "check_swap",
        Swap => "swap",
        NextScan => "next_scan",
        FinishRound => "finish_round",
        Done => "done",
    }
    start: Start
    final: Done
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSort {
    values: Vec<i64>,
    cursor: Cursor,
    phase: SelectionPhase,
}

impl SelectionSort {
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            cursor: Cursor::new(0, 1),
            phase: SelectionPhase::Start,
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

impl Algorithm for SelectionSort {
    type Phase = SelectionPhase;

    const KIND: AlgorithmKind = AlgorithmKind::Selection;

    fn phase(&self) -> SelectionPhase {
        self.phase
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn sequence(&self) -> WorkingSequence {
        WorkingSequence::Numbers(self.values.clone())
    }

    fn ready_message(&self) -> String {
        "Sắp xếp Chọn: Nhấn Tiếp theo để bắt đầu.".to_string()
    }

    fn step(&mut self, highlights: &mut HighlightSets) -> Option<String> {
        let n = self.values.len();
        let Cursor { i, j } = self.cursor;

        let message = match self.phase {
            SelectionPhase::Done => return None,
            SelectionPhase::Start if n < 2 => {
                highlights.mark_all_sorted(n);
                self.phase = SelectionPhase::Done;
                "Dãy chỉ có tối đa một phần tử, đã được sắp xếp.".to_string()
            }
            SelectionPhase::Start => {
                highlights.compare([i]);
                self.cursor.j = i + 1;
                self.phase = SelectionPhase::Compare;
                format!(
                    "Vòng lặp thứ {}: Tìm số nhỏ nhất cho vị trí {}. Duyệt các số phía sau.",
                    i + 1,
                    i
                )
            }
            SelectionPhase::Compare => {
                highlights.compare([i, j]);
                self.phase = SelectionPhase::CheckSwap;
                format!(
                    "So sánh vị trí đầu ({}) với vị trí đang xét ({}).",
                    self.values[i], self.values[j]
                )
            }
            SelectionPhase::CheckSwap => {
                let (head, scanned) = (self.values[i], self.values[j]);
                if scanned < head {
                    highlights.swap([i, j]);
                    self.phase = SelectionPhase::Swap;
                    format!("Phát hiện {scanned} < {head}. Đổi chỗ!")
                } else {
                    self.phase = SelectionPhase::NextScan;
                    format!("{scanned} >= {head}. Không đổi.")
                }
            }
            SelectionPhase::Swap => {
                self.values.swap(i, j);
                highlights.clear_swapping();
                self.phase = SelectionPhase::NextScan;
                format!("Đã đổi chỗ: vị trí {} giờ giữ số {}.", i, self.values[i])
            }
            SelectionPhase::NextScan => {
                highlights.clear_comparing();
                if j + 1 < n {
                    self.cursor.j = j + 1;
                    self.phase = SelectionPhase::Compare;
                    format!("Xét tiếp vị trí {}.", j + 1)
                } else {
                    self.phase = SelectionPhase::FinishRound;
                    format!("Đã duyệt hết dãy trong vòng {}.", i + 1)
                }
            }
            SelectionPhase::FinishRound => {
                highlights.mark_sorted(i);
                if i + 2 < n {
                    self.cursor = Cursor::new(i + 1, i + 2);
                    self.phase = SelectionPhase::Start;
                    format!("Kết thúc vòng {}. Chuyển sang vị trí tiếp theo.", i + 1)
                } else {
                    highlights.mark_all_sorted(n);
                    self.phase = SelectionPhase::Done;
                    "Hoàn tất! Dãy đã được sắp xếp tăng dần.".to_string()
                }
            }
        };

        Some(message)
    }
}
