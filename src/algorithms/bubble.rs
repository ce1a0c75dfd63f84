//! Bubble sort, scanning each pass from the bottom up.
//!
//! `i` counts finished passes; `j` walks from the last index down to
//! `i + 1`, comparing `values[j]` with the element just above it.

use super::Algorithm;
use crate::core::{AlgorithmKind, Cursor, HighlightSets, WorkingSequence};
use serde::{Deserialize, Serialize};

crate::phase_enum! {
    /// Micro-steps of bubble sort.
    pub enum BubblePhase {
        Start => "start",
        NextJ => "next_j",
        Compare => "compare",
        Swap => "swap",
        Advance => "advance",
        Done => "done",
    }
    start: Start
    final: Done
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleSort {
    values: Vec<i64>,
    cursor: Cursor,
    phase: BubblePhase,
}

impl BubbleSort {
    pub fn new(values: Vec<i64>) -> Self {
        let j = values.len().saturating_sub(1);
        Self {
            values,
            cursor: Cursor::new(0, j),
            phase: BubblePhase::Start,
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

impl Algorithm for BubbleSort {
    type Phase = BubblePhase;

    const KIND: AlgorithmKind = AlgorithmKind::Bubble;

    fn phase(&self) -> BubblePhase {
        self.phase
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn sequence(&self) -> WorkingSequence {
        WorkingSequence::Numbers(self.values.clone())
    }

    fn ready_message(&self) -> String {
        "Sắp xếp Nổi bọt: Nhấn Tiếp theo để bắt đầu.".to_string()
    }

    fn step(&mut self, highlights: &mut HighlightSets) -> Option<String> {
        let n = self.values.len();
        let Cursor { i, j } = self.cursor;

        let message = match self.phase {
            BubblePhase::Done => return None,
            BubblePhase::Start | BubblePhase::NextJ if n < 2 => {
                highlights.mark_all_sorted(n);
                self.phase = BubblePhase::Done;
                "Dãy chỉ có tối đa một phần tử, đã được sắp xếp.".to_string()
            }
            BubblePhase::Start | BubblePhase::NextJ => {
                highlights.clear_swapping();
                highlights.compare([j, j - 1]);
                self.phase = BubblePhase::Compare;
                format!(
                    "So sánh cặp từ đáy lên: {} và {}",
                    self.values[j],
                    self.values[j - 1]
                )
            }
            BubblePhase::Compare => {
                let (lower, upper) = (self.values[j], self.values[j - 1]);
                if lower < upper {
                    highlights.swap([j, j - 1]);
                    self.phase = BubblePhase::Swap;
                    format!("Số {lower} nhỏ hơn {upper} nên sẽ nổi lên trên.")
                } else {
                    self.phase = BubblePhase::Advance;
                    format!("{lower} không nhỏ hơn, giữ nguyên vị trí.")
                }
            }
            BubblePhase::Swap => {
                self.values.swap(j, j - 1);
                highlights.clear_swapping();
                self.phase = BubblePhase::Advance;
                format!(
                    "Đổi chỗ: {} nổi lên vị trí {}.",
                    self.values[j - 1],
                    j - 1
                )
            }
            BubblePhase::Advance => {
                highlights.clear_comparing();
                if j > i + 1 {
                    self.cursor.j = j - 1;
                    self.phase = BubblePhase::NextJ;
                    "Chuyển lên cặp tiếp theo.".to_string()
                } else {
                    highlights.mark_sorted(i);
                    if i + 2 < n {
                        self.cursor = Cursor::new(i + 1, n - 1);
                        self.phase = BubblePhase::NextJ;
                        "Xong một vòng! Số nhỏ nhất lượt này đã ở đỉnh ống.".to_string()
                    } else {
                        highlights.mark_all_sorted(n);
                        self.phase = BubblePhase::Done;
                        "Hoàn thành sắp xếp nổi bọt!".to_string()
                    }
                }
            }
        };

        Some(message)
    }
}
