//! Linear search over the customer table, matching names
//! case-insensitively.

use super::Algorithm;
use crate::core::{AlgorithmKind, Cursor, CustomerRecord, HighlightSets, WorkingSequence};
use serde::{Deserialize, Serialize};

crate::phase_enum! {
    /// Micro-steps of linear search.
    pub enum LinearSearchPhase {
        Start => "start",
        Compare => "compare",
        CheckMatch => "check_match",
        CheckEnd => "check_end",
        Found => "found",
        NotFound => "not_found",
        Done => "done",
    }
    start: Start
    final: Done
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearSearch {
    rows: Vec<CustomerRecord>,
    target: String,
    cursor: Cursor,
    phase: LinearSearchPhase,
}

impl LinearSearch {
    pub fn new(rows: Vec<CustomerRecord>, target: impl Into<String>) -> Self {
        Self {
            rows,
            target: target.into(),
            cursor: Cursor::default(),
            phase: LinearSearchPhase::Start,
        }
    }

    pub fn rows(&self) -> &[CustomerRecord] {
        &self.rows
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Replace the target. Only meaningful before the first step.
    pub(crate) fn retarget(&mut self, target: String) {
        self.target = target;
    }

    fn matches(&self, row: &CustomerRecord) -> bool {
        row.name.to_lowercase() == self.target.to_lowercase()
    }
}

impl Algorithm for LinearSearch {
    type Phase = LinearSearchPhase;

    const KIND: AlgorithmKind = AlgorithmKind::LinearSearch;

    fn phase(&self) -> LinearSearchPhase {
        self.phase
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn sequence(&self) -> WorkingSequence {
        WorkingSequence::Records(self.rows.clone())
    }

    fn ready_message(&self) -> String {
        format!("Tìm kiếm tuần tự: Bắt đầu tìm \"{}\".", self.target)
    }

    fn step(&mut self, highlights: &mut HighlightSets) -> Option<String> {
        let n = self.rows.len();
        let i = self.cursor.i;

        let message = match self.phase {
            LinearSearchPhase::Done => return None,
            LinearSearchPhase::Start if n == 0 => {
                self.phase = LinearSearchPhase::NotFound;
                "Bảng rỗng, không có dòng nào để xét.".to_string()
            }
            LinearSearchPhase::Start => {
                highlights.compare([i]);
                self.phase = LinearSearchPhase::Compare;
                format!(
                    "Bước 1: Bắt đầu xét từ dòng đầu tiên (TT = {}).",
                    self.rows[i].sequence_number
                )
            }
            LinearSearchPhase::Compare => {
                highlights.compare([i]);
                self.phase = LinearSearchPhase::CheckMatch;
                format!(
                    "Bước 2: So sánh \"{}\" với \"{}\".",
                    self.rows[i].name, self.target
                )
            }
            LinearSearchPhase::CheckMatch => {
                if self.matches(&self.rows[i]) {
                    self.phase = LinearSearchPhase::Found;
                    "TRÙNG NHAU! Chuyển sang Bước 4.".to_string()
                } else {
                    self.phase = LinearSearchPhase::CheckEnd;
                    "KHÔNG TRÙNG. Chuyển sang dòng tiếp theo.".to_string()
                }
            }
            LinearSearchPhase::CheckEnd => {
                if i + 1 < n {
                    self.cursor.i = i + 1;
                    self.phase = LinearSearchPhase::Compare;
                    format!(
                        "Bước 3: Chưa xét hết. Xét dòng tiếp theo (TT = {}).",
                        self.rows[i + 1].sequence_number
                    )
                } else {
                    self.phase = LinearSearchPhase::NotFound;
                    "Đã xét hết các dòng trong bảng.".to_string()
                }
            }
            LinearSearchPhase::Found => {
                highlights.mark_found(i);
                self.phase = LinearSearchPhase::Done;
                format!(
                    "Bước 4: Tìm thấy khách hàng tại TT: {}!",
                    self.rows[i].sequence_number
                )
            }
            LinearSearchPhase::NotFound => {
                highlights.clear_comparing();
                self.phase = LinearSearchPhase::Done;
                format!("Bước 5: Không tìm thấy \"{}\".", self.target)
            }
        };

        Some(message)
    }
}
