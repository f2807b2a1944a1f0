//! Reorder Buffer (ROB) for speculative in-order commit.
//!
//! The ROB is a circular buffer that tracks in-flight instructions from issue
//! through commit. It provides:
//! 1. **Allocation:** Assigns unique tags to instructions at issue.
//! 2. **Completion:** Records results as stations finish and broadcast.
//! 3. **In-order Commit:** Retires instructions from the head in program order.
//! 4. **Flush:** Squashes all speculative entries after a misprediction.
//!
//! Tags come from a monotonically increasing counter, so comparing tag
//! numbers gives program-order age. Live entries always form a contiguous
//! window from head to tail.

use crate::isa::instruction::Instruction;

/// Unique tag identifying an in-flight instruction in the ROB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RobTag(pub u64);

/// Lifecycle state of a ROB entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RobState {
    /// Entry allocated; operands possibly still pending in a station.
    Issued,
    /// A functional unit is executing (or has finished, awaiting broadcast).
    Executing,
    /// Result broadcast; commit still has a register write to perform.
    Written,
    /// Nothing left but retirement (branches, RET, finished stores).
    ReadyToCommit,
}

impl RobState {
    /// True when the entry may retire from the ROB head.
    #[inline]
    pub fn committable(self) -> bool {
        matches!(self, RobState::Written | RobState::ReadyToCommit)
    }
}

/// A single entry in the Reorder Buffer.
#[derive(Clone, Debug)]
pub struct RobEntry {
    /// Unique tag for this entry.
    pub tag: RobTag,
    /// The in-flight instruction.
    pub inst: Instruction,
    /// Current lifecycle state.
    pub state: RobState,
    /// Architectural register written at commit, if any.
    pub dest_reg: Option<usize>,
    /// Result value (arithmetic/LOAD result, CALL link address, STORE data).
    pub value: u16,
    /// Effective memory address for STORE, set at execute finish.
    pub dest_addr: Option<i64>,
    /// Fetch PC chosen at issue (not-taken fall-through, CALL/RET target).
    pub predicted_next_pc: u16,
    /// Resolved next PC, set at write-result for control instructions.
    pub actual_next_pc: u16,
    /// True when `actual_next_pc` differs from `predicted_next_pc`.
    pub mispredicted: bool,
    /// Timeline row stamped as this instruction moves through the stages.
    pub row: usize,
}

/// Reorder Buffer: circular buffer for in-order commit.
pub struct Rob {
    slots: Vec<Option<RobEntry>>,
    head: usize,
    tail: usize,
    count: usize,
    next_tag: u64,
}

impl Rob {
    /// Creates a new ROB with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            count: 0,
            next_tag: 1,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the ROB is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the ROB is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Allocates an entry at the tail. Returns `None` if the ROB is full.
    pub fn allocate(
        &mut self,
        inst: Instruction,
        dest_reg: Option<usize>,
        predicted_next_pc: u16,
        row: usize,
    ) -> Option<RobTag> {
        if self.is_full() {
            return None;
        }

        let tag = RobTag(self.next_tag);
        self.next_tag += 1;

        self.slots[self.tail] = Some(RobEntry {
            tag,
            inst,
            state: RobState::Issued,
            dest_reg,
            value: 0,
            dest_addr: None,
            predicted_next_pc,
            actual_next_pc: predicted_next_pc,
            mispredicted: false,
            row,
        });

        self.tail = (self.tail + 1) % self.slots.len();
        self.count += 1;
        Some(tag)
    }

    /// Returns a reference to the head entry (oldest), if non-empty.
    pub fn peek_head(&self) -> Option<&RobEntry> {
        if self.count == 0 {
            None
        } else {
            self.slots[self.head].as_ref()
        }
    }

    /// Retires the head entry if it is committable.
    ///
    /// Returns `None` when the ROB is empty or the head has not yet reached
    /// a committable state.
    pub fn commit_head(&mut self) -> Option<RobEntry> {
        let ready = self
            .peek_head()
            .is_some_and(|entry| entry.state.committable());
        if !ready {
            return None;
        }

        let entry = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
        entry
    }

    /// Flushes all entries (misprediction squash).
    pub fn flush_all(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Finds the entry with the given tag.
    pub fn find_entry(&self, tag: RobTag) -> Option<&RobEntry> {
        let mut idx = self.head;
        for _ in 0..self.count {
            if let Some(entry) = &self.slots[idx]
                && entry.tag == tag
            {
                return Some(entry);
            }
            idx = (idx + 1) % self.slots.len();
        }
        None
    }

    /// Finds the entry with the given tag, mutably.
    pub fn find_entry_mut(&mut self, tag: RobTag) -> Option<&mut RobEntry> {
        let len = self.slots.len();
        let mut idx = self.head;
        for _ in 0..self.count {
            let found = self.slots[idx]
                .as_ref()
                .is_some_and(|entry| entry.tag == tag);
            if found {
                return self.slots[idx].as_mut();
            }
            idx = (idx + 1) % len;
        }
        None
    }

    /// Iterates all live entries from head to tail.
    pub fn for_each(&self, mut f: impl FnMut(&RobEntry)) {
        let mut idx = self.head;
        for _ in 0..self.count {
            if let Some(entry) = &self.slots[idx] {
                f(entry);
            }
            idx = (idx + 1) % self.slots.len();
        }
    }
}
