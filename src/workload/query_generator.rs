//! Query Stream Generator
//!
//! Deterministically enumerates a workload for `n` elements: `n` inserts in
//! ascending order, then one range query per index pair.
//!
//! ```text
//! unordered (n = 3)        ordered (n = 3)
//! k 0                      k 0
//! k 1                      k 1
//! k 2                      k 2
//! q 0 1                    q 0 1   (0,1)
//! q 0 2                    q 0 2   (0,2)
//! q 1 2                    q 0 1   (1,0)
//!                          q 1 2   (1,2)
//!                          q 0 2   (2,0)
//!                          q 1 2   (2,1)
//! ```
//!
//! Ordered mode visits every pair twice on purpose: it stresses repeated
//! queries against identical bounds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core_types::ElementIndex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("element_count must be a non-negative integer (got {0})")]
    NegativeCount(i64),
}

/// Number of elements in a workload. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ElementCount(u64);

impl ElementCount {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for ElementCount {
    type Error = GeneratorError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        u64::try_from(n)
            .map(Self)
            .map_err(|_| GeneratorError::NegativeCount(n))
    }
}

impl fmt::Display for ElementCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How index pairs become range queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingMode {
    /// One query per unordered pair `{i, j}`, `i < j`
    #[default]
    Unordered,
    /// One query per ordered pair `(i, j)`, `i != j`, normalized to `q min max`
    Ordered,
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingMode::Unordered => write!(f, "unordered"),
            PairingMode::Ordered => write!(f, "ordered"),
        }
    }
}

/// One workload line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `k <index>`
    Insert(ElementIndex),
    /// `q <low> <high>`, always `low <= high`
    Range {
        low: ElementIndex,
        high: ElementIndex,
    },
}

impl Command {
    /// Range query over `[min(a, b), max(a, b)]`.
    pub fn range(a: ElementIndex, b: ElementIndex) -> Self {
        Command::Range {
            low: a.min(b),
            high: a.max(b),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Insert(index) => write!(f, "k {}", index),
            Command::Range { low, high } => write!(f, "q {} {}", low, high),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty workload line")]
    Empty,

    #[error("unknown command kind: {0:?}")]
    UnknownKind(String),

    #[error("expected {expected} operand(s) for '{kind}', got {got}")]
    Arity {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid index: {0:?}")]
    InvalidIndex(String),

    #[error("range bounds out of order: {low} > {high}")]
    InvertedRange {
        low: ElementIndex,
        high: ElementIndex,
    },
}

fn parse_index(token: &str) -> Result<ElementIndex, ParseCommandError> {
    token
        .parse()
        .map_err(|_| ParseCommandError::InvalidIndex(token.to_string()))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&kind, operands)) = parts.split_first() else {
            return Err(ParseCommandError::Empty);
        };

        match kind {
            "k" => {
                if operands.len() != 1 {
                    return Err(ParseCommandError::Arity {
                        kind: "k",
                        expected: 1,
                        got: operands.len(),
                    });
                }
                Ok(Command::Insert(parse_index(operands[0])?))
            }
            "q" => {
                if operands.len() != 2 {
                    return Err(ParseCommandError::Arity {
                        kind: "q",
                        expected: 2,
                        got: operands.len(),
                    });
                }
                let low = parse_index(operands[0])?;
                let high = parse_index(operands[1])?;
                if low > high {
                    return Err(ParseCommandError::InvertedRange { low, high });
                }
                Ok(Command::Range { low, high })
            }
            other => Err(ParseCommandError::UnknownKind(other.to_string())),
        }
    }
}

/// Number of range queries a workload of `n` elements carries.
pub fn range_query_count(n: ElementCount, mode: PairingMode) -> u64 {
    let n = n.get();
    if n <= 1 {
        return 0;
    }
    let ordered_pairs = n * (n - 1);
    match mode {
        PairingMode::Unordered => ordered_pairs / 2,
        PairingMode::Ordered => ordered_pairs,
    }
}

/// Phase of stream generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Insert,
    Range,
    Done,
}

/// Lazy, deterministic workload for one `(count, mode)` pair.
///
/// Inserts come first, then range queries; nothing is buffered, so the
/// quadratic query phase never lives in memory.
#[derive(Debug, Clone)]
pub struct QueryStream {
    count: ElementCount,
    mode: PairingMode,
    phase: Phase,
    next_insert: ElementIndex,
    // Pair cursor. Unordered: i < j. Ordered: full square, diagonal skipped.
    i: ElementIndex,
    j: ElementIndex,
}

impl QueryStream {
    pub fn new(count: ElementCount, mode: PairingMode) -> Self {
        let j = match mode {
            PairingMode::Unordered => 1,
            PairingMode::Ordered => 0,
        };
        Self {
            count,
            mode,
            phase: Phase::Insert,
            next_insert: 0,
            i: 0,
            j,
        }
    }

    pub fn element_count(&self) -> ElementCount {
        self.count
    }

    pub fn mode(&self) -> PairingMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Lines in the full stream, regardless of how much has been consumed.
    pub fn total_lines(&self) -> u64 {
        self.count.get() + range_query_count(self.count, self.mode)
    }

    fn emit_insert(&mut self) -> Option<Command> {
        if self.next_insert < self.count.get() {
            let cmd = Command::Insert(self.next_insert);
            self.next_insert += 1;
            Some(cmd)
        } else {
            None
        }
    }

    fn next_unordered(&mut self) -> Option<Command> {
        let n = self.count.get();
        if self.j >= n {
            return None;
        }
        let cmd = Command::Range {
            low: self.i,
            high: self.j,
        };
        self.j += 1;
        if self.j == n {
            self.i += 1;
            self.j = self.i + 1;
        }
        Some(cmd)
    }

    fn next_ordered(&mut self) -> Option<Command> {
        let n = self.count.get();
        while self.i < n {
            let (i, j) = (self.i, self.j);
            self.j += 1;
            if self.j == n {
                self.i += 1;
                self.j = 0;
            }
            if i != j {
                return Some(Command::range(i, j));
            }
        }
        None
    }
}

impl Iterator for QueryStream {
    type Item = Command;

    fn next(&mut self) -> Option<Command> {
        loop {
            match self.phase {
                Phase::Insert => {
                    if let Some(cmd) = self.emit_insert() {
                        return Some(cmd);
                    }
                    // A single element or the empty set has no pair to range over.
                    self.phase = if self.count.get() <= 1 {
                        Phase::Done
                    } else {
                        Phase::Range
                    };
                }
                Phase::Range => {
                    let cmd = match self.mode {
                        PairingMode::Unordered => self.next_unordered(),
                        PairingMode::Ordered => self.next_ordered(),
                    };
                    if cmd.is_some() {
                        return cmd;
                    }
                    self.phase = Phase::Done;
                }
                Phase::Done => return None,
            }
        }
    }
}

/// Workload for `count` elements in `mode`.
pub fn generate(count: ElementCount, mode: PairingMode) -> QueryStream {
    QueryStream::new(count, mode)
}
