//! The log of past solver calculations.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of calculations kept.
pub const DEFAULT_CALCULATION_LIMIT: usize = 100;

/// A solved expression and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub expression: String,
    pub answer: String,
}

impl Calculation {
    pub fn new(expression: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            answer: answer.into(),
        }
    }
}

/// Bounded, oldest-first list of calculations.
#[derive(Debug, Clone)]
pub struct CalculationLog {
    entries: VecDeque<Calculation>,
    limit: usize,
}

impl Default for CalculationLog {
    fn default() -> Self {
        Self::with_limit(DEFAULT_CALCULATION_LIMIT)
    }
}

impl CalculationLog {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Build a log from stored entries, keeping only the newest `limit`.
    pub fn from_entries(entries: Vec<Calculation>, limit: usize) -> Self {
        let mut log = Self::with_limit(limit);
        for entry in entries {
            log.push(entry);
        }
        log
    }

    /// Append a calculation, dropping the oldest past the limit.
    pub fn push(&mut self, calculation: Calculation) {
        self.entries.push_back(calculation);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn get(&self, index: usize) -> Option<&Calculation> {
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Calculation> {
        self.entries.iter()
    }

    /// Entries as a contiguous vector, oldest first.
    pub fn to_vec(&self) -> Vec<Calculation> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
