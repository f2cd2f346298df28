//! Resource accounting for one evaluation.

use std::time::Instant;

use log::debug;

use crate::{
    config::LimitsConfig,
    fault::{Fault, FaultKind},
    value::{Sequence, Value},
};

/// Operations between two reads of the clock.
const CLOCK_INTERVAL: u64 = 1024;

/// Operation counter, deadline and size limits shared by the interpreter and
/// the vocabulary.
#[derive(Debug)]
pub(crate) struct Sandbox {
    limits: LimitsConfig,
    operations: u64,
    since_clock: u64,
    /// `None` when the timeout is too large to represent
    deadline: Option<Instant>,
}

impl Sandbox {
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            limits,
            operations: 0,
            since_clock: 0,
            deadline: Instant::now().checked_add(limits.timeout()),
        }
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Accounts for one interpreter step.
    pub fn tick(&mut self) -> Result<(), Fault> {
        self.charge(1)
    }

    /// Accounts for `cost` steps, failing once the budget or the deadline is
    /// exceeded.
    pub fn charge(&mut self, cost: u64) -> Result<(), Fault> {
        self.operations = self.operations.saturating_add(cost);
        if self.operations > self.limits.max_operations() {
            debug!(operations = self.operations; "Operation budget exhausted");
            return Err(Fault::new(
                FaultKind::Timeout,
                format!(
                    "evaluation exceeded the budget of {} operations",
                    self.limits.max_operations()
                ),
            ));
        }

        self.since_clock = self.since_clock.saturating_add(cost);
        if self.since_clock >= CLOCK_INTERVAL {
            self.since_clock = 0;
            self.check_deadline()?;
        }
        Ok(())
    }

    pub fn check_deadline(&self) -> Result<(), Fault> {
        match self.deadline {
            Some(deadline) if Instant::now() > deadline => {
                debug!(operations = self.operations; "Deadline passed");
                Err(Fault::new(
                    FaultKind::Timeout,
                    format!(
                        "evaluation exceeded the time limit of {} ms",
                        self.limits.timeout().as_millis()
                    ),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Fails if a collection of `len` items may not be built.
    pub fn check_len(&self, len: usize) -> Result<(), Fault> {
        let max = self.limits.max_collection_len();
        if len > max {
            return Err(Fault::runtime(format!(
                "collection of length {len} exceeds the limit of {max}"
            )));
        }
        Ok(())
    }

    /// Fails if `value` is longer or more deeply nested than allowed.
    pub fn check_value(&self, value: &Value) -> Result<(), Fault> {
        match value {
            Value::List(items) | Value::Tuple(items) => self.check_sequence(items),
            Value::Str(text) => self.check_len(text.len()),
            _ => Ok(()),
        }
    }

    pub fn check_sequence(&self, items: &Sequence) -> Result<(), Fault> {
        self.check_len(items.len())?;
        let max = self.limits.max_value_depth();
        if items.depth() > max {
            return Err(Fault::runtime(format!(
                "value nesting depth exceeds the limit of {max}"
            )));
        }
        Ok(())
    }
}
