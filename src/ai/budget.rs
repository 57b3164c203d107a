//! Remote-evaluation budget
//!
//! Bounds how many successful LLM evaluations one scorer (or every scorer
//! sharing the same `Arc<LlmBudget>`) may spend. A call reserves a slot with
//! [`LlmBudget::try_acquire`]; the slot counts as used only once the permit is
//! committed, and is handed back if the permit is dropped uncommitted. The used
//! count never goes down.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct BudgetState {
    used: u32,
    in_flight: u32,
}

#[derive(Debug)]
pub struct LlmBudget {
    limit: u32,
    state: Mutex<BudgetState>,
}

impl LlmBudget {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            state: Mutex::new(BudgetState::default()),
        }
    }

    pub fn shared(limit: u32) -> Arc<Self> {
        Arc::new(Self::new(limit))
    }

    /// A budget with nothing left to spend
    pub fn exhausted(limit: u32) -> Self {
        Self {
            limit,
            state: Mutex::new(BudgetState {
                used: limit,
                in_flight: 0,
            }),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Successful remote evaluations so far
    pub fn used(&self) -> u32 {
        self.state().used
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Reserve one evaluation, or `None` if used + in-flight reservations
    /// already reach the limit
    pub fn try_acquire(&self) -> Option<BudgetPermit<'_>> {
        let mut state = self.state();
        if state.used + state.in_flight >= self.limit {
            return None;
        }
        state.in_flight += 1;
        Some(BudgetPermit {
            budget: self,
            committed: false,
        })
    }

    fn state(&self) -> MutexGuard<'_, BudgetState> {
        // The state is two counters; a panic elsewhere cannot leave it torn
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A reserved evaluation slot
#[derive(Debug)]
pub struct BudgetPermit<'a> {
    budget: &'a LlmBudget,
    committed: bool,
}

impl BudgetPermit<'_> {
    /// Count the reserved evaluation as spent
    pub fn commit(mut self) {
        let mut state = self.budget.state();
        state.in_flight -= 1;
        state.used += 1;
        self.committed = true;
    }
}

impl Drop for BudgetPermit<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.budget.state().in_flight -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_commit_counts_usage() {
        let budget = LlmBudget::new(2);
        budget.try_acquire().unwrap().commit();
        assert_eq!(budget.used(), 1);
        assert_eq!(budget.remaining(), 1);
        budget.try_acquire().unwrap().commit();
        assert!(budget.is_exhausted());
        assert!(budget.try_acquire().is_none());
    }

    #[test]
    fn test_dropped_permit_is_released() {
        let budget = LlmBudget::new(1);
        {
            let _permit = budget.try_acquire().unwrap();
            assert!(budget.try_acquire().is_none(), "slot is reserved while in flight");
        }
        assert_eq!(budget.used(), 0);
        assert!(budget.try_acquire().is_some());
    }

    #[test]
    fn test_exhausted_and_zero_budgets() {
        let budget = LlmBudget::exhausted(5);
        assert_eq!(budget.used(), 5);
        assert!(budget.try_acquire().is_none());
        assert!(LlmBudget::new(0).try_acquire().is_none());
    }

    #[test]
    fn test_concurrent_use_never_exceeds_limit() {
        let budget = LlmBudget::shared(25);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let budget = Arc::clone(&budget);
                thread::spawn(move || {
                    let mut spent = 0;
                    for _ in 0..10 {
                        if let Some(permit) = budget.try_acquire() {
                            permit.commit();
                            spent += 1;
                        }
                    }
                    spent
                })
            })
            .collect();
        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 25);
        assert_eq!(budget.used(), 25);
    }
}
