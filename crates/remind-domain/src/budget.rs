//! Domain types representing category budgets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Monthly spending limit attached to a category. The period is always the
/// calendar month containing the evaluation instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub category_id: Uuid,
    pub category_name: String,
    pub limit_amount: f64,
}

impl Budget {
    pub fn new(category_name: impl Into<String>, limit_amount: f64) -> Self {
        Self {
            category_id: Uuid::new_v4(),
            category_name: category_name.into(),
            limit_amount,
        }
    }

    /// Returns `true` when the limit can be used as a divisor.
    pub fn has_valid_limit(&self) -> bool {
        self.limit_amount.is_finite() && self.limit_amount > 0.0
    }

    /// Share of the limit consumed by `spend`, as a whole percentage rounded half away from zero.
    ///
    /// Returns `None` when the limit is not a positive finite amount.
    pub fn percent_used(&self, spend: f64) -> Option<i64> {
        if !self.has_valid_limit() || !spend.is_finite() {
            return None;
        }
        Some((spend / self.limit_amount * 100.0).round() as i64)
    }
}

impl NamedEntity for Budget {
    fn name(&self) -> &str {
        &self.category_name
    }
}
