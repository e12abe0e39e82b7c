use rust_decimal::Decimal;
use thiserror::Error;

use crate::db::Database;
use crate::ledger;
use crate::models::*;
use crate::validate::{validate_name, validate_percentage};

/// Typed outcome of a refused mutation.
///
/// Every guard operation fails closed: the first violated precondition in
/// the pipeline (authentication, ownership, lock state, field shape,
/// sibling uniqueness, allocation) short-circuits the rest, and nothing is
/// committed on failure. Transport layers map these onto protocol responses.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("caller is not authenticated")]
    Unauthenticated,

    #[error("caller is not allowed to modify this target")]
    Forbidden,

    #[error("plan is locked: {reason}")]
    Locked { reason: &'static str },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: &'static str },

    #[error("a sibling named {name:?} already exists")]
    Conflict { name: String },

    #[error("allocation would exceed 100% (current total is {current_total}%)")]
    AllocationExceeded { current_total: Decimal },

    #[error("allocation for {node:?} is incomplete: percentages total {total}%, need exactly 100%")]
    IncompleteAllocation { node: String, total: Decimal },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("storage failure")]
    Storage(#[from] anyhow::Error),
}

/// Gatekeeper for every mutation of the plan tree.
///
/// Owns the store exclusively, so a guard call's read-total, decide, commit
/// sequence can never interleave with another mutation of the same plan;
/// callers that share a guard across threads wrap it in a mutex.
pub struct Guard {
    db: Database,
}

impl Guard {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Read-only access for queries; mutations go through the guard methods.
    pub fn store(&self) -> &Database {
        &self.db
    }

    // ── Plans ─────────────────────────────────────────────────

    pub fn create_plan(
        &mut self,
        caller: Identity,
        name: &str,
        is_predefined: bool,
        currency_code: Option<&str>,
    ) -> Result<BudgetPlan, GuardError> {
        let user_id = require_user(caller)?;
        if is_predefined && !caller.is_staff() {
            return Err(GuardError::Forbidden);
        }
        validate_name(name).map_err(invalid)?;
        let siblings = self.db.get_plans_for_owner(user_id)?;
        if siblings.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(GuardError::Conflict {
                name: name.to_string(),
            });
        }
        if let Some(code) = currency_code {
            if self.db.get_currency(code)?.is_none() {
                return Err(GuardError::NotFound("currency"));
            }
        }

        let mut plan = BudgetPlan::new(name.to_string(), user_id);
        plan.is_predefined = is_predefined;
        plan.currency_code = currency_code.map(str::to_string);
        let id = self.db.insert_plan(&plan)?;
        plan.id = Some(id);
        tracing::debug!(plan_id = id, "plan created");
        Ok(plan)
    }

    pub fn update_plan(
        &mut self,
        caller: Identity,
        plan_id: i64,
        name: Option<&str>,
    ) -> Result<BudgetPlan, GuardError> {
        let user_id = require_user(caller)?;
        let mut plan = self.owned_plan(user_id, plan_id)?;
        require_unlocked(&plan)?;

        if let Some(new_name) = name {
            validate_name(new_name).map_err(invalid)?;
            let siblings = self.db.get_plans_for_owner(user_id)?;
            if siblings
                .iter()
                .any(|p| p.id != plan.id && p.name.eq_ignore_ascii_case(new_name))
            {
                return Err(GuardError::Conflict {
                    name: new_name.to_string(),
                });
            }
            self.db.update_plan_name(plan_id, new_name)?;
            plan.name = new_name.to_string();
        }
        Ok(plan)
    }

    pub fn delete_plan(&mut self, caller: Identity, plan_id: i64) -> Result<(), GuardError> {
        let user_id = require_user(caller)?;
        let plan = self.owned_plan(user_id, plan_id)?;
        require_unlocked(&plan)?;
        self.db.delete_plan(plan_id)?;
        tracing::debug!(plan_id, "plan deleted");
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    pub fn create_category(
        &mut self,
        caller: Identity,
        name: &str,
        percentage: Decimal,
        plan_id: i64,
    ) -> Result<Category, GuardError> {
        let user_id = require_user(caller)?;
        let plan = self.owned_plan(user_id, plan_id)?;
        require_unlocked(&plan)?;
        validate_name(name).map_err(invalid)?;
        validate_percentage(percentage).map_err(invalid)?;

        let siblings = self.db.get_categories(plan_id)?;
        if Category::find_by_name(&siblings, name).is_some() {
            return Err(GuardError::Conflict {
                name: name.to_string(),
            });
        }
        let check = ledger::check_total(&category_shares(&siblings), None, Some(percentage));
        if !check.ok {
            return Err(GuardError::AllocationExceeded {
                current_total: check.current_total,
            });
        }

        let mut cat = Category::new(name.to_string(), percentage, plan_id);
        let id = self.db.insert_category(&cat)?;
        cat.id = Some(id);
        tracing::debug!(plan_id, category_id = id, "category created");
        Ok(cat)
    }

    pub fn update_category(
        &mut self,
        caller: Identity,
        category_id: i64,
        name: Option<&str>,
        percentage: Option<Decimal>,
    ) -> Result<Category, GuardError> {
        let user_id = require_user(caller)?;
        let mut cat = self
            .db
            .get_category(category_id)?
            .ok_or(GuardError::NotFound("category"))?;
        let plan = self.owned_plan(user_id, cat.plan_id)?;
        require_unlocked(&plan)?;

        if let Some(new_name) = name {
            validate_name(new_name).map_err(invalid)?;
        }
        if let Some(new_pct) = percentage {
            validate_percentage(new_pct).map_err(invalid)?;
        }

        let siblings = self.db.get_categories(cat.plan_id)?;
        if let Some(new_name) = name {
            let clash = Category::find_by_name(&siblings, new_name)
                .is_some_and(|other| other.id != Some(category_id));
            if clash {
                return Err(GuardError::Conflict {
                    name: new_name.to_string(),
                });
            }
        }
        // Name-only updates skip the allocation check; totals only move
        // when the percentage does.
        if let Some(new_pct) = percentage {
            let check = ledger::check_total(
                &category_shares(&siblings),
                Some(category_id),
                Some(new_pct),
            );
            if !check.ok {
                return Err(GuardError::AllocationExceeded {
                    current_total: check.current_total,
                });
            }
        }

        if let Some(new_name) = name {
            cat.name = new_name.to_string();
        }
        if let Some(new_pct) = percentage {
            cat.percentage = new_pct;
        }
        self.db
            .update_category(category_id, &cat.name, cat.percentage)?;
        Ok(cat)
    }

    /// Removal only decreases totals, so no allocation check runs here.
    pub fn delete_category(&mut self, caller: Identity, category_id: i64) -> Result<(), GuardError> {
        let user_id = require_user(caller)?;
        let cat = self
            .db
            .get_category(category_id)?
            .ok_or(GuardError::NotFound("category"))?;
        let plan = self.owned_plan(user_id, cat.plan_id)?;
        require_unlocked(&plan)?;
        self.db.delete_category(category_id)?;
        tracing::debug!(plan_id = cat.plan_id, category_id, "category deleted");
        Ok(())
    }

    // ── Subcategories ─────────────────────────────────────────

    pub fn create_subcategory(
        &mut self,
        caller: Identity,
        name: &str,
        percentage: Decimal,
        category_id: i64,
    ) -> Result<Subcategory, GuardError> {
        let user_id = require_user(caller)?;
        let cat = self
            .db
            .get_category(category_id)?
            .ok_or(GuardError::NotFound("category"))?;
        let plan = self.owned_plan(user_id, cat.plan_id)?;
        require_unlocked(&plan)?;
        validate_name(name).map_err(invalid)?;
        validate_percentage(percentage).map_err(invalid)?;

        let siblings = self.db.get_subcategories(category_id)?;
        if Subcategory::find_by_name(&siblings, name).is_some() {
            return Err(GuardError::Conflict {
                name: name.to_string(),
            });
        }
        let check = ledger::check_total(&subcategory_shares(&siblings), None, Some(percentage));
        if !check.ok {
            return Err(GuardError::AllocationExceeded {
                current_total: check.current_total,
            });
        }

        let mut sub = Subcategory::new(name.to_string(), percentage, category_id);
        let id = self.db.insert_subcategory(&sub)?;
        sub.id = Some(id);
        tracing::debug!(category_id, subcategory_id = id, "subcategory created");
        Ok(sub)
    }

    pub fn update_subcategory(
        &mut self,
        caller: Identity,
        subcategory_id: i64,
        name: Option<&str>,
        percentage: Option<Decimal>,
    ) -> Result<Subcategory, GuardError> {
        let user_id = require_user(caller)?;
        let mut sub = self
            .db
            .get_subcategory(subcategory_id)?
            .ok_or(GuardError::NotFound("subcategory"))?;
        let cat = self
            .db
            .get_category(sub.category_id)?
            .ok_or(GuardError::NotFound("category"))?;
        let plan = self.owned_plan(user_id, cat.plan_id)?;
        require_unlocked(&plan)?;

        if let Some(new_name) = name {
            validate_name(new_name).map_err(invalid)?;
        }
        if let Some(new_pct) = percentage {
            validate_percentage(new_pct).map_err(invalid)?;
        }

        let siblings = self.db.get_subcategories(sub.category_id)?;
        if let Some(new_name) = name {
            let clash = Subcategory::find_by_name(&siblings, new_name)
                .is_some_and(|other| other.id != Some(subcategory_id));
            if clash {
                return Err(GuardError::Conflict {
                    name: new_name.to_string(),
                });
            }
        }
        if let Some(new_pct) = percentage {
            let check = ledger::check_total(
                &subcategory_shares(&siblings),
                Some(subcategory_id),
                Some(new_pct),
            );
            if !check.ok {
                return Err(GuardError::AllocationExceeded {
                    current_total: check.current_total,
                });
            }
        }

        if let Some(new_name) = name {
            sub.name = new_name.to_string();
        }
        if let Some(new_pct) = percentage {
            sub.percentage = new_pct;
        }
        self.db
            .update_subcategory(subcategory_id, &sub.name, sub.percentage)?;
        Ok(sub)
    }

    pub fn delete_subcategory(
        &mut self,
        caller: Identity,
        subcategory_id: i64,
    ) -> Result<(), GuardError> {
        let user_id = require_user(caller)?;
        let sub = self
            .db
            .get_subcategory(subcategory_id)?
            .ok_or(GuardError::NotFound("subcategory"))?;
        let cat = self
            .db
            .get_category(sub.category_id)?
            .ok_or(GuardError::NotFound("category"))?;
        let plan = self.owned_plan(user_id, cat.plan_id)?;
        require_unlocked(&plan)?;
        self.db.delete_subcategory(subcategory_id)?;
        Ok(())
    }

    // ── Finalization ──────────────────────────────────────────

    /// Move a plan from `Draft` to `Finalized`.
    ///
    /// Succeeds only when the plan has at least one category, the
    /// categories total exactly 100%, and every category that has
    /// subcategories sees them total exactly 100% as well. Finalization is
    /// terminal: there is no un-finalize operation.
    pub fn finalize_plan(
        &mut self,
        caller: Identity,
        plan_id: i64,
    ) -> Result<BudgetPlan, GuardError> {
        let user_id = require_user(caller)?;
        let mut plan = self.owned_plan(user_id, plan_id)?;
        require_unlocked(&plan)?;

        let categories = self.db.get_categories(plan_id)?;
        let category_total: Decimal = categories.iter().map(|c| c.percentage).sum();
        if categories.is_empty() || !ledger::is_exact(category_total) {
            tracing::warn!(plan_id, %category_total, "finalize refused");
            return Err(GuardError::IncompleteAllocation {
                node: plan.name.clone(),
                total: category_total,
            });
        }
        for cat in &categories {
            let Some(cat_id) = cat.id else { continue };
            let subs = self.db.get_subcategories(cat_id)?;
            if subs.is_empty() {
                // Bare category: its own percentage is the whole allocation
                // at that level.
                continue;
            }
            let sub_total: Decimal = subs.iter().map(|s| s.percentage).sum();
            if !ledger::is_exact(sub_total) {
                tracing::warn!(plan_id, category_id = cat_id, %sub_total, "finalize refused");
                return Err(GuardError::IncompleteAllocation {
                    node: cat.name.clone(),
                    total: sub_total,
                });
            }
        }

        self.db.set_plan_state(plan_id, PlanState::Finalized)?;
        plan.state = PlanState::Finalized;
        tracing::debug!(plan_id, "plan finalized");
        Ok(plan)
    }

    // ── Pipeline helpers ──────────────────────────────────────

    fn owned_plan(&self, user_id: i64, plan_id: i64) -> Result<BudgetPlan, GuardError> {
        let plan = self
            .db
            .get_plan(plan_id)?
            .ok_or(GuardError::NotFound("plan"))?;
        if plan.owner_id != user_id {
            return Err(GuardError::Forbidden);
        }
        Ok(plan)
    }
}

fn require_user(caller: Identity) -> Result<i64, GuardError> {
    caller.user_id().ok_or(GuardError::Unauthenticated)
}

fn require_unlocked(plan: &BudgetPlan) -> Result<(), GuardError> {
    if plan.is_predefined {
        return Err(GuardError::Locked {
            reason: "plan is predefined",
        });
    }
    if plan.is_finalized() {
        return Err(GuardError::Locked {
            reason: "plan is finalized",
        });
    }
    Ok(())
}

fn invalid(reason: &'static str) -> GuardError {
    GuardError::InvalidInput { reason }
}

fn category_shares(categories: &[Category]) -> Vec<(i64, Decimal)> {
    categories
        .iter()
        .filter_map(|c| c.id.map(|id| (id, c.percentage)))
        .collect()
}

fn subcategory_shares(subcategories: &[Subcategory]) -> Vec<(i64, Decimal)> {
    subcategories
        .iter()
        .filter_map(|s| s.id.map(|id| (id, s.percentage)))
        .collect()
}
