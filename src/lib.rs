//! Budget plan allocation engine.
//!
//! A plan splits into categories and categories split into subcategories,
//! each holding a percentage share of its parent. The [`Guard`] enforces the
//! allocation rules on every mutation: sibling percentages never exceed 100%
//! while a plan is editable, and a plan finalizes only when every populated
//! level reconciles to exactly 100%. Transport, auth token issuance, and
//! currency conversion live outside this crate; callers pass an [`Identity`]
//! into each guard operation.

mod db;
mod guard;
mod ledger;
mod models;
mod validate;

pub use db::Database;
pub use guard::{Guard, GuardError};
pub use ledger::{check_total, TotalCheck};
pub use models::{BudgetPlan, Category, Currency, Identity, PlanState, Subcategory};
pub use validate::{validate_name, validate_percentage};
