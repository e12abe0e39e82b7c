mod category;
mod currency;
mod identity;
mod plan;
mod subcategory;

pub use category::Category;
pub use currency::Currency;
pub use identity::Identity;
pub use plan::{BudgetPlan, PlanState};
pub use subcategory::Subcategory;
