#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    Draft,
    Finalized,
}

impl PlanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Finalized => "Finalized",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "finalized" => Self::Finalized,
            _ => Self::Draft,
        }
    }
}

impl std::fmt::Display for PlanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct BudgetPlan {
    pub id: Option<i64>,
    pub name: String,
    pub owner_id: i64,
    pub is_predefined: bool,
    pub state: PlanState,
    /// ISO 4217 code of the display currency, if one was chosen.
    pub currency_code: Option<String>,
    pub created_at: String,
}

impl BudgetPlan {
    pub fn new(name: String, owner_id: i64) -> Self {
        Self {
            id: None,
            name,
            owner_id,
            is_predefined: false,
            state: PlanState::Draft,
            currency_code: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state == PlanState::Finalized
    }

    /// A locked plan refuses every mutation on itself and its descendants.
    pub fn is_locked(&self) -> bool {
        self.is_predefined || self.is_finalized()
    }
}

impl std::fmt::Display for BudgetPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
