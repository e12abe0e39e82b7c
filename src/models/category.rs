use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    /// Share of the plan, in percent with two fixed fractional digits.
    pub percentage: Decimal,
    pub plan_id: i64,
}

impl Category {
    pub fn new(name: String, percentage: Decimal, plan_id: i64) -> Self {
        Self {
            id: None,
            name,
            percentage,
            plan_id,
        }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}%", self.name, self.percentage)
    }
}
