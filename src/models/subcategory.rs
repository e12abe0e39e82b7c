use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Subcategory {
    pub id: Option<i64>,
    pub name: String,
    /// Share of the parent category, in percent with two fixed fractional digits.
    pub percentage: Decimal,
    pub category_id: i64,
}

impl Subcategory {
    pub fn new(name: String, percentage: Decimal, category_id: i64) -> Self {
        Self {
            id: None,
            name,
            percentage,
            category_id,
        }
    }

    /// Find a subcategory by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(subcategories: &'a [Subcategory], name: &str) -> Option<&'a Subcategory> {
        let lower = name.to_lowercase();
        subcategories.iter().find(|s| s.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for Subcategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}%", self.name, self.percentage)
    }
}
