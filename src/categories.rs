/// Categories seeded into every store. They can never be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultCategory {
    Salaries,
    Payments,
    Purchases,
    Garbage,
    Electricity,
    Internet,
    MobilePlan,
    Maintenance,
    Rent,
    Visa,
    Cash,
    PersonalExpenses,
}

impl DefaultCategory {
    pub fn name(&self) -> &'static str {
        match self {
            DefaultCategory::Salaries => "Salaries",
            DefaultCategory::Payments => "Payments",
            DefaultCategory::Purchases => "Purchases",
            DefaultCategory::Garbage => "Garbage",
            DefaultCategory::Electricity => "Electricity",
            DefaultCategory::Internet => "Internet",
            DefaultCategory::MobilePlan => "Mobile Plan",
            DefaultCategory::Maintenance => "Maintenance",
            DefaultCategory::Rent => "Rent",
            DefaultCategory::Visa => "Visa",
            DefaultCategory::Cash => "Cash",
            DefaultCategory::PersonalExpenses => "Personal Expenses",
        }
    }

    /// Seeding order. Category ids follow it on a fresh store.
    pub fn all() -> &'static [DefaultCategory] {
        &[
            DefaultCategory::Salaries,
            DefaultCategory::Payments,
            DefaultCategory::Purchases,
            DefaultCategory::Garbage,
            DefaultCategory::Electricity,
            DefaultCategory::Internet,
            DefaultCategory::MobilePlan,
            DefaultCategory::Maintenance,
            DefaultCategory::Rent,
            DefaultCategory::Visa,
            DefaultCategory::Cash,
            DefaultCategory::PersonalExpenses,
        ]
    }

    pub fn from_name(name: &str) -> Option<DefaultCategory> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    pub fn is_default(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

/// Category a daily closure books its "expenses" amount against.
/// Not one of the defaults, so it only exists once created.
pub const CLOSURE_EXPENSES: &str = "Expenses";

/// Categories written by a daily closure, in insertion order.
pub const CLOSURE_CATEGORIES: [&str; 3] = ["Visa", "Cash", CLOSURE_EXPENSES];

/// Categories shown by the visa/cash monthly listing.
pub const VISA_CASH_CATEGORIES: [&str; 4] =
    ["Visa", "Cash", "Personal Expenses", CLOSURE_EXPENSES];
