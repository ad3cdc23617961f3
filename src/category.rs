//! The fixed set of categories used to label transactions and budgets.

use std::{fmt::Display, ops::Index, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize, ser::SerializeMap};

use crate::Error;

/// A spending or income label for transactions and budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Groceries and eating out.
    Food,
    /// Fuel and fares.
    Transport,
    /// Clothing and household goods.
    Shopping,
    /// Doctor visits and prescriptions.
    Health,
    /// Power and internet bills.
    Utilities,
    /// Streaming and nights out.
    Entertainment,
    /// Housing costs.
    Rent,
    /// Regular employment income.
    Salary,
    /// Anything that does not fit the other categories, including secondary income.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Health,
        Category::Utilities,
        Category::Entertainment,
        Category::Rent,
        Category::Salary,
        Category::Other,
    ];

    /// The name of the category as it appears on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Rent => "Rent",
            Category::Salary => "Salary",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The categories that can have a monthly budget, i.e. the kinds of spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    /// See [Category::Food].
    Food,
    /// See [Category::Transport].
    Transport,
    /// See [Category::Shopping].
    Shopping,
    /// See [Category::Health].
    Health,
    /// See [Category::Utilities].
    Utilities,
    /// See [Category::Entertainment].
    Entertainment,
    /// See [Category::Rent].
    Rent,
}

impl ExpenseCategory {
    /// The number of expense categories.
    pub const COUNT: usize = 7;

    /// Every expense category. The first entry is the default category.
    pub const ALL: [ExpenseCategory; ExpenseCategory::COUNT] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Shopping,
        ExpenseCategory::Health,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Rent,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl From<ExpenseCategory> for Category {
    fn from(value: ExpenseCategory) -> Self {
        match value {
            ExpenseCategory::Food => Category::Food,
            ExpenseCategory::Transport => Category::Transport,
            ExpenseCategory::Shopping => Category::Shopping,
            ExpenseCategory::Health => Category::Health,
            ExpenseCategory::Utilities => Category::Utilities,
            ExpenseCategory::Entertainment => Category::Entertainment,
            ExpenseCategory::Rent => Category::Rent,
        }
    }
}

impl TryFrom<Category> for ExpenseCategory {
    type Error = Error;

    fn try_from(value: Category) -> Result<Self, Self::Error> {
        match value {
            Category::Food => Ok(ExpenseCategory::Food),
            Category::Transport => Ok(ExpenseCategory::Transport),
            Category::Shopping => Ok(ExpenseCategory::Shopping),
            Category::Health => Ok(ExpenseCategory::Health),
            Category::Utilities => Ok(ExpenseCategory::Utilities),
            Category::Entertainment => Ok(ExpenseCategory::Entertainment),
            Category::Rent => Ok(ExpenseCategory::Rent),
            Category::Salary | Category::Other => {
                Err(Error::InvalidCategory(value.as_str().to_owned()))
            }
        }
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Category::from(*self))
    }
}

/// A value for every [ExpenseCategory].
///
/// Lookups cannot fail since every category always has an entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseMap<T>([T; ExpenseCategory::COUNT]);

impl<T> ExpenseMap<T> {
    /// Build a map by calling `f` once for each category in [ExpenseCategory::ALL] order.
    pub fn from_fn(f: impl FnMut(ExpenseCategory) -> T) -> Self {
        Self(ExpenseCategory::ALL.map(f))
    }

    /// Iterate over the categories and their values in [ExpenseCategory::ALL] order.
    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, &T)> {
        ExpenseCategory::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate over the values in [ExpenseCategory::ALL] order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// Create a new map by applying `f` to every value.
    pub fn map<U>(&self, mut f: impl FnMut(ExpenseCategory, &T) -> U) -> ExpenseMap<U> {
        ExpenseMap::from_fn(|category| f(category, &self[category]))
    }
}

impl<T> Index<ExpenseCategory> for ExpenseMap<T> {
    type Output = T;

    fn index(&self, category: ExpenseCategory) -> &Self::Output {
        &self.0[category.index()]
    }
}

impl<T: Serialize> Serialize for ExpenseMap<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ExpenseCategory::COUNT))?;

        for (category, value) in self.iter() {
            map.serialize_entry(Category::from(category).as_str(), value)?;
        }

        map.end()
    }
}

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The name of the type as it appears on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod category_tests {
    use crate::{Category, Error, ExpenseCategory};

    #[test]
    fn parses_every_category_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn parse_fails_on_unknown_name() {
        assert_eq!(
            "Freelance".parse::<Category>(),
            Err(Error::InvalidCategory("Freelance".to_owned()))
        );
    }

    #[test]
    fn serializes_with_exact_names() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();

        assert_eq!(json, "\"Entertainment\"");
    }

    #[test]
    fn expense_categories_round_trip_through_category() {
        for expense_category in ExpenseCategory::ALL {
            let category = Category::from(expense_category);

            assert_eq!(ExpenseCategory::try_from(category), Ok(expense_category));
        }
    }

    #[test]
    fn income_categories_are_not_expense_categories() {
        assert!(ExpenseCategory::try_from(Category::Salary).is_err());
        assert!(ExpenseCategory::try_from(Category::Other).is_err());
    }
}
