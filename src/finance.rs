//! Expense tracking with keyword-based categorization.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::models::{
    AppData, Category, CategoryTotal, StatsPeriod, Transaction, TransactionKind, TransactionStats,
};

const MATCHED_CONFIDENCE: f32 = 0.85;
const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Checked in order; the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &[
            "grocer",
            "supermarket",
            "market",
            "restaurant",
            "food",
            "lunch",
            "dinner",
            "breakfast",
            "cafe",
            "coffee",
            "pizza",
            "burger",
            "chicken",
            "bakery",
            "deli",
        ],
    ),
    (
        Category::Transport,
        &[
            "uber",
            "lyft",
            "taxi",
            "fuel",
            "gas station",
            "petrol",
            "shell",
            "bus",
            "metro",
            "subway",
            "train",
            "parking",
            "toll",
        ],
    ),
    (
        Category::Utilities,
        &[
            "electric",
            "power bill",
            "water bill",
            "internet",
            "phone",
            "mobile",
            "broadband",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "netflix",
            "spotify",
            "disney",
            "hbo",
            "amazon",
            "cinema",
            "movie",
            "theater",
            "theatre",
            "game",
            "steam",
            "playstation",
            "xbox",
            "concert",
        ],
    ),
    (
        Category::Health,
        &[
            "pharmacy",
            "drugstore",
            "doctor",
            "hospital",
            "clinic",
            "medicine",
            "dentist",
            "insurance",
        ],
    ),
    (
        Category::Clothing,
        &[
            "zara", "h&m", "nike", "adidas", "clothes", "shoes", "sneakers", "shirt", "jacket",
        ],
    ),
    (
        Category::Home,
        &["furniture", "ikea", "hardware", "cleaning", "appliance", "decor"],
    ),
    (
        Category::Education,
        &[
            "course",
            "book",
            "udemy",
            "coursera",
            "university",
            "school",
            "tuition",
            "training",
        ],
    ),
];

pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub category: Option<Category>,
    pub kind: TransactionKind,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Fields to change on an existing transaction. `None` leaves a field as is.
#[derive(Debug, Default)]
pub struct TransactionUpdate {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub kind: Option<TransactionKind>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Listing filters. Dates are inclusive.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<Category>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    fn matches(&self, txn: &Transaction) -> bool {
        self.start.map_or(true, |s| txn.date >= s)
            && self.end.map_or(true, |e| txn.date <= e)
            && self.category.map_or(true, |c| txn.category == c)
    }
}

/// Guess a category from a free-text description.
pub fn categorize(description: &str) -> (Category, f32) {
    let lower = description.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| (*category, MATCHED_CONFIDENCE))
        .unwrap_or((Category::Other, FALLBACK_CONFIDENCE))
}

fn period_start(period: StatsPeriod, today: NaiveDate) -> NaiveDate {
    match period {
        StatsPeriod::Week => today - Duration::days(7),
        StatsPeriod::Month => today.with_day(1).unwrap_or(today),
        StatsPeriod::Year => today.with_ordinal(1).unwrap_or(today),
    }
}

impl AppData {
    pub fn add_transaction(&mut self, new: NewTransaction, today: NaiveDate) -> Transaction {
        let (category, category_confidence) = match new.category {
            Some(category) => (category, 1.0),
            None => categorize(&new.description),
        };
        let txn = Transaction {
            id: Uuid::new_v4(),
            description: new.description,
            amount: new.amount,
            category,
            category_confidence,
            kind: new.kind,
            date: new.date.unwrap_or(today),
            notes: new.notes,
        };
        self.transactions.push(txn.clone());
        txn
    }

    /// Apply `changes` to a transaction. A new description is categorized
    /// again unless a category is given or the current one was chosen by hand.
    pub fn update_transaction(
        &mut self,
        id: Uuid,
        changes: TransactionUpdate,
    ) -> Option<Transaction> {
        let txn = self.transactions.iter_mut().find(|t| t.id == id)?;

        if let Some(description) = changes.description {
            if changes.category.is_none() && txn.category_confidence < 1.0 {
                let (category, confidence) = categorize(&description);
                txn.category = category;
                txn.category_confidence = confidence;
            }
            txn.description = description;
        }
        if let Some(category) = changes.category {
            txn.category = category;
            txn.category_confidence = 1.0;
        }
        if let Some(amount) = changes.amount {
            txn.amount = amount;
        }
        if let Some(kind) = changes.kind {
            txn.kind = kind;
        }
        if let Some(date) = changes.date {
            txn.date = date;
        }
        if changes.notes.is_some() {
            txn.notes = changes.notes;
        }
        Some(txn.clone())
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        self.transactions.len() != before
    }

    /// Matching transactions, newest first.
    pub fn transactions(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        let mut txns: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        txns.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = filter.limit {
            txns.truncate(limit);
        }
        txns
    }

    pub fn transaction_stats(&self, period: StatsPeriod, today: NaiveDate) -> TransactionStats {
        let txns = self.transactions(&TransactionFilter {
            start: Some(period_start(period, today)),
            ..Default::default()
        });

        let expenses: Vec<&Transaction> = txns
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .collect();
        let total_expenses: f64 = expenses.iter().map(|t| t.amount.abs()).sum();
        let total_income: f64 = txns
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| t.amount)
            .sum();

        let mut by_category: HashMap<Category, f64> = HashMap::new();
        for t in &expenses {
            *by_category.entry(t.category).or_default() += t.amount.abs();
        }
        let mut categories: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category,
                amount,
                percentage: if total_expenses > 0.0 {
                    (amount / total_expenses * 100.0).round() as u32
                } else {
                    0
                },
            })
            .collect();
        categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        TransactionStats {
            total_expenses,
            total_income,
            balance: total_income - total_expenses,
            transaction_count: txns.len(),
            categories,
            average_expense: if expenses.is_empty() {
                0.0
            } else {
                total_expenses / expenses.len() as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn expense(description: &str, amount: f64, on: &str) -> NewTransaction {
        NewTransaction {
            description: description.into(),
            amount,
            category: None,
            kind: TransactionKind::Expense,
            date: Some(date(on)),
            notes: None,
        }
    }

    #[test]
    fn categorizes_by_keyword() {
        assert_eq!(categorize("Uber trip downtown"), (Category::Transport, 0.85));
        assert_eq!(categorize("NETFLIX.COM"), (Category::Entertainment, 0.85));
        assert_eq!(categorize("Corner Pharmacy"), (Category::Health, 0.85));
        assert_eq!(categorize("Birthday gift"), (Category::Other, 0.5));
    }

    #[test]
    fn explicit_category_is_certain() {
        let mut data = AppData::default();
        let txn = data.add_transaction(
            NewTransaction {
                category: Some(Category::Home),
                ..expense("Uber", 10.0, "2024-03-01")
            },
            date("2024-03-05"),
        );
        assert_eq!(txn.category, Category::Home);
        assert_eq!(txn.category_confidence, 1.0);
    }

    #[test]
    fn monthly_stats() {
        let today = date("2024-03-20");
        let mut data = AppData::default();
        data.add_transaction(expense("Supermarket run", 60.0, "2024-03-02"), today);
        data.add_transaction(expense("Pizza night", 20.0, "2024-03-10"), today);
        data.add_transaction(expense("Taxi", -20.0, "2024-03-11"), today);
        data.add_transaction(expense("Old dinner", 500.0, "2024-02-28"), today);
        data.add_transaction(
            NewTransaction {
                kind: TransactionKind::Income,
                ..expense("Salary", 1000.0, "2024-03-01")
            },
            today,
        );

        let stats = data.transaction_stats(StatsPeriod::Month, today);
        assert_eq!(stats.transaction_count, 4);
        assert_eq!(stats.total_expenses, 100.0);
        assert_eq!(stats.total_income, 1000.0);
        assert_eq!(stats.balance, 900.0);
        assert!((stats.average_expense - 33.333).abs() < 0.01);
        assert_eq!(stats.categories[0].category, Category::Food);
        assert_eq!(stats.categories[0].percentage, 80);
        assert_eq!(stats.categories[1].category, Category::Transport);
    }

    #[test]
    fn update_recategorizes_new_description() {
        let today = date("2024-03-05");
        let mut data = AppData::default();
        let txn = data.add_transaction(expense("Birthday gift", 30.0, "2024-03-01"), today);
        assert_eq!(txn.category, Category::Other);

        let updated = data
            .update_transaction(
                txn.id,
                TransactionUpdate {
                    description: Some("Cinema tickets".into()),
                    amount: Some(24.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.category, Category::Entertainment);
        assert_eq!(updated.category_confidence, 0.85);
        assert_eq!(updated.amount, 24.0);
        assert_eq!(updated.date, date("2024-03-01"));
    }

    #[test]
    fn update_keeps_hand_picked_category() {
        let today = date("2024-03-05");
        let mut data = AppData::default();
        let txn = data.add_transaction(expense("Pizza", 12.0, "2024-03-01"), today);

        let picked = data
            .update_transaction(
                txn.id,
                TransactionUpdate {
                    category: Some(Category::Home),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(picked.category, Category::Home);
        assert_eq!(picked.category_confidence, 1.0);

        let renamed = data
            .update_transaction(
                txn.id,
                TransactionUpdate {
                    description: Some("Taxi".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.category, Category::Home);
        assert_eq!(renamed.description, "Taxi");

        assert!(data
            .update_transaction(Uuid::new_v4(), TransactionUpdate::default())
            .is_none());
    }

    #[test]
    fn filters_by_dates_category_and_limit() {
        let today = date("2024-03-20");
        let mut data = AppData::default();
        data.add_transaction(expense("Supermarket", 50.0, "2024-03-02"), today);
        data.add_transaction(expense("Bakery", 5.0, "2024-03-09"), today);
        data.add_transaction(expense("Taxi", 15.0, "2024-03-10"), today);
        data.add_transaction(expense("Cafe", 4.0, "2024-03-15"), today);

        let food = data.transactions(&TransactionFilter {
            start: Some(date("2024-03-05")),
            end: Some(date("2024-03-15")),
            category: Some(Category::Food),
            limit: None,
        });
        let dates: Vec<NaiveDate> = food.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date("2024-03-15"), date("2024-03-09")]);

        let latest = data.transactions(&TransactionFilter {
            limit: Some(2),
            ..Default::default()
        });
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].description, "Cafe");
        assert_eq!(latest[1].description, "Taxi");
    }

    #[test]
    fn delete_transaction_by_id() {
        let mut data = AppData::default();
        let txn = data.add_transaction(expense("Book", 15.0, "2024-03-01"), date("2024-03-01"));
        assert!(data.delete_transaction(txn.id));
        assert!(!data.delete_transaction(txn.id));
    }
}
