mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

/// SQLite-backed store for the plan tree.
///
/// Owns the single connection; a [`crate::Guard`] holding the store
/// exclusively is what serializes check-then-commit sequences.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_currencies()?;
        Ok(db)
    }

    /// Ephemeral store, used by tests and demo callers.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_currencies()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_currencies(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM currencies", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let defaults = [
            ("USD", "US Dollar", "$"),
            ("EUR", "Euro", "\u{20ac}"),
            ("GBP", "British Pound", "\u{a3}"),
            ("JPY", "Japanese Yen", "\u{a5}"),
            ("NGN", "Nigerian Naira", "\u{20a6}"),
        ];

        let tx = self.conn.transaction()?;
        for (code, name, symbol) in &defaults {
            tx.execute(
                "INSERT OR IGNORE INTO currencies (code, name, symbol) VALUES (?1, ?2, ?3)",
                params![code, name, symbol],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Plans ─────────────────────────────────────────────────

    pub fn insert_plan(&self, plan: &BudgetPlan) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO plans (name, owner_id, is_predefined, state, currency_code, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                plan.name,
                plan.owner_id,
                plan.is_predefined,
                plan.state.as_str(),
                plan.currency_code,
                plan.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_plan(&self, id: i64) -> Result<Option<BudgetPlan>> {
        let result = self.conn.query_row(
            "SELECT id, name, owner_id, is_predefined, state, currency_code, created_at
             FROM plans WHERE id = ?1",
            params![id],
            Self::plan_from_row,
        );
        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_plans_for_owner(&self, owner_id: i64) -> Result<Vec<BudgetPlan>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, owner_id, is_predefined, state, currency_code, created_at
             FROM plans WHERE owner_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![owner_id], Self::plan_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn get_all_plans(&self) -> Result<Vec<BudgetPlan>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, owner_id, is_predefined, state, currency_code, created_at
             FROM plans ORDER BY name",
        )?;
        let rows = stmt.query_map([], Self::plan_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn update_plan_name(&self, id: i64, name: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE plans SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        Ok(())
    }

    pub fn set_plan_state(&self, id: i64, state: PlanState) -> Result<()> {
        self.conn.execute(
            "UPDATE plans SET state = ?1 WHERE id = ?2",
            params![state.as_str(), id],
        )?;
        Ok(())
    }

    pub fn delete_plan(&self, id: i64) -> Result<()> {
        // ON DELETE CASCADE removes categories and their subcategories
        self.conn
            .execute("DELETE FROM plans WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn plan_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BudgetPlan> {
        Ok(BudgetPlan {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            owner_id: row.get(2)?,
            is_predefined: row.get(3)?,
            state: PlanState::parse(&row.get::<_, String>(4)?),
            currency_code: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    // ── Categories ────────────────────────────────────────────

    pub fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name, percentage, plan_id) VALUES (?1, ?2, ?3)",
            params![cat.name, cat.percentage.to_string(), cat.plan_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name, percentage, plan_id FROM categories WHERE id = ?1",
            params![id],
            Self::category_from_row,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All categories of one plan. Totals are derived from this scan on
    /// every check; nothing caches a running sum.
    pub fn get_categories(&self, plan_id: i64) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, percentage, plan_id FROM categories WHERE plan_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![plan_id], Self::category_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn update_category(&self, id: i64, name: &str, percentage: Decimal) -> Result<()> {
        self.conn.execute(
            "UPDATE categories SET name = ?1, percentage = ?2 WHERE id = ?3",
            params![name, percentage.to_string(), id],
        )?;
        Ok(())
    }

    pub fn delete_category(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
        let pct_str: String = row.get(2)?;
        Ok(Category {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            percentage: Decimal::from_str(&pct_str).unwrap_or_default(),
            plan_id: row.get(3)?,
        })
    }

    // ── Subcategories ─────────────────────────────────────────

    pub fn insert_subcategory(&self, sub: &Subcategory) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO subcategories (name, percentage, category_id) VALUES (?1, ?2, ?3)",
            params![sub.name, sub.percentage.to_string(), sub.category_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_subcategory(&self, id: i64) -> Result<Option<Subcategory>> {
        let result = self.conn.query_row(
            "SELECT id, name, percentage, category_id FROM subcategories WHERE id = ?1",
            params![id],
            Self::subcategory_from_row,
        );
        match result {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_subcategories(&self, category_id: i64) -> Result<Vec<Subcategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, percentage, category_id FROM subcategories
             WHERE category_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![category_id], Self::subcategory_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn update_subcategory(&self, id: i64, name: &str, percentage: Decimal) -> Result<()> {
        self.conn.execute(
            "UPDATE subcategories SET name = ?1, percentage = ?2 WHERE id = ?3",
            params![name, percentage.to_string(), id],
        )?;
        Ok(())
    }

    pub fn delete_subcategory(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM subcategories WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn subcategory_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subcategory> {
        let pct_str: String = row.get(2)?;
        Ok(Subcategory {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            percentage: Decimal::from_str(&pct_str).unwrap_or_default(),
            category_id: row.get(3)?,
        })
    }

    // ── Currencies ────────────────────────────────────────────

    pub fn get_currencies(&self) -> Result<Vec<Currency>> {
        let mut stmt = self
            .conn
            .prepare("SELECT code, name, symbol FROM currencies ORDER BY code")?;
        let rows = stmt.query_map([], |row| {
            Ok(Currency {
                code: row.get(0)?,
                name: row.get(1)?,
                symbol: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn get_currency(&self, code: &str) -> Result<Option<Currency>> {
        let result = self.conn.query_row(
            "SELECT code, name, symbol FROM currencies WHERE code = ?1",
            params![code],
            |row| {
                Ok(Currency {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    symbol: row.get(2)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
