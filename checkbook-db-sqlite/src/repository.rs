use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, sqlite::SqlitePool};

use checkbook_core::{
    AllocatedExpenseLine, Entry, EntryRepository, IncomeType, NewEntry, RepositoryError,
    TaxBreakdownRow,
};

/// SQLite-backed entry storage.
///
/// Monetary columns are stored as TEXT to keep decimal values exact.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load_entry(&self, header: EntryRow) -> Result<Entry, RepositoryError> {
        let income_rows: Vec<IncomeRow> = sqlx::query_as(
            "SELECT sender, income_type, date, gross, se_tax, fed_tax, state_tax, total_tax, net
             FROM incomes WHERE entry_id = ? ORDER BY position",
        )
        .bind(header.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let expense_rows: Vec<ExpenseRow> = sqlx::query_as(
            "SELECT sender, name, amount, net_after
             FROM expenses WHERE entry_id = ? ORDER BY position",
        )
        .bind(header.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let rows: Vec<TaxBreakdownRow> = income_rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?;
        let expenses: Vec<AllocatedExpenseLine> = expense_rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?;

        // The per-line nets double as the stored final-net column.
        let final_nets = expenses.iter().map(|line| line.net_after).collect();

        Ok(Entry {
            id: header.id,
            title: header.title,
            created_at: parse_datetime(&header.created_at)?,
            rows,
            expenses,
            final_nets,
        })
    }
}

#[derive(FromRow)]
struct EntryRow {
    id: i64,
    title: String,
    created_at: String,
}

#[derive(FromRow)]
struct IncomeRow {
    sender: String,
    income_type: String,
    date: String,
    gross: String,
    se_tax: String,
    fed_tax: String,
    state_tax: String,
    total_tax: String,
    net: String,
}

impl TryFrom<IncomeRow> for TaxBreakdownRow {
    type Error = RepositoryError;

    fn try_from(row: IncomeRow) -> Result<Self, Self::Error> {
        Ok(TaxBreakdownRow {
            sender: row.sender,
            income_type: IncomeType::parse(&row.income_type),
            date: parse_date(&row.date)?,
            gross: parse_decimal(&row.gross)?,
            se_tax: parse_decimal(&row.se_tax)?,
            fed_tax: parse_decimal(&row.fed_tax)?,
            state_tax: parse_decimal(&row.state_tax)?,
            total_tax: parse_decimal(&row.total_tax)?,
            net: parse_decimal(&row.net)?,
        })
    }
}

#[derive(FromRow)]
struct ExpenseRow {
    sender: String,
    name: String,
    amount: String,
    net_after: String,
}

impl TryFrom<ExpenseRow> for AllocatedExpenseLine {
    type Error = RepositoryError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(AllocatedExpenseLine {
            sender: row.sender,
            name: row.name,
            amount: parse_decimal(&row.amount)?,
            net_after: parse_decimal(&row.net_after)?,
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, RepositoryError> {
    s.parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("Failed to parse decimal '{}': {}", s, e)))
}

fn parse_date(s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::Database(format!("Failed to parse date '{}': {}", s, e)))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::Database(format!("Failed to parse datetime '{}': {}", s, e)))
}

#[async_trait]
impl EntryRepository for SqliteRepository {
    async fn save_entry(&self, entry: NewEntry) -> Result<Entry, RepositoryError> {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let result = sqlx::query("INSERT INTO entries (title, created_at) VALUES (?, ?)")
            .bind(&entry.title)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        let id = result.last_insert_rowid();

        for (position, row) in entry.rows.iter().enumerate() {
            sqlx::query(
                "INSERT INTO incomes (
                    entry_id, position, sender, income_type, date,
                    gross, se_tax, fed_tax, state_tax, total_tax, net
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(position as i64)
            .bind(&row.sender)
            .bind(row.income_type.as_str())
            .bind(row.date.to_string())
            .bind(row.gross.to_string())
            .bind(row.se_tax.to_string())
            .bind(row.fed_tax.to_string())
            .bind(row.state_tax.to_string())
            .bind(row.total_tax.to_string())
            .bind(row.net.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        for (position, line) in entry.expenses.iter().enumerate() {
            sqlx::query(
                "INSERT INTO expenses (entry_id, position, sender, name, amount, net_after)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(position as i64)
            .bind(&line.sender)
            .bind(&line.name)
            .bind(line.amount.to_string())
            .bind(line.net_after.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        self.get_entry(id).await
    }

    async fn get_entry(&self, id: i64) -> Result<Entry, RepositoryError> {
        let header: EntryRow =
            sqlx::query_as("SELECT id, title, created_at FROM entries WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?
                .ok_or(RepositoryError::NotFound)?;

        self.load_entry(header).await
    }

    async fn list_entries(&self) -> Result<Vec<Entry>, RepositoryError> {
        let headers: Vec<EntryRow> = sqlx::query_as(
            "SELECT id, title, created_at FROM entries ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut entries = Vec::with_capacity(headers.len());
        for header in headers {
            entries.push(self.load_entry(header).await?);
        }
        Ok(entries)
    }

    async fn delete_entry(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        // Children first; cascade is declared in the schema but foreign
        // keys are not enforced on every sqlite connection.
        sqlx::query("DELETE FROM incomes WHERE entry_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        sqlx::query("DELETE FROM expenses WHERE entry_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
