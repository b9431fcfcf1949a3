//! User directory operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{datetime_column, Database};
use crate::error::{Error, Result};
use crate::models::{NewUser, User, UserWithTotal};

const USER_COLUMNS: &str = "id, first_name, last_name, birthday, created_at";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let birthday: Option<String> = row.get(3)?;
    let birthday = birthday
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .transpose()?;

    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        birthday,
        created_at: datetime_column(row, 4)?,
    })
}

impl Database {
    /// Create a user
    ///
    /// Fails with [`Error::Conflict`] if the id is already taken. The check and
    /// the insert are one statement, so two concurrent creates cannot both win.
    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.conn()?;

        let inserted = conn.execute(
            "INSERT INTO users (id, first_name, last_name, birthday) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO NOTHING",
            params![
                user.id,
                user.first_name,
                user.last_name,
                user.birthday.map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )?;

        if inserted == 0 {
            return Err(Error::Conflict(format!("user {} already exists", user.id)));
        }

        info!(user_id = user.id, "Created user");

        self.get_user(user.id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", user.id)))
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Check whether a user exists
    pub fn user_exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// List all users, newest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Get a user together with the total of all their costs
    pub fn get_user_with_total(&self, id: i64) -> Result<Option<UserWithTotal>> {
        let Some(user) = self.get_user(id)? else {
            return Ok(None);
        };
        let total = self.total_for_user(id)?;
        Ok(Some(UserWithTotal { user, total }))
    }
}
