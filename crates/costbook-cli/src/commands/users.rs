//! User command implementations

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use costbook_core::{Database, Error, NewUser};

use super::truncate;

pub fn cmd_users(db: &Database) -> Result<()> {
    let users = db.list_users().context("Failed to list users")?;

    if users.is_empty() {
        println!("No users yet. Add one with: costbook add-user");
        return Ok(());
    }

    println!("{:>8}  {:<30}  {:>12}", "ID", "NAME", "TOTAL");
    for user in users {
        let total = db.total_for_user(user.id)?;
        let name = format!("{} {}", user.first_name, user.last_name);
        println!("{:>8}  {:<30}  {:>12.2}", user.id, truncate(&name, 30), total);
    }

    Ok(())
}

pub fn cmd_add_user(
    db: &Database,
    id: i64,
    first_name: &str,
    last_name: &str,
    birthday: Option<&str>,
) -> Result<()> {
    let first_name = first_name.trim();
    let last_name = last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        bail!("First and last name must not be empty");
    }

    let birthday = birthday
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("Invalid --birthday (use YYYY-MM-DD)")?;

    let user = match db.create_user(&NewUser {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birthday,
    }) {
        Ok(user) => user,
        Err(Error::Conflict(_)) => bail!("User {} already exists", id),
        Err(e) => return Err(e).context("Failed to create user"),
    };

    println!("✅ Added user {} ({} {})", user.id, user.first_name, user.last_name);
    Ok(())
}
