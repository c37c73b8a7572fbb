use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::{doctor, is_unique_violation, patient};
use crate::db::DatabaseError;
use crate::models::*;

/// Profile row created alongside a new account.
#[derive(Debug, Clone)]
pub enum NewProfile {
    None,
    Patient(NewPatient),
    Doctor(NewDoctor),
}

/// Ids produced by [`register_account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub account_id: i64,
    pub profile_id: Option<i64>,
}

const ACCOUNT_COLUMNS: &str = "account_id, username, password_hash, role, created_at";

struct AccountRow {
    account_id: i64,
    username: String,
    password_hash: String,
    role: String,
    created_at: String,
}

fn account_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        account_id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn account_from_row(row: AccountRow) -> Result<Account, DatabaseError> {
    Ok(Account {
        account_id: row.account_id,
        username: row.username,
        password_hash: row.password_hash,
        role: Role::from_str(&row.role)?,
        created_at: row.created_at,
    })
}

/// Insert an account row. A taken username yields `DuplicateUsername`.
pub fn insert_account(conn: &Connection, account: &NewAccount) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO accounts (username, password_hash, role) VALUES (?1, ?2, ?3)",
        params![account.username, account.password_hash, account.role.as_str()],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            DatabaseError::DuplicateUsername(account.username.clone())
        } else {
            DatabaseError::from(e)
        }
    })?;
    Ok(conn.last_insert_rowid())
}

/// Create an account and its role profile atomically.
///
/// The profile kind must match the role: admins own no profile, doctors
/// own one doctor row and patients one patient row.
pub fn register_account(
    conn: &mut Connection,
    account: &NewAccount,
    profile: &NewProfile,
) -> Result<RegisteredAccount, DatabaseError> {
    let consistent = matches!(
        (account.role, profile),
        (Role::Admin, NewProfile::None)
            | (Role::Doctor, NewProfile::Doctor(_))
            | (Role::Patient, NewProfile::Patient(_))
    );
    if !consistent {
        return Err(DatabaseError::ConstraintViolation(format!(
            "{} account requires a matching profile",
            account.role
        )));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if username_exists(&tx, &account.username)? {
        return Err(DatabaseError::DuplicateUsername(account.username.clone()));
    }
    let account_id = insert_account(&tx, account)?;
    let profile_id = match profile {
        NewProfile::None => None,
        NewProfile::Patient(p) => Some(patient::insert_patient(&tx, p, Some(account_id))?),
        NewProfile::Doctor(d) => Some(doctor::insert_doctor(&tx, d, Some(account_id))?),
    };
    tx.commit()?;

    Ok(RegisteredAccount {
        account_id,
        profile_id,
    })
}

pub fn get_account(conn: &Connection, account_id: i64) -> Result<Option<Account>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"),
            params![account_id],
            account_row_from_rusqlite,
        )
        .optional()?;
    row.map(account_from_row).transpose()
}

pub fn find_account_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<Account>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = ?1"),
            params![username],
            account_row_from_rusqlite,
        )
        .optional()?;
    row.map(account_from_row).transpose()
}

pub fn username_exists(conn: &Connection, username: &str) -> Result<bool, DatabaseError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = ?1)",
        params![username],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// The patient or doctor row owned by an account, if any.
pub fn find_profile_id(conn: &Connection, account: &Account) -> Result<Option<i64>, DatabaseError> {
    let sql = match account.role {
        Role::Admin => return Ok(None),
        Role::Doctor => "SELECT doctor_id FROM doctors WHERE account_id = ?1",
        Role::Patient => "SELECT patient_id FROM patients WHERE account_id = ?1",
    };
    let id = conn
        .query_row(sql, params![account.account_id], |row| row.get(0))
        .optional()?;
    Ok(id)
}

pub fn count_accounts_by_role(conn: &Connection) -> Result<Vec<(Role, i64)>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT role, COUNT(*) FROM accounts GROUP BY role ORDER BY role")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = Vec::new();
    for row in rows {
        let (role, count) = row?;
        counts.push((Role::from_str(&role)?, count));
    }
    Ok(counts)
}
