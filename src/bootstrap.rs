//! Startup tasks that run before the server accepts requests.

use rusqlite::Connection;

use crate::api::{ApiContext, ServerError};
use crate::config::BootstrapAdmin;
use crate::crypto::PasswordHasher;
use crate::db::{self, NewProfile};
use crate::models::{NewAccount, Role};

/// What `ensure_admin` found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminBootstrap {
    Created,
    AlreadyPresent,
    /// The username belongs to a non-admin account; left untouched.
    RoleConflict,
}

/// Create (or migrate) the database and ensure the configured admin.
pub fn initialize(ctx: &ApiContext) -> Result<Option<AdminBootstrap>, ServerError> {
    let mut conn = db::open_database(&ctx.config.db_path)?;
    tracing::info!(
        path = %ctx.config.db_path.display(),
        schema_version = db::get_current_version(&conn),
        "Database ready"
    );

    match &ctx.config.bootstrap_admin {
        Some(admin) => Ok(Some(ensure_admin(&mut conn, &ctx.hasher, admin)?)),
        None => Ok(None),
    }
}

/// Create the bootstrap admin unless the username is already taken.
///
/// An existing account is never modified, so a changed password in the
/// environment does not reset the stored one.
pub fn ensure_admin(
    conn: &mut Connection,
    hasher: &PasswordHasher,
    admin: &BootstrapAdmin,
) -> Result<AdminBootstrap, ServerError> {
    if let Some(existing) = db::find_account_by_username(conn, &admin.username)? {
        if existing.role == Role::Admin {
            return Ok(AdminBootstrap::AlreadyPresent);
        }
        tracing::warn!(
            username = %admin.username,
            role = %existing.role,
            "Bootstrap admin username belongs to a non-admin account"
        );
        return Ok(AdminBootstrap::RoleConflict);
    }

    let account = NewAccount {
        username: admin.username.clone(),
        password_hash: hasher.hash(&admin.password)?,
        role: Role::Admin,
    };
    db::register_account(conn, &account, &NewProfile::None)?;
    tracing::info!(username = %admin.username, "Bootstrap admin created");
    Ok(AdminBootstrap::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::test_config;
    use crate::crypto::verify_password;

    fn admin(password: &str) -> BootstrapAdmin {
        BootstrapAdmin {
            username: "admin".into(),
            password: password.into(),
        }
    }

    #[test]
    fn creates_admin_once() {
        let mut conn = db::open_memory_database().unwrap();
        let hasher = PasswordHasher::new(10).unwrap();

        assert_eq!(
            ensure_admin(&mut conn, &hasher, &admin("first")).unwrap(),
            AdminBootstrap::Created
        );
        assert_eq!(
            ensure_admin(&mut conn, &hasher, &admin("second")).unwrap(),
            AdminBootstrap::AlreadyPresent
        );

        let stored = db::find_account_by_username(&conn, "admin").unwrap().unwrap();
        assert_eq!(stored.role, Role::Admin);
        assert!(verify_password("first", &stored.password_hash));
        assert!(!verify_password("second", &stored.password_hash));
    }

    #[test]
    fn leaves_non_admin_account_alone() {
        let mut conn = db::open_memory_database().unwrap();
        let hasher = PasswordHasher::new(10).unwrap();
        db::insert_account(
            &conn,
            &NewAccount {
                username: "admin".into(),
                password_hash: hasher.hash("pw").unwrap(),
                role: Role::Doctor,
            },
        )
        .unwrap();

        assert_eq!(
            ensure_admin(&mut conn, &hasher, &admin("x")).unwrap(),
            AdminBootstrap::RoleConflict
        );
        let stored = db::find_account_by_username(&conn, "admin").unwrap().unwrap();
        assert_eq!(stored.role, Role::Doctor);
    }

    #[test]
    fn initialize_creates_database_file_and_admin() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config(&tmp.path().join("nested"));
        config.bootstrap_admin = Some(admin("pw"));
        let ctx = ApiContext::new(config).unwrap();

        assert_eq!(initialize(&ctx).unwrap(), Some(AdminBootstrap::Created));
        assert!(ctx.config.db_path.exists());
        assert_eq!(initialize(&ctx).unwrap(), Some(AdminBootstrap::AlreadyPresent));
    }

    #[test]
    fn initialize_without_admin_only_prepares_database() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(test_config(tmp.path())).unwrap();
        assert_eq!(initialize(&ctx).unwrap(), None);
        let conn = ctx.open_db().unwrap();
        assert_eq!(db::get_current_version(&conn), 3);
    }
}
