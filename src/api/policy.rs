//! Route authorization policy.
//!
//! One table maps every route pattern (as registered on the router) to the
//! access it requires. The policy middleware evaluates it for each request;
//! handlers never check roles themselves. Routes missing from the table
//! are denied.

use axum::http::Method;

use crate::models::Role;
use crate::session::SessionContext;

/// Which requests a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Any,
    Get,
    Post,
}

impl Verb {
    fn matches(self, method: &Method) -> bool {
        match self {
            Verb::Any => true,
            Verb::Get => *method == Method::GET || *method == Method::HEAD,
            Verb::Post => *method == Method::POST,
        }
    }
}

/// What a request needs to reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

impl Access {
    pub fn permits(self, session: Option<&SessionContext>) -> bool {
        match (self, session) {
            (Access::Public, _) => true,
            (Access::Authenticated, Some(_)) => true,
            (Access::Roles(roles), Some(s)) => roles.contains(&s.role),
            (_, None) => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub path: &'static str,
    pub verb: Verb,
    pub access: Access,
}

const fn rule(path: &'static str, verb: Verb, access: Access) -> Rule {
    Rule { path, verb, access }
}

const ADMIN: &[Role] = &[Role::Admin];
const DOCTOR: &[Role] = &[Role::Doctor];
const PATIENT: &[Role] = &[Role::Patient];
const ADMIN_OR_DOCTOR: &[Role] = &[Role::Admin, Role::Doctor];
const ADMIN_OR_PATIENT: &[Role] = &[Role::Admin, Role::Patient];
const STAFF_AND_PATIENTS: &[Role] = &[Role::Admin, Role::Doctor, Role::Patient];

pub static ROUTE_POLICY: &[Rule] = &[
    rule("/", Verb::Any, Access::Public),
    rule("/register", Verb::Any, Access::Public),
    rule("/admin/login", Verb::Any, Access::Public),
    rule("/logout", Verb::Any, Access::Public),
    rule("/unauthorized", Verb::Any, Access::Public),
    rule("/health", Verb::Get, Access::Public),
    rule("/admin/register", Verb::Any, Access::Roles(ADMIN)),
    rule("/admin/dashboard", Verb::Get, Access::Roles(ADMIN)),
    rule("/doctor/dashboard", Verb::Get, Access::Roles(DOCTOR)),
    rule("/patient/dashboard", Verb::Get, Access::Roles(PATIENT)),
    rule("/add_doctor", Verb::Any, Access::Roles(ADMIN)),
    rule("/doctors", Verb::Get, Access::Roles(ADMIN)),
    rule("/patients", Verb::Get, Access::Roles(ADMIN_OR_DOCTOR)),
    rule("/appointments", Verb::Get, Access::Roles(STAFF_AND_PATIENTS)),
    rule("/appointments", Verb::Post, Access::Roles(ADMIN_OR_PATIENT)),
    rule("/records", Verb::Post, Access::Roles(DOCTOR)),
    rule("/records/:id/prescriptions", Verb::Post, Access::Roles(DOCTOR)),
    rule("/services", Verb::Any, Access::Roles(ADMIN)),
    rule("/invoices", Verb::Post, Access::Roles(ADMIN)),
    rule("/reports", Verb::Get, Access::Roles(ADMIN)),
    rule("/settings", Verb::Get, Access::Authenticated),
];

/// Access required for a matched route, or `None` when no rule covers it.
pub fn required_access(method: &Method, path: &str) -> Option<Access> {
    ROUTE_POLICY
        .iter()
        .find(|r| r.path == path && r.verb.matches(method))
        .map(|r| r.access)
}

/// Evaluate the table for one request.
pub fn is_allowed(method: &Method, path: &str, session: Option<&SessionContext>) -> bool {
    required_access(method, path)
        .map(|access| access.permits(session))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> SessionContext {
        SessionContext {
            account_id: 1,
            username: "user".into(),
            role,
            profile_id: Some(1),
        }
    }

    #[test]
    fn dashboards_admit_only_their_role() {
        for (path, owner) in [
            ("/admin/dashboard", Role::Admin),
            ("/doctor/dashboard", Role::Doctor),
            ("/patient/dashboard", Role::Patient),
        ] {
            for role in [Role::Admin, Role::Doctor, Role::Patient] {
                assert_eq!(
                    is_allowed(&Method::GET, path, Some(&session(role))),
                    role == owner,
                    "{path} as {role}"
                );
            }
            assert!(!is_allowed(&Method::GET, path, None));
        }
    }

    #[test]
    fn public_routes_need_no_session() {
        for path in ["/", "/register", "/admin/login", "/logout", "/unauthorized"] {
            assert!(is_allowed(&Method::GET, path, None), "{path}");
            assert!(is_allowed(&Method::POST, path, None), "{path}");
        }
    }

    #[test]
    fn unlisted_routes_are_denied() {
        assert_eq!(required_access(&Method::GET, "/secret"), None);
        assert!(!is_allowed(&Method::GET, "/secret", Some(&session(Role::Admin))));
    }

    #[test]
    fn rules_distinguish_methods() {
        assert!(is_allowed(&Method::GET, "/appointments", Some(&session(Role::Doctor))));
        assert!(!is_allowed(&Method::POST, "/appointments", Some(&session(Role::Doctor))));
        assert!(is_allowed(&Method::POST, "/appointments", Some(&session(Role::Patient))));
        assert!(!is_allowed(&Method::GET, "/records", Some(&session(Role::Doctor))));
    }

    #[test]
    fn head_follows_get_rules() {
        assert!(is_allowed(&Method::HEAD, "/admin/dashboard", Some(&session(Role::Admin))));
    }

    #[test]
    fn settings_admit_any_signed_in_role() {
        for role in [Role::Admin, Role::Doctor, Role::Patient] {
            assert!(is_allowed(&Method::GET, "/settings", Some(&session(role))));
        }
        assert!(!is_allowed(&Method::GET, "/settings", None));
    }

    #[test]
    fn every_rule_is_reachable() {
        // An earlier rule for the same path and verb would shadow a later one.
        for (i, later) in ROUTE_POLICY.iter().enumerate() {
            let shadowed = ROUTE_POLICY[..i].iter().any(|earlier| {
                earlier.path == later.path
                    && (earlier.verb == Verb::Any || earlier.verb == later.verb)
            });
            assert!(!shadowed, "rule for {} is shadowed", later.path);
        }
    }
}
