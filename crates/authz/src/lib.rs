//! Role-based authorization for catalog operations.
//!
//! Handlers resolve a [`Principal`] from the request and ask a [`Policy`]
//! whether it may run a named operation before touching any service.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use thiserror::Error;

/// Roles recognised by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Librarian,
    User,
}

impl Role {
    /// Parse a role name, accepting `LIBRARIAN`, `role_librarian`, and similar.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim().to_ascii_uppercase();
        let name = name.strip_prefix("ROLE_").unwrap_or(&name);

        match name {
            "LIBRARIAN" => Some(Role::Librarian),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Librarian => "LIBRARIAN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated caller and the roles it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(subject: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            subject: subject.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Build a principal from a comma-separated role list. Unknown names are dropped.
    pub fn from_role_list(subject: impl Into<String>, role_list: &str) -> Self {
        let subject = subject.into();
        let roles = role_list
            .split(',')
            .filter(|raw| !raw.trim().is_empty())
            .filter_map(|raw| {
                let role = Role::parse(raw);
                if role.is_none() {
                    tracing::debug!(%subject, role = raw.trim(), "ignoring unknown role");
                }
                role
            })
            .collect();

        Self { subject, roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("'{subject}' is not allowed to perform '{operation}'")]
    Forbidden {
        operation: String,
        subject: String,
    },

    #[error("no policy registered for operation '{0}'")]
    UnknownOperation(String),
}

/// Maps operation names to the set of roles allowed to run them.
///
/// Operations without a rule are denied.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    rules: HashMap<&'static str, BTreeSet<Role>>,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `operation` for any caller holding at least one of `roles`.
    pub fn allow(mut self, operation: &'static str, roles: impl IntoIterator<Item = Role>) -> Self {
        self.rules.entry(operation).or_default().extend(roles);
        self
    }

    pub fn required_roles(&self, operation: &str) -> Option<&BTreeSet<Role>> {
        self.rules.get(operation)
    }

    /// Check `principal` against the rule for `operation`.
    pub fn authorize(&self, operation: &str, principal: &Principal) -> Result<(), AuthzError> {
        let required = self
            .rules
            .get(operation)
            .ok_or_else(|| AuthzError::UnknownOperation(operation.to_string()))?;

        if principal.roles.iter().any(|role| required.contains(role)) {
            tracing::debug!(operation, subject = %principal.subject, "access granted");
            return Ok(());
        }

        tracing::warn!(
            operation,
            subject = %principal.subject,
            roles = ?principal.roles,
            required = ?required,
            "access denied"
        );
        Err(AuthzError::Forbidden {
            operation: operation.to_string(),
            subject: principal.subject.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> Policy {
        Policy::new()
            .allow("books.get", [Role::Librarian, Role::User])
            .allow("books.set_availability", [Role::Librarian])
    }

    #[test]
    fn parses_plain_and_prefixed_roles() {
        assert_eq!(Role::parse("LIBRARIAN"), Some(Role::Librarian));
        assert_eq!(Role::parse("role_user"), Some(Role::User));
        assert_eq!(Role::parse(" ROLE_LIBRARIAN "), Some(Role::Librarian));
        assert_eq!(Role::parse("ADMIN"), None);
    }

    #[test]
    fn role_list_drops_unknown_names() {
        let principal = Principal::from_role_list("ana", "ROLE_USER, admin,,LIBRARIAN");
        assert_eq!(principal.subject, "ana");
        assert!(principal.has_role(Role::User));
        assert!(principal.has_role(Role::Librarian));
        assert_eq!(principal.roles.len(), 2);
    }

    #[test]
    fn user_may_read_but_not_mutate() {
        let user = Principal::new("u1", [Role::User]);
        let policy = policy();

        assert!(policy.authorize("books.get", &user).is_ok());
        assert_eq!(
            policy.authorize("books.set_availability", &user),
            Err(AuthzError::Forbidden {
                operation: "books.set_availability".to_string(),
                subject: "u1".to_string(),
            })
        );
    }

    #[test]
    fn librarian_may_mutate() {
        let librarian = Principal::new("l1", [Role::Librarian]);
        assert!(policy()
            .authorize("books.set_availability", &librarian)
            .is_ok());
    }

    #[test]
    fn principal_without_roles_is_denied() {
        let nobody = Principal::from_role_list("n1", "");
        assert!(matches!(
            policy().authorize("books.get", &nobody),
            Err(AuthzError::Forbidden { .. })
        ));
    }

    #[test]
    fn unknown_operation_is_denied() {
        let librarian = Principal::new("l1", [Role::Librarian]);
        assert_eq!(
            policy().authorize("books.delete", &librarian),
            Err(AuthzError::UnknownOperation("books.delete".to_string()))
        );
        assert!(policy().required_roles("books.delete").is_none());
    }
}
