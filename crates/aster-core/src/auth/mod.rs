//! Email/password accounts stored in a caller-created table.
//!
//! The table must already exist and have at least `email` and `password` TEXT
//! columns. Passwords are never stored in clear; see [`CredentialHasher`].

mod hasher;

pub use hasher::CredentialHasher;

use crate::db::{DataStore, Filter, Row};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How an email given to signup/login is matched against stored emails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmailMatch {
    /// Raw, case-sensitive equality.
    #[default]
    Exact,
    /// Surrounding whitespace trimmed, ASCII case ignored.
    CaseInsensitive,
}

pub struct CredentialStore<'a> {
    store: &'a DataStore,
    hasher: CredentialHasher,
    email_match: EmailMatch,
}

impl<'a> CredentialStore<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self {
            store,
            hasher: CredentialHasher::default(),
            email_match: EmailMatch::default(),
        }
    }

    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_email_match(mut self, email_match: EmailMatch) -> Self {
        self.email_match = email_match;
        self
    }

    pub fn email_match(&self) -> EmailMatch {
        self.email_match
    }

    fn email_filter(&self, email: &str) -> Filter {
        match self.email_match {
            EmailMatch::Exact => Filter::eq("email", email),
            EmailMatch::CaseInsensitive => Filter::eq_ignore_case("email", email.trim()),
        }
    }

    /// Register `email`. Returns `false`, changing nothing, if the email is
    /// already present; the first account for an email wins.
    pub fn signup(&self, table: &str, email: &str, password: &str) -> Result<bool> {
        let filter = self.email_filter(email);
        let existing = self.store.select(table, Some(&["email"][..]), Some(&filter))?;
        if !existing.is_empty() {
            tracing::debug!(table, "signup rejected: email already registered");
            return Ok(false);
        }

        let stored_email = match self.email_match {
            EmailMatch::Exact => email,
            EmailMatch::CaseInsensitive => email.trim(),
        };
        let digest = self.hasher.hash(password)?;
        let row = Row::new()
            .with("email", stored_email)
            .with("password", digest);
        let id = self.store.insert(table, &row)?;
        tracing::info!(table, id, "account created");
        Ok(true)
    }

    /// True iff exactly one account matches `email` and verifies `password`.
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub fn login(&self, table: &str, email: &str, password: &str) -> Result<bool> {
        let filter = self.email_filter(email);
        let rows = self.store.select(table, Some(&["password"][..]), Some(&filter))?;
        let verified = rows
            .iter()
            .filter_map(|row| row.get_str("password"))
            .filter(|stored| self.hasher.verify(password, stored))
            .count();
        tracing::debug!(table, ok = verified == 1, "login attempt");
        Ok(verified == 1)
    }
}
