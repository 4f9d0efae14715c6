// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account lookup used by the credential issuer.
//!
//! Account persistence lives outside this service. [`AccountDirectory`] is
//! the seam; [`InMemoryAccountDirectory`] backs development and tests and is
//! populated once at start-up.

use std::collections::HashMap;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use uuid::Uuid;

use crate::models::{ProfileSummary, ProfileType};

/// A verified account and the profiles it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_id: Uuid,
    pub profiles: Vec<ProfileSummary>,
}

/// Identity verification and subject lookup.
pub trait AccountDirectory: Send + Sync + 'static {
    /// Return the account if `password` is correct for `email`.
    fn verify(&self, email: &str, password: &str) -> Option<Account>;

    /// Look up an account by its id (token subject).
    fn find(&self, account_id: &Uuid) -> Option<Account>;
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

struct StoredAccount {
    account: Account,
    /// Argon2 PHC string.
    password_hash: String,
}

/// Accounts held in memory, keyed by email.
#[derive(Default)]
pub struct InMemoryAccountDirectory {
    accounts: HashMap<String, StoredAccount>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. Replaces any existing account with the same email.
    pub fn insert_account(
        &mut self,
        email: impl Into<String>,
        password: &str,
        profiles: Vec<ProfileSummary>,
    ) -> Result<Account, AccountError> {
        let password_hash = hash_password(password)?;
        let account = Account {
            account_id: Uuid::new_v4(),
            profiles,
        };
        self.accounts.insert(
            email.into(),
            StoredAccount {
                account: account.clone(),
                password_hash,
            },
        );
        Ok(account)
    }

    /// Register an account with a single adopter profile named after the
    /// email's local part.
    pub fn insert_adopter(
        &mut self,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Account, AccountError> {
        let email = email.into();
        let nickname = email.split('@').next().unwrap_or_default().to_string();
        let profile = ProfileSummary {
            profile_id: Uuid::new_v4(),
            nickname,
            profile_type: ProfileType::Adopter,
        };
        self.insert_account(email, password, vec![profile])
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn verify(&self, email: &str, password: &str) -> Option<Account> {
        let stored = self.accounts.get(email)?;
        verify_password(&stored.password_hash, password).then(|| stored.account.clone())
    }

    fn find(&self, account_id: &Uuid) -> Option<Account> {
        self.accounts
            .values()
            .find(|stored| &stored.account.account_id == account_id)
            .map(|stored| stored.account.clone())
    }
}

fn hash_password(password: &str) -> Result<String, AccountError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AccountError::Hashing(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| AccountError::Hashing(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AccountError::Hashing(e.to_string()))?
        .to_string();
    Ok(phc)
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
