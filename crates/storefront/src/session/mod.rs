//! Demo account session.
//!
//! There is no identity backend. Sign-in checks the submitted credentials
//! against an [`AccountDirectory`] of fixed demo accounts, and registration
//! signs the new shopper in without storing a password, so a registered
//! account lasts only as long as its session record. Google sign-in is
//! simulated the same way with a fixed profile.

mod error;

pub use error::AuthError;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use yasira_core::{Email, UserId, UserRole};

const GOOGLE_NAME: &str = "Google User";
const GOOGLE_EMAIL: &str = "google@example.com";
const GOOGLE_AVATAR: &str =
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face";

/// Public profile of the signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized email.
    pub email: Email,
    /// Permission level.
    pub role: UserRole,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Fields a shopper may change on their own profile. `None` leaves a field as-is.
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    profile: UserProfile,
    password: SecretString,
}

/// Accounts that can sign in with a password.
#[derive(Debug, Clone)]
pub struct AccountDirectory {
    accounts: Vec<Account>,
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::demo()
    }
}

impl AccountDirectory {
    /// A directory with no accounts.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }

    /// The two demo accounts: an admin and a regular shopper.
    #[must_use]
    pub fn demo() -> Self {
        let mut directory = Self::empty();
        for (id, name, email, role, password) in [
            (1, "Admin User", "admin@yasira.com", UserRole::Admin, "admin123"),
            (2, "Jane Doe", "user@yasira.com", UserRole::Customer, "user123"),
        ] {
            if let Ok(email) = Email::parse(email) {
                directory = directory.with_account(
                    UserProfile {
                        id: UserId::new(id),
                        name: name.to_owned(),
                        email,
                        role,
                        avatar: None,
                    },
                    SecretString::from(password),
                );
            }
        }
        directory
    }

    /// Add an account. A later account with the same email shadows earlier ones.
    #[must_use]
    pub fn with_account(mut self, profile: UserProfile, password: SecretString) -> Self {
        self.accounts.insert(0, Account { profile, password });
        self
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn verify(&self, email: &Email, password: &str) -> Option<&UserProfile> {
        self.accounts
            .iter()
            .find(|account| &account.profile.email == email)
            .filter(|account| account.password.expose_secret() == password)
            .map(|account| &account.profile)
    }
}

/// Serializable subset of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Signed-in profile.
    pub user: Option<UserProfile>,
    /// Whether a shopper is signed in.
    pub is_authenticated: bool,
    /// Opaque session token.
    pub token: Option<String>,
}

/// Who is signed in, if anyone.
#[derive(Debug, Clone, Default)]
pub struct AccountSession {
    directory: AccountDirectory,
    user: Option<UserProfile>,
    token: Option<SecretString>,
}

impl AccountSession {
    /// A signed-out session checking credentials against `directory`.
    #[must_use]
    pub const fn new(directory: AccountDirectory) -> Self {
        Self {
            directory,
            user: None,
            token: None,
        }
    }

    /// Rebuild from a persisted record. A record without both a user and
    /// the authenticated flag restores as signed out.
    #[must_use]
    pub fn from_record(record: SessionRecord, directory: AccountDirectory) -> Self {
        let mut session = Self::new(directory);
        if let (true, Some(user)) = (record.is_authenticated, record.user) {
            session.user = Some(user);
            session.token = record.token.map(SecretString::from);
        }
        session
    }

    /// The state to persist.
    #[must_use]
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated(),
            token: self
                .token
                .as_ref()
                .map(|token| token.expose_secret().to_owned()),
        }
    }

    /// Sign in with a directory account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email and
    /// `AuthError::InvalidCredentials` for an unknown account or wrong password.
    /// A failed attempt leaves the current session untouched.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = Email::parse(email)?;
        let profile = self
            .directory
            .verify(&email, password)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        self.token = Some(SecretString::from(format!(
            "mock-{}-token-{}",
            profile.role, profile.id
        )));
        self.user = Some(profile.clone());
        info!(user_id = %profile.id, role = %profile.role, "Signed in");
        Ok(profile)
    }

    /// Create a shopper account and sign it in.
    ///
    /// The account ID is the registration time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingName` for a blank name and
    /// `AuthError::InvalidEmail` for a malformed email.
    #[instrument(skip(self))]
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(email)?;
        let millis = now.timestamp_millis();

        let profile = UserProfile {
            id: UserId::new(millis),
            name: name.to_owned(),
            email,
            role: UserRole::Customer,
            avatar: None,
        };
        self.token = Some(SecretString::from(format!("mock-token-{millis}")));
        self.user = Some(profile.clone());
        info!(user_id = %profile.id, "Registered account");
        Ok(profile)
    }

    /// Sign in through the simulated Google flow.
    ///
    /// Always succeeds with the fixed Google profile; the account ID and
    /// token are derived from `now` in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` only if the fixed address fails to parse.
    #[instrument(skip(self))]
    pub fn login_with_google(&mut self, now: DateTime<Utc>) -> Result<UserProfile, AuthError> {
        let millis = now.timestamp_millis();
        let profile = UserProfile {
            id: UserId::new(millis),
            name: GOOGLE_NAME.to_owned(),
            email: Email::parse(GOOGLE_EMAIL)?,
            role: UserRole::Customer,
            avatar: Some(GOOGLE_AVATAR.to_owned()),
        };
        self.token = Some(SecretString::from(format!("mock-google-token-{millis}")));
        self.user = Some(profile.clone());
        info!(user_id = %profile.id, "Signed in with Google");
        Ok(profile)
    }

    /// Sign out. Returns whether anyone was signed in.
    pub fn logout(&mut self) -> bool {
        self.token = None;
        self.user.take().is_some()
    }

    /// Apply a profile edit.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` when signed out,
    /// `AuthError::MissingName` for a blank name and `AuthError::InvalidEmail`
    /// for a malformed email. Nothing is applied if any field is invalid.
    pub fn update_profile(
        &mut self,
        update: UserProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        let user = self.user.as_mut().ok_or(AuthError::NotAuthenticated)?;

        let name = update
            .name
            .map(|name| {
                let name = name.trim().to_owned();
                if name.is_empty() {
                    Err(AuthError::MissingName)
                } else {
                    Ok(name)
                }
            })
            .transpose()?;
        let email = update.email.as_deref().map(Email::parse).transpose()?;

        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }
        Ok(user.clone())
    }

    /// The signed-in profile.
    #[must_use]
    pub const fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Whether a shopper is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The session token, if signed in.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }
}
