//! Authentication state
//!
//! The signed-in user's profile and session token, plus the onboarding flag.
//! No credential handling lives here; the store only mirrors what the auth
//! collaborator reports.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A signed-in user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque user id
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// University name
    pub university: String,
    /// Hostel block, if on campus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostel_block: Option<String>,
    /// Room number, if on campus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    /// Whether the user has a pro membership
    #[serde(default)]
    pub is_pro_member: bool,
    /// Avatar image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial profile update
///
/// Every field is optional; unset fields leave the current value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New hostel block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostel_block: Option<String>,
    /// New room number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    /// New avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// The serializable auth state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    /// The signed-in user, if any
    pub user: Option<User>,
    /// Whether a session is active
    #[serde(default)]
    pub is_authenticated: bool,
    /// Whether the user has completed onboarding
    #[serde(default)]
    pub is_onboarded: bool,
    /// Session token, if any
    pub token: Option<String>,
}

/// The auth store
pub struct AuthStore {
    state: RwLock<AuthSnapshot>,
}

impl AuthStore {
    /// Create a signed-out auth store
    pub fn new() -> Self {
        Self { state: RwLock::new(AuthSnapshot::default()) }
    }

    /// Record a successful sign-in
    pub fn login(&self, user: User, token: impl Into<String>) {
        let mut state = self.state.write();
        tracing::info!(user_id = %user.id, "user signed in");
        state.user = Some(user);
        state.token = Some(token.into());
        state.is_authenticated = true;
    }

    /// Sign out
    ///
    /// Clears the user and token but keeps the onboarding flag; onboarding
    /// is per install, not per session.
    pub fn logout(&self) {
        let mut state = self.state.write();
        state.user = None;
        state.token = None;
        state.is_authenticated = false;
    }

    /// Merge a partial profile update into the signed-in user
    ///
    /// No-op while signed out.
    pub fn update_user(&self, patch: UserPatch) {
        let mut state = self.state.write();
        let Some(user) = state.user.as_mut() else {
            return;
        };

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(phone) = patch.phone {
            user.phone = phone;
        }
        if let Some(hostel_block) = patch.hostel_block {
            user.hostel_block = Some(hostel_block);
        }
        if let Some(room_number) = patch.room_number {
            user.room_number = Some(room_number);
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = Some(avatar);
        }
    }

    /// Mark onboarding as completed (or not)
    pub fn set_onboarded(&self, onboarded: bool) {
        self.state.write().is_onboarded = onboarded;
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// Whether a session is active
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    /// Clone of the full auth state
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.read().clone()
    }

    /// Replace the state with a restored snapshot
    pub fn restore(&self, snapshot: AuthSnapshot) {
        *self.state.write() = snapshot;
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "u1".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@campus.edu".to_string(),
            phone: "9876500001".to_string(),
            university: "Campus University".to_string(),
            hostel_block: Some("B".to_string()),
            room_number: Some("214".to_string()),
            is_pro_member: false,
            avatar: None,
        }
    }

    #[test]
    fn test_login_logout() {
        let store = AuthStore::new();
        assert!(!store.is_authenticated());

        store.login(test_user(), "token-123");
        assert!(store.is_authenticated());
        assert_eq!(store.snapshot().token.as_deref(), Some("token-123"));

        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
        assert!(store.snapshot().token.is_none());
    }

    #[test]
    fn test_logout_keeps_onboarding() {
        let store = AuthStore::new();
        store.set_onboarded(true);
        store.login(test_user(), "token-123");

        store.logout();

        assert!(store.snapshot().is_onboarded);
    }

    #[test]
    fn test_update_user_merges_fields() {
        let store = AuthStore::new();
        store.login(test_user(), "token-123");

        store.update_user(UserPatch {
            room_number: Some("318".to_string()),
            ..Default::default()
        });

        let user = store.current_user().unwrap();
        assert_eq!(user.room_number.as_deref(), Some("318"));
        // Untouched fields keep their values.
        assert_eq!(user.name, "Asha Rao");
        assert_eq!(user.hostel_block.as_deref(), Some("B"));
    }

    #[test]
    fn test_update_user_signed_out_is_noop() {
        let store = AuthStore::new();

        store.update_user(UserPatch { name: Some("Nobody".to_string()), ..Default::default() });

        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_serialization_shape() {
        let store = AuthStore::new();
        store.login(test_user(), "token-123");

        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["user"]["hostelBlock"], "B");
        assert_eq!(json["user"]["isProMember"], false);
    }
}
