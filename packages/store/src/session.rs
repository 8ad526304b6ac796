//! # Session model and injectable session service
//!
//! A [`Session`] is the logged-in principal: its [`Role`], display name and
//! bearer token. It is persisted under role-prefixed keys so a reload keeps
//! the user logged in:
//!
//! | Key | Value |
//! |-----|-------|
//! | `<prefix>Token` | bearer token |
//! | `<prefix>Name` | username / employee id shown in the navbar |
//! | `<prefix>Role` | the role prefix again (`"admin"` or `"staff"`) |
//! | `<prefix>RememberMe` | `"true"` / `"false"` |
//!
//! ## Restore
//!
//! [`SessionService::restore`] is all-or-nothing. A role qualifies only when
//! token and name are non-empty and the stored role value equals the role's
//! own prefix. Exactly one qualifying role restores a session; none, or both,
//! yield no session. A torn write (token written, role missing) therefore
//! never produces a half-populated principal.
//!
//! ## Mutation
//!
//! [`SessionService::login`] writes every key first and only then swaps the
//! in-memory session and notifies subscribers, once. Subscribers never observe
//! a partially written session. [`SessionService::logout`] removes every key
//! of both roles and is idempotent.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::kv::KeyValueStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Staff];

    /// Storage key prefix, also used as the role's path segment in the API.
    pub fn prefix(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    pub fn from_prefix(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.prefix() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Staff => "Support Staff",
        }
    }

    pub fn token_key(self) -> String {
        format!("{}Token", self.prefix())
    }

    pub fn name_key(self) -> String {
        format!("{}Name", self.prefix())
    }

    pub fn role_key(self) -> String {
        format!("{}Role", self.prefix())
    }

    pub fn remember_key(self) -> String {
        format!("{}RememberMe", self.prefix())
    }

    fn keys(self) -> [String; 4] {
        [
            self.token_key(),
            self.name_key(),
            self.role_key(),
            self.remember_key(),
        ]
    }
}

/// The logged-in principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    pub username: String,
    pub token: String,
}

fn read_role<S: KeyValueStore>(store: &S, role: Role) -> Option<Session> {
    let token = store.get(&role.token_key()).filter(|t| !t.is_empty())?;
    let username = store.get(&role.name_key()).filter(|n| !n.is_empty())?;
    let stored_role = store.get(&role.role_key())?;
    if Role::from_prefix(&stored_role) != Some(role) {
        return None;
    }
    Some(Session {
        role,
        username,
        token,
    })
}

/// Read the persisted session, if exactly one role holds a consistent triple.
pub fn read_persisted<S: KeyValueStore>(store: &S) -> Option<Session> {
    let mut found = Role::ALL.into_iter().filter_map(|role| read_role(store, role));
    let first = found.next()?;
    if found.next().is_some() {
        tracing::warn!("Credentials for more than one role in storage, ignoring both");
        return None;
    }
    Some(first)
}

fn clear_role<S: KeyValueStore>(store: &S, role: Role) {
    for key in role.keys() {
        store.remove(&key);
    }
}

/// Handle returned by [`SessionService::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(Option<&Session>)>;

struct Inner<S> {
    store: S,
    current: RefCell<Option<Session>>,
    loading: Cell<bool>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

/// Owns the current session and its persistence.
///
/// Cloning is cheap and every clone shares the same state, so one instance
/// can be handed to the UI through context and to anything else that needs
/// the bearer token.
pub struct SessionService<S> {
    inner: Rc<Inner<S>>,
}

impl<S> Clone for SessionService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> PartialEq for SessionService<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S: KeyValueStore> SessionService<S> {
    /// Create a service in the loading state. Call [`restore`](Self::restore) next.
    pub fn new(store: S) -> Self {
        Self {
            inner: Rc::new(Inner {
                store,
                current: RefCell::new(None),
                loading: Cell::new(true),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Load the persisted session and leave the loading state.
    pub fn restore(&self) -> Option<Session> {
        let restored = read_persisted(&self.inner.store);
        match &restored {
            Some(s) => tracing::info!("Restored {} session for {}", s.role.prefix(), s.username),
            None => tracing::debug!("No persisted session"),
        }
        *self.inner.current.borrow_mut() = restored.clone();
        self.inner.loading.set(false);
        self.notify();
        restored
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.get()
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.current.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.current.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.inner.current.borrow().as_ref().map(|s| s.role)
    }

    /// Persisted "remember me" flag. Logout clears it with the other keys,
    /// so nothing outside the persistence checks reads it back.
    #[cfg(test)]
    fn remember_me(&self, role: Role) -> bool {
        self.inner.store.get(&role.remember_key()).as_deref() == Some("true")
    }

    pub fn login(&self, session: Session, remember_me: bool) {
        let store = &self.inner.store;
        for other in Role::ALL.into_iter().filter(|r| *r != session.role) {
            clear_role(store, other);
        }
        let role = session.role;
        store.set(&role.token_key(), &session.token);
        store.set(&role.name_key(), &session.username);
        store.set(&role.role_key(), role.prefix());
        store.set(&role.remember_key(), if remember_me { "true" } else { "false" });

        tracing::info!("Logged in as {} ({})", session.username, role.prefix());
        *self.inner.current.borrow_mut() = Some(session);
        self.inner.loading.set(false);
        self.notify();
    }

    pub fn logout(&self) {
        for role in Role::ALL {
            clear_role(&self.inner.store, role);
        }
        let was_logged_in = self.inner.current.borrow_mut().take().is_some();
        self.inner.loading.set(false);
        if was_logged_in {
            tracing::info!("Logged out");
        }
        self.notify();
    }

    pub fn subscribe(&self, listener: impl Fn(Option<&Session>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    fn notify(&self) {
        // Snapshot both so listeners may (un)subscribe or read the service.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        let current = self.session();
        for listener in listeners {
            listener(current.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    fn admin() -> Session {
        Session {
            role: Role::Admin,
            username: "alice".to_string(),
            token: "tok-admin".to_string(),
        }
    }

    fn staff() -> Session {
        Session {
            role: Role::Staff,
            username: "EMP042".to_string(),
            token: "tok-staff".to_string(),
        }
    }

    fn seed(store: &MemoryStorage, prefix: &str, token: &str, name: &str, role: &str) {
        store.set(&format!("{prefix}Token"), token);
        store.set(&format!("{prefix}Name"), name);
        store.set(&format!("{prefix}Role"), role);
    }

    #[test]
    fn test_restore_complete_triple() {
        let store = MemoryStorage::new();
        seed(&store, "admin", "tok", "alice", "admin");

        let service = SessionService::new(store);
        assert!(service.is_loading());
        let session = service.restore().unwrap();
        assert!(!service.is_loading());
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.username, "alice");
        assert_eq!(service.token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_restore_rejects_partial_triple() {
        let store = MemoryStorage::new();
        store.set("adminToken", "tok");
        store.set("adminName", "alice");

        let service = SessionService::new(store);
        assert!(service.restore().is_none());
        assert!(service.session().is_none());
        assert!(!service.is_loading());
    }

    #[test]
    fn test_restore_rejects_empty_token() {
        let store = MemoryStorage::new();
        seed(&store, "staff", "", "bob", "staff");
        assert!(SessionService::new(store).restore().is_none());
    }

    #[test]
    fn test_restore_rejects_mismatched_role_value() {
        let store = MemoryStorage::new();
        seed(&store, "staff", "tok", "bob", "admin");
        assert!(SessionService::new(store).restore().is_none());
    }

    #[test]
    fn test_restore_rejects_two_roles() {
        let store = MemoryStorage::new();
        seed(&store, "admin", "t1", "alice", "admin");
        seed(&store, "staff", "t2", "bob", "staff");
        assert!(SessionService::new(store).restore().is_none());
    }

    #[test]
    fn test_login_persists_for_next_load() {
        let store = MemoryStorage::new();
        let service = SessionService::new(store.clone());
        service.restore();
        service.login(staff(), true);

        assert_eq!(store.get("staffRole").as_deref(), Some("staff"));
        assert_eq!(store.get("staffRememberMe").as_deref(), Some("true"));

        let reloaded = SessionService::new(store);
        assert_eq!(reloaded.restore(), Some(staff()));
        assert!(reloaded.remember_me(Role::Staff));
        assert!(!reloaded.remember_me(Role::Admin));
    }

    #[test]
    fn test_login_clears_other_role() {
        let store = MemoryStorage::new();
        let service = SessionService::new(store.clone());
        service.login(admin(), false);
        service.login(staff(), false);

        assert!(store.get("adminToken").is_none());
        assert_eq!(SessionService::new(store).restore(), Some(staff()));
    }

    #[test]
    fn test_logout_clears_everything_and_is_idempotent() {
        let store = MemoryStorage::new();
        let service = SessionService::new(store.clone());
        service.login(admin(), true);
        // Stray keys from the other role are cleared as well
        store.set("staffToken", "stale");

        service.logout();
        assert!(store.is_empty());
        assert!(service.session().is_none());
        assert!(!service.remember_me(Role::Admin));

        service.logout();
        assert!(store.is_empty());
    }

    #[test]
    fn test_subscribers_see_complete_sessions() {
        let service = SessionService::new(MemoryStorage::new());
        let seen: Rc<RefCell<Vec<Option<Session>>>> = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let id = service.subscribe(move |s| sink.borrow_mut().push(s.cloned()));

        service.login(admin(), false);
        service.logout();
        service.unsubscribe(id);
        service.login(staff(), false);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Some(admin()));
        assert_eq!(seen[1], None);
    }

    #[test]
    fn test_listener_can_read_service() {
        let service = SessionService::new(MemoryStorage::new());
        let observed = Rc::new(Cell::new(false));

        let handle = service.clone();
        let flag = Rc::clone(&observed);
        service.subscribe(move |s| {
            flag.set(handle.session().as_ref() == s);
        });

        service.login(admin(), false);
        assert!(observed.get());
    }
}
