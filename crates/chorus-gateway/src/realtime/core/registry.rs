use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::extract::ws::Message;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use chorus_core::error::{ChorusError, Result};

/// Transport-assigned connection id. Unique for the life of the process.
pub type ConnId = u64;

/// One live socket: its id plus the sender half of its outbound queue.
/// Equality is by id only.
#[derive(Clone)]
pub struct Connection {
    id: ConnId,
    tx: mpsc::Sender<Message>,
}

impl Connection {
    pub fn new(id: ConnId, tx: mpsc::Sender<Message>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> ConnId {
        self.id
    }

    /// Non-blocking enqueue. Fails when the queue is full or the socket task is gone.
    pub(crate) fn try_send(&self, msg: Message) -> std::result::Result<(), TrySendError<Message>> {
        self.tx.try_send(msg)
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("id", &self.id).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub song: String,
    pub artist: String,
}

/// Per-session user state. Exists only between login and close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    display_name: String,
    pub currently_playing: Option<NowPlaying>,
    /// Top artists as reported by the client. Stored, not yet read by any feature.
    pub music_profile: Option<Vec<String>>,
}

impl User {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            currently_playing: None,
            music_profile: None,
        }
    }

    /// Fixed at login for the rest of the session.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

struct Entry {
    conn: Connection,
    user: User,
}

#[derive(Default)]
struct State {
    users: HashMap<ConnId, Entry>,
    open: HashSet<ConnId>,
}

/// Registry:
/// - `conn_id -> (Connection, User)` for every logged-in session
/// - the set of open sockets, logged in or not
///
/// All access goes through [`Registry::lock`]; one guard is one critical
/// section, so a handler that mutates and then broadcasts is never observed
/// half-applied by a concurrent login or close.
pub struct Registry {
    state: Mutex<State>,
    seq: AtomicU64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            seq: AtomicU64::new(1),
        }
    }

    /// Allocate an id for a freshly accepted socket.
    pub fn next_conn_id(&self) -> ConnId {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    pub fn lock(&self) -> RegistryGuard<'_> {
        // A panic inside a critical section leaves the map itself intact; keep serving.
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        RegistryGuard { state }
    }

    /// Number of logged-in users.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of open sockets, including anonymous ones.
    pub fn open_connections(&self) -> usize {
        self.lock().state.open.len()
    }

    pub fn contains(&self, id: ConnId) -> bool {
        self.lock().get(id).is_some()
    }

    /// Snapshot copy of a user's state.
    pub fn user(&self, id: ConnId) -> Option<User> {
        self.lock().get(id).cloned()
    }

    /// Sorted display names of all logged-in users.
    pub fn display_names(&self) -> Vec<String> {
        let guard = self.lock();
        let mut names: Vec<String> = guard
            .state
            .users
            .values()
            .map(|e| e.user.display_name.clone())
            .collect();
        names.sort();
        names
    }
}

/// Exclusive access to the registry for the duration of one operation.
pub struct RegistryGuard<'a> {
    state: MutexGuard<'a, State>,
}

impl RegistryGuard<'_> {
    pub(crate) fn mark_open(&mut self, id: ConnId) {
        self.state.open.insert(id);
    }

    pub(crate) fn mark_closed(&mut self, id: ConnId) {
        self.state.open.remove(&id);
    }

    /// Register a user for a connection that has none yet.
    pub fn insert(&mut self, conn: Connection, user: User) -> Result<()> {
        if self.state.users.contains_key(&conn.id) {
            return Err(ChorusError::AlreadyRegistered);
        }
        self.state.users.insert(conn.id, Entry { conn, user });
        Ok(())
    }

    /// Erase a connection's user. `None` if it never logged in or is already gone.
    pub fn remove(&mut self, id: ConnId) -> Option<User> {
        self.state.users.remove(&id).map(|e| e.user)
    }

    pub fn lookup(&mut self, id: ConnId) -> Option<&mut User> {
        self.state.users.get_mut(&id).map(|e| &mut e.user)
    }

    pub fn get(&self, id: ConnId) -> Option<&User> {
        self.state.users.get(&id).map(|e| &e.user)
    }

    pub fn len(&self) -> usize {
        self.state.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.users.is_empty()
    }

    /// Case-insensitive display-name check across logged-in users.
    pub fn name_taken(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.state
            .users
            .values()
            .any(|e| e.user.display_name.to_lowercase() == wanted)
    }

    /// Visit every logged-in (connection, user) pair. Order is unspecified.
    pub fn for_each(&self, mut f: impl FnMut(&Connection, &User)) {
        for e in self.state.users.values() {
            f(&e.conn, &e.user);
        }
    }

    pub fn for_each_except(&self, except: ConnId, mut f: impl FnMut(&Connection, &User)) {
        for (id, e) in self.state.users.iter() {
            if *id != except {
                f(&e.conn, &e.user);
            }
        }
    }
}
