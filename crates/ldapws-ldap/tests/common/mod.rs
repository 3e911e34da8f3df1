//! Common test utilities for the LDAP write support tests.
//!
//! These tests run against an in-memory directory instead of a real server.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use ldapws_core::directory::{DirectoryEntry, DirectoryOps, Modification, SearchScope};
use ldapws_core::error::{result_code, DirectoryError, DirectoryResult};
use ldapws_core::ids::UserId;
use ldapws_core::plugin::DeletionFlag;
use ldapws_ldap::{ConnectionProvider, EndpointConfig, LdapConfig};

pub const BASE_DN: &str = "dc=example,dc=com";
pub const PEOPLE_DN: &str = "ou=people,dc=example,dc=com";
pub const GROUPS_DN: &str = "ou=groups,dc=example,dc=com";

static INIT: Once = Once::new();

/// Route tracing output through the test harness.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn user_dn(uid: &str) -> String {
    format!("uid={uid},{PEOPLE_DN}")
}

pub fn group_dn(cn: &str) -> String {
    format!("cn={cn},{GROUPS_DN}")
}

/// Endpoint configuration matching the sample tree.
pub fn test_config() -> LdapConfig {
    LdapConfig::new("ldap.example.com", BASE_DN, "cn=admin,dc=example,dc=com")
        .with_password("secret")
        .with_user_container("ou=people")
        .with_group_container("ou=groups")
}

pub fn endpoint(prefix: &str) -> EndpointConfig {
    EndpointConfig::new(prefix, test_config())
}

/// A request that changed (or tried to change) the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Modify {
        dn: String,
        modifications: Vec<Modification>,
    },
    Delete {
        dn: String,
    },
    PasswordModify {
        dn: String,
        password: String,
    },
}

#[derive(Default)]
struct State {
    entries: BTreeMap<String, DirectoryEntry>,
    calls: Vec<Call>,
    rejections: HashMap<String, u32>,
    search_rejections: HashMap<String, u32>,
    searches: usize,
}

/// In-memory directory understanding `(&(a=b)(c=d))` style filters.
pub struct FakeDirectory {
    state: Mutex<State>,
    exop_supported: bool,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            exop_supported: false,
        }
    }

    /// People alice, bob, carol and dave; group engineering owned by bob and
    /// carol; group sales without owners.
    pub fn sample() -> Self {
        let directory = Self::new();
        for uid in ["alice", "bob", "carol", "dave"] {
            directory.add_user(uid);
        }
        directory.add_group("engineering", &["bob", "carol"]);
        directory.add_group("sales", &[]);
        directory
    }

    #[must_use]
    pub fn with_password_modify(mut self) -> Self {
        self.exop_supported = true;
        self
    }

    pub fn add_user(&self, uid: &str) {
        self.insert(
            DirectoryEntry::new(user_dn(uid))
                .with_attr("objectClass", ["top", "inetOrgPerson"])
                .with_attr("uid", [uid])
                .with_attr("cn", [uid])
                .with_attr("sn", [uid]),
        );
    }

    pub fn add_group(&self, cn: &str, owners: &[&str]) {
        let mut entry = DirectoryEntry::new(group_dn(cn))
            .with_attr("objectClass", ["top", "groupOfNames"])
            .with_attr("cn", [cn]);
        if !owners.is_empty() {
            entry = entry.with_attr("owner", owners.iter().map(|uid| user_dn(uid)));
        }
        self.insert(entry);
    }

    pub fn insert(&self, entry: DirectoryEntry) {
        let mut state = self.state.lock().unwrap();
        state.entries.insert(entry.dn.to_lowercase(), entry);
    }

    /// Answer every write to `dn` with `rc`.
    pub fn reject(&self, dn: &str, rc: u32) {
        let mut state = self.state.lock().unwrap();
        state.rejections.insert(dn.to_lowercase(), rc);
    }

    /// Answer base searches on `dn` with `rc`, as a server referring elsewhere would.
    pub fn reject_search(&self, dn: &str, rc: u32) {
        let mut state = self.state.lock().unwrap();
        state.search_rejections.insert(dn.to_lowercase(), rc);
    }

    pub fn entry(&self, dn: &str) -> Option<DirectoryEntry> {
        let state = self.state.lock().unwrap();
        state.entries.get(&dn.to_lowercase()).cloned()
    }

    /// Values of `attribute` on `dn`, sorted.
    pub fn values(&self, dn: &str, attribute: &str) -> Vec<String> {
        let mut values = self
            .entry(dn)
            .map(|entry| entry.values(attribute).to_vec())
            .unwrap_or_default();
        values.sort();
        values
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of write requests issued, accepted or not.
    pub fn mutation_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn search_count(&self) -> usize {
        self.state.lock().unwrap().searches
    }

    fn check_writable(state: &State, dn: &str) -> DirectoryResult<()> {
        if let Some(rc) = state.rejections.get(&dn.to_lowercase()) {
            return Err(DirectoryError::rejected(dn, *rc, "rejected by test"));
        }
        if !state.entries.contains_key(&dn.to_lowercase()) {
            return Err(DirectoryError::rejected(
                dn,
                result_code::NO_SUCH_OBJECT,
                "No such object",
            ));
        }
        Ok(())
    }
}

impl Default for FakeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn unescape(value: &str) -> String {
    value
        .replace("\\2a", "*")
        .replace("\\28", "(")
        .replace("\\29", ")")
        .replace("\\00", "\0")
        .replace("\\5c", "\\")
}

/// Equality atoms of a filter; every atom must match.
fn atoms(filter: &str) -> Vec<(String, String)> {
    let mut atoms = Vec::new();
    let mut rest = filter;
    while let Some(start) = rest.find('(') {
        rest = &rest[start + 1..];
        if rest.starts_with(|c| matches!(c, '&' | '|' | '!' | '(')) {
            continue;
        }
        let Some(end) = rest.find(')') else {
            break;
        };
        if let Some((attribute, value)) = rest[..end].split_once('=') {
            atoms.push((attribute.to_string(), unescape(value)));
        }
        rest = &rest[end + 1..];
    }
    atoms
}

fn matches_filter(entry: &DirectoryEntry, filter: &str) -> bool {
    atoms(filter).iter().all(|(attribute, value)| {
        if value == "*" {
            return attribute.eq_ignore_ascii_case("objectClass") || entry.has(attribute);
        }
        entry
            .values(attribute)
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(value))
    })
}

fn is_under(dn: &str, base: &str) -> bool {
    let dn = dn.to_lowercase();
    let base = base.to_lowercase();
    dn == base || dn.ends_with(&format!(",{base}"))
}

fn text(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}

fn apply(entry: &mut DirectoryEntry, dn: &str, modification: &Modification) -> DirectoryResult<()> {
    let key = entry
        .attrs
        .keys()
        .find(|key| key.eq_ignore_ascii_case(modification.attribute()))
        .cloned()
        .unwrap_or_else(|| modification.attribute().to_string());
    let values: Vec<String> = modification.values().iter().map(|v| text(v)).collect();

    match modification {
        Modification::Add { .. } => {
            let current = entry.attrs.entry(key).or_default();
            for value in values {
                if current.contains(&value) {
                    return Err(DirectoryError::rejected(
                        dn,
                        result_code::ATTRIBUTE_OR_VALUE_EXISTS,
                        "Type or value exists",
                    ));
                }
                current.push(value);
            }
        }
        Modification::Delete { .. } if values.is_empty() => {
            entry.attrs.remove(&key);
        }
        Modification::Delete { .. } => {
            let current = entry.attrs.entry(key.clone()).or_default();
            for value in values {
                let Some(position) = current.iter().position(|v| *v == value) else {
                    return Err(DirectoryError::rejected(
                        dn,
                        result_code::NO_SUCH_ATTRIBUTE,
                        "No such attribute",
                    ));
                };
                current.remove(position);
            }
            if current.is_empty() {
                entry.attrs.remove(&key);
            }
        }
        Modification::Replace { .. } => {
            entry.attrs.insert(key, values);
        }
    }
    Ok(())
}

#[async_trait]
impl DirectoryOps for FakeDirectory {
    fn endpoint(&self) -> &str {
        "ldap://fake:389"
    }

    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
        _attributes: &[&str],
    ) -> DirectoryResult<Vec<DirectoryEntry>> {
        let mut state = self.state.lock().unwrap();
        state.searches += 1;

        if let Some(rc) = state.search_rejections.get(&base.to_lowercase()) {
            return Err(DirectoryError::rejected(base, *rc, "rejected by test"));
        }

        if scope == SearchScope::Base {
            let Some(entry) = state.entries.get(&base.to_lowercase()) else {
                return Err(DirectoryError::rejected(
                    base,
                    result_code::NO_SUCH_OBJECT,
                    "No such object",
                ));
            };
            return Ok(if matches_filter(entry, filter) {
                vec![entry.clone()]
            } else {
                vec![]
            });
        }

        Ok(state
            .entries
            .values()
            .filter(|entry| is_under(&entry.dn, base))
            .filter(|entry| scope == SearchScope::Subtree || !entry.dn.eq_ignore_ascii_case(base))
            .filter(|entry| matches_filter(entry, filter))
            .cloned()
            .collect())
    }

    async fn modify(&self, dn: &str, modifications: Vec<Modification>) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Modify {
            dn: dn.to_string(),
            modifications: modifications.clone(),
        });
        Self::check_writable(&state, dn)?;

        let mut entry = state.entries[&dn.to_lowercase()].clone();
        for modification in &modifications {
            apply(&mut entry, dn, modification)?;
        }
        state.entries.insert(dn.to_lowercase(), entry);
        Ok(())
    }

    async fn delete(&self, dn: &str) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete { dn: dn.to_string() });
        Self::check_writable(&state, dn)?;
        state.entries.remove(&dn.to_lowercase());
        Ok(())
    }

    async fn supports_password_modify(&self) -> DirectoryResult<bool> {
        Ok(self.exop_supported)
    }

    async fn password_modify(&self, dn: &str, new_password: &str) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::PasswordModify {
            dn: dn.to_string(),
            password: new_password.to_string(),
        });
        Self::check_writable(&state, dn)
    }
}

/// Hands out one shared [`FakeDirectory`] and counts connects.
pub struct FakeConnector {
    pub directory: Arc<FakeDirectory>,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub fn new(directory: Arc<FakeDirectory>) -> Self {
        Self {
            directory,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionProvider for FakeConnector {
    async fn connect(&self, _endpoint: &EndpointConfig) -> DirectoryResult<Arc<dyn DirectoryOps>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.directory.clone())
    }
}

/// Records flagged users.
#[derive(Default)]
pub struct RecordingFlag {
    pub flagged: Mutex<Vec<UserId>>,
}

#[async_trait]
impl DeletionFlag for RecordingFlag {
    async fn flag_record(&self, user: &UserId) -> DirectoryResult<()> {
        self.flagged.lock().unwrap().push(user.clone());
        Ok(())
    }
}
