//! Push device state.
//!
//! A [`Device`] is one client installation that wants push notifications. It is
//! identified by an opaque token chosen by the client, and can be shared by any
//! number of connections (a phone running several IRC clients, or one client
//! connected to several networks).
//!
//! # Architecture
//!
//! ```text
//! Connection₁ ─┐                    ┌─ (alice, libera)
//! Connection₂ ─┼→ Device (token) ───┼─ (alice, oftc)
//! Connection₃ ─┘                    └─ (bob, libera)
//! ```

use super::rules::{FilterKind, MatchRules, MessageView};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use uuid::Uuid;

/// Unique identifier for a client connection.
pub type ConnectionId = Uuid;

/// Device tokens are opaque, case-sensitive strings.
pub type DeviceToken = String;

/// Negotiation state of a device.
///
/// Shared by every connection attached to the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NegotiationState {
    #[default]
    Idle,
    Negotiating,
}

impl NegotiationState {
    pub fn is_negotiating(self) -> bool {
        self == Self::Negotiating
    }
}

/// A (user, network) pair on the bouncer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkRef {
    pub user: String,
    pub network: String,
}

impl NetworkRef {
    pub fn new(user: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            network: network.into(),
        }
    }
}

/// A registered push endpoint.
#[derive(Debug)]
pub struct Device {
    token: DeviceToken,
    version: String,
    push_endpoint: String,
    state: NegotiationState,

    /// Connections currently attached to this device.
    connections: HashSet<ConnectionId>,

    /// Linked networks, keyed by bouncer user.
    networks: BTreeMap<String, BTreeSet<String>>,

    /// Client-side network identifiers, echoed back in pushes.
    network_ids: HashMap<NetworkRef, String>,

    rules: MatchRules,
}

impl Device {
    /// Create an idle, unconfigured device.
    pub fn new(token: impl Into<DeviceToken>) -> Self {
        Self {
            token: token.into(),
            version: String::new(),
            push_endpoint: String::new(),
            state: NegotiationState::Idle,
            connections: HashSet::new(),
            networks: BTreeMap::new(),
            network_ids: HashMap::new(),
            rules: MatchRules::default(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// The configured push endpoint, if any.
    pub fn push_endpoint(&self) -> Option<&str> {
        Some(self.push_endpoint.as_str()).filter(|e| !e.is_empty())
    }

    pub fn set_push_endpoint(&mut self, endpoint: impl Into<String>) {
        self.push_endpoint = endpoint.into();
    }

    // ------------------------------------------------------------------
    // Negotiation
    // ------------------------------------------------------------------

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn is_negotiating(&self) -> bool {
        self.state.is_negotiating()
    }

    /// Enter negotiation.
    pub fn begin_negotiation(&mut self) {
        self.state = NegotiationState::Negotiating;
    }

    /// Leave negotiation.
    pub fn end_negotiation(&mut self) {
        self.state = NegotiationState::Idle;
    }

    /// Whether an idle device announcing `version` must renegotiate.
    pub fn needs_renegotiation(&self, version: &str) -> bool {
        self.state == NegotiationState::Idle && self.version != version
    }

    /// Wipe configuration and network links ahead of a fresh negotiation.
    ///
    /// Attached connections are kept.
    pub fn reset(&mut self) {
        self.state = NegotiationState::Idle;
        self.version.clear();
        self.push_endpoint.clear();
        self.networks.clear();
        self.network_ids.clear();
        self.rules.clear();
    }

    // ------------------------------------------------------------------
    // Connections
    // ------------------------------------------------------------------

    pub fn has_connection(&self, conn: ConnectionId) -> bool {
        self.connections.contains(&conn)
    }

    /// Returns `false` if the connection was already attached.
    pub(crate) fn add_connection(&mut self, conn: ConnectionId) -> bool {
        self.connections.insert(conn)
    }

    pub(crate) fn remove_connection(&mut self, conn: ConnectionId) -> bool {
        self.connections.remove(&conn)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // ------------------------------------------------------------------
    // Networks
    // ------------------------------------------------------------------

    /// Link a network. Linking twice is a no-op.
    pub fn link_network(&mut self, network: &NetworkRef) -> bool {
        self.networks
            .entry(network.user.clone())
            .or_default()
            .insert(network.network.clone())
    }

    /// Unlink a network, dropping the user entry once it has no networks left.
    pub fn unlink_network(&mut self, network: &NetworkRef) -> bool {
        let Some(names) = self.networks.get_mut(&network.user) else {
            return false;
        };
        let removed = names.remove(&network.network);
        if names.is_empty() {
            self.networks.remove(&network.user);
        }
        self.network_ids.remove(network);
        removed
    }

    pub fn has_network(&self, network: &NetworkRef) -> bool {
        self.networks
            .get(&network.user)
            .is_some_and(|names| names.contains(&network.network))
    }

    /// Record the client's identifier for `network`.
    pub fn set_network_id(&mut self, network: &NetworkRef, id: impl Into<String>) {
        self.network_ids.insert(network.clone(), id.into());
    }

    /// The client's identifier for `network`, if it sent one.
    pub fn network_id(&self, network: &NetworkRef) -> Option<&str> {
        self.network_ids.get(network).map(String::as_str)
    }

    /// Whether the device completed a negotiation at least once.
    pub fn has_negotiated(&self) -> bool {
        !self.version.is_empty()
    }

    /// Linked networks grouped by user, in sorted order.
    pub fn networks(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.networks
    }

    /// An inert device has no linked networks and can never be notified.
    pub fn is_inert(&self) -> bool {
        self.networks.is_empty()
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn add_filter(&mut self, kind: FilterKind, value: impl Into<String>) {
        self.rules.add(kind, value);
    }

    /// Decide whether a message from `network` should be pushed to this device.
    pub fn wants(&self, network: &NetworkRef, msg: &MessageView<'_>) -> bool {
        self.has_network(network) && self.rules.should_notify(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_device_is_idle_and_unconfigured() {
        let device = Device::new("tok");
        assert_eq!(device.token(), "tok");
        assert_eq!(device.state(), NegotiationState::Idle);
        assert_eq!(device.version(), "");
        assert_eq!(device.push_endpoint(), None);
        assert!(device.is_inert());
    }

    #[test]
    fn renegotiation_only_when_idle_and_version_differs() {
        let mut device = Device::new("tok");
        assert!(device.needs_renegotiation("1"));

        device.set_version("1");
        assert!(!device.needs_renegotiation("1"));
        assert!(device.needs_renegotiation("2"));

        device.begin_negotiation();
        assert!(!device.needs_renegotiation("2"));
    }

    #[test]
    fn linking_is_idempotent() {
        let mut device = Device::new("tok");
        let net = NetworkRef::new("alice", "libera");
        assert!(device.link_network(&net));
        assert!(!device.link_network(&net));
        assert_eq!(device.networks()["alice"].len(), 1);
    }

    #[test]
    fn unlinking_last_network_drops_user() {
        let mut device = Device::new("tok");
        let libera = NetworkRef::new("alice", "libera");
        let oftc = NetworkRef::new("alice", "oftc");
        device.link_network(&libera);
        device.link_network(&oftc);

        assert!(device.unlink_network(&libera));
        assert!(!device.is_inert());
        assert!(device.unlink_network(&oftc));
        assert!(device.is_inert());
        assert!(!device.unlink_network(&oftc));
    }

    #[test]
    fn network_id_follows_the_link() {
        let mut device = Device::new("tok");
        let libera = NetworkRef::new("alice", "libera");
        device.link_network(&libera);
        device.set_network_id(&libera, "b758eaab");

        assert_eq!(device.network_id(&libera), Some("b758eaab"));
        assert_eq!(device.network_id(&NetworkRef::new("alice", "oftc")), None);

        device.unlink_network(&libera);
        assert_eq!(device.network_id(&libera), None);
    }

    #[test]
    fn reset_keeps_token_and_connections() {
        let mut device = Device::new("tok");
        let conn = ConnectionId::new_v4();
        device.add_connection(conn);
        device.set_version("3");
        device.set_push_endpoint("https://push.example/1");
        let libera = NetworkRef::new("alice", "libera");
        device.link_network(&libera);
        device.set_network_id(&libera, "b758eaab");
        device.add_filter(FilterKind::MentionNick, "carol");
        device.begin_negotiation();
        assert!(device.has_negotiated());

        device.reset();

        assert_eq!(device.token(), "tok");
        assert!(device.has_connection(conn));
        assert_eq!(device.version(), "");
        assert_eq!(device.push_endpoint(), None);
        assert!(device.is_inert());
        assert_eq!(device.network_id(&libera), None);
        assert!(device.rules().is_empty());
        assert!(!device.is_negotiating());
        assert!(!device.has_negotiated());
    }

    #[test]
    fn unlinked_device_wants_nothing() {
        let mut device = Device::new("tok");
        let net = NetworkRef::new("alice", "libera");
        let msg = MessageView {
            text: "hi",
            sender: "carol",
            channel: None,
            self_nick: "alice",
        };
        assert!(!device.wants(&net, &msg));
        device.link_network(&net);
        assert!(device.wants(&net, &msg));
    }
}
