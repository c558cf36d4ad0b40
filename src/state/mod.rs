//! Device state: the registry, devices, and their match rules.

mod device;
mod registry;
mod rules;
mod wildcard;

pub use device::{ConnectionId, Device, DeviceToken, NegotiationState, NetworkRef};
pub use registry::{DeviceHandle, DeviceRegistry};
pub use rules::{FilterKind, MatchRules, MessageView, NICK_PLACEHOLDER};
pub use wildcard::glob_match;
