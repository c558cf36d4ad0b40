//! Mention and ignore filters attached to a device.
//!
//! A message is pushed when it is a *mention* and not *ignored*:
//!
//! ```text
//! mention = private message
//!         | channel  ~ mention_channels
//!         | sender   ~ mention_nicks
//!         | text     ⊇ mention_keywords
//!
//! ignored = channel  ~ ignore_channels
//!         | sender   ~ ignore_nicks
//!         | text     ⊇ ignore_keywords
//! ```
//!
//! Channel and nick filters are globs (see [`glob_match`]); keyword filters are
//! literal, case-sensitive substrings with one placeholder, [`NICK_PLACEHOLDER`],
//! standing for our own nickname on the network the message arrived on.

use super::wildcard::glob_match;

/// Keyword that expands to the bouncer user's current nickname.
pub const NICK_PLACEHOLDER: &str = "{nick}";

/// Which filter list an `ADD` targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    MentionKeyword,
    MentionChannel,
    MentionNick,
    IgnoreKeyword,
    IgnoreChannel,
    IgnoreNick,
}

impl FilterKind {
    /// Every filter kind, in the order they are listed.
    pub const ALL: [FilterKind; 6] = [
        FilterKind::MentionKeyword,
        FilterKind::MentionChannel,
        FilterKind::MentionNick,
        FilterKind::IgnoreKeyword,
        FilterKind::IgnoreChannel,
        FilterKind::IgnoreNick,
    ];

    /// Parse a protocol key such as `MENTION-NICK`. Keys are case-insensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key))
    }

    /// The protocol key for this filter kind.
    pub fn key(self) -> &'static str {
        match self {
            Self::MentionKeyword => "MENTION-KEYWORD",
            Self::MentionChannel => "MENTION-CHANNEL",
            Self::MentionNick => "MENTION-NICK",
            Self::IgnoreKeyword => "IGNORE-KEYWORD",
            Self::IgnoreChannel => "IGNORE-CHANNEL",
            Self::IgnoreNick => "IGNORE-NICK",
        }
    }
}

/// A message as seen by the matcher.
#[derive(Debug, Clone, Copy)]
pub struct MessageView<'a> {
    pub text: &'a str,
    pub sender: &'a str,
    /// `None` for a private message.
    pub channel: Option<&'a str>,
    /// Our own nickname on the network the message came from.
    pub self_nick: &'a str,
}

/// The six filter lists of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRules {
    pub mention_keywords: Vec<String>,
    pub mention_channels: Vec<String>,
    pub mention_nicks: Vec<String>,
    pub ignore_keywords: Vec<String>,
    pub ignore_channels: Vec<String>,
    pub ignore_nicks: Vec<String>,
}

impl MatchRules {
    /// Append `value` to the list selected by `kind`. Duplicates are kept.
    pub fn add(&mut self, kind: FilterKind, value: impl Into<String>) {
        self.list_mut(kind).push(value.into());
    }

    pub fn list(&self, kind: FilterKind) -> &[String] {
        match kind {
            FilterKind::MentionKeyword => &self.mention_keywords,
            FilterKind::MentionChannel => &self.mention_channels,
            FilterKind::MentionNick => &self.mention_nicks,
            FilterKind::IgnoreKeyword => &self.ignore_keywords,
            FilterKind::IgnoreChannel => &self.ignore_channels,
            FilterKind::IgnoreNick => &self.ignore_nicks,
        }
    }

    fn list_mut(&mut self, kind: FilterKind) -> &mut Vec<String> {
        match kind {
            FilterKind::MentionKeyword => &mut self.mention_keywords,
            FilterKind::MentionChannel => &mut self.mention_channels,
            FilterKind::MentionNick => &mut self.mention_nicks,
            FilterKind::IgnoreKeyword => &mut self.ignore_keywords,
            FilterKind::IgnoreChannel => &mut self.ignore_channels,
            FilterKind::IgnoreNick => &mut self.ignore_nicks,
        }
    }

    /// Drop every filter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        FilterKind::ALL.iter().all(|&kind| self.list(kind).is_empty())
    }

    /// Whether the message is a mention. Private messages always are.
    pub fn is_mention(&self, msg: &MessageView<'_>) -> bool {
        msg.channel
            .is_none_or(|channel| any_glob(&self.mention_channels, channel))
            || any_glob(&self.mention_nicks, msg.sender)
            || any_keyword(&self.mention_keywords, msg.text, msg.self_nick)
    }

    /// Whether an ignore filter suppresses the message.
    pub fn is_ignored(&self, msg: &MessageView<'_>) -> bool {
        msg.channel
            .is_some_and(|channel| any_glob(&self.ignore_channels, channel))
            || any_glob(&self.ignore_nicks, msg.sender)
            || any_keyword(&self.ignore_keywords, msg.text, msg.self_nick)
    }

    /// Final verdict: a mention that no ignore filter suppresses.
    #[inline]
    pub fn should_notify(&self, msg: &MessageView<'_>) -> bool {
        self.is_mention(msg) && !self.is_ignored(msg)
    }
}

fn any_glob(patterns: &[String], value: &str) -> bool {
    patterns.iter().any(|pattern| glob_match(pattern, value))
}

fn any_keyword(keywords: &[String], text: &str, self_nick: &str) -> bool {
    keywords.iter().any(|keyword| {
        let nick_hit =
            keyword == NICK_PLACEHOLDER && !self_nick.is_empty() && text.contains(self_nick);
        nick_hit || text.contains(keyword.as_str())
    })
}
