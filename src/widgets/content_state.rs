// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! State tags for the state container.

use serde::{Deserialize, Serialize};

/// An open integer tag identifying a display state.
///
/// The built-in states of [`ContentState`] map onto the low tags; hosts that
/// register their own view providers can mint tags of their own above that
/// range. Tags are what travel through attributes and saved state: a tag is a
/// plain integer, so renaming or extending the Rust-side enum can never break
/// a previously persisted value.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateTag(pub u32);

/// The built-in display states.
///
/// Exactly one state is current at any time; `Content` is the default.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ContentState {
    /// The host-supplied content is displayed.
    Content,
    /// A loading indicator is displayed.
    Loading,
    /// The network-error view is displayed.
    NetworkError,
    /// The general-error view is displayed.
    GeneralError,
    /// The empty-state view is displayed.
    Empty,
}

impl ContentState {
    /// All built-in states, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Content,
        Self::Loading,
        Self::NetworkError,
        Self::GeneralError,
        Self::Empty,
    ];

    /// The stable integer tag of this state.
    pub const fn tag(self) -> StateTag {
        match self {
            Self::Content => StateTag(0),
            Self::Loading => StateTag(1),
            Self::NetworkError => StateTag(2),
            Self::GeneralError => StateTag(3),
            Self::Empty => StateTag(4),
        }
    }

    /// The built-in state carrying the given tag, if any.
    pub fn from_tag(tag: StateTag) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.tag() == tag)
    }
}

impl From<ContentState> for StateTag {
    fn from(state: ContentState) -> Self {
        state.tag()
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn tags_are_stable_and_round_trip() {
        for (index, state) in ContentState::ALL.into_iter().enumerate() {
            assert_eq!(state.tag(), StateTag(index as u32));
            assert_eq!(ContentState::from_tag(state.tag()), Some(state));
        }
        assert_matches!(ContentState::from_tag(StateTag(2)), Some(ContentState::NetworkError));
        assert_matches!(ContentState::from_tag(StateTag(99)), None);
    }

    #[test]
    fn tags_serialize_as_raw_integers() {
        let encoded = serde_json::to_string(&ContentState::GeneralError.tag()).unwrap();
        assert_eq!(encoded, "3");
        let decoded: StateTag = serde_json::from_str("4").unwrap();
        assert_eq!(decoded, ContentState::Empty.tag());
    }
}
