//! Speaker role resolution
//!
//! Two strategies, chosen by how a corpus identifies the active speaker:
//!
//! - **Channel classification** (CSJ): the last character of a clause ID
//!   names the recording channel. `L` is always the interviewer, `R` always
//!   the interviewee. The talk-level bundles of both people are then
//!   assigned as speaker/interlocutor accordingly.
//! - **Dyadic elimination** (CWPC): each row names its speaker only. In a
//!   talk with exactly two distinct speakers, the interlocutor is the other
//!   one.

use crate::error::{Error, Result};
use crate::report::Role;
use serde::Serialize;

/// Channel marker of the interviewer
pub const LEFT_CHANNEL: char = 'L';

/// Channel marker of the interviewee
pub const RIGHT_CHANNEL: char = 'R';

/// Trailing glyphs of speaker IDs that have no individual demographic record
pub const PLACEHOLDER_GLYPHS: [char; 2] = ['男', '女'];

/// Recording channel of a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    /// Read the channel from the trailing character of a clause ID
    pub fn from_clause_id(clause_id: &str) -> Option<Channel> {
        match clause_id.chars().last() {
            Some(LEFT_CHANNEL) => Some(Channel::Left),
            Some(RIGHT_CHANNEL) => Some(Channel::Right),
            _ => None,
        }
    }

    /// Classify a row's clause, failing the run on an unknown marker
    pub fn classify(row_id: i64, clause_id: Option<&str>) -> Result<Channel> {
        clause_id
            .and_then(Channel::from_clause_id)
            .ok_or_else(|| Error::UnrecognizedChannel {
                row_id,
                clause_id: clause_id.unwrap_or("").to_string(),
            })
    }

    /// Order the two talk owners as `(speaker, interlocutor)`
    ///
    /// `left` belongs to the left-channel owner (interviewer), `right` to
    /// the right-channel owner (interviewee).
    pub fn assign<T>(self, left: T, right: T) -> (T, T) {
        match self {
            Channel::Left => (left, right),
            Channel::Right => (right, left),
        }
    }
}

/// Demographics carried per talk owner in the dialogue corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeBundle {
    pub sex: Option<String>,
    pub age_range: Option<String>,
    pub birthplace: Option<String>,
}

/// Demographic snapshot of one participant in the dyadic corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantSnapshot {
    pub sex: Option<String>,
    pub age_range: Option<String>,
    pub occupation: Option<String>,
    pub occupation_type: Option<String>,
    pub post: Option<String>,
    pub origin: Option<String>,
    pub longest_residence: Option<String>,
}

/// Whether a speaker ID stands for an anonymous participant
pub fn is_placeholder(speaker_id: &str) -> bool {
    speaker_id
        .chars()
        .last()
        .is_some_and(|c| PLACEHOLDER_GLYPHS.contains(&c))
}

/// A talk participant with the demographics of their first utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub snapshot: ParticipantSnapshot,
}

/// The two participants of a resolvable talk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dyad {
    first: Participant,
    second: Participant,
}

/// Outcome of building the participant set of a talk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DyadPairing {
    Dyad(Dyad),
    /// Anything other than exactly two known speakers
    Unresolvable { participants: usize },
}

/// One direction of a dyad: who speaks and who listens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation<'a> {
    pub speaker: &'a Participant,
    pub interlocutor: &'a Participant,
}

impl<'a> Orientation<'a> {
    /// The first side of this orientation whose ID is a placeholder
    pub fn placeholder(&self) -> Option<(Role, &'a str)> {
        if is_placeholder(&self.speaker.id) {
            Some((Role::Speaker, self.speaker.id.as_str()))
        } else if is_placeholder(&self.interlocutor.id) {
            Some((Role::Interlocutor, self.interlocutor.id.as_str()))
        } else {
            None
        }
    }
}

impl Dyad {
    /// Build the distinct speaker set of a talk from its rows in table order
    ///
    /// Each participant keeps the snapshot of their first row. A NULL
    /// speaker counts as a participant but makes the talk unresolvable.
    pub fn from_rows(
        rows: impl IntoIterator<Item = (Option<String>, ParticipantSnapshot)>,
    ) -> DyadPairing {
        let mut distinct: Vec<(Option<String>, ParticipantSnapshot)> = Vec::new();
        for (speaker, snapshot) in rows {
            if !distinct.iter().any(|(seen, _)| *seen == speaker) {
                distinct.push((speaker, snapshot));
            }
        }

        let participants = distinct.len();
        let mut members = distinct.into_iter();
        match (members.next(), members.next(), members.next()) {
            (Some((Some(first), first_snapshot)), Some((Some(second), second_snapshot)), None) => {
                DyadPairing::Dyad(Dyad {
                    first: Participant {
                        id: first,
                        snapshot: first_snapshot,
                    },
                    second: Participant {
                        id: second,
                        snapshot: second_snapshot,
                    },
                })
            }
            _ => DyadPairing::Unresolvable { participants },
        }
    }

    pub fn participants(&self) -> [&str; 2] {
        [&self.first.id, &self.second.id]
    }

    /// Both speaking directions, first participant speaking first
    pub fn orientations(&self) -> [Orientation<'_>; 2] {
        [
            Orientation {
                speaker: &self.first,
                interlocutor: &self.second,
            },
            Orientation {
                speaker: &self.second,
                interlocutor: &self.first,
            },
        ]
    }
}
