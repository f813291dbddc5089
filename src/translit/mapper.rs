//! Cluster → Romanised sound, driven by a small positional state machine.
//!
//! Inside a word every cluster sits in one of three positions:
//!
//! ```text
//!   Initial ──▶ MidWord ──▶ … ──▶ WordFinal
//!      └───────────────────────────▲      (single-cluster word)
//! ```
//!
//! The position only matters for bare consonants (no vowel sign): they carry
//! the inherent vowel "o" everywhere except in [`Position::WordFinal`], where
//! it is silent. Word boundaries are known before mapping starts, so the
//! position of each cluster is computed up front from its index.
//!
//! | Cluster                               | Output                                  |
//! |---------------------------------------|-----------------------------------------|
//! | bare consonant, not final             | sound + "o"                             |
//! | bare consonant, final                 | sound                                   |
//! | consonant + vowel sign                | sound + vowel sound                     |
//! | conjunct C্C[্C…]                      | member sounds, vowel rule on last only  |
//! | consonant + trailing hasanta, or ৎ    | sound                                   |
//! | vowel, modifier, digit, punctuation…  | table lookup, identity fallback         |
//! | orphan vowel sign                     | the sign's vowel sound                  |
//! | stray hasanta                         | nothing                                 |

use super::segment::{Cluster, ClusterKind};
use super::tables::{classify, is_dead_consonant, CharacterClass, MappingTables};

/// The vowel a bare consonant carries.
pub const INHERENT_VOWEL: &str = "o";

/// Where a cluster sits inside its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Initial,
    MidWord,
    WordFinal,
}

impl Position {
    /// Position of the cluster at `index` in a word of `len` clusters.
    pub fn of(index: usize, len: usize) -> Self {
        if index + 1 >= len {
            Position::WordFinal
        } else if index == 0 {
            Position::Initial
        } else {
            Position::MidWord
        }
    }

    /// Advance one cluster along a word of `len` clusters.
    pub fn advance(self, next_index: usize, len: usize) -> Self {
        match self {
            Position::WordFinal => Position::WordFinal,
            _ => Position::of(next_index, len),
        }
    }

    pub fn carries_inherent_vowel(self) -> bool {
        !matches!(self, Position::WordFinal)
    }
}

/// Positional context threaded through the clusters of one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    pub position: Position,
    /// The previous cluster ended in a consonant sound with no vowel after it.
    pub after_bare_consonant: bool,
}

/// Maps clusters using a borrowed, immutable table.
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'t> {
    tables: &'t MappingTables,
}

impl<'t> Mapper<'t> {
    pub fn new(tables: &'t MappingTables) -> Self {
        Self { tables }
    }

    /// Map one cluster. Returns its output and the context after it; the
    /// returned position is unchanged (the caller advances it).
    pub fn map_cluster(&self, cluster: &Cluster<'_>, ctx: Context) -> (String, Context) {
        let mut out = String::with_capacity(cluster.text.len());

        let bare = match cluster.kind {
            ClusterKind::Consonant {
                vowel_sign, killed, ..
            } => self.map_consonant(cluster.text, vowel_sign, killed, ctx.position, &mut out),
            ClusterKind::OrphanVowelSign => {
                // Degraded mode: no consonant to attach to, so pronounce the
                // sign on its own.
                self.push_all(cluster.text, &mut out);
                false
            }
            ClusterKind::StrayJoiner => ctx.after_bare_consonant,
            ClusterKind::IndependentVowel
            | ClusterKind::Modifier
            | ClusterKind::Digit
            | ClusterKind::Punctuation
            | ClusterKind::Whitespace
            | ClusterKind::Other => {
                self.push_all(cluster.text, &mut out);
                false
            }
        };

        (
            out,
            Context {
                position: ctx.position,
                after_bare_consonant: bare,
            },
        )
    }

    /// Map the clusters of one word (no boundaries inside).
    pub fn map_word(&self, clusters: &[Cluster<'_>]) -> String {
        let len = clusters.len();
        let mut out = String::with_capacity(len * 3);
        let mut ctx = Context {
            position: Position::of(0, len),
            after_bare_consonant: false,
        };

        for (i, cluster) in clusters.iter().enumerate() {
            let (piece, next) = self.map_cluster(cluster, ctx);
            out.push_str(&piece);
            ctx = Context {
                position: ctx.position.advance(i + 1, len),
                ..next
            };
        }

        out
    }

    /// Emit member consonants, then the vowel. Returns `true` when the
    /// cluster ends without a vowel sound.
    fn map_consonant(
        &self,
        text: &str,
        vowel_sign: Option<char>,
        killed: bool,
        position: Position,
        out: &mut String,
    ) -> bool {
        let mut last = None;
        for ch in text.chars() {
            if classify(ch) == CharacterClass::ConsonantBase {
                self.tables.push_sound_or_identity(ch, out);
                last = Some(ch);
            }
        }

        if let Some(v) = vowel_sign {
            self.tables.push_sound_or_identity(v, out);
            return false;
        }

        let dead = killed || last.is_some_and(is_dead_consonant);
        if !dead && position.carries_inherent_vowel() {
            out.push_str(INHERENT_VOWEL);
            false
        } else {
            true
        }
    }

    fn push_all(&self, text: &str, out: &mut String) {
        for ch in text.chars() {
            self.tables.push_sound_or_identity(ch, out);
        }
    }
}
