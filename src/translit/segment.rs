//! Grapheme segmentation: split text into transliterable clusters.
//!
//! The segmenter is a plain [`Iterator`] over borrowed slices of the input.
//! Every [`Cluster::text`] is a contiguous sub-slice, and consecutive clusters
//! abut exactly, so concatenating them reproduces the input byte for byte.
//!
//! Cluster grammar (after [`super::normalize`]):
//!
//! ```text
//! consonant  := C N? (H C N?)* H? V?
//! vowel      := IV
//! orphan     := V            (no preceding consonant, malformed input)
//! stray      := H            (hasanta with no consonant before it)
//! single     := M | D | P | WS | other
//! ```
//!
//! where `C` is a consonant, `N` nukta, `H` hasanta, `V` a vowel sign,
//! `IV` an independent vowel and `M` a modifier.

use super::tables::{classify, CharacterClass};

/// What a cluster is, as far as the mapper cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKind {
    IndependentVowel,
    /// One consonant, or a conjunct of several joined by hasanta.
    Consonant {
        /// Number of consonant letters in the cluster (2+ for a conjunct).
        members: usize,
        /// Attached vowel sign, if any.
        vowel_sign: Option<char>,
        /// Ends in an explicit hasanta: the inherent vowel is suppressed.
        killed: bool,
    },
    /// A vowel sign with no consonant to attach to.
    OrphanVowelSign,
    /// A hasanta with no consonant before it.
    StrayJoiner,
    Modifier,
    Digit,
    Punctuation,
    Whitespace,
    Other,
}

impl ClusterKind {
    /// `true` for clusters that separate words.
    pub fn is_boundary(self) -> bool {
        matches!(self, ClusterKind::Whitespace | ClusterKind::Punctuation)
    }

    pub fn is_conjunct(self) -> bool {
        matches!(self, ClusterKind::Consonant { members, .. } if members > 1)
    }
}

/// One transliteration unit, borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster<'a> {
    pub text: &'a str,
    pub kind: ClusterKind,
}

/// Lazy left-to-right cluster iterator.
///
/// Cloning the iterator snapshots its position, so a sequence can be replayed
/// from any point; [`Segmenter::new`] on the same text restarts from the top.
#[derive(Debug, Clone)]
pub struct Segmenter<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Segmenter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek_at(&self, offset: usize) -> Option<(char, CharacterClass)> {
        self.text[offset..].chars().next().map(|c| (c, classify(c)))
    }

    /// Consume a consonant cluster starting at `start`. Returns the end offset
    /// and the cluster kind.
    fn consonant_cluster(&self, start: usize) -> (usize, ClusterKind) {
        let mut end = start + self.text[start..].chars().next().map_or(0, char::len_utf8);
        let mut members = 1;
        let mut killed = false;

        loop {
            match self.peek_at(end) {
                Some((c, CharacterClass::Nukta)) => {
                    end += c.len_utf8();
                }
                Some((h, CharacterClass::ConjunctJoiner)) => {
                    let after = end + h.len_utf8();
                    match self.peek_at(after) {
                        Some((c, CharacterClass::ConsonantBase)) => {
                            end = after + c.len_utf8();
                            members += 1;
                        }
                        _ => {
                            end = after;
                            killed = true;
                            break;
                        }
                    }
                }
                _ => break,
            }
        }

        let mut vowel_sign = None;
        if let Some((v, CharacterClass::VowelSign)) = self.peek_at(end) {
            end += v.len_utf8();
            vowel_sign = Some(v);
        }

        (
            end,
            ClusterKind::Consonant {
                members,
                vowel_sign,
                killed,
            },
        )
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = Cluster<'a>;

    fn next(&mut self) -> Option<Cluster<'a>> {
        let start = self.pos;
        let (ch, class) = self.peek_at(start)?;
        let single = start + ch.len_utf8();

        let (end, kind) = match class {
            CharacterClass::ConsonantBase => self.consonant_cluster(start),
            CharacterClass::IndependentVowel => (single, ClusterKind::IndependentVowel),
            CharacterClass::VowelSign => (single, ClusterKind::OrphanVowelSign),
            CharacterClass::ConjunctJoiner => (single, ClusterKind::StrayJoiner),
            CharacterClass::Modifier | CharacterClass::Nukta => (single, ClusterKind::Modifier),
            CharacterClass::Digit => (single, ClusterKind::Digit),
            CharacterClass::Punctuation => (single, ClusterKind::Punctuation),
            CharacterClass::Whitespace => (single, ClusterKind::Whitespace),
            CharacterClass::Other => (single, ClusterKind::Other),
        };

        self.pos = end;
        Some(Cluster {
            text: &self.text[start..end],
            kind,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.text.len() - self.pos;
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl std::iter::FusedIterator for Segmenter<'_> {}

/// Convenience wrapper: segment `text` eagerly.
pub fn segment(text: &str) -> Vec<Cluster<'_>> {
    Segmenter::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(s: &str) -> Vec<&str> {
        segment(s).into_iter().map(|c| c.text).collect()
    }

    #[test]
    fn empty_input() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn consonant_with_vowel_sign() {
        let clusters = segment("কা");
        assert_eq!(clusters.len(), 1);
        assert_eq!(
            clusters[0].kind,
            ClusterKind::Consonant {
                members: 1,
                vowel_sign: Some('া'),
                killed: false
            }
        );
    }

    #[test]
    fn word_clusters() {
        assert_eq!(texts("পথের"), vec!["প", "থে", "র"]);
        assert_eq!(texts("বাংলা"), vec!["বা", "ং", "লা"]);
    }

    #[test]
    fn conjuncts_extend() {
        let clusters = segment("উত্তরপ্রান্তে");
        let t: Vec<&str> = clusters.iter().map(|c| c.text).collect();
        assert_eq!(t, vec!["উ", "ত্ত", "র", "প্রা", "ন্তে"]);
        assert!(clusters[1].kind.is_conjunct());

        // Three-member conjunct: ন্দ্র
        let c = segment("ন্দ্র");
        assert_eq!(c.len(), 1);
        assert!(matches!(c[0].kind, ClusterKind::Consonant { members: 3, .. }));
    }

    #[test]
    fn trailing_hasanta_kills_vowel() {
        let c = segment("ক্");
        assert_eq!(c.len(), 1);
        assert!(matches!(
            c[0].kind,
            ClusterKind::Consonant {
                members: 1,
                killed: true,
                ..
            }
        ));
    }

    #[test]
    fn malformed_sequences_degrade() {
        let c = segment("াক");
        assert_eq!(c[0].kind, ClusterKind::OrphanVowelSign);
        assert_eq!(c[0].text, "া");

        let c = segment("্ক");
        assert_eq!(c[0].kind, ClusterKind::StrayJoiner);
        assert_eq!(c[1].text, "ক");
    }

    #[test]
    fn clusters_partition_input() {
        let input = "নিশ্চিন্দিপুর গ্রামের, abc ১২৩। ক্";
        let joined: String = Segmenter::new(input).map(|c| c.text).collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn passthrough_is_single_char() {
        let c = segment("ab");
        assert_eq!(c.len(), 2);
        assert!(c.iter().all(|c| c.kind == ClusterKind::Other));
    }

    #[test]
    fn restartable_by_clone() {
        let mut seg = Segmenter::new("কাক");
        let snapshot = seg.clone();
        let first: Vec<_> = seg.by_ref().collect();
        let replay: Vec<_> = snapshot.collect();
        assert_eq!(first, replay);
        assert!(seg.next().is_none());
    }
}
