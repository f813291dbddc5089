//! Bengali → phonetic English transliteration core.
//!
//! Leaves first: [`tables`] → [`normalize`] → [`segment`] → [`mapper`] →
//! [`exceptions`] → [`text`]. Everything here is pure and infallible; the
//! only shared state is the immutable mapping table.

pub mod exceptions;
pub mod mapper;
pub mod normalize;
pub mod segment;
pub mod tables;
pub mod text;

pub use exceptions::ExceptionDictionary;
pub use mapper::{Context, Mapper, Position};
pub use normalize::normalize;
pub use segment::{segment, Cluster, ClusterKind, Segmenter};
pub use tables::{classify, CharacterClass, MappingTables};
pub use text::{sentence_case, CaseStyle, Transliterator};
