//! Sentences and the knowledge base that propagates them.

mod knowledge;
mod sentence;

pub use knowledge::{Fact, KnowledgeBase};
pub use sentence::Sentence;
