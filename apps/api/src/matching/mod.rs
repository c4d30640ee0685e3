// Phase 2: Matching Engine
// Implements: skill overlap, experience extraction, education ordinals, weighted
// composite scoring, ranked shortlist assembly. Scoring is pure and synchronous;
// only the skill-scorer seam is async so a semantic collaborator can plug in.

pub mod education;
pub mod engine;
pub mod experience;
pub mod handlers;
pub mod rank;
pub mod skills;

// Re-export the scoring API consumed by handlers and state wiring.
pub use engine::{EmbeddingSkillScorer, LexicalSkillScorer, MatchWeights, SkillScorer};
pub use rank::rank;
