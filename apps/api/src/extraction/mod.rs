// Phase 1: Field Extraction Pipeline
// Implements: section segmentation, regex cascades, LLM fallback, degraded acceptance.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod candidate;
pub mod cascade;
pub mod handlers;
pub mod patterns;
pub mod role;
pub mod segmenter;

// Re-export the pipeline entry points consumed by handlers and tests.
pub use candidate::extract_candidate;
pub use role::extract_role;
