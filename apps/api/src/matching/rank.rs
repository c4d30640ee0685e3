//! Ranked shortlist assembly.

use std::cmp::Ordering;

use crate::matching::engine::{composite_score, score_pair, MatchWeights, SkillScore, SkillScorer};
use crate::models::candidate::CandidateRecord;
use crate::models::matching::{MatchResult, SubScores};
use crate::models::role::RoleRequirement;

/// Ranks candidates against a role.
///
/// Every pair is scored; results under the shortlist threshold are computed
/// but left out of the returned sequence. Sorting is stable descending by
/// composite, so equal scores keep their input order.
pub async fn rank(
    role_id: i64,
    role: &RoleRequirement,
    candidates: &[(i64, CandidateRecord)],
    scorer: &dyn SkillScorer,
    weights: &MatchWeights,
    threshold: f64,
) -> Vec<MatchResult> {
    let mut results = Vec::new();
    for (candidate_id, candidate) in candidates {
        let (sub, skill_score) = score_pair(role, candidate, scorer).await;
        let composite = composite_score(&sub, weights);
        if composite < threshold {
            continue;
        }
        results.push(MatchResult {
            role_id,
            candidate_id: *candidate_id,
            composite_score: composite,
            sub_scores: sub,
            justification: build_justification(&sub, composite, &skill_score),
        });
    }

    results.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(Ordering::Equal)
    });
    results
}

/// Deterministic rationale: a headline with the sub-scores, then one line
/// per skill with a matched/missing marker. Built from the lexical
/// enumeration alone, so it never depends on any collaborator's prose.
pub fn build_justification(sub: &SubScores, composite: f64, skills: &SkillScore) -> String {
    let mut lines = vec![format!(
        "Overall match {:.0}% (skills {:.0}%, experience {:.0}%, education {:.0}%)",
        composite * 100.0,
        sub.skills * 100.0,
        sub.experience * 100.0,
        sub.education * 100.0
    )];
    for skill in &skills.required.matched {
        lines.push(format!("✅ {skill} (required)"));
    }
    for skill in &skills.preferred.matched {
        lines.push(format!("✅ {skill} (preferred)"));
    }
    for skill in &skills.required.missing {
        lines.push(format!("❌ Missing required: {skill}"));
    }
    for skill in &skills.preferred.missing {
        lines.push(format!("⚠️ Missing preferred: {skill}"));
    }
    lines.join("\n")
}
