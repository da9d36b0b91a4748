// JSON summary of an election.

use serde_json::{json, Map};

use preference_voting::methods::{Evidence, ResolverResult};

use crate::election::*;

fn names(candidates: &[String], indexes: &[usize]) -> Vec<String> {
    indexes.iter().map(|i| candidates[*i].clone()).collect()
}

fn decision_js(candidates: &[String], decision: &RoundDecision) -> JSValue {
    match decision {
        RoundDecision::Elected(c) => json!({ "elected": candidates[*c] }),
        RoundDecision::Eliminated { candidate, reason } => json!({
            "eliminated": candidates[*candidate],
            "reason": reason.to_string(),
        }),
        RoundDecision::TieUnresolved(tied) => json!({ "tie": names(candidates, tied) }),
    }
}

fn round_js(candidates: &[String], round: &RoundSnapshot) -> JSValue {
    let mut tally: Map<String, JSValue> = Map::new();
    // Candidates eliminated in an earlier round are left out.
    for (idx, state) in round.states.iter().enumerate() {
        let out_this_round = matches!(
            round.decision,
            RoundDecision::Eliminated { candidate, .. } if candidate == idx
        );
        if state.eliminated.is_none() || out_this_round {
            tally.insert(candidates[idx].clone(), json!(state.votes));
        }
    }
    json!({
        "round": round.round,
        "tally": tally,
        "continuing": round.continuing_ballots,
        "exhausted": round.exhausted_ballots,
        "decision": decision_js(candidates, &round.decision),
    })
}

fn instant_runoff_js(candidates: &[String], outcome: &RcvOutcome) -> JSValue {
    let summary: Vec<JSValue> = outcome
        .summary
        .iter()
        .map(|row| {
            json!({
                "candidate": row.candidate,
                "status": row.status.to_string(),
                "votes": row.votes,
                "eliminationRound": row.elimination_round,
                "eliminationReason": row.elimination_reason.map(|r| r.to_string()),
            })
        })
        .collect();
    let rounds: Vec<JSValue> = outcome
        .rounds
        .iter()
        .map(|r| round_js(candidates, r))
        .collect();
    json!({
        "winner": outcome.winner,
        "tie": outcome.tie,
        "summary": summary,
        "rounds": rounds,
    })
}

fn evidence_js(candidates: &[String], evidence: &Evidence) -> JSValue {
    match evidence {
        Evidence::Matrix(m) => json!({ "matrix": m.rows() }),
        Evidence::StrongestPaths(p) => json!({ "strongestPaths": p }),
        Evidence::LockedEdges(locked) => {
            let mut pairs: Vec<JSValue> = Vec::new();
            for (w, row) in locked.iter().enumerate() {
                for (l, is_locked) in row.iter().enumerate() {
                    if *is_locked {
                        pairs.push(json!([candidates[w], candidates[l]]));
                    }
                }
            }
            json!({ "lockedPairs": pairs })
        }
        Evidence::DefeatScores(scores) => {
            let worst: Map<String, JSValue> = candidates
                .iter()
                .zip(scores.iter())
                .map(|(c, s)| (c.clone(), json!(s)))
                .collect();
            json!({ "worstDefeats": worst })
        }
    }
}

fn pairwise_js(candidates: &[String], res: &ResolverResult) -> JSValue {
    json!({
        "method": res.method.name(),
        "winner": res.winner,
        "ranking": ranking_js(&res.ranked_candidates),
        "evidence": evidence_js(candidates, &res.evidence),
    })
}

fn ranking_js(ranking: &[ScoredCandidate]) -> Vec<JSValue> {
    ranking
        .iter()
        .map(|s| json!({"candidate": s.candidate, "score": s.score}))
        .collect()
}

/// Assembles the summary written by the command line.
pub fn build_summary_js(
    config: &ElectionConfig,
    report: &ElectionReport,
    trace: Option<&[TraceRecord]>,
) -> JSValue {
    let candidates = &report.candidates;
    let methods: Vec<JSValue> = report
        .method_summary()
        .iter()
        .map(|m| {
            json!({
                "method": m.method.name(),
                "winner": m.winner,
                "tie": m.tie,
                "ranking": ranking_js(&m.ranking),
            })
        })
        .collect();

    let mut js = json!({
        "config": {
            "contest": config.output_settings.contest_name,
            "date": config.output_settings.contest_date,
            "source": io_common::simplify_file_name(&config.response_source.file_path),
            "provider": config.response_source.provider().ok(),
        },
        "candidates": candidates,
        "ballots": report.ballot_count,
        "digest": report.digest,
        "consensusWinner": report.consensus_winner(),
        "methods": methods,
        "instantRunoff": report.instant_runoff.as_ref().map(|o| instant_runoff_js(candidates, o)),
        "pairwise": report.pairwise.iter().map(|r| pairwise_js(candidates, r)).collect::<Vec<JSValue>>(),
    });
    if let Some(records) = trace {
        let lines: Vec<JSValue> = records
            .iter()
            .map(|r| json!({"round": r.round(), "message": r.to_string()}))
            .collect();
        js["trace"] = json!(lines);
    }
    js
}
