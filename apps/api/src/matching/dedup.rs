//! Duplicate detector: clusters one pool's candidate records into identity
//! groups and picks a canonical member per group.
//!
//! Pairwise policy (OR of strong signals, corroborated weak signals):
//! - strong: same normalized name AND same location; same content
//!   fingerprint; same e-mail address
//! - weak: Jaro-Winkler name similarity, Jaccard skill overlap, same phone
//!
//! Links are merged with union-find so the result does not depend on input
//! order, and every non-canonical member points straight at its cluster's
//! canonical root (no chains, no cycles). Clusters are rebuilt from scratch
//! on every call.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::errors::AppError;
use crate::matching::settings::DuplicateThresholds;
use crate::matching::taxonomy::normalize_skill_set;
use crate::models::candidate::CandidateRecord;
use crate::models::match_result::{
    DuplicateCluster, DuplicateLink, DuplicateSignal, DuplicateStatus,
};

/// Phone numbers with fewer digits can't identify anyone.
const MIN_PHONE_DIGITS: usize = 7;
/// Trailing digits compared, so "+1 (555) 123-4567" equals "555-123-4567".
const PHONE_SUFFIX_DIGITS: usize = 10;

/// Lower-cased text with punctuation turned into spaces and runs of
/// whitespace collapsed: `"  Sarah  CHEN "` → `"sarah chen"`.
pub fn normalize_text(input: &str) -> String {
    input
        .nfkc()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_phone(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return String::new();
    }
    let skip = digits.len().saturating_sub(PHONE_SUFFIX_DIGITS);
    digits[skip..].to_string()
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    inter as f64 / union as f64
}

/// Pre-normalized comparison fields for one record.
struct Profile<'a> {
    id: &'a str,
    applied_at: Option<DateTime<Utc>>,
    name: String,
    location: String,
    email: String,
    phone: String,
    fingerprint: Option<String>,
    skills: BTreeSet<String>,
}

impl<'a> Profile<'a> {
    fn from_record(record: &'a CandidateRecord) -> Self {
        Self {
            id: &record.id,
            applied_at: record.applied_at,
            name: normalize_text(&record.name),
            location: normalize_text(&record.location),
            email: record.email.trim().to_lowercase(),
            phone: normalize_phone(&record.phone),
            fingerprint: record.effective_fingerprint(),
            skills: normalize_skill_set(record.skills.iter().map(|s| s.name.as_str())),
        }
    }

    /// Earliest application first, undated last, then smallest id.
    fn canonical_key(&self) -> (bool, Option<DateTime<Utc>>, &str) {
        (self.applied_at.is_none(), self.applied_at, self.id)
    }
}

fn pair_signals(a: &Profile, b: &Profile, t: &DuplicateThresholds) -> Vec<DuplicateSignal> {
    let mut signals = Vec::new();

    let names_present = !a.name.is_empty() && !b.name.is_empty();
    if names_present && a.name == b.name && !a.location.is_empty() && a.location == b.location {
        signals.push(DuplicateSignal::NameAndLocation);
    }
    if let (Some(fa), Some(fb)) = (&a.fingerprint, &b.fingerprint) {
        if fa == fb {
            signals.push(DuplicateSignal::Fingerprint);
        }
    }
    if !a.email.is_empty() && a.email == b.email {
        signals.push(DuplicateSignal::Email);
    }

    if names_present && strsim::jaro_winkler(&a.name, &b.name) >= t.name_similarity {
        signals.push(DuplicateSignal::FuzzyName);
    }
    if jaccard(&a.skills, &b.skills) >= t.skill_overlap && !a.skills.is_empty() {
        signals.push(DuplicateSignal::SkillOverlap);
    }
    if !a.phone.is_empty() && a.phone == b.phone {
        signals.push(DuplicateSignal::Phone);
    }

    signals
}

fn is_linked(signals: &[DuplicateSignal], t: &DuplicateThresholds) -> bool {
    let weak = signals.iter().filter(|s| !s.is_strong()).count();
    signals.iter().any(|s| s.is_strong()) || weak >= t.min_weak_signals
}

/// Union-find over record indices, path halving + union by rank.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

pub fn check_ids(candidates: &[CandidateRecord]) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for c in candidates {
        if c.id.trim().is_empty() {
            return Err(AppError::invalid("candidate id cannot be empty"));
        }
        if !seen.insert(c.id.as_str()) {
            return Err(AppError::invalid(format!(
                "candidate id '{}' appears more than once in the pool",
                c.id
            )));
        }
    }
    Ok(())
}

/// Clusters of two or more records, ordered by canonical id.
/// Zero or one candidate yields no clusters.
pub fn find_duplicates(
    candidates: &[CandidateRecord],
    thresholds: &DuplicateThresholds,
) -> Result<Vec<DuplicateCluster>, AppError> {
    check_ids(candidates)?;
    if candidates.len() < 2 {
        return Ok(Vec::new());
    }

    let profiles: Vec<Profile> = candidates.iter().map(Profile::from_record).collect();
    let n = profiles.len();

    let mut links: Vec<(usize, usize, Vec<DuplicateSignal>)> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let profiles = &profiles;
            (i + 1..n).filter_map(move |j| {
                let signals = pair_signals(&profiles[i], &profiles[j], thresholds);
                is_linked(&signals, thresholds).then_some((i, j, signals))
            })
        })
        .collect();
    links.sort_by_key(|(i, j, _)| (*i, *j));
    debug!(pool = n, links = links.len(), "duplicate links computed");

    let mut sets = DisjointSet::new(n);
    for (i, j, _) in &links {
        sets.union(*i, *j);
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for index in 0..n {
        let root = sets.find(index);
        groups.entry(root).or_default().push(index);
    }

    let mut clusters: Vec<DuplicateCluster> = groups
        .into_values()
        .filter(|members| members.len() > 1)
        .map(|mut members| {
            members.sort_by(|a, b| profiles[*a].canonical_key().cmp(&profiles[*b].canonical_key()));
            let position: HashMap<usize, usize> =
                members.iter().enumerate().map(|(pos, m)| (*m, pos)).collect();
            let mut ordered: Vec<(usize, usize, &Vec<DuplicateSignal>)> = links
                .iter()
                .filter_map(|(i, j, signals)| {
                    let (pi, pj) = (*position.get(i)?, *position.get(j)?);
                    Some((pi.min(pj), pi.max(pj), signals))
                })
                .collect();
            ordered.sort_by_key(|(a, b, _)| (*a, *b));
            let cluster_links = ordered
                .into_iter()
                .map(|(a, b, signals)| DuplicateLink {
                    left: profiles[members[a]].id.to_string(),
                    right: profiles[members[b]].id.to_string(),
                    signals: signals.clone(),
                })
                .collect();
            DuplicateCluster {
                canonical_id: profiles[members[0]].id.to_string(),
                member_ids: members.iter().map(|m| profiles[*m].id.to_string()).collect(),
                links: cluster_links,
            }
        })
        .collect();
    clusters.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));

    info!(
        pool = n,
        clusters = clusters.len(),
        "duplicate detection finished"
    );
    Ok(clusters)
}

/// Per-candidate duplicate flags derived from a set of clusters. Every
/// candidate gets an entry; canonical members are never marked duplicate.
pub fn duplicate_statuses(
    candidates: &[CandidateRecord],
    clusters: &[DuplicateCluster],
) -> BTreeMap<String, DuplicateStatus> {
    let mut statuses: BTreeMap<String, DuplicateStatus> = candidates
        .iter()
        .map(|c| (c.id.clone(), DuplicateStatus::default()))
        .collect();

    for cluster in clusters {
        for member in cluster.member_ids.iter().skip(1) {
            statuses.insert(
                member.clone(),
                DuplicateStatus {
                    is_duplicate: true,
                    duplicate_of: Some(cluster.canonical_id.clone()),
                },
            );
        }
    }
    statuses
}
