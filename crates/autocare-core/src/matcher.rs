//! Reconciliation of registered service centers with place-search candidates.
//!
//! A candidate and a registered center are treated as the same physical
//! place when the external place id matches exactly, or (in
//! [`MatchMode::Fuzzy`]) when names are similar, addresses are similar, or
//! the two points are within [`PROXIMITY_THRESHOLD_KM`] of each other.
//!
//! Candidates are matched independently, so one center may back several
//! candidates. A center that no candidate matched is emitted standalone with
//! `source = internal`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::centers::{
    coordinates_maps_url, place_maps_url, LocationRecord, ReconciledResult, RegisteredCenter,
    ResultSource,
};
use crate::geo::Coordinates;
use crate::similarity::{DiceCoefficient, Similarity};

/// Name similarity must exceed this for a fuzzy match.
pub const NAME_SIMILARITY_THRESHOLD: f64 = 0.8;
/// Address similarity must exceed this for a fuzzy match.
pub const ADDRESS_SIMILARITY_THRESHOLD: f64 = 0.7;
/// Points closer than this (km) are the same place.
pub const PROXIMITY_THRESHOLD_KM: f64 = 0.1;

/// Which signals may merge a candidate into a registered center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Only exact external-id equality merges. Unmatched centers are emitted
    /// standalone even if a look-alike candidate exists.
    Strict,
    /// Exact id, name, address, or proximity may merge.
    #[default]
    Fuzzy,
}

impl MatchMode {
    /// Parses `"strict"` or `"fuzzy"` (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "fuzzy" => Some(Self::Fuzzy),
            _ => None,
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Strict => write!(f, "strict"),
            MatchMode::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// Merges and ranks registered centers and place-search candidates.
#[derive(Clone)]
pub struct Matcher {
    similarity: Arc<dyn Similarity>,
    mode: MatchMode,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher").field("mode", &self.mode).finish()
    }
}

impl Matcher {
    /// Matcher using [`DiceCoefficient`] similarity.
    #[must_use]
    pub fn new(mode: MatchMode) -> Self {
        Self::with_similarity(mode, Arc::new(DiceCoefficient))
    }

    #[must_use]
    pub fn with_similarity(mode: MatchMode, similarity: Arc<dyn Similarity>) -> Self {
        Self { similarity, mode }
    }

    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Reconciles `registered` with `candidates` around `origin`.
    ///
    /// When `filter_registered` is set, unregistered candidates are dropped.
    /// Output is ordered registered-first, then by ascending distance with
    /// unknown distances last within each group.
    #[must_use]
    pub fn reconcile(
        &self,
        registered: &[RegisteredCenter],
        candidates: &[LocationRecord],
        origin: Coordinates,
        filter_registered: bool,
    ) -> Vec<ReconciledResult> {
        let assigned = self.assign(registered, candidates);

        let mut claimed = vec![false; registered.len()];
        for link in assigned.iter().flatten() {
            claimed[link.index()] = true;
        }

        let mut results: Vec<ReconciledResult> = candidates
            .iter()
            .zip(&assigned)
            .map(|(candidate, link)| merge_candidate(candidate, *link, registered, origin))
            .collect();

        results.extend(
            registered
                .iter()
                .zip(&claimed)
                .filter(|(_, taken)| !**taken)
                .map(|(center, _)| standalone_center(center, origin)),
        );

        if filter_registered {
            results.retain(|r| r.is_registered);
        }

        results.sort_by(|a, b| {
            b.is_registered
                .cmp(&a.is_registered)
                .then_with(|| cmp_distance(a.distance, b.distance))
        });

        results
    }

    /// For each candidate, the registered center it merges into, if any.
    ///
    /// Every candidate is compared against every center independently, so
    /// several candidates may link to the same center. Within one candidate
    /// an exact id match wins over any fuzzy look-alike.
    fn assign(
        &self,
        registered: &[RegisteredCenter],
        candidates: &[LocationRecord],
    ) -> Vec<Option<Link>> {
        candidates
            .iter()
            .map(|candidate| {
                if let Some(ri) = registered
                    .iter()
                    .position(|center| is_exact_match(center, candidate))
                {
                    return Some(Link::Exact(ri));
                }
                if self.mode == MatchMode::Strict {
                    return None;
                }
                let ri = registered
                    .iter()
                    .position(|center| self.is_fuzzy_match(center, candidate))?;
                tracing::debug!(
                    place_id = %candidate.place_id,
                    center_id = %registered[ri].id,
                    "matcher: fuzzy match"
                );
                Some(Link::Fuzzy(ri))
            })
            .collect()
    }

    fn is_fuzzy_match(&self, center: &RegisteredCenter, candidate: &LocationRecord) -> bool {
        let name_score = self.similarity.similarity(
            &center.name.to_lowercase(),
            &candidate.name.to_lowercase(),
        );
        if name_score > NAME_SIMILARITY_THRESHOLD {
            return true;
        }

        let address_score = self.similarity.similarity(
            &center.address.to_lowercase(),
            &candidate.address.to_lowercase(),
        );
        if address_score > ADDRESS_SIMILARITY_THRESHOLD {
            return true;
        }

        center
            .location
            .is_some_and(|loc| loc.distance_km(&candidate.location) < PROXIMITY_THRESHOLD_KM)
    }
}

/// How a candidate was linked to a registered center.
#[derive(Debug, Clone, Copy)]
enum Link {
    Exact(usize),
    Fuzzy(usize),
}

impl Link {
    fn index(self) -> usize {
        match self {
            Self::Exact(i) | Self::Fuzzy(i) => i,
        }
    }
}

fn is_exact_match(center: &RegisteredCenter, candidate: &LocationRecord) -> bool {
    !candidate.place_id.is_empty()
        && center.google_place_id.as_deref() == Some(candidate.place_id.as_str())
}

/// Fuzzy links mark the candidate registered but only an exact id match
/// attaches the center's record.
fn merge_candidate(
    candidate: &LocationRecord,
    link: Option<Link>,
    registered: &[RegisteredCenter],
    origin: Coordinates,
) -> ReconciledResult {
    let registered_data = match link {
        Some(Link::Exact(i)) => Some(registered[i].clone()),
        Some(Link::Fuzzy(_)) | None => None,
    };
    ReconciledResult {
        id: candidate.place_id.clone(),
        name: candidate.name.clone(),
        address: candidate.address.clone(),
        location: Some(candidate.location),
        distance: Some(origin.distance_km(&candidate.location)),
        is_registered: link.is_some(),
        registered_data,
        rating: candidate.rating,
        user_ratings_total: candidate.user_ratings_total,
        maps_url: Some(place_maps_url(&candidate.place_id)),
        source: ResultSource::Google,
    }
}

fn standalone_center(center: &RegisteredCenter, origin: Coordinates) -> ReconciledResult {
    let maps_url = match (&center.google_place_id, &center.location) {
        (Some(place_id), _) if !place_id.is_empty() => Some(place_maps_url(place_id)),
        (_, Some(loc)) => Some(coordinates_maps_url(loc)),
        _ => None,
    };

    ReconciledResult {
        id: center.id.to_string(),
        name: center.name.clone(),
        address: center.address.clone(),
        location: center.location,
        distance: center.location.map(|loc| origin.distance_km(&loc)),
        is_registered: true,
        registered_data: Some(center.clone()),
        rating: center.average_rating,
        user_ratings_total: None,
        maps_url,
        source: ResultSource::Internal,
    }
}

/// Ascending by distance; `None` sorts after every known distance.
fn cmp_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
