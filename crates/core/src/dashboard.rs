//! Dashboard summary figures.
//!
//! Only the funnel count is real. Active campaigns and conversions are
//! placeholders until analytics exist.

use rand::Rng;
use serde::Serialize;

use crate::funnel::Funnel;

const ACTIVE_RATIO: f64 = 0.7;
const MAX_CONVERSIONS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_funnels: usize,
    pub active_campaigns: usize,
    pub total_conversions: u32,
}

impl DashboardStats {
    pub fn compute<R: Rng>(funnel_count: usize, rng: &mut R) -> Self {
        Self {
            total_funnels: funnel_count,
            active_campaigns: (funnel_count as f64 * ACTIVE_RATIO).floor() as usize,
            total_conversions: rng.random_range(0..MAX_CONVERSIONS),
        }
    }
}

/// Up to `limit` funnels, most recently updated first.
pub fn recent(funnels: &[Funnel], limit: usize) -> Vec<Funnel> {
    let mut sorted = funnels.to_vec();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.truncate(limit);
    sorted
}
