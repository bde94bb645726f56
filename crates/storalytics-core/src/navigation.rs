//! Drill-down navigation state.
//!
//! # Design
//! - [`NavState`] is an immutable value; transitions return a new state.
//! - The level is taken from the last successful response, not from intent.
//! - The filter is the only input to a fetch.

use serde::{Deserialize, Serialize};
use storalytics_api_models::Level;

use crate::levels::{DrillKind, DrillTarget};

/// Accumulated drill-down selection sent as `/dashboard/` query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    /// Selected pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    /// Selected child pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_pool: Option<String>,
    /// Selected tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl Filter {
    /// Filter with only a pool selected.
    #[must_use]
    pub fn pool(pool: impl Into<String>) -> Self {
        Self {
            pool: Some(pool.into()),
            ..Self::default()
        }
    }

    /// Present keys in `pool`, `child_pool`, `tenant` order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("pool", self.pool.as_deref()),
            ("child_pool", self.child_pool.as_deref()),
            ("tenant", self.tenant.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }

    /// Number of leading keys that are set.
    #[must_use]
    pub fn depth(&self) -> usize {
        [&self.pool, &self.child_pool, &self.tenant]
            .into_iter()
            .take_while(|value| value.is_some())
            .count()
    }

    /// Level the backend should answer with for this filter.
    #[must_use]
    pub fn implied_level(&self) -> Level {
        match self.depth() {
            0 => Level::Pools,
            1 => Level::ChildPools,
            2 => Level::Tenants,
            _ => Level::Volumes,
        }
    }

    /// Whether no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_none() && self.child_pool.is_none() && self.tenant.is_none()
    }

    /// Apply a drill-down selection.
    #[must_use]
    pub fn drill(&self, target: &DrillTarget) -> Self {
        match target.kind {
            DrillKind::Pool => Self::pool(target.value.clone()),
            DrillKind::ChildPool => Self {
                child_pool: Some(target.value.clone()),
                ..self.clone()
            },
            DrillKind::Tenant => Self {
                tenant: Some(target.value.clone()),
                ..self.clone()
            },
        }
    }
}

/// Navigation position: level of the data on screen plus the active filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    /// Level of the last successfully fetched payload.
    pub level: Level,
    /// Filter for the next (or current) fetch.
    pub filter: Filter,
}

impl NavState {
    /// Initial state: pools level, empty filter.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    /// Drill into a row. Level is left for the response to set.
    #[must_use]
    pub fn drill_down(&self, target: &DrillTarget) -> Self {
        Self {
            level: self.level,
            filter: self.filter.drill(target),
        }
    }

    /// Step back one level; `None` at the top level.
    #[must_use]
    pub fn back(&self) -> Option<Self> {
        let filter = match self.level {
            Level::Pools => return None,
            Level::ChildPools => Filter::default(),
            Level::Tenants => Filter {
                pool: self.filter.pool.clone(),
                ..Filter::default()
            },
            Level::Volumes => Filter {
                pool: self.filter.pool.clone(),
                child_pool: self.filter.child_pool.clone(),
                tenant: None,
            },
        };
        Some(Self {
            level: self.level,
            filter,
        })
    }

    /// Refetch with the unchanged filter.
    #[must_use]
    pub fn refresh(&self) -> Self {
        self.clone()
    }

    /// Record the level echoed by a successful response.
    #[must_use]
    pub fn with_level(&self, level: Level) -> Self {
        Self {
            level,
            filter: self.filter.clone(),
        }
    }

    /// Whether a back transition exists.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.level != Level::Pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_filter() -> Filter {
        Filter {
            pool: Some("P1".into()),
            child_pool: Some("C1".into()),
            tenant: Some("T1".into()),
        }
    }

    #[test]
    fn pool_drill_resets_deeper_keys() {
        let nav = NavState {
            level: Level::Volumes,
            filter: full_filter(),
        };
        let next = nav.drill_down(&DrillTarget::new(DrillKind::Pool, "P2"));
        assert_eq!(next.filter, Filter::pool("P2"));
    }

    #[test]
    fn child_and_tenant_drills_merge() {
        let nav = NavState {
            level: Level::ChildPools,
            filter: Filter::pool("P1"),
        };
        let child = nav.drill_down(&DrillTarget::new(DrillKind::ChildPool, "C1"));
        let tenant = child
            .with_level(Level::Tenants)
            .drill_down(&DrillTarget::new(DrillKind::Tenant, "T1"));
        assert_eq!(tenant.filter, full_filter());
        assert_eq!(tenant.level, Level::Tenants);
    }

    #[test]
    fn back_walks_up_one_level_at_a_time() {
        let volumes = NavState {
            level: Level::Volumes,
            filter: full_filter(),
        };
        let tenants = volumes.back().map(|nav| nav.with_level(Level::Tenants));
        let Some(tenants) = tenants else {
            panic!("back from volumes must exist");
        };
        assert_eq!(
            tenants.filter,
            Filter {
                pool: Some("P1".into()),
                child_pool: Some("C1".into()),
                tenant: None,
            }
        );

        let child_pools = tenants.back().map(|nav| nav.with_level(Level::ChildPools));
        let Some(child_pools) = child_pools else {
            panic!("back from tenants must exist");
        };
        assert_eq!(child_pools.filter, Filter::pool("P1"));

        let pools = child_pools.back().map(|nav| nav.with_level(Level::Pools));
        let Some(pools) = pools else {
            panic!("back from child pools must exist");
        };
        assert!(pools.filter.is_empty());
        assert!(pools.back().is_none());
        assert!(!pools.can_go_back());
    }

    #[test]
    fn query_pairs_follow_key_order_and_skip_missing() {
        let filter = Filter {
            pool: Some("A B".into()),
            child_pool: None,
            tenant: Some("t".into()),
        };
        assert_eq!(filter.query_pairs(), vec![("pool", "A B"), ("tenant", "t")]);
        assert_eq!(filter.depth(), 1);
        assert_eq!(full_filter().implied_level(), Level::Volumes);
        assert_eq!(Filter::default().implied_level(), Level::Pools);
    }

    #[test]
    fn refresh_keeps_state() {
        let nav = NavState {
            level: Level::Tenants,
            filter: full_filter(),
        };
        assert_eq!(nav.refresh(), nav);
        assert_eq!(NavState::initial().level, Level::Pools);
    }
}
