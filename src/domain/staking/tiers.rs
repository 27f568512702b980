//! Tier policy: staked amount -> tier -> discount / visibility / exclusive access.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    None,
    Bronze,
    Silver,
    Gold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThreshold {
    pub tier: Tier,
    /// Minimum staked amount in raw token units.
    pub min_staked: u64,
    pub discount_percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub cart_total: f64,
    pub discount_percent: u8,
    pub discount_amount: f64,
    pub final_total: f64,
}

#[derive(Debug, Clone)]
pub struct TierPolicy {
    /// Sorted by `min_staked`, ascending.
    thresholds: Vec<TierThreshold>,
    exclusive_tier: Tier,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::new(
            vec![
                TierThreshold { tier: Tier::Bronze, min_staked: 1_000, discount_percent: 5 },
                TierThreshold { tier: Tier::Silver, min_staked: 10_000, discount_percent: 10 },
                TierThreshold { tier: Tier::Gold, min_staked: 50_000, discount_percent: 15 },
            ],
            Tier::Gold,
        )
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl TierPolicy {
    pub fn new(mut thresholds: Vec<TierThreshold>, exclusive_tier: Tier) -> Self {
        thresholds.sort_by_key(|t| t.min_staked);
        Self {
            thresholds,
            exclusive_tier,
        }
    }

    pub fn tier_for(&self, staked: u64) -> Tier {
        self.thresholds
            .iter()
            .rev()
            .find(|t| staked >= t.min_staked)
            .map(|t| t.tier)
            .unwrap_or(Tier::None)
    }

    pub fn discount_percent(&self, tier: Tier) -> u8 {
        self.thresholds
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.discount_percent)
            .unwrap_or(0)
    }

    pub fn is_visible(&self, tier: Tier) -> bool {
        tier != Tier::None
    }

    pub fn is_exclusive(&self, tier: Tier) -> bool {
        tier != Tier::None && tier >= self.exclusive_tier
    }

    /// `cart_total` must already be validated as finite, non-negative and bounded.
    pub fn discount(&self, tier: Tier, cart_total: f64) -> Discount {
        let discount_percent = self.discount_percent(tier);
        let discount_amount = round_cents(cart_total * f64::from(discount_percent) / 100.0);
        Discount {
            cart_total,
            discount_percent,
            discount_amount,
            final_total: round_cents(cart_total - discount_amount),
        }
    }
}
