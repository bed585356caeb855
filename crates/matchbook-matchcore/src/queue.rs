//! One side of the book: resting orders in price-time priority.
//!
//! Levels live in a `BTreeMap` keyed by [`SidePriority::Key`], so the first
//! entry is always the best price. Inside a level, orders keep arrival
//! order. Walking levels in key order and each level front to back gives
//! the exact queue order:
//!
//! - a new order at an existing price goes behind every order already there
//! - a new order at a better price goes ahead of every worse-priced order
//! - a new best price becomes the head

use std::collections::BTreeMap;
use std::marker::PhantomData;

use matchbook_types::{MatchbookError, Order, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::price_level::PriceLevel;
use crate::priority::SidePriority;

/// Aggregated view of one price level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub price: Decimal,
    pub volume: u64,
    pub order_count: usize,
}

/// Resting orders of one side, best price first, FIFO within a price.
#[derive(Debug)]
pub struct PriceLevelQueue<P: SidePriority> {
    levels: BTreeMap<P::Key, PriceLevel>,
    /// Number of resting orders across all levels.
    len: usize,
    _priority: PhantomData<P>,
}

impl<P: SidePriority> Default for PriceLevelQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SidePriority> PriceLevelQueue<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            len: 0,
            _priority: PhantomData,
        }
    }

    // =================================================================
    // Mutation
    // =================================================================

    /// Insert a resting order behind all orders at its price and ahead of
    /// all worse prices.
    pub fn insert(&mut self, order: Order) {
        let price = order.limit_price();
        self.levels
            .entry(P::key(price))
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(order);
        self.len += 1;
    }

    /// The head of the queue: oldest order at the best price.
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.levels.values_mut().next().and_then(PriceLevel::front_mut)
    }

    /// Remove the head. Drops its level once the level is empty.
    pub fn pop_front(&mut self) -> Option<Order> {
        let mut best = self.levels.first_entry()?;
        let order = best.get_mut().pop_front();
        if best.get().is_empty() {
            best.remove();
        }
        if order.is_some() {
            self.len -= 1;
        }
        order
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn best_price(&self) -> Option<Decimal> {
        self.levels.values().next().map(|level| level.price)
    }

    /// Number of resting orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct price levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn total_volume(&self) -> u64 {
        self.levels.values().map(PriceLevel::total_volume).sum()
    }

    #[must_use]
    pub fn volume_at(&self, price: Decimal) -> u64 {
        self.levels
            .get(&P::key(price))
            .map_or(0, PriceLevel::total_volume)
    }

    /// Levels from best to worst.
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values()
    }

    /// Every resting order in matching priority.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().flat_map(PriceLevel::iter)
    }

    /// Up to `depth` best levels, aggregated.
    #[must_use]
    pub fn snapshot(&self, depth: usize) -> Vec<LevelSummary> {
        self.levels
            .values()
            .take(depth)
            .map(|level| LevelSummary {
                price: level.price,
                volume: level.total_volume(),
                order_count: level.len(),
            })
            .collect()
    }

    /// Check the structural invariants of this side: side tags, positive
    /// volumes, price order across levels, arrival order within a level,
    /// and the order count.
    pub fn verify(&self) -> Result<()> {
        let mut counted = 0usize;
        let mut previous: Option<Decimal> = None;
        for level in self.levels.values() {
            if let Some(prev) = previous {
                if !P::better_or_equal(prev, level.price) {
                    return Err(violation(format!(
                        "{} queue out of order: {prev} before {}",
                        P::SIDE,
                        level.price
                    )));
                }
            }
            previous = Some(level.price);

            // Unstamped orders (sequence 0) carry no arrival information.
            let mut last_sequence = 0u64;
            for order in level.iter() {
                counted += 1;
                if order.side != P::SIDE {
                    return Err(violation(format!(
                        "order {} on the {} queue has side {}",
                        order.id,
                        P::SIDE,
                        order.side
                    )));
                }
                if order.volume == 0 {
                    return Err(violation(format!("order {} rests with zero volume", order.id)));
                }
                if order.sequence != 0 {
                    if order.sequence <= last_sequence {
                        return Err(violation(format!(
                            "order {} (sequence {}) rests behind sequence {last_sequence} at {}",
                            order.id, order.sequence, level.price
                        )));
                    }
                    last_sequence = order.sequence;
                }
            }
        }
        if counted != self.len {
            return Err(violation(format!(
                "{} queue counts {} orders but holds {counted}",
                P::SIDE,
                self.len
            )));
        }
        Ok(())
    }
}

fn violation(reason: String) -> MatchbookError {
    MatchbookError::InvariantViolation { reason }
}
