//! Order entry: the gate between clients and the book.
//!
//! Every order reaching `OrderBook::match_order` passes through here. The
//! book assumes its input is well formed, so this is where malformed
//! requests stop:
//!
//! - side must be recognized
//! - volume must be positive and within the market's bounds
//! - limit orders need a positive price on the tick grid
//! - market orders must not carry a price
//!
//! Accepted orders get a fresh [`OrderId`] and the next arrival sequence.

use matchbook_matchcore::OrderBook;
use matchbook_types::constants::PRICE_PRECISION;
use matchbook_types::{
    MarketConfig, MatchbookError, Order, OrderKind, OrderRequest, OrderSide, Result,
};
use rust_decimal::Decimal;

/// Validates requests for one market and stamps identities on them.
#[derive(Debug, Clone)]
pub struct OrderEntry {
    market: MarketConfig,
    /// Sequence the next accepted order receives.
    next_sequence: u64,
}

impl OrderEntry {
    #[must_use]
    pub fn new(market: MarketConfig) -> Self {
        Self {
            market,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub fn market(&self) -> &MarketConfig {
        &self.market
    }

    /// Number of orders accepted so far.
    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.next_sequence - 1
    }

    /// Validate a client request and turn it into an order.
    ///
    /// # Errors
    /// [`MatchbookError::InvalidOrder`] naming the first failed check.
    pub fn accept(&mut self, request: OrderRequest) -> Result<Order> {
        self.check(request.side, request.kind, request.price, request.volume)?;

        let mut order = match request.kind {
            OrderKind::Limit => {
                let price = request.price.ok_or_else(|| {
                    MatchbookError::invalid_order("limit order requires a price")
                })?;
                Order::limit(request.side, price, request.volume)
            }
            OrderKind::Market => Order::market(request.side, request.volume),
        };
        order.sequence = self.stamp();
        Ok(order)
    }

    /// Admit an order that already carries an identity, e.g. one being
    /// replayed from a journal.
    ///
    /// # Errors
    /// [`MatchbookError::InvalidOrder`] on a shape failure, or
    /// [`MatchbookError::DuplicateOrder`] if its id is resting in `book`.
    pub fn admit(&mut self, mut order: Order, book: &OrderBook) -> Result<Order> {
        self.check(order.side, order.kind, order.price, order.volume)?;
        if book.contains_order(&order.id) {
            return Err(MatchbookError::DuplicateOrder(order.id));
        }
        order.original_volume = order.volume;
        order.sequence = self.stamp();
        Ok(order)
    }

    fn stamp(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn check(
        &self,
        side: OrderSide,
        kind: OrderKind,
        price: Option<Decimal>,
        volume: u64,
    ) -> Result<()> {
        // 1. Side
        if side == OrderSide::Unrecognized {
            return Err(MatchbookError::invalid_order("side must be bid or ask"));
        }

        // 2. Volume
        if volume == 0 {
            return Err(MatchbookError::invalid_order("volume must be positive"));
        }
        if volume < self.market.min_volume {
            return Err(MatchbookError::invalid_order(format!(
                "volume {volume} below minimum {}",
                self.market.min_volume
            )));
        }
        if volume > self.market.max_volume {
            return Err(MatchbookError::invalid_order(format!(
                "volume {volume} exceeds maximum {}",
                self.market.max_volume
            )));
        }

        // 3. Price
        match (kind, price) {
            (OrderKind::Limit, None) => {
                Err(MatchbookError::invalid_order("limit order requires a price"))
            }
            (OrderKind::Limit, Some(price)) => self.check_price(price),
            (OrderKind::Market, Some(_)) => Err(MatchbookError::invalid_order(
                "market order must not carry a price",
            )),
            (OrderKind::Market, None) => Ok(()),
        }
    }

    fn check_price(&self, price: Decimal) -> Result<()> {
        if price <= Decimal::ZERO {
            return Err(MatchbookError::invalid_order("price must be positive"));
        }
        if price.normalize().scale() > PRICE_PRECISION {
            return Err(MatchbookError::invalid_order(format!(
                "price {price} has more than {PRICE_PRECISION} decimal places"
            )));
        }
        if !(price % self.market.tick_size).is_zero() {
            return Err(MatchbookError::invalid_order(format!(
                "price {price} is not a multiple of tick size {}",
                self.market.tick_size
            )));
        }
        Ok(())
    }
}
