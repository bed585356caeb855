//! Property tests: book invariants under arbitrary order flow.

use matchbook_matchcore::{Disposition, OrderBook};
use matchbook_types::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
struct Flow {
    bid: bool,
    market: bool,
    tick: i64,
    volume: u64,
}

impl Flow {
    fn to_order(&self) -> Order {
        let side = if self.bid { OrderSide::Bid } else { OrderSide::Ask };
        if self.market {
            Order::market(side, self.volume)
        } else {
            Order::limit(side, Decimal::new(self.tick, 0), self.volume)
        }
    }
}

fn flow() -> impl Strategy<Value = Flow> {
    (any::<bool>(), prop::bool::weighted(0.2), 95i64..=105, 1u64..=20).prop_map(
        |(bid, market, tick, volume)| Flow {
            bid,
            market,
            tick,
            volume,
        },
    )
}

fn resting_volume(book: &OrderBook) -> u64 {
    book.bids().total_volume() + book.asks().total_volume()
}

fn run(flows: &[Flow], policy: FillPolicy) -> std::result::Result<(), TestCaseError> {
    let mut book = OrderBook::with_policy(MarketPair::new("BTC", "USDT"), policy);

    for flow in flows {
        let order = flow.to_order();
        let (original, side, kind, limit) =
            (order.volume, order.side, order.kind, order.limit_price());
        let before = resting_volume(&book);

        let out = book.match_order(order);
        let traded = out.traded_volume();
        let leftover = original - traded;
        let after = resting_volume(&book);

        prop_assert!(out.trades.iter().all(|t| t.volume > 0));
        prop_assert!(out.trades.iter().all(|t| t.aggressor == side));

        // Prices never worsen for the aggressor, and a limit is never breached.
        for pair in out.trades.windows(2) {
            match side {
                OrderSide::Bid => prop_assert!(pair[0].price <= pair[1].price),
                _ => prop_assert!(pair[0].price >= pair[1].price),
            }
        }
        if kind == OrderKind::Limit {
            for trade in &out.trades {
                match side {
                    OrderSide::Bid => prop_assert!(trade.price <= limit),
                    _ => prop_assert!(trade.price >= limit),
                }
            }
        }

        match out.disposition {
            Disposition::Filled => {
                prop_assert_eq!(leftover, 0);
                prop_assert_eq!(after, before - traded);
            }
            Disposition::Rested => {
                prop_assert_eq!(kind, OrderKind::Limit);
                prop_assert!(leftover > policy.unfilled_threshold);
                prop_assert_eq!(after, before - traded + leftover);
            }
            Disposition::Returned => {
                prop_assert_eq!(kind, OrderKind::Market);
                let remainder = out.remainder.as_ref().map_or(0, |o| o.volume);
                prop_assert_eq!(remainder, leftover);
                prop_assert_eq!(after, before - traded);
            }
            Disposition::Discarded => {
                prop_assert!(leftover > 0 && leftover <= policy.unfilled_threshold);
                prop_assert_eq!(after, before - traded);
            }
            Disposition::Ignored => prop_assert!(false, "recognized side was ignored"),
        }
        if out.disposition != Disposition::Returned {
            prop_assert!(out.remainder.is_none());
        }

        prop_assert!(!book.is_crossed());
        prop_assert!(book.verify_invariants().is_ok());
    }
    Ok(())
}

proptest! {
    #[test]
    fn strict_policy_preserves_invariants(flows in prop::collection::vec(flow(), 1..120)) {
        run(&flows, FillPolicy::STRICT)?;
    }

    #[test]
    fn legacy_policy_preserves_invariants(flows in prop::collection::vec(flow(), 1..120)) {
        run(&flows, FillPolicy::LEGACY)?;
    }

    #[test]
    fn resting_queues_stay_sorted(flows in prop::collection::vec(flow(), 1..80)) {
        let mut book = OrderBook::new(MarketPair::new("BTC", "USDT"));
        for flow in &flows {
            book.match_order(flow.to_order());
        }
        let bids: Vec<Decimal> = book.bids().orders().map(Order::limit_price).collect();
        let asks: Vec<Decimal> = book.asks().orders().map(Order::limit_price).collect();
        prop_assert!(bids.windows(2).all(|w| w[0] >= w[1]));
        prop_assert!(asks.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(book.bids().orders().all(|o| o.side == OrderSide::Bid));
        prop_assert!(book.asks().orders().all(|o| o.side == OrderSide::Ask));
    }
}
