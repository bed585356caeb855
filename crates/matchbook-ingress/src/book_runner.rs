//! Book runner: one task per book, many producers.
//!
//! ```text
//! BookHandle ─┐
//! BookHandle ─┼─ mpsc (bounded) ─▶ BookRunner task ─▶ OrderEntry ─▶ OrderBook ─▶ TradeSink
//! BookHandle ─┘                          │
//!                                        └─ oneshot reply per command
//! ```
//!
//! The runner task is the only writer of its `OrderBook`, so commands are
//! applied strictly in channel order. Dropping every handle closes the
//! channel; the task then finishes and hands back the book and the sink.

use matchbook_matchcore::{BookSnapshot, MatchOutcome, OrderBook};
use matchbook_types::{
    EngineConfig, MarketPair, MatchbookError, Order, OrderRequest, Result, TradeId,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::order_entry::OrderEntry;
use crate::trade_sink::TradeSink;

enum Command {
    Submit {
        request: OrderRequest,
        reply: oneshot::Sender<Result<Execution>>,
    },
    Replay {
        order: Order,
        reply: oneshot::Sender<Result<Execution>>,
    },
    Snapshot {
        depth: usize,
        reply: oneshot::Sender<BookSnapshot>,
    },
    Verify {
        reply: oneshot::Sender<Result<()>>,
    },
}

/// A match the book applied, plus the trades its sink failed to record.
///
/// The book is never rolled back, so a sink failure still comes with the
/// full outcome, remainder included.
#[derive(Debug)]
pub struct Execution {
    pub outcome: MatchOutcome,
    pub unrecorded: Vec<(TradeId, MatchbookError)>,
}

impl Execution {
    /// True when every trade reached the sink.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        self.unrecorded.is_empty()
    }
}

/// Cloneable producer side of a running book.
#[derive(Debug, Clone)]
pub struct BookHandle {
    market: MarketPair,
    tx: mpsc::Sender<Command>,
}

impl BookHandle {
    #[must_use]
    pub fn market(&self) -> &MarketPair {
        &self.market
    }

    /// Submit a client request and wait for its execution.
    ///
    /// Sink failures do not fail the call; they are listed in
    /// [`Execution::unrecorded`].
    ///
    /// # Errors
    /// `InvalidOrder` from order entry, or `EngineStopped` if the runner
    /// is gone.
    pub async fn submit(&self, request: OrderRequest) -> Result<Execution> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit { request, reply }).await?;
        rx.await.map_err(|_| MatchbookError::EngineStopped)?
    }

    /// Match an order that already has an identity.
    ///
    /// # Errors
    /// As [`BookHandle::submit`], plus `DuplicateOrder` if the id is
    /// already resting.
    pub async fn replay(&self, order: Order) -> Result<Execution> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Replay { order, reply }).await?;
        rx.await.map_err(|_| MatchbookError::EngineStopped)?
    }

    /// Aggregated depth of the book, up to `depth` levels per side.
    pub async fn snapshot(&self, depth: usize) -> Result<BookSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { depth, reply }).await?;
        rx.await.map_err(|_| MatchbookError::EngineStopped)
    }

    /// Run the book's invariant checks inside the runner.
    pub async fn verify(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Verify { reply }).await?;
        rx.await.map_err(|_| MatchbookError::EngineStopped)?
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| MatchbookError::EngineStopped)
    }
}

/// Owns one `OrderBook` and applies commands to it one at a time.
pub struct BookRunner<S: TradeSink> {
    book: OrderBook,
    entry: OrderEntry,
    sink: S,
    rx: mpsc::Receiver<Command>,
}

impl<S: TradeSink + 'static> BookRunner<S> {
    /// Start a runner for a fresh book built from `config`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: &EngineConfig, sink: S) -> (BookHandle, JoinHandle<(OrderBook, S)>) {
        let book = OrderBook::with_policy(config.market.pair(), config.fill_policy);
        let entry = OrderEntry::new(config.market.clone());
        Self::spawn_with(book, entry, sink, config.channel_capacity)
    }

    /// Start a runner around an existing book.
    pub fn spawn_with(
        book: OrderBook,
        entry: OrderEntry,
        sink: S,
        capacity: usize,
    ) -> (BookHandle, JoinHandle<(OrderBook, S)>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = BookHandle {
            market: book.market.clone(),
            tx,
        };
        let runner = Self {
            book,
            entry,
            sink,
            rx,
        };
        (handle, tokio::spawn(runner.run()))
    }

    async fn run(mut self) -> (OrderBook, S) {
        tracing::info!(
            market = %self.book.market,
            policy = self.book.fill_policy().unfilled_threshold,
            "Book runner started"
        );

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Submit { request, reply } => {
                    let result = self.entry.accept(request).and_then(|o| self.execute(o));
                    let _ = reply.send(result);
                }
                Command::Replay { order, reply } => {
                    let result = self
                        .entry
                        .admit(order, &self.book)
                        .and_then(|o| self.execute(o));
                    let _ = reply.send(result);
                }
                Command::Snapshot { depth, reply } => {
                    let _ = reply.send(self.book.snapshot(depth));
                }
                Command::Verify { reply } => {
                    let _ = reply.send(self.book.verify_invariants());
                }
            }
        }

        tracing::info!(
            market = %self.book.market,
            matches = self.book.match_sequence(),
            resting = self.book.order_count(),
            "Book runner stopped"
        );
        (self.book, self.sink)
    }

    /// Match and hand every resulting trade to the sink. Every trade is
    /// offered even after one fails.
    fn execute(&mut self, order: Order) -> Result<Execution> {
        let outcome = self.book.match_order(order);
        let mut unrecorded = Vec::new();
        for trade in &outcome.trades {
            if let Err(e) = self.sink.record(trade) {
                tracing::error!(
                    trade_id = %trade.id,
                    error = %e,
                    "Trade sink rejected trade"
                );
                unrecorded.push((trade.id, e));
            }
        }
        Ok(Execution {
            outcome,
            unrecorded,
        })
    }
}
