//! Actor-based concurrency for the wallet ledger
//!
//! Single-writer pattern: one task owns every wallet mutation, so the
//! withdrawal sequence "read snapshot, evaluate policy, open hold" runs as
//! one serialized unit. Two concurrent requests against the same wallet are
//! processed one after the other and can never both pass against the same
//! balance — the classic check-then-act race cannot occur.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │             WalletHandle (Clone)                      │
//! │        Sends messages to actor mailbox               │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │             WalletActor (Single Task)                 │
//! │   load snapshot → decide → commit (WriteBatch)        │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::{Error, Result, Storage};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;
use wallet_core::{
    RiderId, Transaction, TransactionKind, WalletSnapshot, WithdrawalDecision, WithdrawalHold,
    WithdrawalPolicy,
};

/// Result of a withdrawal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalOutcome {
    /// Policy decision the request was evaluated against
    pub decision: WithdrawalDecision,

    /// Hold opened for an allowed request, absent on refusal
    pub hold_id: Option<Uuid>,
}

/// Message sent to the wallet actor
pub enum WalletMessage {
    /// Append a credit transaction
    AppendTransaction {
        /// Transaction to commit
        transaction: Transaction,
        /// Reply channel
        response: oneshot::Sender<Result<Uuid>>,
    },

    /// Evaluate and, if allowed, commit a withdrawal hold
    RequestWithdrawal {
        /// Requesting rider
        rider_id: RiderId,
        /// Requested amount (positive)
        amount: Decimal,
        /// Reply channel
        response: oneshot::Sender<Result<WithdrawalOutcome>>,
    },

    /// Release a hold and append the matching debit
    SettleWithdrawal {
        /// Owning rider
        rider_id: RiderId,
        /// Hold to settle
        hold_id: Uuid,
        /// Reply channel, carries the debit transaction id
        response: oneshot::Sender<Result<Uuid>>,
    },

    /// Release a hold without a debit
    CancelWithdrawal {
        /// Owning rider
        rider_id: RiderId,
        /// Hold to cancel
        hold_id: Uuid,
        /// Reply channel
        response: oneshot::Sender<Result<()>>,
    },

    /// Get wallet snapshot
    GetWallet {
        /// Rider to look up
        rider_id: RiderId,
        /// Reply channel
        response: oneshot::Sender<Result<WalletSnapshot>>,
    },

    /// Get full transaction history
    GetTransactions {
        /// Rider to look up
        rider_id: RiderId,
        /// Reply channel
        response: oneshot::Sender<Result<Vec<Transaction>>>,
    },

    /// Get transaction by ID
    GetTransaction {
        /// Transaction to look up
        transaction_id: Uuid,
        /// Reply channel
        response: oneshot::Sender<Result<Transaction>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes wallet messages
pub struct WalletActor {
    /// Storage backend
    storage: Arc<Storage>,

    /// Withdrawal policy
    policy: WithdrawalPolicy,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<WalletMessage>,
}

impl WalletActor {
    /// Create new actor
    pub fn new(
        storage: Arc<Storage>,
        policy: WithdrawalPolicy,
        mailbox: mpsc::Receiver<WalletMessage>,
    ) -> Self {
        Self {
            storage,
            policy,
            mailbox,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                WalletMessage::Shutdown => break,
                _ => self.handle_message(msg),
            }
        }
    }

    /// Load a rider's snapshot, or start a fresh one
    fn load_wallet(&self, rider_id: &RiderId) -> Result<WalletSnapshot> {
        Ok(self
            .storage
            .get_wallet(rider_id)?
            .unwrap_or_else(|| WalletSnapshot::new(rider_id.clone(), Utc::now())))
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: WalletMessage) {
        match msg {
            WalletMessage::AppendTransaction {
                transaction,
                response,
            } => {
                let _ = response.send(self.append_transaction(transaction));
            }

            WalletMessage::RequestWithdrawal {
                rider_id,
                amount,
                response,
            } => {
                let _ = response.send(self.request_withdrawal(rider_id, amount));
            }

            WalletMessage::SettleWithdrawal {
                rider_id,
                hold_id,
                response,
            } => {
                let _ = response.send(self.settle_withdrawal(rider_id, hold_id));
            }

            WalletMessage::CancelWithdrawal {
                rider_id,
                hold_id,
                response,
            } => {
                let _ = response.send(self.cancel_withdrawal(rider_id, hold_id));
            }

            WalletMessage::GetWallet { rider_id, response } => {
                let result = self
                    .storage
                    .get_wallet(&rider_id)
                    .and_then(|wallet| {
                        wallet.ok_or_else(|| Error::WalletNotFound(rider_id.to_string()))
                    });
                let _ = response.send(result);
            }

            WalletMessage::GetTransactions { rider_id, response } => {
                let _ = response.send(self.storage.get_rider_transactions(&rider_id));
            }

            WalletMessage::GetTransaction {
                transaction_id,
                response,
            } => {
                let _ = response.send(self.storage.get_transaction(transaction_id));
            }

            WalletMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }

    fn append_transaction(&self, transaction: Transaction) -> Result<Uuid> {
        let mut wallet = self.load_wallet(&transaction.rider_id)?;
        wallet.apply(&transaction)?;

        self.storage.commit_transaction(&transaction, &wallet)?;

        Ok(transaction.transaction_id)
    }

    fn request_withdrawal(&self, rider_id: RiderId, amount: Decimal) -> Result<WithdrawalOutcome> {
        let mut wallet = self.load_wallet(&rider_id)?;

        let decision = self.policy.evaluate_request(
            wallet.current_balance,
            wallet.pending_withdrawal(),
            amount,
        );

        if !decision.allowed {
            tracing::info!(
                %rider_id,
                %amount,
                reason = decision.reason.as_deref().unwrap_or(""),
                "Withdrawal refused"
            );
            return Ok(WithdrawalOutcome {
                decision,
                hold_id: None,
            });
        }

        let hold = WithdrawalHold::new(Uuid::now_v7(), amount, Utc::now());
        let hold_id = hold.hold_id;

        wallet.open_hold(hold);
        wallet.updated_at = Utc::now();
        self.storage.put_wallet(&wallet)?;

        tracing::info!(%rider_id, %amount, %hold_id, "Withdrawal hold opened");

        Ok(WithdrawalOutcome {
            decision,
            hold_id: Some(hold_id),
        })
    }

    fn settle_withdrawal(&self, rider_id: RiderId, hold_id: Uuid) -> Result<Uuid> {
        let mut wallet = self
            .storage
            .get_wallet(&rider_id)?
            .ok_or_else(|| Error::WalletNotFound(rider_id.to_string()))?;

        let hold = wallet
            .take_hold(hold_id)
            .ok_or_else(|| Error::HoldNotFound(hold_id.to_string()))?;

        let debit = Transaction::record(
            Uuid::now_v7(),
            rider_id.clone(),
            -hold.amount,
            TransactionKind::Withdrawal,
            Utc::now(),
            Some(format!("payout for hold {}", hold_id)),
        );

        wallet.apply(&debit)?;
        self.storage.commit_transaction(&debit, &wallet)?;

        tracing::info!(
            %rider_id,
            %hold_id,
            amount = %hold.amount,
            transaction_id = %debit.transaction_id,
            "Withdrawal settled"
        );

        Ok(debit.transaction_id)
    }

    fn cancel_withdrawal(&self, rider_id: RiderId, hold_id: Uuid) -> Result<()> {
        let mut wallet = self
            .storage
            .get_wallet(&rider_id)?
            .ok_or_else(|| Error::WalletNotFound(rider_id.to_string()))?;

        wallet
            .take_hold(hold_id)
            .ok_or_else(|| Error::HoldNotFound(hold_id.to_string()))?;

        wallet.updated_at = Utc::now();
        self.storage.put_wallet(&wallet)?;

        tracing::info!(%rider_id, %hold_id, "Withdrawal hold cancelled");

        Ok(())
    }
}

/// Handle for sending messages to the actor
#[derive(Debug, Clone)]
pub struct WalletHandle {
    sender: mpsc::Sender<WalletMessage>,
}

impl WalletHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<WalletMessage>) -> Self {
        Self { sender }
    }

    async fn send(&self, msg: WalletMessage) -> Result<()> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))
    }

    /// Append a credit transaction
    pub async fn append_transaction(&self, transaction: Transaction) -> Result<Uuid> {
        let (tx, rx) = oneshot::channel();
        self.send(WalletMessage::AppendTransaction {
            transaction,
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Request a withdrawal
    pub async fn request_withdrawal(
        &self,
        rider_id: RiderId,
        amount: Decimal,
    ) -> Result<WithdrawalOutcome> {
        let (tx, rx) = oneshot::channel();
        self.send(WalletMessage::RequestWithdrawal {
            rider_id,
            amount,
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Settle a withdrawal hold
    pub async fn settle_withdrawal(&self, rider_id: RiderId, hold_id: Uuid) -> Result<Uuid> {
        let (tx, rx) = oneshot::channel();
        self.send(WalletMessage::SettleWithdrawal {
            rider_id,
            hold_id,
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Cancel a withdrawal hold
    pub async fn cancel_withdrawal(&self, rider_id: RiderId, hold_id: Uuid) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(WalletMessage::CancelWithdrawal {
            rider_id,
            hold_id,
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Get wallet snapshot
    pub async fn get_wallet(&self, rider_id: RiderId) -> Result<WalletSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(WalletMessage::GetWallet {
            rider_id,
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Get transaction history
    pub async fn get_transactions(&self, rider_id: RiderId) -> Result<Vec<Transaction>> {
        let (tx, rx) = oneshot::channel();
        self.send(WalletMessage::GetTransactions {
            rider_id,
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Get transaction by ID
    pub async fn get_transaction(&self, transaction_id: Uuid) -> Result<Transaction> {
        let (tx, rx) = oneshot::channel();
        self.send(WalletMessage::GetTransaction {
            transaction_id,
            response: tx,
        })
        .await?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.send(WalletMessage::Shutdown).await
    }
}

/// Spawn the wallet actor
pub fn spawn_wallet_actor(storage: Arc<Storage>, policy: WithdrawalPolicy) -> WalletHandle {
    let (tx, rx) = mpsc::channel(1000); // Bounded channel for backpressure
    let actor = WalletActor::new(storage, policy, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    WalletHandle::new(tx)
}
