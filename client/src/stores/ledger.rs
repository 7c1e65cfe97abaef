//! # Ledger Store
//!
//! Wallet snapshot, paginated transaction history and the monthly summary.
//!
//! ## Consistency
//!
//! - `fetch_transactions` replaces the list and restarts at page 1;
//!   `load_more_transactions` appends the next page and never reorders or
//!   drops earlier entries.
//! - A load-more response is discarded once a newer `fetch_transactions`,
//!   `reset` or `cancel_pending` has been issued.
//! - `topup`/`withdraw` return before the follow-up balance fetch lands. The
//!   view learns about it through `StoreEvent::BalanceRefreshed` and
//!   `balance_version`.

use super::sequence::Sequencer;
use super::{settle, EventSink, SessionScoped};
use crate::app::events::StoreEvent;
use crate::core::service::ApiService;
use crate::utils::validation::validate_amount;
use parking_lot::RwLock;
use shared::{
    ApiEnvelope, MonthlySummary, SummaryPeriod, TopupRequest, TopupResponse, Transaction,
    TransactionFilters, WalletSnapshot, WithdrawRequest,
};
use std::sync::Arc;

/// Snapshot of the ledger slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerState {
    pub wallet: Option<WalletSnapshot>,
    pub pending_transactions: Vec<Transaction>,
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub recent_activity: Vec<Transaction>,
    pub monthly_summary: Option<MonthlySummary>,
    pub current_page: u32,
    pub total_pages: u32,
    /// `current_page < total_pages`
    pub has_more: bool,
    pub filters: TransactionFilters,
    /// A balance or first-page fetch is in flight
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub is_refreshing: bool,
    pub error: Option<String>,
    /// Bumped on every committed balance fetch
    pub balance_version: u64,
    /// Bumped on every committed change
    pub version: u64,
    balance_loading: bool,
    transactions_loading: bool,
    refresh_depth: u32,
    /// Filters of the newest first-page request; `filters` holds the
    /// committed ones used by load-more
    requested_filters: TransactionFilters,
}

impl LedgerState {
    fn sync_loading(&mut self) {
        self.is_loading = self.balance_loading || self.transactions_loading;
    }
}

/// Outcome of a successful top-up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopupReceipt {
    /// External checkout to complete the payment, when required
    pub payment_url: Option<String>,
    pub reference: Option<String>,
}

impl From<TopupResponse> for TopupReceipt {
    fn from(response: TopupResponse) -> Self {
        Self {
            payment_url: response.payment_url,
            reference: response.reference,
        }
    }
}

pub struct LedgerStore {
    api: Arc<dyn ApiService>,
    page_size: u32,
    state: RwLock<LedgerState>,
    balance_seq: Sequencer,
    /// Shared by fetch_transactions (issues) and load_more (captures)
    transactions_seq: Sequencer,
    summary_seq: Sequencer,
    /// Advanced by reset; guards the refresh counter and mutation results
    generation: Sequencer,
    events: EventSink,
}

impl LedgerStore {
    pub fn new(api: Arc<dyn ApiService>, page_size: u32, events: EventSink) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
            state: RwLock::new(LedgerState::default()),
            balance_seq: Sequencer::new(),
            transactions_seq: Sequencer::new(),
            summary_seq: Sequencer::new(),
            generation: Sequencer::new(),
            events,
        }
    }

    pub fn state(&self) -> LedgerState {
        self.state.read().clone()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn update(&self, f: impl FnOnce(&mut LedgerState)) {
        let version = {
            let mut state = self.state.write();
            f(&mut *state);
            state.sync_loading();
            state.version += 1;
            state.version
        };
        self.events.emit(StoreEvent::LedgerChanged { version });
    }

    fn commit(&self, seq: &Sequencer, token: u64, f: impl FnOnce(&mut LedgerState)) -> bool {
        let version = {
            let mut state = self.state.write();
            if !seq.is_current(token) {
                return false;
            }
            f(&mut *state);
            state.sync_loading();
            state.version += 1;
            state.version
        };
        self.events.emit(StoreEvent::LedgerChanged { version });
        true
    }

    /// Fetch the wallet snapshot, pending transactions and recent activity.
    pub async fn fetch_balance(&self) {
        let token = self.balance_seq.issue();
        self.update(|state| state.balance_loading = true);

        let outcome = settle(
            self.api.get_balance().await,
            "Failed to load wallet balance",
            ApiEnvelope::into_payload,
        );

        let mut balance_version = None;
        self.commit(&self.balance_seq, token, |state| {
            state.balance_loading = false;
            match outcome {
                Ok(payload) => {
                    state.wallet = Some(payload.wallet);
                    state.pending_transactions = payload.pending_transactions;
                    state.recent_activity = payload.recent_activity;
                    state.balance_version += 1;
                    balance_version = Some(state.balance_version);
                }
                Err(message) => state.error = Some(message),
            }
        });

        if let Some(balance_version) = balance_version {
            tracing::debug!(balance_version, "Balance updated");
            self.events.emit(StoreEvent::BalanceRefreshed { balance_version });
        }
    }

    /// Load the first page for `filters`, replacing the current list.
    pub async fn fetch_transactions(&self, filters: TransactionFilters) {
        let token = self.transactions_seq.issue();
        self.update(|state| {
            state.transactions_loading = true;
            state.requested_filters = filters.clone();
            // Any load-more in flight is now stale
            state.is_loading_more = false;
        });

        let outcome = settle(
            self.api.get_transactions(&filters, 1, self.page_size).await,
            "Failed to load transactions",
            ApiEnvelope::into_page,
        );

        self.commit(&self.transactions_seq, token, |state| {
            state.transactions_loading = false;
            match outcome {
                Ok(page) => {
                    state.transactions = page.items;
                    state.current_page = page.pagination.page;
                    state.total_pages = page.pagination.pages;
                    state.has_more = page.pagination.has_more();
                    state.filters = filters;
                }
                Err(message) => state.error = Some(message),
            }
        });
    }

    /// Append the next page with the current filters.
    ///
    /// No-op when there is nothing more to load or a transaction load is
    /// already in flight.
    pub async fn load_more_transactions(&self) {
        let (token, page, filters, version) = {
            let mut state = self.state.write();
            if !state.has_more || state.is_loading_more || state.transactions_loading {
                return;
            }
            state.is_loading_more = true;
            state.version += 1;
            (
                self.transactions_seq.current(),
                state.current_page + 1,
                state.filters.clone(),
                state.version,
            )
        };
        self.events.emit(StoreEvent::LedgerChanged { version });

        let outcome = settle(
            self.api.get_transactions(&filters, page, self.page_size).await,
            "Failed to load more transactions",
            ApiEnvelope::into_page,
        );

        let committed = self.commit(&self.transactions_seq, token, |state| {
            state.is_loading_more = false;
            match outcome {
                Ok(next) => {
                    state.transactions.extend(next.items);
                    state.current_page = next.pagination.page;
                    state.total_pages = next.pagination.pages;
                    state.has_more = next.pagination.has_more();
                }
                Err(message) => state.error = Some(message),
            }
        });
        if !committed {
            tracing::debug!(page, "Discarded stale page");
        }
    }

    /// Start a top-up. On success the balance is refreshed in the
    /// background.
    #[tracing::instrument(skip(self, request), fields(amount = request.amount))]
    pub async fn topup(self: &Arc<Self>, request: TopupRequest) -> Option<TopupReceipt> {
        let generation = self.begin_mutation(request.amount)?;

        let outcome = settle(
            self.api.topup(request).await,
            "Top-up failed",
            ApiEnvelope::into_payload,
        );
        self.finish_mutation(generation, outcome)
            .map(TopupReceipt::from)
    }

    /// Request a withdrawal. On success the balance is refreshed in the
    /// background.
    #[tracing::instrument(skip(self, request), fields(amount = request.amount))]
    pub async fn withdraw(self: &Arc<Self>, request: WithdrawRequest) -> bool {
        let Some(generation) = self.begin_mutation(request.amount) else {
            return false;
        };

        let outcome = settle(
            self.api.withdraw(request).await,
            "Withdrawal failed",
            ApiEnvelope::into_ack,
        );
        self.finish_mutation(generation, outcome).is_some()
    }

    /// Validate the amount and clear `error`. Returns the generation the
    /// mutation belongs to.
    fn begin_mutation(&self, amount: f64) -> Option<u64> {
        if let Err(message) = validate_amount(amount).into_result() {
            self.update(|state| state.error = Some(message));
            return None;
        }
        self.update(|state| state.error = None);
        Some(self.generation.current())
    }

    fn finish_mutation<T>(
        self: &Arc<Self>,
        generation: u64,
        outcome: std::result::Result<T, String>,
    ) -> Option<T> {
        match outcome {
            Ok(value) => {
                if self.generation.is_current(generation) {
                    self.spawn_balance_refresh();
                }
                Some(value)
            }
            Err(message) => {
                tracing::warn!(error = %message, "Wallet mutation failed");
                self.commit(&self.generation, generation, |state| {
                    state.error = Some(message)
                });
                None
            }
        }
    }

    fn spawn_balance_refresh(self: &Arc<Self>) {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.fetch_balance().await;
        });
    }

    /// Fetch this month's summary. Failures are logged only.
    pub async fn fetch_monthly_summary(&self) {
        let token = self.summary_seq.issue();
        match settle(
            self.api.get_transaction_summary(SummaryPeriod::Month).await,
            "Failed to load summary",
            ApiEnvelope::into_payload,
        ) {
            Ok(summary) => {
                self.commit(&self.summary_seq, token, |state| {
                    state.monthly_summary = Some(summary)
                });
            }
            Err(message) => tracing::warn!(error = %message, "Monthly summary unavailable"),
        }
    }

    /// Refresh balance, first page and summary concurrently.
    ///
    /// The first page is reloaded with the most recently requested filters,
    /// even if that request has not landed yet.
    ///
    /// `is_refreshing` is set before dispatch and cleared once every
    /// sub-fetch has settled, whatever their outcome.
    pub async fn refresh(&self) {
        let (generation, filters, version) = {
            let mut state = self.state.write();
            state.refresh_depth += 1;
            state.is_refreshing = true;
            state.version += 1;
            (
                self.generation.current(),
                state.requested_filters.clone(),
                state.version,
            )
        };
        self.events.emit(StoreEvent::LedgerChanged { version });

        tokio::join!(
            self.fetch_balance(),
            self.fetch_transactions(filters),
            self.fetch_monthly_summary(),
        );

        self.commit(&self.generation, generation, |state| {
            state.refresh_depth = state.refresh_depth.saturating_sub(1);
            state.is_refreshing = state.refresh_depth > 0;
        });
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    /// Discard every in-flight response and drop the loading flags.
    pub fn cancel_pending(&self) {
        self.update(|state| {
            self.balance_seq.invalidate();
            self.transactions_seq.invalidate();
            self.summary_seq.invalidate();
            state.balance_loading = false;
            state.transactions_loading = false;
            state.is_loading_more = false;
        });
    }
}

impl SessionScoped for LedgerStore {
    fn reset(&self) {
        self.balance_seq.invalidate();
        self.transactions_seq.invalidate();
        self.summary_seq.invalidate();
        self.generation.invalidate();
        self.update(|state| {
            let version = state.version;
            *state = LedgerState {
                version,
                ..LedgerState::default()
            };
        });
        tracing::debug!("Ledger reset");
    }
}
