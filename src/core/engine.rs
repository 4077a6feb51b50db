// src/core/engine.rs
use crate::connectors::messages::{OrderAck, OrderBookDepth};
use crate::connectors::traits::ExchangeClient;
use crate::core::confirm::Confirm;
use crate::core::constraints::{currency_role, resolve_constraints};
use crate::core::converter::to_base_quantity;
use crate::core::summary::{below_minimum_message, cancellation_summary, execution_summary};
use crate::core::validator::validate_order;
use crate::error::{DcaError, DcaResult, ExchangeError};
use crate::notify::Notifier;
use crate::strategies::dynamic_dca::ScalingPolicy;
use crate::types::{
    ExecutionResult, MarketConstraints, PriceSnapshot, RunOutcome, ScalingDecision, Side,
    SizedOrder, TradeRequest,
};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

const ORDER_BOOK_DEPTH: u16 = 5;
/// Binance error code for a symbol it does not list.
const INVALID_SYMBOL: i64 = -1121;

/// How orders leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMode {
    /// Submit real orders instead of test orders.
    pub live: bool,
    /// Skip the interactive confirmation before live orders.
    pub unattended: bool,
}

/// Runs one DCA order end to end: constraints, scaling, sizing, validation, execution.
pub struct TradeOrchestrator {
    exchange: Box<dyn ExchangeClient>,
    notifier: Option<Box<dyn Notifier>>,
    confirm: Box<dyn Confirm>,
    policy: ScalingPolicy,
    mode: RunMode,
}

impl TradeOrchestrator {
    pub fn new(
        exchange: Box<dyn ExchangeClient>,
        notifier: Option<Box<dyn Notifier>>,
        confirm: Box<dyn Confirm>,
        policy: ScalingPolicy,
        mode: RunMode,
    ) -> Self {
        Self {
            exchange,
            notifier,
            confirm,
            policy,
            mode,
        }
    }

    pub async fn run(&self, request: &TradeRequest) -> DcaResult<RunOutcome> {
        info!(
            "DCA run started: {} {} {} {} (dynamic: {}, live: {})",
            request.market_name,
            request.side,
            request.amount,
            request.amount_currency,
            request.dynamic_dca,
            self.mode.live
        );

        if request.amount <= Decimal::ZERO {
            return Err(DcaError::InvalidAmount {
                amount: request.amount,
                currency: request.amount_currency.clone(),
            });
        }

        // 1. Market constraints
        let exchange_info = self
            .exchange
            .exchange_info(&request.market_name)
            .await
            .map_err(|e| match e {
                ExchangeError::Api {
                    code: INVALID_SYMBOL,
                    ..
                } => DcaError::UnknownMarket(request.market_name.clone()),
                other => DcaError::Exchange(other),
            })?;
        let constraints = resolve_constraints(&exchange_info, &request.market_name)?;
        let role = currency_role(&constraints, &request.amount_currency)?;
        info!(
            "base_min_size: {} | base_increment: {} | quote_increment: {}",
            constraints.min_notional, constraints.base_increment, constraints.quote_increment
        );

        // 2. Dynamic DCA. A move under one step downgrades the run to a plain trade.
        let scaling = if request.dynamic_dca {
            self.scale_amount(request).await?
        } else {
            None
        };
        let amount = scaling
            .as_ref()
            .map(|d| d.scaled_amount)
            .unwrap_or(request.amount);

        // 3. Execution-side price
        let depth = self
            .exchange
            .order_book(&request.market_name, ORDER_BOOK_DEPTH)
            .await?;
        let market_price = price_snapshot(&depth)
            .execution_price(request.side)
            .ok_or_else(|| DcaError::MalformedResponse {
                what: "order book",
                symbol: request.market_name.clone(),
                detail: format!("no {} for a {} order", priced_from(request.side), request.side),
            })?;
        info!("market_price: {} {}", market_price, constraints.quote_currency);

        // 4. Sizing and the min-notional gate
        let base_quantity = to_base_quantity(amount, role, &constraints, market_price)?;
        info!(
            "base_currency_amount: {} {}",
            base_quantity, constraints.base_currency
        );
        let order = validate_order(base_quantity, market_price, &constraints)?;

        if !order.accepted {
            return Ok(self
                .reject(request, scaling.as_ref(), order, market_price, &constraints)
                .await);
        }
        info!(
            "order_value: {} {}",
            order.notional_value, constraints.quote_currency
        );

        // 5. Execution
        if !self.mode.live {
            return self
                .simulate(request, scaling.as_ref(), order, market_price, &constraints)
                .await;
        }

        if !self.mode.unattended {
            let prompt = format!(
                "\n================================================\n\n\tLive {} of {} {} (~{} {}) on {}! Confirm Y/[n]: ",
                request.side,
                order.base_quantity,
                constraints.base_currency,
                order.notional_value,
                constraints.quote_currency,
                request.market_name
            );
            let confirmed = self.confirm.confirm(&prompt).await.map_err(|e| {
                DcaError::Execution {
                    market: request.market_name.clone(),
                    side: request.side.to_string(),
                    quantity: order.base_quantity,
                    base: constraints.base_currency.clone(),
                    reason: format!("confirmation failed: {}", e),
                }
            })?;
            if !confirmed {
                info!("Exiting without submitting orders.");
                return Ok(RunOutcome::Declined);
            }
        }

        self.execute(request, scaling.as_ref(), order, market_price, &constraints)
            .await
    }

    async fn scale_amount(&self, request: &TradeRequest) -> DcaResult<Option<ScalingDecision>> {
        let ticker = self.exchange.ticker_24h(&request.market_name).await?;
        let decision = self
            .policy
            .scale(request.amount, request.side, ticker.price_change_percent)?;

        info!(
            "Dynamic DCA | percent_change: {}% | steps: {}",
            decision.percent_change, decision.steps
        );

        if !decision.applied {
            return Ok(None);
        }

        if decision.scaled_amount.is_zero() {
            warn!(
                "Dynamic DCA canceling trade at {}%",
                decision.percent_change
            );
        } else if decision.scaled_amount > decision.original_amount {
            info!(
                "Dynamic DCA scaling amount up {}x to {}",
                decision.steps, decision.scaled_amount
            );
        } else {
            info!(
                "Dynamic DCA scaling amount down {}x to {}",
                decision.steps, decision.scaled_amount
            );
        }

        Ok(Some(decision))
    }

    async fn reject(
        &self,
        request: &TradeRequest,
        scaling: Option<&ScalingDecision>,
        order: SizedOrder,
        market_price: Decimal,
        constraints: &MarketConstraints,
    ) -> RunOutcome {
        let message = below_minimum_message(&order, market_price, constraints);
        warn!("{}", message);

        let summary = scaling.map(|decision| cancellation_summary(request, decision));
        if let Some(summary) = &summary {
            info!("{}", summary);
            self.notify(summary, &message).await;
        }

        RunOutcome::Rejected {
            order,
            message,
            summary,
        }
    }

    async fn simulate(
        &self,
        request: &TradeRequest,
        scaling: Option<&ScalingDecision>,
        order: SizedOrder,
        market_price: Decimal,
        constraints: &MarketConstraints,
    ) -> DcaResult<RunOutcome> {
        let response = self
            .exchange
            .test_order(
                &request.market_name,
                request.side,
                order.base_quantity,
                &client_order_id(),
            )
            .await?;
        if response.as_object().map_or(true, |o| !o.is_empty()) {
            info!("Test order response: {}", response);
        }

        let summary = execution_summary(
            request,
            scaling,
            "SIMULATED",
            market_price,
            &constraints.quote_currency,
        );
        info!("{}", summary);

        Ok(RunOutcome::Simulated { order, summary })
    }

    async fn execute(
        &self,
        request: &TradeRequest,
        scaling: Option<&ScalingDecision>,
        order: SizedOrder,
        market_price: Decimal,
        constraints: &MarketConstraints,
    ) -> DcaResult<RunOutcome> {
        let raw = match self
            .exchange
            .market_order(
                &request.market_name,
                request.side,
                order.base_quantity,
                &client_order_id(),
            )
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                error!("⚠️ Unable to place {} order: {}", request.market_name, e);
                self.notify(
                    &format!("Unable to place {} order", request.market_name),
                    &e.to_string(),
                )
                .await;
                return Err(DcaError::Execution {
                    market: request.market_name.clone(),
                    side: request.side.to_string(),
                    quantity: order.base_quantity,
                    base: constraints.base_currency.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let pretty = serde_json::to_string_pretty(&raw).unwrap_or_else(|_| raw.to_string());
        info!("✅ Order response:\n{}", pretty);

        let execution = execution_result(raw, market_price);
        let summary = execution_summary(
            request,
            scaling,
            &execution.status,
            execution.fill_price,
            &constraints.quote_currency,
        );
        info!("{}", summary);
        self.notify(&summary, &pretty).await;

        Ok(RunOutcome::Filled {
            order,
            execution,
            summary,
        })
    }

    /// Live mode only. Delivery failures never fail the run.
    async fn notify(&self, subject: &str, message: &str) {
        if !self.mode.live {
            return;
        }
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(subject, message).await {
                warn!("Notification failed: {:#}", e);
            }
        }
    }
}

fn client_order_id() -> String {
    format!("dca-{}", Uuid::new_v4().simple())
}

fn price_snapshot(depth: &OrderBookDepth) -> PriceSnapshot {
    PriceSnapshot {
        best_bid: depth.bids.first().map(|(price, _)| *price),
        best_ask: depth.asks.first().map(|(price, _)| *price),
    }
}

/// The book side a market order on `side` is priced from.
fn priced_from(side: Side) -> &'static str {
    match side {
        Side::Buy => "bids",
        Side::Sell => "asks",
    }
}

/// Status and first fill price from a FULL order response.
/// Falls back to the book price when the exchange reports no fills.
fn execution_result(raw: serde_json::Value, market_price: Decimal) -> ExecutionResult {
    match serde_json::from_value::<OrderAck>(raw.clone()) {
        Ok(ack) => {
            info!(
                "Order {} #{} ({}) {}",
                ack.symbol, ack.order_id, ack.client_order_id, ack.status
            );
            for fill in &ack.fills {
                info!(
                    "  fill {} @ {} (commission {} {})",
                    fill.qty,
                    fill.price,
                    fill.commission.unwrap_or_default(),
                    fill.commission_asset.as_deref().unwrap_or("-")
                );
            }
            ExecutionResult {
                fill_price: ack.fills.first().map_or(market_price, |f| f.price),
                status: ack.status,
                raw,
            }
        }
        Err(e) => {
            warn!("Could not decode order response: {}", e);
            ExecutionResult {
                status: raw
                    .get("status")
                    .and_then(|s| s.as_str())
                    .unwrap_or("UNKNOWN")
                    .to_string(),
                fill_price: market_price,
                raw,
            }
        }
    }
}
