// src/core/constraints.rs
//! Extracts the sizing limits for one market from exchangeInfo.
use crate::connectors::messages::{ExchangeInfo, SymbolFilter};
use crate::error::{DcaError, DcaResult};
use crate::types::{CurrencyRole, MarketConstraints};
use rust_decimal::Decimal;

pub fn resolve_constraints(info: &ExchangeInfo, symbol: &str) -> DcaResult<MarketConstraints> {
    let market = info
        .symbols
        .iter()
        .find(|s| s.symbol == symbol)
        .ok_or_else(|| DcaError::UnknownMarket(symbol.to_string()))?;

    let mut base_increment = None;
    let mut quote_increment = None;
    let mut min_notional = None;
    let mut notional_fallback = None;

    for filter in &market.filters {
        match filter {
            SymbolFilter::LotSize { step_size } => base_increment = positive(*step_size),
            SymbolFilter::Price { tick_size } => quote_increment = positive(*tick_size),
            SymbolFilter::MinNotional { min_notional: v } => min_notional = positive(*v),
            SymbolFilter::Notional { min_notional: v } => notional_fallback = positive(*v),
            SymbolFilter::Other => {}
        }
    }

    let missing = |filter: &'static str| DcaError::MissingFilter {
        symbol: symbol.to_string(),
        filter,
    };

    Ok(MarketConstraints {
        symbol: market.symbol.clone(),
        base_currency: market.base_asset.clone(),
        quote_currency: market.quote_asset.clone(),
        quote_asset_precision: market.quote_asset_precision,
        min_notional: min_notional
            .or(notional_fallback)
            .ok_or_else(|| missing("MIN_NOTIONAL.minNotional"))?,
        base_increment: base_increment.ok_or_else(|| missing("LOT_SIZE.stepSize"))?,
        quote_increment: quote_increment.ok_or_else(|| missing("PRICE_FILTER.tickSize"))?,
    })
}

/// Zero means "no constraint" on Binance, which is unusable for sizing.
fn positive(value: Decimal) -> Option<Decimal> {
    (value > Decimal::ZERO).then(|| value.normalize())
}

/// The amount must be denominated in one of the market's two assets.
pub fn currency_role(constraints: &MarketConstraints, currency: &str) -> DcaResult<CurrencyRole> {
    if currency == constraints.quote_currency {
        Ok(CurrencyRole::Quote)
    } else if currency == constraints.base_currency {
        Ok(CurrencyRole::Base)
    } else {
        Err(DcaError::CurrencyNotInMarket {
            currency: currency.to_string(),
            market: constraints.symbol.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::messages::SymbolInfo;
    use rust_decimal_macros::dec;

    fn eth_btc(filters: Vec<SymbolFilter>) -> ExchangeInfo {
        ExchangeInfo {
            symbols: vec![SymbolInfo {
                symbol: "ETHBTC".to_string(),
                base_asset: "ETH".to_string(),
                quote_asset: "BTC".to_string(),
                quote_asset_precision: 8,
                filters,
            }],
        }
    }

    fn full_filters() -> Vec<SymbolFilter> {
        vec![
            SymbolFilter::Price {
                tick_size: dec!(0.00000100),
            },
            SymbolFilter::Other,
            SymbolFilter::LotSize {
                step_size: dec!(0.00100000),
            },
            SymbolFilter::MinNotional {
                min_notional: dec!(0.00010000),
            },
        ]
    }

    #[test]
    fn resolves_all_three_filters() {
        let c = resolve_constraints(&eth_btc(full_filters()), "ETHBTC").unwrap();
        assert_eq!(c.base_currency, "ETH");
        assert_eq!(c.quote_currency, "BTC");
        assert_eq!(c.quote_asset_precision, 8);
        assert_eq!(c.base_increment, dec!(0.001));
        assert_eq!(c.base_increment.scale(), 3);
        assert_eq!(c.quote_increment, dec!(0.000001));
        assert_eq!(c.min_notional, dec!(0.0001));
    }

    #[test]
    fn unknown_symbol_is_fatal() {
        let err = resolve_constraints(&eth_btc(full_filters()), "DOGEBTC").unwrap_err();
        assert!(matches!(err, DcaError::UnknownMarket(ref s) if s == "DOGEBTC"));
    }

    #[test]
    fn missing_filter_is_named_in_the_error() {
        let mut filters = full_filters();
        filters.retain(|f| !matches!(f, SymbolFilter::LotSize { .. }));
        let err = resolve_constraints(&eth_btc(filters), "ETHBTC").unwrap_err();
        assert_eq!(err.to_string(), "LOT_SIZE.stepSize not found in ETHBTC info");

        let mut filters = full_filters();
        filters.retain(|f| !matches!(f, SymbolFilter::MinNotional { .. }));
        let err = resolve_constraints(&eth_btc(filters), "ETHBTC").unwrap_err();
        assert!(matches!(
            err,
            DcaError::MissingFilter { filter: "MIN_NOTIONAL.minNotional", .. }
        ));
    }

    #[test]
    fn zero_step_counts_as_missing() {
        let mut filters = full_filters();
        filters.push(SymbolFilter::Price {
            tick_size: Decimal::ZERO,
        });
        let err = resolve_constraints(&eth_btc(filters), "ETHBTC").unwrap_err();
        assert!(matches!(
            err,
            DcaError::MissingFilter { filter: "PRICE_FILTER.tickSize", .. }
        ));
    }

    #[test]
    fn notional_filter_backs_up_min_notional() {
        let mut filters = full_filters();
        filters.retain(|f| !matches!(f, SymbolFilter::MinNotional { .. }));
        filters.push(SymbolFilter::Notional {
            min_notional: dec!(5),
        });
        let c = resolve_constraints(&eth_btc(filters), "ETHBTC").unwrap();
        assert_eq!(c.min_notional, dec!(5));

        let mut filters = full_filters();
        filters.push(SymbolFilter::Notional {
            min_notional: dec!(5),
        });
        let c = resolve_constraints(&eth_btc(filters), "ETHBTC").unwrap();
        assert_eq!(c.min_notional, dec!(0.0001));
    }

    #[test]
    fn amount_currency_must_belong_to_the_market() {
        let c = resolve_constraints(&eth_btc(full_filters()), "ETHBTC").unwrap();
        assert_eq!(currency_role(&c, "BTC").unwrap(), CurrencyRole::Quote);
        assert_eq!(currency_role(&c, "ETH").unwrap(), CurrencyRole::Base);
        for bad in ["USDT", "eth", ""] {
            let err = currency_role(&c, bad).unwrap_err();
            assert!(matches!(err, DcaError::CurrencyNotInMarket { .. }));
        }
    }
}
