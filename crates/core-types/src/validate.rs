use rust_decimal::Decimal;
use std::str::FromStr;

use crate::enums::{OrderSide, TimeInForce};
use crate::error::CoreError;

/// Normalizes and checks a trading symbol: trimmed, uppercased, at least
/// three letters followed by the USDT suffix. Idempotent on its own output.
pub fn validate_symbol(raw: &str) -> Result<String, CoreError> {
    let symbol = raw.trim().to_uppercase();
    let valid = symbol
        .strip_suffix("USDT")
        .is_some_and(|base| base.len() >= 3 && base.chars().all(|c| c.is_ascii_uppercase()));
    if !valid {
        return Err(CoreError::InvalidInput(
            "symbol".to_string(),
            "must be uppercase letters ending in USDT (e.g., BTCUSDT)".to_string(),
        ));
    }
    Ok(symbol)
}

pub fn validate_side(raw: &str) -> Result<OrderSide, CoreError> {
    match raw.trim().to_uppercase().as_str() {
        "BUY" => Ok(OrderSide::Buy),
        "SELL" => Ok(OrderSide::Sell),
        _ => Err(CoreError::InvalidInput(
            "side".to_string(),
            "must be BUY or SELL".to_string(),
        )),
    }
}

fn positive_decimal(name: &str, raw: &str) -> Result<Decimal, CoreError> {
    let value = Decimal::from_str(raw.trim())
        .map_err(|_| CoreError::InvalidInput(name.to_string(), "must be a number".to_string()))?;
    if value <= Decimal::ZERO {
        return Err(CoreError::InvalidInput(
            name.to_string(),
            "must be > 0".to_string(),
        ));
    }
    Ok(value)
}

pub fn validate_quantity(raw: &str) -> Result<Decimal, CoreError> {
    positive_decimal("quantity", raw)
}

/// Parses a strictly positive price. `name` is the field reported on
/// failure, e.g. `stopPrice`.
pub fn validate_price(name: &str, raw: &str) -> Result<Decimal, CoreError> {
    positive_decimal(name, raw)
}

pub fn validate_time_in_force(raw: &str) -> Result<TimeInForce, CoreError> {
    match raw.trim().to_uppercase().as_str() {
        "GTC" => Ok(TimeInForce::Gtc),
        "IOC" => Ok(TimeInForce::Ioc),
        "FOK" => Ok(TimeInForce::Fok),
        _ => Err(CoreError::InvalidInput(
            "timeInForce".to_string(),
            "must be GTC, IOC, or FOK".to_string(),
        )),
    }
}
