use std::collections::BTreeMap;

use crate::models::{Price, PriceTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NotAlarmed,
    LimitReached { limit: Price },
    /// `delta` is how much cheaper the current price is than the limit.
    BelowLimit { limit: Price, delta: Price },
}

impl Verdict {
    pub fn is_alarm(&self) -> bool {
        !matches!(self, Verdict::NotAlarmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub fuel: String,
    pub price: Price,
    pub verdict: Verdict,
}

/// Classify every fuel type once, in label order.
pub fn evaluate(prices: &PriceTable, alarms: &BTreeMap<String, Price>) -> Vec<Evaluation> {
    prices
        .iter()
        .map(|(fuel, &price)| Evaluation {
            fuel: fuel.clone(),
            price,
            verdict: classify(price, alarms.get(fuel).copied()),
        })
        .collect()
}

pub fn classify(price: Price, limit: Option<Price>) -> Verdict {
    let Some(limit) = limit else {
        return Verdict::NotAlarmed;
    };

    let delta = price - limit;
    if delta == Price::ZERO {
        Verdict::LimitReached { limit }
    } else if delta < Price::ZERO {
        Verdict::BelowLimit {
            limit,
            delta: delta.abs(),
        }
    } else {
        Verdict::NotAlarmed
    }
}
