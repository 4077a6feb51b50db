// src/strategies/dynamic_dca.rs
use crate::error::{DcaError, DcaResult};
use crate::types::{ScalingDecision, Side};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Momentum-following step function: buy more into dips, sell more into rallies,
/// and back off when the 24h move runs against the trade.
///
/// The favorable branch has no upper clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingPolicy {
    /// Percentage points of 24h change per step.
    pub step_size: Decimal,
    /// Fraction of the amount added per favorable step.
    pub up_multiplier: Decimal,
    /// Fraction of the amount removed per unfavorable step.
    pub down_divider: Decimal,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        Self {
            step_size: Decimal::new(50, 1),
            up_multiplier: Decimal::new(10, 1),
            down_divider: Decimal::new(25, 2),
        }
    }
}

impl ScalingPolicy {
    /// Number of whole steps in `|percent_change|`.
    pub fn steps(&self, percent_change: Decimal) -> DcaResult<u32> {
        if self.step_size <= Decimal::ZERO {
            return Ok(0);
        }
        let steps = percent_change
            .abs()
            .checked_div(self.step_size)
            .ok_or_else(|| {
                DcaError::Overflow(format!(
                    "counting {}% steps in {percent_change}%",
                    self.step_size
                ))
            })?;
        Ok(steps.floor().to_u32().unwrap_or(u32::MAX))
    }

    /// Scales `amount` by the 24h `percent_change` for a trade on `side`.
    pub fn scale(
        &self,
        amount: Decimal,
        side: Side,
        percent_change: Decimal,
    ) -> DcaResult<ScalingDecision> {
        let steps = self.steps(percent_change)?;

        if steps == 0 {
            return Ok(ScalingDecision {
                percent_change,
                steps,
                scaled_amount: amount,
                original_amount: amount,
                applied: false,
            });
        }

        let favorable = match side {
            Side::Buy => percent_change < Decimal::ZERO,
            Side::Sell => percent_change > Decimal::ZERO,
        };
        let step_count = Decimal::from(steps);
        let factor = if favorable { self.up_multiplier } else { self.down_divider };

        let delta = amount
            .checked_mul(factor)
            .and_then(|per_step| per_step.checked_mul(step_count));
        let scaled = if favorable {
            delta.and_then(|delta| amount.checked_add(delta))
        } else {
            delta.map(|delta| (amount - delta).max(Decimal::ZERO))
        };
        let scaled_amount = scaled.ok_or_else(|| {
            DcaError::Overflow(format!("scaling {amount} by {steps} steps of {factor}"))
        })?;

        Ok(ScalingDecision {
            percent_change,
            steps,
            scaled_amount,
            original_amount: amount,
            applied: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn moves_under_one_step_leave_the_amount_alone() {
        let policy = ScalingPolicy::default();
        for pct in [dec!(0), dec!(4.99), dec!(-4.99), dec!(0.01)] {
            for side in [Side::Buy, Side::Sell] {
                let decision = policy.scale(dec!(100), side, pct).unwrap();
                assert_eq!(decision.steps, 0);
                assert_eq!(decision.scaled_amount, dec!(100));
                assert!(!decision.applied);
            }
        }
    }

    #[test]
    fn buying_a_dip_triples_at_two_steps() {
        let decision = ScalingPolicy::default().scale(dec!(0.002), Side::Buy, dec!(-12)).unwrap();
        assert_eq!(decision.steps, 2);
        assert!(decision.applied);
        assert_eq!(decision.scaled_amount, dec!(0.006));
        assert_eq!(decision.original_amount, dec!(0.002));
    }

    #[test]
    fn buying_into_a_rally_halves_at_two_steps() {
        let decision = ScalingPolicy::default().scale(dec!(0.002), Side::Buy, dec!(12)).unwrap();
        assert_eq!(decision.steps, 2);
        assert_eq!(decision.scaled_amount, dec!(0.001));
    }

    #[test]
    fn selling_mirrors_buying() {
        let policy = ScalingPolicy::default();
        assert_eq!(policy.scale(dec!(10), Side::Sell, dec!(5)).unwrap().scaled_amount, dec!(20));
        assert_eq!(policy.scale(dec!(10), Side::Sell, dec!(-5)).unwrap().scaled_amount, dec!(7.5));
    }

    #[test]
    fn unfavorable_scaling_floors_at_exactly_zero() {
        let policy = ScalingPolicy::default();
        let at_four = policy.scale(dec!(10), Side::Buy, dec!(20)).unwrap();
        assert_eq!(at_four.steps, 4);
        assert_eq!(at_four.scaled_amount, Decimal::ZERO);
        assert!(at_four.applied);

        let past_zero = policy.scale(dec!(10), Side::Buy, dec!(37.5)).unwrap();
        assert_eq!(past_zero.steps, 7);
        assert_eq!(past_zero.scaled_amount, Decimal::ZERO);
    }

    #[test]
    fn scaling_is_monotonic_in_steps() {
        let policy = ScalingPolicy::default();
        let mut last_up = dec!(1);
        let mut last_down = dec!(1);
        for step in 1..=3u32 {
            let pct = Decimal::from(step * 5);
            let up = policy.scale(dec!(1), Side::Buy, -pct).unwrap().scaled_amount;
            let down = policy.scale(dec!(1), Side::Buy, pct).unwrap().scaled_amount;
            assert!(up > last_up);
            assert!(down < last_down);
            last_up = up;
            last_down = down;
        }
    }

    #[test]
    fn favorable_scaling_is_unbounded() {
        let decision = ScalingPolicy::default().scale(dec!(1), Side::Buy, dec!(-60)).unwrap();
        assert_eq!(decision.steps, 12);
        assert_eq!(decision.scaled_amount, dec!(13));
    }

    #[test]
    fn runaway_scaling_is_an_error() {
        let policy = ScalingPolicy {
            step_size: dec!(0.0000000001),
            ..ScalingPolicy::default()
        };
        let err = policy.scale(Decimal::MAX, Side::Buy, dec!(-50)).unwrap_err();
        assert!(matches!(err, DcaError::Overflow(_)), "{err}");
    }
}
