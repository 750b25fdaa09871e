use crate::config::{CostAssumptions, DutyBracket};
use crate::error::{ConfigurationError, FinanceError, InvalidInputError};
use crate::model::PropertyRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    pub transfer_duty: f64,
    pub deposit: f64,
    pub principal: f64,
    pub monthly_instalment: f64,
    pub total_purchase_cost: f64,
    pub total_monthly_cost: f64,
}

impl FinancialSummary {
    fn zero() -> Self {
        Self {
            transfer_duty: 0.0,
            deposit: 0.0,
            principal: 0.0,
            monthly_instalment: 0.0,
            total_purchase_cost: 0.0,
            total_monthly_cost: 0.0,
        }
    }
}

pub fn compute(
    record: &PropertyRecord,
    assumptions: &CostAssumptions,
) -> Result<FinancialSummary, FinanceError> {
    assumptions.validate()?;

    if record.price < 0 {
        return Err(InvalidInputError::new(format!(
            "price must not be negative, got {}",
            record.price
        ))
        .into());
    }
    if record.price == 0 {
        return Ok(FinancialSummary::zero());
    }

    let price = record.price as f64;
    let transfer_duty = transfer_duty(record.price, &assumptions.transfer_duty_brackets)?;
    let deposit = price * assumptions.deposit_fraction;
    let principal = price - deposit;
    let monthly_instalment = monthly_instalment(
        principal,
        assumptions.annual_interest_rate,
        assumptions.term_months,
    );

    let fixed_fees: f64 = assumptions.fees.values().sum();
    let total_purchase_cost = price + transfer_duty + fixed_fees;
    let total_monthly_cost = monthly_instalment
        + record.levies.unwrap_or(0) as f64
        + record.rates.unwrap_or(0) as f64;

    Ok(FinancialSummary {
        transfer_duty,
        deposit,
        principal,
        monthly_instalment,
        total_purchase_cost,
        total_monthly_cost,
    })
}

pub fn transfer_duty(price: i64, brackets: &[DutyBracket]) -> Result<f64, ConfigurationError> {
    let matching = brackets.iter().find(|bracket| {
        price >= bracket.lower && bracket.upper.is_none_or(|upper| price <= upper)
    });
    let Some(bracket) = matching else {
        return Err(ConfigurationError::new(format!(
            "no transfer duty bracket covers price {price}"
        )));
    };

    Ok(bracket.base + bracket.rate * (price - bracket.lower) as f64)
}

pub fn monthly_instalment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    if principal <= 0.0 {
        return 0.0;
    }

    let periods = term_months as f64;
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return principal / periods;
    }

    let growth = (1.0 + monthly_rate).powf(periods);
    principal * (monthly_rate * growth) / (growth - 1.0)
}
