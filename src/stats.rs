// 4.0: pure statistics over window contents. population formulas throughout so
// independent runs over the same data reproduce exactly. windows are bounded to
// a few hundred observations, so two-pass accumulation is plenty.

use rust_decimal::{Decimal, MathematicalOps};

// arithmetic mean. zero for an empty population; callers gate on minimum
// population size before trusting it.
pub fn mean<I>(values: I) -> Decimal
where
    I: ExactSizeIterator<Item = Decimal>,
{
    let n = values.len();
    if n == 0 {
        return Decimal::ZERO;
    }
    values.sum::<Decimal>() / Decimal::from(n as u64)
}

// population standard deviation: sqrt(mean((x - mean)^2)). zero when the
// population holds one observation or none.
pub fn pstdev<I>(values: I) -> Decimal
where
    I: ExactSizeIterator<Item = Decimal> + Clone,
{
    let n = values.len();
    if n <= 1 {
        return Decimal::ZERO;
    }
    let mu = mean(values.clone());
    let variance =
        values.map(|x| (x - mu) * (x - mu)).sum::<Decimal>() / Decimal::from(n as u64);
    variance.sqrt().unwrap_or(Decimal::ZERO)
}
