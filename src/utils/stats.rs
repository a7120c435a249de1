use log::*;
use statrs::function::factorial::ln_binomial;
use statrs::statistics::{
    Data,
    Median,
    Statistics,
};

/// Terms smaller than this share of the accumulated tail are dropped.
const TAIL_EPS: f64 = 1e-17;
/// Relative tolerance used to decide which tables are "as extreme" as the
/// observed one in the two-sided test.
const TWO_SIDED_RTOL: f64 = 1e-7;

/// Alternative hypothesis of [`fisher_exact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    #[default]
    TwoSided,
    /// Odds ratio of the table is greater than one, i.e. the first row has
    /// a larger share of the first column than the second row.
    Greater,
    Less,
}

/// Performs Fisher's exact test on a 2×2 contingency table.
///
/// `table` is `[[a, b], [c, d]]`. Returns the sample odds ratio `ad / bc`
/// and the p-value. Tables with an empty row or column return `(NaN, 1.0)`.
pub fn fisher_exact(
    table: [[u64; 2]; 2],
    alternative: Alternative,
) -> (f64, f64) {
    let [[a, b], [c, d]] = table;
    trace!(
        "Performing Fisher's exact test: [[{}, {}], [{}, {}]] ({:?})",
        a,
        b,
        c,
        d,
        alternative
    );

    if a + b == 0 || c + d == 0 || a + c == 0 || b + d == 0 {
        return (f64::NAN, 1.0);
    }

    let odds_ratio = if b > 0 && c > 0 {
        (a as f64 * d as f64) / (b as f64 * c as f64)
    }
    else {
        f64::INFINITY
    };

    let dist = Hypergeometric {
        population: a + b + c + d,
        successes:  a + b,
        draws:      a + c,
    };

    let pvalue = match alternative {
        Alternative::Greater => dist.upper_tail(a),
        Alternative::Less => dist.lower_tail(a),
        Alternative::TwoSided => dist.two_sided(a),
    };

    (odds_ratio, pvalue.clamp(0.0, 1.0))
}

/// Distribution of the top-left cell of a 2×2 table with fixed margins.
struct Hypergeometric {
    population: u64,
    successes:  u64,
    draws:      u64,
}

impl Hypergeometric {
    fn support(&self) -> (u64, u64) {
        let failures = self.population - self.successes;
        (
            self.draws.saturating_sub(failures),
            self.successes.min(self.draws),
        )
    }

    fn mode(&self) -> u64 {
        let raw = (self.draws as u128 + 1) * (self.successes as u128 + 1)
            / (self.population as u128 + 2);
        let (lo, hi) = self.support();
        (raw as u64).clamp(lo, hi)
    }

    fn pmf(
        &self,
        x: u64,
    ) -> f64 {
        let ln_p = ln_binomial(self.successes, x)
            + ln_binomial(self.population - self.successes, self.draws - x)
            - ln_binomial(self.population, self.draws);
        ln_p.exp()
    }

    /// P(X = x + 1) given P(X = x).
    fn next_up(
        &self,
        x: u64,
        p: f64,
    ) -> f64 {
        let x = x as f64;
        let k = self.successes as f64;
        let n = self.draws as f64;
        let rest = (self.population - self.successes) as f64;
        p * (k - x) * (n - x) / ((x + 1.0) * (rest - n + x + 1.0))
    }

    /// P(X = x - 1) given P(X = x).
    fn next_down(
        &self,
        x: u64,
        p: f64,
    ) -> f64 {
        let x = x as f64;
        let k = self.successes as f64;
        let n = self.draws as f64;
        let rest = (self.population - self.successes) as f64;
        p * x * (rest - n + x) / ((k - x + 1.0) * (n - x + 1.0))
    }

    /// Sums P(X = y) for y >= x, with x above the mode.
    fn sum_up_from(
        &self,
        x: u64,
    ) -> f64 {
        let (_, hi) = self.support();
        let mut p = self.pmf(x);
        let mut total = 0.0;
        let mut cur = x;
        loop {
            total += p;
            if cur >= hi {
                break;
            }
            p = self.next_up(cur, p);
            cur += 1;
            if p == 0.0 || p < total * TAIL_EPS {
                break;
            }
        }
        total
    }

    /// Sums P(X = y) for y <= x, with x below the mode.
    fn sum_down_from(
        &self,
        x: u64,
    ) -> f64 {
        let (lo, _) = self.support();
        let mut p = self.pmf(x);
        let mut total = 0.0;
        let mut cur = x;
        loop {
            total += p;
            if cur <= lo {
                break;
            }
            p = self.next_down(cur, p);
            cur -= 1;
            if p == 0.0 || p < total * TAIL_EPS {
                break;
            }
        }
        total
    }

    /// P(X >= x)
    fn upper_tail(
        &self,
        x: u64,
    ) -> f64 {
        let (lo, hi) = self.support();
        if x <= lo {
            return 1.0;
        }
        if x > hi {
            return 0.0;
        }
        if x > self.mode() {
            self.sum_up_from(x)
        }
        else {
            1.0 - self.sum_down_from(x - 1)
        }
    }

    /// P(X <= x)
    fn lower_tail(
        &self,
        x: u64,
    ) -> f64 {
        let (lo, hi) = self.support();
        if x >= hi {
            return 1.0;
        }
        if x < lo {
            return 0.0;
        }
        if x < self.mode() {
            self.sum_down_from(x)
        }
        else {
            1.0 - self.sum_up_from(x + 1)
        }
    }

    /// Sum of P(X = y) over all y no more probable than the observed x.
    fn two_sided(
        &self,
        x: u64,
    ) -> f64 {
        let (lo, hi) = self.support();
        let threshold = self.pmf(x) * (1.0 + TWO_SIDED_RTOL);
        let mode = self.mode();
        let p_mode = self.pmf(mode);

        let mut total = if p_mode <= threshold { p_mode } else { 0.0 };

        let mut p = p_mode;
        let mut cur = mode;
        while cur > lo {
            p = self.next_down(cur, p);
            cur -= 1;
            if p <= threshold {
                total += p;
                if p == 0.0 || p < total * TAIL_EPS {
                    break;
                }
            }
        }

        let mut p = p_mode;
        let mut cur = mode;
        while cur < hi {
            p = self.next_up(cur, p);
            cur += 1;
            if p <= threshold {
                total += p;
                if p == 0.0 || p < total * TAIL_EPS {
                    break;
                }
            }
        }
        total
    }
}

/// Median of the values. Returns NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        warn!("Cannot calculate median: empty array");
        return f64::NAN;
    }
    Data::new(values.to_vec()).median()
}

/// Arithmetic mean. Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 { values.iter().mean() }

/// Sample standard deviation (N - 1 in the denominator). Returns NaN for
/// fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 { values.iter().std_dev() }
