//! Random value provider for synthetic data.
//!
//! Every draw the generators make goes through [`RandomValues`], so a seeded
//! instance with a fixed time anchor reproduces a whole population.

use chrono::{DateTime, Duration, Utc};
use rand::prelude::*;

use crate::error::{AppError, AppResult};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const EMAIL_DOMAINS: [&str; 5] = [
    "gmail.com",
    "outlook.com",
    "company.com",
    "business.my",
    "enterprise.com",
];

const PHONE_PREFIXES: [&str; 5] = ["+60123", "+60124", "+60125", "+60126", "+60127"];

pub struct RandomValues<R: Rng = StdRng> {
    rng: R,
    anchor: DateTime<Utc>,
}

impl RandomValues<StdRng> {
    /// Seeded when `seed` is given, otherwise drawn from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::from_rng(rng)
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl<R: Rng> RandomValues<R> {
    pub fn from_rng(rng: R) -> Self {
        Self {
            rng,
            anchor: Utc::now(),
        }
    }

    /// Fixes the instant that relative dates are measured from.
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    /// Uniform integer in `[min, max]`.
    pub fn uniform_int(&mut self, min: i64, max: i64) -> AppResult<i64> {
        if min > max {
            return Err(AppError::invalid(format!(
                "uniform_int: min {} exceeds max {}",
                min, max
            )));
        }
        Ok(self.rng.gen_range(min..=max))
    }

    /// Uniform float in `[min, max)`. A degenerate range yields `min`.
    pub fn uniform_float(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> AppResult<&'a T> {
        items
            .choose(&mut self.rng)
            .ok_or_else(|| AppError::invalid("choice from an empty list"))
    }

    /// Instant uniformly between `days_ago_start` and `days_ago_end` days before
    /// the anchor. Negative values lie in the future.
    pub fn date_in_range(
        &mut self,
        days_ago_start: i64,
        days_ago_end: i64,
    ) -> AppResult<DateTime<Utc>> {
        if days_ago_start <= days_ago_end {
            return Err(AppError::invalid(format!(
                "date_in_range: start {} days ago must precede end {} days ago",
                days_ago_start, days_ago_end
            )));
        }
        let out_of_range = || {
            AppError::invalid(format!(
                "date_in_range: {} to {} days ago is outside the calendar range",
                days_ago_start, days_ago_end
            ))
        };
        let start = Duration::try_days(days_ago_start)
            .and_then(|back| self.anchor.checked_sub_signed(back))
            .ok_or_else(out_of_range)?;
        let span_ms = (days_ago_start as f64 - days_ago_end as f64) * MILLIS_PER_DAY;
        let offset_ms = (self.unit() * span_ms) as i64;
        Duration::try_milliseconds(offset_ms)
            .and_then(|offset| start.checked_add_signed(offset))
            .ok_or_else(out_of_range)
    }

    /// Synthetic address `first.last@domain` for a random customer name.
    pub fn email(&mut self, customer_names: &[String]) -> AppResult<String> {
        let name = self.choice(customer_names)?;
        self.email_for(name)
    }

    /// Synthetic address `first.last@domain` for `name`.
    pub fn email_for(&mut self, name: &str) -> AppResult<String> {
        let local = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".")
            .to_lowercase();
        let domain = self.choice(&EMAIL_DOMAINS)?;
        Ok(format!("{}@{}", local, domain))
    }

    pub fn phone(&mut self) -> AppResult<String> {
        let prefix = self.choice(&PHONE_PREFIXES)?;
        let line = self.uniform_int(100_000, 999_999)?;
        Ok(format!("{}{}", prefix, line))
    }

    /// 12-digit company registration number.
    pub fn registration_number(&mut self) -> AppResult<String> {
        Ok(self
            .uniform_int(202_000_000_000, 202_199_999_999)?
            .to_string())
    }

    /// `C` followed by 11 digits.
    pub fn tax_id(&mut self) -> AppResult<String> {
        Ok(format!(
            "C{}",
            self.uniform_int(10_000_000_000, 99_999_999_999)?
        ))
    }
}

/// Converts fractional days into a duration with millisecond precision.
pub fn days(value: f64) -> Duration {
    Duration::milliseconds((value * MILLIS_PER_DAY) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn values() -> RandomValues {
        RandomValues::seeded(7).with_anchor(Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_uniform_int_inclusive_bounds() {
        let mut rv = values();
        for _ in 0..500 {
            let v = rv.uniform_int(3, 5).unwrap();
            assert!((3..=5).contains(&v));
        }
        assert_eq!(rv.uniform_int(4, 4).unwrap(), 4);
        assert!(rv.uniform_int(5, 4).is_err());
    }

    #[test]
    fn test_uniform_float_half_open() {
        let mut rv = values();
        for _ in 0..500 {
            let v = rv.uniform_float(0.3, 0.9);
            assert!((0.3..0.9).contains(&v));
        }
        assert_eq!(rv.uniform_float(2.0, 2.0), 2.0);
    }

    #[test]
    fn test_choice_on_empty_list_fails() {
        let mut rv = values();
        let empty: Vec<String> = Vec::new();
        assert!(matches!(rv.choice(&empty), Err(AppError::InvalidArgument(_))));
        assert_eq!(*rv.choice(&[9]).unwrap(), 9);
    }

    #[test]
    fn test_date_in_range_stays_in_window() {
        let mut rv = values();
        let anchor = rv.anchor();
        for _ in 0..500 {
            let date = rv.date_in_range(365, 1).unwrap();
            assert!(date >= anchor - Duration::days(365));
            assert!(date <= anchor - Duration::days(1));
        }
        assert!(rv.date_in_range(1, 365).is_err());
        assert!(rv.date_in_range(5, 5).is_err());
    }

    #[test]
    fn test_date_in_range_rejects_offsets_beyond_calendar() {
        let mut rv = values();
        assert!(matches!(
            rv.date_in_range(200_000_000, 0),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            rv.date_in_range(i64::MAX, i64::MIN + 1),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_date_in_range_accepts_future_end() {
        let mut rv = values();
        let anchor = rv.anchor();
        let date = rv.date_in_range(30, -30).unwrap();
        assert!(date >= anchor - Duration::days(30));
        assert!(date <= anchor + Duration::days(30));
    }

    #[test]
    fn test_seeded_values_repeat() {
        let mut a = values();
        let mut b = values();
        let xs: Vec<i64> = (0..20).map(|_| a.uniform_int(0, 1000).unwrap()).collect();
        let ys: Vec<i64> = (0..20).map(|_| b.uniform_int(0, 1000).unwrap()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_identity_formats() {
        let mut rv = values();
        let names = vec!["Li Wei Chen".to_string()];
        let email = rv.email(&names).unwrap();
        assert!(email.starts_with("li.wei.chen@"));

        let phone = rv.phone().unwrap();
        assert!(phone.starts_with("+6012"));
        assert_eq!(phone.len(), 12);

        let reg = rv.registration_number().unwrap();
        assert_eq!(reg.len(), 12);
        assert!(reg.starts_with("2020") || reg.starts_with("2021"));

        let tax = rv.tax_id().unwrap();
        assert_eq!(tax.len(), 12);
        assert!(tax.starts_with('C'));
        assert!(tax[1..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_fractional_days() {
        assert_eq!(days(1.5), Duration::hours(36));
        assert_eq!(days(0.0), Duration::zero());
    }
}
