//! Next-day and multi-day price forecasting.
//!
//! Two models produce the daily summary numbers: a least-squares trend with a
//! day-of-week seasonal adjustment, and Holt's linear exponential smoothing.
//! The smoothing model requires more than [`LOOK_BACK`] observations; coins
//! with shorter history are skipped upstream.

use crate::domain::model::HighForecast;
use chrono::{Datelike, Duration, NaiveDate};

/// Minimum history the smoothing model looks back over.
pub const LOOK_BACK: usize = 60;

const HOLT_ALPHA: f64 = 0.5;
const HOLT_BETA: f64 = 0.3;

struct TrendModel {
    intercept: f64,
    slope: f64,
    /// Mean residual per weekday (Monday = 0).
    seasonal: [f64; 7],
}

impl TrendModel {
    fn fit(dates: &[NaiveDate], values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 || dates.len() != n {
            return None;
        }

        let nf = n as f64;
        let t_mean = (nf - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / nf;
        let mut cov = 0.0;
        let mut var = 0.0;
        for (i, y) in values.iter().enumerate() {
            let dt = i as f64 - t_mean;
            cov += dt * (y - y_mean);
            var += dt * dt;
        }
        if var == 0.0 {
            return None;
        }
        let slope = cov / var;
        let intercept = y_mean - slope * t_mean;

        // Day-of-week adjustment only once there is at least two weeks of data.
        let mut seasonal = [0.0f64; 7];
        if n >= 14 {
            let mut sums = [0.0f64; 7];
            let mut counts = [0usize; 7];
            for (i, y) in values.iter().enumerate() {
                let w = dates[i].weekday().num_days_from_monday() as usize;
                sums[w] += y - (intercept + slope * i as f64);
                counts[w] += 1;
            }
            for w in 0..7 {
                if counts[w] > 0 {
                    seasonal[w] = sums[w] / counts[w] as f64;
                }
            }
        }

        let model = TrendModel {
            intercept,
            slope,
            seasonal,
        };
        if model.intercept.is_finite() && model.slope.is_finite() {
            Some(model)
        } else {
            None
        }
    }

    fn predict(&self, t: usize, date: NaiveDate) -> f64 {
        let w = date.weekday().num_days_from_monday() as usize;
        self.intercept + self.slope * t as f64 + self.seasonal[w]
    }
}

/// Next-day forecast from the trend model. `None` when the series is too
/// short or degenerate.
pub fn trend_forecast(dates: &[NaiveDate], values: &[f64]) -> Option<f64> {
    let model = TrendModel::fit(dates, values)?;
    let next_date = *dates.last()? + Duration::days(1);
    let prediction = model.predict(values.len(), next_date);
    prediction.is_finite().then_some(prediction)
}

/// Multi-day forecast of the high series, one point per future day.
pub fn high_forecast(dates: &[NaiveDate], highs: &[f64], periods: usize) -> Vec<HighForecast> {
    let Some(model) = TrendModel::fit(dates, highs) else {
        return Vec::new();
    };
    let Some(&last_date) = dates.last() else {
        return Vec::new();
    };
    (1..=periods)
        .map(|k| {
            let ds = last_date + Duration::days(k as i64);
            HighForecast {
                ds,
                yhat: model.predict(highs.len() - 1 + k, ds),
            }
        })
        .collect()
}

/// Next-day forecast via Holt's linear exponential smoothing. Requires more
/// than `look_back` observations, mirroring the coin-skip rule upstream.
pub fn smoothing_forecast(values: &[f64], look_back: usize) -> Option<f64> {
    if values.len() <= look_back || values.len() < 2 {
        return None;
    }

    let mut level = values[0];
    let mut trend = values[1] - values[0];
    for &y in &values[1..] {
        let prev_level = level;
        level = HOLT_ALPHA * y + (1.0 - HOLT_ALPHA) * (level + trend);
        trend = HOLT_BETA * (level - prev_level) + (1.0 - HOLT_BETA) * trend;
    }

    let prediction = level + trend;
    prediction.is_finite().then_some(prediction)
}
