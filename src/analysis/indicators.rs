//! Technical indicators over daily candle series.
//!
//! Every function returns a vector the same length as its input, NaN-padded
//! until the indicator's warm-up window is filled. [`compute_frame`] assembles
//! the full indicator set and drops rows where any column is still NaN.

use crate::domain::model::{Candle, IndicatorRow};

const NAN: f64 = f64::NAN;

pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = sum / window as f64;
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = sum / window as f64;
    }
    out
}

/// Exponential moving average seeded with the SMA of the first window.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let alpha = 2.0 / (window as f64 + 1.0);
    let mut prev = values[..window].iter().sum::<f64>() / window as f64;
    out[window - 1] = prev;
    for i in window..values.len() {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}

/// Relative Strength Index with Wilder smoothing.
pub fn rsi(close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    let mut out = vec![NAN; n];
    if period == 0 || n <= period {
        return out;
    }

    let mut gain = 0.0;
    let mut loss = 0.0;
    for i in 1..=period {
        let delta = close[i] - close[i - 1];
        if delta >= 0.0 {
            gain += delta;
        } else {
            loss -= delta;
        }
    }
    let mut avg_gain = gain / period as f64;
    let mut avg_loss = loss / period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    for i in period + 1..n {
        let delta = close[i] - close[i - 1];
        let (g, l) = if delta >= 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + g) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + l) / period as f64;
        out[i] = rsi_value(avg_gain, avg_loss);
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// MACD line (EMA12 - EMA26) and its 9-period signal line.
pub fn macd(close: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = close.len();
    let fast = ema(close, 12);
    let slow = ema(close, 26);

    let mut line = vec![NAN; n];
    for i in 0..n {
        if fast[i].is_finite() && slow[i].is_finite() {
            line[i] = fast[i] - slow[i];
        }
    }

    let mut signal = vec![NAN; n];
    if let Some(first) = line.iter().position(|v| v.is_finite()) {
        let tail = ema(&line[first..], 9);
        for (i, v) in tail.into_iter().enumerate() {
            signal[first + i] = v;
        }
    }
    (line, signal)
}

/// Bollinger bands: SMA(window) ± k population standard deviations.
pub fn bollinger(close: &[f64], window: usize, k: f64) -> (Vec<f64>, Vec<f64>) {
    let n = close.len();
    let mid = sma(close, window);
    let mut high = vec![NAN; n];
    let mut low = vec![NAN; n];
    if window == 0 || n < window {
        return (high, low);
    }
    for i in window - 1..n {
        let slice = &close[i + 1 - window..=i];
        let mean = mid[i];
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window as f64;
        let sd = var.sqrt();
        high[i] = mean + k * sd;
        low[i] = mean - k * sd;
    }
    (high, low)
}

/// Stochastic oscillator %K(k_period) and %D (SMA of %K over d_period).
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_period: usize,
    d_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let n = close.len();
    let mut k = vec![NAN; n];
    if k_period == 0 || n < k_period {
        return (k.clone(), vec![NAN; n]);
    }
    for i in k_period - 1..n {
        let window = i + 1 - k_period..=i;
        let hh = high[window.clone()].iter().cloned().fold(f64::MIN, f64::max);
        let ll = low[window].iter().cloned().fold(f64::MAX, f64::min);
        k[i] = if hh > ll {
            100.0 * (close[i] - ll) / (hh - ll)
        } else {
            50.0
        };
    }

    let mut d = vec![NAN; n];
    if let Some(first) = k.iter().position(|v| v.is_finite()) {
        let tail = sma(&k[first..], d_period);
        for (i, v) in tail.into_iter().enumerate() {
            d[first + i] = v;
        }
    }
    (k, d)
}

/// On-Balance Volume. Volume subtracts only when the close drops.
pub fn obv(close: &[f64], volume: &[f64]) -> Vec<f64> {
    let n = close.len();
    let mut out = vec![NAN; n];
    if n == 0 {
        return out;
    }
    let mut running = volume[0];
    out[0] = running;
    for i in 1..n {
        if close[i] < close[i - 1] {
            running -= volume[i];
        } else {
            running += volume[i];
        }
        out[i] = running;
    }
    out
}

fn midpoint(high: &[f64], low: &[f64], window: usize) -> Vec<f64> {
    let n = high.len();
    let mut out = vec![NAN; n];
    if window == 0 || n < window {
        return out;
    }
    for i in window - 1..n {
        let range = i + 1 - window..=i;
        let hh = high[range.clone()].iter().cloned().fold(f64::MIN, f64::max);
        let ll = low[range].iter().cloned().fold(f64::MAX, f64::min);
        out[i] = (hh + ll) / 2.0;
    }
    out
}

/// Ichimoku senkou span A (midpoints of 9/26 averaged) and span B (52-period
/// midpoint), unshifted.
pub fn ichimoku(high: &[f64], low: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = high.len();
    let tenkan = midpoint(high, low, 9);
    let kijun = midpoint(high, low, 26);
    let mut span_a = vec![NAN; n];
    for i in 0..n {
        if tenkan[i].is_finite() && kijun[i].is_finite() {
            span_a[i] = (tenkan[i] + kijun[i]) / 2.0;
        }
    }
    let span_b = midpoint(high, low, 52);
    (span_a, span_b)
}

/// Computes the full indicator frame for a candle series and drops the
/// warm-up rows where any indicator is still NaN. The longest warm-up is the
/// 52-day Ichimoku span B window.
pub fn compute_frame(candles: &[Candle]) -> Vec<IndicatorRow> {
    let close: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let high: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let low: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let volume: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let sma20 = sma(&close, 20);
    let ema20 = ema(&close, 20);
    let rsi14 = rsi(&close, 14);
    let (macd_line, macd_signal) = macd(&close);
    let (bb_high, bb_low) = bollinger(&close, 20, 2.0);
    let (stoch_k, stoch_d) = stochastic(&high, &low, &close, 14, 3);
    let obv_series = obv(&close, &volume);
    let (ichimoku_a, ichimoku_b) = ichimoku(&high, &low);

    let mut rows = Vec::with_capacity(candles.len());
    for (i, candle) in candles.iter().enumerate() {
        let row = IndicatorRow {
            date: candle.date,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            sma: sma20[i],
            ema: ema20[i],
            rsi: rsi14[i],
            macd: macd_line[i],
            macd_signal: macd_signal[i],
            bb_high: bb_high[i],
            bb_low: bb_low[i],
            stoch_k: stoch_k[i],
            stoch_d: stoch_d[i],
            obv: obv_series[i],
            ichimoku_a: ichimoku_a[i],
            ichimoku_b: ichimoku_b[i],
        };
        let complete = [
            row.sma,
            row.ema,
            row.rsi,
            row.macd,
            row.macd_signal,
            row.bb_high,
            row.bb_low,
            row.stoch_k,
            row.stoch_d,
            row.obv,
            row.ichimoku_a,
            row.ichimoku_b,
        ]
        .iter()
        .all(|v| v.is_finite());
        if complete {
            rows.push(row);
        }
    }
    rows
}
