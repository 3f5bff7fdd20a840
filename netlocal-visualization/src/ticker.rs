//! Tick location and formatting

/// Step multipliers tried for each decade
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Tick positions on "nice" numbers within `[vmin, vmax]`, at most `max_bins` intervals
pub fn nice_ticks(vmin: f64, vmax: f64, max_bins: usize) -> Vec<f64> {
    if !vmin.is_finite() || !vmax.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if vmin <= vmax { (vmin, vmax) } else { (vmax, vmin) };
    let span = hi - lo;
    if span == 0.0 {
        return vec![lo];
    }

    let max_bins = max_bins.max(1);
    let step = nice_step(span, max_bins);
    // Spans too small (subnormal) or too large to divide into steps
    if !(step > 0.0 && step.is_finite()) {
        return vec![lo, hi];
    }

    // Small tolerance so bounds that land on a multiple are kept
    let eps = step * 1e-9;
    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;

    let ticks: Vec<f64> = (first..=last)
        .take(max_bins + 2)
        .map(|k| k as f64 * step)
        .filter(|v| *v >= lo - eps && *v <= hi + eps)
        // Avoid printing signed zero
        .map(|v| if v.abs() < eps { 0.0 } else { v })
        .collect();
    if ticks.is_empty() {
        vec![lo, hi]
    } else {
        ticks
    }
}

/// Smallest nice step that splits `span` into at most `max_bins` intervals
pub fn nice_step(span: f64, max_bins: usize) -> f64 {
    let raw = span / max_bins as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    NICE_STEPS
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}

/// Format tick values with a shared number of decimals
///
/// Negative values use the unicode minus sign.
pub fn format_ticks(ticks: &[f64]) -> Vec<String> {
    let decimals = ticks
        .iter()
        .map(|v| decimals_needed(*v))
        .max()
        .unwrap_or(0);
    ticks
        .iter()
        .map(|v| {
            let s = format!("{:.*}", decimals, v.abs());
            if *v < 0.0 {
                format!("\u{2212}{}", s)
            } else {
                s
            }
        })
        .collect()
}

fn decimals_needed(v: f64) -> usize {
    for decimals in 0..=6 {
        let scale = 10f64.powi(decimals as i32);
        let scaled = v * scale;
        if (scaled - scaled.round()).abs() < 1e-6 * scale.max(1.0) {
            return decimals;
        }
    }
    6
}
