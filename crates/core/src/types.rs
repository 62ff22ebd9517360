/// Frames are identified by their position in the sequence.
pub type FrameIndex = usize;

/// Media time in seconds from the start of the source video.
pub type Seconds = f64;

/// Round to `places` decimals, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Round to 2 decimals, the precision used for durations and averages.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}
