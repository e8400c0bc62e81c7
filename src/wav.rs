//! WAV header probing for progress output.
//!
//! The engine is the source of truth for audio decoding; this probe only
//! feeds the verbose per-file report, so failures are swallowed.

use hound::WavReader;
use std::path::Path;

/// Basic properties read from a WAV header.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_secs: f64,
}

/// Probe a WAV file's header.
///
/// Returns `None` when the file cannot be opened or is not a readable WAV.
pub fn probe(path: &Path) -> Option<WavInfo> {
    let reader = WavReader::open(path).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    let frames = reader.duration();
    Some(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        duration_secs: f64::from(frames) / f64::from(spec.sample_rate),
    })
}
