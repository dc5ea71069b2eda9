//! Transport state: the player-control side of the playback bridge.
//!
//! Pure bookkeeping, no widget/DOM concerns. The host renders these values
//! however it likes (the shipped binary puts them in the window title) and
//! feeds the named media signals in: metadata-ready, time-advanced,
//! seek-completed, volume-changed, buffer-progress.

/// Playback/volume state exposed to the control surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    duration: f64,
    position: f64,
    /// 0-100, for a preload indicator.
    preload_percent: f64,
    volume: f32,
    muted: bool,
    last_volume: f32,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            duration: 0.0,
            position: 0.0,
            preload_percent: 0.0,
            volume: 1.0,
            muted: false,
            last_volume: 1.0,
        }
    }
}

impl Transport {
    // ── media signals ─────────────────────────────────────────────────────

    /// Metadata-ready: duration and initial volume become known.
    pub fn on_metadata(&mut self, duration: f64, volume: f32) {
        self.duration = duration.max(0.0);
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Time-advanced signal from the media pipeline.
    pub fn on_time_update(&mut self, position: f64) {
        self.position = position.clamp(0.0, self.duration.max(position));
    }

    /// Seek-completed signal; position lands wherever the decoder settled.
    pub fn on_seeked(&mut self, position: f64) {
        self.on_time_update(position);
    }

    pub fn on_volume_changed(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if self.volume > 0.0 {
            self.muted = false;
        }
    }

    /// Buffer-progress signal. Zero-duration media never reports progress;
    /// the percentage is undefined without a positive duration.
    pub fn on_buffer_progress(&mut self, buffered_end: f64) {
        if self.duration > 0.0 {
            self.preload_percent = (100.0 * buffered_end / self.duration).clamp(0.0, 100.0);
        }
    }

    // ── control surface ───────────────────────────────────────────────────

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Position clamped to the duration for display purposes.
    pub fn position(&self) -> f64 {
        if self.duration > 0.0 {
            self.position.min(self.duration)
        } else {
            self.position
        }
    }

    /// 0-100 playback progress for the time slider.
    pub fn progress_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (100.0 * self.position / self.duration).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    pub fn preload_percent(&self) -> f64 {
        self.preload_percent
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Mute toggle, restoring the pre-mute volume on unmute.
    /// Returns the volume the media pipeline should be set to.
    pub fn toggle_mute(&mut self) -> f32 {
        if self.muted {
            self.muted = false;
            self.volume = self.last_volume;
        } else {
            self.last_volume = self.volume;
            self.muted = true;
            self.volume = 0.0;
        }
        self.volume
    }

    /// Clamp a requested volume to the valid range.
    pub fn clamp_volume(volume: f32) -> f32 {
        volume.clamp(0.0, 1.0)
    }

    /// Clamp a requested seek target to the media's duration.
    pub fn clamp_seek(&self, seconds: f64) -> f64 {
        if self.duration > 0.0 {
            seconds.clamp(0.0, self.duration)
        } else {
            seconds.max(0.0)
        }
    }

    /// `hh:mm:ss / hh:mm:ss` time label for the control surface.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_hhmmss(self.position()),
            format_hhmmss(self.duration)
        )
    }
}

/// Whole seconds rendered as `hh:mm:ss`.
pub fn format_hhmmss(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── progress / preload ────────────────────────────────────────────────

    #[test]
    fn progress_is_half_at_midpoint() {
        let mut t = Transport::default();
        t.on_metadata(1.0, 1.0);
        t.on_time_update(0.5);
        assert_eq!(t.progress_percent(), 50.0);
    }

    #[test]
    fn zero_duration_reports_no_progress() {
        let mut t = Transport::default();
        t.on_metadata(0.0, 1.0);
        t.on_time_update(3.0);
        t.on_buffer_progress(3.0);
        assert_eq!(t.progress_percent(), 0.0);
        assert_eq!(t.preload_percent(), 0.0);
    }

    #[test]
    fn preload_tracks_buffered_fraction() {
        let mut t = Transport::default();
        t.on_metadata(10.0, 1.0);
        t.on_buffer_progress(2.5);
        assert_eq!(t.preload_percent(), 25.0);
        t.on_buffer_progress(40.0);
        assert_eq!(t.preload_percent(), 100.0);
    }

    // ── volume / mute ─────────────────────────────────────────────────────

    #[test]
    fn mute_restores_previous_volume() {
        let mut t = Transport::default();
        t.on_volume_changed(0.6);
        assert_eq!(t.toggle_mute(), 0.0);
        assert!(t.muted());
        assert_eq!(t.toggle_mute(), 0.6);
        assert!(!t.muted());
    }

    #[test]
    fn volume_change_unmutes() {
        let mut t = Transport::default();
        t.toggle_mute();
        t.on_volume_changed(0.3);
        assert!(!t.muted());
        assert_eq!(t.volume(), 0.3);
    }

    #[test]
    fn volume_is_clamped() {
        let mut t = Transport::default();
        t.on_volume_changed(1.7);
        assert_eq!(t.volume(), 1.0);
        assert_eq!(Transport::clamp_volume(-0.4), 0.0);
    }

    // ── seeks and labels ──────────────────────────────────────────────────

    #[test]
    fn seek_is_clamped_to_duration() {
        let mut t = Transport::default();
        t.on_metadata(60.0, 1.0);
        assert_eq!(t.clamp_seek(90.0), 60.0);
        assert_eq!(t.clamp_seek(-5.0), 0.0);
    }

    #[test]
    fn displayed_position_never_exceeds_duration() {
        let mut t = Transport::default();
        t.on_metadata(5.0, 1.0);
        t.on_time_update(9.0);
        assert_eq!(t.position(), 5.0);
    }

    #[test]
    fn time_label_formats_hhmmss() {
        assert_eq!(format_hhmmss(0.0), "00:00:00");
        assert_eq!(format_hhmmss(61.9), "00:01:01");
        assert_eq!(format_hhmmss(3661.0), "01:01:01");
        let mut t = Transport::default();
        t.on_metadata(90.0, 1.0);
        t.on_time_update(45.0);
        assert_eq!(t.time_label(), "00:00:45 / 00:01:30");
    }
}
