use crate::models::{Media, MediaKind};

/// Completion of `media` read as `kind`, in percent, unrounded.
///
/// Movies are all-or-nothing and count as done once tracked. Shows use
/// episodes, novels use pages. A zero or missing denominator, or an
/// unrecognised kind, is 0.
pub fn progress(kind: MediaKind, media: &Media) -> f64 {
    let ratio = |done: Option<u32>, total: Option<u32>| match total {
        Some(total) if total > 0 => f64::from(done.unwrap_or(0)) / f64::from(total) * 100.0,
        _ => 0.0,
    };

    match kind {
        MediaKind::Movie => 100.0,
        MediaKind::Show => ratio(media.episodes_watched, media.total_episodes),
        MediaKind::Novel => ratio(media.pages_read, media.total_pages),
        MediaKind::Unknown => 0.0,
    }
}

/// Display value: nearest whole percent, held to 0..=100 even when the
/// counters overshoot.
pub fn progress_percent(kind: MediaKind, media: &Media) -> u32 {
    progress(kind, media).round().clamp(0.0, 100.0) as u32
}

impl Media {
    pub fn progress(&self) -> f64 {
        progress(self.kind, self)
    }

    pub fn progress_percent(&self) -> u32 {
        progress_percent(self.kind, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_is_always_complete() {
        assert_eq!(progress_percent(MediaKind::Movie, &Media::new(MediaKind::Movie, "m")), 100);
        // The declared kind wins over whatever counters the record carries
        let odd = Media::new(MediaKind::Show, "s").with_episodes(0, 10);
        assert_eq!(progress_percent(MediaKind::Movie, &odd), 100);
    }

    #[test]
    fn show_uses_episodes() {
        let show = Media::new(MediaKind::Show, "s").with_episodes(3, 10);
        assert_eq!(progress(MediaKind::Show, &show), 30.0);
        assert_eq!(show.progress_percent(), 30);
    }

    #[test]
    fn zero_total_does_not_divide() {
        let show = Media::new(MediaKind::Show, "s").with_episodes(3, 0);
        assert_eq!(progress(MediaKind::Show, &show), 0.0);

        let missing = Media::new(MediaKind::Novel, "n");
        assert_eq!(progress(MediaKind::Novel, &missing), 0.0);
    }

    #[test]
    fn novel_uses_pages() {
        let novel = Media::new(MediaKind::Novel, "n").with_pages(50, 200);
        assert_eq!(progress_percent(MediaKind::Novel, &novel), 25);
    }

    #[test]
    fn unknown_kind_is_zero() {
        let media = Media::new(MediaKind::Unknown, "?").with_pages(5, 10);
        assert_eq!(progress(MediaKind::Unknown, &media), 0.0);
    }

    #[test]
    fn display_value_rounds_and_clamps() {
        let third = Media::new(MediaKind::Show, "s").with_episodes(1, 3);
        assert_eq!(third.progress_percent(), 33);
        let two_thirds = Media::new(MediaKind::Show, "s").with_episodes(2, 3);
        assert_eq!(two_thirds.progress_percent(), 67);
        let over = Media::new(MediaKind::Novel, "n").with_pages(300, 200);
        assert_eq!(over.progress_percent(), 100);
    }
}
