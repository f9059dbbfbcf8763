use serde::{Deserialize, Serialize};

use super::progress::progress;
use crate::models::{Media, MediaKind};

/// Counts per kind plus mean completion of shows and of novels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total: usize,
    pub movie: usize,
    pub show: usize,
    pub novel: usize,
    pub show_progress: f64,
    pub novel_progress: f64,
}

impl AggregateStats {
    pub fn show_progress_percent(&self) -> u32 {
        self.show_progress.round().clamp(0.0, 100.0) as u32
    }

    pub fn novel_progress_percent(&self) -> u32 {
        self.novel_progress.round().clamp(0.0, 100.0) as u32
    }
}

/// `total` counts every record, including ones of unrecognised kind.
pub fn aggregate_stats(items: &[Media]) -> AggregateStats {
    let mut stats = AggregateStats {
        total: items.len(),
        ..AggregateStats::default()
    };
    let mut show_sum = 0.0;
    let mut novel_sum = 0.0;

    for media in items {
        match media.kind {
            MediaKind::Movie => stats.movie += 1,
            MediaKind::Show => {
                stats.show += 1;
                show_sum += progress(MediaKind::Show, media).min(100.0);
            }
            MediaKind::Novel => {
                stats.novel += 1;
                novel_sum += progress(MediaKind::Novel, media).min(100.0);
            }
            MediaKind::Unknown => {}
        }
    }

    if stats.show > 0 {
        stats.show_progress = show_sum / stats.show as f64;
    }
    if stats.novel > 0 {
        stats.novel_progress = novel_sum / stats.novel as f64;
    }

    stats
}
