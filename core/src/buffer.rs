// Per-category aggregation buffer.
//
// Collects circle events during a catch window, then releases them as one
// consolidated event (listening mode), one event per distinct title group
// (map mode), or several staggered chunks. The timer that triggers a release
// is owned by the router; the buffer itself only holds state and does the
// consolidation math.
use std::collections::HashMap;

use rand::seq::SliceRandom;

use crate::model::{DelayedCircleEvent, Visualisation};

#[derive(Debug, Clone)]
struct TitleGroup {
    first: DelayedCircleEvent,
    count: usize,
}

#[derive(Debug)]
pub struct CategoryBuffer {
    circles: Vec<DelayedCircleEvent>,
    title_order: Vec<String>,
    title_groups: HashMap<String, TitleGroup>,
    pub catch_window_ms: u64,
    pub split_window_ms: u64,
}

impl CategoryBuffer {
    pub fn new(catch_window_ms: u64, split_window_ms: u64) -> Self {
        Self {
            circles: Vec::new(),
            title_order: Vec::new(),
            title_groups: HashMap::new(),
            catch_window_ms,
            split_window_ms,
        }
    }

    pub fn add(&mut self, circle: DelayedCircleEvent) {
        match self.title_groups.get_mut(&circle.title) {
            Some(group) => group.count += 1,
            None => {
                self.title_order.push(circle.title.clone());
                self.title_groups.insert(
                    circle.title.clone(),
                    TitleGroup {
                        first: circle.clone(),
                        count: 1,
                    },
                );
            }
        }
        self.circles.push(circle);
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    /// Drain the buffer into released events for the given visualisation.
    ///
    /// Listening mode emits one event for the whole buffer: a random distinct
    /// title as headline, "and N others" when more titles exist, a bracketed
    /// total count suffix, and the mean radius. Map mode emits one event per
    /// distinct title group with a fixed marker radius and the group's own
    /// count in the suffix.
    pub fn consolidate(
        &mut self,
        visualisation: Visualisation,
        geo_marker_radius: f64,
    ) -> Vec<DelayedCircleEvent> {
        if self.circles.is_empty() {
            return Vec::new();
        }

        let released = match visualisation {
            Visualisation::ListenTo => {
                let first = &self.circles[0];
                let mut title = self
                    .title_order
                    .choose(&mut rand::thread_rng())
                    .cloned()
                    .unwrap_or_default();
                let distinct_titles = self.title_order.len();
                if distinct_titles > 1 {
                    title.push_str(&format!(" and {} others", distinct_titles - 1));
                    if let Some(unit) = first.event.count_unit() {
                        title.push_str(&format!(" [{} {}]", self.circles.len(), unit));
                    }
                }
                let radius = self.circles.iter().map(|c| c.radius).sum::<f64>()
                    / self.circles.len() as f64;
                vec![DelayedCircleEvent {
                    event: first.event,
                    title,
                    radius,
                    delay: 0,
                    location: None,
                }]
            }
            Visualisation::Geo => self
                .title_order
                .iter()
                .map(|key| {
                    let group = &self.title_groups[key];
                    let mut title = group.first.title.clone();
                    if let Some(unit) = group.first.event.count_unit() {
                        title.push_str(&format!(" [{} {}]", group.count, unit));
                    }
                    DelayedCircleEvent {
                        event: group.first.event,
                        title,
                        radius: geo_marker_radius,
                        delay: 0,
                        location: group.first.location,
                    }
                })
                .collect(),
        };

        self.reset();
        released
    }

    /// Drain the buffer into `split + 1` staggered chunks of roughly equal
    /// size, each paired with its release delay in milliseconds.
    ///
    /// Chunk `i` is delayed `(i + 1) * split_window / number_of_chunks`, so
    /// even the first chunk waits; an instantaneous first reaction reads as
    /// jitter rather than smoothing.
    pub fn split_chunks(&mut self, split: u32) -> Vec<(u64, Vec<DelayedCircleEvent>)> {
        if self.circles.is_empty() {
            return Vec::new();
        }

        let len = self.circles.len();
        let mut chunk_size = len as f64 / (split as f64 + 1.0);
        if chunk_size < 1.0 {
            chunk_size = 1.0;
        }
        let chunk_size = chunk_size.ceil() as usize;

        let chunks: Vec<Vec<DelayedCircleEvent>> = self
            .circles
            .chunks(chunk_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        let delay_base = self.split_window_ms as f64 / chunks.len() as f64;

        let staggered = chunks
            .into_iter()
            .enumerate()
            .map(|(index, events)| (((index as f64 + 1.0) * delay_base).round() as u64, events))
            .collect();

        self.reset();
        staggered
    }

    // Both the list and the title index are cleared in one step; no event may
    // be attributed to both the old and the new epoch.
    fn reset(&mut self) {
        self.circles.clear();
        self.title_order.clear();
        self.title_groups.clear();
    }
}
