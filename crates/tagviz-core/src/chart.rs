//! Ranking of an artist's most used tags and the chart model derived from it.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::Catalog;

/// Tag counts offered by the form. No other value is accepted.
pub const TAG_COUNT_CHOICES: [usize; 3] = [10, 15, 20];

const PLOT_BASE_WIDTH: u32 = 800;
const PLOT_WIDTH_PER_TAG: u32 = 5;
const PLOT_HEIGHT: u32 = 500;
const RANGE_PADDING: usize = 2;

/// Match the submitted value against [`TAG_COUNT_CHOICES`].
///
/// The value must be exactly one of the choices as rendered by the form;
/// a missing field or any other text is `None`.
pub fn tag_count_choice(raw: Option<&str>) -> Option<usize> {
    let raw = raw?;
    TAG_COUNT_CHOICES
        .into_iter()
        .find(|choice| raw == choice.to_string())
}

/// Count occurrences and return the `limit` most common ids, most common first.
///
/// Ties keep the order in which the ids first appear in `ids`.
pub fn rank_tags(ids: &[u32], limit: usize) -> Vec<(u32, usize)> {
    let mut first_seen: Vec<u32> = Vec::new();
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &id in ids {
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            first_seen.push(id);
        }
        *count += 1;
    }

    let mut ranked: Vec<(u32, usize)> = first_seen
        .into_iter()
        .map(|id| (id, counts[&id]))
        .collect();
    // stable: equal counts stay in first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Rearrange a sorted sequence so its first elements end up in the middle.
///
/// Elements alternate between the right end and the left end, starting right.
pub fn center<T>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut centered = VecDeque::new();
    for (i, item) in items.into_iter().enumerate() {
        if i % 2 == 0 {
            centered.push_back(item);
        } else {
            centered.push_front(item);
        }
    }
    centered.into()
}

/// One plotted tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagPoint {
    pub tag: String,
    pub count: usize,
}

/// Everything needed to draw the tag chart for one artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChart {
    pub artist: String,
    /// Points in x-axis order (centered).
    pub points: Vec<TagPoint>,
    /// Inclusive y-axis range `(start, end)`.
    pub y_range: (usize, usize),
    pub width: u32,
    pub height: u32,
    pub x_label: String,
    pub y_label: String,
}

impl TagChart {
    /// Build the chart from ranked `(tag value, count)` pairs, most common first.
    ///
    /// Returns `None` when `ranked` is empty.
    pub fn from_ranked(artist: &str, ranked: Vec<(String, usize)>, tag_count: usize) -> Option<Self> {
        let max = ranked.first()?.1;
        let min_index = tag_count.saturating_sub(1).min(ranked.len() - 1);
        let min = ranked[min_index].1;

        let points = center(
            ranked
                .into_iter()
                .map(|(tag, count)| TagPoint { tag, count }),
        );

        let per_tag = u32::try_from(tag_count)
            .unwrap_or(u32::MAX)
            .saturating_mul(PLOT_WIDTH_PER_TAG);

        Some(Self {
            artist: artist.to_owned(),
            points,
            y_range: (min.saturating_sub(RANGE_PADDING), max + RANGE_PADDING),
            width: PLOT_BASE_WIDTH.saturating_add(per_tag),
            height: PLOT_HEIGHT,
            x_label: "Tags".to_owned(),
            y_label: format!("Numbers of tags for {artist}"),
        })
    }
}

/// Result of asking for an artist's chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    Chart(TagChart),
    /// The artist exists but was never tagged.
    NoTags,
}

impl Catalog {
    /// Build the chart of the `tag_count` most used tags for `artist`.
    pub fn tag_chart(&self, artist: &str, tag_count: usize) -> crate::Result<ChartOutcome> {
        let artist_id = self
            .artist_id(artist)
            .ok_or_else(|| crate::Error::UnknownArtist(artist.to_owned()))?;

        let ranked = rank_tags(self.tags_for_artist(artist_id), tag_count);
        if ranked.is_empty() {
            tracing::warn!(artist, "no tags found for artist");
            return Ok(ChartOutcome::NoTags);
        }

        let valued = ranked
            .into_iter()
            .map(|(tag_id, count)| {
                self.tag_value(tag_id)
                    .map(|value| (value.to_owned(), count))
                    .ok_or_else(|| crate::Error::UnknownTag {
                        artist: artist.to_owned(),
                        tag_id,
                    })
            })
            .collect::<crate::Result<Vec<_>>>()?;
        tracing::info!(artist, tags = valued.len(), "got tags for artist");

        match TagChart::from_ranked(artist, valued, tag_count) {
            Some(chart) => Ok(ChartOutcome::Chart(chart)),
            None => Ok(ChartOutcome::NoTags),
        }
    }
}
