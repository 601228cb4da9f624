use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tagviz_core::chart::tag_count_choice;
use tagviz_core::{ChartOutcome, TagChart};

use crate::page::PageView;
use crate::state::AppState;
use crate::svg;

pub const INVALID_ARTIST: &str = "invalid artist name";
pub const ZERO_TAGS: &str = "artist has zero tags";
pub const GRAPH_FAILED: &str = "cannot create graph";
pub const INVALID_TAG_COUNT: &str = "invalid tag count";

/// Fields posted by the search form.
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    pub artist: Option<String>,
    pub max_tags: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.page.render(&PageView::default()))
}

pub async fn search(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Response {
    let choice = tag_count_choice(form.max_tags.as_deref());
    let artist = form.artist.as_deref().unwrap_or_default();

    let mut view = PageView {
        artist: Some(artist).filter(|a| !a.is_empty()),
        max_tags: choice,
        ..Default::default()
    };

    // the whole form is rejected with one message, artist or tag count alike
    let max_tags = match choice {
        Some(n) if state.catalog.contains_artist(artist) => n,
        _ => {
            tracing::warn!(artist, max_tags = ?form.max_tags, "invalid form");
            view.error_msg = Some(INVALID_ARTIST);
            return (StatusCode::BAD_REQUEST, Html(state.page.render(&view))).into_response();
        }
    };

    let status = match state.catalog.tag_chart(artist, max_tags) {
        Ok(ChartOutcome::Chart(chart)) => {
            view.chart_svg = Some(svg::render_chart(&chart));
            StatusCode::OK
        }
        Ok(ChartOutcome::NoTags) => {
            view.error_msg = Some(ZERO_TAGS);
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!(artist, error = %e, "cannot create graph");
            view.error_msg = Some(GRAPH_FAILED);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Html(state.page.render(&view))).into_response()
}

pub async fn autocomplete(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.autocomplete.to_string(),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct TagsQuery {
    pub artist: String,
    pub max_tags: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub artist: String,
    /// `None` when the artist was never tagged.
    pub chart: Option<TagChart>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// Chart model as JSON, for clients that draw their own plot.
///
/// `max_tags` is required and must be one of the form's choices.
pub async fn tags(State(state): State<AppState>, Query(query): Query<TagsQuery>) -> Response {
    let Some(max_tags) = tag_count_choice(query.max_tags.as_deref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: INVALID_TAG_COUNT,
            }),
        )
            .into_response();
    };

    if !state.catalog.contains_artist(&query.artist) {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: INVALID_ARTIST,
            }),
        )
            .into_response();
    }

    match state.catalog.tag_chart(&query.artist, max_tags) {
        Ok(outcome) => {
            let chart = match outcome {
                ChartOutcome::Chart(chart) => Some(chart),
                ChartOutcome::NoTags => None,
            };
            Json(TagsResponse {
                artist: query.artist,
                chart,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(artist = %query.artist, error = %e, "cannot create graph");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: GRAPH_FAILED,
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
