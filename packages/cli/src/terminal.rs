//! A [`Page`] for the terminal.
//!
//! Everything is kept in a [`StaticPage`]; the loading indicator is
//! mirrored by an `indicatif` spinner so the user sees progress while the
//! feed is fetched.

use quake_map_chart_models::ChartConfig;
use quake_map_charts::{ChartError, ChartSurface};
use quake_map_cli_utils::{LoadingSpinner, MultiProgress};
use quake_map_dashboard::{LOADING_ID, Page, PageError, StaticPage};
use quake_map_map::{BoundingBox, MapError, MapView, MarkerLayer, MarkerPoint};

/// Spinner text while the feed is fetched.
const LOADING_MESSAGE: &str = "Loading earthquake data...";

/// A [`StaticPage`] whose loading indicator drives a spinner.
pub struct TerminalPage {
    inner: StaticPage,
    multi: MultiProgress,
    spinner: Option<LoadingSpinner>,
}

impl TerminalPage {
    /// Creates a page with every dashboard element and the given viewport.
    #[must_use]
    pub fn new(multi: &MultiProgress, view: MapView) -> Self {
        Self {
            inner: StaticPage::new(view),
            multi: multi.clone(),
            spinner: None,
        }
    }

    /// The underlying in-memory page.
    #[must_use]
    pub const fn page(&self) -> &StaticPage {
        &self.inner
    }

    fn toggle_spinner(&mut self, visible: bool) {
        match (visible, self.spinner.take()) {
            (true, None) => {
                self.spinner = Some(LoadingSpinner::start(&self.multi, LOADING_MESSAGE));
            }
            (true, Some(spinner)) => self.spinner = Some(spinner),
            (false, Some(spinner)) => spinner.finish_and_clear(),
            (false, None) => {}
        }
    }
}

impl ChartSurface for TerminalPage {
    fn has_target(&self, target: &str) -> bool {
        self.inner.has_target(target)
    }

    fn draw(&mut self, target: &str, config: ChartConfig) -> Result<(), ChartError> {
        log::debug!("Drawing {:?} chart into {target}", config.kind);
        self.inner.draw(target, config)
    }
}

impl MarkerLayer for TerminalPage {
    fn add_markers(&mut self, points: &[MarkerPoint]) -> Result<(), MapError> {
        self.inner.add_markers(points)
    }

    fn fit_bounds(&mut self, bounds: BoundingBox) -> Result<(), MapError> {
        self.inner.fit_bounds(bounds)
    }
}

impl Page for TerminalPage {
    fn has_element(&self, id: &str) -> bool {
        self.inner.has_element(id)
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), PageError> {
        self.inner.set_visible(id, visible)?;
        if id == LOADING_ID {
            self.toggle_spinner(visible);
        }
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), PageError> {
        self.inner.set_text(id, text)
    }

    fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.inner.navigate(url)
    }

    fn scroll_to_top(&mut self) -> Result<(), PageError> {
        self.inner.scroll_to_top()
    }
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    #[test]
    fn loading_indicator_drives_spinner() {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let mut page = TerminalPage::new(&multi, MapView::default());

        page.set_visible(LOADING_ID, true).unwrap();
        assert!(page.spinner.is_some());
        assert!(page.page().is_visible(LOADING_ID));

        page.set_visible(LOADING_ID, false).unwrap();
        assert!(page.spinner.is_none());
        assert!(!page.page().is_visible(LOADING_ID));
    }
}
