// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application host.
//!
//! Decides between the builder and the viewer. A link carrying a postcard
//! opens the viewer; anything else, including a link that fails to decode,
//! lands in the builder.

use crate::builder::{ContactDetails, PostcardBuilder};
use crate::config::AppConfig;
use crate::delivery::{DeliveryRequest, DeliveryService};
use crate::error::{AppError, Result};
use crate::link::ShareLink;
use crate::narration::{NarrationEngine, NarrationSession, UnsupportedNarrator};
use crate::viewer::ViewerController;
use std::sync::Arc;
use vintage_postcard_codec::{PostcardRecord, StampCatalog};
use vintage_postcard_sequencer::RevealSchedule;

/// Creates a narration engine for each opened postcard
pub type NarratorFactory = Box<dyn Fn() -> Box<dyn NarrationEngine> + Send + Sync>;

fn unsupported_narrator() -> Box<dyn NarrationEngine> {
    Box::new(UnsupportedNarrator)
}

/// Which top-level view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Step-by-step builder
    Builder,
    /// Animated reveal of a postcard
    Viewer,
}

/// The postcard application
pub struct PostcardApp {
    config: AppConfig,
    catalog: StampCatalog,
    builder: PostcardBuilder,
    viewer: Option<ViewerController>,
    narrator: NarratorFactory,
    delivery: Option<Arc<dyn DeliveryService>>,
}

impl PostcardApp {
    /// Create the application in the builder view
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            catalog: StampCatalog::classic(),
            builder: PostcardBuilder::new(),
            viewer: None,
            narrator: Box::new(unsupported_narrator),
            delivery: None,
        }
    }

    /// Use a different narration engine
    pub fn with_narrator<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn NarrationEngine> + Send + Sync + 'static,
    {
        self.narrator = Box::new(factory);
        self
    }

    /// Enable sending by email
    pub fn with_delivery(mut self, delivery: Arc<dyn DeliveryService>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Stamps offered by the builder
    pub fn catalog(&self) -> &StampCatalog {
        &self.catalog
    }

    /// Current view
    pub fn view(&self) -> View {
        if self.viewer.is_some() {
            View::Viewer
        } else {
            View::Builder
        }
    }

    /// The builder
    pub fn builder(&self) -> &PostcardBuilder {
        &self.builder
    }

    /// The builder, for editing
    pub fn builder_mut(&mut self) -> &mut PostcardBuilder {
        &mut self.builder
    }

    /// The open viewer, if any
    pub fn viewer(&self) -> Option<&ViewerController> {
        self.viewer.as_ref()
    }

    /// The open viewer, for narration control
    pub fn viewer_mut(&mut self) -> Option<&mut ViewerController> {
        self.viewer.as_mut()
    }

    /// Route an incoming link.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn load(&mut self, link: &str) -> View {
        match ShareLink::open(link) {
            Ok(Some(record)) => self.open_viewer(record),
            Ok(None) => self.back_to_builder(),
            Err(e) => {
                tracing::warn!("Could not open postcard, showing builder: {e}");
                self.back_to_builder()
            }
        }
    }

    /// Share link for the current draft
    pub fn create_link(&self) -> Result<String> {
        ShareLink::build(&self.config.link, self.builder.draft())
    }

    /// Play the reveal for a record without leaving the app.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn preview(&mut self, record: PostcardRecord) -> View {
        self.open_viewer(record)
    }

    /// Close the viewer and return to the builder with its draft intact
    pub fn back_to_builder(&mut self) -> View {
        if let Some(mut viewer) = self.viewer.take() {
            viewer.teardown();
        }
        View::Builder
    }

    /// Finalize the draft and deliver its link once.
    ///
    /// Returns the link that was sent.
    pub async fn send(&mut self, contact: ContactDetails) -> Result<String> {
        let delivery = self
            .delivery
            .clone()
            .ok_or(AppError::UnsupportedCapability("email delivery"))?;

        let record = self.builder.finalize(contact)?;
        let link = ShareLink::build_lossy(&self.config.link, &record);
        let request = DeliveryRequest::new(record, link.clone());

        delivery.send(&request).await.into_result()?;
        Ok(link)
    }

    fn open_viewer(&mut self, record: PostcardRecord) -> View {
        self.back_to_builder();

        let schedule = self.config.reveal.schedule().unwrap_or_else(|e| {
            tracing::warn!("Invalid reveal timing, using defaults: {e}");
            RevealSchedule::default()
        });
        let narration = NarrationSession::new((self.narrator)(), self.config.narration.clone());
        self.viewer = Some(ViewerController::open(record, schedule, narration));
        View::Viewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderError;
    use crate::delivery::DeliveryOutcome;
    use crate::narration::TranscriptNarrator;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use vintage_postcard_sequencer::Stage;

    struct FakeDelivery {
        outcome: DeliveryOutcome,
        requests: Mutex<Vec<DeliveryRequest>>,
    }

    impl FakeDelivery {
        fn new(outcome: DeliveryOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl DeliveryService for FakeDelivery {
        async fn send(&self, request: &DeliveryRequest) -> DeliveryOutcome {
            self.requests.lock().push(request.clone());
            self.outcome.clone()
        }
    }

    fn fill_builder(app: &mut PostcardApp) {
        let catalog = app.catalog().clone();
        let builder = app.builder_mut();
        builder.set_photo("https://example.com/p.jpg");
        builder.next().unwrap();
        builder.set_message("Hello from the coast");
        builder.next().unwrap();
        builder.select_stamp(&catalog, 2).unwrap();
        builder.next().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_routes_between_views() {
        let mut app = PostcardApp::new(AppConfig::default());
        assert_eq!(app.view(), View::Builder);

        assert_eq!(app.load("http://localhost:5173/"), View::Builder);
        assert_eq!(
            app.load("http://localhost:5173/?postcard=not-a-valid-token"),
            View::Builder
        );
        assert_eq!(app.load("nonsense"), View::Builder);

        fill_builder(&mut app);
        let link = app.create_link().unwrap();
        assert_eq!(app.load(&link), View::Viewer);

        let viewer = app.viewer().unwrap();
        assert_eq!(viewer.record(), app.builder().draft());
        assert_eq!(viewer.stage(), Stage::Sealed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_and_back_keep_draft() {
        let mut app = PostcardApp::new(AppConfig::default())
            .with_narrator(|| Box::new(TranscriptNarrator::new()));
        fill_builder(&mut app);

        let draft = app.builder().preview();
        assert_eq!(app.preview(draft.clone()), View::Viewer);
        assert!(app.viewer().unwrap().wait_revealed().await);
        assert!(app.viewer().unwrap().narration_available());

        assert_eq!(app.back_to_builder(), View::Builder);
        assert!(app.viewer().is_none());
        assert_eq!(app.builder().draft(), &draft);
        assert_eq!(app.builder().step(), 4);
    }

    #[tokio::test]
    async fn test_send_delivers_once() {
        let delivery = FakeDelivery::new(DeliveryOutcome::sent());
        let mut app = PostcardApp::new(AppConfig::default()).with_delivery(delivery.clone());
        fill_builder(&mut app);

        let link = app
            .send(ContactDetails::new("Ada", "Grace", "grace@example.com"))
            .await
            .unwrap();

        let requests = delivery.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].postcard_url, link);
        assert_eq!(requests[0].record.recipient_name, "Grace");
        assert_eq!(ShareLink::open(&link).unwrap().as_ref(), Some(&requests[0].record));
    }

    #[tokio::test]
    async fn test_send_surfaces_failures() {
        let delivery = FakeDelivery::new(DeliveryOutcome::failed("quota exceeded", Some(429)));
        let mut app = PostcardApp::new(AppConfig::default()).with_delivery(delivery.clone());
        fill_builder(&mut app);

        let err = app
            .send(ContactDetails::new("Ada", "", "grace@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Builder(BuilderError::MissingField("recipientName"))
        ));
        assert!(delivery.requests.lock().is_empty());

        let err = app
            .send(ContactDetails::new("Ada", "Grace", "grace@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Delivery failed: quota exceeded");
        assert!(err.is_retryable());
        assert_eq!(delivery.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_send_without_delivery_configured() {
        let mut app = PostcardApp::new(AppConfig::default());
        let err = app
            .send(ContactDetails::new("Ada", "Grace", "grace@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedCapability(_)));
    }
}
