use crate::core::recommend::RecommendationProvider;
use crate::domain::model::{Preferences, Recommendations, TravelRequest, TripPlan};
use crate::domain::ports::{PlanGenerator, Storage};
use crate::render::{document_filename, DocumentRenderer, PDF_MIME_TYPE};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct TravelEngine<G: PlanGenerator> {
    provider: RecommendationProvider,
    generator: G,
    renderer: DocumentRenderer,
    monitor: SystemMonitor,
}

impl<G: PlanGenerator> TravelEngine<G> {
    pub fn new(provider: RecommendationProvider, generator: G, renderer: DocumentRenderer) -> Self {
        Self::new_with_monitoring(provider, generator, renderer, false)
    }

    pub fn new_with_monitoring(
        provider: RecommendationProvider,
        generator: G,
        renderer: DocumentRenderer,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            provider,
            generator,
            renderer,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn recommend(&self, request: &TravelRequest) -> Recommendations {
        let recommendations = self.provider.recommend(request);
        self.monitor.log_phase("Recommendations");
        recommendations
    }

    /// 呼叫語言模型；只嘗試一次，錯誤原樣回傳
    pub async fn generate_plan(&self, request: &TravelRequest) -> Result<String> {
        let result = self
            .generator
            .generate(request.destination(), request.dates(), request.budget())
            .await;
        self.monitor.log_phase("Plan generation");
        result
    }

    pub async fn plan(&self, request: TravelRequest, preferences: Preferences) -> Result<TripPlan> {
        tracing::info!(
            "Planning trip to {} ({}) with budget {}",
            request.destination(),
            request.dates(),
            request.budget()
        );

        let recommendations = self.recommend(&request);
        let plan_text = self.generate_plan(&request).await?;

        Ok(TripPlan {
            request,
            preferences,
            recommendations,
            plan_text,
        })
    }

    pub fn render(&self, trip: &TripPlan) -> Result<Vec<u8>> {
        let bytes = self.renderer.render(
            &trip.plan_text,
            &trip.request,
            &trip.recommendations.flights,
            &trip.recommendations.hotels,
            &trip.recommendations.activities,
        )?;
        self.monitor.log_phase("Render");
        Ok(bytes)
    }

    /// 輸出 PDF 並回傳寫入的檔名
    pub async fn export<S: Storage>(&self, trip: &TripPlan, storage: &S) -> Result<String> {
        let filename = document_filename(trip.request.destination());
        let bytes = self.render(trip)?;

        tracing::debug!("Writing {} ({} bytes, {})", filename, bytes.len(), PDF_MIME_TYPE);
        storage.write_file(&filename, &bytes).await?;

        tracing::info!("📄 Travel plan exported to {}", filename);
        Ok(filename)
    }
}
