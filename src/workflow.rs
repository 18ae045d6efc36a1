use std::sync::Arc;
use tracing::{error, info};

use crate::agent::{AgentPipeline, AgentTask, PipelineError, Role, Stage};
use crate::weather::WeatherSummary;

/// Validated input of `/recommend`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub topic: String,
    pub gender: String,
    pub location: String,
}

/// Researcher → stylist pipeline producing one outfit recommendation
pub struct RecommendationWorkflow {
    pipeline: Arc<dyn AgentPipeline>,
    researcher: Role,
    stylist: Role,
}

impl RecommendationWorkflow {
    pub fn new(pipeline: Arc<dyn AgentPipeline>, researcher: Role, stylist: Role) -> Self {
        Self {
            pipeline,
            researcher,
            stylist,
        }
    }

    /// The two fixed tasks, with the weather text inside the research task
    pub fn build_stages(&self, request: &RecommendationRequest, weather: &WeatherSummary) -> Vec<Stage> {
        let research = AgentTask {
            description: format!(
                "Etkinlik: {}, Cinsiyet: {}, Hava Durumu: {}",
                request.topic,
                request.gender,
                weather.to_prompt_text()
            ),
            expected_output: "Kullanıcıya uygun stil önerileri.".to_string(),
        };

        let styling = AgentTask {
            description: "Stil araştırmasından gelen bilgiler ile cinsiyet, hava durumu ve \
                          etkinlik bazlı kıyafet önerileri oluştur."
                .to_string(),
            expected_output: "Moda stilisti tarafından önerilen kıyafetler.".to_string(),
        };

        vec![
            Stage {
                role: self.researcher.clone(),
                task: research,
            },
            Stage {
                role: self.stylist.clone(),
                task: styling,
            },
        ]
    }

    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
        weather: &WeatherSummary,
    ) -> Result<String, PipelineError> {
        info!(
            "Recommendation for topic={:?} gender={:?} location={:?} weather_available={}",
            request.topic,
            request.gender,
            request.location,
            weather.is_available()
        );

        let stages = self.build_stages(request, weather);
        self.pipeline.run_pipeline(stages).await.map_err(|e| {
            error!("Recommendation pipeline failed: {}", e);
            e
        })
    }
}
