use std::sync::Arc;
use tracing::info;

use crate::agent::agents::roles::{fashion_stylist, style_researcher};
use crate::agent::{OpenAICompatibleLLM, SequentialCrew, SerperSearchTool, StatelessLLMInterface, Tool};
use crate::config::Config;
use crate::storage::{FirebaseImageStore, ImageStore};
use crate::vision::ImageDescriber;
use crate::weather::{OpenWeatherMapClient, WeatherProvider};
use crate::workflow::RecommendationWorkflow;

/// Everything a request handler needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<dyn WeatherProvider>,
    pub image_store: Arc<dyn ImageStore>,
    pub image_describer: Arc<ImageDescriber>,
    pub workflow: Arc<RecommendationWorkflow>,
    pub default_location: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let weather = Arc::new(OpenWeatherMapClient::new(&config.weather)?);
        let image_store = Arc::new(FirebaseImageStore::new(&config.storage)?);

        let agent_llm: Arc<dyn StatelessLLMInterface> =
            Arc::new(OpenAICompatibleLLM::from_config(&config.llm, &config.llm.model)?);
        let vision_llm: Arc<dyn StatelessLLMInterface> =
            Arc::new(OpenAICompatibleLLM::from_config(&config.llm, config.llm.vision_model())?);

        let search: Arc<dyn Tool> = Arc::new(SerperSearchTool::new(&config.search)?);
        let workflow = RecommendationWorkflow::new(
            Arc::new(SequentialCrew::new(agent_llm)),
            style_researcher(vec![search]),
            fashion_stylist(),
        );

        info!("Application state initialized");

        Ok(Self {
            weather,
            image_store,
            image_describer: Arc::new(ImageDescriber::new(vision_llm, config.llm.vision_max_tokens)),
            workflow: Arc::new(workflow),
            default_location: config.defaults.location.clone(),
            max_upload_bytes: config.server.max_upload_bytes,
        })
    }
}
