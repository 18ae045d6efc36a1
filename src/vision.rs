use std::sync::Arc;
use tracing::{debug, error};

use crate::agent::{ChatMessage, CompletionOptions, ContentPart, StatelessLLMInterface};
use crate::weather::WeatherSummary;

/// Returned instead of an analysis when the chat call fails
pub const ANALYSIS_FAILED: &str = "Resim analizi yapılırken bir hata oluştu.";

/// Asks a multimodal chat model which garments go with the pictured one
pub struct ImageDescriber {
    llm: Arc<dyn StatelessLLMInterface>,
    max_tokens: u32,
}

impl ImageDescriber {
    pub fn new(llm: Arc<dyn StatelessLLMInterface>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    fn system_prompt(weather: &WeatherSummary) -> String {
        format!(
            "Sen bir kıyafet uyumluluk analistisin ve resimdeki kıyafeti analiz et ve hangi \
             kıyafetlerle uyumlu olduğunu söyle. Ayrıca hava durumu: {} bilgilerini göz önünde \
             bulundur.",
            weather.to_prompt_text()
        )
    }

    fn instruction(gender: &str) -> String {
        format!(
            "Resimdeki kıyafeti analiz et ve Şu anki hava durumu bilgisini de göz önünde \
             bulundur. Kullanıcının cinsiyeti: {}. Bu kişiye uygun hangi kıyafetlerle uyumlu \
             olduğunu söyle ve kısaca nedenini belirt.",
            gender
        )
    }

    /// Analyse the image at `image_url`. Never fails: errors become
    /// [`ANALYSIS_FAILED`].
    pub async fn describe_image(&self, image_url: &str, weather: &WeatherSummary, gender: &str) -> String {
        let system = Self::system_prompt(weather);
        let message = ChatMessage::user_parts(vec![
            ContentPart::text(Self::instruction(gender)),
            ContentPart::image_url(image_url),
        ]);
        let options = CompletionOptions {
            max_tokens: Some(self.max_tokens),
        };

        match self.llm.chat_completion(vec![message], Some(&system), options).await {
            Ok(text) => {
                debug!(
                    "Image analysis received: {}...",
                    text.chars().take(200).collect::<String>()
                );
                text
            }
            Err(e) => {
                error!("Image analysis failed: {}", e);
                ANALYSIS_FAILED.to_string()
            }
        }
    }
}
