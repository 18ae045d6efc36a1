use std::sync::Arc;

use super::agent_interface::Role;
use crate::agent::tools::Tool;

/// Researches trends for the event, gender and weather at hand
pub fn style_researcher(tools: Vec<Arc<dyn Tool>>) -> Role {
    Role {
        name: "Stil Araştırmacısı".to_string(),
        goal: "Kullanıcının katılacağı etkinlik, toplantı veya herhangi bir yere gitmesi için \
               uygun kıyafet trendlerini ve moda önerilerini araştırmak"
            .to_string(),
        backstory: "Sen deneyimli bir stil araştırmacısın. Kullanıcının etkinlik ve tarz \
                    tercihlerini öğrenip, en güncel moda trendlerine göre öneriler hazırlarsın. \
                    Google gibi kaynaklardan güncel stil yorumlarını ve hava durumunu dikkate \
                    alarak tavsiyeler verirsin."
            .to_string(),
        tools,
    }
}

/// Turns the research into concrete outfit advice.
/// Masculine-leaning for men, softer for women.
pub fn fashion_stylist() -> Role {
    Role {
        name: "Moda Stilisti".to_string(),
        goal: "Stil araştırmacısından gelen bilgiler doğrultusunda cinsiyet, hava durumu ve \
               katılacağı ortama uygun kıyafet önerileri sunmak"
            .to_string(),
        backstory: "Sen uzman bir moda stilistisin. Kullanıcının cinsiyetini, hava durumu \
                    koşullarını, giymek istediği bir tarz veya etkinliği dikkate alarak kıyafet \
                    ve aksesuar önerileri hazırlarsın. Erkekler için daha maskülen kadınlar için \
                    daha tatlı kıyafet önerilerinde bulunursun."
            .to_string(),
        tools: Vec::new(),
    }
}
