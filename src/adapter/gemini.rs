//! Gemini `generateContent` adapter.
//!
//! Analysis queries run with search grounding enabled and the expert system
//! instruction that makes the model tag structures with `[[ ]]`. Structure
//! deep-dives run with a JSON response schema so the four-field record can
//! be deserialized strictly.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::logging::{log, obj, Domain, Level};

use super::{AnalysisRequest, AnalysisResult, KnowledgeEngine, Source, StructureDetail};

const SYSTEM_INSTRUCTION: &str = "\
Eres un neurólogo experto basado estrictamente en el atlas de Hal Blumenfeld \
\"Neuroanatomy through Clinical Cases\". Tu objetivo es desglosar el examen \
neurológico exhaustivo.

REGLAS DE RESPUESTA:
1. Para Pares Craneales: Detalla el origen aparente, el núcleo en el tronco encefálico \
(Mesencéfalo, Puente o Bulbo) y el foramen de salida del cráneo.
2. Para Motor: Diferencia UMN vs LMN usando signos como Babinski, Hoffman, Clonus o Fasciculaciones.
3. Estructuras: Siempre que menciones una estructura (ej. [[Fascículo Longitudinal Medial]], \
[[Núcleo de Edinger-Westphal]]), rodéala con [[ ]].
4. Formato: Usa Markdown elegante y negritas para términos clave.";

const DETAIL_INSTRUCTION: &str = "Proporciona info técnica sobre embriología \
(ej. Prosencéfalo), localización exacta y función clínica.";

pub struct GeminiEngine {
    client: Client,
    base: String,
    model: String,
    api_key: String,
}

impl GeminiEngine {
    pub fn new(cfg: &Config) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY not set"))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            base: cfg.gemini_base.clone(),
            model: cfg.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base, self.model, self.api_key
        )
    }

    async fn generate(&self, body: serde_json::Value) -> Result<GenerateResponse> {
        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .context("knowledge engine request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("reading engine response")?;
        if !status.is_success() {
            return Err(anyhow!("engine error {}: {}", status, text));
        }
        serde_json::from_str(&text).context("parsing engine response")
    }
}

fn analysis_prompt(request: &AnalysisRequest) -> String {
    match request {
        AnalysisRequest::Protocol(test) => format!(
            "Análisis Exhaustivo del Protocolo: {}\n\n\
             Proporciona:\n\
             1. PROCEDIMIENTO: Cómo realizar correctamente la maniobra.\n\
             2. CORRELACIÓN ANATÓMICA: Qué vías y núcleos estamos probando. Usa [[Estructura]].\n\
             3. LOCALIZACIÓN: Si la prueba es anormal, ¿dónde está el daño? \
             (ej. Corteza, Cápsula Interna, Tronco, Nervio Periférico).\n\
             4. PERLA CLÍNICA: Un dato de alta relevancia médica de Blumenfeld.",
            test.name
        ),
        AnalysisRequest::Query(query) => format!(
            "Realiza un análisis profundo sobre: \"{}\".\n\
             Incluye anatomía funcional, semiología clínica y localización. \
             Marca las estructuras con [[Estructura]].",
            query
        ),
    }
}

#[async_trait]
impl KnowledgeEngine for GeminiEngine {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let body = json!({
            "contents": [{ "parts": [{ "text": analysis_prompt(request) }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "tools": [{ "googleSearch": {} }],
        });

        let response = self.generate(body).await?;
        let content = response
            .first_text()
            .ok_or_else(|| anyhow!("engine reply carried no text"))?;
        let sources = response.sources();
        log(
            Level::Debug,
            Domain::Adapter,
            "analysis_reply",
            obj(&[
                ("chars", json!(content.len())),
                ("sources", json!(sources.len())),
            ]),
        );
        Ok(AnalysisResult { content, sources })
    }

    async fn structure_detail(&self, name: &str) -> Result<StructureDetail> {
        let body = json!({
            "contents": [{ "parts": [{ "text": format!(
                "Desglosa la estructura: \"{}\" para un estudiante de medicina avanzado.", name
            ) }] }],
            "systemInstruction": { "parts": [{ "text": DETAIL_INSTRUCTION }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "embryology": { "type": "STRING" },
                        "localization": { "type": "STRING" },
                        "function": { "type": "STRING" }
                    },
                    "required": ["name", "embryology", "localization", "function"]
                }
            },
        });

        let response = self.generate(body).await?;
        let text = response
            .first_text()
            .ok_or_else(|| anyhow!("detail reply carried no text"))?;
        // Strict: a payload missing any of the four fields fails the view.
        let detail: StructureDetail =
            serde_json::from_str(&text).context("detail payload missing required fields")?;
        Ok(detail)
    }
}

// Tolerant response shapes: every level is optional so a degenerate reply
// degrades to "no text" instead of a parse error.

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    title: Option<String>,
    uri: Option<String>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        let parts = self
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Ordered grounded sources; chunks without a parseable uri are dropped.
    fn sources(&self) -> Vec<Source> {
        let Some(candidates) = self.candidates.as_ref() else {
            return Vec::new();
        };
        let Some(chunks) = candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .and_then(|g| g.grounding_chunks.as_ref())
        else {
            return Vec::new();
        };
        chunks
            .iter()
            .filter_map(|chunk| {
                let web = chunk.web.as_ref()?;
                let uri = web.uri.clone().filter(|u| Url::parse(u).is_ok())?;
                Some(Source {
                    title: web
                        .title
                        .clone()
                        .filter(|t| !t.is_empty())
                        .unwrap_or_else(|| "Fuente Médica".to_string()),
                    uri,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn protocol_prompt_names_the_test() {
        let test = *Catalog::builtin().test_by_id("cn7-facial").unwrap();
        let prompt = analysis_prompt(&AnalysisRequest::Protocol(test));
        assert!(prompt.contains("CN VII: Mímica Facial"));
        assert!(prompt.contains("[[Estructura]]"));
    }

    #[test]
    fn reply_text_and_sources_are_extracted() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "hola " }, { "text": "[[Puente]]" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "title": "Blumenfeld", "uri": "https://example.org/atlas" } },
                    { "web": { "title": "rota", "uri": "no es una uri" } },
                    { "web": { "uri": "https://example.org/anon" } },
                    { },
                ] }
            }]
        });
        let parsed: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.first_text().unwrap(), "hola [[Puente]]");
        let sources = parsed.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "Blumenfeld");
        assert_eq!(sources[1].title, "Fuente Médica");
    }

    #[test]
    fn empty_reply_degrades_to_no_text() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.first_text().is_none());
        assert!(parsed.sources().is_empty());
    }

    #[test]
    fn detail_payload_is_strict() {
        let ok: Result<StructureDetail, _> = serde_json::from_str(
            r#"{"name":"Puente","embryology":"Metencéfalo","localization":"Tronco","function":"Relevo"}"#,
        );
        assert!(ok.is_ok());
        let missing: Result<StructureDetail, _> =
            serde_json::from_str(r#"{"name":"Puente","embryology":"Metencéfalo"}"#);
        assert!(missing.is_err());
    }
}
