//! In-memory repositories and scripted providers for unit tests.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageFormat, RgbImage};

use smartbiz_types::agent::{Agent, AgentId};
use smartbiz_types::business::{Business, BusinessId};
use smartbiz_types::conversation::{
    Content, ContentId, ContentType, ConversationMessage, Media, MessageId,
};
use smartbiz_types::error::{ImageError, RepositoryError};
use smartbiz_types::image::{GeneratedImage, ImageEditRequest, ImageEditResponse};
use smartbiz_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, Usage,
};
use smartbiz_types::memory::{MemorySnippet, SnippetKind};

use crate::image::box_provider::{BoxImageEditProvider, BoxTextToImageProvider};
use crate::image::provider::{ImageEditProvider, TextToImageProvider};
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;
use crate::providers::Providers;
use crate::repository::Repositories;
use crate::repository::agent::AgentRepository;
use crate::repository::business::BusinessRepository;
use crate::repository::conversation::ConversationRepository;
use crate::repository::memory::MemoryRepository;
use crate::storage::box_store::BoxObjectStore;
use crate::storage::object_store::{ObjectStore, UploadRequest};

#[derive(Default)]
struct State {
    agents: Vec<Agent>,
    businesses: Vec<Business>,
    messages: Vec<ConversationMessage>,
    media: Vec<Media>,
    contents: Vec<Content>,
    snippets: Vec<MemorySnippet>,
}

type Shared = Arc<Mutex<State>>;

/// Oldest first; insertion order breaks timestamp ties.
fn ascending<T: Clone>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.collect();
    out.sort_by_key(|item| key(item));
    out
}

pub struct AgentsView(Shared);
pub struct BusinessesView(Shared);
pub struct ConversationsView {
    state: Shared,
    fail_replies: Arc<AtomicBool>,
}
pub struct MemoriesView {
    state: Shared,
    fail_reads: Arc<AtomicBool>,
}

/// Every repository backed by one shared in-memory state.
pub struct InMemoryRepositories {
    agents: AgentsView,
    businesses: BusinessesView,
    conversations: ConversationsView,
    memories: MemoriesView,
    state: Shared,
    fail_reads: Arc<AtomicBool>,
    fail_replies: Arc<AtomicBool>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        let state: Shared = Arc::default();
        let fail_reads = Arc::new(AtomicBool::new(false));
        let fail_replies = Arc::new(AtomicBool::new(false));
        Self {
            agents: AgentsView(state.clone()),
            businesses: BusinessesView(state.clone()),
            conversations: ConversationsView {
                state: state.clone(),
                fail_replies: fail_replies.clone(),
            },
            memories: MemoriesView {
                state: state.clone(),
                fail_reads: fail_reads.clone(),
            },
            state,
            fail_reads,
            fail_replies,
        }
    }

    /// Make every `save_reply` fail before anything is written.
    pub fn fail_reply_writes(&self, fail: bool) {
        self.fail_replies.store(fail, Ordering::SeqCst);
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().unwrap().messages.len()
    }

    /// Make every memory snippet read fail with a query error.
    pub fn fail_memory_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn media_count(&self) -> usize {
        self.state.lock().unwrap().media.len()
    }
}

impl Repositories for InMemoryRepositories {
    type Agents = AgentsView;
    type Businesses = BusinessesView;
    type Conversations = ConversationsView;
    type Memories = MemoriesView;

    fn agents(&self) -> &AgentsView {
        &self.agents
    }

    fn businesses(&self) -> &BusinessesView {
        &self.businesses
    }

    fn conversations(&self) -> &ConversationsView {
        &self.conversations
    }

    fn memories(&self) -> &MemoriesView {
        &self.memories
    }
}

impl AgentRepository for AgentsView {
    async fn create_agent(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        self.0.lock().unwrap().agents.push(agent.clone());
        Ok(agent.clone())
    }

    async fn get_agent(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.0.lock().unwrap().agents.iter().find(|a| a.id == *id).cloned())
    }

    async fn list_agents_for_business(&self, business_id: &BusinessId) -> Result<Vec<Agent>, RepositoryError> {
        let state = self.0.lock().unwrap();
        let owned = state.agents.iter().filter(|a| a.business_id == Some(*business_id)).cloned();
        let mut agents = ascending(owned, |a: &Agent| a.created_at);
        agents.reverse();
        Ok(agents)
    }

    async fn update_agent_memory(&self, id: &AgentId, memory: &str) -> Result<(), RepositoryError> {
        let mut state = self.0.lock().unwrap();
        let agent = state.agents.iter_mut().find(|a| a.id == *id).ok_or(RepositoryError::NotFound)?;
        agent.memory = memory.to_string();
        Ok(())
    }

    async fn delete_agent(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let mut state = self.0.lock().unwrap();
        let before = state.agents.len();
        state.agents.retain(|a| a.id != *id);
        if state.agents.len() == before {
            return Err(RepositoryError::NotFound);
        }
        state.messages.retain(|m| m.agent_id != *id);
        state.media.retain(|m| m.agent_id != *id);
        state.contents.retain(|c| c.agent_id != *id);
        state.snippets.retain(|s| s.agent_id != *id);
        Ok(())
    }
}

impl BusinessRepository for BusinessesView {
    async fn create_business(&self, business: &Business) -> Result<Business, RepositoryError> {
        self.0.lock().unwrap().businesses.push(business.clone());
        Ok(business.clone())
    }

    async fn get_business(&self, id: &BusinessId) -> Result<Option<Business>, RepositoryError> {
        Ok(self.0.lock().unwrap().businesses.iter().find(|b| b.id == *id).cloned())
    }

    async fn update_business(&self, business: &Business) -> Result<Business, RepositoryError> {
        let mut state = self.0.lock().unwrap();
        let slot = state
            .businesses
            .iter_mut()
            .find(|b| b.id == business.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = business.clone();
        Ok(business.clone())
    }
}

impl ConversationRepository for ConversationsView {
    async fn save_message(&self, message: &ConversationMessage) -> Result<ConversationMessage, RepositoryError> {
        self.state.lock().unwrap().messages.push(message.clone());
        Ok(message.clone())
    }

    async fn get_message(&self, id: &MessageId) -> Result<Option<ConversationMessage>, RepositoryError> {
        Ok(self.state.lock().unwrap().messages.iter().find(|m| m.id == *id).cloned())
    }

    async fn list_recent_messages(
        &self,
        agent_id: &AgentId,
        limit: u32,
    ) -> Result<Vec<ConversationMessage>, RepositoryError> {
        let mut messages = self.list_messages(agent_id).await?;
        messages.reverse();
        messages.truncate(limit as usize);
        Ok(messages)
    }

    async fn list_messages(&self, agent_id: &AgentId) -> Result<Vec<ConversationMessage>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let owned = state.messages.iter().filter(|m| m.agent_id == *agent_id).cloned();
        Ok(ascending(owned, |m: &ConversationMessage| m.created_at))
    }

    async fn save_reply(
        &self,
        message: &ConversationMessage,
        media: &[Media],
    ) -> Result<ConversationMessage, RepositoryError> {
        if self.fail_replies.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("reply write failed".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.messages.push(message.clone());
        state.media.extend(media.iter().cloned());
        Ok(message.clone())
    }

    async fn save_media(&self, media: &Media) -> Result<Media, RepositoryError> {
        self.state.lock().unwrap().media.push(media.clone());
        Ok(media.clone())
    }

    async fn list_media_for_messages(&self, message_ids: &[MessageId]) -> Result<Vec<Media>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let linked = state
            .media
            .iter()
            .filter(|m| m.message_id.is_some_and(|id| message_ids.contains(&id)))
            .cloned();
        Ok(ascending(linked, |m: &Media| m.created_at))
    }

    async fn save_content(&self, content: &Content) -> Result<Content, RepositoryError> {
        self.state.lock().unwrap().contents.push(content.clone());
        Ok(content.clone())
    }

    async fn get_content(&self, id: &ContentId) -> Result<Option<Content>, RepositoryError> {
        Ok(self.state.lock().unwrap().contents.iter().find(|c| c.id == *id).cloned())
    }

    async fn list_content(
        &self,
        agent_id: &AgentId,
        content_type: Option<ContentType>,
        limit: u32,
    ) -> Result<Vec<Content>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let owned = state
            .contents
            .iter()
            .filter(|c| c.agent_id == *agent_id)
            .filter(|c| content_type.is_none_or(|t| c.content_type == t))
            .cloned();
        let mut contents = ascending(owned, |c: &Content| c.created_at);
        contents.reverse();
        contents.truncate(limit as usize);
        Ok(contents)
    }

    async fn list_media_for_content(&self, content_ids: &[ContentId]) -> Result<Vec<Media>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let linked = state
            .media
            .iter()
            .filter(|m| m.content_id.is_some_and(|id| content_ids.contains(&id)))
            .cloned();
        Ok(ascending(linked, |m: &Media| m.created_at))
    }
}

impl MemoryRepository for MemoriesView {
    async fn save_snippet(&self, snippet: &MemorySnippet) -> Result<MemorySnippet, RepositoryError> {
        self.state.lock().unwrap().snippets.push(snippet.clone());
        Ok(snippet.clone())
    }

    async fn list_snippets(&self, agent_id: &AgentId) -> Result<Vec<MemorySnippet>, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("memory store unavailable".to_string()));
        }
        let state = self.state.lock().unwrap();
        let owned = state.snippets.iter().filter(|s| s.agent_id == *agent_id).cloned();
        let mut snippets = ascending(owned, |s: &MemorySnippet| s.created_at);
        snippets.reverse();
        Ok(snippets)
    }

    async fn replace_profile_snippet(&self, snippet: &MemorySnippet) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state
            .snippets
            .retain(|s| !(s.agent_id == snippet.agent_id && s.kind == SnippetKind::BusinessProfile));
        state.snippets.push(snippet.clone());
        Ok(())
    }
}

/// LLM that replays a fixed script and records every request.
///
/// Once the script runs out every call fails with a provider error.
#[derive(Clone)]
pub struct ScriptedLlm {
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    capabilities: ProviderCapabilities,
}

impl ScriptedLlm {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            requests: Arc::default(),
            capabilities: ProviderCapabilities {
                vision: true,
                max_context_tokens: 128_000,
                max_output_tokens: 4_096,
            },
        }
    }

    pub fn boxed(&self) -> BoxLlmProvider {
        BoxLlmProvider::new(self.clone())
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        let content = match next {
            Some(result) => result?,
            None => {
                return Err(LlmError::Provider {
                    message: "script exhausted".to_string(),
                });
            }
        };
        Ok(CompletionResponse {
            id: "scripted".to_string(),
            content,
            model: request.model.clone(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        })
    }
}

/// Text-to-image provider that hands out numbered URLs.
#[derive(Clone, Default)]
pub struct RecordingImageProvider {
    prompts: Arc<Mutex<Vec<String>>>,
    counter: Arc<AtomicUsize>,
}

impl RecordingImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> BoxTextToImageProvider {
        BoxTextToImageProvider::new(self.clone())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextToImageProvider for RecordingImageProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedImage {
            url: format!("https://images.test/{n}.png"),
        })
    }
}

/// Object store that keeps upload metadata only.
#[derive(Clone, Default)]
pub struct RecordingObjectStore {
    uploads: Arc<Mutex<Vec<UploadRequest>>>,
}

impl RecordingObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> BoxObjectStore {
        BoxObjectStore::new(self.clone())
    }

    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn last_url(&self) -> Option<String> {
        self.uploads.lock().unwrap().last().map(url_for)
    }
}

fn url_for(request: &UploadRequest) -> String {
    format!("https://store.test/{}/{}.png", request.folder, request.filename)
}

impl ObjectStore for RecordingObjectStore {
    fn name(&self) -> &str {
        "recording"
    }

    async fn upload(&self, bytes: &[u8], request: &UploadRequest) -> Result<String, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Upload("empty upload".to_string()));
        }
        self.uploads.lock().unwrap().push(request.clone());
        Ok(url_for(request))
    }
}

/// Edit provider with a canned answer.
#[derive(Clone)]
pub struct ScriptedEditProvider {
    output_url: Option<String>,
    requests: Arc<Mutex<Vec<ImageEditRequest>>>,
}

impl ScriptedEditProvider {
    /// `None` answers like a queued job: a payload with no output.
    pub fn returning(output_url: Option<&str>) -> Self {
        Self {
            output_url: output_url.map(String::from),
            requests: Arc::default(),
        }
    }

    pub fn boxed(&self) -> BoxImageEditProvider {
        BoxImageEditProvider::new(self.clone())
    }

    pub fn requests(&self) -> Vec<ImageEditRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ImageEditProvider for ScriptedEditProvider {
    fn name(&self) -> &str {
        "scripted-edit"
    }

    async fn edit(&self, request: &ImageEditRequest) -> Result<ImageEditResponse, ImageError> {
        self.requests.lock().unwrap().push(request.clone());
        let raw = match &self.output_url {
            Some(url) => serde_json::json!({"status": "success", "output": [url]}),
            None => serde_json::json!({"status": "processing", "eta": 12, "output": []}),
        };
        Ok(ImageEditResponse {
            output_url: self.output_url.clone(),
            raw,
        })
    }
}

/// A solid-colour PNG of the given size.
pub fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Provider set around `llm` with a recording text-to-image backend.
pub fn providers(
    llm: &ScriptedLlm,
    image_edit: Option<BoxImageEditProvider>,
    object_store: Option<BoxObjectStore>,
) -> Providers {
    Providers {
        llm: llm.boxed(),
        text_to_image: RecordingImageProvider::new().boxed(),
        image_edit,
        object_store,
    }
}
