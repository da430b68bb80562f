use std::sync::Arc;

use chrono::Utc;
use popt_complete::{parse_reply, ChatCompleter, Completer, SYSTEM_PROMPT};
use popt_diff::{compare_latest, compare_versions, VersionComparison};
use popt_history::{append_version, export_file_name, export_store, import_into, parse_document, search, ImportReport};
use popt_store::{EntryStore, FileKvStore, InMemoryKvStore, KvStore, TemplateStore};
use popt_types::{Entry, Template, Timestamp};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{SdkError, SdkResult};

/// Input to [`Optimizer::optimize`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptimizeRequest {
    /// Prompt text. When blank and `template_id` is set, the template's
    /// content is used instead.
    pub prompt: String,
    /// Re-optimize this entry instead of creating a new one.
    pub entry_id: Option<String>,
    /// Replacement tags. `None` keeps an existing entry's tags.
    pub tags: Option<Vec<String>>,
    pub template_id: Option<String>,
}

impl OptimizeRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn for_entry(mut self, id: impl Into<String>) -> Self {
        self.entry_id = Some(id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_template(mut self, id: impl Into<String>) -> Self {
        self.template_id = Some(id.into());
        self
    }
}

/// A serialized history document and the file name to save it under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub body: String,
}

/// The prompt optimizer: history, templates, and a completion client.
pub struct Optimizer {
    entries: EntryStore,
    templates: TemplateStore,
    completer: Arc<dyn Completer>,
}

impl Optimizer {
    pub fn new(kv: Arc<dyn KvStore>, completer: Arc<dyn Completer>) -> Self {
        Self {
            entries: EntryStore::new(Arc::clone(&kv)),
            templates: TemplateStore::new(kv),
            completer,
        }
    }

    /// An optimizer over a fresh in-memory store.
    pub fn in_memory(completer: Arc<dyn Completer>) -> Self {
        Self::new(Arc::new(InMemoryKvStore::new()), completer)
    }

    /// Open the file-backed store under `config.data_dir` and build the HTTP
    /// completion client from `config`.
    pub fn open(config: &Config) -> SdkResult<Self> {
        let kv = FileKvStore::open(&config.data_dir)?;
        let completer = ChatCompleter::new(config.chat_config())?;
        info!(
            data_dir = %config.data_dir.display(),
            model = %config.completion.model,
            "opened optimizer"
        );
        Ok(Self::new(Arc::new(kv), Arc::new(completer)).with_history_cap(config.history_cap))
    }

    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.entries = self.entries.with_cap(cap);
        self
    }

    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn provider_name(&self) -> &str {
        self.completer.provider_name()
    }

    // ---- Optimization ----

    /// Optimize a prompt and record the result.
    ///
    /// A new entry is created unless `request.entry_id` names an existing
    /// one, in which case its current result moves into the version chain.
    /// Nothing is stored when the completion call fails, and a re-optimized
    /// entry deleted while the call was in flight stays deleted.
    pub async fn optimize(&self, request: OptimizeRequest) -> SdkResult<Entry> {
        let template = match &request.template_id {
            Some(id) => Some(self.template(id)?),
            None => None,
        };
        let prompt = match &template {
            Some(t) if request.prompt.trim().is_empty() => t.content.clone(),
            _ => request.prompt.clone(),
        };
        if prompt.trim().is_empty() {
            return Err(SdkError::EmptyPrompt);
        }
        if let Some(id) = &request.entry_id {
            self.entry(id)?;
        }

        debug!(provider = self.completer.provider_name(), "requesting optimization");
        let reply = self.completer.complete(SYSTEM_PROMPT, &prompt).await?;
        let result = parse_reply(&reply);
        let now = Timestamp::now();
        let tags = request.tags.map(normalize_tags);

        let entry = match request.entry_id {
            // The entry is re-read under the store lock; the copy read before
            // the completion call may be stale by now.
            Some(id) => self
                .entries
                .try_modify(|entries| {
                    let idx = entries.iter().position(|e| e.id == id)?;
                    let mut entry = append_version(entries[idx].clone(), result, now);
                    entry.original = prompt;
                    if let Some(tags) = tags {
                        entry.tags = tags;
                    }
                    if let Some(t) = &template {
                        if !entry.templates_used.contains(&t.id) {
                            entry.templates_used.push(t.id.clone());
                        }
                    }
                    entries[idx] = entry.clone();
                    Some(entry)
                })?
                .ok_or(SdkError::EntryNotFound(id))?,
            None => {
                let entry = Entry::new(
                    prompt,
                    result,
                    tags.unwrap_or_default(),
                    template.iter().map(|t| t.id.clone()).collect(),
                    now,
                );
                self.entries.try_upsert(&entry)?;
                entry
            }
        };

        info!(
            id = %entry.id,
            versions = entry.versions.len(),
            score = ?entry.score.map(|s| s.value()),
            "recorded optimization"
        );
        Ok(entry)
    }

    // ---- History ----

    /// Every entry, most recent first.
    pub fn history(&self) -> Vec<Entry> {
        self.entries.get_all()
    }

    /// Entries matching `query`; a blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<Entry> {
        search(query, &self.entries.get_all())
    }

    pub fn entry(&self, id: &str) -> SdkResult<Entry> {
        self.entries
            .get(id)
            .ok_or_else(|| SdkError::EntryNotFound(id.to_string()))
    }

    /// Insert or replace an entry as given.
    pub fn save_entry(&self, entry: &Entry) -> SdkResult<()> {
        if self.entries.upsert(entry) {
            Ok(())
        } else {
            Err(SdkError::Persist(format!("entry {}", entry.id)))
        }
    }

    /// Remove an entry. Returns whether one was removed.
    pub fn delete_entry(&self, id: &str) -> SdkResult<bool> {
        Ok(self.entries.try_delete(id)?)
    }

    /// Serialize the whole history with today's export file name.
    pub fn export(&self) -> SdkResult<ExportDocument> {
        let body = export_store(&self.entries)?;
        Ok(ExportDocument {
            file_name: export_file_name(Utc::now().date_naive()),
            body,
        })
    }

    /// Merge an exported document (as text) into the history.
    pub fn import(&self, text: &str) -> SdkResult<ImportReport> {
        let document = parse_document(text)?;
        self.import_value(&document)
    }

    pub fn import_value(&self, document: &Value) -> SdkResult<ImportReport> {
        Ok(import_into(&self.entries, document)?)
    }

    /// Word diff between two states of an entry, or between its latest
    /// stored version and the current result when `range` is `None`.
    pub fn compare(&self, id: &str, range: Option<(usize, usize)>) -> SdkResult<VersionComparison> {
        let entry = self.entry(id)?;
        let comparison = match range {
            Some((from, to)) => compare_versions(&entry, from, to)?,
            None => compare_latest(&entry)?,
        };
        Ok(comparison)
    }

    // ---- Templates ----

    pub fn list_templates(&self) -> Vec<Template> {
        self.templates.get_all()
    }

    pub fn template(&self, id: &str) -> SdkResult<Template> {
        self.templates
            .get(id)
            .ok_or_else(|| SdkError::TemplateNotFound(id.to_string()))
    }

    /// The content of a template, ready to use as a prompt.
    pub fn apply_template(&self, id: &str) -> SdkResult<String> {
        Ok(self.template(id)?.content)
    }

    pub fn save_template(&self, template: &Template) -> SdkResult<()> {
        if self.templates.upsert(template) {
            Ok(())
        } else {
            Err(SdkError::Persist(format!("template {}", template.id)))
        }
    }

    /// Store `content` as a new template named after the current count.
    pub fn save_as_template(&self, content: &str) -> SdkResult<Template> {
        if content.trim().is_empty() {
            return Err(SdkError::EmptyTemplate);
        }
        let name = format!("Template {}", self.templates.get_all().len() + 1);
        let template = Template::new(name, content, Timestamp::now());
        self.save_template(&template)?;
        Ok(template)
    }

    /// Remove a template. Returns whether one was removed.
    pub fn delete_template(&self, id: &str) -> SdkResult<bool> {
        Ok(self.templates.try_delete(id)?)
    }
}

/// Trim tags, drop empty ones and repeats, keep first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
