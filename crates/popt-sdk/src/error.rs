use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("please enter a prompt to optimize")]
    EmptyPrompt,

    #[error("template content is empty")]
    EmptyTemplate,

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("failed to persist {0}")]
    Persist(String),

    #[error(transparent)]
    Completion(#[from] popt_complete::CompletionError),

    #[error(transparent)]
    Transfer(#[from] popt_history::TransferError),

    #[error(transparent)]
    Diff(#[from] popt_diff::DiffError),

    #[error("store error: {0}")]
    Store(#[from] popt_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
