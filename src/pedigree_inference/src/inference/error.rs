use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Failed to build the inference thread pool")]
    BuildThreadPool(#[source] rayon::ThreadPoolBuildError),

    #[error("Invalid progress bar template")]
    ProgressTemplate(#[source] indicatif::style::TemplateError),
}
