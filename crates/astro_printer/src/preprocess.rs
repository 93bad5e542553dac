//! Style preprocessing.
//!
//! Hands every hoisted `<style>` to an asynchronous, caller-supplied
//! transform (Sass, PostCSS, ...) before printing. All transforms are in
//! flight at once and printing starts only after the last one settles.

use std::future::Future;

use futures::future::{BoxFuture, join_all};

use crate::ast::{AttributeType, Node, NodeKind};

/// One hoisted style handed to a [`PreprocessStyle`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleBlock {
    /// Position of the style in the document's hoisted styles.
    pub index: usize,
    /// The raw CSS text.
    pub content: String,
    /// Static attributes (`lang="scss"`, `is:global`, ...). Empty attributes
    /// have an empty value.
    pub attrs: Vec<(String, String)>,
}

/// A style transform failed. The style is left as written.
#[derive(Debug, thiserror::Error)]
#[error("style preprocessing failed: {message}")]
pub struct PreprocessStyleError {
    message: String,
}

impl PreprocessStyleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// `Ok(Some(code))` replaces the style text, `Ok(None)` leaves it alone.
pub type PreprocessStyleResult = Result<Option<String>, PreprocessStyleError>;

/// An asynchronous per-style transform.
///
/// Implemented for any `Fn(StyleBlock) -> impl Future<Output = PreprocessStyleResult>`.
pub trait PreprocessStyle: Send + Sync {
    fn preprocess(&self, block: StyleBlock) -> BoxFuture<'static, PreprocessStyleResult>;
}

impl<F, Fut> PreprocessStyle for F
where
    F: Fn(StyleBlock) -> Fut + Send + Sync,
    Fut: Future<Output = PreprocessStyleResult> + Send + 'static,
{
    fn preprocess(&self, block: StyleBlock) -> BoxFuture<'static, PreprocessStyleResult> {
        Box::pin(self(block))
    }
}

fn style_attrs(style: &Node) -> Vec<(String, String)> {
    style
        .attrs
        .iter()
        .filter(|attr| matches!(attr.kind, AttributeType::Quoted | AttributeType::Empty))
        .filter(|attr| !attr.is_implicit_marker())
        .map(|attr| (attr.qualified_name(), attr.val.clone()))
        .collect()
}

/// Run `preprocessor` over every hoisted style of `doc` concurrently and
/// write the results back into the style text.
///
/// Styles without text are not submitted. A skipped or failed transform
/// leaves its style unchanged. Returns the number of styles rewritten.
pub async fn preprocess_styles(doc: &mut Node, preprocessor: &dyn PreprocessStyle) -> usize {
    let tasks: Vec<_> = doc
        .styles
        .iter_mut()
        .enumerate()
        .filter_map(|(index, style)| {
            let attrs = style_attrs(style);
            let text = style
                .children
                .first_mut()
                .filter(|child| child.kind == NodeKind::Text && !child.data.is_empty())?;
            let pending = preprocessor.preprocess(StyleBlock {
                index,
                content: text.data.clone(),
                attrs,
            });
            Some(async move {
                match pending.await {
                    Ok(Some(code)) if !code.is_empty() => {
                        text.data = code;
                        true
                    }
                    Ok(_) => {
                        tracing::trace!(index, "style preprocessor skipped style");
                        false
                    }
                    Err(err) => {
                        tracing::warn!(index, %err, "keeping original style");
                        false
                    }
                }
            })
        })
        .collect();

    if tasks.is_empty() {
        return 0;
    }

    tracing::debug!(styles = tasks.len(), "preprocessing styles");
    let replaced = join_all(tasks).await.into_iter().filter(|&replaced| replaced).count();
    tracing::debug!(replaced, "style preprocessing finished");
    replaced
}
