//! Recording transport for handler tests.

use crate::bot::transport::ChatTransport;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use teloxide::types::MessageId;

/// One call made against [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Send { text: String, with_menu: bool },
    Edit { msg_id: MessageId, text: String },
    Video { path: PathBuf, file_name: String, existed: bool },
    Delete { msg_id: MessageId },
}

/// Transport that records every call and hands out increasing message ids
#[derive(Default)]
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    fail_sends: bool,
    fail_uploads: bool,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    pub(crate) fn failing_sends() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(crate) fn uploads(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Video { .. }))
            .collect()
    }

    pub(crate) fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        calls.push(call);
        calls.len()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, text: &str, with_menu: bool) -> Result<MessageId> {
        if self.fail_sends {
            bail!("Telegram send error: network unreachable");
        }
        let n = self.record(Call::Send {
            text: text.to_string(),
            with_menu,
        });
        Ok(MessageId(i32::try_from(n)?))
    }

    async fn edit_text(&self, msg_id: MessageId, text: &str) -> Result<()> {
        self.record(Call::Edit {
            msg_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_video(&self, path: &Path, file_name: &str) -> Result<()> {
        self.record(Call::Video {
            path: path.to_path_buf(),
            file_name: file_name.to_string(),
            existed: path.is_file(),
        });
        if self.fail_uploads {
            bail!("Request Entity Too Large");
        }
        Ok(())
    }

    async fn delete_message(&self, msg_id: MessageId) -> Result<()> {
        self.record(Call::Delete { msg_id });
        Ok(())
    }
}
