//! Resolve attachment names to media files on disk.
//!
//! WhatsApp exports ship attachments in the same folder as the `.txt` file,
//! so by default the resolver looks next to the export.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::Message;
use crate::message::MessageKind;

/// An attachment referenced by a message and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRef {
    pub name: String,
    pub kind: MessageKind,
    /// `None` when the file is not present in the media folder.
    pub path: Option<PathBuf>,
}

impl MediaRef {
    pub fn is_missing(&self) -> bool {
        self.path.is_none()
    }
}

/// Looks up attachment files inside one media folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResolver {
    root: PathBuf,
}

impl MediaResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses the directory that contains the chat export.
    pub fn for_chat_file(chat_file: &Path) -> Self {
        let root = chat_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        tracing::debug!(root = %root.display(), "media folder set");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the full path of `name` if it exists in the media folder.
    ///
    /// Names that would escape the folder (absolute paths, `..`, nested
    /// directories) are refused.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim();
        if !is_plain_file_name(name) {
            tracing::warn!(name, "refusing attachment name outside the media folder");
            return None;
        }

        let path = self.root.join(name);
        if path.is_file() {
            Some(path)
        } else {
            tracing::debug!(path = %path.display(), "media file not found");
            None
        }
    }

    /// Resolves the attachment of `message`, if it has one.
    pub fn resolve_message(&self, message: &Message) -> Option<MediaRef> {
        let name = message.attachment.as_deref()?;
        Some(MediaRef {
            name: name.to_string(),
            kind: message.kind,
            path: self.resolve(name),
        })
    }
}

fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
