use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::names::title_case;

/// Descriptive content for one entity, keyed by entity name in the document.
/// All fields are optional; the page renders whatever is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

/// One project card inside an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Contact block inside an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// External link inside an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub url: String,
}

/// Content resolved for presentation — always has a title and a short text,
/// generated from the entity name when the document has nothing.
#[derive(Debug)]
pub struct ResolvedContent<'a> {
    pub title: String,
    pub short: String,
    pub entry: Option<&'a ContentEntry>,
}

/// Identity-keyed descriptive content shown in overlays.
///
/// Built once from generated per-body defaults, shallow-merged with an
/// optionally fetched external document, then editable through the JSON
/// editor. In-memory only; persistence is a user-initiated export.
#[derive(Debug, Default)]
pub struct ContentStore {
    entries: HashMap<String, ContentEntry>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store with a generated default entry per entity name.
    pub fn from_defaults<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries = HashMap::new();
        for name in names {
            let title = title_case(name);
            let entry = ContentEntry {
                short: Some(format!("Project section for {title}.")),
                title: Some(title),
                ..ContentEntry::default()
            };
            entries.insert(name.to_string(), entry);
        }
        Self { entries }
    }

    /// Shallow-merge an external document over the current entries: each key
    /// present in the document replaces that key's entry wholesale, other
    /// keys are untouched. Returns how many entries were replaced or added.
    pub fn merge_document(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let incoming: HashMap<String, ContentEntry> = serde_json::from_str(json)?;
        let count = incoming.len();
        for (key, entry) in incoming {
            self.entries.insert(key, entry);
        }
        Ok(count)
    }

    /// Replace the whole document (editor "apply"). On parse failure the
    /// store is left unchanged and the error is returned for inline display.
    pub fn apply_document(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let incoming: HashMap<String, ContentEntry> = serde_json::from_str(json)?;
        self.entries = incoming;
        Ok(())
    }

    /// Pretty-printed document for the editor textarea and for download.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    pub fn get(&self, name: &str) -> Option<&ContentEntry> {
        self.entries.get(name)
    }

    /// Resolve presentable content for an entity, generating a title and
    /// short description when the document has no usable entry.
    pub fn resolve(&self, name: &str) -> ResolvedContent<'_> {
        let entry = self.entries.get(name);
        let title = entry
            .and_then(|e| e.title.clone())
            .unwrap_or_else(|| title_case(name));
        let short = entry
            .and_then(|e| e.short.clone())
            .unwrap_or_else(|| format!("Project section for {title}."));
        ResolvedContent { title, short, entry }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
