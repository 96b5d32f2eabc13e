//! Search shards: decoding the generator's per-letter index files.

use super::normalize::{leading_char, normalize, unescape_html};
use crate::error::LoadError;
use crate::script;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// One concrete destination for a search entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchTarget {
    pub url: String,
    pub anchor: Option<String>,
    /// Disambiguates identical names, e.g. the group or page an entry belongs to.
    pub group_label: Option<String>,
}

impl SearchTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anchor: None,
            group_label: None,
        }
    }

    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group_label = Some(group.into());
        self
    }

    /// The link as it would appear in an `href`: `url` or `url#anchor`.
    pub fn href(&self) -> String {
        match &self.anchor {
            Some(anchor) => format!("{}#{}", self.url, anchor),
            None => self.url.clone(),
        }
    }
}

/// A named documentation entity with one or more targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub id: String,
    pub display_name: String,
    /// `normalize(display_name)`; the key matched against and ordered by.
    pub sort_key: String,
    pub targets: Vec<SearchTarget>,
}

impl SearchEntry {
    pub fn new(id: impl Into<String>, display_name: &str, targets: Vec<SearchTarget>) -> Self {
        let display_name = unescape_html(display_name);
        Self {
            id: id.into(),
            sort_key: normalize(&display_name),
            display_name,
            targets,
        }
    }
}

/// An independently loaded partition of the search index.
#[derive(Debug, Clone, Default)]
pub struct SearchShard {
    label: String,
    entries: Vec<SearchEntry>,
    leads: BTreeSet<char>,
}

impl SearchShard {
    /// Builds a shard, ordering entries by sort key.
    ///
    /// The sort is stable, so entries sharing a key keep the generator's order.
    pub fn new(label: impl Into<String>, mut entries: Vec<SearchEntry>) -> Self {
        let label = label.into();
        entries.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
        let mut leads = label_lead(&label).into_iter().collect::<BTreeSet<_>>();
        leads.extend(entries.iter().filter_map(|entry| leading_char(&entry.sort_key)));
        Self {
            label,
            entries,
            leads,
        }
    }

    /// A shard whose data could not be loaded.
    ///
    /// It still claims the letter named by its label, so queries for that letter find
    /// nothing instead of falling back to a scan of every shard.
    pub fn empty(label: impl Into<String>) -> Self {
        Self::new(label, Vec::new())
    }

    /// Decodes a shard from a data file (`var searchData = [...]` or a bare JSON array).
    pub fn parse(label: impl Into<String>, origin: &str, text: &str) -> Result<Self, LoadError> {
        let records: Vec<Value> = script::parse(text, origin, None)?;
        let entries = records
            .iter()
            .enumerate()
            .map(|(position, record)| {
                decode_record(record).map_err(|reason| LoadError::Record {
                    origin: origin.to_string(),
                    position,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(label, entries))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Normalized leading characters this shard answers for.
    pub fn leads(&self) -> &BTreeSet<char> {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A label like `p` or `P` names the letter a shard holds; longer labels name nothing.
fn label_lead(label: &str) -> Option<char> {
    let normalized = normalize(label);
    let mut chars = normalized.chars();
    match (chars.next(), chars.next()) {
        (Some(lead), None) => Some(lead),
        _ => None,
    }
}

/// Decodes one record in either accepted shape:
///
/// - `[id, name, targets]` where `targets` is `[[url, anchor?, group?], ...]` or a single
///   `[url, anchor?]`
/// - `[id, [name, [link, flag, scope], ...]]`, the generator's own layout
fn decode_record(record: &Value) -> Result<SearchEntry, String> {
    let fields = record.as_array().ok_or("record is not an array")?;
    let id = match fields.first() {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err("record has no id".to_string()),
    };

    let (name, targets) = match fields.as_slice() {
        [_, Value::String(name), targets] => (name.as_str(), decode_targets(targets)?),
        [_, Value::Array(body)] => {
            let (name, targets) = body.split_first().ok_or("record body is empty")?;
            let name = name.as_str().ok_or("display name is not a string")?;
            let targets = targets
                .iter()
                .map(decode_linked_target)
                .collect::<Result<Vec<_>, _>>()?;
            (name, targets)
        }
        _ => return Err(format!("unrecognized record layout with {} fields", fields.len())),
    };

    if targets.is_empty() {
        return Err(format!("entry '{}' has no targets", name));
    }
    Ok(SearchEntry::new(id, name, targets))
}

fn decode_targets(value: &Value) -> Result<Vec<SearchTarget>, String> {
    let items = value.as_array().ok_or("targets is not an array")?;
    match items.first() {
        // Single-target shorthand: `[url, anchor?]`
        Some(Value::String(_)) => Ok(vec![decode_target(items)?]),
        _ => items
            .iter()
            .map(|item| {
                item.as_array()
                    .ok_or_else(|| "target is not an array".to_string())
                    .and_then(|fields| decode_target(fields))
            })
            .collect(),
    }
}

fn decode_target(fields: &[Value]) -> Result<SearchTarget, String> {
    let url = fields
        .first()
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .ok_or("target has no url")?;
    Ok(SearchTarget {
        url: url.to_string(),
        anchor: optional_string(fields.get(1))?,
        group_label: optional_string(fields.get(2))?,
    })
}

/// `[link, flag, scope]` where `link` is relative to the search directory and may
/// carry its anchor.
fn decode_linked_target(value: &Value) -> Result<SearchTarget, String> {
    let fields = value.as_array().ok_or("target is not an array")?;
    let link = fields
        .first()
        .and_then(Value::as_str)
        .ok_or("target has no link")?;
    let link = link.strip_prefix("../").unwrap_or(link);
    let (url, anchor) = match link.split_once('#') {
        Some((url, anchor)) => (url, Some(anchor).filter(|a| !a.is_empty())),
        None => (link, None),
    };
    if url.is_empty() {
        return Err("target has no url".to_string());
    }

    Ok(SearchTarget {
        url: url.to_string(),
        anchor: anchor.map(str::to_string),
        group_label: optional_string(fields.get(2))?,
    })
}

/// Missing, `null` and `""` all mean absent.
fn optional_string(value: Option<&Value>) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!("expected a string or null, found {}", other)),
    }
}
