//! Directory entries and their normalized shape

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Entry as returned by the wire protocol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    /// Distinguished name
    pub dn: String,
    /// Attribute values keyed by attribute name, in server casing
    pub attrs: HashMap<String, Vec<String>>,
}

impl RawEntry {
    /// Entry without attributes
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: HashMap::new(),
        }
    }

    /// Add values for an attribute
    #[must_use]
    pub fn with_attr<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attrs
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }
}

impl From<ldap3::SearchEntry> for RawEntry {
    fn from(entry: ldap3::SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attrs: entry.attrs,
        }
    }
}

/// Normalized attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Attribute with exactly one value
    Single(String),
    /// Attribute with two or more values, in server order
    Multi(Vec<String>),
}

impl AttributeValue {
    /// First value
    pub fn first(&self) -> &str {
        match self {
            Self::Single(value) => value,
            Self::Multi(values) => values.first().map_or("", String::as_str),
        }
    }

    /// All values
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multi(values) => values,
        }
    }
}

/// Entry with lowercased keys, bookkeeping removed and single values collapsed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedEntry {
    /// Distinguished name
    pub dn: String,
    /// Attributes keyed by lowercase name
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl NormalizedEntry {
    /// Attribute by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(&name.to_ascii_lowercase())
    }

    /// First value of an attribute
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).map(AttributeValue::first)
    }
}

fn is_bookkeeping_key(key: &str) -> bool {
    key == "count" || (!key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()))
}

/// Normalize a raw entry
///
/// Keys are lowercased and keys differing only in case are merged. `count`
/// and purely numeric keys are dropped, as are attributes without any
/// non-empty value.
pub fn normalize(raw: RawEntry) -> NormalizedEntry {
    let mut keys: Vec<String> = raw.attrs.keys().cloned().collect();
    keys.sort();

    let mut attrs = raw.attrs;
    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for key in keys {
        let lowered = key.to_ascii_lowercase();
        if is_bookkeeping_key(&lowered) {
            continue;
        }
        let values = attrs.remove(&key).unwrap_or_default();
        merged
            .entry(lowered)
            .or_default()
            .extend(values.into_iter().filter(|v| !v.is_empty()));
    }

    let attributes = merged
        .into_iter()
        .filter_map(|(key, mut values)| match values.len() {
            0 => None,
            1 => values.pop().map(|v| (key, AttributeValue::Single(v))),
            _ => Some((key, AttributeValue::Multi(values))),
        })
        .collect();

    NormalizedEntry {
        dn: raw.dn,
        attributes,
    }
}

/// Employee view of a directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LdapPerson {
    /// Directory mail address
    pub mail: String,
    /// Common name
    pub cn: Option<String>,
    /// Job title
    pub title: Option<String>,
    /// Tracker login, `mail` when the entry has none
    pub bugzilla_email: String,
    /// Employee type (e.g. `Employee`, `Contractor`)
    pub employee_type: Option<String>,
}

impl LdapPerson {
    /// Map a normalized entry; entries without `mail` yield `None`
    pub fn from_entry(entry: &NormalizedEntry) -> Option<Self> {
        let mail = entry.first("mail").filter(|m| !m.is_empty())?.to_string();
        let text = |name: &str| entry.first(name).map(str::to_string);

        Some(Self {
            bugzilla_email: text("bugzillaemail").unwrap_or_else(|| mail.clone()),
            cn: text("cn"),
            title: text("title"),
            employee_type: text("employeetype"),
            mail,
        })
    }
}
