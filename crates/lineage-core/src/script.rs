//! Scripts (writing systems) and the in-memory script registry.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// ISO 15924 code for "unknown script"; the default owner of a code point.
pub const UNKNOWN_SCRIPT: &str = "Zzzz";

const UNKNOWN_SCRIPT_ISO_ID: u16 = 999;

/// A writing system as registered in ISO 15924.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
  /// Four-letter ISO 15924 code, e.g. `Latn`.
  pub code:             String,
  pub iso_id:           u16,
  /// Unicode property value alias, e.g. `Old_Italic`. `None` for codes that
  /// are project-private placeholders.
  pub name:             Option<String>,
  pub version_added:    Option<u32>,
  pub subversion_added: Option<u32>,
}

impl Script {
  /// The `Zzzz` sentinel script.
  pub fn unknown() -> Self {
    Self {
      code:             UNKNOWN_SCRIPT.to_owned(),
      iso_id:           UNKNOWN_SCRIPT_ISO_ID,
      name:             Some("Unknown".to_owned()),
      version_added:    None,
      subversion_added: None,
    }
  }

  /// A nameless script for a code in the ISO private-use range
  /// (`Qaaa..Qabx`). Returns `None` for any other code.
  pub fn private(code: &str) -> Option<Self> {
    Some(Self {
      code:             code.to_owned(),
      iso_id:           private_iso_id(code)?,
      name:             None,
      version_added:    None,
      subversion_added: None,
    })
  }

  /// Unicode name when known, otherwise the code.
  pub fn label(&self) -> &str { self.name.as_deref().unwrap_or(&self.code) }
}

/// ISO number of a private-use script code: `Qaaa` is 900, `Qabx` is 949.
pub fn private_iso_id(code: &str) -> Option<u16> {
  let rest = code.strip_prefix("Qa")?;
  let mut chars = rest.chars();
  let (hi, lo) = (chars.next()?, chars.next()?);
  if chars.next().is_some() || !('a'..='b').contains(&hi) || !lo.is_ascii_lowercase() {
    return None;
  }
  let offset = (hi as u16 - 'a' as u16) * 26 + (lo as u16 - 'a' as u16);
  (offset <= 49).then_some(900 + offset)
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// All known scripts, indexed by code and by Unicode name.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
  scripts: BTreeMap<String, Script>,
  by_name: HashMap<String, String>,
}

impl ScriptRegistry {
  pub fn new() -> Self { Self::default() }

  /// Insert or replace a script. A later script with the same code replaces
  /// the earlier one, name index included.
  pub fn insert(&mut self, script: Script) {
    if let Some(old) = self.scripts.get(&script.code)
      && let Some(old_name) = &old.name
    {
      self.by_name.remove(old_name);
    }
    if let Some(name) = &script.name {
      self.by_name.insert(name.clone(), script.code.clone());
    }
    self.scripts.insert(script.code.clone(), script);
  }

  /// Insert `script` only if its code is not registered yet.
  pub fn ensure(&mut self, script: Script) -> bool {
    if self.scripts.contains_key(&script.code) {
      return false;
    }
    self.insert(script);
    true
  }

  pub fn get(&self, code: &str) -> Option<&Script> { self.scripts.get(code) }

  pub fn contains(&self, code: &str) -> bool { self.scripts.contains_key(code) }

  /// Look up a script code by its Unicode name (`Scripts.txt` spelling).
  pub fn code_for_name(&self, name: &str) -> Option<&str> {
    self.by_name.get(name).map(String::as_str)
  }

  /// Resolve a label used in resource files: Unicode name first, then code.
  pub fn resolve(&self, label: &str) -> Option<&Script> {
    self
      .code_for_name(label)
      .and_then(|code| self.scripts.get(code))
      .or_else(|| self.scripts.get(label))
  }

  /// Display label for a code: the Unicode name if known, else the code.
  pub fn label<'a>(&'a self, code: &'a str) -> &'a str {
    self.get(code).map_or(code, Script::label)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Script> { self.scripts.values() }

  pub fn len(&self) -> usize { self.scripts.len() }

  pub fn is_empty(&self) -> bool { self.scripts.is_empty() }
}

impl FromIterator<Script> for ScriptRegistry {
  fn from_iter<I: IntoIterator<Item = Script>>(iter: I) -> Self {
    let mut registry = Self::new();
    for script in iter {
      registry.insert(script);
    }
    registry
  }
}
