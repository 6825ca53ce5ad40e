//! Provisional ancestors: private-use letters for fill-in script nodes that
//! have no attested character of their own.

use lineage_core::{family::LetterFamily, script::ScriptRegistry};
use lineage_sources::{alphabet::AlphabetRow, private_use::PrivateUseRecord};
use tracing::{debug, info};

use crate::cognate::CognateTable;

/// What the synthesizer produced for one family.
#[derive(Debug, Clone, Default)]
pub struct Synthesis {
  /// New private-use characters, for the catalog.
  pub records:   Vec<PrivateUseRecord>,
  /// One standard alphabet per non-terminal script, synthesized letters
  /// included.
  pub alphabets: Vec<AlphabetRow>,
}

/// Fill in missing letters of every fill-in node of `family`, adding the
/// synthesized characters to `table` as it goes.
///
/// Nodes are visited deepest first, so a node's own synthesized letters count
/// as attested when its ancestor is considered.
pub fn synthesize(
  family: &LetterFamily,
  table: &mut CognateTable,
  scripts: &ScriptRegistry,
) -> Synthesis {
  let mut records = Vec::new();

  for (code, fill) in family.fill_in_order() {
    for (ordinal, letter) in (0..).zip(&family.letters) {
      if !table.chars(code, ordinal).is_empty() {
        continue;
      }
      let unconditional = fill.unconditional.iter().any(|l| l == letter);
      if !unconditional && !descendants_agree(family, table, code, ordinal) {
        continue;
      }
      let Some(ch) = family.synthesized_id(code, letter).and_then(char::from_u32) else {
        continue;
      };
      table.add_char(code, ordinal, ch);
      debug!(script = %code, %letter, id = ch as u32, "synthesized letter");
      records.push(PrivateUseRecord {
        id:               ch as u32,
        script_code:      code.to_owned(),
        name:             format!("{} LETTER {letter}", fill.label).to_uppercase(),
        general_category: "Lo".to_owned(),
      });
    }
  }

  let alphabets = table
    .scripts()
    .filter(|code| !family.is_terminal(code))
    .filter(|code| {
      let known = scripts.contains(code);
      if !known {
        debug!(family = %family.name, script = %code, "no alphabet for unregistered script");
      }
      known
    })
    .filter_map(|code| {
      let alphabet: String = table.script_chars(code).into_iter().collect();
      (!alphabet.is_empty())
        .then(|| AlphabetRow { script: scripts.label(code).to_owned(), alphabet })
    })
    .collect::<Vec<_>>();

  info!(
    family = %family.name,
    synthesized = records.len(),
    alphabets = alphabets.len(),
    "provisional ancestors synthesized"
  );
  Synthesis { records, alphabets }
}

/// Strictly more than half of the direct descendants that have any entry for
/// the letter show it.
fn descendants_agree(family: &LetterFamily, table: &CognateTable, code: &str, ordinal: u32) -> bool {
  let (mut with_entry, mut attested) = (0usize, 0usize);
  for child in family.children_of(code) {
    if let Some(cell) = table.cell(child, ordinal) {
      with_entry += 1;
      if cell.is_attested() {
        attested += 1;
      }
    }
  }
  attested * 2 > with_entry
}

#[cfg(test)]
mod tests {
  use lineage_core::{family::Families, script::Script};

  use super::*;
  use crate::cognate::LetterCell;

  fn family() -> LetterFamily {
    let doc = r#"
      [[family]]
      name = "mini"
      table_dir = "mini"
      letters = ["Ka", "Kha", "Ga"]
      terminal = ["Brah"]
      parents = { Qaag = "Brah", Deva = "Qaag", Beng = "Qaag", Shrd = "Qaag" }
      fill_in.Qaag = { label = "Gupta", block_start = 0xF0000, unconditional = ["Ga"] }
    "#;
    Families::from_toml(doc).unwrap().families.remove(0)
  }

  fn script(code: &str, name: Option<&str>) -> Script {
    Script {
      code:             code.into(),
      iso_id:           0,
      name:             name.map(Into::into),
      version_added:    None,
      subversion_added: None,
    }
  }

  fn scripts() -> ScriptRegistry {
    [
      script("Deva", Some("Devanagari")),
      script("Beng", Some("Bengali")),
      Script::private("Qaag").unwrap(),
    ]
    .into_iter()
    .collect()
  }

  fn cell(chars: &[char]) -> LetterCell { LetterCell { chars: chars.to_vec(), images: Vec::new() } }

  fn image() -> LetterCell { LetterCell { chars: Vec::new(), images: vec!["glyph.svg".into()] } }

  #[test]
  fn majority_of_descendants_with_entries_decides() {
    let family = family();
    let mut table = CognateTable::new("mini");
    // Ka: two of three descendants attest it, one through an image only.
    table.insert_cell("Deva", 0, cell(&['क']));
    table.insert_cell("Beng", 0, image());
    table.insert_cell("Shrd", 0, cell(&[]));
    // Kha: one of two, a tie, is not a majority.
    table.insert_cell("Deva", 1, cell(&['ख']));
    table.insert_cell("Beng", 1, cell(&[]));

    let synthesis = synthesize(&family, &mut table, &scripts());
    let ids: Vec<u32> = synthesis.records.iter().map(|r| r.id).collect();
    // Ga has no entries at all but is unconditional.
    assert_eq!(ids, vec![0xF0000, 0xF0002]);
    assert_eq!(synthesis.records[0].name, "GUPTA LETTER KA");
    assert_eq!(synthesis.records[0].script_code, "Qaag");
    assert_eq!(synthesis.records[0].general_category, "Lo");
    assert_eq!(table.chars("Qaag", 0), &['\u{F0000}']);
    assert!(table.chars("Qaag", 1).is_empty());
  }

  #[test]
  fn attested_fill_in_letters_are_left_alone() {
    let family = family();
    let mut table = CognateTable::new("mini");
    table.insert_cell("Qaag", 2, cell(&['\u{11013}']));
    let synthesis = synthesize(&family, &mut table, &scripts());
    assert!(synthesis.records.is_empty());
  }

  #[test]
  fn alphabets_list_non_terminal_registered_scripts() {
    let family = family();
    let mut table = CognateTable::new("mini");
    table.insert_cell("Brah", 0, cell(&['𑀓']));
    table.insert_cell("Deva", 0, cell(&['क']));
    table.insert_cell("Deva", 1, cell(&['ख']));
    table.insert_cell("Beng", 0, cell(&['ক']));
    table.insert_cell("Shrd", 0, cell(&['𑆑']));

    let synthesis = synthesize(&family, &mut table, &scripts());
    let rows: Vec<(&str, &str)> =
      synthesis.alphabets.iter().map(|r| (r.script.as_str(), r.alphabet.as_str())).collect();
    assert_eq!(rows, vec![
      ("Bengali", "ক"),
      ("Devanagari", "कख"),
      ("Qaag", "\u{F0000}\u{F0001}\u{F0002}"),
    ]);
  }
}
