use std::path::{Path, PathBuf};

use lineage_core::{
  code_point::NO_PARENT,
  derivation::{CertaintyType, DerivationEdge, DerivationType},
  store::LineageStore,
};
use lineage_loader::{
  Database, Error, LineageConfig, LoadOptions,
  derive::{CASE_SOURCE, COGNATE_SOURCE, DECOMPOSITION_SOURCE},
};
use lineage_sources::alphabet;
use lineage_store_sqlite::Cell;
use tempfile::TempDir;

const FAMILIES: &str = r#"
independent_scripts = ["Vaii"]

[[family]]
name      = "mini"
table_dir = "mini-letters"
letters   = ["Ka", "Kha"]
terminal  = ["Brah"]
parents   = { Qaag = "Brah", Deva = "Qaag", Beng = "Qaag" }
aliases   = { gupt = "Qaag" }
fill_in.Qaag = { label = "Gupta", block_start = 0xF0000 }
"#;

const ISO15924: &str = "\
Code,ISO ID,Unicode Alias,Unicode Version,Unicode Subversion
Beng,325,Bengali,1,1
Brah,300,Brahmi,6,0
Deva,315,Devanagari,1,1
Latn,215,Latin,1,1
Vaii,470,Vai,5,1
Zinh,994,Inherited,,
Zyyy,998,Common,,
";

const SCRIPTS: &str = "\
# Scripts.txt excerpt
0020          ; Common # Zs       SPACE
002E          ; Common # Po       FULL STOP
2025          ; Common # Po       TWO DOT LEADER
0041..0042    ; Latin # L&   [2] LATIN CAPITAL LETTER A..LATIN CAPITAL LETTER B
0061..0062    ; Latin # L&   [2] LATIN SMALL LETTER A..LATIN SMALL LETTER B
00C5          ; Latin # L&       LATIN CAPITAL LETTER A WITH RING ABOVE
212B          ; Latin # L&       ANGSTROM SIGN
030A          ; Inherited # Mn       COMBINING RING ABOVE
0915..0916    ; Devanagari # Lo   [2] DEVANAGARI LETTER KA..DEVANAGARI LETTER KHA
0995..0996    ; Bengali # Lo   [2] BENGALI LETTER KA..BENGALI LETTER KHA
A500..A501    ; Vai # Lo   [2] VAI SYLLABLE EE..VAI SYLLABLE EEN
11013..11014  ; Brahmi # Lo   [2] BRAHMI LETTER KA..BRAHMI LETTER KHA
";

const UNICODE_DATA: &str = "\
0020;SPACE;Zs;0;WS;;;;;N;;;;;
002E;FULL STOP;Po;0;CS;;;;;N;PERIOD;;;;
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0042;LATIN CAPITAL LETTER B;Lu;0;L;;;;;N;;;;0062;
0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041
0062;LATIN SMALL LETTER B;Ll;0;L;;;;;N;;;0042;;0042
00C5;LATIN CAPITAL LETTER A WITH RING ABOVE;Lu;0;L;0041 030A;;;;N;;;;;
030A;COMBINING RING ABOVE;Mn;230;NSM;;;;;N;NON-SPACING RING ABOVE;;;;
0915;DEVANAGARI LETTER KA;Lo;0;L;;;;;N;;;;;
0916;DEVANAGARI LETTER KHA;Lo;0;L;;;;;N;;;;;
0995;BENGALI LETTER KA;Lo;0;L;;;;;N;;;;;
0996;BENGALI LETTER KHA;Lo;0;L;;;;;N;;;;;
2025;TWO DOT LEADER;Po;0;ON;<compat> 002E 002E;;;;N;;;;;
212B;ANGSTROM SIGN;Lu;0;L;00C5;;;;N;ANGSTROM UNIT;;;;
A500;VAI SYLLABLE EE;Lo;0;L;;;;;N;;;;;
A501;VAI SYLLABLE EEN;Lo;0;L;;;;;N;;;;;
11013;BRAHMI LETTER KA;Lo;0;L;;;;;N;;;;;
11014;BRAHMI LETTER KHA;Lo;0;L;;;;;N;;;;;
";

const KA: &str = "{{Brahmic letter\n| brahcp = 11013\n| guptimg = Gupta ka.svg\n| devacp = 0915\n| bengcp = 0995\n}}\n";
const KHA: &str = "{{Brahmic letter\n| brahcp = 11014\n| devacp = 0916\n| bengcp =\n}}\n";

const DEFAULTS: &str = "\
Script,Source,Derivation Type,Certainty Type,Notes
Latin,Alphabet book,,Likely,
";

const LATIN: &str = "\
Child,Parent,Derivation Type,Certainty Type,Source,Notes
B,A,,Assumed,,
\u{C5},A,Copy,,,Ring added
";

const RING: u32 = 0xC5;
const SYNTHESIZED_KA: u32 = 0xF0000;

// ─── Fixture ─────────────────────────────────────────────────────────────────

struct Fixture {
  dir: TempDir,
}

impl Fixture {
  fn empty() -> Self { Self { dir: tempfile::tempdir().unwrap() } }

  fn full() -> Self {
    let fixture = Self::empty();
    fixture.write("families.toml", FAMILIES);
    fixture.write("resource/iso15924.csv", ISO15924);
    fixture.write("resource/unicode-data/Scripts.txt", SCRIPTS);
    fixture.write("resource/unicode-data/UnicodeData.txt", UNICODE_DATA);
    fixture.write("resource/standard_alphabets.csv", "Script,Alphabet\nLatin,AB\n");
    fixture.write("resource/wikipedia-sourced/mini-letters/Ka.txt", KA);
    fixture.write("resource/wikipedia-sourced/mini-letters/Kha.txt", KHA);
    fixture.write("resource/derivations/defaults.csv", DEFAULTS);
    fixture.write("resource/derivations/Latin.csv", LATIN);
    for name in ["Total derivation statistics.sql", "Get Character Ancestors.sql"] {
      let sql = std::fs::read_to_string(workspace_queries().join(name)).unwrap();
      fixture.write(&format!("queries/{name}"), &sql);
    }
    fixture
  }

  fn path(&self, rel: &str) -> PathBuf { self.dir.path().join(rel) }

  fn write(&self, rel: &str, body: &str) {
    let path = self.path(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
  }

  fn config(&self) -> LineageConfig {
    LineageConfig {
      store_path:    self.path("lineage.db"),
      resource_path: self.path("resource"),
      query_path:    self.path("queries"),
      families_path: self.path("families.toml").exists().then(|| self.path("families.toml")),
    }
  }

  fn open(&self) -> Database { Database::open(&self.config()).unwrap() }
}

fn workspace_queries() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("../../queries")
}

fn production() -> LoadOptions { LoadOptions { force_overwrite: true, ..Default::default() } }

fn verifying() -> LoadOptions {
  LoadOptions { force_overwrite: true, verify: true, ..Default::default() }
}

fn edges(db: &Database) -> Vec<DerivationEdge> { db.store().derivations().unwrap() }

fn edge(edges: &[DerivationEdge], child: u32, parent: u32) -> Vec<&DerivationEdge> {
  edges.iter().filter(|e| e.child == child && e.parent == parent).collect()
}

// ─── Loads ───────────────────────────────────────────────────────────────────

#[test]
fn full_load_combines_every_source() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  let report = db.load(&production()).unwrap();
  let edges = edges(&db);
  assert_eq!(report.edges, edges.len());
  assert_eq!(edges.len(), 12, "{edges:#?}");

  let [case] = edge(&edges, 'a' as u32, 'A' as u32)[..] else { panic!("no case edge") };
  assert_eq!(case.source.as_deref(), Some(CASE_SOURCE));
  assert!(edge(&edges, 'A' as u32, 'a' as u32).is_empty());

  let [angstrom] = edge(&edges, 0x212B, RING)[..] else { panic!("no singleton edge") };
  assert_eq!(angstrom.derivation_type, DerivationType::Duplicate);
  assert_eq!(angstrom.source.as_deref(), Some(DECOMPOSITION_SOURCE));

  let [cognate] = edge(&edges, 0x995, SYNTHESIZED_KA)[..] else { panic!("no cognate edge") };
  assert_eq!(cognate.source.as_deref(), Some(COGNATE_SOURCE));
  assert_eq!(edge(&edges, SYNTHESIZED_KA, 0x11013).len(), 1);
  assert!(edge(&edges, 0x916, 0x11014).is_empty());
}

#[test]
fn curated_rows_supersede_and_default() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  db.load(&production()).unwrap();
  let edges = edges(&db);

  // the curated Copy replaces the automated decomposition edge to A only
  let [ring] = edge(&edges, RING, 'A' as u32)[..] else { panic!("no curated ring edge") };
  assert_eq!(ring.derivation_type, DerivationType::Copy);
  assert_eq!(ring.certainty, CertaintyType::Likely);
  assert_eq!(ring.source.as_deref(), Some("Alphabet book"));
  assert_eq!(ring.notes.as_deref(), Some("Ring added"));
  assert_eq!(edge(&edges, RING, 0x30A)[0].certainty, CertaintyType::Automated);

  let [assumed] = edge(&edges, 'B' as u32, 'A' as u32)[..] else { panic!("no assumed edge") };
  assert_eq!(assumed.certainty, CertaintyType::Assumed);
  assert_eq!(assumed.source, None);
}

#[test]
fn independent_scripts_only_point_at_the_sentinel() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  db.load(&production()).unwrap();
  let edges = edges(&db);
  for id in [0xA500, 0xA501] {
    let from: Vec<_> = edges.iter().filter(|e| e.child == id).collect();
    assert_eq!(from.len(), 1);
    assert_eq!(from[0].parent, NO_PARENT as u32);
    assert_eq!(from[0].certainty, CertaintyType::Automated);
  }
}

#[test]
fn repeated_decomposition_component_loads() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  db.load(&production()).unwrap();
  let rows = db
    .store()
    .query("SELECT order_num FROM decomposition_mapping WHERE code_point_id = ?1 ORDER BY 1", &[
      "8229".to_owned(),
    ])
    .unwrap();
  assert_eq!(rows.rows, vec![vec![Cell::Integer(1)], vec![Cell::Integer(2)]]);
  assert_eq!(edge(&edges(&db), 0x2025, 0x2E).len(), 1);
}

#[test]
fn synthesized_letters_are_catalogued_and_alphabetized() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  db.load(&production()).unwrap();

  let ka = db.store().code_point(SYNTHESIZED_KA).unwrap().unwrap();
  assert_eq!(ka.script_code, "Qaag");
  assert_eq!(ka.name.as_deref(), Some("GUPTA LETTER KA"));
  assert_eq!(ka.std_order, Some(1));
  // Kha is attested by only one of two descendants with an entry
  assert!(db.store().code_point(SYNTHESIZED_KA + 1).unwrap().is_none());

  let generated =
    std::fs::read_to_string(fixture.path("resource/generated/mini_alphabets.csv")).unwrap();
  let rows = alphabet::parse(&generated).unwrap();
  let rows: Vec<(&str, &str)> = rows.iter().map(|r| (r.script.as_str(), r.alphabet.as_str())).collect();
  assert_eq!(rows, vec![("Bengali", "ক"), ("Devanagari", "कख"), ("Qaag", "\u{F0000}")]);
}

#[test]
fn ordinals_number_each_alphabet_from_one() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  db.load(&production()).unwrap();
  let order = |id: u32| db.store().code_point(id).unwrap().unwrap().std_order;
  assert_eq!((order('A' as u32), order('B' as u32)), (Some(1), Some(2)));
  assert_eq!((order(0x915), order(0x916)), (Some(1), Some(2)));
  assert_eq!(order(0x995), Some(1));
  assert_eq!(order(0x996), None);
  assert_eq!(order(NO_PARENT as u32), None);
}

#[test]
fn forced_reloads_are_deterministic() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  let first = db.load(&production()).unwrap();
  let before = edges(&db);
  let second = db.load(&production()).unwrap();
  assert_eq!(first.fingerprint, second.fingerprint);
  assert_eq!(before, edges(&db));
}

// ─── Verification ────────────────────────────────────────────────────────────

#[test]
fn verification_load_reports_coverage_gaps() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  let report = db.load(&verifying()).unwrap();
  let gaps: Vec<(&str, &[char])> =
    report.coverage.iter().map(|g| (g.script_label.as_str(), g.missing.as_slice())).collect();
  assert_eq!(gaps, vec![("Latin", &['A'][..]), ("Devanagari", &['ख'][..])]);

  let text = db.debug_report(&report).unwrap();
  assert!(text.contains("Missing derivations from standard alphabet"));
  assert!(text.contains("Edges"), "{text}");
}

#[test]
fn verification_rejects_reciprocal_curated_pairs() {
  let fixture = Fixture::full();
  fixture.write("resource/derivations/Latin.csv", &format!("{LATIN}A,a,,,,\n"));
  let mut db = fixture.open();
  assert!(matches!(db.load(&verifying()), Err(Error::TwoCycle { .. })));

  // foreign keys are back on after a failed load
  let pragma = db.store().query("PRAGMA foreign_keys", &[]).unwrap();
  assert_eq!(pragma.rows, vec![vec![Cell::Integer(1)]]);

  // a production load takes the curated edge alongside the case edge
  db.load(&production()).unwrap();
  assert_eq!(edge(&edges(&db), 'A' as u32, 'a' as u32).len(), 1);
}

#[test]
fn self_derivation_is_fatal_only_when_verifying() {
  let fixture = Fixture::full();
  fixture.write("resource/derivations/Latin.csv", &format!("{LATIN}B,B,,,,\n"));
  let mut db = fixture.open();
  assert!(matches!(db.load(&verifying()), Err(Error::SelfDerivation { .. })));
  db.load(&production()).unwrap();
  assert!(edge(&edges(&db), 'B' as u32, 'B' as u32).is_empty());
}

#[test]
fn curated_child_from_another_script_is_fatal_when_verifying() {
  let fixture = Fixture::full();
  fixture.write("resource/derivations/Latin.csv", &format!("{LATIN}\u{915},A,,,,\n"));
  let mut db = fixture.open();
  assert!(matches!(db.load(&verifying()), Err(Error::WrongScript { .. })));
}

#[test]
fn blank_parent_row_is_a_single_uncertain_sentinel_edge() {
  let fixture = Fixture::empty();
  fixture.write("families.toml", "");
  fixture.write(
    "resource/iso15924.csv",
    "Code,ISO ID,Unicode Alias,Unicode Version,Unicode Subversion\nQaaa,900,,,\n",
  );
  fixture.write("resource/unicode-data/Scripts.txt", "");
  fixture.write("resource/unicode-data/UnicodeData.txt", "0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;0041;;\n");
  fixture.write("resource/derivations/Qaaa.csv", "Child,Parent,Derivation Type,Certainty Type,Source,Notes\nA,,,,,\n");

  let mut db = fixture.open();
  let report = db.load(&production()).unwrap();
  assert!(report.coverage.is_empty());
  let edges = edges(&db);
  assert_eq!(edges.len(), 1);
  let edge = &edges[0];
  assert_eq!((edge.child, edge.parent), ('A' as u32, NO_PARENT as u32));
  assert_eq!(edge.derivation_type, DerivationType::Derivation);
  assert_eq!(edge.certainty, CertaintyType::Uncertain);
  assert_eq!((edge.source.as_deref(), edge.notes.as_deref()), (None, None));
}

// ─── Saved queries ───────────────────────────────────────────────────────────

#[test]
fn saved_queries_run_against_the_loaded_graph() {
  let fixture = Fixture::full();
  let mut db = fixture.open();
  db.load(&production()).unwrap();

  let stats = db.saved_query("Total", &[]).unwrap();
  let total: i64 = stats
    .rows
    .iter()
    .map(|row| match row.last() {
      Some(Cell::Integer(n)) => *n,
      other => panic!("unexpected cell {other:?}"),
    })
    .sum();
  assert_eq!(total, 12);

  let ancestors = db.saved_query("Get Character Ancestors", &["ক".to_owned()]).unwrap();
  assert_eq!(ancestors.rows.len(), 2);
  let table = db.pretty_saved_query("Get", &["ক".to_owned()]).unwrap();
  assert!(table.contains("\u{2068}Child Text"), "{table}");

  assert!(matches!(db.saved_query("Missing", &[]), Err(Error::NoSuchQuery { .. })));
}
