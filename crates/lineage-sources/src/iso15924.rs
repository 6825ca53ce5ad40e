//! The ISO 15924 script registry (`iso15924.csv`).

use lineage_core::script::Script;

use crate::{
  csv::Table,
  error::{Error, Result},
};

const COLUMNS: [&str; 5] =
  ["Code", "ISO ID", "Unicode Alias", "Unicode Version", "Unicode Subversion"];

pub fn parse(input: &str) -> Result<Vec<Script>> {
  let table = Table::parse(input)?;
  table.require(&COLUMNS[..2])?;

  table
    .records()
    .map(|record| {
      let line = record.line();
      let code = record
        .value("Code")
        .ok_or_else(|| Error::malformed(line, "script code", ""))?;
      let iso_id = record.value("ISO ID").unwrap_or_default();
      let iso_id =
        iso_id.parse().map_err(|_| Error::malformed(line, "ISO script number", iso_id))?;
      Ok(Script {
        code: code.to_owned(),
        iso_id,
        name: record.value("Unicode Alias").map(str::to_owned),
        version_added: number(line, record.value("Unicode Version"))?,
        subversion_added: number(line, record.value("Unicode Subversion"))?,
      })
    })
    .collect()
}

fn number(line: usize, cell: Option<&str>) -> Result<Option<u32>> {
  cell
    .map(|v| v.parse().map_err(|_| Error::malformed(line, "Unicode version", v)))
    .transpose()
}
