//! `private_use.csv`: project-defined characters in the private-use areas.

use crate::{
  csv::Table,
  error::{Error, Result},
  parse_scalar,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateUseRecord {
  pub id:               u32,
  pub script_code:      String,
  pub name:             String,
  pub general_category: String,
}

pub fn parse(input: &str) -> Result<Vec<PrivateUseRecord>> {
  let table = Table::parse(input)?;
  table.require(&["Id", "Script Code", "Name", "General Category"])?;

  table
    .records()
    .map(|record| {
      let line = record.line();
      let id = record.value("Id").unwrap_or_default();
      Ok(PrivateUseRecord {
        id:               parse_scalar(id)
          .ok_or_else(|| Error::InvalidCodePoint { line, value: id.to_owned() })?,
        script_code:      required(&record, "Script Code")?,
        name:             required(&record, "Name")?,
        general_category: required(&record, "General Category")?,
      })
    })
    .collect()
}

fn required(record: &crate::csv::Record<'_>, column: &'static str) -> Result<String> {
  record
    .value(column)
    .map(str::to_owned)
    .ok_or_else(|| Error::malformed(record.line(), column, ""))
}
