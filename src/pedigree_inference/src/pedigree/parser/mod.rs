use std::{fs::File, io::Read, path::Path};

use located_error::prelude::*;
use log::{debug, trace};
use serde::Deserialize;

use super::Pedigree;
use crate::world::MAX_POPULATION;

mod error;
pub use error::PedigreeParserError;

/// A single line of the pedigree definition file: `name,mother,father,trait`
#[derive(Debug, Deserialize)]
struct PedigreeRecord {
    name    : String,
    mother  : Option<String>,
    father  : Option<String>,
    #[serde(rename = "trait")]
    observed: Option<String>,
}

impl PedigreeRecord {
    /// `Some("1")` -> present, `Some("0")` -> absent, `None` -> unknown.
    fn observed_trait(&self) -> Result<Option<bool>, PedigreeParserError> {
        match self.observed.as_deref() {
            None      => Ok(None),
            Some("1") => Ok(Some(true)),
            Some("0") => Ok(Some(false)),
            Some(value) => Err(PedigreeParserError::InvalidTrait{name: self.name.clone(), value: value.to_string()}),
        }
    }

    fn parents(&self) -> Result<Option<(&str, &str)>, PedigreeParserError> {
        match (self.mother.as_deref(), self.father.as_deref()) {
            (Some(mother), Some(father)) => Ok(Some((mother, father))),
            (None, None)                 => Ok(None),
            _                            => Err(PedigreeParserError::IncompleteParents(self.name.clone())),
        }
    }
}

/// Parse a pedigree definition file and return a `Pedigree` struct.
/// # Arguments:
/// - `path`: Path leading to the input pedigree definition file (csv format).
pub fn pedigree_parser(path: &Path) -> Result<Pedigree> {
    let loc_msg = || format!("While attempting to parse {}", path.display());
    let file = File::open(path).map_err(PedigreeParserError::OpenFile).with_loc(loc_msg)?;
    parse_pedigree(file).with_loc(loc_msg)
}

/// Line number of the record starting at `byte`. Blank lines preceding it are skipped.
fn line_at(contents: &str, byte: u64) -> usize {
    let bytes = contents.as_bytes();
    let start = usize::try_from(byte).map_or(bytes.len(), |byte| byte.min(bytes.len()));
    let skipped = bytes[start..].iter().take_while(|b| matches!(b, b'\r' | b'\n')).count();
    bytes[..start + skipped].iter().filter(|b| **b == b'\n').count() + 1
}

/// Parse a pedigree from any csv source, with the header `name,mother,father,trait`.
///
/// Parents may be defined after their offspring: individuals are first registered as founders, and
/// relationships are assigned during a second pass, once every name is known.
///
/// # Errors
/// - if a record is malformed, or carries an invalid trait value.
/// - if an individual is defined twice, or has a single parent.
/// - if a parent is missing from the file.
/// - if the pedigree exceeds `MAX_POPULATION` individuals.
pub fn parse_pedigree<R: Read>(mut input: R) -> Result<Pedigree> {
    let loc_msg = "While reading the pedigree definition file";
    let mut contents = String::new();
    input.read_to_string(&mut contents).map_err(PedigreeParserError::ReadFile).loc(loc_msg)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let headers = reader.headers()
        .map_err(|source| PedigreeParserError::ReadRecord{lineno: 1, source})
        .loc(loc_msg)?
        .clone();

    // ---- Gather every record, along with the line it starts at.
    let mut records = Vec::new();
    let mut raw = csv::StringRecord::new();
    loop {
        let next_byte = reader.position().byte();
        match reader.read_record(&mut raw) {
            Ok(true)  => {},
            Ok(false) => break,
            Err(source) => {
                let lineno = line_at(&contents, source.position().map_or(next_byte, csv::Position::byte));
                return Err(PedigreeParserError::ReadRecord{lineno, source}).loc(loc_msg)
            },
        }
        let lineno = line_at(&contents, raw.position().map_or(next_byte, csv::Position::byte));
        let record: PedigreeRecord = raw.deserialize(Some(&headers))
            .map_err(|source| PedigreeParserError::ReadRecord{lineno, source})
            .loc(loc_msg)?;
        trace!("line {lineno}: {record:?}");
        records.push((lineno, record));
    }

    if records.len() > MAX_POPULATION {
        return Err(PedigreeParserError::PopulationTooLarge{population: records.len(), max: MAX_POPULATION})
            .loc("While checking the size of the pedigree")
    }

    // ---- First pass: register individuals.
    let mut pedigree = Pedigree::new();
    for (lineno, record) in &records {
        let observed_trait = record.observed_trait().with_loc(|| format!("While parsing trait observations at line n°{lineno}"))?;
        pedigree.add_person(&record.name, None, observed_trait)
            .with_loc(|| PedigreeParserError::AddPerson(record.name.clone(), *lineno))?;
    }

    // ---- Second pass: assign parents.
    for (lineno, record) in &records {
        let Some((mother, father)) = record.parents().with_loc(|| format!("While parsing line n°{lineno}"))? else {
            continue
        };
        for parent in [mother, father] {
            if pedigree.get(parent).is_none() {
                return Err(PedigreeParserError::UnknownParent{child: record.name.clone(), parent: parent.to_string()})
                    .with_loc(|| format!("While parsing line n°{lineno}"))
            }
        }
        pedigree.set_parents(&record.name, (mother, father))?;
    }

    debug!("Pedigree:\n{pedigree}");
    Ok(pedigree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedigree::PedigreeError;
    use std::io::Write;

    fn parse(contents: &str) -> Result<Pedigree> {
        parse_pedigree(contents.as_bytes())
    }

    fn root_cause(err: &anyhow::Error) -> Option<&PedigreeParserError> {
        err.chain().find_map(|cause| cause.downcast_ref::<PedigreeParserError>())
    }

    #[test]
    fn parse_family() -> Result<()> {
        let pedigree = parse("name,mother,father,trait\nHarry,Lily,James,\nJames,,,1\nLily,,,0\n")?;
        assert_eq!(pedigree.len(), 3);
        let names: Vec<&str> = pedigree.iter().map(|(_, person)| person.name()).collect();
        assert_eq!(names, vec!["Harry", "James", "Lily"]);

        let harry = pedigree.get("Harry").expect("Harry should be defined");
        assert_eq!(harry.observed_trait(), None);
        let parents = harry.parents().expect("Harry should have parents");
        assert_eq!(pedigree.name(parents.mother), "Lily");
        assert_eq!(pedigree.name(parents.father), "James");

        assert_eq!(pedigree.get("James").and_then(|p| p.observed_trait()), Some(true));
        assert_eq!(pedigree.get("Lily").and_then(|p| p.observed_trait()), Some(false));
        Ok(())
    }

    #[test]
    fn whitespace_is_trimmed() -> Result<()> {
        let pedigree = parse("name, mother, father, trait\n Alice , , , 1 \n")?;
        assert_eq!(pedigree.get("Alice").and_then(|p| p.observed_trait()), Some(true));
        Ok(())
    }

    #[test]
    fn empty_pedigree() -> Result<()> {
        assert!(parse("name,mother,father,trait\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_trait() {
        let err = parse("name,mother,father,trait\nAlice,,,yes\n").expect_err("'yes' is not a valid trait");
        assert!(matches!(root_cause(&err), Some(PedigreeParserError::InvalidTrait{value, ..}) if value == "yes"));
    }

    #[test]
    fn incomplete_parents() {
        let err = parse("name,mother,father,trait\nAlice,,,\nBob,Alice,,\n").expect_err("Bob has a single parent");
        assert!(matches!(root_cause(&err), Some(PedigreeParserError::IncompleteParents(name)) if name == "Bob"));
    }

    #[test]
    fn unknown_parent() {
        let err = parse("name,mother,father,trait\nAlice,,,\nBob,Alice,Carl,\n").expect_err("Carl is undefined");
        assert!(matches!(root_cause(&err), Some(PedigreeParserError::UnknownParent{parent, ..}) if parent == "Carl"));
    }

    #[test]
    fn duplicate_person() {
        let err = parse("name,mother,father,trait\nAlice,,,\nAlice,,,1\n").expect_err("Alice is defined twice");
        let cause = err.chain().find_map(|cause| cause.downcast_ref::<PedigreeError>());
        assert!(matches!(cause, Some(PedigreeError::DuplicatePerson(name)) if name == "Alice"));
        assert!(format!("{err:?}").contains("line n°3"));
    }

    #[test]
    fn malformed_record() {
        let err = parse("name,mother,father,trait\nAlice,,\n").expect_err("Record has a missing field");
        assert!(matches!(root_cause(&err), Some(PedigreeParserError::ReadRecord{lineno: 2, ..})));
    }

    #[test]
    fn line_numbers_follow_the_file() {
        // Blank lines are skipped, and quoted fields may span several lines.
        let contents = "name,mother,father,trait\n\nJames,,,1\n\"Lily\nEvans\",,,0\n\nJames,,,\n";
        let err = parse(contents).expect_err("James is defined twice");
        assert!(format!("{err:?}").contains("line n°7"));

        let contents = "name,mother,father,trait\n\n\"Lily\nEvans\",,,0\nHarry,,\n";
        let err = parse(contents).expect_err("Harry's record has a missing field");
        assert!(matches!(root_cause(&err), Some(PedigreeParserError::ReadRecord{lineno: 5, ..})));

        let contents = "name,mother,father,trait\n\nHarry,,,maybe\n";
        let err = parse(contents).expect_err("'maybe' is not a valid trait");
        assert!(format!("{err:?}").contains("line n°3"));
    }

    #[test]
    fn population_too_large() {
        let mut contents = String::from("name,mother,father,trait\n");
        for i in 0..=MAX_POPULATION {
            contents.push_str(&format!("person{i},,,\n"));
        }
        let err = parse(&contents).expect_err("Pedigree is too large");
        assert!(matches!(root_cause(&err), Some(PedigreeParserError::PopulationTooLarge{..})));
    }

    #[test]
    fn parse_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "name,mother,father,trait\nAlice,,,\nBob,,,0")?;
        let pedigree = pedigree_parser(file.path())?;
        assert_eq!(pedigree.len(), 2);
        assert!(pedigree_parser(Path::new("./does/not/exist.csv")).is_err());
        Ok(())
    }
}
