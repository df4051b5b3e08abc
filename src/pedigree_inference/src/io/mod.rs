use std::{fs::File, io::{BufWriter, Write}, path::Path};

use itertools::Itertools;
use located_error::prelude::*;
use parser::OutputFormat;

use crate::posterior::Posteriors;

mod error;
pub use error::WriterError;

/// Field separator of the tsv output format.
pub const TSV_SEPARATOR: &str = "\t";

/// Column names of the tsv output format.
pub const TSV_HEADER: [&str; 6] = ["name", "gene_0", "gene_1", "gene_2", "trait_true", "trait_false"];

/// Posterior distributions writer.
/// - source: Boxed `BufWriter` (can either handle file-writing, or stdout).
pub struct PosteriorWriter<'a> {
    source: BufWriter<Box<dyn Write + 'a>>
}

impl<'a> PosteriorWriter<'a> {
    /// Instantiate a new `PosteriorWriter`. Writes to stdout if `path` is `None`.
    ///
    /// # Errors
    /// if `path` is either an invalid file, or the user does not have the proper
    /// UNIX permissions to write at this location.
    pub fn new(path: Option<impl AsRef<Path>>) -> Result<PosteriorWriter<'a>> {
        let source: Box<dyn Write + 'a> = match path {
            Some(path) => Box::new(File::create(path).map_err(WriterError::CreateFile).loc("While creating output file")?),
            None       => Box::new(std::io::stdout()),
        };
        Ok(Self::from_writer(source))
    }

    /// Instantiate a `PosteriorWriter` over any byte sink.
    pub fn from_writer(sink: impl Write + 'a) -> PosteriorWriter<'a> {
        PosteriorWriter{source: BufWriter::new(Box::new(sink))}
    }

    /// Write posterior distributions, using the requested format.
    ///
    /// # Errors
    /// - if any line fails to get written, or if the buffer cannot be flushed.
    pub fn write(&mut self, posteriors: &Posteriors, format: OutputFormat) -> Result<()> {
        let written = match format {
            OutputFormat::Report => write!(self.source, "{posteriors}"),
            OutputFormat::Tsv    => self.write_tsv(posteriors),
        };
        written.map_err(WriterError::IOError).loc("While writing posteriors")?;

        self.source.flush().map_err(WriterError::IOError).loc("While flushing buffer contents of PosteriorWriter")
    }

    fn write_tsv(&mut self, posteriors: &Posteriors) -> std::io::Result<()> {
        writeln!(self.source, "{}", TSV_HEADER.iter().join(TSV_SEPARATOR))?;
        for (name, posterior) in posteriors.iter() {
            let fields = [
                posterior.gene.zero,
                posterior.gene.one,
                posterior.gene.two,
                posterior.phenotype.present,
                posterior.phenotype.absent,
            ];
            writeln!(self.source, "{name}{TSV_SEPARATOR}{:.6}", fields.iter().format(TSV_SEPARATOR))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::common, world::{Subset, World}};

    fn mock_posteriors() -> Posteriors {
        let mut posteriors = Posteriors::new(&common::mock_founders());
        posteriors.update(&World::new(Subset::from_bits(0b01), Subset::EMPTY, Subset::EMPTY), 1.0);
        posteriors.update(&World::new(Subset::EMPTY, Subset::from_bits(0b11), Subset::from_bits(0b11)), 3.0);
        posteriors.normalize().expect("Mass is not null");
        posteriors
    }

    #[test]
    fn write_tsv() -> Result<()> {
        let mut buffer = Vec::new();
        PosteriorWriter::from_writer(&mut buffer).write(&mock_posteriors(), OutputFormat::Tsv)?;

        let expected = "\
name\tgene_0\tgene_1\tgene_2\ttrait_true\ttrait_false
Alice\t0.000000\t0.250000\t0.750000\t0.750000\t0.250000
Bob\t0.250000\t0.000000\t0.750000\t0.750000\t0.250000
";
        pretty_assertions::assert_eq!(String::from_utf8(buffer)?, expected);
        Ok(())
    }

    #[test]
    fn write_report_file() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("founders.posteriors");
        let posteriors = mock_posteriors();
        PosteriorWriter::new(Some(&path))?.write(&posteriors, OutputFormat::Report)?;

        let got = std::fs::read_to_string(&path)?;
        pretty_assertions::assert_eq!(got, posteriors.to_string());
        Ok(())
    }

    #[test]
    fn invalid_path() {
        assert!(PosteriorWriter::new(Some("/does/not/exist/out.tsv")).is_err());
    }
}
